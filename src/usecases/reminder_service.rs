//! Reminder poller: periodically checks every meeting and sends the reminders that are due.
//!
//! Each meeting is evaluated and sent under its own lock, so two overlapping cycles or a
//! concurrent edit can never send the same reminder twice. A failed dispatch leaves the
//! sent marker untouched and the next cycle retries.

use crate::domain::{DomainError, Meeting, Recipients, ReminderMail};
use crate::ports::{DirectoryPort, MailPort, MeetingRepoPort};
use crate::shared::clock::now_millis;
use crate::usecases::meeting_locks::MeetingLocks;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Counters for one poll cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    pub checked: usize,
    pub sent: usize,
    pub failed: usize,
}

pub struct ReminderService {
    repo: Arc<dyn MeetingRepoPort>,
    directory: Arc<dyn DirectoryPort>,
    mail: Arc<dyn MailPort>,
    locks: Arc<MeetingLocks>,
    default_role: String,
    /// Sleep between cycles.
    poll_interval: Duration,
}

impl ReminderService {
    pub fn new(
        repo: Arc<dyn MeetingRepoPort>,
        directory: Arc<dyn DirectoryPort>,
        mail: Arc<dyn MailPort>,
        locks: Arc<MeetingLocks>,
        default_role: impl Into<String>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            repo,
            directory,
            mail,
            locks,
            default_role: default_role.into(),
            poll_interval,
        }
    }

    /// Runs cycles forever, sleeping `poll_interval` between them.
    pub async fn run_loop(&self) -> Result<(), DomainError> {
        info!(
            poll_secs = self.poll_interval.as_secs(),
            "reminder poller started"
        );
        loop {
            match self.run_cycle(now_millis()).await {
                Ok(stats) if stats.sent > 0 || stats.failed > 0 => info!(
                    checked = stats.checked,
                    sent = stats.sent,
                    failed = stats.failed,
                    "reminder cycle complete"
                ),
                Ok(stats) => debug!(checked = stats.checked, "reminder cycle complete"),
                Err(e) => warn!(error = %e, "reminder cycle aborted"),
            }
            self.locks.prune().await;
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// One pass over all meetings. Per-meeting failures are logged and counted; only a
    /// failure to list meetings aborts the cycle.
    pub async fn run_cycle(&self, now: i64) -> Result<CycleStats, DomainError> {
        let mut stats = CycleStats::default();
        for meeting_id in self.repo.list_meeting_ids().await? {
            stats.checked += 1;
            match self.check_meeting(&meeting_id, now).await {
                Ok(true) => stats.sent += 1,
                Ok(false) => {}
                Err(e) if e.is_contract_violation() => {
                    stats.failed += 1;
                    error!(meeting_id = %meeting_id, error = %e, "reminder send contract broken");
                }
                Err(e) => {
                    stats.failed += 1;
                    warn!(meeting_id = %meeting_id, error = %e, "reminder not sent");
                }
            }
        }
        Ok(stats)
    }

    /// Evaluate-then-send for one meeting under its lock. Returns whether a reminder went out.
    async fn check_meeting(&self, meeting_id: &str, now: i64) -> Result<bool, DomainError> {
        let _guard = self.locks.lock(meeting_id).await;
        let Some(mut meeting) = self.repo.load_meeting(meeting_id).await? else {
            return Ok(false);
        };
        if !meeting.reminder_due(now) {
            return Ok(false);
        }
        self.send_it(&mut meeting, now).await?;
        if let Err(e) = self.repo.save_meeting(&meeting).await {
            error!(
                meeting_id,
                error = %e,
                "reminder sent but not recorded; next cycle may resend"
            );
            return Err(e);
        }
        Ok(true)
    }

    /// Dispatches the reminder and records the send. The caller must hold the meeting's
    /// lock and have checked that the reminder is due.
    pub async fn send_it(&self, meeting: &mut Meeting, now: i64) -> Result<(), DomainError> {
        meeting.check_send_contract(now)?;

        let offset = self
            .directory
            .user(&meeting.owner)
            .await?
            .map(|u| u.utc_offset_minutes)
            .unwrap_or(0);
        let mut mail = meeting.compose_reminder(&self.default_role, offset)?;
        self.resolve_recipients(&mut mail).await?;

        self.mail.send_reminder(&mail).await?;
        meeting.mark_reminder_sent(now)?;
        info!(
            meeting_id = %meeting.id,
            subject = %mail.subject,
            "reminder sent"
        );
        Ok(())
    }

    /// Expands a role recipient into its member ids. A role that no longer exists is a
    /// configuration error for that meeting.
    async fn resolve_recipients(&self, mail: &mut ReminderMail) -> Result<(), DomainError> {
        if let Recipients::Role(role) = &mail.recipients {
            let members = self.directory.role_members(role).await?.ok_or_else(|| {
                DomainError::InvalidConfiguration(format!(
                    "role '{}' for meeting '{}' does not exist",
                    role, mail.meeting_id
                ))
            })?;
            mail.recipients = Recipients::Participants(members);
        }
        Ok(())
    }
}
