//! Reminder scheduling. Decides whether and when a meeting reminder fires and
//! records the send so it fires at most once per effective schedule.
//!
//! Facts: start time, reminder advance, state, and the time the reminder was
//! last sent. Changing the start time clears the sent time (see
//! `Meeting::set_start_time`), so a reschedule, even into the past, makes the
//! reminder due again. A reminder whose send time already elapsed when first
//! observed fires once, immediately.

use super::entities::{Meeting, MeetingState};
use super::errors::DomainError;
use super::lifecycle::Recipients;
use serde::{Deserialize, Serialize};

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Everything the mail port needs to deliver one reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderMail {
    pub meeting_id: String,
    pub subject: String,
    pub body: String,
    /// Sender; mail appears to come from the meeting owner.
    pub owner: String,
    pub recipients: Recipients,
}

impl Meeting {
    /// When the reminder should go out: start − advance. `None` unless Planning with a
    /// positive advance, and `None` when the result is not representable.
    pub fn time_to_send(&self) -> Option<i64> {
        if self.state != MeetingState::Planning || self.reminder_advance <= 0 {
            return None;
        }
        self.start_time
            .checked_sub(i64::from(self.reminder_advance) * MILLIS_PER_MINUTE)
    }

    /// True while Planning and no reminder has been sent at or after the send time.
    pub fn needs_sending(&self) -> bool {
        match self.time_to_send() {
            Some(t) => t > 0 && self.reminder_sent < t,
            None => false,
        }
    }

    /// Due = needs sending and the send time has passed.
    pub fn reminder_due(&self, now: i64) -> bool {
        self.needs_sending() && self.time_to_send().is_some_and(|t| t <= now)
    }

    /// Precondition of a send: Planning, and the send time is not in the future.
    /// Breaking it is a bug in the caller.
    pub fn check_send_contract(&self, now: i64) -> Result<(), DomainError> {
        if self.state != MeetingState::Planning {
            return Err(DomainError::ContractViolation(format!(
                "reminder for meeting '{}' requested in state {}; only planning meetings send",
                self.id, self.state
            )));
        }
        match self.time_to_send() {
            Some(t) if t <= now => Ok(()),
            Some(t) => Err(DomainError::ContractViolation(format!(
                "reminder for meeting '{}' requested at {} but send time {} is still in the future",
                self.id, now, t
            ))),
            None => Err(DomainError::ContractViolation(format!(
                "reminder for meeting '{}' requested but reminders are disabled",
                self.id
            ))),
        }
    }

    /// Builds the reminder for the mail port. Fails when the owner is unset.
    pub fn compose_reminder(
        &self,
        default_role: &str,
        utc_offset_minutes: i32,
    ) -> Result<ReminderMail, DomainError> {
        if self.owner.trim().is_empty() {
            return Err(DomainError::InvalidConfiguration(format!(
                "owner of meeting '{}' has not been set",
                self.name
            )));
        }
        let mut body = format!("{}\n", self.self_description(utc_offset_minutes));
        if self.duration > 0 {
            body.push_str(&format!("Duration: {} minutes\n", self.duration));
        }
        if !self.description.is_empty() {
            body.push('\n');
            body.push_str(&self.description);
            body.push('\n');
        }
        let agenda = self.sorted_agenda_items();
        if !agenda.is_empty() {
            body.push_str("\nAgenda:\n");
            for ai in agenda.into_iter().filter(|ai| !ai.proposed) {
                if ai.spacer {
                    body.push_str(&format!("   {}\n", ai.subject));
                } else {
                    body.push_str(&format!("{}. {}\n", ai.number, ai.subject));
                }
            }
        }
        Ok(ReminderMail {
            meeting_id: self.id.clone(),
            subject: format!("Reminder for meeting: {}", self.name),
            body,
            owner: self.owner.clone(),
            recipients: self.recipients(default_role),
        })
    }

    /// Records a successful send. Checks the send contract again so a send can never be
    /// recorded for a meeting that should not have sent.
    pub fn mark_reminder_sent(&mut self, now: i64) -> Result<(), DomainError> {
        self.check_send_contract(now)?;
        self.reminder_sent = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AgendaItem;

    const T: i64 = 1_700_000_000_000;

    fn planning(advance: i32) -> Meeting {
        let mut m = Meeting::new("m1", "Weekly", "owner@example.com");
        m.set_start_time(T);
        m.reminder_advance = advance;
        m.set_state(MeetingState::Planning);
        m
    }

    #[test]
    fn test_time_to_send() {
        let m = planning(30);
        assert_eq!(m.time_to_send(), Some(T - 1_800_000));
    }

    #[test]
    fn test_not_needed_outside_planning() {
        for state in [
            MeetingState::Draft,
            MeetingState::Running,
            MeetingState::Completed,
        ] {
            let mut m = planning(30);
            m.set_state(state);
            assert_eq!(m.time_to_send(), None);
            assert!(!m.needs_sending());
        }
    }

    #[test]
    fn test_not_needed_without_advance() {
        for advance in [0, -5] {
            let m = planning(advance);
            assert!(!m.needs_sending());
        }
    }

    #[test]
    fn test_unscheduled_meeting_never_sends() {
        let mut m = planning(30);
        m.set_start_time(0);
        assert!(!m.needs_sending());
    }

    #[test]
    fn test_extreme_start_time_never_sends() {
        let mut m = planning(30);
        m.set_start_time(i64::MIN);
        assert_eq!(m.time_to_send(), None);
        assert!(!m.needs_sending());
        assert!(!m.reminder_due(0));
        assert!(m.check_send_contract(0).unwrap_err().is_contract_violation());
    }

    #[test]
    fn test_send_flips_needs_sending() {
        let mut m = planning(30);
        assert!(m.needs_sending());
        let target = T - 1_800_000;

        assert!(!m.reminder_due(target - 1));
        assert!(m.reminder_due(target));

        m.mark_reminder_sent(target + 5).unwrap();
        assert_eq!(m.reminder_sent(), target + 5);
        assert!(!m.needs_sending());
    }

    #[test]
    fn test_reschedule_after_send_needs_sending_again() {
        let mut m = planning(30);
        let sent_at = T - 1_000_000;
        m.mark_reminder_sent(sent_at).unwrap();
        assert!(!m.needs_sending());

        m.set_start_time(T + 86_400_000);
        assert_eq!(m.reminder_sent(), 0);
        assert!(m.needs_sending());
    }

    #[test]
    fn test_past_meeting_still_fires_once() {
        let mut m = planning(10);
        let now = T + 3_600_000;
        assert!(m.reminder_due(now));
        m.mark_reminder_sent(now).unwrap();
        assert!(!m.reminder_due(now + 60_000));
    }

    #[test]
    fn test_contract_violations() {
        let mut m = planning(30);
        let target = T - 1_800_000;
        let err = m.mark_reminder_sent(target - 1).unwrap_err();
        assert!(err.is_contract_violation());
        assert_eq!(m.reminder_sent(), 0);

        m.set_state(MeetingState::Running);
        assert!(m.check_send_contract(T).unwrap_err().is_contract_violation());
    }

    #[test]
    fn test_compose_reminder() {
        let mut m = planning(30);
        m.participants = vec!["ann".into()];
        let mut first = AgendaItem::new("a", "Budget");
        first.position = 1;
        let mut later = AgendaItem::new("p", "Maybe later");
        later.proposed = true;
        m.push_agenda_item(first);
        m.push_agenda_item(later);

        let mail = m.compose_reminder("Members", 0).unwrap();
        assert_eq!(mail.subject, "Reminder for meeting: Weekly");
        assert_eq!(mail.owner, "owner@example.com");
        assert_eq!(mail.recipients, Recipients::Participants(vec!["ann".into()]));
        assert!(mail.body.contains("1. Budget"));
        assert!(!mail.body.contains("Maybe later"));
    }

    #[test]
    fn test_compose_reminder_requires_owner() {
        let mut m = planning(30);
        m.owner.clear();
        assert!(matches!(
            m.compose_reminder("Members", 0),
            Err(DomainError::InvalidConfiguration(_))
        ));
    }
}
