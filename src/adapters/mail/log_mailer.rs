//! Logging mailer for development and tests.
//!
//! Logs each reminder instead of delivering it and keeps a copy of everything "sent".
//! Can be switched into a failing mode to exercise the retry path.

use crate::domain::{DomainError, ReminderMail};
use crate::ports::MailPort;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::info;

#[derive(Default)]
pub struct LogMailer {
    sent: Mutex<Vec<ReminderMail>>,
    failing: AtomicBool,
}

impl LogMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every send fails and nothing is recorded.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<ReminderMail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl MailPort for LogMailer {
    async fn send_reminder(&self, mail: &ReminderMail) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::Mail("log mailer set to fail".to_string()));
        }
        info!(
            meeting_id = %mail.meeting_id,
            from = %mail.owner,
            recipients = ?mail.recipients,
            subject = %mail.subject,
            "[LOG MAILER] reminder"
        );
        self.sent.lock().await.push(mail.clone());
        Ok(())
    }
}
