//! HTTP mail relay adapter. Implements MailPort by POSTing the rendered reminder as JSON.
//!
//! The relay owns MIME construction and SMTP delivery. Any 2xx response counts as accepted.

use crate::domain::{DomainError, Recipients, ReminderMail};
use crate::ports::MailPort;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpMailRelay {
    client: Arc<Client>,
    url: String,
    token: Option<String>,
}

impl HttpMailRelay {
    /// `token`, when set, is sent as a bearer token.
    pub fn new(url: String, token: Option<String>) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DomainError::Mail(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client: Arc::new(client),
            url,
            token,
        })
    }

    fn payload(mail: &ReminderMail) -> serde_json::Value {
        let to: &[String] = match &mail.recipients {
            Recipients::Participants(ids) => ids,
            Recipients::Role(_) => &[],
        };
        let mut body = serde_json::json!({
            "from": mail.owner,
            "to": to,
            "subject": mail.subject,
            "text": mail.body,
            "reference": mail.meeting_id,
        });
        if let Recipients::Role(role) = &mail.recipients {
            body["role"] = serde_json::Value::String(role.clone());
        }
        body
    }
}

#[async_trait::async_trait]
impl MailPort for HttpMailRelay {
    async fn send_reminder(&self, mail: &ReminderMail) -> Result<(), DomainError> {
        let mut req = self.client.post(&self.url).json(&Self::payload(mail));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let res = req
            .send()
            .await
            .map_err(|e| DomainError::Mail(format!("Request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            return Err(DomainError::Mail(format!(
                "mail relay error {}: {}",
                status, text
            )));
        }

        debug!(meeting_id = %mail.meeting_id, "mail relay accepted reminder");
        Ok(())
    }
}
