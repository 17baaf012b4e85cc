//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, Meeting, ReminderMail, UserProfile};

/// Meeting store. Loads and saves a meeting with everything it owns as one unit.
#[async_trait::async_trait]
pub trait MeetingRepoPort: Send + Sync {
    /// Returns `None` when no meeting has this id.
    async fn load_meeting(&self, meeting_id: &str) -> Result<Option<Meeting>, DomainError>;

    /// Inserts or replaces the whole meeting graph.
    async fn save_meeting(&self, meeting: &Meeting) -> Result<(), DomainError>;

    async fn delete_meeting(&self, meeting_id: &str) -> Result<bool, DomainError>;

    /// Ids of every stored meeting. Order is adapter-specific.
    async fn list_meeting_ids(&self) -> Result<Vec<String>, DomainError>;
}

/// User and role directory.
#[async_trait::async_trait]
pub trait DirectoryPort: Send + Sync {
    /// Names of all roles that exist.
    async fn role_names(&self) -> Result<Vec<String>, DomainError>;

    /// Member ids of a role. `None` when the role does not exist.
    async fn role_members(&self, role: &str) -> Result<Option<Vec<String>>, DomainError>;

    /// Resolves any id or alias to a profile. `None` for unknown users.
    async fn user(&self, id: &str) -> Result<Option<UserProfile>, DomainError>;
}

/// Mail dispatch. Returns only after delivery was accepted.
#[async_trait::async_trait]
pub trait MailPort: Send + Sync {
    async fn send_reminder(&self, mail: &ReminderMail) -> Result<(), DomainError>;
}

/// Display data for a linked document.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DocumentRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Document and topic registry. Only the export/snapshot paths use it.
#[async_trait::async_trait]
pub trait DocumentRegistryPort: Send + Sync {
    async fn document(&self, doc_id: &str) -> Result<Option<DocumentRef>, DomainError>;

    /// True when a minutes topic with this id exists.
    async fn topic_exists(&self, topic_id: &str) -> Result<bool, DomainError>;
}
