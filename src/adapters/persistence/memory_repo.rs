//! In-memory meeting store for tests and dry runs. Stores clones, so callers
//! never share state with the repo.

use crate::domain::{DomainError, Meeting};
use crate::ports::MeetingRepoPort;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryRepo {
    meetings: RwLock<BTreeMap<String, Meeting>>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl MeetingRepoPort for MemoryRepo {
    async fn load_meeting(&self, meeting_id: &str) -> Result<Option<Meeting>, DomainError> {
        Ok(self.meetings.read().await.get(meeting_id).cloned())
    }

    async fn save_meeting(&self, meeting: &Meeting) -> Result<(), DomainError> {
        self.meetings
            .write()
            .await
            .insert(meeting.id.clone(), meeting.clone());
        Ok(())
    }

    async fn delete_meeting(&self, meeting_id: &str) -> Result<bool, DomainError> {
        Ok(self.meetings.write().await.remove(meeting_id).is_some())
    }

    async fn list_meeting_ids(&self) -> Result<Vec<String>, DomainError> {
        Ok(self.meetings.read().await.keys().cloned().collect())
    }
}
