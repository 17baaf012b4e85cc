//! Inbound port. The HTTP/UI layer calls into the application.

use crate::domain::{
    DomainError, MeetingSnapshot, MeetingUpdate, NoteEdit, SlotRequest, UpdateOutcome,
};

/// Read and write surface for one meeting. Every call is serialized per meeting.
#[async_trait::async_trait]
pub trait MeetingApi: Send + Sync {
    async fn snapshot(&self, meeting_id: &str) -> Result<MeetingSnapshot, DomainError>;

    /// Sparse update plus agenda upserts. Renumbers the agenda afterwards.
    async fn apply_update(
        &self,
        meeting_id: &str,
        update: MeetingUpdate,
        actor: &str,
    ) -> Result<UpdateOutcome, DomainError>;

    async fn act_on_proposed_time(
        &self,
        meeting_id: &str,
        request: SlotRequest,
    ) -> Result<(), DomainError>;

    async fn update_meeting_notes(
        &self,
        meeting_id: &str,
        edits: Vec<NoteEdit>,
    ) -> Result<(), DomainError>;

    /// Single-event iCalendar text.
    async fn export_ics(&self, meeting_id: &str) -> Result<String, DomainError>;
}
