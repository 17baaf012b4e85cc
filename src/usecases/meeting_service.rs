//! Meeting commands and queries. Implements the inbound `MeetingApi`.
//!
//! Every mutation runs as lock -> load -> mutate -> save under the meeting's
//! exclusive lock, so commands on one meeting never interleave.

use crate::domain::{
    AgendaItemUpdate, AgendaItemView, AgendaNote, DomainError, Meeting, MeetingSnapshot,
    MeetingUpdate, NoteEdit, SlotRequest, UpdateOutcome, UserProfile, sort_chrono,
};
use crate::ports::{
    DirectoryPort, DocumentRef, DocumentRegistryPort, MeetingApi, MeetingRepoPort,
};
use crate::shared::clock::now_millis;
use crate::usecases::meeting_locks::MeetingLocks;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct MeetingService {
    repo: Arc<dyn MeetingRepoPort>,
    directory: Arc<dyn DirectoryPort>,
    documents: Arc<dyn DocumentRegistryPort>,
    locks: Arc<MeetingLocks>,
    /// Role invited when a meeting names neither participants nor a valid role.
    default_role: String,
    /// Prefix for calendar UIDs (site/workspace key).
    ics_uid_prefix: String,
}

impl MeetingService {
    pub fn new(
        repo: Arc<dyn MeetingRepoPort>,
        directory: Arc<dyn DirectoryPort>,
        documents: Arc<dyn DocumentRegistryPort>,
        locks: Arc<MeetingLocks>,
        default_role: impl Into<String>,
        ics_uid_prefix: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            directory,
            documents,
            locks,
            default_role: default_role.into(),
            ics_uid_prefix: ics_uid_prefix.into(),
        }
    }

    async fn load(&self, meeting_id: &str) -> Result<Meeting, DomainError> {
        self.repo
            .load_meeting(meeting_id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("meeting '{}' does not exist", meeting_id))
            })
    }

    /// Runs `f` on the meeting under its lock and saves the result. Nothing is saved when
    /// `f` fails.
    async fn with_meeting<T, F>(&self, meeting_id: &str, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut Meeting) -> Result<T, DomainError> + Send,
        T: Send,
    {
        let _guard = self.locks.lock(meeting_id).await;
        let mut meeting = self.load(meeting_id).await?;
        let out = f(&mut meeting)?;
        self.repo.save_meeting(&meeting).await?;
        Ok(out)
    }

    async fn profile(&self, user_id: &str) -> Result<UserProfile, DomainError> {
        Ok(self
            .directory
            .user(user_id)
            .await?
            .unwrap_or_else(|| UserProfile::from_id(user_id)))
    }

    pub async fn create_meeting(&self, name: &str, owner: &str) -> Result<Meeting, DomainError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let meeting = Meeting::new(id, name, owner);
        self.repo.save_meeting(&meeting).await?;
        info!(meeting_id = %meeting.id, name, "meeting created");
        Ok(meeting)
    }

    /// New meeting linked to `previous_id` for minutes continuity, carrying over the
    /// selected agenda items.
    pub async fn create_follow_up(
        &self,
        previous_id: &str,
        name: &str,
        owner: &str,
        carried: &[AgendaItemUpdate],
    ) -> Result<Meeting, DomainError> {
        let previous = self.load(previous_id).await?;
        let id = uuid::Uuid::new_v4().simple().to_string();
        let mut meeting = Meeting::new(id, name, owner);
        meeting.previous_meeting = Some(previous.id.clone());
        meeting.target_role = previous.target_role.clone();
        meeting.participants = previous.participants.clone();
        meeting.reminder_advance = previous.reminder_advance;
        meeting.duration = previous.duration;
        meeting.create_agenda_from(carried);
        self.repo.save_meeting(&meeting).await?;
        info!(
            meeting_id = %meeting.id,
            previous_id,
            items = meeting.agenda_items().len(),
            "follow-up meeting created"
        );
        Ok(meeting)
    }

    pub async fn get_meeting(&self, meeting_id: &str) -> Result<Meeting, DomainError> {
        self.load(meeting_id).await
    }

    /// All regular meetings, latest first (unscheduled ones sort as "now").
    /// The backlog container is left out.
    pub async fn list_meetings(&self) -> Result<Vec<Meeting>, DomainError> {
        let mut meetings = Vec::new();
        for id in self.repo.list_meeting_ids().await? {
            match self.repo.load_meeting(&id).await? {
                Some(m) if !m.backlog => meetings.push(m),
                Some(_) => {}
                None => warn!(meeting_id = %id, "listed meeting vanished before load"),
            }
        }
        sort_chrono(&mut meetings, now_millis());
        Ok(meetings)
    }

    pub async fn delete_meeting(&self, meeting_id: &str) -> Result<bool, DomainError> {
        let _guard = self.locks.lock(meeting_id).await;
        let removed = self.repo.delete_meeting(meeting_id).await?;
        if removed {
            info!(meeting_id, "meeting deleted");
        }
        Ok(removed)
    }

    /// Marks `user_id` as present if the meeting is running. Persists only on change.
    pub async fn record_presence(
        &self,
        meeting_id: &str,
        user_id: &str,
    ) -> Result<bool, DomainError> {
        let user = self.profile(user_id).await?;
        let _guard = self.locks.lock(meeting_id).await;
        let mut meeting = self.load(meeting_id).await?;
        let added = meeting.add_attendee_if_needed(&user);
        if added {
            self.repo.save_meeting(&meeting).await?;
            debug!(meeting_id, user = %user.universal_id, "attendee added");
        }
        Ok(added)
    }

    pub async fn insert_agenda_item(
        &self,
        meeting_id: &str,
        position: i32,
        fields: AgendaItemUpdate,
    ) -> Result<String, DomainError> {
        let item_id = self
            .with_meeting(meeting_id, move |m| {
                Ok(m.insert_agenda_item_at(position, &fields))
            })
            .await?;
        info!(meeting_id, item_id = %item_id, position, "agenda item inserted");
        Ok(item_id)
    }

    pub async fn remove_agenda_item(
        &self,
        meeting_id: &str,
        item_id: &str,
    ) -> Result<(), DomainError> {
        self.with_meeting(meeting_id, |m| {
            if m.remove_agenda_item(item_id) {
                Ok(())
            } else {
                Err(DomainError::NotFound(format!(
                    "agenda item '{}' does not exist in meeting '{}'",
                    item_id, m.id
                )))
            }
        })
        .await
    }

    pub async fn move_agenda_item(
        &self,
        meeting_id: &str,
        item_id: &str,
        position: i32,
    ) -> Result<(), DomainError> {
        self.with_meeting(meeting_id, |m| m.move_agenda_item(item_id, position))
            .await
    }

    /// Rebuilds positions and numbers. Safe to run at any time to repair drift.
    pub async fn renumber(&self, meeting_id: &str) -> Result<(), DomainError> {
        self.with_meeting(meeting_id, |m| {
            m.renumber_items();
            Ok(())
        })
        .await
    }

    pub async fn start_timer(&self, meeting_id: &str, item_id: &str) -> Result<(), DomainError> {
        let now = now_millis();
        self.with_meeting(meeting_id, |m| m.start_timer(item_id, now))
            .await
    }

    pub async fn stop_timer(&self, meeting_id: &str) -> Result<(), DomainError> {
        let now = now_millis();
        self.with_meeting(meeting_id, |m| {
            m.stop_timer(now);
            Ok(())
        })
        .await
    }

    pub async fn document_linked_items(
        &self,
        meeting_id: &str,
        doc_id: &str,
    ) -> Result<Vec<AgendaItemView>, DomainError> {
        let meeting = self.load(meeting_id).await?;
        Ok(meeting
            .document_linked_items(doc_id)
            .into_iter()
            .map(AgendaItemView::from)
            .collect())
    }

    pub async fn meeting_notes(&self, meeting_id: &str) -> Result<Vec<AgendaNote>, DomainError> {
        Ok(self.load(meeting_id).await?.meeting_notes())
    }

    /// Documents linked from the agenda, in agenda order, each once. Ids the registry does
    /// not know are skipped.
    pub async fn linked_documents(
        &self,
        meeting_id: &str,
    ) -> Result<Vec<DocumentRef>, DomainError> {
        let meeting = self.load(meeting_id).await?;
        self.resolve_documents(&meeting).await
    }

    async fn resolve_documents(
        &self,
        meeting: &Meeting,
    ) -> Result<Vec<DocumentRef>, DomainError> {
        let mut seen = BTreeSet::new();
        let mut docs = Vec::new();
        for item in meeting.sorted_agenda_items() {
            for doc_id in &item.doc_list {
                if !seen.insert(doc_id.as_str()) {
                    continue;
                }
                match self.documents.document(doc_id).await? {
                    Some(doc) => docs.push(doc),
                    None => debug!(
                        meeting_id = %meeting.id,
                        doc_id = %doc_id,
                        "unknown document skipped"
                    ),
                }
            }
        }
        Ok(docs)
    }

    /// `(Meeting) <name> @ <date>` in the owner's offset.
    pub async fn describe(&self, meeting_id: &str) -> Result<String, DomainError> {
        let meeting = self.load(meeting_id).await?;
        let owner = self.profile(&meeting.owner).await?;
        Ok(meeting.self_description(owner.utc_offset_minutes))
    }

    /// Minutes id of the previous meeting, when that meeting and its minutes still exist.
    async fn previous_minutes(&self, meeting: &Meeting) -> Result<Option<String>, DomainError> {
        let Some(prev_id) = meeting.previous_meeting.as_deref() else {
            return Ok(None);
        };
        let Some(prev) = self.repo.load_meeting(prev_id).await? else {
            return Ok(None);
        };
        match prev.minutes_id {
            Some(minutes) if self.documents.topic_exists(&minutes).await? => Ok(Some(minutes)),
            _ => Ok(None),
        }
    }
}

#[async_trait::async_trait]
impl MeetingApi for MeetingService {
    /// Also repairs two links on read: a target role that no longer exists and a
    /// minutes id whose topic is gone. Repairs are persisted. A directory without
    /// any role only affects the notification path, so the snapshot is still served.
    async fn snapshot(&self, meeting_id: &str) -> Result<MeetingSnapshot, DomainError> {
        let roles = self.directory.role_names().await?;
        let _guard = self.locks.lock(meeting_id).await;
        let mut meeting = self.load(meeting_id).await?;

        let mut repaired = match meeting.verify_target_role(&roles, &self.default_role) {
            Ok(changed) => changed,
            Err(DomainError::InvalidConfiguration(reason)) => {
                warn!(meeting_id, %reason, "target role not verified");
                false
            }
            Err(e) => return Err(e),
        };
        if let Some(minutes) = meeting.minutes_id.clone() {
            if !self.documents.topic_exists(&minutes).await? {
                warn!(meeting_id, minutes_id = %minutes, "minutes topic missing; link cleared");
                meeting.minutes_id = None;
                repaired = true;
            }
        }
        if repaired {
            self.repo.save_meeting(&meeting).await?;
        }

        let mut snapshot = meeting.snapshot();
        snapshot.previous_minutes = self.previous_minutes(&meeting).await?;
        Ok(snapshot)
    }

    async fn apply_update(
        &self,
        meeting_id: &str,
        update: MeetingUpdate,
        actor: &str,
    ) -> Result<UpdateOutcome, DomainError> {
        if let Some(prev_id) = update.previous_meeting.as_deref().filter(|p| !p.is_empty()) {
            if self.repo.load_meeting(prev_id).await?.is_none() {
                return Err(DomainError::NotFound(format!(
                    "previous meeting '{}' does not exist",
                    prev_id
                )));
            }
        }
        let now = now_millis();
        let outcome = self
            .with_meeting(meeting_id, |m| m.apply_update(&update, actor, now))
            .await?;
        info!(
            meeting_id,
            actor,
            info_changed = outcome.info_changed,
            rescheduled = outcome.rescheduled,
            agenda_changed = outcome.agenda_changed,
            "meeting updated"
        );
        Ok(outcome)
    }

    async fn act_on_proposed_time(
        &self,
        meeting_id: &str,
        request: SlotRequest,
    ) -> Result<(), DomainError> {
        self.with_meeting(meeting_id, |m| m.act_on_proposed_time(&request))
            .await?;
        debug!(
            meeting_id,
            list = ?request.list,
            command = ?request.command,
            "proposed time command applied"
        );
        Ok(())
    }

    async fn update_meeting_notes(
        &self,
        meeting_id: &str,
        edits: Vec<NoteEdit>,
    ) -> Result<(), DomainError> {
        self.with_meeting(meeting_id, |m| m.update_meeting_notes(&edits))
            .await
    }

    async fn export_ics(&self, meeting_id: &str) -> Result<String, DomainError> {
        let meeting = self.load(meeting_id).await?;
        let organizer = self.profile(&meeting.owner).await?;
        let mut event = meeting.calendar_event(&self.ics_uid_prefix, &organizer, now_millis())?;
        let docs = self.resolve_documents(&meeting).await?;
        if !docs.is_empty() {
            event.description.push_str("\n\nDocuments:");
            for doc in docs {
                event.description.push_str(&format!("\n{} {}", doc.name, doc.url));
            }
        }
        Ok(event.to_ics())
    }
}
