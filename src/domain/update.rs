//! Sparse batch updates. Only fields present in the payload are applied; the
//! whole batch is applied to a copy and committed only when every step
//! succeeded.

use super::entities::{
    AgendaItem, Meeting, MeetingState, MeetingType, ProposedTime, RollCallEntry, SlotList,
};
use super::errors::DomainError;
use serde::{Deserialize, Serialize};

/// Id that asks for a new agenda item to be created.
pub const NEW_ITEM_ID: &str = "~new~";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeetingUpdate {
    pub name: Option<String>,
    pub state: Option<MeetingState>,
    /// Explicit override of the sent marker (the UI clears it to force a resend).
    pub reminder_sent: Option<i64>,
    pub start_time: Option<i64>,
    pub target_role: Option<String>,
    pub duration: Option<i64>,
    pub meeting_type: Option<MeetingType>,
    #[serde(rename = "reminderTime")]
    pub reminder_advance: Option<i32>,
    #[serde(rename = "meetingInfo")]
    pub description: Option<String>,
    pub previous_meeting: Option<String>,
    pub minutes_id: Option<String>,
    pub owner: Option<String>,
    pub backlog: Option<bool>,
    pub roll_call: Option<Vec<RollCallEntry>>,
    pub attended: Option<Vec<String>>,
    #[serde(rename = "attended_add")]
    pub attended_add: Option<String>,
    #[serde(rename = "attended_remove")]
    pub attended_remove: Option<String>,
    pub participants: Option<Vec<String>>,
    pub time_slots: Option<Vec<ProposedTime>>,
    pub future_slots: Option<Vec<ProposedTime>>,
    /// Agenda item upserts; see `NEW_ITEM_ID`.
    pub agenda: Option<Vec<AgendaItemUpdate>>,
    pub start_timer: Option<String>,
    pub stop_timer: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgendaItemUpdate {
    pub id: String,
    pub subject: Option<String>,
    pub description: Option<String>,
    pub position: Option<i32>,
    pub proposed: Option<bool>,
    pub spacer: Option<bool>,
    pub duration: Option<i64>,
    pub presenters: Option<Vec<String>>,
    pub doc_list: Option<Vec<String>>,
    pub action_items: Option<Vec<String>>,
    /// Only read by `create_agenda_from`.
    pub selected: bool,
}

impl AgendaItemUpdate {
    pub fn new_item(subject: impl Into<String>) -> Self {
        Self {
            id: NEW_ITEM_ID.to_string(),
            subject: Some(subject.into()),
            ..Default::default()
        }
    }

    fn apply_to(&self, ai: &mut AgendaItem) {
        if let Some(v) = &self.subject {
            ai.subject = v.clone();
        }
        if let Some(v) = &self.description {
            ai.description = v.clone();
        }
        if let Some(v) = self.position {
            ai.position = v;
        }
        if let Some(v) = self.proposed {
            ai.proposed = v;
        }
        if let Some(v) = self.spacer {
            ai.spacer = v;
        }
        if let Some(v) = self.duration {
            ai.duration = v;
        }
        if let Some(v) = &self.presenters {
            ai.presenters = v.clone();
        }
        if let Some(v) = &self.doc_list {
            ai.doc_list = v.clone();
        }
        if let Some(v) = &self.action_items {
            ai.action_items = v.clone();
        }
    }
}

/// What an applied update touched. Callers use it to decide what to log and persist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub info_changed: bool,
    pub rescheduled: bool,
    pub agenda_changed: bool,
}

impl Meeting {
    /// Applies `update` as one unit. `actor` becomes the owner when meeting info is set
    /// on a meeting without one.
    pub fn apply_update(
        &mut self,
        update: &MeetingUpdate,
        actor: &str,
        now: i64,
    ) -> Result<UpdateOutcome, DomainError> {
        let mut draft = self.clone();
        let outcome = draft.apply_update_in_place(update, actor, now)?;
        *self = draft;
        Ok(outcome)
    }

    fn apply_update_in_place(
        &mut self,
        update: &MeetingUpdate,
        actor: &str,
        now: i64,
    ) -> Result<UpdateOutcome, DomainError> {
        let mut outcome = UpdateOutcome::default();

        if let Some(v) = &update.name {
            self.name = v.clone();
            outcome.info_changed = true;
        }
        if let Some(v) = update.state {
            self.set_state(v);
        }
        if let Some(v) = update.reminder_sent {
            self.set_reminder_sent(v);
        }
        if let Some(v) = update.start_time {
            if self.set_start_time(v) {
                outcome.info_changed = true;
                outcome.rescheduled = true;
            }
        }
        if let Some(v) = &update.target_role {
            self.target_role = v.clone();
        }
        if let Some(v) = update.duration {
            self.duration = v;
            outcome.info_changed = true;
        }
        if let Some(v) = update.meeting_type {
            self.meeting_type = Some(v);
            outcome.info_changed = true;
        }
        if let Some(v) = update.reminder_advance {
            self.reminder_advance = v;
            outcome.info_changed = true;
        }
        if let Some(v) = &update.description {
            self.description = v.clone();
            outcome.info_changed = true;
        }
        if let Some(v) = &update.previous_meeting {
            self.previous_meeting = non_empty(v);
        }
        if let Some(v) = &update.minutes_id {
            self.minutes_id = non_empty(v);
        }
        if let Some(v) = &update.owner {
            self.owner = v.clone();
        }
        if let Some(v) = update.backlog {
            self.backlog = v;
        }
        if let Some(entries) = &update.roll_call {
            for entry in entries {
                self.upsert_roll_call(entry.clone());
            }
        }
        if let Some(v) = &update.attended {
            self.set_attendees(v.clone());
        }
        if let Some(v) = &update.attended_add {
            self.add_attendee_unique(v);
        }
        if let Some(v) = &update.attended_remove {
            self.remove_attendee(v);
        }
        if let Some(v) = &update.participants {
            self.participants = v.clone();
        }
        if let Some(v) = &update.time_slots {
            self.replace_slots(SlotList::Current, v.clone());
        }
        if let Some(v) = &update.future_slots {
            self.replace_slots(SlotList::Future, v.clone());
        }

        if outcome.info_changed && self.owner.trim().is_empty() && !actor.is_empty() {
            self.owner = actor.to_string();
        }

        if let Some(items) = &update.agenda {
            self.update_agenda(items)?;
            outcome.agenda_changed = true;
        }
        if let Some(item_id) = &update.start_timer {
            self.start_timer(item_id, now)?;
        }
        if update.stop_timer {
            self.stop_timer(now);
        }
        Ok(outcome)
    }

    /// Upserts agenda items, then renumbers. Never removes items. Unknown ids (other
    /// than `NEW_ITEM_ID`) are `NotFound`.
    pub fn update_agenda(&mut self, items: &[AgendaItemUpdate]) -> Result<(), DomainError> {
        for upd in items {
            if upd.id.is_empty() {
                continue;
            }
            if upd.id == NEW_ITEM_ID {
                let ai = self.create_agenda_item();
                upd.apply_to(ai);
            } else {
                let ai = self.find_agenda_item_mut(&upd.id)?;
                upd.apply_to(ai);
            }
        }
        self.renumber_items();
        Ok(())
    }

    /// Creates an item from `fields` at `position`, shifting later items down.
    /// Returns the new item's id.
    pub fn insert_agenda_item_at(&mut self, position: i32, fields: &AgendaItemUpdate) -> String {
        self.open_position(position);
        let ai = self.create_agenda_item();
        fields.apply_to(ai);
        ai.position = position;
        let id = ai.id.clone();
        self.renumber_items();
        id
    }

    /// Creates fresh copies of the `selected` items (e.g. carried over from a previous
    /// meeting's agenda), then renumbers.
    pub fn create_agenda_from(&mut self, items: &[AgendaItemUpdate]) {
        for upd in items.iter().filter(|u| u.selected) {
            let ai = self.create_agenda_item();
            upd.apply_to(ai);
        }
        self.renumber_items();
    }
}

fn non_empty(v: &str) -> Option<String> {
    if v.is_empty() {
        None
    } else {
        Some(v.to_string())
    }
}
