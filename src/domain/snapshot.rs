//! Read model handed to the HTTP/UI layer.

use super::entities::{
    AgendaItem, Meeting, MeetingState, MeetingType, ProposedTime, RollCallEntry, SlotList,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItemView {
    pub id: String,
    pub subject: String,
    pub description: String,
    pub position: i32,
    pub number: i32,
    pub proposed: bool,
    pub spacer: bool,
    pub duration: i64,
    pub presenters: Vec<String>,
    pub doc_list: Vec<String>,
    pub action_items: Vec<String>,
    pub timer_running: bool,
    pub timer_start: i64,
    pub timer_elapsed: i64,
}

impl From<&AgendaItem> for AgendaItemView {
    fn from(ai: &AgendaItem) -> Self {
        Self {
            id: ai.id.clone(),
            subject: ai.subject.clone(),
            description: ai.description.clone(),
            position: ai.position,
            number: ai.number,
            proposed: ai.proposed,
            spacer: ai.spacer,
            duration: ai.duration,
            presenters: ai.presenters.clone(),
            doc_list: ai.doc_list.clone(),
            action_items: ai.action_items.clone(),
            timer_running: ai.timer_running(),
            timer_start: ai.timer_start(),
            timer_elapsed: ai.timer_elapsed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingSnapshot {
    pub id: String,
    pub name: String,
    #[serde(rename = "meetingInfo")]
    pub description: String,
    pub owner: String,
    pub state: MeetingState,
    pub meeting_type: Option<MeetingType>,
    pub start_time: i64,
    pub duration: i64,
    pub target_role: String,
    pub participants: Vec<String>,
    #[serde(rename = "reminderTime")]
    pub reminder_advance: i32,
    pub reminder_sent: i64,
    /// Planned send time, absent when no reminder is scheduled.
    pub time_to_send: Option<i64>,
    pub attended: Vec<String>,
    pub roll_call: Vec<RollCallEntry>,
    pub agenda: Vec<AgendaItemView>,
    pub time_slots: Vec<ProposedTime>,
    pub future_slots: Vec<ProposedTime>,
    pub previous_meeting: Option<String>,
    /// Minutes document of the previous meeting, when both still exist.
    pub previous_minutes: Option<String>,
    pub minutes_id: Option<String>,
    pub backlog: bool,
}

impl Meeting {
    /// Snapshot without cross-meeting lookups; `previous_minutes` is left empty.
    pub fn snapshot(&self) -> MeetingSnapshot {
        MeetingSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            owner: self.owner.clone(),
            state: self.state,
            meeting_type: self.meeting_type,
            start_time: self.start_time,
            duration: self.duration,
            target_role: self.target_role.clone(),
            participants: self.participants.clone(),
            reminder_advance: self.reminder_advance,
            reminder_sent: self.reminder_sent,
            time_to_send: self.time_to_send(),
            attended: self.attended.clone(),
            roll_call: self.roll_call.clone(),
            agenda: self
                .sorted_agenda_items()
                .into_iter()
                .map(AgendaItemView::from)
                .collect(),
            time_slots: self.slots(SlotList::Current).to_vec(),
            future_slots: self.slots(SlotList::Future).to_vec(),
            previous_meeting: self.previous_meeting.clone(),
            previous_minutes: None,
            minutes_id: self.minutes_id.clone(),
            backlog: self.backlog,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::time_slots::{SlotCommand, SlotRequest};
    use crate::domain::update::AgendaItemUpdate;

    #[test]
    fn test_snapshot_reflects_meeting() {
        let mut m = Meeting::new("m1", "Weekly", "owner");
        m.update_agenda(&[
            AgendaItemUpdate {
                proposed: Some(true),
                ..AgendaItemUpdate::new_item("Later")
            },
            AgendaItemUpdate::new_item("Now"),
        ])
        .unwrap();
        m.act_on_proposed_time(&SlotRequest::new(
            SlotList::Future,
            SlotCommand::AddTime { time: 42 },
        ))
        .unwrap();
        let now_id = m.agenda_items()[0].id.clone();
        m.start_timer(&now_id, 10).unwrap();

        let snap = m.snapshot();
        assert_eq!(snap.state, MeetingState::Running);
        assert_eq!(snap.agenda[0].subject, "Now");
        assert!(snap.agenda[0].timer_running);
        assert_eq!(snap.agenda[1].subject, "Later");
        assert!(snap.time_slots.is_empty());
        assert_eq!(snap.future_slots[0].proposed_time, 42);
        assert_eq!(snap.time_to_send, None);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["state"], 2);
        assert_eq!(json["meetingInfo"], "");
        assert_eq!(json["agenda"][0]["timerRunning"], true);
    }
}
