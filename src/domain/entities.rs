//! Domain entities. Pure data structures for the core business.
//!
//! No storage/mail types here. Behaviour lives in the sibling modules
//! (`lifecycle`, `agenda`, `time_slots`, `timer`, `reminder`), which keep the
//! cross-field invariants behind guarded mutators; the fields involved are
//! crate-private.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Position given to a freshly created agenda item so that it sorts after everything.
pub const NEW_ITEM_POSITION: i32 = 99999;

/// Number shown for spacer items.
pub const SPACER_NUMBER: i32 = -1;

/// Lifecycle state. Stored as its numeric code (0..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MeetingState {
    #[default]
    Draft,
    Planning,
    Running,
    Completed,
}

impl MeetingState {
    pub fn code(self) -> u8 {
        match self {
            MeetingState::Draft => 0,
            MeetingState::Planning => 1,
            MeetingState::Running => 2,
            MeetingState::Completed => 3,
        }
    }
}

impl TryFrom<u8> for MeetingState {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(MeetingState::Draft),
            1 => Ok(MeetingState::Planning),
            2 => Ok(MeetingState::Running),
            3 => Ok(MeetingState::Completed),
            other => Err(format!("unknown meeting state {}", other)),
        }
    }
}

impl From<MeetingState> for u8 {
    fn from(s: MeetingState) -> u8 {
        s.code()
    }
}

impl std::fmt::Display for MeetingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MeetingState::Draft => "draft",
            MeetingState::Planning => "planning",
            MeetingState::Running => "running",
            MeetingState::Completed => "completed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MeetingType {
    Circle,
    Operational,
}

impl TryFrom<u8> for MeetingType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(MeetingType::Circle),
            2 => Ok(MeetingType::Operational),
            other => Err(format!("unknown meeting type {}", other)),
        }
    }
}

impl From<MeetingType> for u8 {
    fn from(t: MeetingType) -> u8 {
        match t {
            MeetingType::Circle => 1,
            MeetingType::Operational => 2,
        }
    }
}

/// Elapsed-time bookkeeping for one agenda item. All values are epoch millis / millis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTimer {
    pub(crate) running: bool,
    pub(crate) start: i64,
    pub(crate) elapsed: i64,
}

/// A single entry of a meeting agenda.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaItem {
    pub id: String,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    /// 1-based, dense after renumbering.
    pub position: i32,
    /// Sequential among non-spacer items; `SPACER_NUMBER` for spacers.
    #[serde(default)]
    pub number: i32,
    #[serde(default)]
    pub proposed: bool,
    #[serde(default)]
    pub spacer: bool,
    /// Minutes.
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub presenters: Vec<String>,
    /// Universal ids of linked documents.
    #[serde(default)]
    pub doc_list: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<String>,
    /// Minutes text taken while the item was discussed.
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub(crate) timer: ItemTimer,
}

impl AgendaItem {
    pub fn new(id: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            description: String::new(),
            position: NEW_ITEM_POSITION,
            number: 0,
            proposed: false,
            spacer: false,
            duration: 0,
            presenters: Vec::new(),
            doc_list: Vec::new(),
            action_items: Vec::new(),
            notes: String::new(),
            timer: ItemTimer::default(),
        }
    }
}

/// Selects one of the two proposed-time collections of a meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotList {
    Current,
    Future,
}

/// A candidate meeting time with per-participant votes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedTime {
    /// Epoch millis.
    pub proposed_time: i64,
    /// participant id -> vote. Magnitude is caller-defined.
    #[serde(default)]
    pub people: BTreeMap<String, i32>,
}

impl ProposedTime {
    pub fn new(proposed_time: i64) -> Self {
        Self {
            proposed_time,
            people: BTreeMap::new(),
        }
    }
}

/// Per-person attendance intent collected before the meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollCallEntry {
    pub uid: String,
    /// "yes", "no", "maybe" (free text from the UI).
    #[serde(default)]
    pub attend: String,
    #[serde(default)]
    pub situation: String,
}

/// A user as resolved by the directory. `aliases` holds every id that refers to the
/// same person (e.g. several e-mail addresses).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub universal_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Offset from UTC used when formatting dates for this user.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl UserProfile {
    /// Bare profile for an id the directory knows nothing about.
    pub fn from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            email: id.clone(),
            name: id.clone(),
            universal_id: id,
            ..Default::default()
        }
    }

    pub fn has_any_id(&self, id: &str) -> bool {
        self.universal_id.eq_ignore_ascii_case(id)
            || self.email.eq_ignore_ascii_case(id)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(id))
    }
}

/// A scheduled group meeting and everything it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// User the reminder appears to come from.
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub(crate) state: MeetingState,
    #[serde(default)]
    pub meeting_type: Option<MeetingType>,
    /// Epoch millis, 0 = unscheduled.
    #[serde(default)]
    pub(crate) start_time: i64,
    /// Minutes.
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub target_role: String,
    #[serde(default)]
    pub participants: Vec<String>,
    /// Minutes before start to send the reminder; <= 0 disables it.
    #[serde(default)]
    pub reminder_advance: i32,
    /// Epoch millis of the last reminder, 0 = never.
    #[serde(default)]
    pub(crate) reminder_sent: i64,
    #[serde(default)]
    pub(crate) attended: Vec<String>,
    #[serde(default)]
    pub roll_call: Vec<RollCallEntry>,
    #[serde(default)]
    pub(crate) agenda: Vec<AgendaItem>,
    #[serde(default)]
    pub(crate) time_slots: Vec<ProposedTime>,
    #[serde(default)]
    pub(crate) future_slots: Vec<ProposedTime>,
    #[serde(default)]
    pub previous_meeting: Option<String>,
    #[serde(default)]
    pub minutes_id: Option<String>,
    /// Special meeting that only holds backlog agenda items; never listed as a meeting.
    #[serde(default)]
    pub backlog: bool,
}
