//! Time-slot negotiation. Two collections of proposed times ("current" and
//! "future"), one shared command set. Votes are advisory.
//!
//! Wire form of a command:
//!
//! ```json
//! {
//!   "action": "SetValue", "isCurrent": true, "time": 1543243253400,
//!   "user": "ann@example.com", "value": 3
//! }
//! ```

use super::entities::{Meeting, ProposedTime, SlotList};
use super::errors::DomainError;
use serde::Deserialize;

impl SlotList {
    pub fn from_is_current(is_current: bool) -> Self {
        if is_current {
            SlotList::Current
        } else {
            SlotList::Future
        }
    }

    /// Field name the list is stored and exported under.
    pub fn field_name(self) -> &'static str {
        match self {
            SlotList::Current => "timeSlots",
            SlotList::Future => "futureSlots",
        }
    }
}

/// A single negotiation command. Applied atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotCommand {
    /// Set `user`'s vote on the slot at `time`. The slot must exist.
    SetValue { time: i64, user: String, value: i32 },
    /// Append a slot. Duplicates are tolerated.
    AddTime { time: i64 },
    /// Remove every slot at `time`.
    RemoveTime { time: i64 },
    /// Append a slot at `new_time`. The slot at `time` is left in place.
    ChangeTime { time: Option<i64>, new_time: i64 },
    /// Clear `user`'s vote in every slot.
    RemoveUser { user: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRequest {
    pub list: SlotList,
    pub command: SlotCommand,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSlotRequest {
    action: String,
    is_current: bool,
    time: Option<i64>,
    new_time: Option<i64>,
    user: Option<String>,
    value: Option<i32>,
}

fn required<T>(field: Option<T>, name: &str, action: &str) -> Result<T, DomainError> {
    field.ok_or_else(|| DomainError::InvalidInput(format!("{} requires '{}'", action, name)))
}

impl SlotRequest {
    pub fn new(list: SlotList, command: SlotCommand) -> Self {
        Self { list, command }
    }

    /// Parses the wire form. Unknown actions are `UnsupportedOperation`.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, DomainError> {
        let wire: WireSlotRequest = serde_json::from_value(value.clone())
            .map_err(|e| DomainError::InvalidInput(e.to_string()))?;
        let action = wire.action.as_str();
        let command = match action {
            "SetValue" => SlotCommand::SetValue {
                time: required(wire.time, "time", action)?,
                user: required(wire.user, "user", action)?,
                value: required(wire.value, "value", action)?,
            },
            "AddTime" => SlotCommand::AddTime {
                time: required(wire.time, "time", action)?,
            },
            "RemoveTime" => SlotCommand::RemoveTime {
                time: required(wire.time, "time", action)?,
            },
            "ChangeTime" => SlotCommand::ChangeTime {
                time: wire.time,
                new_time: required(wire.new_time, "newTime", action)?,
            },
            "RemoveUser" => SlotCommand::RemoveUser {
                user: required(wire.user, "user", action)?,
            },
            other => {
                return Err(DomainError::UnsupportedOperation(format!(
                    "proposed time command '{}' is not understood",
                    other
                )));
            }
        };
        Ok(Self::new(SlotList::from_is_current(wire.is_current), command))
    }
}

impl ProposedTime {
    pub fn set_person_value(&mut self, user: &str, value: i32) {
        self.people.insert(user.to_string(), value);
    }

    pub fn clear_person_value(&mut self, user: &str) -> bool {
        self.people.remove(user).is_some()
    }

    pub fn person_value(&self, user: &str) -> Option<i32> {
        self.people.get(user).copied()
    }
}

impl Meeting {
    pub fn slots(&self, list: SlotList) -> &[ProposedTime] {
        match list {
            SlotList::Current => &self.time_slots,
            SlotList::Future => &self.future_slots,
        }
    }

    fn slots_mut(&mut self, list: SlotList) -> &mut Vec<ProposedTime> {
        match list {
            SlotList::Current => &mut self.time_slots,
            SlotList::Future => &mut self.future_slots,
        }
    }

    /// Replaces a whole list (bulk update from the UI).
    pub fn replace_slots(&mut self, list: SlotList, slots: Vec<ProposedTime>) {
        *self.slots_mut(list) = slots;
    }

    pub fn find_slot(&self, list: SlotList, time: i64) -> Option<&ProposedTime> {
        self.slots(list).iter().find(|s| s.proposed_time == time)
    }

    /// Returns the slot at `time`, creating it first if needed. Keeps timestamps unique
    /// for callers that want that guarantee.
    pub fn find_or_create_slot(&mut self, list: SlotList, time: i64) -> &mut ProposedTime {
        let slots = self.slots_mut(list);
        let idx = match slots.iter().position(|s| s.proposed_time == time) {
            Some(idx) => idx,
            None => {
                slots.push(ProposedTime::new(time));
                slots.len() - 1
            }
        };
        &mut slots[idx]
    }

    pub fn act_on_proposed_time(&mut self, request: &SlotRequest) -> Result<(), DomainError> {
        let list = request.list;
        match &request.command {
            SlotCommand::SetValue { time, user, value } => {
                let meeting_id = self.id.clone();
                let slot = self
                    .slots_mut(list)
                    .iter_mut()
                    .find(|s| s.proposed_time == *time)
                    .ok_or_else(|| {
                        DomainError::NotFound(format!(
                            "meeting '{}' has no {} time of {}",
                            meeting_id,
                            list.field_name(),
                            time
                        ))
                    })?;
                slot.set_person_value(user, *value);
            }
            SlotCommand::AddTime { time } => {
                self.slots_mut(list).push(ProposedTime::new(*time));
            }
            SlotCommand::RemoveTime { time } => {
                self.slots_mut(list).retain(|s| s.proposed_time != *time);
            }
            SlotCommand::ChangeTime { new_time, .. } => {
                self.slots_mut(list).push(ProposedTime::new(*new_time));
            }
            SlotCommand::RemoveUser { user } => {
                for slot in self.slots_mut(list).iter_mut() {
                    slot.clear_person_value(user);
                }
            }
        }
        Ok(())
    }
}
