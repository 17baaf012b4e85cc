//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod agenda;
pub mod calendar;
pub mod entities;
pub mod errors;
pub mod lifecycle;
pub mod notes;
pub mod reminder;
pub mod snapshot;
pub mod time_slots;
pub mod timer;
pub mod update;

pub use agenda::agenda_order;
pub use calendar::CalendarEvent;
pub use entities::{
    AgendaItem, Meeting, MeetingState, MeetingType, ProposedTime, RollCallEntry, SlotList,
    UserProfile,
};
pub use errors::DomainError;
pub use lifecycle::{Recipients, sort_chrono};
pub use notes::{AgendaNote, NoteEdit};
pub use reminder::ReminderMail;
pub use snapshot::{AgendaItemView, MeetingSnapshot};
pub use time_slots::{SlotCommand, SlotRequest};
pub use update::{AgendaItemUpdate, MeetingUpdate, NEW_ITEM_ID, UpdateOutcome};
