//! Application use cases. Orchestrate domain logic via ports.

pub mod meeting_locks;
pub mod meeting_service;
pub mod reminder_service;

pub use meeting_locks::MeetingLocks;
pub use meeting_service::MeetingService;
pub use reminder_service::{CycleStats, ReminderService};
