//! meeting-planner: meeting lifecycle, agenda ordering, time-slot voting and
//! at-most-once reminders, with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
