//! Cross-cutting helpers: configuration and clock.

pub mod clock;
pub mod config;
