//! Infrastructure adapters. Implement outbound ports.
//!
//! Meeting stores, mail dispatch, directory files. Map errors to DomainError.

pub mod directory;
pub mod mail;
pub mod persistence;
