//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Referenced meeting, agenda item or proposed-time slot does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unrecognized command in the time-slot negotiation protocol. Nothing was mutated.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Meeting cannot be notified as configured (no roles, no owner).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Internal bug: an operation was called outside its precondition.
    /// Must be surfaced loudly, never swallowed.
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// Malformed request payload (missing or mistyped field).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Repository error: {0}")]
    Repo(String),

    #[error("Directory error: {0}")]
    Directory(String),

    #[error("Mail dispatch failed: {0}")]
    Mail(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DomainError {
    /// True for errors that indicate a programming mistake rather than bad input or I/O.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, DomainError::ContractViolation(_))
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Serialization(e.to_string())
    }
}
