//! Port traits. API boundaries for the hexagon.
//!
//! - Inbound: Called by the HTTP/UI layer into the application
//! - Outbound: Called by the application into infrastructure

pub mod inbound;
pub mod outbound;

pub use inbound::MeetingApi;
pub use outbound::{DirectoryPort, DocumentRef, DocumentRegistryPort, MailPort, MeetingRepoPort};
