//! Mail adapters. Implement MailPort.

pub mod http_relay;
pub mod log_mailer;

pub use http_relay::HttpMailRelay;
pub use log_mailer::LogMailer;
