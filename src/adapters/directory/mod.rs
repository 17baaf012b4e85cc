//! Directory and document registry adapters backed by JSON files.

pub mod static_directory;
pub mod static_documents;

pub use static_directory::{DirectoryData, StaticDirectory};
pub use static_documents::{DocumentData, StaticDocuments};
