//! File-backed document and minutes-topic registry. Implements DocumentRegistryPort.
//!
//! JSON shape: `{ "documents": [DocumentRef...], "topics": ["minutes-id", ...] }`.

use crate::domain::DomainError;
use crate::ports::{DocumentRef, DocumentRegistryPort};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct DocumentData {
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
    #[serde(default)]
    pub topics: BTreeSet<String>,
}

pub struct StaticDocuments {
    data: DocumentData,
}

impl StaticDocuments {
    pub fn new(data: DocumentData) -> Self {
        Self { data }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let data: DocumentData = match tokio::fs::read_to_string(path).await {
            Ok(s) => serde_json::from_str(&s)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "document registry not found; starting empty");
                DocumentData::default()
            }
            Err(e) => {
                return Err(DomainError::Directory(format!(
                    "read {}: {}",
                    path.display(),
                    e
                )));
            }
        };
        info!(
            documents = data.documents.len(),
            topics = data.topics.len(),
            "document registry loaded"
        );
        Ok(Self::new(data))
    }
}

#[async_trait::async_trait]
impl DocumentRegistryPort for StaticDocuments {
    async fn document(&self, doc_id: &str) -> Result<Option<DocumentRef>, DomainError> {
        Ok(self.data.documents.iter().find(|d| d.id == doc_id).cloned())
    }

    async fn topic_exists(&self, topic_id: &str) -> Result<bool, DomainError> {
        Ok(self.data.topics.contains(topic_id))
    }
}
