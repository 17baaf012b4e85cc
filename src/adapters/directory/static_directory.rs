//! File-backed user and role directory. Implements DirectoryPort.
//!
//! Loaded once from a JSON file shaped like:
//! `{ "users": [UserProfile...], "roles": { "Members": ["ann", "bob"] } }`.
//! A missing file yields an empty directory.

use crate::domain::{DomainError, UserProfile};
use crate::ports::DirectoryPort;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct DirectoryData {
    #[serde(default)]
    pub users: Vec<UserProfile>,
    #[serde(default)]
    pub roles: BTreeMap<String, Vec<String>>,
}

pub struct StaticDirectory {
    data: DirectoryData,
}

impl StaticDirectory {
    pub fn new(data: DirectoryData) -> Self {
        Self { data }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let data = match tokio::fs::read_to_string(path).await {
            Ok(s) => serde_json::from_str(&s)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "directory file not found; starting empty");
                DirectoryData::default()
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
            users = data.users.len(),
            roles = data.roles.len(),
            "directory loaded"
        );
        Ok(Self::new(data))
    }
}

#[async_trait::async_trait]
impl DirectoryPort for StaticDirectory {
    async fn role_names(&self) -> Result<Vec<String>, DomainError> {
        Ok(self.data.roles.keys().cloned().collect())
    }

    async fn role_members(&self, role: &str) -> Result<Option<Vec<String>>, DomainError> {
        Ok(self.data.roles.get(role).cloned())
    }

    async fn user(&self, id: &str) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.data.users.iter().find(|u| u.has_any_id(id)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> StaticDirectory {
        let data: DirectoryData = serde_json::from_value(serde_json::json!({
            "users": [{
                "universal_id": "ann",
                "email": "ann@example.com",
                "aliases": ["Ann.Smith@example.org"],
                "utc_offset_minutes": 120
            }],
            "roles": { "Members": ["ann", "bob"] }
        }))
        .unwrap();
        StaticDirectory::new(data)
    }

    #[tokio::test]
    async fn test_user_by_alias() {
        let dir = directory();
        let u = dir.user("ann.smith@example.org").await.unwrap().unwrap();
        assert_eq!(u.universal_id, "ann");
        assert_eq!(u.utc_offset_minutes, 120);
        assert!(dir.user("carol").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_roles() {
        let dir = directory();
        assert_eq!(dir.role_names().await.unwrap(), vec!["Members".to_string()]);
        assert_eq!(dir.role_members("Members").await.unwrap().unwrap().len(), 2);
        assert!(dir.role_members("Board").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = StaticDirectory::load(tmp.path().join("none.json")).await.unwrap();
        assert!(dir.role_names().await.unwrap().is_empty());
    }
}
