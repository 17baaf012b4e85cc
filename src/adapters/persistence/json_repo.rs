//! Implements MeetingRepoPort with one JSON file per meeting: `{base}/{id}.json`.
//!
//! Saves use the write-replace pattern (temp file, sync_all, rename) so a crash
//! mid-write never leaves a half-written meeting behind.

use crate::domain::{DomainError, Meeting};
use crate::ports::MeetingRepoPort;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

pub struct JsonRepo {
    base_dir: PathBuf,
}

impl JsonRepo {
    /// Creates the base directory if needed.
    pub async fn open(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| DomainError::Repo(format!("create {}: {}", base_dir.display(), e)))?;
        Ok(Self { base_dir })
    }

    /// Ids become file names, so only a conservative character set is accepted.
    fn meeting_path(&self, meeting_id: &str) -> Result<PathBuf, DomainError> {
        let valid = !meeting_id.is_empty()
            && meeting_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(DomainError::InvalidInput(format!(
                "meeting id '{}' is not storable",
                meeting_id
            )));
        }
        Ok(self.base_dir.join(format!("{}.json", meeting_id)))
    }
}

#[async_trait::async_trait]
impl MeetingRepoPort for JsonRepo {
    async fn load_meeting(&self, meeting_id: &str) -> Result<Option<Meeting>, DomainError> {
        let path = self.meeting_path(meeting_id)?;
        match fs::read_to_string(&path).await {
            Ok(s) => Ok(Some(serde_json::from_str(&s)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::Repo(format!("read {}: {}", path.display(), e))),
        }
    }

    async fn save_meeting(&self, meeting: &Meeting) -> Result<(), DomainError> {
        let path = self.meeting_path(&meeting.id)?;
        let json = serde_json::to_string_pretty(meeting)?;

        let temp_path = path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Repo(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::Repo(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Repo(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &path)
            .await
            .map_err(|e| DomainError::Repo(format!("atomic rename failed: {}", e)))?;
        debug!(meeting_id = %meeting.id, path = %path.display(), "meeting saved");
        Ok(())
    }

    async fn delete_meeting(&self, meeting_id: &str) -> Result<bool, DomainError> {
        let path = self.meeting_path(meeting_id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DomainError::Repo(format!("remove {}: {}", path.display(), e))),
        }
    }

    /// Sorted by id.
    async fn list_meeting_ids(&self) -> Result<Vec<String>, DomainError> {
        let mut entries = fs::read_dir(&self.base_dir)
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_meeting_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonRepo::open(dir.path()).await.unwrap();
        assert!(repo.load_meeting("nope").await.unwrap().is_none());
        assert!(!repo.delete_meeting("nope").await.unwrap());
    }

    #[tokio::test]
    async fn test_save_replaces_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonRepo::open(dir.path()).await.unwrap();
        let mut m = Meeting::new("m-1", "Weekly", "owner");
        repo.save_meeting(&m).await.unwrap();
        m.description = "second".into();
        repo.save_meeting(&m).await.unwrap();

        assert_eq!(repo.load_meeting("m-1").await.unwrap().unwrap(), m);
        assert!(!dir.path().join("m-1.json.tmp").exists());
        assert_eq!(repo.list_meeting_ids().await.unwrap(), vec!["m-1".to_string()]);
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonRepo::open(dir.path()).await.unwrap();
        assert!(matches!(
            repo.load_meeting("../etc/passwd").await,
            Err(DomainError::InvalidInput(_))
        ));
    }
}
