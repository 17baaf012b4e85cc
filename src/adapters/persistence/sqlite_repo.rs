//! SQLite-backed meeting store via libsql. Implements MeetingRepoPort.
//!
//! One `meetings` row per meeting. The whole graph (agenda, slots, votes, timers) is kept
//! as one JSON document in `graph`, so a meeting always loads and saves as a unit.
//! `state` and `start_time` are duplicated into columns for listing.

use crate::domain::{DomainError, Meeting};
use crate::ports::MeetingRepoPort;
use libsql::{Database, params};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const MEETINGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS meetings (
    id TEXT PRIMARY KEY,
    state INTEGER NOT NULL,
    start_time INTEGER NOT NULL DEFAULT 0,
    graph TEXT NOT NULL,
    updated_at INTEGER NOT NULL
)"#;
const MEETINGS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_meetings_start ON meetings (start_time DESC)";

/// SQLite meeting store. One database file (meetings.db) in the given base directory.
pub struct SqliteRepo {
    db: Database,
    db_path: PathBuf,
}

impl SqliteRepo {
    /// Connect to (or create) the database and ensure the schema exists.
    /// Call once at startup; the repo is safe to share via Arc.
    ///
    /// WAL mode with synchronous=NORMAL: concurrent readers, one writer.
    pub async fn connect(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let base = base_dir.as_ref();
        std::fs::create_dir_all(base).map_err(|e| DomainError::Repo(e.to_string()))?;
        let db_path = base.join("meetings.db");
        let path_str = db_path.to_string_lossy();
        let db = libsql::Builder::new_local(path_str.as_ref())
            .build()
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        let conn = db.connect().map_err(|e| DomainError::Repo(e.to_string()))?;

        // PRAGMA returns a row; consume it (execute fails when rows are returned).
        for pragma in ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"] {
            let mut rows = conn
                .query(pragma, ())
                .await
                .map_err(|e| DomainError::Repo(format!("{} failed: {}", pragma, e)))?;
            while rows
                .next()
                .await
                .map_err(|e| DomainError::Repo(e.to_string()))?
                .is_some()
            {}
        }

        conn.execute(MEETINGS_TABLE, ())
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        conn.execute(MEETINGS_INDEX, ())
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;

        info!(path = %db_path.display(), "SQLite meeting store connected (WAL)");

        Ok(Self { db, db_path })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn conn(&self) -> Result<libsql::Connection, DomainError> {
        self.db.connect().map_err(|e| DomainError::Repo(e.to_string()))
    }
}

#[async_trait::async_trait]
impl MeetingRepoPort for SqliteRepo {
    async fn load_meeting(&self, meeting_id: &str) -> Result<Option<Meeting>, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query(
                "SELECT graph FROM meetings WHERE id = ?1",
                params![meeting_id],
            )
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?
        {
            let graph: String = row.get(0).map_err(|e| DomainError::Repo(e.to_string()))?;
            Ok(Some(serde_json::from_str(&graph)?))
        } else {
            Ok(None)
        }
    }

    async fn save_meeting(&self, meeting: &Meeting) -> Result<(), DomainError> {
        let graph = serde_json::to_string(meeting)?;
        let now = chrono::Utc::now().timestamp_millis();
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO meetings (id, state, start_time, graph, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (id) DO UPDATE SET
                state = excluded.state,
                start_time = excluded.start_time,
                graph = excluded.graph,
                updated_at = excluded.updated_at
            "#,
            params![
                meeting.id.as_str(),
                i64::from(meeting.state().code()),
                meeting.start_time(),
                graph,
                now
            ],
        )
        .await
        .map_err(|e| DomainError::Repo(e.to_string()))?;
        debug!(meeting_id = %meeting.id, "meeting saved");
        Ok(())
    }

    async fn delete_meeting(&self, meeting_id: &str) -> Result<bool, DomainError> {
        let conn = self.conn()?;
        let affected = conn
            .execute("DELETE FROM meetings WHERE id = ?1", params![meeting_id])
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        Ok(affected > 0)
    }

    async fn list_meeting_ids(&self) -> Result<Vec<String>, DomainError> {
        let conn = self.conn()?;
        let mut rows = conn
            .query("SELECT id FROM meetings ORDER BY start_time DESC, id", ())
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        let mut ids = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?
        {
            let id: String = row.get(0).map_err(|e| DomainError::Repo(e.to_string()))?;
            ids.push(id);
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AgendaItem, MeetingState};

    #[tokio::test]
    async fn test_save_load_delete() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteRepo::connect(dir.path()).await.unwrap();

        let mut m = Meeting::new("m1", "Weekly", "owner");
        m.set_start_time(1_700_000_000_000);
        m.set_state(MeetingState::Planning);
        m.push_agenda_item(AgendaItem::new("a", "Budget"));
        repo.save_meeting(&m).await.unwrap();

        m.name = "Weekly sync".into();
        repo.save_meeting(&m).await.unwrap();

        let loaded = repo.load_meeting("m1").await.unwrap().unwrap();
        assert_eq!(loaded, m);
        assert_eq!(repo.list_meeting_ids().await.unwrap(), vec!["m1".to_string()]);

        assert!(repo.delete_meeting("m1").await.unwrap());
        assert!(!repo.delete_meeting("m1").await.unwrap());
        assert!(repo.load_meeting("m1").await.unwrap().is_none());
    }
}
