//! Per-meeting exclusive locks. Every read-modify-write of a meeting (commands,
//! timer changes, the evaluate-then-send of a reminder) holds the meeting's lock
//! for its whole duration.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct MeetingLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl MeetingLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `meeting_id`. Released when the guard drops.
    pub async fn lock(&self, meeting_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.locks.lock().await;
            Arc::clone(map.entry(meeting_id.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    /// Drops lock entries nobody holds or waits for.
    pub async fn prune(&self) {
        let mut map = self.locks.lock().await;
        map.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}
