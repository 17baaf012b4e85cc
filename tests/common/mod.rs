#![allow(dead_code)]

use meeting_planner::adapters::directory::{
    DirectoryData, DocumentData, StaticDirectory, StaticDocuments,
};
use meeting_planner::adapters::mail::LogMailer;
use meeting_planner::adapters::persistence::MemoryRepo;
use meeting_planner::ports::{DirectoryPort, DocumentRef, MailPort, MeetingRepoPort};
use meeting_planner::usecases::{MeetingLocks, MeetingService, ReminderService};
use std::sync::Arc;
use std::time::Duration;

pub const T: i64 = 1_704_103_200_000; // 2024-01-01 10:00 UTC

pub struct Harness {
    pub repo: Arc<MemoryRepo>,
    pub mailer: Arc<LogMailer>,
    pub meetings: Arc<MeetingService>,
    pub reminders: Arc<ReminderService>,
}

pub fn directory_data() -> DirectoryData {
    serde_json::from_value(serde_json::json!({
        "users": [
            {
                "universal_id": "owner",
                "name": "Olive Owner",
                "email": "owner@example.com",
                "utc_offset_minutes": 60
            },
            {
                "universal_id": "ann",
                "name": "Ann",
                "email": "ann@example.com",
                "aliases": ["ann.smith@example.org"]
            }
        ],
        "roles": {
            "Members": ["owner", "ann", "bob"],
            "Board": ["owner"]
        }
    }))
    .unwrap()
}

pub fn document_data() -> DocumentData {
    DocumentData {
        documents: vec![DocumentRef {
            id: "doc-1".into(),
            name: "Budget draft".into(),
            url: "https://docs.example.com/doc-1".into(),
        }],
        topics: ["minutes-1".to_string()].into_iter().collect(),
    }
}

pub fn harness() -> Harness {
    harness_with_directory(directory_data())
}

pub fn harness_with_directory(data: DirectoryData) -> Harness {
    let repo = Arc::new(MemoryRepo::new());
    let mailer = Arc::new(LogMailer::new());
    let directory = Arc::new(StaticDirectory::new(data));
    let documents = Arc::new(StaticDocuments::new(document_data()));
    let locks = Arc::new(MeetingLocks::new());

    let meetings = Arc::new(MeetingService::new(
        Arc::clone(&repo) as Arc<dyn MeetingRepoPort>,
        Arc::clone(&directory) as Arc<dyn DirectoryPort>,
        documents,
        Arc::clone(&locks),
        "Members",
        "test-",
    ));
    let reminders = Arc::new(ReminderService::new(
        Arc::clone(&repo) as Arc<dyn MeetingRepoPort>,
        directory,
        Arc::clone(&mailer) as Arc<dyn MailPort>,
        locks,
        "Members",
        Duration::from_millis(10),
    ));
    Harness {
        repo,
        mailer,
        meetings,
        reminders,
    }
}
