//! Application configuration. Paths, store choice, reminder polling, mail relay.

use serde::Deserialize;

/// Default seconds between reminder polling cycles.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Role invited when a meeting names no participants and no valid target role.
pub const DEFAULT_ROLE: &str = "Members";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Root for the meeting store, directory and document files.
    /// Read from MEETING_PLANNER_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// "sqlite" (default) or "json". Read from MEETING_PLANNER_STORE.
    #[serde(default)]
    pub store: Option<String>,

    /// Reminder polling interval in seconds (default 60).
    /// Read from MEETING_PLANNER_POLL_INTERVAL_SECS.
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,

    /// HTTP mail relay endpoint. Unset means reminders are only logged.
    #[serde(default)]
    pub mail_relay_url: Option<String>,

    /// Bearer token for the mail relay, if it requires one.
    #[serde(default)]
    pub mail_relay_token: Option<String>,

    #[serde(default)]
    pub default_role: Option<String>,

    /// JSON file with users and roles. Defaults to `<data_dir>/directory.json`.
    #[serde(default)]
    pub directory_path: Option<String>,

    /// JSON file with documents and minutes topics. Defaults to `<data_dir>/documents.json`.
    #[serde(default)]
    pub documents_path: Option<String>,

    /// Prefix of calendar event UIDs.
    #[serde(default)]
    pub ics_uid_prefix: Option<String>,
}

/// Which meeting store backs the repo port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite,
    Json,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("MEETING_PLANNER"));
        if let Ok(path) = std::env::var("MEETING_PLANNER_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    pub fn data_dir_or_default(&self) -> String {
        self.data_dir.clone().unwrap_or_else(|| "./data".to_string())
    }

    /// Unknown values fall back to SQLite.
    pub fn store_kind(&self) -> StoreKind {
        match self.store.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("json") => StoreKind::Json,
            _ => StoreKind::Sqlite,
        }
    }

    /// Returns polling interval in seconds. Zero is treated as unset.
    pub fn poll_interval_secs_or_default(&self) -> u64 {
        self.poll_interval_secs
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
    }

    pub fn default_role_or_default(&self) -> String {
        self.default_role
            .clone()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_ROLE.to_string())
    }

    pub fn directory_path_or_default(&self) -> String {
        self.directory_path
            .clone()
            .unwrap_or_else(|| format!("{}/directory.json", self.data_dir_or_default()))
    }

    pub fn documents_path_or_default(&self) -> String {
        self.documents_path
            .clone()
            .unwrap_or_else(|| format!("{}/documents.json", self.data_dir_or_default()))
    }

    pub fn ics_uid_prefix_or_default(&self) -> String {
        self.ics_uid_prefix
            .clone()
            .unwrap_or_else(|| "meeting-planner".to_string())
    }

    /// True when reminders go out through the HTTP relay.
    pub fn is_mail_relay_configured(&self) -> bool {
        self.mail_relay_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}
