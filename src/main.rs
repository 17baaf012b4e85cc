//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run the reminder poller.
//! No business logic here.

use dotenv::dotenv;
use meeting_planner::adapters::directory::{StaticDirectory, StaticDocuments};
use meeting_planner::adapters::mail::{HttpMailRelay, LogMailer};
use meeting_planner::adapters::persistence::{JsonRepo, SqliteRepo};
use meeting_planner::ports::{DirectoryPort, DocumentRegistryPort, MailPort, MeetingRepoPort};
use meeting_planner::shared::config::{AppConfig, StoreKind};
use meeting_planner::usecases::{MeetingLocks, MeetingService, ReminderService};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "config could not be loaded; using defaults");
        AppConfig::default()
    });

    let data_path = PathBuf::from(cfg.data_dir_or_default());
    info!(path = %data_path.display(), "data directory");

    // --- Meeting store ---
    let repo: Arc<dyn MeetingRepoPort> = match cfg.store_kind() {
        StoreKind::Sqlite => Arc::new(
            SqliteRepo::connect(&data_path)
                .await
                .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?,
        ),
        StoreKind::Json => Arc::new(
            JsonRepo::open(data_path.join("meetings"))
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?,
        ),
    };

    // --- Directory and documents ---
    let directory: Arc<dyn DirectoryPort> = Arc::new(
        StaticDirectory::load(cfg.directory_path_or_default())
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?,
    );
    let documents: Arc<dyn DocumentRegistryPort> = Arc::new(
        StaticDocuments::load(cfg.documents_path_or_default())
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?,
    );

    // --- Mail ---
    let relay_url = cfg
        .mail_relay_url
        .clone()
        .filter(|_| cfg.is_mail_relay_configured());
    let mail: Arc<dyn MailPort> = match relay_url {
        Some(url) => {
            info!(url = %url, "reminders go through the HTTP mail relay");
            Arc::new(
                HttpMailRelay::new(url, cfg.mail_relay_token.clone())
                    .map_err(|e| anyhow::anyhow!("{}", e))?,
            )
        }
        None => {
            warn!("MEETING_PLANNER_MAIL_RELAY_URL not set; reminders are only logged");
            Arc::new(LogMailer::new())
        }
    };

    // --- Services (one lock table shared by commands and the poller) ---
    let locks = Arc::new(MeetingLocks::new());
    let default_role = cfg.default_role_or_default();

    let meetings = MeetingService::new(
        Arc::clone(&repo),
        Arc::clone(&directory),
        documents,
        Arc::clone(&locks),
        default_role.clone(),
        cfg.ics_uid_prefix_or_default(),
    );
    let listed = meetings
        .list_meetings()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    info!(meetings = listed.len(), "meeting store ready");

    let poll_secs = cfg.poll_interval_secs_or_default();
    let reminders = ReminderService::new(
        repo,
        directory,
        mail,
        locks,
        default_role,
        Duration::from_secs(poll_secs),
    );

    tokio::select! {
        res = reminders.run_loop() => res.map_err(|e| anyhow::anyhow!("{}", e))?,
        _ = tokio::signal::ctrl_c() => info!("shutdown requested"),
    }

    Ok(())
}
