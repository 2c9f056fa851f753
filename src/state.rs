use crate::booking::BookingClient;
use crate::db::DbPool;
use crate::notification::NotificationDispatcher;
use crate::scheduler::{PgWatchStore, WatchChecker, WatchScheduler};
use crate::slot::SlotRepository;
use crate::watcher::{WatcherRepository, WatcherService};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio_cron_scheduler::JobSchedulerError;

pub const DEFAULT_BOOKING_BASE_URL: &str = "https://www.navstevalekara.sk";

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub watcher_repository: WatcherRepository,
    pub slot_repository: SlotRepository,
    pub watcher_service: WatcherService,
    pub watch_scheduler: WatchScheduler,
}

impl AppState {
    /// Wires repositories, the checker and the scheduler around a pool.
    /// The scheduler is created but not started.
    pub async fn build(db: DbPool, config: Arc<Config>) -> Result<Self, JobSchedulerError> {
        let watcher_repository = WatcherRepository::new(db.clone());
        let slot_repository = SlotRepository::new(db.clone());
        let booking_client = BookingClient::new(config.booking_base_url.clone());
        let dispatcher = NotificationDispatcher::new(config.mailjet.clone());
        let email_enabled = dispatcher.email_enabled();

        let store = PgWatchStore::new(watcher_repository.clone(), slot_repository.clone());
        let checker = Arc::new(WatchChecker::new(
            Arc::new(store),
            Arc::new(booking_client.clone()),
            Arc::new(dispatcher),
        ));
        let watch_scheduler = WatchScheduler::new(checker, config.check_interval).await?;

        let watcher_service = WatcherService::new(
            watcher_repository.clone(),
            slot_repository.clone(),
            booking_client,
            watch_scheduler.clone(),
            email_enabled,
        );

        Ok(Self {
            db,
            config,
            watcher_repository,
            slot_repository,
            watcher_service,
            watch_scheduler,
        })
    }
}

#[derive(Clone, Debug)]
pub struct MailjetConfig {
    pub api_key: String,
    pub secret_key: String,
    pub sender_email: String,
    pub sender_name: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub check_interval: Duration,
    pub booking_base_url: String,
    pub admin_token: Option<String>,
    pub mailjet: Option<MailjetConfig>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .context("PORT must be a number")?;

        let database_max_connections: u32 = env_or("DATABASE_MAX_CONNECTIONS", "5")
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a number")?;

        let check_interval_minutes: u64 = env_or("CHECK_INTERVAL_MINUTES", "5")
            .parse()
            .context("CHECK_INTERVAL_MINUTES must be a number")?;
        if check_interval_minutes == 0 {
            anyhow::bail!("CHECK_INTERVAL_MINUTES must be greater than zero");
        }

        Ok(Self {
            database_url,
            database_max_connections,
            host: env_or("HOST", "127.0.0.1"),
            port,
            check_interval: Duration::from_secs(check_interval_minutes * 60),
            booking_base_url: env_or("BOOKING_BASE_URL", DEFAULT_BOOKING_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            admin_token: non_empty_env("ADMIN_TOKEN"),
            mailjet: MailjetConfig::from_env(),
        })
    }
}

impl MailjetConfig {
    /// Email notifications are enabled only when key, secret and sender are all present.
    fn from_env() -> Option<Self> {
        Some(Self {
            api_key: non_empty_env("MAILJET_API_KEY")?,
            secret_key: non_empty_env("MAILJET_SECRET_KEY")?,
            sender_email: non_empty_env("MAILJET_SENDER_EMAIL")?,
            sender_name: env_or("MAILJET_SENDER_NAME", "Doctor Appointment Watcher"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
