use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, error, info};
use uuid::Uuid;

use super::watch_checker::{CheckOutcome, WatchChecker};
use crate::error::Result;

/// Keeps one repeating check job per active watcher.
#[derive(Clone)]
pub struct WatchScheduler {
    scheduler: JobScheduler,
    checker: Arc<WatchChecker>,
    jobs: Arc<DashMap<Uuid, Uuid>>,
    interval: Duration,
}

impl WatchScheduler {
    pub async fn new(
        checker: Arc<WatchChecker>,
        interval: Duration,
    ) -> std::result::Result<Self, JobSchedulerError> {
        Ok(Self {
            scheduler: JobScheduler::new().await?,
            checker,
            jobs: Arc::new(DashMap::new()),
            interval,
        })
    }

    pub async fn start(&self) -> Result<()> {
        self.scheduler.start().await?;
        info!("Watch scheduler started, checking every {:?}", self.interval);
        Ok(())
    }

    /// Schedules the watcher's repeating check, replacing any existing job.
    pub async fn schedule(&self, watcher_id: Uuid) -> Result<()> {
        let checker = self.checker.clone();
        let job = Job::new_repeated_async(self.interval, move |_uuid, _l| {
            let checker = checker.clone();
            Box::pin(async move {
                run_check(&checker, watcher_id).await;
            })
        })?;

        let job_id = self.scheduler.add(job).await?;
        if let Some(previous) = self.jobs.insert(watcher_id, job_id) {
            self.scheduler.remove(&previous).await?;
        }

        debug!("Scheduled watcher {} as job {}", watcher_id, job_id);
        Ok(())
    }

    /// Removes the watcher's job. Unscheduled watchers are ignored.
    pub async fn unschedule(&self, watcher_id: Uuid) -> Result<()> {
        if let Some((_, job_id)) = self.jobs.remove(&watcher_id) {
            self.scheduler.remove(&job_id).await?;
            debug!("Unscheduled watcher {}", watcher_id);
        }
        Ok(())
    }

    /// Runs a check right away in the background.
    pub fn trigger_now(&self, watcher_id: Uuid) {
        let checker = self.checker.clone();
        tokio::spawn(async move {
            run_check(&checker, watcher_id).await;
        });
        info!("Triggered immediate check for watcher {}", watcher_id);
    }

    pub fn scheduled_count(&self) -> usize {
        self.jobs.len()
    }

    /// Schedules every active watcher stored in the database.
    pub async fn load_active(&self) -> Result<usize> {
        let watchers = self.checker.store().find_active().await?;

        for watcher in &watchers {
            self.schedule(watcher.id).await?;
            info!("Loaded watcher {} - {}", watcher.id, watcher.doctor_name);
        }

        info!("Loaded {} active watcher(s)", watchers.len());
        Ok(watchers.len())
    }

    pub async fn shutdown(&self) -> Result<()> {
        let mut scheduler = self.scheduler.clone();
        scheduler.shutdown().await?;
        info!("Watch scheduler stopped");
        Ok(())
    }
}

async fn run_check(checker: &WatchChecker, watcher_id: Uuid) {
    match checker.check(watcher_id).await {
        Ok(CheckOutcome::Checked { found, notified }) => debug!(
            "Watcher {} checked: {} matching slot(s), {} notified",
            watcher_id, found, notified
        ),
        Ok(outcome) => debug!("Check of watcher {} finished: {:?}", watcher_id, outcome),
        Err(e) => error!("Error checking watcher {}: {}", watcher_id, e),
    }
}
