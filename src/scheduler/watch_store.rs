use async_trait::async_trait;
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::Result;
use crate::slot::{Slot, SlotRepository};
use crate::watcher::{Watcher, WatcherRepository};

/// Persistence the checker and scheduler depend on.
#[async_trait]
pub trait WatchStore: Send + Sync {
    async fn find_watcher(&self, id: Uuid) -> Result<Option<Watcher>>;

    async fn find_active(&self) -> Result<Vec<Watcher>>;

    async fn notified_keys(&self, watcher_id: Uuid) -> Result<HashSet<String>>;

    /// Records slots as notified; returns how many keys were new.
    async fn record_notified(
        &self,
        watcher_id: Uuid,
        doctor_code: &str,
        slots: &[Slot],
    ) -> Result<u64>;

    async fn touch_last_check(&self, watcher_id: Uuid) -> Result<()>;
}

/// `WatchStore` backed by the Postgres repositories.
pub struct PgWatchStore {
    watchers: WatcherRepository,
    slots: SlotRepository,
}

impl PgWatchStore {
    pub fn new(watchers: WatcherRepository, slots: SlotRepository) -> Self {
        Self { watchers, slots }
    }
}

#[async_trait]
impl WatchStore for PgWatchStore {
    async fn find_watcher(&self, id: Uuid) -> Result<Option<Watcher>> {
        self.watchers.find_by_id(id).await
    }

    async fn find_active(&self) -> Result<Vec<Watcher>> {
        self.watchers.find_active().await
    }

    async fn notified_keys(&self, watcher_id: Uuid) -> Result<HashSet<String>> {
        self.slots.find_keys_by_watcher(watcher_id).await
    }

    async fn record_notified(
        &self,
        watcher_id: Uuid,
        doctor_code: &str,
        slots: &[Slot],
    ) -> Result<u64> {
        self.slots.record_notified(watcher_id, doctor_code, slots).await
    }

    async fn touch_last_check(&self, watcher_id: Uuid) -> Result<()> {
        self.watchers.touch_last_check(watcher_id).await
    }
}
