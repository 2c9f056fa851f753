use chrono::{Local, NaiveDate};
use dashmap::DashSet;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::watch_store::WatchStore;
use crate::booking::{parse_available_slots, week_offsets_for_dates, WeekSource};
use crate::error::AppError;
use crate::notification::{Notifier, SlotAlert};
use crate::slot::Slot;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error("Watcher {0} has incomplete notification settings")]
    InvalidChannel(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Watcher missing, inactive, or already being checked.
    Skipped,
    /// Every target date is in the past.
    NothingToCheck,
    Checked { found: usize, notified: usize },
}

/// Runs one scrape-and-notify pass for a watcher.
pub struct WatchChecker {
    store: Arc<dyn WatchStore>,
    weeks: Arc<dyn WeekSource>,
    notifier: Arc<dyn Notifier>,
    in_flight: DashSet<Uuid>,
}

struct InFlight<'a> {
    set: &'a DashSet<Uuid>,
    id: Uuid,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.id);
    }
}

impl WatchChecker {
    pub fn new(
        store: Arc<dyn WatchStore>,
        weeks: Arc<dyn WeekSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            weeks,
            notifier,
            in_flight: DashSet::new(),
        }
    }

    pub fn store(&self) -> &dyn WatchStore {
        self.store.as_ref()
    }

    pub async fn check(&self, watcher_id: Uuid) -> Result<CheckOutcome, CheckError> {
        if !self.in_flight.insert(watcher_id) {
            debug!("Watcher {} is already being checked", watcher_id);
            return Ok(CheckOutcome::Skipped);
        }
        let _guard = InFlight {
            set: &self.in_flight,
            id: watcher_id,
        };

        self.run_check(watcher_id).await
    }

    async fn run_check(&self, watcher_id: Uuid) -> Result<CheckOutcome, CheckError> {
        let Some(watcher) = self.store.find_watcher(watcher_id).await? else {
            debug!("Watcher {} no longer exists", watcher_id);
            return Ok(CheckOutcome::Skipped);
        };
        if !watcher.is_active {
            return Ok(CheckOutcome::Skipped);
        }

        info!("Checking watcher {} - {}", watcher.id, watcher.doctor_name);

        let today = Local::now().date_naive();
        let weeks = week_offsets_for_dates(&watcher.target_dates, today);
        if weeks.is_empty() {
            info!("Target dates of watcher {} are in the past, nothing to check", watcher.id);
            return Ok(CheckOutcome::NothingToCheck);
        }

        let mut available = Vec::new();
        for week in weeks {
            match self
                .weeks
                .fetch_week(&watcher.doctor_code, &watcher.doctor_url, week)
                .await
            {
                Ok(html) => available.extend(parse_available_slots(&html)),
                Err(e) => warn!("Failed to fetch week {} for watcher {}: {}", week, watcher.id, e),
            }
        }

        let matching = slots_on_dates(available, &watcher.target_dates);
        let known = self.store.notified_keys(watcher.id).await?;
        let new_slots = unseen_slots(&matching, &watcher.doctor_code, &known);

        let mut notified = 0;
        if new_slots.is_empty() {
            debug!("No new slots for watcher {}", watcher.id);
        } else {
            info!("Found {} new slot(s) for watcher {}", new_slots.len(), watcher.id);
            let channel = watcher.channel().ok_or(CheckError::InvalidChannel(watcher.id))?;
            let alert = SlotAlert::new(&watcher.doctor_name, &watcher.doctor_url, new_slots.clone());

            // Keys are recorded only after a successful send.
            match self.notifier.notify(&channel, &alert).await {
                Ok(()) => {
                    self.store
                        .record_notified(watcher.id, &watcher.doctor_code, &new_slots)
                        .await?;
                    notified = new_slots.len();
                }
                Err(e) => error!("Failed to notify watcher {}: {}", watcher.id, e),
            }
        }

        self.store.touch_last_check(watcher.id).await?;

        Ok(CheckOutcome::Checked {
            found: matching.len(),
            notified,
        })
    }
}

/// Distinct slots falling on one of the target dates, in chronological order.
pub fn slots_on_dates(
    slots: impl IntoIterator<Item = Slot>,
    target_dates: &[NaiveDate],
) -> Vec<Slot> {
    let targets: HashSet<&NaiveDate> = target_dates.iter().collect();
    slots
        .into_iter()
        .filter(|slot| targets.contains(&slot.date))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Slots whose deduplication key has not been recorded yet.
pub fn unseen_slots(slots: &[Slot], doctor_code: &str, known: &HashSet<String>) -> Vec<Slot> {
    slots
        .iter()
        .filter(|slot| !known.contains(&slot.key(doctor_code)))
        .copied()
        .collect()
}
