//! In-memory stand-ins for the checker's store, booking site and notifier.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use super::watch_store::WatchStore;
use crate::booking::{booking_client::BookingError, WeekSource};
use crate::error::Result;
use crate::notification::{NotificationChannel, Notifier, SlotAlert};
use crate::notification::senders::SenderError;
use crate::slot::Slot;
use crate::watcher::Watcher;

pub fn watcher(target_dates: Vec<NaiveDate>) -> Watcher {
    Watcher {
        id: Uuid::new_v4(),
        doctor_name: "MUDr. Jana Novakova".to_string(),
        doctor_url: "https://www.navstevalekara.sk/lekar/jana-novakova-d15313.html".to_string(),
        doctor_code: "15313".to_string(),
        target_dates,
        notification_type: "telegram".to_string(),
        telegram_bot_token: Some("123:abc".to_string()),
        telegram_chat_id: Some("42".to_string()),
        email: None,
        is_active: true,
        last_check_at: None,
        created_at: Utc::now(),
    }
}

/// Availability fragment listing the given `(date, time)` pairs as open.
pub fn week_html(slots: &[(NaiveDate, &str)]) -> String {
    let links: String = slots
        .iter()
        .map(|(date, time)| {
            format!(
                r#"<a href="javascript:;" onclick="get_order('{}', 1, '{}', 20, false)">{}</a>"#,
                date.format("%Y-%m-%d"),
                time,
                time
            )
        })
        .collect();
    format!(r#"<div class="day-col">{}</div>"#, links)
}

#[derive(Default)]
pub struct MemoryStore {
    pub watchers: Mutex<HashMap<Uuid, Watcher>>,
    pub keys: Mutex<HashMap<Uuid, HashSet<String>>>,
    pub touched: Mutex<Vec<Uuid>>,
}

impl MemoryStore {
    pub fn with_watcher(watcher: Watcher) -> Self {
        let store = Self::default();
        store.watchers.lock().unwrap().insert(watcher.id, watcher);
        store
    }

    pub fn keys_of(&self, watcher_id: Uuid) -> HashSet<String> {
        self.keys
            .lock()
            .unwrap()
            .get(&watcher_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn touch_count(&self, watcher_id: Uuid) -> usize {
        self.touched
            .lock()
            .unwrap()
            .iter()
            .filter(|id| **id == watcher_id)
            .count()
    }
}

#[async_trait]
impl WatchStore for MemoryStore {
    async fn find_watcher(&self, id: Uuid) -> Result<Option<Watcher>> {
        Ok(self.watchers.lock().unwrap().get(&id).cloned())
    }

    async fn find_active(&self) -> Result<Vec<Watcher>> {
        Ok(self
            .watchers
            .lock()
            .unwrap()
            .values()
            .filter(|w| w.is_active)
            .cloned()
            .collect())
    }

    async fn notified_keys(&self, watcher_id: Uuid) -> Result<HashSet<String>> {
        Ok(self.keys_of(watcher_id))
    }

    async fn record_notified(
        &self,
        watcher_id: Uuid,
        doctor_code: &str,
        slots: &[Slot],
    ) -> Result<u64> {
        let mut keys = self.keys.lock().unwrap();
        let entry = keys.entry(watcher_id).or_default();
        let inserted = slots
            .iter()
            .filter(|slot| entry.insert(slot.key(doctor_code)))
            .count();
        Ok(inserted as u64)
    }

    async fn touch_last_check(&self, watcher_id: Uuid) -> Result<()> {
        self.touched.lock().unwrap().push(watcher_id);
        Ok(())
    }
}

/// Serves the same fragment for every week, or fails every request.
pub struct StaticWeeks {
    html: Option<String>,
    pub calls: AtomicUsize,
}

impl StaticWeeks {
    pub fn serving(html: String) -> Self {
        Self {
            html: Some(html),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            html: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl WeekSource for StaticWeeks {
    async fn fetch_week(
        &self,
        _doctor_code: &str,
        _doctor_url: &str,
        _week_offset: u32,
    ) -> std::result::Result<String, BookingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.html
            .clone()
            .ok_or(BookingError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub fail: bool,
    pub sent: Mutex<Vec<SlotAlert>>,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        _channel: &NotificationChannel,
        alert: &SlotAlert,
    ) -> std::result::Result<(), SenderError> {
        if self.fail {
            return Err(SenderError::SendFailed("telegram is down".to_string()));
        }
        self.sent.lock().unwrap().push(alert.clone());
        Ok(())
    }
}
