use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A bookable appointment time exposed by the booking site.
///
/// Ordering is chronological (date first, then time), which is also the
/// order slots are listed in notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl Slot {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// Deduplication key, unique per doctor, date and time.
    pub fn key(&self, doctor_code: &str) -> String {
        format!("{}:{}", doctor_code, self)
    }

    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn time_label(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.date_label(), self.time_label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct NotifiedSlot {
    pub id: i64,
    pub watcher_id: Uuid,
    pub slot_key: String,
    pub slot_date: NaiveDate,
    pub slot_time: String,
    pub notified_at: DateTime<Utc>,
}
