use crate::error::Result;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;
use super::slot_models::{NotifiedSlot, Slot};

#[derive(Clone)]
pub struct SlotRepository {
    pool: PgPool,
}

impl SlotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_keys_by_watcher(&self, watcher_id: Uuid) -> Result<HashSet<String>> {
        let keys: Vec<String> =
            sqlx::query_scalar("SELECT slot_key FROM notified_slots WHERE watcher_id = $1")
                .bind(watcher_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(keys.into_iter().collect())
    }

    pub async fn find_recent_by_watcher(
        &self,
        watcher_id: Uuid,
        limit: i64,
    ) -> Result<Vec<NotifiedSlot>> {
        let slots = sqlx::query_as::<_, NotifiedSlot>(
            "SELECT * FROM notified_slots WHERE watcher_id = $1
             ORDER BY notified_at DESC, id DESC
             LIMIT $2"
        )
        .bind(watcher_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(slots)
    }

    pub async fn find_all_by_watcher(&self, watcher_id: Uuid) -> Result<Vec<NotifiedSlot>> {
        let slots = sqlx::query_as::<_, NotifiedSlot>(
            "SELECT * FROM notified_slots WHERE watcher_id = $1 ORDER BY notified_at DESC, id DESC"
        )
        .bind(watcher_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(slots)
    }

    /// Records the given slots as notified in a single transaction.
    /// Keys that already exist for the watcher are left untouched.
    pub async fn record_notified(
        &self,
        watcher_id: Uuid,
        doctor_code: &str,
        slots: &[Slot],
    ) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for slot in slots {
            let result = sqlx::query(
                "INSERT INTO notified_slots (watcher_id, slot_key, slot_date, slot_time)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (watcher_id, slot_key) DO NOTHING"
            )
            .bind(watcher_id)
            .bind(slot.key(doctor_code))
            .bind(slot.date)
            .bind(slot.time_label())
            .execute(&mut *tx)
            .await?;

            inserted += result.rows_affected();
        }

        tx.commit().await?;

        Ok(inserted)
    }

    pub async fn count_all(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notified_slots")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
