use crate::error::Result;
use crate::notification::NotificationChannel;
use sqlx::PgPool;
use uuid::Uuid;
use super::watcher_models::{NewWatcher, Watcher, WatcherSummary};

#[derive(Clone)]
pub struct WatcherRepository {
    pool: PgPool,
}

impl WatcherRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_watcher: &NewWatcher) -> Result<Watcher> {
        let (bot_token, chat_id, email) = match &new_watcher.channel {
            NotificationChannel::Telegram { bot_token, chat_id } => {
                (Some(bot_token.as_str()), Some(chat_id.as_str()), None)
            }
            NotificationChannel::Email { address } => (None, None, Some(address.as_str())),
        };

        let watcher = sqlx::query_as::<_, Watcher>(
            "INSERT INTO watchers (doctor_name, doctor_url, doctor_code, target_dates,
                notification_type, telegram_bot_token, telegram_chat_id, email)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
        .bind(&new_watcher.doctor_name)
        .bind(&new_watcher.doctor_url)
        .bind(&new_watcher.doctor_code)
        .bind(&new_watcher.target_dates)
        .bind(new_watcher.channel.notification_type().as_str())
        .bind(bot_token)
        .bind(chat_id)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(watcher)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Watcher>> {
        let watcher = sqlx::query_as::<_, Watcher>("SELECT * FROM watchers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(watcher)
    }

    pub async fn find_active(&self) -> Result<Vec<Watcher>> {
        let watchers = sqlx::query_as::<_, Watcher>(
            "SELECT * FROM watchers WHERE is_active = true ORDER BY created_at"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(watchers)
    }

    pub async fn toggle_active(&self, id: Uuid) -> Result<Option<Watcher>> {
        let watcher = sqlx::query_as::<_, Watcher>(
            "UPDATE watchers SET is_active = NOT is_active WHERE id = $1 RETURNING *"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(watcher)
    }

    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Option<Watcher>> {
        let watcher = sqlx::query_as::<_, Watcher>(
            "UPDATE watchers SET is_active = $1 WHERE id = $2 RETURNING *"
        )
        .bind(is_active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(watcher)
    }

    pub async fn touch_last_check(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE watchers SET last_check_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Deletes the watcher; its notified slots go with it through the
    /// `ON DELETE CASCADE` foreign key.
    pub async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM watchers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn find_summaries(&self) -> Result<Vec<WatcherSummary>> {
        let summaries = sqlx::query_as::<_, WatcherSummary>(
            "SELECT w.id, w.doctor_name, w.doctor_url, w.notification_type, w.is_active,
                    COALESCE(cardinality(w.target_dates), 0) AS target_dates_count,
                    COUNT(s.id) AS slots_count,
                    w.last_check_at, w.created_at
             FROM watchers w
             LEFT JOIN notified_slots s ON s.watcher_id = w.id
             GROUP BY w.id
             ORDER BY w.created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }
}
