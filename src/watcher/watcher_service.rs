use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use std::future::Future;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::booking::{
    doctor_name_from_url, expand_week_range, extract_doctor_code, BookingClient, MAX_WEEK_OFFSET,
};
use crate::error::{AppError, Result};
use crate::notification::{NotificationChannel, NotificationType};
use crate::scheduler::WatchScheduler;
use crate::slot::{NotifiedSlot, SlotRepository};
use super::watcher_dto::{CreateWatcherRequest, WatcherDetailResponse};
use super::watcher_models::{NewWatcher, Watcher};
use super::watcher_repository::WatcherRepository;

pub const RECENT_SLOTS_LIMIT: i64 = 20;
pub const MAX_TARGET_DATES: usize = 400;

/// Service layer for watcher lifecycle: validation, persistence and keeping
/// the scheduler in sync with the active flag.
#[derive(Clone)]
pub struct WatcherService {
    repo: WatcherRepository,
    slots: SlotRepository,
    booking: BookingClient,
    scheduler: WatchScheduler,
    email_enabled: bool,
}

impl WatcherService {
    pub fn new(
        repo: WatcherRepository,
        slots: SlotRepository,
        booking: BookingClient,
        scheduler: WatchScheduler,
        email_enabled: bool,
    ) -> Self {
        Self {
            repo,
            slots,
            booking,
            scheduler,
            email_enabled,
        }
    }

    pub async fn create_watcher(&self, payload: CreateWatcherRequest) -> Result<Watcher> {
        let today = Local::now().date_naive();
        let validated = validate_create_request(&payload, today, self.email_enabled)?;

        let doctor_name = match self.booking.fetch_doctor_name(&validated.doctor_url).await {
            Some(name) => name,
            None => doctor_name_from_url(&validated.doctor_url, &validated.doctor_code),
        };

        let new_watcher = NewWatcher {
            doctor_name,
            doctor_url: validated.doctor_url,
            doctor_code: validated.doctor_code,
            target_dates: validated.target_dates,
            channel: validated.channel,
        };

        let watcher = self.repo.create(&new_watcher).await?;

        // An active watcher must not outlive a failed schedule.
        undo_on_error(self.scheduler.schedule(watcher.id), self.repo.delete(watcher.id)).await?;
        tracing::info!("Created watcher {} - {}", watcher.id, watcher.doctor_name);

        self.scheduler.trigger_now(watcher.id);

        Ok(watcher)
    }

    pub async fn get_watcher(&self, id: Uuid) -> Result<Watcher> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Watcher not found".into()))
    }

    pub async fn get_watcher_detail(&self, id: Uuid) -> Result<WatcherDetailResponse> {
        let watcher = self.get_watcher(id).await?;
        let notified_slots = self
            .slots
            .find_recent_by_watcher(watcher.id, RECENT_SLOTS_LIMIT)
            .await?;

        Ok(WatcherDetailResponse {
            watcher,
            notified_slots,
        })
    }

    pub async fn list_notified_slots(&self, id: Uuid) -> Result<Vec<NotifiedSlot>> {
        let watcher = self.get_watcher(id).await?;
        self.slots.find_all_by_watcher(watcher.id).await
    }

    pub async fn toggle_watcher(&self, id: Uuid) -> Result<Watcher> {
        let watcher = self
            .repo
            .toggle_active(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Watcher not found".into()))?;

        self.sync_schedule(&watcher).await?;
        Ok(watcher)
    }

    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Watcher> {
        let watcher = self
            .repo
            .set_active(id, is_active)
            .await?
            .ok_or_else(|| AppError::NotFound("Watcher not found".into()))?;

        self.sync_schedule(&watcher).await?;
        Ok(watcher)
    }

    pub async fn delete_watcher(&self, id: Uuid) -> Result<()> {
        if self.repo.delete(id).await? == 0 {
            return Err(AppError::NotFound("Watcher not found".into()));
        }

        self.scheduler.unschedule(id).await?;
        tracing::info!("Deleted watcher {}", id);
        Ok(())
    }

    async fn sync_schedule(&self, watcher: &Watcher) -> Result<()> {
        if watcher.is_active {
            self.scheduler.schedule(watcher.id).await?;
            tracing::info!("Activated watcher {}", watcher.id);
        } else {
            self.scheduler.unschedule(watcher.id).await?;
            tracing::info!("Deactivated watcher {}", watcher.id);
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
pub struct ValidatedWatcher {
    pub doctor_url: String,
    pub doctor_code: String,
    pub target_dates: Vec<NaiveDate>,
    pub channel: NotificationChannel,
}

pub fn validate_create_request(
    payload: &CreateWatcherRequest,
    today: NaiveDate,
    email_enabled: bool,
) -> Result<ValidatedWatcher> {
    let doctor_url = payload.doctor_url.trim().to_string();
    let doctor_code = extract_doctor_code(&doctor_url).ok_or_else(|| {
        AppError::BadRequest(
            "Could not extract doctor code from URL. URL must end with '-dXXX.html'".into(),
        )
    })?;

    let target_dates =
        parse_target_dates(&payload.target_dates, payload.week_range.as_deref(), today)?;

    let notification_type: NotificationType = payload
        .notification_type
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid notification type".into()))?;

    let channel = match notification_type {
        NotificationType::Telegram => {
            match (non_blank(&payload.telegram_bot_token), non_blank(&payload.telegram_chat_id)) {
                (Some(bot_token), Some(chat_id)) => NotificationChannel::Telegram {
                    bot_token: bot_token.to_string(),
                    chat_id: chat_id.to_string(),
                },
                _ => {
                    return Err(AppError::BadRequest(
                        "Telegram notifications require a bot token and chat ID".into(),
                    ))
                }
            }
        }
        NotificationType::Email => {
            if !email_enabled {
                return Err(AppError::BadRequest(
                    "Email notifications are not configured on this server".into(),
                ));
            }
            let address = non_blank(&payload.email).ok_or_else(|| {
                AppError::BadRequest("Email notifications require an email address".into())
            })?;
            if !address.validate_email() {
                return Err(AppError::BadRequest("Invalid email address".into()));
            }
            NotificationChannel::Email {
                address: address.to_string(),
            }
        }
    };

    Ok(ValidatedWatcher {
        doctor_url,
        doctor_code,
        target_dates,
        channel,
    })
}

/// Parses exact dates and week ranges into a distinct list of dates, keeping
/// the order in which they were given.
pub fn parse_target_dates(
    raw_dates: &[String],
    week_range: Option<&str>,
    today: NaiveDate,
) -> Result<Vec<NaiveDate>> {
    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut seen: HashSet<NaiveDate> = HashSet::new();
    let mut push = |date: NaiveDate| -> Result<()> {
        if seen.insert(date) {
            if dates.len() == MAX_TARGET_DATES {
                return Err(AppError::BadRequest(format!(
                    "At most {} target dates are allowed",
                    MAX_TARGET_DATES
                )));
            }
            dates.push(date);
        }
        Ok(())
    };

    for raw in raw_dates.iter().map(|d| d.trim()).filter(|d| !d.is_empty()) {
        if let Some(expanded) = expand_week_range(raw, today) {
            expanded.into_iter().try_for_each(&mut push)?;
            continue;
        }
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            AppError::BadRequest(format!(
                "Invalid date: {}. Use YYYY-MM-DD or a week range such as 0-3 (weeks 0 to {})",
                raw, MAX_WEEK_OFFSET
            ))
        })?;
        push(date)?;
    }

    if let Some(range) = week_range.map(str::trim).filter(|r| !r.is_empty()) {
        let expanded = expand_week_range(range, today).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid week range: {}. Weeks run from 0 to {}",
                range, MAX_WEEK_OFFSET
            ))
        })?;
        expanded.into_iter().try_for_each(&mut push)?;
    }

    if dates.is_empty() {
        return Err(AppError::BadRequest("At least one target date is required".into()));
    }

    Ok(dates)
}

/// Awaits `step`; if it fails, awaits `undo` and returns the original error.
async fn undo_on_error<T, U>(
    step: impl Future<Output = Result<T>>,
    undo: impl Future<Output = Result<U>>,
) -> Result<T> {
    match step.await {
        Ok(value) => Ok(value),
        Err(e) => {
            if let Err(undo_error) = undo.await {
                tracing::error!("Failed to undo after error '{}': {}", e, undo_error);
            }
            Err(e)
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
