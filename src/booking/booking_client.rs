use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;
use thiserror::Error;

use super::booking_parser::parse_doctor_name;

const ORDER_PATH: &str = "/page/modules/doctors/order.php";
const WEEK_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:145.0) Gecko/20100101 Firefox/145.0";

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Booking site returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Source of a doctor's weekly availability fragments.
#[async_trait]
pub trait WeekSource: Send + Sync {
    async fn fetch_week(
        &self,
        doctor_code: &str,
        doctor_url: &str,
        week_offset: u32,
    ) -> Result<String, BookingError>;
}

/// HTTP client for the booking site's availability endpoint.
#[derive(Clone)]
pub struct BookingClient {
    client: Client,
    base_url: String,
}

impl BookingClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn order_url(&self) -> String {
        format!("{}{}", self.base_url, ORDER_PATH)
    }

    /// Fetches the availability fragment for one week of a doctor's calendar.
    pub async fn fetch_week(
        &self,
        doctor_code: &str,
        doctor_url: &str,
        week_offset: u32,
    ) -> Result<String, BookingError> {
        let week = week_offset.to_string();
        let form = [("t", "w"), ("dc", doctor_code), ("w", week.as_str())];

        let response = self
            .client
            .post(self.order_url())
            .timeout(WEEK_TIMEOUT)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "text/html, */*; q=0.01")
            .header(header::ACCEPT_LANGUAGE, "sk,en-US;q=0.7,en;q=0.3")
            .header("X-Requested-With", "XMLHttpRequest")
            .header(header::ORIGIN, self.base_url.as_str())
            .header(header::REFERER, doctor_url)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BookingError::Status(status));
        }

        Ok(response.text().await?)
    }

    /// Looks up the doctor's display name on their page. Failures are logged
    /// and reported as `None` so callers can fall back to the URL slug.
    pub async fn fetch_doctor_name(&self, doctor_url: &str) -> Option<String> {
        let result: Result<String, reqwest::Error> = async {
            let response = self
                .client
                .get(doctor_url)
                .timeout(PAGE_TIMEOUT)
                .header(header::USER_AGENT, USER_AGENT)
                .send()
                .await?
                .error_for_status()?;
            response.text().await
        }
        .await;

        match result {
            Ok(html) => parse_doctor_name(&html),
            Err(e) => {
                tracing::warn!("Failed to fetch doctor page {}: {}", doctor_url, e);
                None
            }
        }
    }
}

#[async_trait]
impl WeekSource for BookingClient {
    async fn fetch_week(
        &self,
        doctor_code: &str,
        doctor_url: &str,
        week_offset: u32,
    ) -> Result<String, BookingError> {
        BookingClient::fetch_week(self, doctor_code, doctor_url, week_offset).await
    }
}
