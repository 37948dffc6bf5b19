//! HTTP client for the Morgen v3 REST API

use morgen_core::Config;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{ApiError, Result};
use crate::models::{
    Account, AccountsPayload, ApiEnvelope, Calendar, CalendarUpdateRequest, CalendarsPayload,
    CreatedEventInfo, Event, EventCreatePayload, EventCreateRequest, EventDeleteRequest,
    EventUpdateRequest, EventsPayload, RateLimitInfo, SeriesUpdateMode,
};

/// Client for the Morgen v3 API
///
/// Authenticates every request with the configured API key and maps
/// upstream failures onto [`ApiError`].
pub struct MorgenClient {
    http: Client,
    base_url: String,
}

impl MorgenClient {
    /// Create a new API client from the configuration
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("ApiKey {}", config.api_key))
            .map_err(|e| ApiError::Configuration(format!("Invalid API key: {e}")))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        debug!("Morgen client initialized for: {}", base_url);

        Ok(Self { http, base_url })
    }

    /// List all connected calendar accounts
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let url = format!("{}/integrations/accounts/list", self.base_url);
        debug!("Fetching accounts from: {}", url);

        let response = self.http.get(&url).send().await?;
        let body: ApiEnvelope<AccountsPayload> = self.parse(response).await?;

        info!("Fetched {} accounts", body.data.accounts.len());
        Ok(body.data.accounts)
    }

    /// List all calendars across every connected account
    pub async fn list_calendars(&self) -> Result<Vec<Calendar>> {
        let url = format!("{}/calendars/list", self.base_url);
        debug!("Fetching calendars from: {}", url);

        let response = self.http.get(&url).send().await?;
        let body: ApiEnvelope<CalendarsPayload> = self.parse(response).await?;

        info!("Fetched {} calendars", body.data.calendars.len());
        Ok(body.data.calendars)
    }

    /// Update user-level calendar metadata
    pub async fn update_calendar(&self, request: &CalendarUpdateRequest) -> Result<()> {
        let url = format!("{}/calendars/update", self.base_url);
        debug!("Updating calendar: {}", request.id);

        let response = self.http.post(&url).json(request).send().await?;
        self.check(response).await?;

        info!("Updated calendar metadata: {}", request.id);
        Ok(())
    }

    /// List events in the given calendars within a time window
    ///
    /// All calendars must belong to `account_id`; the window bounds use
    /// the LocalDateTime format ("2023-03-01T00:00:00").
    pub async fn list_events(
        &self,
        account_id: &str,
        calendar_ids: &[String],
        start: &str,
        end: &str,
    ) -> Result<Vec<Event>> {
        let url = format!("{}/events/list", self.base_url);
        debug!(
            "Fetching events for account {} across {} calendars",
            account_id,
            calendar_ids.len()
        );

        let response = self
            .http
            .get(&url)
            .query(&[
                ("accountId", account_id),
                ("calendarIds", &calendar_ids.join(",")),
                ("start", start),
                ("end", end),
            ])
            .send()
            .await?;
        let body: ApiEnvelope<EventsPayload> = self.parse(response).await?;

        info!("Fetched {} events", body.data.events.len());
        Ok(body.data.events)
    }

    /// Create a new event
    pub async fn create_event(&self, request: &EventCreateRequest) -> Result<CreatedEventInfo> {
        let url = format!("{}/events/create", self.base_url);
        debug!("Creating event: {}", request.title);

        let response = self.http.post(&url).json(request).send().await?;
        let body: ApiEnvelope<EventCreatePayload> = self.parse(response).await?;

        info!("Created event: {}", body.data.event.id);
        Ok(body.data.event)
    }

    /// Update an existing event
    pub async fn update_event(
        &self,
        request: &EventUpdateRequest,
        series_update_mode: SeriesUpdateMode,
    ) -> Result<()> {
        let url = format!("{}/events/update", self.base_url);
        debug!("Updating event: {}", request.id);

        let response = self
            .http
            .post(&url)
            .query(&[("seriesUpdateMode", series_update_mode.as_str())])
            .json(request)
            .send()
            .await?;
        self.check(response).await?;

        info!("Updated event: {}", request.id);
        Ok(())
    }

    /// Delete an event
    pub async fn delete_event(
        &self,
        request: &EventDeleteRequest,
        series_update_mode: SeriesUpdateMode,
    ) -> Result<()> {
        let url = format!("{}/events/delete", self.base_url);
        debug!("Deleting event: {}", request.id);

        let response = self
            .http
            .post(&url)
            .query(&[("seriesUpdateMode", series_update_mode.as_str())])
            .json(request)
            .send()
            .await?;
        self.check(response).await?;

        info!("Deleted event: {}", request.id);
        Ok(())
    }

    async fn parse<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let response = self.check(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Map error statuses onto [`ApiError`] and log rate limit headroom
    async fn check(&self, response: Response) -> Result<Response> {
        observe_rate_limit(response.headers());

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown")
                    .to_string();
                Err(ApiError::RateLimited { retry_after })
            }
            StatusCode::UNAUTHORIZED => Err(ApiError::AuthFailed),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden),
            _ => {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<serde_json::Value>(&body)
                    .ok()
                    .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                    .unwrap_or(body);
                Err(ApiError::Upstream {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

fn observe_rate_limit(headers: &HeaderMap) {
    if let Some(info) = rate_limit_info(headers) {
        debug!(
            "Rate limit: {}/{} remaining, resets in {}s",
            info.remaining, info.limit, info.reset_seconds
        );
        if info.limit > 0 && info.remaining * 10 < info.limit {
            warn!(
                "Approaching Morgen API rate limit: {} of {} requests remaining",
                info.remaining, info.limit
            );
        }
    }
}

/// Parse the RateLimit-* headers; only complete header sets count
fn rate_limit_info(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let read = |name: &str| -> Option<u64> { headers.get(name)?.to_str().ok()?.parse().ok() };
    Some(RateLimitInfo {
        limit: read("RateLimit-Limit")?,
        remaining: read("RateLimit-Remaining")?,
        reset_seconds: read("RateLimit-Reset")?,
    })
}
