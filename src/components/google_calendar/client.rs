use super::models::{CalendarEvent, EventList};
use super::time::{fetch_window, to_query_time};
use super::token::TokenManager;
use crate::config::{Config, ServiceAccount};
use crate::error::{google_calendar_error, GigResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

/// Calendar API base URL
pub const GOOGLE_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Free-text query that selects public shows
pub const GIG_MARKER_QUERY: &str = "GIG:";

/// Anything that can list the raw calendar events for the gig window
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn list_events(&self) -> GigResult<Vec<CalendarEvent>>;
}

/// Reads gig entries from a Google Calendar with service account credentials
#[derive(Clone)]
pub struct GoogleCalendarClient {
    calendar_id: String,
    api_base: String,
    token_manager: TokenManager,
    client: Client,
}

impl GoogleCalendarClient {
    pub fn new(account: ServiceAccount) -> Self {
        let client = Client::new();
        Self {
            token_manager: TokenManager::new(&account, client.clone()),
            calendar_id: account.calendar_id,
            api_base: GOOGLE_API_BASE.to_string(),
            client,
        }
    }

    /// Use other token and API endpoints instead of Google's
    pub fn with_endpoints(mut self, token_url: &str, api_base: &str) -> Self {
        self.token_manager = self.token_manager.with_token_url(token_url);
        self.api_base = api_base.to_string();
        self
    }

    /// Build the events.list URL for the window around `now`
    pub fn events_url(&self, now: DateTime<Utc>) -> GigResult<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        // Calendar IDs contain '@' and '#', so push them as an encoded segment
        url.path_segments_mut()
            .map_err(|_| google_calendar_error("API base URL cannot have path segments"))?
            .pop_if_empty()
            .extend(["calendars", self.calendar_id.as_str(), "events"]);

        let (time_min, time_max) = fetch_window(now);
        url.query_pairs_mut()
            .append_pair("timeMin", &to_query_time(time_min))
            .append_pair("timeMax", &to_query_time(time_max))
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime")
            .append_pair("q", GIG_MARKER_QUERY);

        Ok(url)
    }
}

#[async_trait]
impl EventSource for GoogleCalendarClient {
    async fn list_events(&self) -> GigResult<Vec<CalendarEvent>> {
        let access_token = self.token_manager.get_token().await?;
        let url = self.events_url(Utc::now())?;

        debug!("Fetching gigs from {}", url.path());

        let response = self
            .client
            .get(url)
            .bearer_auth(&access_token)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to fetch events: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to fetch events: HTTP {} - {}",
                status, error_body
            )));
        }

        let list: EventList = response.json().await.map_err(|e| {
            google_calendar_error(&format!("Failed to parse events response: {}", e))
        })?;

        info!("Fetched {} calendar events", list.items.len());
        Ok(list.items)
    }
}

/// The fetcher as configured: either a live calendar or nothing at all
#[derive(Clone)]
pub enum CalendarFetcher {
    Google(GoogleCalendarClient),
    /// Credentials are missing; always lists no events
    Disabled,
}

impl CalendarFetcher {
    /// Build the fetcher, disabling it when any credential is absent
    pub fn from_config(config: &Config) -> Self {
        match config.service_account() {
            Some(account) => CalendarFetcher::Google(GoogleCalendarClient::new(account)),
            None => {
                info!("Google Calendar credentials not configured, gig fetcher disabled");
                CalendarFetcher::Disabled
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, CalendarFetcher::Google(_))
    }
}

#[async_trait]
impl EventSource for CalendarFetcher {
    async fn list_events(&self) -> GigResult<Vec<CalendarEvent>> {
        match self {
            CalendarFetcher::Google(client) => client.list_events().await,
            CalendarFetcher::Disabled => Ok(Vec::new()),
        }
    }
}
