pub mod classify;
pub mod normalize;
pub mod paginator;

pub use classify::{classify, Classified};
pub use normalize::{normalize_event, normalize_events, GIG_MARKER};
pub use paginator::{GigBoard, Listing, LoadOutcome, Pager, ScrollPosition};

use crate::components::google_calendar::GoogleCalendarHandle;
use crate::error::GigResult;
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::error;

/// Shown in place of the upcoming listing when it is empty
pub const NO_SHOWS_MESSAGE: &str = "No Shows Scheduled";

/// Booking status of a gig; the calendar only ever yields confirmed shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GigStatus {
    Confirmed,
}

/// A public show derived from a calendar event
#[derive(Debug, Clone, PartialEq)]
pub struct Gig {
    pub id: String,
    /// Display title without the location suffix or the gig marker
    pub title: String,
    pub start_time: DateTime<FixedOffset>,
    /// Absent for point-in-time gigs
    pub end_time: Option<DateTime<FixedOffset>>,
    /// Dated by day only, with no time of day
    pub all_day: bool,
    /// Venue, possibly empty
    pub location: String,
    pub description: String,
    pub status: GigStatus,
}

impl Gig {
    /// Upcoming means starting strictly after `now`
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_time > now
    }
}

/// Fetch and normalize gigs, surfacing any failure
pub async fn try_fetch_gigs(calendar: &GoogleCalendarHandle, tz: Tz) -> GigResult<Vec<Gig>> {
    let events = calendar.fetch_events().await?;
    Ok(normalize_events(&events, tz))
}

/// Fetch and normalize gigs; any failure becomes an empty list
pub async fn fetch_gigs(calendar: &GoogleCalendarHandle, tz: Tz) -> Vec<Gig> {
    match try_fetch_gigs(calendar, tz).await {
        Ok(gigs) => gigs,
        Err(e) => {
            error!("Failed to fetch gigs: {}", e);
            Vec::new()
        }
    }
}
