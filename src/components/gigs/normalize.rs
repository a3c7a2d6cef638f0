//! Turns raw calendar events into [`Gig`] records.
//!
//! Titles follow the `"GIG: BAND @ LOCATION"` convention. The part before the
//! first `@` is the show title, the rest is the venue.

use super::{Gig, GigStatus};
use crate::components::google_calendar::models::CalendarEvent;
use crate::components::google_calendar::time::event_time;
use crate::error::{google_calendar_error, GigResult};
use chrono_tz::Tz;
use tracing::warn;

/// Title prefix that marks a calendar entry as a public show
pub const GIG_MARKER: &str = "GIG: ";

/// Summary used when an event has none
const UNTITLED: &str = "GIG: Untitled";

/// Split a raw title on its first `@` into (title, location candidate)
pub fn split_title(raw: &str) -> (&str, Option<&str>) {
    match raw.split_once('@') {
        Some((title, location)) => (title.trim(), Some(location.trim())),
        None => (raw.trim(), None),
    }
}

/// Remove every occurrence of the gig marker from a display title
pub fn strip_marker(title: &str) -> String {
    let mut cleaned = title.to_string();
    while let Some(index) = cleaned.find(GIG_MARKER) {
        cleaned.replace_range(index..index + GIG_MARKER.len(), "");
    }
    cleaned.trim().to_string()
}

/// Title location wins over the event's own location field
pub fn resolve_location(parsed: Option<&str>, event_location: Option<&str>) -> String {
    parsed
        .filter(|location| !location.is_empty())
        .or_else(|| event_location.filter(|location| !location.trim().is_empty()))
        .unwrap_or_default()
        .to_string()
}

/// Convert one calendar event; fails when it has no usable start
pub fn normalize_event(event: &CalendarEvent, tz: Tz) -> GigResult<Gig> {
    let start = match &event.start {
        Some(start) => event_time(start, tz)?,
        None => None,
    }
    .ok_or_else(|| google_calendar_error(&format!("Event {} has no start time", event.id)))?;

    // An unreadable end just makes the gig a point in time
    let end_time = event
        .end
        .as_ref()
        .and_then(|end| event_time(end, tz).ok().flatten())
        .map(|end| end.instant);

    let summary = event.summary.as_deref().unwrap_or(UNTITLED);
    let (title, parsed_location) = split_title(summary);

    Ok(Gig {
        id: event.id.clone(),
        title: strip_marker(title),
        start_time: start.instant,
        end_time,
        all_day: start.all_day,
        location: resolve_location(parsed_location, event.location.as_deref()),
        description: event.description.clone().unwrap_or_default(),
        status: GigStatus::Confirmed,
    })
}

/// Convert a batch of events, dropping the ones that cannot be dated
pub fn normalize_events(events: &[CalendarEvent], tz: Tz) -> Vec<Gig> {
    events
        .iter()
        .filter_map(|event| match normalize_event(event, tz) {
            Ok(gig) => Some(gig),
            Err(e) => {
                warn!("Skipping calendar event: {}", e);
                None
            }
        })
        .collect()
}
