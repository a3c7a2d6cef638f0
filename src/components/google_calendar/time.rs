use crate::error::{google_calendar_error, GigResult};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use super::models::EventDateTime;

/// How far back and forward the gig window reaches (6 months of 30 days)
pub const WINDOW_DAYS: i64 = 6 * 30;

/// Time window for the events query, relative to `now`
pub fn fetch_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let window = Duration::days(WINDOW_DAYS);
    (now - window, now + window)
}

/// Format a timestamp the way the Calendar API expects query bounds
pub fn to_query_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A resolved event start or end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventTime {
    pub instant: DateTime<FixedOffset>,
    /// Resolved from a date-only value
    pub all_day: bool,
}

/// Resolve an event start/end, preferring `dateTime` over `date`.
///
/// An unreadable `dateTime` falls back to `date`, which is local midnight in
/// `tz`. Returns `Ok(None)` when neither field is set.
pub fn event_time(value: &EventDateTime, tz: Tz) -> GigResult<Option<EventTime>> {
    let timed = value.date_time.as_deref().map(|date_time| {
        DateTime::parse_from_rfc3339(date_time).map_err(|e| {
            google_calendar_error(&format!("Failed to parse datetime '{}': {}", date_time, e))
        })
    });

    match (timed, &value.date) {
        (Some(Ok(instant)), _) => Ok(Some(EventTime {
            instant,
            all_day: false,
        })),
        (_, Some(date)) => Ok(Some(EventTime {
            instant: local_midnight(date, tz)?,
            all_day: true,
        })),
        (Some(Err(e)), None) => Err(e),
        (None, None) => Ok(None),
    }
}

fn local_midnight(date: &str, tz: Tz) -> GigResult<DateTime<FixedOffset>> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| google_calendar_error(&format!("Failed to parse date '{}': {}", date, e)))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| google_calendar_error("Failed to create datetime"))?;
    // Ambiguous midnights resolve to the earlier instant
    let local = tz
        .from_local_datetime(&midnight)
        .earliest()
        .ok_or_else(|| google_calendar_error("Invalid local time"))?;
    Ok(local.fixed_offset())
}
