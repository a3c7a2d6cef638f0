use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;

/// Format a gig date like "Thu Jan 23 2025"
pub fn format_date<T: TimeZone>(time: &DateTime<T>, tz: Tz) -> String {
    time.with_timezone(&tz).format("%a %b %-d %Y").to_string()
}

/// Format a time of day like "7:00 PM"
pub fn format_time<T: TimeZone>(time: &DateTime<T>, tz: Tz) -> String {
    time.with_timezone(&tz).format("%-I:%M %p").to_string()
}

/// Format a start/end pair; a gig without an end shows only its start
pub fn format_time_range<T: TimeZone>(
    start: &DateTime<T>,
    end: Option<&DateTime<T>>,
    tz: Tz,
) -> String {
    match end {
        Some(end) => format!("{} - {}", format_time(start, tz), format_time(end, tz)),
        None => format_time(start, tz),
    }
}
