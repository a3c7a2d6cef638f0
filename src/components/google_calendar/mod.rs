mod actor;
pub mod client;
mod handle;
pub mod models;
pub mod time;
pub mod token;

pub use client::{CalendarFetcher, EventSource, GoogleCalendarClient};
pub use handle::GoogleCalendarHandle;
pub use models::{CalendarEvent, EventDateTime};
