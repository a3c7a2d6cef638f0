// Export components
pub mod gigs;
pub mod google_calendar;

// Re-export the calendar handle and gig pipeline entry points
pub use gigs::{fetch_gigs, Gig, GigBoard};
pub use google_calendar::GoogleCalendarHandle;
