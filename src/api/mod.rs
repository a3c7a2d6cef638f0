//! HTTP surface of the gig listing: a JSON endpoint the site fetches on load.

mod handlers;

pub use handlers::{gigs_handler, health_handler, method_not_allowed_handler, GigPayload};

use crate::components::google_calendar::GoogleCalendarHandle;
use axum::routing::{get, MethodRouter};
use axum::Router;
use chrono_tz::Tz;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Path the site fetches gigs from
pub const GIGS_PATH: &str = "/api/gigs";

/// Path kept for front ends built against the serverless function
pub const LEGACY_GIGS_PATH: &str = "/.netlify/functions/gigs";

#[derive(Clone)]
pub struct AppState {
    /// Handle to the calendar actor
    pub calendar: GoogleCalendarHandle,
    /// Timezone for all-day gigs
    pub timezone: Tz,
}

// OPTIONS never reaches the route; the CORS layer answers it
fn gigs_route() -> MethodRouter<AppState> {
    get(gigs_handler).fallback(method_not_allowed_handler)
}

/// Build the router serving the gig endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(GIGS_PATH, gigs_route())
        .route(LEGACY_GIGS_PATH, gigs_route())
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
