use super::AppState;
use crate::components::gigs::{fetch_gigs, Gig, GigStatus};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::json;
use tracing::info;

/// Gig as the front end consumes it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GigPayload {
    pub id: String,
    pub title: String,
    /// Same as `start_date`; older front ends read this field
    pub date: String,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub location: String,
    pub description: String,
    pub status: GigStatus,
}

impl From<&Gig> for GigPayload {
    fn from(gig: &Gig) -> Self {
        let start = gig.start_time.to_rfc3339();
        Self {
            id: gig.id.clone(),
            title: gig.title.clone(),
            date: start.clone(),
            start_date: start,
            end_date: gig.end_time.map(|end| end.to_rfc3339()),
            location: gig.location.clone(),
            description: gig.description.clone(),
            status: gig.status,
        }
    }
}

/// Handler for the gig list; failures show up as an empty list
pub async fn gigs_handler(State(state): State<AppState>) -> Json<Vec<GigPayload>> {
    let gigs = fetch_gigs(&state.calendar, state.timezone).await;
    info!("Serving {} gigs", gigs.len());
    Json(gigs.iter().map(GigPayload::from).collect())
}

/// Handler for any method other than GET and OPTIONS
pub async fn method_not_allowed_handler() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}

/// Health check
pub async fn health_handler() -> &'static str {
    "OK"
}
