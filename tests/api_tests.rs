#![cfg(feature = "web-interface")]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use setlist::api::{router, AppState, GIGS_PATH, LEGACY_GIGS_PATH};
use setlist::components::google_calendar::{
    CalendarEvent, CalendarFetcher, EventDateTime, EventSource,
};
use setlist::components::GoogleCalendarHandle;
use setlist::config::Config;
use setlist::error::{auth_error, GigResult};
use std::sync::Arc;
use tower::ServiceExt;

/// Source that always answers with the same events (or an auth failure)
struct FixedSource(Option<Vec<CalendarEvent>>);

#[async_trait]
impl EventSource for FixedSource {
    async fn list_events(&self) -> GigResult<Vec<CalendarEvent>> {
        self.0
            .clone()
            .ok_or_else(|| auth_error("Failed to request token: HTTP 401"))
    }
}

fn timed(date_time: &str) -> EventDateTime {
    EventDateTime {
        date_time: Some(date_time.to_string()),
        ..Default::default()
    }
}

fn all_day(date: &str) -> EventDateTime {
    EventDateTime {
        date: Some(date.to_string()),
        ..Default::default()
    }
}

fn app(source: Arc<dyn EventSource>) -> Router {
    router(AppState {
        calendar: GoogleCalendarHandle::new(source),
        timezone: chrono_tz::America::Denver,
    })
}

async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn gig_events() -> Vec<CalendarEvent> {
    vec![
        CalendarEvent {
            id: "evt-1".to_string(),
            summary: Some("GIG: Standards Quartet @ The Village Vanguard".to_string()),
            start: Some(timed("2030-01-23T19:00:00-07:00")),
            end: Some(timed("2030-01-23T21:00:00-07:00")),
            description: Some("Three nights".to_string()),
            ..Default::default()
        },
        CalendarEvent {
            id: "evt-2".to_string(),
            summary: Some("GIG: Solo Set".to_string()),
            start: Some(all_day("2030-02-01")),
            ..Default::default()
        },
        CalendarEvent {
            id: "evt-3".to_string(),
            summary: Some("GIG: Missing start".to_string()),
            ..Default::default()
        },
    ]
}

/// Test the JSON shape of the gig list
#[tokio::test]
async fn test_get_gigs_returns_json_array() {
    let app = app(Arc::new(FixedSource(Some(gig_events()))));
    let (status, body) = send(app, Method::GET, GIGS_PATH).await;

    assert_eq!(status, StatusCode::OK);
    let gigs: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        gigs,
        json!([
            {
                "id": "evt-1",
                "title": "Standards Quartet",
                "date": "2030-01-23T19:00:00-07:00",
                "startDate": "2030-01-23T19:00:00-07:00",
                "endDate": "2030-01-23T21:00:00-07:00",
                "location": "The Village Vanguard",
                "description": "Three nights",
                "status": "confirmed"
            },
            {
                "id": "evt-2",
                "title": "Solo Set",
                "date": "2030-02-01T00:00:00-07:00",
                "startDate": "2030-02-01T00:00:00-07:00",
                "location": "",
                "description": "",
                "status": "confirmed"
            }
        ])
    );
}

/// The serverless function path serves the same list
#[tokio::test]
async fn test_legacy_path_serves_gigs() {
    let app = app(Arc::new(FixedSource(Some(gig_events()))));
    let (status, body) = send(app, Method::GET, LEGACY_GIGS_PATH).await;

    assert_eq!(status, StatusCode::OK);
    let gigs: Vec<Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(gigs.len(), 2);
}

/// Upstream failures still answer 200 with an empty array
#[tokio::test]
async fn test_upstream_failure_returns_empty_array() {
    let app = app(Arc::new(FixedSource(None)));
    let (status, body) = send(app, Method::GET, GIGS_PATH).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!([]));
}

/// Missing credentials answer with an empty array too
#[tokio::test]
async fn test_unconfigured_fetcher_returns_empty_array() {
    let config = Config {
        google_client_email: Some("gigs@site.iam.gserviceaccount.com".to_string()),
        google_private_key: None,
        google_calendar_id: Some("shows@group.calendar.google.com".to_string()),
        ..Default::default()
    };
    let fetcher = CalendarFetcher::from_config(&config);
    assert!(!fetcher.is_enabled());

    let (status, body) = send(app(Arc::new(fetcher)), Method::GET, GIGS_PATH).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"[]");
}

/// Anything but GET is rejected
#[tokio::test]
async fn test_non_get_methods_are_not_allowed() {
    for method in [Method::POST, Method::PUT, Method::DELETE] {
        let app = app(Arc::new(FixedSource(Some(gig_events()))));
        let (status, body) = send(app, method, GIGS_PATH).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            serde_json::from_slice::<Value>(&body).unwrap(),
            json!({ "error": "Method not allowed" })
        );
    }
}

/// Browsers may fetch from another origin
#[tokio::test]
async fn test_cors_headers() {
    let app = app(Arc::new(FixedSource(Some(Vec::new()))));
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(GIGS_PATH)
                .header(header::ORIGIN, "https://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );

    let (status, body) = send(app, Method::OPTIONS, GIGS_PATH).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

/// Test the health endpoint
#[tokio::test]
async fn test_health() {
    let app = app(Arc::new(FixedSource(Some(Vec::new()))));
    let (status, body) = send(app, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}
