use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use chrono_tz::Tz;
use setlist::components::gigs::{
    fetch_gigs, try_fetch_gigs, GigBoard, Listing, LoadOutcome, GIG_MARKER,
};
use setlist::components::google_calendar::{CalendarEvent, EventDateTime, EventSource};
use setlist::components::GoogleCalendarHandle;
use setlist::error::{google_calendar_error, GigResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock event source standing in for Google Calendar
#[derive(Default)]
pub struct MockEventSource {
    events: Vec<CalendarEvent>,
    fail: bool,
    delay: Option<std::time::Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockEventSource {
    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl EventSource for MockEventSource {
    async fn list_events(&self) -> GigResult<Vec<CalendarEvent>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.fail {
            return Err(google_calendar_error("Failed to fetch events: HTTP 500"));
        }
        Ok(self.events.clone())
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

fn timed_event(id: &str, summary: &str, start_offset: Duration) -> CalendarEvent {
    let start = Utc::now() + start_offset;
    CalendarEvent {
        id: id.to_string(),
        summary: Some(summary.to_string()),
        start: Some(timed(&start.to_rfc3339_opts(SecondsFormat::Secs, true))),
        end: Some(timed(
            &(start + Duration::hours(2)).to_rfc3339_opts(SecondsFormat::Secs, true),
        )),
        ..Default::default()
    }
}

/// Chronological events: `past` shows in the past, then `upcoming` future ones
fn season(past: usize, upcoming: usize) -> Vec<CalendarEvent> {
    let past_events = (0..past).map(|i| {
        timed_event(
            &format!("past-{}", i),
            &format!("GIG: Past Band {} @ Venue {}", i, i),
            Duration::days(-(past as i64) + i as i64),
        )
    });
    let future_events = (0..upcoming).map(|i| {
        timed_event(
            &format!("next-{}", i),
            &format!("GIG: Next Band {} @ Venue {}", i, i),
            Duration::days(i as i64 + 1),
        )
    });
    past_events.chain(future_events).collect()
}

/// Test the pipeline end to end over a mock source
#[tokio::test]
async fn test_fetch_gigs_normalizes_events() {
    let mut events = season(1, 1);
    events.insert(
        1,
        CalendarEvent {
            id: "undated".to_string(),
            summary: Some("GIG: Mystery @ Somewhere".to_string()),
            ..Default::default()
        },
    );
    events.push(CalendarEvent {
        id: "allday".to_string(),
        summary: Some("GIG: Summer Festival".to_string()),
        location: Some("Pioneer Park".to_string()),
        start: Some(all_day("2099-07-04")),
        ..Default::default()
    });

    let handle = GoogleCalendarHandle::new(Arc::new(MockEventSource::with_events(events)));
    let gigs = fetch_gigs(&handle, Tz::UTC).await;

    let ids: Vec<&str> = gigs.iter().map(|gig| gig.id.as_str()).collect();
    assert_eq!(ids, vec!["past-0", "next-0", "allday"]);

    assert_eq!(gigs[1].title, "Next Band 0");
    assert_eq!(gigs[1].location, "Venue 0");
    assert!(gigs[1].end_time.is_some());
    assert!(!gigs[1].all_day);

    assert_eq!(gigs[2].title, "Summer Festival");
    assert_eq!(gigs[2].location, "Pioneer Park");
    assert_eq!(gigs[2].start_time.to_rfc3339(), "2099-07-04T00:00:00+00:00");
    assert!(gigs[2].all_day);

    assert!(gigs.iter().all(|gig| !gig.title.contains(GIG_MARKER)));

    handle.shutdown().await.unwrap();
}

/// Failures surface internally but collapse to an empty list at the boundary
#[tokio::test]
async fn test_failing_source_yields_empty_list() {
    let handle = GoogleCalendarHandle::new(Arc::new(MockEventSource::failing()));

    assert!(try_fetch_gigs(&handle, Tz::UTC).await.is_err());
    assert!(fetch_gigs(&handle, Tz::UTC).await.is_empty());
}

/// A stopped actor also reads as "no shows"
#[tokio::test]
async fn test_shut_down_actor_yields_empty_list() {
    let handle = GoogleCalendarHandle::new(Arc::new(MockEventSource::with_events(season(1, 1))));
    handle.shutdown().await.unwrap();

    assert!(fetch_gigs(&handle, Tz::UTC).await.is_empty());
}

/// The actor runs one calendar fetch at a time
#[tokio::test]
async fn test_actor_serializes_fetches() {
    let source = Arc::new(MockEventSource {
        events: season(0, 2),
        delay: Some(std::time::Duration::from_millis(20)),
        ..Default::default()
    });
    let handle = GoogleCalendarHandle::new(source.clone());

    let results = futures::future::join_all((0..4).map(|_| handle.fetch_events())).await;

    assert!(results.iter().all(|result| result.as_ref().map(Vec::len).ok() == Some(2)));
    assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    assert_eq!(source.max_in_flight.load(Ordering::SeqCst), 1);
}

/// Board over fetched gigs: 14 upcoming shows page 6, 12, 14
#[tokio::test(start_paused = true)]
async fn test_board_pages_fetched_gigs() {
    let handle = GoogleCalendarHandle::new(Arc::new(MockEventSource::with_events(season(3, 14))));
    let board = GigBoard::new(6, std::time::Duration::from_millis(250));
    board.refresh(&handle, Tz::UTC).await;

    assert!(!board.upcoming_is_empty().await);
    assert_eq!(board.visible(Listing::Upcoming).await.len(), 6);

    assert_eq!(board.load_more(Listing::Upcoming).await, LoadOutcome::Loaded);
    assert_eq!(board.visible(Listing::Upcoming).await.len(), 12);

    assert_eq!(board.load_more(Listing::Upcoming).await, LoadOutcome::Loaded);
    assert_eq!(board.visible(Listing::Upcoming).await.len(), 14);
    assert!(board.pager(Listing::Upcoming).await.is_exhausted());

    assert_eq!(board.load_more(Listing::Upcoming).await, LoadOutcome::Ignored);
    assert_eq!(board.pager(Listing::Upcoming).await.page(), 2);

    // Soonest first upcoming, most recent first past
    let upcoming = board.visible(Listing::Upcoming).await;
    assert_eq!(upcoming[0].id, "next-0");
    let past: Vec<String> = board
        .visible(Listing::Past)
        .await
        .into_iter()
        .map(|gig| gig.id)
        .collect();
    assert_eq!(past, vec!["past-2", "past-1", "past-0"]);

    // A re-fetch starts both listings over
    board.refresh(&handle, Tz::UTC).await;
    assert_eq!(board.pager(Listing::Upcoming).await.page(), 0);
    assert_eq!(board.visible(Listing::Upcoming).await.len(), 6);
}

/// Rapid triggers while a load is in flight count once
#[tokio::test(start_paused = true)]
async fn test_rapid_triggers_increment_once() {
    let handle = GoogleCalendarHandle::new(Arc::new(MockEventSource::with_events(season(0, 20))));
    let board = GigBoard::new(6, std::time::Duration::from_millis(250));
    board.refresh(&handle, Tz::UTC).await;

    let outcomes =
        futures::future::join_all((0..5).map(|_| board.load_more(Listing::Upcoming))).await;

    let loaded = outcomes
        .iter()
        .filter(|outcome| **outcome == LoadOutcome::Loaded)
        .count();
    assert_eq!(loaded, 1);
    assert_eq!(board.pager(Listing::Upcoming).await.page(), 1);
    assert_eq!(board.visible(Listing::Upcoming).await.len(), 12);
}

/// Nothing upcoming means the empty state
#[tokio::test]
async fn test_empty_calendar_shows_empty_state() {
    let handle = GoogleCalendarHandle::new(Arc::new(MockEventSource::with_events(season(4, 0))));
    let board = GigBoard::new(6, std::time::Duration::ZERO);
    board.refresh(&handle, Tz::UTC).await;

    assert!(board.upcoming_is_empty().await);
    assert_eq!(board.visible(Listing::Past).await.len(), 4);
    assert_eq!(board.load_more(Listing::Upcoming).await, LoadOutcome::Exhausted);
}
