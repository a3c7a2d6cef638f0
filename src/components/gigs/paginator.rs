//! Incremental loading for the upcoming and past listings.
//!
//! Each listing shows `page_size + page * page_size` gigs. A "load more"
//! trigger grows the window by one page after a short delay; while that
//! delay runs the listing is `loading` and further triggers are ignored.
//!
//! The board keeps gigs unclassified; every read splits them into upcoming
//! and past against the board's clock.

use super::{classify, fetch_gigs, Classified, Gig};
use crate::components::google_calendar::GoogleCalendarHandle;
use crate::config::{Config, DEFAULT_LOAD_DELAY_MS, DEFAULT_PAGE_SIZE};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::debug;

/// Fraction of the scrollable extent that triggers "load more"
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 0.8;

/// Which of the two listings a trigger applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listing {
    Upcoming,
    Past,
}

/// Result of a "load more" step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A load was started; `finish_load` completes it
    Pending,
    /// The window grew by one page
    Loaded,
    /// Everything was already visible; the listing is now exhausted
    Exhausted,
    /// A load was in flight or the listing was already exhausted
    Ignored,
}

/// Page counter for a single listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    total: usize,
    page: usize,
    loading: bool,
    exhausted: bool,
}

impl Pager {
    pub fn new(page_size: usize, total: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            total,
            page: 0,
            loading: false,
            exhausted: false,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Number of items currently visible
    pub fn visible_count(&self) -> usize {
        self.page
            .saturating_mul(self.page_size)
            .saturating_add(self.page_size)
            .min(self.total)
    }

    pub fn has_more(&self) -> bool {
        self.visible_count() < self.total
    }

    /// Visible prefix of the listing's items
    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.visible_count().min(items.len())]
    }

    /// Start a load; returns `Pending` when the caller should finish it
    pub fn begin_load(&mut self) -> LoadOutcome {
        if self.loading || self.exhausted {
            return LoadOutcome::Ignored;
        }
        if !self.has_more() {
            self.exhausted = true;
            return LoadOutcome::Exhausted;
        }
        self.loading = true;
        LoadOutcome::Pending
    }

    /// Complete a pending load by revealing one more page
    pub fn finish_load(&mut self) -> LoadOutcome {
        if !self.loading {
            return LoadOutcome::Ignored;
        }
        self.page += 1;
        self.loading = false;
        if !self.has_more() {
            self.exhausted = true;
        }
        LoadOutcome::Loaded
    }

    /// Follow a changed item count without moving the page
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        if self.has_more() {
            self.exhausted = false;
        }
    }

    /// Back to the first page over a new item count
    pub fn reset(&mut self, total: usize) {
        *self = Self::new(self.page_size, total);
    }
}

/// Where the consumer's viewport sits in the scrollable listing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPosition {
    /// Distance scrolled from the top
    pub offset: f64,
    /// Height of the visible area
    pub viewport: f64,
    /// Total scrollable height
    pub extent: f64,
}

impl ScrollPosition {
    /// Whether the bottom of the viewport has reached `threshold` of the extent
    pub fn crosses(&self, threshold: f64) -> bool {
        if self.extent <= 0.0 {
            return true;
        }
        (self.offset + self.viewport) / self.extent >= threshold
    }
}

#[derive(Debug)]
struct BoardState {
    gigs: Vec<Gig>,
    upcoming_pager: Pager,
    past_pager: Pager,
    // Bumped on every replace so stale loads cannot land on new data
    generation: u64,
}

impl BoardState {
    fn pager(&self, listing: Listing) -> &Pager {
        match listing {
            Listing::Upcoming => &self.upcoming_pager,
            Listing::Past => &self.past_pager,
        }
    }

    fn pager_mut(&mut self, listing: Listing) -> &mut Pager {
        match listing {
            Listing::Upcoming => &mut self.upcoming_pager,
            Listing::Past => &mut self.past_pager,
        }
    }

    /// Split the gigs against `now` and keep both pagers' totals in step
    fn classify_at(&mut self, now: DateTime<Utc>) -> Classified {
        let classified = classify(self.gigs.clone(), now);
        self.upcoming_pager.set_total(classified.upcoming.len());
        self.past_pager.set_total(classified.past.len());
        classified
    }
}

fn select(classified: Classified, listing: Listing) -> Vec<Gig> {
    match listing {
        Listing::Upcoming => classified.upcoming,
        Listing::Past => classified.past,
    }
}

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The two gig listings with their own pagination state
pub struct GigBoard {
    state: Mutex<BoardState>,
    load_delay: Duration,
    scroll_threshold: f64,
    clock: Clock,
}

impl GigBoard {
    pub fn new(page_size: usize, load_delay: Duration) -> Self {
        Self {
            state: Mutex::new(BoardState {
                gigs: Vec::new(),
                upcoming_pager: Pager::new(page_size, 0),
                past_pager: Pager::new(page_size, 0),
                generation: 0,
            }),
            load_delay,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            clock: Arc::new(Utc::now),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.page_size, config.load_delay())
    }

    pub fn with_scroll_threshold(mut self, threshold: f64) -> Self {
        self.scroll_threshold = threshold;
        self
    }

    /// Read the time from `clock` instead of the system clock
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Take a fresh gig set and reset both listings
    pub async fn replace(&self, gigs: Vec<Gig>) {
        let now = self.now();
        let mut state = self.state.lock().await;

        state.gigs = gigs;
        let classified = classify(state.gigs.clone(), now);
        state.upcoming_pager.reset(classified.upcoming.len());
        state.past_pager.reset(classified.past.len());
        state.generation += 1;

        debug!(
            "Gig board holds {} upcoming and {} past gigs",
            classified.upcoming.len(),
            classified.past.len()
        );
    }

    /// Re-fetch from the calendar and start over at page 0
    pub async fn refresh(&self, calendar: &GoogleCalendarHandle, tz: Tz) {
        let gigs = fetch_gigs(calendar, tz).await;
        self.replace(gigs).await;
    }

    /// Grow a listing by one page
    pub async fn load_more(&self, listing: Listing) -> LoadOutcome {
        let generation = {
            let now = self.now();
            let mut state = self.state.lock().await;
            state.classify_at(now);
            match state.pager_mut(listing).begin_load() {
                LoadOutcome::Pending => state.generation,
                outcome => return outcome,
            }
        };

        if !self.load_delay.is_zero() {
            sleep(self.load_delay).await;
        }

        let now = self.now();
        let mut state = self.state.lock().await;
        if state.generation != generation {
            return LoadOutcome::Ignored;
        }
        state.classify_at(now);
        let outcome = state.pager_mut(listing).finish_load();
        debug!(
            "Loaded more {:?} gigs, {} visible",
            listing,
            state.pager(listing).visible_count()
        );
        outcome
    }

    /// Load more when the viewport has scrolled close enough to the end
    pub async fn on_scroll(&self, listing: Listing, position: ScrollPosition) -> LoadOutcome {
        if position.crosses(self.scroll_threshold) {
            self.load_more(listing).await
        } else {
            LoadOutcome::Ignored
        }
    }

    /// Currently visible gigs of a listing
    pub async fn visible(&self, listing: Listing) -> Vec<Gig> {
        let now = self.now();
        let mut state = self.state.lock().await;
        let items = select(state.classify_at(now), listing);
        state.pager(listing).visible(&items).to_vec()
    }

    /// Snapshot of a listing's page counter
    pub async fn pager(&self, listing: Listing) -> Pager {
        let now = self.now();
        let mut state = self.state.lock().await;
        state.classify_at(now);
        state.pager(listing).clone()
    }

    /// Whether the "No Shows Scheduled" state applies
    pub async fn upcoming_is_empty(&self) -> bool {
        let now = self.now();
        let mut state = self.state.lock().await;
        state.classify_at(now).upcoming.is_empty()
    }
}

impl Default for GigBoard {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, Duration::from_millis(DEFAULT_LOAD_DELAY_MS))
    }
}
