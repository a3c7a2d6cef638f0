use super::Gig;
use chrono::{DateTime, Utc};

/// Gigs split around a point in time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    /// Starting after `now`, soonest first
    pub upcoming: Vec<Gig>,
    /// Started at or before `now`, most recent first
    pub past: Vec<Gig>,
}

/// Partition chronologically ordered gigs into upcoming and past
pub fn classify(gigs: Vec<Gig>, now: DateTime<Utc>) -> Classified {
    let (upcoming, mut past): (Vec<Gig>, Vec<Gig>) =
        gigs.into_iter().partition(|gig| gig.is_upcoming(now));
    past.reverse();

    Classified { upcoming, past }
}
