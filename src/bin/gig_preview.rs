use chrono_tz::Tz;
use setlist::components::gigs::{Gig, GigBoard, Listing, LoadOutcome, NO_SHOWS_MESSAGE};
use setlist::components::GoogleCalendarHandle;
use setlist::config::Config;
use setlist::utils::time::{format_date, format_time_range};
use tracing_subscriber::EnvFilter;

/// Print the gig listings the way the site pages through them
#[tokio::main]
async fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = Config::load()?;
    let tz = config.tz()?;

    let calendar = GoogleCalendarHandle::from_config(&config);
    let board = GigBoard::from_config(&config);
    board.refresh(&calendar, tz).await;

    println!("Upcoming");
    if board.upcoming_is_empty().await {
        println!("  {}", NO_SHOWS_MESSAGE);
    } else {
        print_listing(&board, Listing::Upcoming, tz).await;
    }

    if !board.visible(Listing::Past).await.is_empty() {
        println!();
        println!("Recent Shows");
        print_listing(&board, Listing::Past, tz).await;
    }

    calendar.shutdown().await?;
    Ok(())
}

/// Print a listing page by page until it is exhausted
async fn print_listing(board: &GigBoard, listing: Listing, tz: Tz) {
    let mut shown = 0;
    loop {
        let visible = board.visible(listing).await;
        for gig in visible.iter().skip(shown) {
            print_gig(gig, tz);
        }
        shown = visible.len();

        match board.load_more(listing).await {
            LoadOutcome::Loaded => println!("  ··· more ···"),
            _ => break,
        }
    }
}

fn print_gig(gig: &Gig, tz: Tz) {
    let time = listing_time(gig, tz).unwrap_or_default();
    println!("  {}  {}", format_date(&gig.start_time, tz), time);
    println!("    {}", gig.title);
    if !gig.location.is_empty() {
        println!("    @ {}", gig.location);
    }
}

/// All-day gigs have no time of day to show
fn listing_time(gig: &Gig, tz: Tz) -> Option<String> {
    if gig.all_day {
        return None;
    }
    Some(format_time_range(&gig.start_time, gig.end_time.as_ref(), tz))
}
