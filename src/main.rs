mod shutdown;
mod startup;

use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting setlist");

    // Load configuration
    let config = startup::load_config()?;

    // Serve the gigs endpoint until a shutdown signal arrives
    startup::start_server(config).await
}
