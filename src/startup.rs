use crate::shutdown;
use setlist::api::{router, AppState};
use setlist::components::GoogleCalendarHandle;
use setlist::config::Config;
use setlist::error::{config_error, other_error, Error};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and validate the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Spawn the calendar actor and serve the gigs endpoint
pub async fn start_server(config: Config) -> miette::Result<()> {
    let timezone = config.tz()?;

    // Spawn the calendar actor; a disabled fetcher still answers with no events
    let calendar = GoogleCalendarHandle::from_config(&config);

    let app = router(AppState {
        calendar: calendar.clone(),
        timezone,
    });

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .map_err(|_| config_error(&format!("Invalid bind address: {}", config.bind_address)))?;

    let listener = TcpListener::bind(addr).await.map_err(Error::from)?;
    info!("Listening on {}", addr);

    // Create shutdown channel and spawn signal handler task
    let (shutdown_send, shutdown_recv) = oneshot::channel();
    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send, calendar).await;
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = shutdown_recv.await;
            info!("Received shutdown signal, stopping server...");
        })
        .await
        .map_err(|e| other_error(&format!("Server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}
