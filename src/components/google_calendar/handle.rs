use super::actor::{GoogleCalendarActor, GoogleCalendarActorHandle};
use super::client::{CalendarFetcher, EventSource};
use super::models::CalendarEvent;
use crate::config::Config;
use crate::error::GigResult;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle for interacting with the Google Calendar actor
#[derive(Clone)]
pub struct GoogleCalendarHandle {
    actor_handle: GoogleCalendarActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl GoogleCalendarHandle {
    /// Create a new GoogleCalendarHandle and spawn the actor
    pub fn new(source: Arc<dyn EventSource>) -> Self {
        let (mut actor, handle) = GoogleCalendarActor::new(source);

        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Spawn the actor over the fetcher described by the config
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(CalendarFetcher::from_config(config)))
    }

    /// Fetch the raw events in the gig window
    pub async fn fetch_events(&self) -> GigResult<Vec<CalendarEvent>> {
        self.actor_handle.fetch_events().await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> GigResult<()> {
        self.actor_handle.shutdown().await
    }
}
