use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(setlist::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(setlist::config))]
    Config(String),

    #[error("Google auth error: {0}")]
    #[diagnostic(code(setlist::google_auth))]
    GoogleAuth(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(setlist::google_calendar))]
    GoogleCalendar(String),

    #[error("Calendar actor error: {0}")]
    #[diagnostic(code(setlist::actor))]
    Actor(String),

    #[error(transparent)]
    #[diagnostic(code(setlist::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(setlist::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(setlist::other))]
    Other(String),
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type GigResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create token exchange errors
pub fn auth_error(message: &str) -> Error {
    Error::GoogleAuth(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create actor mailbox errors
pub fn actor_error(message: &str) -> Error {
    Error::Actor(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
