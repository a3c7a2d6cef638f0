use crate::error::{config_error, env_error, GigResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::time::Duration;

/// Default number of gigs shown per page ("2 rows of 3")
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Default artificial latency before a "load more" step lands
pub const DEFAULT_LOAD_DELAY_MS: u64 = 300;

/// Default port for the gigs endpoint
pub const DEFAULT_PORT: u16 = 3000;

/// Optional overrides read from `config/site.toml`
const SITE_CONFIG_PATH: &str = "config/site.toml";

/// Main configuration structure for the gigs service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service account email used as the assertion issuer
    pub google_client_email: Option<String>,
    /// Service account private key (PEM)
    pub google_private_key: Option<String>,
    /// Google Calendar ID holding the gigs
    pub google_calendar_id: Option<String>,
    /// Timezone used for date-only events and display formatting
    pub timezone: String,
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Number of gigs per page in each listing
    pub page_size: usize,
    /// Delay in milliseconds before a "load more" step is applied
    pub load_delay_ms: u64,
}

/// Overrides that may be kept in `config/site.toml`
#[derive(Debug, Default, Deserialize)]
struct SiteFile {
    page_size: Option<usize>,
    load_delay_ms: Option<u64>,
    timezone: Option<String>,
}

/// Validated service account credentials for the calendar provider
#[derive(Debug, Clone)]
pub struct ServiceAccount {
    pub client_email: String,
    pub private_key: String,
    pub calendar_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_client_email: None,
            google_private_key: None,
            google_calendar_id: None,
            timezone: String::from("UTC"),
            bind_address: String::from("127.0.0.1"),
            port: DEFAULT_PORT,
            page_size: DEFAULT_PAGE_SIZE,
            load_delay_ms: DEFAULT_LOAD_DELAY_MS,
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> GigResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Credentials are optional; missing ones disable the calendar fetcher
        let google_client_email = optional_var("GOOGLE_CLIENT_EMAIL");
        let google_private_key = optional_var("GOOGLE_PRIVATE_KEY").map(|key| unescape_key(&key));
        let google_calendar_id = optional_var("GOOGLE_CALENDAR_ID");

        let mut config = Config {
            google_client_email,
            google_private_key,
            google_calendar_id,
            ..Default::default()
        };

        if let Some(timezone) = optional_var("TIMEZONE") {
            config.timezone = timezone;
        }
        if let Some(bind_address) = optional_var("BIND_ADDRESS") {
            config.bind_address = bind_address;
        }
        if let Some(port) = optional_var("PORT") {
            config.port = port.parse::<u16>().map_err(|_| env_error("PORT"))?;
        }
        if let Some(page_size) = optional_var("GIGS_PAGE_SIZE") {
            config.page_size = page_size
                .parse::<usize>()
                .map_err(|_| env_error("GIGS_PAGE_SIZE"))?;
        }
        if let Some(delay) = optional_var("GIGS_LOAD_DELAY_MS") {
            config.load_delay_ms = delay
                .parse::<u64>()
                .map_err(|_| env_error("GIGS_LOAD_DELAY_MS"))?;
        }

        // Merge overrides from the site file if it exists
        if let Ok(content) = fs::read_to_string(SITE_CONFIG_PATH) {
            config.apply_site_file(&content)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the TOML site file
    pub fn apply_site_file(&mut self, content: &str) -> GigResult<()> {
        let site: SiteFile = toml::from_str(content)?;
        if let Some(page_size) = site.page_size {
            self.page_size = page_size;
        }
        if let Some(delay) = site.load_delay_ms {
            self.load_delay_ms = delay;
        }
        if let Some(timezone) = site.timezone {
            self.timezone = timezone;
        }
        Ok(())
    }

    /// Check values that cannot be rejected while parsing
    pub fn validate(&self) -> GigResult<()> {
        if self.page_size == 0 {
            return Err(config_error("Page size must be at least 1"));
        }
        self.tz()?;
        Ok(())
    }

    /// Parsed site timezone
    pub fn tz(&self) -> GigResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown timezone: {}", self.timezone)))
    }

    /// Service account credentials, if all three values are present
    pub fn service_account(&self) -> Option<ServiceAccount> {
        Some(ServiceAccount {
            client_email: self.google_client_email.clone()?,
            private_key: self.google_private_key.clone()?,
            calendar_id: self.google_calendar_id.clone()?,
        })
    }

    /// Delay applied before a "load more" step lands
    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }
}

/// Read an environment variable, treating empty values as unset
fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Private keys pasted into env files usually carry literal `\n` sequences
pub fn unescape_key(key: &str) -> String {
    key.replace("\\n", "\n")
}
