#[cfg(feature = "web-interface")]
pub mod api;
pub mod components;
pub mod config;
pub mod error;
pub mod utils;
