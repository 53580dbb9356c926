//! Configuration module for schemascope.
//!
//! Handles connection configuration, environment variables, and settings.

mod connection;
mod settings;

pub use connection::{ConnectionConfig, ConnectionError};
pub use settings::{
    expand_env_vars, ConnectionSettings, CrawlSettings, PatternSettings, Settings, SettingsError,
};
