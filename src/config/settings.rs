//! TOML-based configuration for schemascope.
//!
//! Supports a config file (schemascope.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [connections.dev]
//! driver = "sqlite"
//! connection_string = "${DEV_DB_PATH}"
//! attach = { books = "./books.db" }
//!
//! [connections.dev.queries]
//! EXT_TABLES = "SELECT ..."
//!
//! [crawl]
//! query_timeout_seconds = 30
//! infer_weak_associations = true
//! attributes_file = "attributes.toml"
//!
//! [crawl.schemas]
//! exclude = "temp"
//!
//! [crawl.tables]
//! include = "main\\..*"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::connection::ConnectionConfig;
use crate::dialect::{Dialect, InformationSchemaKey};
use crate::error::ConfigurationError;
use crate::inclusion::{InclusionRule, InclusionRules};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("Unknown query key '{0}' in connection queries")]
    UnknownQuery(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigurationError),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Named metadata connections.
    pub connections: BTreeMap<String, ConnectionSettings>,

    /// What to crawl and what to do afterwards.
    pub crawl: CrawlSettings,
}

/// Connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionSettings {
    /// Metadata dialect (sqlite, oracle, information_schema).
    pub driver: String,
    /// Connection string (supports ${ENV_VAR} expansion).
    pub connection_string: String,
    /// Extra databases attached as schemas (SQLite only).
    #[serde(default)]
    pub attach: BTreeMap<String, String>,
    /// Template overrides keyed by logical query name.
    #[serde(default)]
    pub queries: BTreeMap<String, String>,
}

impl ConnectionSettings {
    /// Get the dialect.
    pub fn dialect(&self) -> Result<Dialect, SettingsError> {
        Ok(Dialect::from_str(&self.driver)?)
    }

    /// Get the connection string with environment variables expanded.
    pub fn resolved_connection_string(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.connection_string)
    }

    /// Resolve into a ready-to-open connection.
    pub fn to_connection_config(
        &self,
        query_timeout: Option<Duration>,
    ) -> Result<ConnectionConfig, SettingsError> {
        let mut attach = BTreeMap::new();
        for (schema, path) in &self.attach {
            attach.insert(schema.clone(), expand_env_vars(path)?);
        }

        let mut queries = BTreeMap::new();
        for (name, sql) in &self.queries {
            let key = InformationSchemaKey::from_name(name)
                .ok_or_else(|| SettingsError::UnknownQuery(name.clone()))?;
            queries.insert(key, sql.clone());
        }

        Ok(ConnectionConfig {
            dialect: self.dialect()?,
            location: self.resolved_connection_string()?,
            attach,
            queries,
            query_timeout,
        })
    }
}

/// Include and exclude patterns for one kind of object.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternSettings {
    pub include: Option<String>,
    pub exclude: Option<String>,
}

impl PatternSettings {
    pub fn to_rule(&self) -> Result<InclusionRule, ConfigurationError> {
        InclusionRule::from_patterns(self.include.as_deref(), self.exclude.as_deref())
    }
}

/// Crawl configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CrawlSettings {
    pub schemas: PatternSettings,
    pub tables: PatternSettings,
    pub columns: PatternSettings,
    pub routines: PatternSettings,
    /// Per-query timeout in seconds. Unset means no timeout.
    pub query_timeout_seconds: Option<u64>,
    /// Run naming-convention inference after the crawl.
    pub infer_weak_associations: bool,
    /// Attributes document applied after the crawl.
    pub attributes_file: Option<String>,
}

impl CrawlSettings {
    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_seconds.map(Duration::from_secs)
    }

    /// Build the crawl's inclusion rules.
    ///
    /// The dialect's system schema exclusions always apply on top of the
    /// configured schema patterns.
    pub fn inclusion_rules(&self, dialect: Dialect) -> Result<InclusionRules, ConfigurationError> {
        Ok(InclusionRules::include_all()
            .with_schemas(self.schemas.to_rule()?.and(dialect.schema_exclusions()))
            .with_tables(self.tables.to_rule()?)
            .with_columns(self.columns.to_rule()?)
            .with_routines(self.routines.to_rule()?))
    }

    /// The attributes file with environment variables expanded.
    pub fn attributes_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.attributes_file
            .as_deref()
            .map(|path| expand_env_vars(path).map(PathBuf::from))
            .transpose()
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SCHEMASCOPE_CONFIG`
    /// 2. `./schemascope.toml`
    /// 3. `~/.config/schemascope/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("SCHEMASCOPE_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("schemascope.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("schemascope").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Get a connection by name.
    pub fn get_connection(&self, name: &str) -> Result<&ConnectionSettings, SettingsError> {
        self.connections
            .get(name)
            .ok_or_else(|| SettingsError::ConnectionNotFound(name.to_string()))
    }

    /// Get the default connection ("default" if it exists, else the first by name).
    pub fn default_connection(&self) -> Option<(&str, &ConnectionSettings)> {
        if let Some(conn) = self.connections.get("default") {
            return Some(("default", conn));
        }
        self.connections.iter().next().map(|(k, v)| (k.as_str(), v))
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }

        let mut var_name = String::new();
        while let Some(&ch) = chars.peek() {
            if braced {
                chars.next();
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            } else if ch.is_alphanumeric() || ch == '_' {
                chars.next();
                var_name.push(ch);
            } else {
                break;
            }
        }

        if var_name.is_empty() && !braced {
            // A lone $ is kept as-is
            result.push('$');
            continue;
        }

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
