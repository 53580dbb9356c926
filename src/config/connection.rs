//! Metadata connection configuration.
//!
//! Supports configuration via environment variables:
//! - `SCHEMASCOPE_DB_DRIVER`: Metadata dialect (sqlite, oracle, information_schema)
//! - `SCHEMASCOPE_DB_PATH`: Database file or connection string
//! - `SCHEMASCOPE_DB_TIMEOUT`: Per-query timeout in seconds (optional)

use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use crate::dialect::{Dialect, InformationSchemaKey, QueryTemplates};
use crate::error::{ConfigurationError, CrawlError, CrawlResult};
use crate::session::{RetrieverSession, SqliteSource};

/// Error type for connection configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Everything needed to open one metadata session.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Metadata dialect, which selects the built-in query templates.
    pub dialect: Dialect,
    /// Database file or connection string, already expanded.
    pub location: String,
    /// Additional databases attached as schemas, keyed by schema name.
    pub attach: BTreeMap<String, String>,
    /// Template overrides layered over the dialect's built-in set.
    pub queries: BTreeMap<InformationSchemaKey, String>,
    /// Per-query timeout.
    pub query_timeout: Option<Duration>,
}

impl ConnectionConfig {
    /// A SQLite database file with the built-in templates.
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            dialect: Dialect::Sqlite,
            location: path.into(),
            attach: BTreeMap::new(),
            queries: BTreeMap::new(),
            query_timeout: None,
        }
    }

    /// Attach another database as `schema`.
    pub fn with_attached(mut self, schema: impl Into<String>, path: impl Into<String>) -> Self {
        self.attach.insert(schema.into(), path.into());
        self
    }

    /// Override the SQL for one logical query.
    pub fn with_query(mut self, key: InformationSchemaKey, sql: impl Into<String>) -> Self {
        self.queries.insert(key, sql.into());
        self
    }

    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `SCHEMASCOPE_DB_DRIVER`: sqlite, oracle or information_schema
    /// - `SCHEMASCOPE_DB_PATH`: Database file or connection string
    ///
    /// Optional:
    /// - `SCHEMASCOPE_DB_TIMEOUT`: Query timeout in whole seconds
    pub fn from_env() -> Result<Self, ConnectionError> {
        let driver = env::var("SCHEMASCOPE_DB_DRIVER")
            .map_err(|_| ConnectionError::MissingEnvVar("SCHEMASCOPE_DB_DRIVER".to_string()))?;
        let location = env::var("SCHEMASCOPE_DB_PATH")
            .map_err(|_| ConnectionError::MissingEnvVar("SCHEMASCOPE_DB_PATH".to_string()))?;

        let query_timeout = match env::var("SCHEMASCOPE_DB_TIMEOUT") {
            Ok(secs) => Some(Duration::from_secs(secs.parse().map_err(|_| {
                ConnectionError::InvalidConfig(format!("Invalid timeout: {}", secs))
            })?)),
            Err(_) => None,
        };

        Ok(Self {
            dialect: Dialect::from_str(&driver)?,
            location,
            attach: BTreeMap::new(),
            queries: BTreeMap::new(),
            query_timeout,
        })
    }

    /// The dialect's templates with this connection's overrides applied.
    pub fn templates(&self) -> QueryTemplates {
        let mut templates = QueryTemplates::for_dialect(self.dialect);
        for (key, sql) in &self.queries {
            templates.insert(*key, sql.clone());
        }
        templates
    }

    /// Open the database, attach the extra schemas and build a session.
    ///
    /// Only SQLite has a bundled metadata source; other dialects are
    /// rejected with [`ConfigurationError::UnsupportedDriver`] before
    /// anything is opened.
    pub fn open_session(&self) -> CrawlResult<RetrieverSession> {
        if self.dialect != Dialect::Sqlite {
            return Err(ConfigurationError::UnsupportedDriver(self.dialect.name().to_string()).into());
        }

        let mut source = SqliteSource::open(&self.location)
            .map_err(|e| CrawlError::Connection(format!("{}: {}", self.location, e)))?;
        for (schema, path) in &self.attach {
            source
                .attach(schema, path)
                .map_err(|e| CrawlError::Connection(format!("attach {}: {}", schema, e)))?;
        }

        tracing::info!(
            dialect = self.dialect.name(),
            location = %self.location,
            attached = self.attach.len(),
            "opened metadata connection"
        );
        Ok(RetrieverSession::new(source, self.templates()).with_query_timeout(self.query_timeout))
    }
}
