//! Error types for catalog assembly.
//!
//! Retrieval-phase errors abort the crawl and surface as [`CrawlError`].
//! Lookup misses during overlay passes are never errors; they are reported
//! as [`Diagnostic`](crate::diagnostics::Diagnostic)s instead.

use std::time::Duration;

use thiserror::Error;

use crate::dialect::InformationSchemaKey;
use crate::session::SourceError;

/// Result type for crawl operations.
pub type CrawlResult<T> = Result<T, CrawlError>;

/// Problems with how a crawl was configured. Raised before any query runs.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// A mandatory logical query has no template for this dialect.
    #[error("no query registered for mandatory key {0}")]
    MissingQuery(InformationSchemaKey),

    /// An inclusion pattern failed to compile.
    #[error("invalid inclusion pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The dialect name is not known.
    #[error("unknown dialect: {0}. Supported: sqlite, oracle, information_schema")]
    UnknownDialect(String),

    /// The dialect is known but no metadata source is bundled for it.
    #[error("no bundled metadata source for driver '{0}'")]
    UnsupportedDriver(String),
}

/// A metadata query failed.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// The metadata source rejected the query.
    #[error("query {key} was rejected: {message}")]
    Rejected {
        key: InformationSchemaKey,
        message: String,
    },

    /// The query ran past the session's timeout and was cancelled.
    #[error("query {key} timed out after {timeout:?}")]
    Timeout {
        key: InformationSchemaKey,
        timeout: Duration,
    },

    /// A result row lacked a column the step cannot do without.
    #[error("query {key} returned a row without column {column}")]
    MissingColumn {
        key: InformationSchemaKey,
        column: &'static str,
    },
}

impl RetrievalError {
    pub(crate) fn from_source(key: InformationSchemaKey, err: SourceError) -> Self {
        match err {
            SourceError::Timeout(timeout) => Self::Timeout { key, timeout },
            SourceError::Rejected(message) => Self::Rejected { key, message },
        }
    }

    /// The logical query this error belongs to.
    pub fn key(&self) -> InformationSchemaKey {
        match self {
            Self::Rejected { key, .. } | Self::Timeout { key, .. } | Self::MissingColumn { key, .. } => {
                *key
            }
        }
    }

    /// Check if the query was cancelled by the timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Errors that abort a catalog build.
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A mandatory retrieval step failed.
    #[error("retrieval step '{step}' failed: {source}")]
    Retrieval {
        step: &'static str,
        #[source]
        source: RetrievalError,
    },

    /// Opening the metadata source failed.
    #[error("could not open metadata source: {0}")]
    Connection(String),

    /// A concurrent crawl worker panicked or was cancelled.
    #[error("crawl worker failed: {0}")]
    Join(String),
}

impl From<tokio::task::JoinError> for CrawlError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Join(err.to_string())
    }
}
