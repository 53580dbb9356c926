//! Retriever sessions.
//!
//! A [`RetrieverSession`] owns exactly one live [`MetadataSource`] and the
//! query templates resolved for it. Calls take `&mut self`, so one session
//! issues one query at a time; run several sessions to crawl in parallel.

mod source;
mod sqlite;

pub use source::{MetadataRow, MetadataSource, QueryParams, SourceError, Value};
pub use sqlite::SqliteSource;

use std::collections::BTreeMap;
use std::time::Duration;

use crate::dialect::{InformationSchemaKey, QueryScope, QueryTemplates};
use crate::error::RetrievalError;

#[derive(Debug, Clone)]
struct QueryTemplate {
    sql: String,
    scope: QueryScope,
}

/// One connection plus the SQL it answers logical queries with.
pub struct RetrieverSession {
    source: Box<dyn MetadataSource>,
    templates: BTreeMap<InformationSchemaKey, QueryTemplate>,
    timeout: Option<Duration>,
}

impl RetrieverSession {
    /// Create a session. Template scopes are resolved here, once.
    pub fn new(source: impl MetadataSource + 'static, templates: QueryTemplates) -> Self {
        Self::from_boxed(Box::new(source), templates)
    }

    pub fn from_boxed(source: Box<dyn MetadataSource>, templates: QueryTemplates) -> Self {
        let templates = templates
            .iter()
            .map(|(key, sql)| {
                let template = QueryTemplate {
                    sql: sql.to_string(),
                    scope: QueryScope::of(sql),
                };
                (key, template)
            })
            .collect();

        Self {
            source,
            templates,
            timeout: None,
        }
    }

    /// Cancel queries that run longer than `timeout`.
    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.source.set_query_timeout(timeout);
        self.timeout = timeout;
        self
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// Check if a template is registered for `key`.
    pub fn has_template(&self, key: InformationSchemaKey) -> bool {
        self.templates.contains_key(&key)
    }

    /// Scope of the registered template, if any.
    pub fn scope(&self, key: InformationSchemaKey) -> Option<QueryScope> {
        self.templates.get(&key).map(|t| t.scope)
    }

    /// Run a query with no parameters bound.
    pub fn execute(&mut self, key: InformationSchemaKey) -> Result<Vec<MetadataRow>, RetrievalError> {
        self.execute_with(key, &QueryParams::none())
    }

    /// Run a query with named parameters bound.
    ///
    /// A key with no registered template yields no rows.
    pub fn execute_with(
        &mut self,
        key: InformationSchemaKey,
        params: &QueryParams,
    ) -> Result<Vec<MetadataRow>, RetrievalError> {
        let Some(template) = self.templates.get(&key) else {
            tracing::debug!(key = key.as_str(), "no query registered, skipping");
            return Ok(Vec::new());
        };

        self.source
            .query(&template.sql, params)
            .map_err(|err| RetrievalError::from_source(key, err))
    }

    /// Give the connection back, e.g. to build a session with other templates.
    pub fn into_source(self) -> Box<dyn MetadataSource> {
        self.source
    }
}

impl std::fmt::Debug for RetrieverSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrieverSession")
            .field("source", &self.source.describe())
            .field("templates", &self.templates.keys().collect::<Vec<_>>())
            .field("timeout", &self.timeout)
            .finish()
    }
}
