//! The call-level query interface a retriever session talks to.

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;

/// Errors raised by a metadata source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The source refused or failed the query.
    #[error("{0}")]
    Rejected(String),

    /// The query was cancelled after running past the timeout.
    #[error("query cancelled after {0:?}")]
    Timeout(Duration),
}

/// A single value in a metadata result row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

/// One row of a metadata query, keyed by upper-case column label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataRow {
    values: BTreeMap<String, Value>,
}

impl MetadataRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(label, value)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: AsRef<str>,
    {
        let mut row = Self::new();
        for (label, value) in pairs {
            row.insert(label.as_ref(), value);
        }
        row
    }

    pub fn insert(&mut self, label: &str, value: Value) {
        self.values.insert(label.to_uppercase(), value);
    }

    pub fn get(&self, label: &str) -> Option<&Value> {
        self.values.get(label)
    }

    /// Text value of a column. Numbers are rendered; `NULL` and missing
    /// columns yield `None`.
    pub fn text(&self, label: &str) -> Option<String> {
        match self.values.get(label)? {
            Value::Null => None,
            Value::Text(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Real(r) => Some(r.to_string()),
        }
    }

    /// Text value, or the empty string.
    pub fn text_or_empty(&self, label: &str) -> String {
        self.text(label).unwrap_or_default()
    }

    /// Integer value of a column. Text that parses as an integer is accepted.
    pub fn integer(&self, label: &str) -> Option<i64> {
        match self.values.get(label)? {
            Value::Integer(i) => Some(*i),
            Value::Real(r) => Some(*r as i64),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Null => None,
        }
    }

    /// Boolean flag. Accepts `0`/`1`, `true`/`false` and `YES`/`NO`.
    pub fn flag(&self, label: &str) -> bool {
        match self.values.get(label) {
            Some(Value::Integer(i)) => *i != 0,
            Some(Value::Real(r)) => *r != 0.0,
            Some(Value::Text(s)) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "y" | "t"
            ),
            Some(Value::Null) | None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Named parameters bound to a query template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub schema: Option<String>,
    pub table: Option<String>,
}

impl QueryParams {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn for_schema(schema: Option<&str>) -> Self {
        Self {
            schema: Some(schema.unwrap_or_default().to_string()),
            table: None,
        }
    }

    pub fn for_table(schema: Option<&str>, table: &str) -> Self {
        Self {
            schema: Some(schema.unwrap_or_default().to_string()),
            table: Some(table.to_string()),
        }
    }

    /// The bound parameters as `(placeholder, value)` pairs.
    pub fn named(&self) -> Vec<(&'static str, &str)> {
        let mut named = Vec::with_capacity(2);
        if let Some(schema) = &self.schema {
            named.push((":schema", schema.as_str()));
        }
        if let Some(table) = &self.table {
            named.push((":table", table.as_str()));
        }
        named
    }
}

/// A live connection that can answer metadata queries.
///
/// Implementations are not expected to be safe for concurrent query
/// issuance; the owning session hands out `&mut` access one call at a time.
pub trait MetadataSource: Send {
    /// Human-readable description of the source, for logging.
    fn describe(&self) -> String;

    /// Run a query with named parameters and collect its rows.
    ///
    /// Parameters the SQL does not reference are ignored.
    fn query(&mut self, sql: &str, params: &QueryParams) -> Result<Vec<MetadataRow>, SourceError>;

    /// Limit how long a single query may run. `None` disables the limit.
    fn set_query_timeout(&mut self, timeout: Option<Duration>);
}
