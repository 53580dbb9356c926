//! Bundled SQLite metadata source.
//!
//! Attached databases appear as schemas, so a single connection can stand in
//! for a multi-schema database:
//!
//! ```
//! use schemascope::session::{MetadataSource, QueryParams, SqliteSource};
//!
//! let mut source = SqliteSource::open_in_memory().unwrap();
//! source.attach("books", ":memory:").unwrap();
//! let rows = source
//!     .query("SELECT name AS SCHEMA_NAME FROM pragma_database_list", &QueryParams::none())
//!     .unwrap();
//! assert_eq!(rows.len(), 2);
//! ```

use std::path::Path;
use std::time::{Duration, Instant};

use rusqlite::types::ValueRef;
use rusqlite::{Connection, ErrorCode};

use super::source::{MetadataRow, MetadataSource, QueryParams, SourceError, Value};

/// Number of virtual machine instructions between deadline checks.
const PROGRESS_INTERVAL: i32 = 1000;

/// A [`MetadataSource`] over a rusqlite connection.
pub struct SqliteSource {
    conn: Connection,
    label: String,
    timeout: Option<Duration>,
}

impl SqliteSource {
    /// Open a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(rejected)?;
        Ok(Self {
            conn,
            label: format!("sqlite:{}", path.display()),
            timeout: None,
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, SourceError> {
        let conn = Connection::open_in_memory().map_err(rejected)?;
        Ok(Self::from_connection(conn))
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            label: "sqlite::memory:".to_string(),
            timeout: None,
        }
    }

    /// Attach another database under a schema name.
    pub fn attach(&mut self, schema: &str, path: &str) -> Result<(), SourceError> {
        let sql = format!("ATTACH DATABASE ?1 AS \"{}\"", schema.replace('"', "\"\""));
        self.conn.execute(&sql, [path]).map_err(rejected)?;
        tracing::debug!(schema, path, "attached database");
        Ok(())
    }

    /// Set the per-query timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Borrow the underlying connection, e.g. to load fixtures.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn run(&self, sql: &str, params: &QueryParams) -> Result<Vec<MetadataRow>, SourceError> {
        let mut stmt = self.conn.prepare(sql).map_err(rejected)?;

        for (name, value) in params.named() {
            if let Some(index) = stmt.parameter_index(name).map_err(rejected)? {
                stmt.raw_bind_parameter(index, value).map_err(rejected)?;
            }
        }

        let labels: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.raw_query();
        let mut collected = Vec::new();
        while let Some(row) = rows.next().map_err(|err| self.classify(err))? {
            let mut metadata = MetadataRow::new();
            for (i, label) in labels.iter().enumerate() {
                let value = match row.get_ref(i).map_err(rejected)? {
                    ValueRef::Null => Value::Null,
                    ValueRef::Integer(v) => Value::Integer(v),
                    ValueRef::Real(v) => Value::Real(v),
                    ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                        Value::Text(String::from_utf8_lossy(bytes).into_owned())
                    }
                };
                metadata.insert(label, value);
            }
            collected.push(metadata);
        }
        Ok(collected)
    }

    fn classify(&self, err: rusqlite::Error) -> SourceError {
        match (err.sqlite_error_code(), self.timeout) {
            (Some(ErrorCode::OperationInterrupted), Some(timeout)) => SourceError::Timeout(timeout),
            _ => rejected(err),
        }
    }
}

impl MetadataSource for SqliteSource {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn query(&mut self, sql: &str, params: &QueryParams) -> Result<Vec<MetadataRow>, SourceError> {
        if let Some(timeout) = self.timeout {
            let deadline = Instant::now() + timeout;
            self.conn
                .progress_handler(PROGRESS_INTERVAL, Some(move || Instant::now() >= deadline));
        }

        let result = self.run(sql, params);

        if self.timeout.is_some() {
            self.conn.progress_handler(PROGRESS_INTERVAL, None::<fn() -> bool>);
        }
        result
    }

    fn set_query_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }
}

fn rejected(err: rusqlite::Error) -> SourceError {
    SourceError::Rejected(err.to_string())
}
