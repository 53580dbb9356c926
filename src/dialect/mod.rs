//! Dialect-specific information schema queries.
//!
//! Each logical query the crawler needs is named by an
//! [`InformationSchemaKey`]. A dialect is nothing more than a mapping from
//! those keys to SQL text, plus the schema exclusions that make sense for the
//! vendor. Callers override or add entries with [`QueryTemplates::with_sql`].
//!
//! Templates may reference two named parameters:
//!
//! | Parameter | Bound to                      | Template scope |
//! |-----------|-------------------------------|----------------|
//! | `:schema` | schema name, as the source knows it | per schema |
//! | `:table`  | table name                    | per table      |
//!
//! A template with neither parameter runs once per crawl.
//!
//! # Usage
//!
//! ```
//! use schemascope::dialect::{Dialect, InformationSchemaKey, QueryTemplates};
//!
//! let templates = QueryTemplates::for_dialect(Dialect::Sqlite).with_sql(
//!     InformationSchemaKey::ExtIndexes,
//!     "SELECT NULL AS INDEX_CATALOG, :schema AS INDEX_SCHEMA, :table AS TABLE_NAME, \
//!      name AS INDEX_NAME, '' AS REMARKS, '' AS INDEX_DEFINITION \
//!      FROM pragma_index_list(:table, :schema)",
//! );
//! assert!(templates.contains(InformationSchemaKey::ExtIndexes));
//! ```

mod ansi;
mod oracle;
mod sqlite;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::inclusion::{ExclusionList, InclusionRule};

/// Logical name of a metadata query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InformationSchemaKey {
    Schemata,
    Tables,
    TableColumns,
    Indexes,
    PrimaryKeys,
    ExtTables,
    ExtIndexes,
    ExtIndexColumns,
    ForeignKeys,
    Routines,
}

impl InformationSchemaKey {
    pub const ALL: [InformationSchemaKey; 10] = [
        Self::Schemata,
        Self::Tables,
        Self::TableColumns,
        Self::Indexes,
        Self::PrimaryKeys,
        Self::ExtTables,
        Self::ExtIndexes,
        Self::ExtIndexColumns,
        Self::ForeignKeys,
        Self::Routines,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schemata => "SCHEMATA",
            Self::Tables => "TABLES",
            Self::TableColumns => "TABLE_COLUMNS",
            Self::Indexes => "INDEXES",
            Self::PrimaryKeys => "PRIMARY_KEYS",
            Self::ExtTables => "EXT_TABLES",
            Self::ExtIndexes => "EXT_INDEXES",
            Self::ExtIndexColumns => "EXT_INDEX_COLUMNS",
            Self::ForeignKeys => "FOREIGN_KEYS",
            Self::Routines => "ROUTINES",
        }
    }

    /// Parse a key from its upper-case name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for InformationSchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a template has to be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScope {
    /// Once per crawl.
    Global,
    /// Once per included schema, with `:schema` bound.
    Schema,
    /// Once per included table, with `:schema` and `:table` bound.
    Table,
}

impl QueryScope {
    /// Derive the scope from the named parameters the SQL references.
    pub fn of(sql: &str) -> Self {
        if references_parameter(sql, ":table") {
            QueryScope::Table
        } else if references_parameter(sql, ":schema") {
            QueryScope::Schema
        } else {
            QueryScope::Global
        }
    }
}

fn references_parameter(sql: &str, name: &str) -> bool {
    sql.match_indices(name).any(|(at, _)| {
        let next = sql[at + name.len()..].chars().next();
        !next.is_some_and(|c| c.is_alphanumeric() || c == '_')
    })
}

/// Mapping from logical query key to SQL text.
#[derive(Debug, Clone, Default)]
pub struct QueryTemplates {
    templates: BTreeMap<InformationSchemaKey, String>,
}

impl QueryTemplates {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in templates for a dialect.
    pub fn for_dialect(dialect: Dialect) -> Self {
        let entries = match dialect {
            Dialect::Sqlite => sqlite::TEMPLATES,
            Dialect::Oracle => oracle::TEMPLATES,
            Dialect::InformationSchema => ansi::TEMPLATES,
        };
        Self {
            templates: entries
                .iter()
                .map(|(key, sql)| (*key, sql.to_string()))
                .collect(),
        }
    }

    /// Register (or replace) the SQL for a key.
    pub fn with_sql(mut self, key: InformationSchemaKey, sql: impl Into<String>) -> Self {
        self.insert(key, sql);
        self
    }

    pub fn insert(&mut self, key: InformationSchemaKey, sql: impl Into<String>) {
        self.templates.insert(key, sql.into());
    }

    /// Drop the SQL for a key, leaving that query unregistered.
    pub fn without(mut self, key: InformationSchemaKey) -> Self {
        self.templates.remove(&key);
        self
    }

    pub fn get(&self, key: InformationSchemaKey) -> Option<&str> {
        self.templates.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: InformationSchemaKey) -> bool {
        self.templates.contains_key(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (InformationSchemaKey, &str)> {
        self.templates.iter().map(|(key, sql)| (*key, sql.as_str()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Supported metadata dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// SQLite pragma table-valued functions.
    Sqlite,
    /// Oracle data dictionary views.
    Oracle,
    /// ANSI `INFORMATION_SCHEMA` views.
    InformationSchema,
}

impl Dialect {
    /// Parse a dialect from a driver name.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, ConfigurationError> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            "oracle" => Ok(Dialect::Oracle),
            "information_schema" | "ansi" | "postgres" | "postgresql" => {
                Ok(Dialect::InformationSchema)
            }
            other => Err(ConfigurationError::UnknownDialect(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "sqlite",
            Dialect::Oracle => "oracle",
            Dialect::InformationSchema => "information_schema",
        }
    }

    /// Schemas excluded by default for this dialect.
    pub fn schema_exclusions(&self) -> InclusionRule {
        let list = match self {
            Dialect::Sqlite => ExclusionList::sqlite(),
            Dialect::Oracle => ExclusionList::oracle(),
            Dialect::InformationSchema => ExclusionList::information_schema(),
        };
        InclusionRule::Exclusions(list)
    }
}
