//! Qualified names used as lookup keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A schema, identified by its optional catalog and schema name parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemaName {
    pub catalog: Option<String>,
    pub name: Option<String>,
}

impl SchemaName {
    pub fn new(catalog: Option<&str>, name: Option<&str>) -> Self {
        Self {
            catalog: catalog.filter(|s| !s.is_empty()).map(str::to_string),
            name: name.filter(|s| !s.is_empty()).map(str::to_string),
        }
    }

    /// A schema with no catalog part.
    pub fn named(name: &str) -> Self {
        Self::new(None, Some(name))
    }

    /// The present name parts joined with `.`.
    pub fn full_name(&self) -> String {
        match (&self.catalog, &self.name) {
            (Some(catalog), Some(name)) => format!("{}.{}", catalog, name),
            (Some(only), None) | (None, Some(only)) => only.clone(),
            (None, None) => String::new(),
        }
    }

    /// The name the metadata source knows this schema by, for binding `:schema`.
    pub fn query_name(&self) -> Option<&str> {
        self.name.as_deref().or(self.catalog.as_deref())
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// Qualified table name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableKey {
    pub schema: SchemaName,
    pub name: String,
}

impl TableKey {
    pub fn new(schema: SchemaName, name: impl Into<String>) -> Self {
        Self {
            schema,
            name: name.into(),
        }
    }

    /// `schema.table`, or just `table` when the schema has no name.
    pub fn full_name(&self) -> String {
        let schema = self.schema.full_name();
        if schema.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", schema, self.name)
        }
    }

    pub fn column(&self, name: impl Into<String>) -> ColumnKey {
        ColumnKey {
            table: self.clone(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// Qualified column name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColumnKey {
    pub table: TableKey,
    pub name: String,
}

impl ColumnKey {
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.table.full_name(), self.name)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}
