//! Externally supplied catalog attributes.
//!
//! An attributes document adds facts the database does not hold: remarks,
//! tags, and weak associations between columns. Documents are JSON or TOML
//! and are applied after the crawl by [`overlay::apply`] and
//! [`weak::resolve_weak_associations`].
//!
//! ```json
//! {
//!   "tables": [
//!     {
//!       "schema": "books",
//!       "name": "authors",
//!       "remarks": ["Writers of books.", "One row per person."],
//!       "attributes": { "owner": "editorial" },
//!       "columns": [{ "name": "id", "remarks": "Surrogate key" }]
//!     }
//!   ],
//!   "weakAssociations": [
//!     {
//!       "referencedTable": { "schema": "books", "name": "authors" },
//!       "referencingTable": { "schema": "books", "name": "coupons" },
//!       "columnReferences": { "id": "author_id" }
//!     }
//!   ]
//! }
//! ```

pub mod overlay;
pub mod weak;

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Errors reading an attributes document.
#[derive(Error, Debug)]
pub enum AttributesError {
    #[error("cannot read attributes file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON attributes document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML attributes document: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported attributes format: {0}. Supported: json, toml")]
    UnsupportedFormat(String),

    #[error("invalid attributes document: {0}")]
    Invalid(String),
}

/// Serialization format of an attributes document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributesFormat {
    Json,
    Toml,
}

impl AttributesFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, AttributesError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        match extension.as_str() {
            "json" => Ok(AttributesFormat::Json),
            "toml" => Ok(AttributesFormat::Toml),
            other => Err(AttributesError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Facts to overlay onto one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TableAttributes {
    #[serde(default)]
    pub schema: Option<String>,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_remarks")]
    pub remarks: String,
    #[serde(default, alias = "tags", deserialize_with = "deserialize_tags")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub columns: Vec<ColumnAttributes>,
}

impl TableAttributes {
    pub fn has_remarks(&self) -> bool {
        !self.remarks.trim().is_empty()
    }

    /// `schema.name`, or the bare name.
    pub fn qualified_name(&self) -> String {
        qualified(self.schema.as_deref(), &self.name)
    }
}

/// Facts to overlay onto one column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ColumnAttributes {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_remarks")]
    pub remarks: String,
    #[serde(default, alias = "tags", deserialize_with = "deserialize_tags")]
    pub attributes: BTreeMap<String, String>,
}

impl ColumnAttributes {
    pub fn has_remarks(&self) -> bool {
        !self.remarks.trim().is_empty()
    }
}

/// A table named by an association endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TableReference {
    #[serde(default)]
    pub schema: Option<String>,
    pub name: String,
}

impl TableReference {
    pub fn qualified_name(&self) -> String {
        qualified(self.schema.as_deref(), &self.name)
    }
}

/// A declared weak association between two tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeakAssociationAttributes {
    #[serde(alias = "referenced_table")]
    pub referenced_table: TableReference,
    #[serde(alias = "referencing_table")]
    pub referencing_table: TableReference,
    /// `(referenced column, referencing column)` pairs in document order.
    #[serde(
        default,
        alias = "column_references",
        deserialize_with = "deserialize_column_references"
    )]
    pub column_references: Vec<(String, String)>,
}

/// A parsed attributes document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogAttributes {
    #[serde(default)]
    pub tables: Vec<TableAttributes>,
    #[serde(default, alias = "weak_associations")]
    pub weak_associations: Vec<WeakAssociationAttributes>,
}

impl CatalogAttributes {
    /// Parse and validate a document.
    pub fn parse(source: &str, format: AttributesFormat) -> Result<Self, AttributesError> {
        let document: CatalogAttributes = match format {
            AttributesFormat::Json => serde_json::from_str(source)?,
            AttributesFormat::Toml => toml::from_str(source)?,
        };
        document.validate()?;
        Ok(document)
    }

    /// Read a document, choosing the format from the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AttributesError> {
        let path = path.as_ref();
        let format = AttributesFormat::from_path(path)?;
        let source = fs::read_to_string(path).map_err(|source| AttributesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source, format)
    }

    /// Check the structure serde cannot: names must not be blank.
    pub fn validate(&self) -> Result<(), AttributesError> {
        for (i, table) in self.tables.iter().enumerate() {
            if table.name.trim().is_empty() {
                return Err(AttributesError::Invalid(format!("tables[{}] has a blank name", i)));
            }
            for (j, column) in table.columns.iter().enumerate() {
                if column.name.trim().is_empty() {
                    return Err(AttributesError::Invalid(format!(
                        "tables[{}].columns[{}] of {} has a blank name",
                        i,
                        j,
                        table.qualified_name()
                    )));
                }
            }
        }

        for (i, association) in self.weak_associations.iter().enumerate() {
            if association.referenced_table.name.trim().is_empty()
                || association.referencing_table.name.trim().is_empty()
            {
                return Err(AttributesError::Invalid(format!(
                    "weakAssociations[{}] names a blank table",
                    i
                )));
            }
            if association
                .column_references
                .iter()
                .any(|(pk, fk)| pk.trim().is_empty() || fk.trim().is_empty())
            {
                return Err(AttributesError::Invalid(format!(
                    "weakAssociations[{}] has a blank column reference",
                    i
                )));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.weak_associations.is_empty()
    }
}

fn qualified(schema: Option<&str>, name: &str) -> String {
    match schema {
        Some(schema) if !schema.is_empty() => format!("{}.{}", schema, name),
        _ => name.to_string(),
    }
}

// =============================================================================
// Deserialization helpers
// =============================================================================

/// Remarks may be one string or a list of lines.
fn deserialize_remarks<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Remarks {
        Text(String),
        Lines(Vec<String>),
    }

    Ok(match Option::<Remarks>::deserialize(deserializer)? {
        Some(Remarks::Text(text)) => text,
        Some(Remarks::Lines(lines)) => lines.join("\n"),
        None => String::new(),
    })
}

/// Tag values may be any scalar; they are kept as strings.
fn deserialize_tags<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(i64),
        Float(f64),
        Bool(bool),
    }

    let raw = BTreeMap::<String, Scalar>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Scalar::Text(s) => s,
                Scalar::Integer(i) => i.to_string(),
                Scalar::Float(f) => f.to_string(),
                Scalar::Bool(b) => b.to_string(),
            };
            (key, value)
        })
        .collect())
}

/// Read a map of column names while keeping its entries in document order.
fn deserialize_column_references<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<(String, String)>, D::Error> {
    struct OrderedPairs;

    impl<'de> Visitor<'de> for OrderedPairs {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of referenced column to referencing column")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, String>()? {
                if pairs.iter().any(|(k, _): &(String, String)| k == &key) {
                    return Err(de::Error::custom(format!("duplicate column reference '{}'", key)));
                }
                pairs.push((key, value));
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_map(OrderedPairs)
}
