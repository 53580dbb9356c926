//! Declared and weak relationships between tables.
//!
//! Both kinds hold qualified column keys, never references to the tables
//! themselves. The same `Arc` record is registered on both endpoint tables.

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::key::{ColumnKey, TableKey};

/// Referential action of a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyRule {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
    Unknown,
}

impl ForeignKeyRule {
    /// Parse a rule from its SQL spelling or a JDBC-style numeric code.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().replace('_', " ").as_str() {
            "" | "NO ACTION" | "3" => ForeignKeyRule::NoAction,
            "RESTRICT" | "1" => ForeignKeyRule::Restrict,
            "CASCADE" | "0" => ForeignKeyRule::Cascade,
            "SET NULL" | "2" => ForeignKeyRule::SetNull,
            "SET DEFAULT" | "4" => ForeignKeyRule::SetDefault,
            _ => ForeignKeyRule::Unknown,
        }
    }
}

/// One column pair of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnReference {
    pub key_sequence: u32,
    /// The column holding the key (primary key side).
    pub referenced: ColumnKey,
    /// The column pointing at it.
    pub referencing: ColumnKey,
}

/// A foreign key declared in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    pub name: String,
    /// Column pairs in key sequence order. Never empty once registered.
    pub references: Vec<ColumnReference>,
    pub update_rule: ForeignKeyRule,
    pub delete_rule: ForeignKeyRule,
}

impl ForeignKey {
    pub fn referenced_table(&self) -> Option<&TableKey> {
        self.references.first().map(|r| &r.referenced.table)
    }

    pub fn referencing_table(&self) -> Option<&TableKey> {
        self.references.first().map(|r| &r.referencing.table)
    }

    /// Check if `column` is one of the referencing columns.
    pub fn covers(&self, column: &ColumnKey) -> bool {
        self.references.iter().any(|r| &r.referencing == column)
    }
}

/// Where a weak association came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationOrigin {
    /// Declared in an attributes document.
    Declared,
    /// Proposed from column naming conventions.
    Inferred,
}

/// A relationship the database does not enforce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeakAssociation {
    pub name: String,
    pub referenced: ColumnKey,
    pub referencing: ColumnKey,
    pub origin: AssociationOrigin,
}

impl WeakAssociation {
    pub fn new(referenced: ColumnKey, referencing: ColumnKey, origin: AssociationOrigin) -> Self {
        Self {
            name: weak_association_name(&referenced, &referencing),
            referenced,
            referencing,
            origin,
        }
    }

    /// The `(referenced, referencing)` column pair.
    pub fn pair(&self) -> (&ColumnKey, &ColumnKey) {
        (&self.referenced, &self.referencing)
    }

    pub fn referenced_table(&self) -> &TableKey {
        &self.referenced.table
    }

    pub fn referencing_table(&self) -> &TableKey {
        &self.referencing.table
    }
}

/// Deterministic name for the association between two columns.
///
/// `WA_<h1>_<h2>`, where each hash is the first eight hex digits of the
/// SHA-256 of the column's full name.
pub fn weak_association_name(referenced: &ColumnKey, referencing: &ColumnKey) -> String {
    format!(
        "WA_{}_{}",
        short_hash(&referenced.full_name()),
        short_hash(&referencing.full_name())
    )
}

fn short_hash(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..8].to_string()
}
