//! Tables and the objects they own.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use super::association::{ForeignKey, WeakAssociation};
use super::key::{ColumnKey, TableKey};

/// Kind of table-like object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableType {
    #[default]
    Table,
    View,
    Other,
}

impl TableType {
    /// Parse a vendor table type string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "TABLE" | "BASE TABLE" => TableType::Table,
            "VIEW" | "MATERIALIZED VIEW" => TableType::View,
            _ => TableType::Other,
        }
    }
}

/// A column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub ordinal_position: u32,
    pub data_type: String,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub remarks: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl Column {
    pub fn new(name: impl Into<String>, ordinal_position: u32) -> Self {
        Self {
            name: name.into(),
            ordinal_position,
            data_type: String::new(),
            nullable: true,
            default_value: None,
            remarks: String::new(),
            tags: BTreeMap::new(),
        }
    }
}

/// Sort direction of an index column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// A column's participation in an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexColumn {
    /// Name of the table column this entry refers to.
    pub name: String,
    pub ordinal_position: u32,
    pub sort_order: SortOrder,
    pub generated: bool,
    pub definition: String,
}

impl IndexColumn {
    pub fn new(name: impl Into<String>, ordinal_position: u32) -> Self {
        Self {
            name: name.into(),
            ordinal_position,
            sort_order: SortOrder::Ascending,
            generated: false,
            definition: String::new(),
        }
    }
}

/// An index on a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Index {
    pub name: String,
    pub unique: bool,
    pub remarks: String,
    pub definition: String,
    columns: Vec<IndexColumn>,
}

impl Index {
    pub(crate) fn new(name: impl Into<String>, unique: bool) -> Self {
        Self {
            name: name.into(),
            unique,
            remarks: String::new(),
            definition: String::new(),
            columns: Vec::new(),
        }
    }

    /// Index columns, in ordinal order once the index step has finished.
    pub fn columns(&self) -> &[IndexColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&IndexColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut IndexColumn> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Insert or replace an index column by name.
    pub(crate) fn upsert_column(&mut self, column: IndexColumn) {
        match self.column_mut(&column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    pub(crate) fn sort_columns(&mut self) {
        self.columns.sort_by_key(|c| c.ordinal_position);
    }
}

/// A table's primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimaryKey {
    pub name: String,
    /// Column names keyed by key sequence.
    columns: BTreeMap<u32, String>,
}

impl PrimaryKey {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: BTreeMap::new(),
        }
    }

    /// Column names in key order.
    pub fn columns(&self) -> Vec<&str> {
        self.columns.values().map(String::as_str).collect()
    }

    /// Column at a one-based key sequence.
    pub fn column_at(&self, key_sequence: u32) -> Option<&str> {
        self.columns.get(&key_sequence).map(String::as_str)
    }

    pub(crate) fn set_column(&mut self, key_sequence: u32, name: impl Into<String>) {
        self.columns.insert(key_sequence, name.into());
    }

    pub fn is_single_column(&self) -> bool {
        self.columns.len() == 1
    }
}

/// A table or view, with everything hanging off it.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub key: TableKey,
    pub table_type: TableType,
    pub remarks: String,
    pub definition: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    columns: Vec<Column>,
    indexes: Vec<Index>,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_key: Option<PrimaryKey>,
    foreign_keys: BTreeMap<String, Arc<ForeignKey>>,
    weak_associations: BTreeMap<String, Arc<WeakAssociation>>,
}

impl Table {
    pub(crate) fn new(key: TableKey, table_type: TableType) -> Self {
        Self {
            key,
            table_type,
            remarks: String::new(),
            definition: String::new(),
            tags: BTreeMap::new(),
            columns: Vec::new(),
            indexes: Vec::new(),
            primary_key: None,
            foreign_keys: BTreeMap::new(),
            weak_associations: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn full_name(&self) -> String {
        self.key.full_name()
    }

    // =========================================================================
    // Columns
    // =========================================================================

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_key(&self, name: &str) -> ColumnKey {
        self.key.column(name)
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Insert or replace a column by name.
    pub(crate) fn upsert_column(&mut self, column: Column) {
        match self.column_mut(&column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    pub(crate) fn sort_columns(&mut self) {
        self.columns.sort_by_key(|c| c.ordinal_position);
    }

    // =========================================================================
    // Indexes and keys
    // =========================================================================

    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    pub fn index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|i| i.name == name)
    }

    pub(crate) fn index_mut(&mut self, name: &str) -> Option<&mut Index> {
        self.indexes.iter_mut().find(|i| i.name == name)
    }

    pub(crate) fn indexes_mut(&mut self) -> impl Iterator<Item = &mut Index> {
        self.indexes.iter_mut()
    }

    /// Get the index with `name`, creating an empty one if absent.
    pub(crate) fn index_entry(&mut self, name: &str, unique: bool) -> &mut Index {
        let position = match self.indexes.iter().position(|i| i.name == name) {
            Some(position) => {
                self.indexes[position].unique = unique;
                position
            }
            None => {
                self.indexes.push(Index::new(name, unique));
                self.indexes.len() - 1
            }
        };
        &mut self.indexes[position]
    }

    pub fn primary_key(&self) -> Option<&PrimaryKey> {
        self.primary_key.as_ref()
    }

    /// Get the primary key, creating or renaming it as needed.
    pub(crate) fn primary_key_entry(&mut self, name: &str) -> &mut PrimaryKey {
        let pk = self.primary_key.get_or_insert_with(|| PrimaryKey::new(name));
        if pk.name != name {
            pk.name = name.to_string();
        }
        pk
    }

    /// Check if `column` is exactly this table's single-column primary key.
    pub fn is_single_primary_key(&self, column: &str) -> bool {
        self.primary_key
            .as_ref()
            .is_some_and(|pk| pk.is_single_column() && pk.columns().first() == Some(&column))
    }

    // =========================================================================
    // Relationships
    // =========================================================================

    pub fn foreign_keys(&self) -> impl Iterator<Item = &Arc<ForeignKey>> {
        self.foreign_keys.values()
    }

    pub fn foreign_key(&self, name: &str) -> Option<&Arc<ForeignKey>> {
        self.foreign_keys.get(name)
    }

    pub(crate) fn register_foreign_key(&mut self, fk: Arc<ForeignKey>) {
        self.foreign_keys.insert(fk.name.clone(), fk);
    }

    /// Drop the foreign key registered under `fk.name` if it is `fk`.
    pub(crate) fn unregister_foreign_key(&mut self, fk: &Arc<ForeignKey>) {
        let registered = self
            .foreign_keys
            .get(&fk.name)
            .is_some_and(|current| Arc::ptr_eq(current, fk));
        if registered {
            self.foreign_keys.remove(&fk.name);
        }
    }

    pub fn weak_associations(&self) -> impl Iterator<Item = &Arc<WeakAssociation>> {
        self.weak_associations.values()
    }

    pub fn weak_association(&self, name: &str) -> Option<&Arc<WeakAssociation>> {
        self.weak_associations.get(name)
    }

    pub(crate) fn register_weak_association(&mut self, association: Arc<WeakAssociation>) {
        self.weak_associations
            .insert(association.name.clone(), association);
    }

    /// Drop the association registered under `name` if it is `association`.
    pub(crate) fn unregister_weak_association(&mut self, association: &Arc<WeakAssociation>) {
        let registered = self
            .weak_associations
            .get(&association.name)
            .is_some_and(|current| Arc::ptr_eq(current, association));
        if registered {
            self.weak_associations.remove(&association.name);
        }
    }
}
