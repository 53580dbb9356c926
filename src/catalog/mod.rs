//! The catalog being assembled.
//!
//! Everything is owned by [`Catalog`] and looked up by qualified name:
//! tables by [`TableKey`], columns by name within their table. Relationships
//! hold [`ColumnKey`]s rather than references, so assembly order never
//! matters for correctness.
//!
//! All mutators are crate-private. Once a crawl hands the catalog out,
//! consumers can only read it.

mod association;
mod key;
mod routine;
mod table;

pub use association::{
    weak_association_name, AssociationOrigin, ColumnReference, ForeignKey, ForeignKeyRule,
    WeakAssociation,
};
pub use key::{ColumnKey, SchemaName, TableKey};
pub use routine::{Routine, RoutineType};
pub use table::{Column, Index, IndexColumn, PrimaryKey, SortOrder, Table, TableType};

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// A crawled schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub name: SchemaName,
}

impl Schema {
    pub fn full_name(&self) -> String {
        self.name.full_name()
    }
}

/// Root container of crawled metadata.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    schemas: BTreeMap<SchemaName, Schema>,
    tables: BTreeMap<TableKey, Table>,
    routines: BTreeMap<(SchemaName, String), Routine>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Read API
    // =========================================================================

    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    pub fn schema(&self, name: &SchemaName) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn table(&self, key: &TableKey) -> Option<&Table> {
        self.tables.get(key)
    }

    pub fn tables_in<'a>(&'a self, schema: &'a SchemaName) -> impl Iterator<Item = &'a Table> {
        self.tables.values().filter(move |t| &t.key.schema == schema)
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Resolve a table from loosely specified names.
    ///
    /// `schema` may be the schema's full name or its bare schema part. When it
    /// is `None`, the table is found only if exactly one table has that name.
    pub fn find_table(&self, schema: Option<&str>, name: &str) -> Option<&Table> {
        let mut candidates = self.tables.values().filter(|t| t.key.name == name);
        match schema {
            Some(schema) => candidates.find(|t| {
                t.key.schema.full_name() == schema || t.key.schema.name.as_deref() == Some(schema)
            }),
            None => {
                let first = candidates.next()?;
                match candidates.next() {
                    Some(_) => None,
                    None => Some(first),
                }
            }
        }
    }

    pub fn column(&self, key: &ColumnKey) -> Option<&Column> {
        self.table(&key.table)?.column(&key.name)
    }

    pub fn routines(&self) -> impl Iterator<Item = &Routine> {
        self.routines.values()
    }

    pub fn routine(&self, schema: &SchemaName, name: &str) -> Option<&Routine> {
        self.routines.get(&(schema.clone(), name.to_string()))
    }

    /// Every weak association, once each.
    pub fn weak_associations(&self) -> Vec<Arc<WeakAssociation>> {
        let mut seen = BTreeMap::new();
        for table in self.tables.values() {
            for association in table.weak_associations() {
                seen.entry(association.name.clone())
                    .or_insert_with(|| Arc::clone(association));
            }
        }
        seen.into_values().collect()
    }

    // =========================================================================
    // Assembly (crate-private)
    // =========================================================================

    pub(crate) fn add_schema(&mut self, name: SchemaName) {
        self.schemas.insert(name.clone(), Schema { name });
    }

    /// Create the table, or update its type if it already exists.
    pub(crate) fn upsert_table(&mut self, key: TableKey, table_type: TableType) -> &mut Table {
        let table = self
            .tables
            .entry(key.clone())
            .or_insert_with(|| Table::new(key, table_type));
        table.table_type = table_type;
        table
    }

    pub(crate) fn table_mut(&mut self, key: &TableKey) -> Option<&mut Table> {
        self.tables.get_mut(key)
    }

    pub(crate) fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.tables.values_mut()
    }

    pub(crate) fn upsert_routine(&mut self, routine: Routine) {
        self.routines
            .insert((routine.schema.clone(), routine.name.clone()), routine);
    }

    /// Register a foreign key on both endpoint tables.
    ///
    /// Returns `false`, registering nothing, unless both tables exist.
    pub(crate) fn add_foreign_key(&mut self, fk: ForeignKey) -> bool {
        let (Some(referenced), Some(referencing)) =
            (fk.referenced_table().cloned(), fk.referencing_table().cloned())
        else {
            return false;
        };
        if !self.tables.contains_key(&referenced) || !self.tables.contains_key(&referencing) {
            return false;
        }

        let fk = Arc::new(fk);
        for key in [&referenced, &referencing] {
            if let Some(table) = self.tables.get_mut(key) {
                table.register_foreign_key(Arc::clone(&fk));
            }
        }
        true
    }

    /// Register a weak association on both endpoint tables.
    ///
    /// Both columns must exist; otherwise nothing is registered and `false`
    /// is returned. An association with the same name is replaced.
    pub(crate) fn add_weak_association(&mut self, association: WeakAssociation) -> bool {
        if self.column(&association.referenced).is_none()
            || self.column(&association.referencing).is_none()
        {
            return false;
        }

        let association = Arc::new(association);
        for key in [association.referenced_table(), association.referencing_table()] {
            if let Some(table) = self.tables.get_mut(key) {
                table.register_weak_association(Arc::clone(&association));
            }
        }
        true
    }

    /// Fold another catalog into this one. Its entries win on conflict.
    ///
    /// A replaced table takes its relationships with it, which would leave
    /// them registered on one endpoint only. Relationships of replaced tables
    /// are linked again first, then those of the incoming tables, so both
    /// endpoints agree and the incoming version wins on a name clash. A
    /// relationship whose columns are gone after the merge is dropped from
    /// both endpoints.
    pub(crate) fn merge(&mut self, other: Catalog) {
        self.schemas.extend(other.schemas);
        self.routines.extend(other.routines);

        let mut replaced = Relationships::default();
        let mut incoming = Relationships::default();
        for (key, table) in other.tables {
            incoming.collect(&table);
            if let Some(previous) = self.tables.insert(key, table) {
                replaced.collect(&previous);
            }
        }

        for relationships in [replaced, incoming] {
            for fk in relationships.foreign_keys {
                self.link_foreign_key(fk);
            }
            for association in relationships.weak_associations {
                self.link_weak_association(association);
            }
        }
    }

    fn link_foreign_key(&mut self, fk: Arc<ForeignKey>) {
        let resolved = fk.references.iter().all(|r| {
            self.column(&r.referenced).is_some() && self.column(&r.referencing).is_some()
        });
        let (Some(referenced), Some(referencing)) =
            (fk.referenced_table().cloned(), fk.referencing_table().cloned())
        else {
            return;
        };
        for key in [&referenced, &referencing] {
            if let Some(table) = self.tables.get_mut(key) {
                if resolved {
                    table.register_foreign_key(Arc::clone(&fk));
                } else {
                    table.unregister_foreign_key(&fk);
                }
            }
        }
    }

    fn link_weak_association(&mut self, association: Arc<WeakAssociation>) {
        let resolved = self.column(&association.referenced).is_some()
            && self.column(&association.referencing).is_some();
        let keys = [
            association.referenced_table().clone(),
            association.referencing_table().clone(),
        ];
        for key in &keys {
            if let Some(table) = self.tables.get_mut(key) {
                if resolved {
                    table.register_weak_association(Arc::clone(&association));
                } else {
                    table.unregister_weak_association(&association);
                }
            }
        }
    }
}

/// Relationships carried by a set of tables, each listed once.
#[derive(Default)]
struct Relationships {
    foreign_keys: Vec<Arc<ForeignKey>>,
    weak_associations: Vec<Arc<WeakAssociation>>,
}

impl Relationships {
    fn collect(&mut self, table: &Table) {
        for fk in table.foreign_keys() {
            if !self.foreign_keys.iter().any(|seen| Arc::ptr_eq(seen, fk)) {
                self.foreign_keys.push(Arc::clone(fk));
            }
        }
        for association in table.weak_associations() {
            if !self
                .weak_associations
                .iter()
                .any(|seen| Arc::ptr_eq(seen, association))
            {
                self.weak_associations.push(Arc::clone(association));
            }
        }
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Catalog", 3)?;
        state.serialize_field("schemas", &self.schemas.values().collect::<Vec<_>>())?;
        state.serialize_field("tables", &self.tables.values().collect::<Vec<_>>())?;
        state.serialize_field("routines", &self.routines.values().collect::<Vec<_>>())?;
        state.end()
    }
}
