//! Merge table and column attributes onto a crawled catalog.
//!
//! Entries are matched by qualified name. An entry that names a table or
//! column the crawl did not produce is skipped with a diagnostic; nothing is
//! ever created. Every write overwrites, so applying the same document twice
//! leaves the catalog as applying it once.

use super::{CatalogAttributes, TableAttributes};
use crate::catalog::Catalog;
use crate::diagnostics::{DiagnosticKind, Diagnostics, Phase};

/// Apply remarks and tags. Returns the number of tables touched.
pub fn apply(
    catalog: &mut Catalog,
    document: &CatalogAttributes,
    diagnostics: &mut Diagnostics,
) -> usize {
    let mut applied = 0;
    for entry in &document.tables {
        if apply_table(catalog, entry, diagnostics) {
            applied += 1;
        }
    }

    tracing::info!(entries = document.tables.len(), applied, "applied catalog attributes");
    applied
}

fn apply_table(
    catalog: &mut Catalog,
    entry: &TableAttributes,
    diagnostics: &mut Diagnostics,
) -> bool {
    let Some(key) = catalog
        .find_table(entry.schema.as_deref(), &entry.name)
        .map(|t| t.key.clone())
    else {
        diagnostics.warning(
            Phase::Overlay,
            DiagnosticKind::UnresolvedTable,
            entry.qualified_name(),
            "table not found in catalog",
        );
        return false;
    };
    let Some(table) = catalog.table_mut(&key) else {
        return false;
    };

    if entry.has_remarks() {
        table.remarks = entry.remarks.clone();
    }
    for (name, value) in &entry.attributes {
        table.tags.insert(name.clone(), value.clone());
    }

    for column_entry in &entry.columns {
        if !column_entry.has_remarks() && column_entry.attributes.is_empty() {
            continue;
        }

        let Some(column) = table.column_mut(&column_entry.name) else {
            diagnostics.warning(
                Phase::Overlay,
                DiagnosticKind::UnresolvedColumn,
                format!("{}.{}", key.full_name(), column_entry.name),
                "column not found in table",
            );
            continue;
        };

        if column_entry.has_remarks() {
            column.remarks = column_entry.remarks.clone();
        }
        for (name, value) in &column_entry.attributes {
            column.tags.insert(name.clone(), value.clone());
        }
    }

    true
}
