//! Synthesize declared weak associations.

use super::{CatalogAttributes, TableReference};
use crate::catalog::{AssociationOrigin, Catalog, TableKey, WeakAssociation};
use crate::diagnostics::{DiagnosticKind, Diagnostics, Phase};

/// Register every resolvable column pair of every declared association.
///
/// An entry whose tables cannot both be found is skipped whole; a pair whose
/// columns cannot both be found is skipped alone. Returns the number of
/// associations registered.
pub fn resolve_weak_associations(
    catalog: &mut Catalog,
    document: &CatalogAttributes,
    diagnostics: &mut Diagnostics,
) -> usize {
    let mut registered = 0;

    for entry in &document.weak_associations {
        let Some(referenced) = resolve_table(catalog, &entry.referenced_table, diagnostics) else {
            continue;
        };
        let Some(referencing) = resolve_table(catalog, &entry.referencing_table, diagnostics)
        else {
            continue;
        };

        for (pk_column, fk_column) in &entry.column_references {
            let Some(pk_column) = resolve_column(catalog, &referenced, pk_column, diagnostics) else {
                continue;
            };
            let Some(fk_column) = resolve_column(catalog, &referencing, fk_column, diagnostics)
            else {
                continue;
            };

            let association = WeakAssociation::new(
                referenced.column(pk_column),
                referencing.column(fk_column),
                AssociationOrigin::Declared,
            );
            tracing::debug!(name = %association.name, "registering weak association");
            if catalog.add_weak_association(association) {
                registered += 1;
            }
        }
    }

    tracing::info!(
        entries = document.weak_associations.len(),
        registered,
        "resolved weak associations"
    );
    registered
}

fn resolve_table(
    catalog: &Catalog,
    reference: &TableReference,
    diagnostics: &mut Diagnostics,
) -> Option<TableKey> {
    let key = catalog
        .find_table(reference.schema.as_deref(), &reference.name)
        .map(|t| t.key.clone());
    if key.is_none() {
        diagnostics.warning(
            Phase::WeakAssociations,
            DiagnosticKind::UnresolvedTable,
            reference.qualified_name(),
            "table not found in catalog",
        );
    }
    key
}

/// Resolve a column by its exact name.
fn resolve_column(
    catalog: &Catalog,
    table: &TableKey,
    name: &str,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    let column = catalog
        .table(table)
        .and_then(|t| t.column(name))
        .map(|c| c.name.clone());
    if column.is_none() {
        diagnostics.warning(
            Phase::WeakAssociations,
            DiagnosticKind::UnresolvedColumn,
            format!("{}.{}", table.full_name(), name),
            "column not found in table",
        );
    }
    column
}
