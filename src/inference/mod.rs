//! Propose weak associations from column naming conventions.
//!
//! A column named `<base>_id`, `<base>id` or `fk_<base>` probably points at a
//! table called `<base>` (or its plural or singular) in the same schema. When
//! that table has a single-column primary key, and no declared foreign key
//! already covers the column, an [`AssociationOrigin::Inferred`] weak
//! association is registered between the two.

mod inflection;

pub use inflection::{name_variants, pluralize, singularize};

use crate::catalog::{AssociationOrigin, Catalog, Table, WeakAssociation};
use crate::diagnostics::{DiagnosticKind, Diagnostics, Phase};

/// The table name a column appears to refer to, lower-cased.
pub fn referenced_base(column: &str) -> Option<String> {
    let lower = column.to_lowercase();
    let base = if let Some(base) = lower.strip_suffix("_id") {
        base
    } else if let Some(base) = lower.strip_prefix("fk_") {
        base
    } else if let Some(base) = lower.strip_suffix("id") {
        base
    } else {
        return None;
    };

    let base = base.trim_matches('_');
    if base.is_empty() {
        None
    } else {
        Some(base.to_string())
    }
}

/// Register inferred associations. Returns how many were registered.
pub fn infer_weak_associations(catalog: &mut Catalog, diagnostics: &mut Diagnostics) -> usize {
    let proposals = propose(catalog);

    let mut registered = 0;
    for association in proposals {
        let subject = association.referencing.full_name();
        let message = format!("inferred reference to {}", association.referenced);
        if catalog.add_weak_association(association) {
            diagnostics.info(Phase::Inference, DiagnosticKind::Inferred, subject, message);
            registered += 1;
        }
    }

    tracing::info!(registered, "inferred weak associations");
    registered
}

fn propose(catalog: &Catalog) -> Vec<WeakAssociation> {
    let mut proposals = Vec::new();

    for table in catalog.tables() {
        for column in table.columns() {
            let Some(base) = referenced_base(&column.name) else {
                continue;
            };
            let variants = name_variants(&base);

            for target in catalog.tables_in(&table.key.schema) {
                if !variants.contains(&target.name().to_lowercase()) {
                    continue;
                }
                let Some(pk_column) = single_key_column(target) else {
                    continue;
                };
                if target.key == table.key && pk_column == column.name {
                    continue;
                }

                let referencing = table.column_key(&column.name);
                if table.foreign_keys().any(|fk| fk.covers(&referencing)) {
                    continue;
                }

                tracing::debug!(
                    column = %referencing,
                    target = %target.key,
                    "naming convention suggests a reference"
                );
                proposals.push(WeakAssociation::new(
                    target.column_key(pk_column),
                    referencing,
                    AssociationOrigin::Inferred,
                ));
            }
        }
    }

    proposals
}

fn single_key_column(table: &Table) -> Option<&str> {
    table
        .primary_key()
        .filter(|pk| pk.is_single_column())
        .and_then(|pk| pk.columns().first().copied())
}
