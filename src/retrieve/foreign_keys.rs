use std::collections::BTreeMap;

use super::{RetrievalStep, Retriever};
use crate::catalog::{ColumnReference, ForeignKey, ForeignKeyRule, TableKey};
use crate::diagnostics::{DiagnosticKind, Phase};
use crate::error::CrawlResult;

const PK_TABLE_ID: [&str; 3] = ["PKTABLE_CATALOG", "PKTABLE_SCHEMA", "PKTABLE_NAME"];
const FK_TABLE_ID: [&str; 3] = ["FKTABLE_CATALOG", "FKTABLE_SCHEMA", "FKTABLE_NAME"];

impl Retriever<'_> {
    /// Foreign keys arrive one row per column pair; rows are grouped by
    /// referencing table and constraint name before registration.
    pub(super) fn retrieve_foreign_keys(&mut self) -> CrawlResult<usize> {
        let step = RetrievalStep::ForeignKeys;
        let rows = self.fetch(step)?;

        let mut order: Vec<(TableKey, String)> = Vec::new();
        let mut pending: BTreeMap<(TableKey, String), ForeignKey> = BTreeMap::new();

        for row in &rows {
            let Some(referencing) = self.table_key(step, row, FK_TABLE_ID)? else {
                continue;
            };
            let Some(referenced) = self.table_key(step, row, PK_TABLE_ID)? else {
                continue;
            };
            let Some(fk_column) = self.required(step, row, "FKCOLUMN_NAME")? else {
                continue;
            };

            let sequence = row.integer("KEY_SEQ").map(|s| s as u32).unwrap_or(1);
            let name = row.text("FK_NAME").unwrap_or_else(|| {
                let id = row.text("FK_ID").unwrap_or_else(|| "0".to_string());
                format!("fk_{}_{}", referencing.name, id)
            });
            let subject = format!("{}.{}", referencing.full_name(), name);

            if !self.has_table(&referencing, &subject) || !self.has_table(&referenced, &subject) {
                continue;
            }

            let pk_column = match row.text("PKCOLUMN_NAME") {
                Some(column) => Some(column),
                None => self
                    .catalog
                    .table(&referenced)
                    .and_then(|t| t.primary_key())
                    .and_then(|pk| pk.column_at(sequence))
                    .map(str::to_string),
            };
            let resolved = pk_column.filter(|pk_column| {
                self.catalog.column(&referenced.column(pk_column)).is_some()
                    && self.catalog.column(&referencing.column(&fk_column)).is_some()
            });
            let Some(pk_column) = resolved else {
                self.diagnostics.warning(
                    Phase::Retrieval,
                    DiagnosticKind::UnresolvedReference,
                    subject,
                    format!("cannot resolve column pair {} of the foreign key", sequence),
                );
                continue;
            };

            let group = (referencing.clone(), name.clone());
            let fk = pending.entry(group.clone()).or_insert_with(|| {
                order.push(group);
                ForeignKey {
                    name,
                    references: Vec::new(),
                    update_rule: ForeignKeyRule::default(),
                    delete_rule: ForeignKeyRule::default(),
                }
            });
            fk.update_rule = ForeignKeyRule::from_str(&row.text_or_empty("UPDATE_RULE"));
            fk.delete_rule = ForeignKeyRule::from_str(&row.text_or_empty("DELETE_RULE"));

            let reference = ColumnReference {
                key_sequence: sequence,
                referenced: referenced.column(pk_column),
                referencing: referencing.column(fk_column),
            };
            match fk.references.iter_mut().find(|r| r.key_sequence == sequence) {
                Some(existing) => *existing = reference,
                None => fk.references.push(reference),
            }
        }

        for group in order {
            if let Some(mut fk) = pending.remove(&group) {
                fk.references.sort_by_key(|r| r.key_sequence);
                let name = format!("{}.{}", group.0.full_name(), fk.name);
                if !self.catalog.add_foreign_key(fk) {
                    self.diagnostics.warning(
                        Phase::Retrieval,
                        DiagnosticKind::UnresolvedReference,
                        name,
                        "foreign key endpoints are not both in the catalog",
                    );
                }
            }
        }

        Ok(rows.len())
    }
}
