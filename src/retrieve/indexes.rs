use super::{RetrievalStep, Retriever};
use crate::catalog::{IndexColumn, SortOrder};
use crate::diagnostics::{DiagnosticKind, Phase};
use crate::error::CrawlResult;

const TABLE_ID: [&str; 3] = ["TABLE_CATALOG", "TABLE_SCHEMA", "TABLE_NAME"];

impl Retriever<'_> {
    pub(super) fn retrieve_indexes(&mut self) -> CrawlResult<usize> {
        let step = RetrievalStep::Indexes;
        let rows = self.fetch(step)?;

        for row in &rows {
            let Some(key) = self.table_key(step, row, TABLE_ID)? else {
                continue;
            };
            let Some(index_name) = self.required(step, row, "INDEX_NAME")? else {
                continue;
            };
            let subject = format!("{}.{}", key.full_name(), index_name);
            if !self.has_table(&key, &subject) {
                continue;
            }

            // Expression indexes have no column name
            let Some(column_name) = row.text("COLUMN_NAME") else {
                self.diagnostics.warning(
                    Phase::Retrieval,
                    DiagnosticKind::UnresolvedReference,
                    subject,
                    "index column has no column name",
                );
                continue;
            };

            let Some(table) = self.catalog.table_mut(&key) else {
                continue;
            };
            if table.column(&column_name).is_none() {
                self.diagnostics.warning(
                    Phase::Retrieval,
                    DiagnosticKind::UnresolvedReference,
                    subject,
                    format!("index column '{}' is not a column of the table", column_name),
                );
                continue;
            }

            let index = table.index_entry(&index_name, row.flag("IS_UNIQUE"));
            let ordinal = row
                .integer("ORDINAL_POSITION")
                .map(|p| p as u32)
                .unwrap_or(index.columns().len() as u32 + 1);
            let mut column = IndexColumn::new(column_name, ordinal);
            if row.flag("IS_DESCENDING") {
                column.sort_order = SortOrder::Descending;
            }
            index.upsert_column(column);
        }

        for table in self.catalog.tables_mut() {
            for index in table.indexes_mut() {
                index.sort_columns();
            }
        }
        Ok(rows.len())
    }

    pub(super) fn retrieve_primary_keys(&mut self) -> CrawlResult<usize> {
        let step = RetrievalStep::PrimaryKeys;
        let rows = self.fetch(step)?;

        for row in &rows {
            let Some(key) = self.table_key(step, row, TABLE_ID)? else {
                continue;
            };
            let Some(column_name) = self.required(step, row, "COLUMN_NAME")? else {
                continue;
            };
            let subject = key.column(&column_name).full_name();
            if !self.has_table(&key, &subject) {
                continue;
            }

            let Some(table) = self.catalog.table_mut(&key) else {
                continue;
            };
            if table.column(&column_name).is_none() {
                self.diagnostics.warning(
                    Phase::Retrieval,
                    DiagnosticKind::UnresolvedReference,
                    subject,
                    "primary key column is not a column of the table",
                );
                continue;
            }

            let name = row
                .text("CONSTRAINT_NAME")
                .unwrap_or_else(|| format!("pk_{}", key.name));
            let sequence = row.integer("KEY_SEQ").map(|s| s as u32);
            let pk = table.primary_key_entry(&name);
            let sequence = sequence.unwrap_or(pk.columns().len() as u32 + 1);
            pk.set_column(sequence, column_name);
        }

        Ok(rows.len())
    }
}
