//! Extension steps. These only attach to entities an earlier step created.

use super::{RetrievalStep, Retriever};
use crate::diagnostics::{DiagnosticKind, Phase};
use crate::error::CrawlResult;

const TABLE_ID: [&str; 3] = ["TABLE_CATALOG", "TABLE_SCHEMA", "TABLE_NAME"];
const INDEX_TABLE_ID: [&str; 3] = ["INDEX_CATALOG", "INDEX_SCHEMA", "TABLE_NAME"];

impl Retriever<'_> {
    pub(super) fn retrieve_ext_tables(&mut self) -> CrawlResult<usize> {
        let step = RetrievalStep::ExtTables;
        let rows = self.fetch(step)?;

        for row in &rows {
            let Some(key) = self.table_key(step, row, TABLE_ID)? else {
                continue;
            };
            if !self.has_table(&key, &key.full_name()) {
                continue;
            }
            let Some(table) = self.catalog.table_mut(&key) else {
                continue;
            };

            table.definition = row.text_or_empty("TABLE_DEFINITION");
            if let Some(remarks) = row.text("REMARKS").filter(|r| !r.trim().is_empty()) {
                table.remarks = remarks;
            }
        }

        Ok(rows.len())
    }

    pub(super) fn retrieve_ext_indexes(&mut self) -> CrawlResult<usize> {
        let step = RetrievalStep::ExtIndexes;
        let rows = self.fetch(step)?;

        for row in &rows {
            let Some(key) = self.table_key(step, row, INDEX_TABLE_ID)? else {
                continue;
            };
            let Some(index_name) = self.required(step, row, "INDEX_NAME")? else {
                continue;
            };
            let subject = format!("{}.{}", key.full_name(), index_name);
            if !self.has_table(&key, &subject) {
                continue;
            }

            let index = self
                .catalog
                .table_mut(&key)
                .and_then(|table| table.index_mut(&index_name));
            let Some(index) = index else {
                self.diagnostics.warning(
                    Phase::Retrieval,
                    DiagnosticKind::MissingParent,
                    subject,
                    "no such index in the catalog",
                );
                continue;
            };

            index.remarks = row.text_or_empty("REMARKS");
            index.definition = row.text_or_empty("INDEX_DEFINITION");
        }

        Ok(rows.len())
    }

    pub(super) fn retrieve_ext_index_columns(&mut self) -> CrawlResult<usize> {
        let step = RetrievalStep::ExtIndexColumns;
        let rows = self.fetch(step)?;

        for row in &rows {
            let Some(key) = self.table_key(step, row, INDEX_TABLE_ID)? else {
                continue;
            };
            let Some(index_name) = self.required(step, row, "INDEX_NAME")? else {
                continue;
            };
            let Some(column_name) = self.required(step, row, "COLUMN_NAME")? else {
                continue;
            };
            let subject = format!("{}.{}.{}", key.full_name(), index_name, column_name);
            if !self.has_table(&key, &subject) {
                continue;
            }

            let column = self
                .catalog
                .table_mut(&key)
                .and_then(|table| table.index_mut(&index_name))
                .and_then(|index| index.column_mut(&column_name));
            let Some(column) = column else {
                self.diagnostics.warning(
                    Phase::Retrieval,
                    DiagnosticKind::MissingParent,
                    subject,
                    "no such index column in the catalog",
                );
                continue;
            };

            column.generated = row.flag("IS_GENERATED");
            column.definition = row.text_or_empty("INDEX_COLUMN_DEFINITION");
        }

        Ok(rows.len())
    }
}
