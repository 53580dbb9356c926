use super::{RetrievalStep, Retriever};
use crate::catalog::TableType;
use crate::diagnostics::{DiagnosticKind, Phase};
use crate::error::CrawlResult;

const TABLE_ID: [&str; 3] = ["TABLE_CATALOG", "TABLE_SCHEMA", "TABLE_NAME"];

impl Retriever<'_> {
    pub(super) fn retrieve_tables(&mut self) -> CrawlResult<usize> {
        let step = RetrievalStep::Tables;
        let rows = self.fetch(step)?;

        for row in &rows {
            let Some(key) = self.table_key(step, row, TABLE_ID)? else {
                continue;
            };
            let full_name = key.full_name();
            if !self.has_schema(&key.schema, &full_name) {
                continue;
            }
            if !self.rules.tables.test(&full_name) {
                self.diagnostics.info(
                    Phase::Retrieval,
                    DiagnosticKind::RuleExcluded,
                    full_name,
                    "table excluded by inclusion rule",
                );
                continue;
            }

            let table_type = row
                .text("TABLE_TYPE")
                .map(|t| TableType::from_str(&t))
                .unwrap_or_default();
            tracing::debug!(table = %full_name, "including table");
            let table = self.catalog.upsert_table(key, table_type);
            table.remarks = row.text_or_empty("REMARKS");
        }

        Ok(rows.len())
    }
}
