use super::{RetrievalStep, Retriever};
use crate::catalog::Column;
use crate::diagnostics::{DiagnosticKind, Phase};
use crate::error::CrawlResult;

const TABLE_ID: [&str; 3] = ["TABLE_CATALOG", "TABLE_SCHEMA", "TABLE_NAME"];

impl Retriever<'_> {
    pub(super) fn retrieve_columns(&mut self) -> CrawlResult<usize> {
        let step = RetrievalStep::Columns;
        let rows = self.fetch(step)?;

        for row in &rows {
            let Some(key) = self.table_key(step, row, TABLE_ID)? else {
                continue;
            };
            let Some(name) = self.required(step, row, "COLUMN_NAME")? else {
                continue;
            };

            let column_key = key.column(&name);
            let full_name = column_key.full_name();
            if !self.has_table(&key, &full_name) {
                continue;
            }
            if !self.rules.columns.test(&full_name) {
                self.diagnostics.info(
                    Phase::Retrieval,
                    DiagnosticKind::RuleExcluded,
                    full_name,
                    "column excluded by inclusion rule",
                );
                continue;
            }

            let Some(table) = self.catalog.table_mut(&key) else {
                continue;
            };
            let ordinal = row
                .integer("ORDINAL_POSITION")
                .map(|p| p as u32)
                .unwrap_or(table.columns().len() as u32 + 1);

            let mut column = Column::new(name, ordinal);
            column.data_type = row.text_or_empty("DATA_TYPE");
            column.nullable = row.get("IS_NULLABLE").is_none() || row.flag("IS_NULLABLE");
            column.default_value = row.text("COLUMN_DEFAULT");
            column.remarks = row.text_or_empty("REMARKS");
            table.upsert_column(column);
        }

        for table in self.catalog.tables_mut() {
            table.sort_columns();
        }
        Ok(rows.len())
    }
}
