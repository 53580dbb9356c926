use super::{RetrievalStep, Retriever};
use crate::catalog::SchemaName;
use crate::diagnostics::{DiagnosticKind, Phase};
use crate::error::{CrawlError, CrawlResult, RetrievalError};

impl Retriever<'_> {
    pub(super) fn retrieve_schemas(&mut self) -> CrawlResult<usize> {
        let step = RetrievalStep::Schemas;
        let rows = self.fetch(step)?;

        for row in &rows {
            let catalog = row.text("CATALOG_NAME");
            let schema = row.text("SCHEMA_NAME");
            if row.get("SCHEMA_NAME").is_none() && row.get("CATALOG_NAME").is_none() {
                return Err(CrawlError::Retrieval {
                    step: step.name(),
                    source: RetrievalError::MissingColumn {
                        key: step.key(),
                        column: "SCHEMA_NAME",
                    },
                });
            }

            let name = SchemaName::new(catalog.as_deref(), schema.as_deref());
            let full_name = name.full_name();
            if !self.rules.schemas.test(&full_name) {
                self.diagnostics.info(
                    Phase::Retrieval,
                    DiagnosticKind::RuleExcluded,
                    full_name,
                    "schema excluded by inclusion rule",
                );
                continue;
            }

            tracing::debug!(schema = %full_name, "including schema");
            self.catalog.add_schema(name);
        }

        Ok(rows.len())
    }
}
