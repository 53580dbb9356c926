use super::{RetrievalStep, Retriever};
use crate::catalog::{Routine, RoutineType, SchemaName};
use crate::diagnostics::{DiagnosticKind, Phase};
use crate::error::CrawlResult;

impl Retriever<'_> {
    pub(super) fn retrieve_routines(&mut self) -> CrawlResult<usize> {
        let step = RetrievalStep::Routines;
        let rows = self.fetch(step)?;

        for row in &rows {
            let Some(name) = self.required(step, row, "ROUTINE_NAME")? else {
                continue;
            };
            let schema = SchemaName::new(
                row.text("ROUTINE_CATALOG").as_deref(),
                row.text("ROUTINE_SCHEMA").as_deref(),
            );
            let routine = Routine {
                schema,
                name,
                routine_type: row
                    .text("ROUTINE_TYPE")
                    .map(|t| RoutineType::from_str(&t))
                    .unwrap_or_default(),
                definition: row.text_or_empty("ROUTINE_DEFINITION"),
            };

            let full_name = routine.full_name();
            if !self.has_schema(&routine.schema, &full_name) {
                continue;
            }
            if !self.rules.routines.test(&full_name) {
                self.diagnostics.info(
                    Phase::Retrieval,
                    DiagnosticKind::RuleExcluded,
                    full_name,
                    "routine excluded by inclusion rule",
                );
                continue;
            }

            self.catalog.upsert_routine(routine);
        }

        Ok(rows.len())
    }
}
