//! The ordered retrieval pipeline.
//!
//! A crawl runs every [`RetrievalStep`] in [`RetrievalStep::PIPELINE`] order
//! against one [`RetrieverSession`]. Each step asks the session for its
//! logical query, once globally, once per included schema, or once per
//! included table depending on the template's parameters, and maps the rows
//! onto the [`Catalog`].
//!
//! ```text
//! SCHEMATA → TABLES → TABLE_COLUMNS → INDEXES → PRIMARY_KEYS
//!          → EXT_TABLES → EXT_INDEXES → EXT_INDEX_COLUMNS
//!          → FOREIGN_KEYS → ROUTINES
//! ```
//!
//! The first three steps are mandatory: a missing template is a
//! configuration error and a failed query aborts the crawl. The others
//! degrade to a diagnostic and the crawl carries on.

mod columns;
pub mod concurrent;
mod extensions;
mod foreign_keys;
mod indexes;
mod routines;
mod schemas;
mod tables;

pub use concurrent::crawl_concurrently;

use std::sync::Arc;
use std::time::Instant;

use crate::catalog::{Catalog, SchemaName, TableKey};
use crate::diagnostics::{DiagnosticKind, Diagnostics, Phase};
use crate::dialect::{InformationSchemaKey, QueryScope};
use crate::error::{ConfigurationError, CrawlError, CrawlResult, RetrievalError};
use crate::inclusion::InclusionRules;
use crate::session::{MetadataRow, QueryParams, RetrieverSession};

/// One stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetrievalStep {
    Schemas,
    Tables,
    Columns,
    Indexes,
    PrimaryKeys,
    ExtTables,
    ExtIndexes,
    ExtIndexColumns,
    ForeignKeys,
    Routines,
}

impl RetrievalStep {
    /// Steps in execution order.
    pub const PIPELINE: [RetrievalStep; 10] = [
        Self::Schemas,
        Self::Tables,
        Self::Columns,
        Self::Indexes,
        Self::PrimaryKeys,
        Self::ExtTables,
        Self::ExtIndexes,
        Self::ExtIndexColumns,
        Self::ForeignKeys,
        Self::Routines,
    ];

    pub fn key(&self) -> InformationSchemaKey {
        match self {
            Self::Schemas => InformationSchemaKey::Schemata,
            Self::Tables => InformationSchemaKey::Tables,
            Self::Columns => InformationSchemaKey::TableColumns,
            Self::Indexes => InformationSchemaKey::Indexes,
            Self::PrimaryKeys => InformationSchemaKey::PrimaryKeys,
            Self::ExtTables => InformationSchemaKey::ExtTables,
            Self::ExtIndexes => InformationSchemaKey::ExtIndexes,
            Self::ExtIndexColumns => InformationSchemaKey::ExtIndexColumns,
            Self::ForeignKeys => InformationSchemaKey::ForeignKeys,
            Self::Routines => InformationSchemaKey::Routines,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Schemas => "schemas",
            Self::Tables => "tables",
            Self::Columns => "columns",
            Self::Indexes => "indexes",
            Self::PrimaryKeys => "primary_keys",
            Self::ExtTables => "ext_tables",
            Self::ExtIndexes => "ext_indexes",
            Self::ExtIndexColumns => "ext_index_columns",
            Self::ForeignKeys => "foreign_keys",
            Self::Routines => "routines",
        }
    }

    /// Mandatory steps abort the crawl on failure.
    pub fn is_mandatory(&self) -> bool {
        matches!(self, Self::Schemas | Self::Tables | Self::Columns)
    }
}

/// What a crawl should include.
#[derive(Debug, Clone, Default)]
pub struct CrawlOptions {
    pub rules: InclusionRules,
}

impl CrawlOptions {
    pub fn new(rules: InclusionRules) -> Self {
        Self { rules }
    }
}

/// A finished catalog and everything that was skipped while building it.
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    pub catalog: Catalog,
    pub diagnostics: Diagnostics,
}

impl CrawlOutcome {
    /// Freeze the catalog for shared, read-only use.
    pub fn into_shared(self) -> (Arc<Catalog>, Diagnostics) {
        (Arc::new(self.catalog), self.diagnostics)
    }
}

/// Runs the retrieval pipeline.
#[derive(Debug, Clone, Default)]
pub struct Crawler {
    options: CrawlOptions,
}

impl Crawler {
    pub fn new(options: CrawlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }

    /// Check that every mandatory step has a template.
    pub fn validate(&self, session: &RetrieverSession) -> Result<(), ConfigurationError> {
        for step in RetrievalStep::PIPELINE {
            if step.is_mandatory() && !session.has_template(step.key()) {
                return Err(ConfigurationError::MissingQuery(step.key()));
            }
        }
        Ok(())
    }

    /// Crawl everything the session can see.
    pub fn crawl(&self, session: &mut RetrieverSession) -> CrawlResult<CrawlOutcome> {
        self.validate(session)?;

        let started = Instant::now();
        tracing::info!(source = %session.describe(), "crawl started");

        let mut outcome = CrawlOutcome::default();
        for step in RetrievalStep::PIPELINE {
            self.run_step(session, step, &mut outcome)?;
        }

        tracing::info!(
            tables = outcome.catalog.table_count(),
            diagnostics = outcome.diagnostics.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "crawl finished"
        );
        Ok(outcome)
    }

    /// Run a single step against an existing catalog.
    pub fn run_step(
        &self,
        session: &mut RetrieverSession,
        step: RetrievalStep,
        outcome: &mut CrawlOutcome,
    ) -> CrawlResult<()> {
        let started = Instant::now();
        let mut retriever = Retriever {
            session,
            rules: &self.options.rules,
            catalog: &mut outcome.catalog,
            diagnostics: &mut outcome.diagnostics,
        };

        let rows = match step {
            RetrievalStep::Schemas => retriever.retrieve_schemas()?,
            RetrievalStep::Tables => retriever.retrieve_tables()?,
            RetrievalStep::Columns => retriever.retrieve_columns()?,
            RetrievalStep::Indexes => retriever.retrieve_indexes()?,
            RetrievalStep::PrimaryKeys => retriever.retrieve_primary_keys()?,
            RetrievalStep::ExtTables => retriever.retrieve_ext_tables()?,
            RetrievalStep::ExtIndexes => retriever.retrieve_ext_indexes()?,
            RetrievalStep::ExtIndexColumns => retriever.retrieve_ext_index_columns()?,
            RetrievalStep::ForeignKeys => retriever.retrieve_foreign_keys()?,
            RetrievalStep::Routines => retriever.retrieve_routines()?,
        };

        tracing::info!(
            step = step.name(),
            rows,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "retrieval step finished"
        );
        Ok(())
    }
}

/// Working state of one step.
pub(crate) struct Retriever<'a> {
    session: &'a mut RetrieverSession,
    rules: &'a InclusionRules,
    catalog: &'a mut Catalog,
    diagnostics: &'a mut Diagnostics,
}

impl Retriever<'_> {
    /// Run the step's query for every target its scope implies.
    ///
    /// Only schemas and tables already in the catalog are queried, so
    /// excluded objects never are.
    fn fetch(&mut self, step: RetrievalStep) -> CrawlResult<Vec<MetadataRow>> {
        let key = step.key();
        let Some(scope) = self.session.scope(key) else {
            return Ok(Vec::new());
        };

        let targets: Vec<(String, QueryParams)> = match scope {
            QueryScope::Global => vec![(key.as_str().to_string(), QueryParams::none())],
            QueryScope::Schema => self
                .catalog
                .schemas()
                .map(|s| (s.full_name(), QueryParams::for_schema(s.name.query_name())))
                .collect(),
            QueryScope::Table => self
                .catalog
                .tables()
                .map(|t| {
                    let params = QueryParams::for_table(t.key.schema.query_name(), &t.key.name);
                    (t.full_name(), params)
                })
                .collect(),
        };

        let mut rows = Vec::new();
        for (subject, params) in targets {
            match self.session.execute_with(key, &params) {
                Ok(batch) => rows.extend(batch),
                Err(source) if step.is_mandatory() => {
                    return Err(CrawlError::Retrieval {
                        step: step.name(),
                        source,
                    });
                }
                Err(err) => self.diagnostics.warning(
                    Phase::Retrieval,
                    DiagnosticKind::OptionalStepFailed,
                    subject,
                    err.to_string(),
                ),
            }
        }
        Ok(rows)
    }

    /// A column value the step cannot do without.
    ///
    /// Fatal for mandatory steps; otherwise the row is skipped with a
    /// diagnostic and `None` is returned.
    fn required(
        &mut self,
        step: RetrievalStep,
        row: &MetadataRow,
        column: &'static str,
    ) -> CrawlResult<Option<String>> {
        if let Some(value) = row.text(column).filter(|v| !v.is_empty()) {
            return Ok(Some(value));
        }

        let source = RetrievalError::MissingColumn {
            key: step.key(),
            column,
        };
        if step.is_mandatory() {
            return Err(CrawlError::Retrieval {
                step: step.name(),
                source,
            });
        }
        self.diagnostics.warning(
            Phase::Retrieval,
            DiagnosticKind::UnresolvedReference,
            step.key().as_str(),
            source.to_string(),
        );
        Ok(None)
    }

    /// Build a table key from three identifier columns.
    fn table_key(
        &mut self,
        step: RetrievalStep,
        row: &MetadataRow,
        [catalog, schema, table]: [&'static str; 3],
    ) -> CrawlResult<Option<TableKey>> {
        let Some(name) = self.required(step, row, table)? else {
            return Ok(None);
        };
        let schema = SchemaName::new(row.text(catalog).as_deref(), row.text(schema).as_deref());
        Ok(Some(TableKey::new(schema, name)))
    }

    /// Check the schema is in the catalog, diagnosing why if it is not.
    fn has_schema(&mut self, schema: &SchemaName, subject: &str) -> bool {
        if self.catalog.schema(schema).is_some() {
            return true;
        }
        if self.rules.schemas.test(&schema.full_name()) {
            self.diagnostics.warning(
                Phase::Retrieval,
                DiagnosticKind::MissingParent,
                subject,
                format!("schema '{}' was not retrieved", schema),
            );
        } else {
            self.diagnostics.info(
                Phase::Retrieval,
                DiagnosticKind::RuleExcluded,
                subject,
                "schema excluded by inclusion rule",
            );
        }
        false
    }

    /// Check the table is in the catalog, diagnosing why if it is not.
    fn has_table(&mut self, key: &TableKey, subject: &str) -> bool {
        if self.catalog.table(key).is_some() {
            return true;
        }
        if self.is_excluded(key) {
            self.diagnostics.info(
                Phase::Retrieval,
                DiagnosticKind::RuleExcluded,
                subject,
                "table excluded by inclusion rule",
            );
        } else {
            self.diagnostics.warning(
                Phase::Retrieval,
                DiagnosticKind::MissingParent,
                subject,
                format!("table '{}' was not retrieved", key),
            );
        }
        false
    }

    fn is_excluded(&self, key: &TableKey) -> bool {
        !self.rules.schemas.test(&key.schema.full_name()) || !self.rules.tables.test(&key.full_name())
    }
}
