//! End-to-end catalog assembly.
//!
//! ```text
//! crawl ──▶ inference (optional) ──▶ attributes overlay ──▶ weak associations
//! ```
//!
//! Only the crawl can fail. The later passes degrade to diagnostics: an
//! attributes document that cannot be read leaves the crawled catalog as it
//! is and records an `InputFormat` error.

use std::path::PathBuf;
use std::time::Instant;

use thiserror::Error;

use crate::attributes::{overlay, weak, AttributesError, AttributesFormat, CatalogAttributes};
use crate::config::{Settings, SettingsError};
use crate::diagnostics::{DiagnosticKind, Diagnostics, Phase};
use crate::error::{CrawlError, CrawlResult};
use crate::inference::infer_weak_associations;
use crate::retrieve::{CrawlOptions, CrawlOutcome, Crawler};
use crate::session::RetrieverSession;

/// Errors from [`load_from_settings`].
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Crawl(#[from] CrawlError),
}

/// Where the attributes document comes from.
#[derive(Debug, Clone)]
pub enum AttributesInput {
    /// An already parsed document.
    Document(CatalogAttributes),
    /// A file, with the format taken from its extension.
    File(PathBuf),
    /// Document text in a known format.
    Text {
        source: String,
        format: AttributesFormat,
    },
}

impl AttributesInput {
    fn describe(&self) -> String {
        match self {
            Self::Document(_) => "<document>".to_string(),
            Self::File(path) => path.display().to_string(),
            Self::Text { format, .. } => format!("<inline {:?}>", format),
        }
    }

    fn read(&self) -> Result<CatalogAttributes, AttributesError> {
        match self {
            Self::Document(document) => {
                document.validate()?;
                Ok(document.clone())
            }
            Self::File(path) => CatalogAttributes::from_file(path),
            Self::Text { source, format } => CatalogAttributes::parse(source, *format),
        }
    }
}

/// Builds a finished catalog from one session.
#[derive(Debug, Clone, Default)]
pub struct CatalogLoader {
    crawler: Crawler,
    infer: bool,
    attributes: Option<AttributesInput>,
}

impl CatalogLoader {
    pub fn new(options: CrawlOptions) -> Self {
        Self {
            crawler: Crawler::new(options),
            infer: false,
            attributes: None,
        }
    }

    /// Run naming-convention inference after the crawl.
    pub fn with_inference(mut self, infer: bool) -> Self {
        self.infer = infer;
        self
    }

    pub fn with_attributes(mut self, attributes: AttributesInput) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn with_attributes_file(self, path: impl Into<PathBuf>) -> Self {
        self.with_attributes(AttributesInput::File(path.into()))
    }

    pub fn crawler(&self) -> &Crawler {
        &self.crawler
    }

    /// Crawl the session and run every post-crawl pass.
    pub fn load(&self, session: &mut RetrieverSession) -> CrawlResult<CrawlOutcome> {
        let mut outcome = self.crawler.crawl(session)?;
        self.finish(&mut outcome);
        Ok(outcome)
    }

    /// Run the post-crawl passes over an already crawled catalog.
    pub fn finish(&self, outcome: &mut CrawlOutcome) {
        let started = Instant::now();

        if self.infer {
            infer_weak_associations(&mut outcome.catalog, &mut outcome.diagnostics);
        }

        if let Some(document) = self.read_attributes(&mut outcome.diagnostics) {
            overlay::apply(&mut outcome.catalog, &document, &mut outcome.diagnostics);
            weak::resolve_weak_associations(
                &mut outcome.catalog,
                &document,
                &mut outcome.diagnostics,
            );
        }

        tracing::info!(
            infer = self.infer,
            attributes = self.attributes.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "post-crawl passes finished"
        );
    }

    fn read_attributes(&self, diagnostics: &mut Diagnostics) -> Option<CatalogAttributes> {
        let input = self.attributes.as_ref()?;
        match input.read() {
            Ok(document) => Some(document),
            Err(err) => {
                diagnostics.error(
                    Phase::Overlay,
                    DiagnosticKind::InputFormat,
                    input.describe(),
                    err.to_string(),
                );
                None
            }
        }
    }
}

/// Open the named connection from `settings` and load its catalog.
///
/// Inclusion patterns, timeout, inference and the attributes file all come
/// from the `[crawl]` table.
pub fn load_from_settings(settings: &Settings, connection: &str) -> Result<CrawlOutcome, LoadError> {
    let crawl = &settings.crawl;
    let connection_settings = settings.get_connection(connection)?;
    let config = connection_settings.to_connection_config(crawl.query_timeout())?;
    let rules = crawl
        .inclusion_rules(config.dialect)
        .map_err(SettingsError::from)?;

    let mut loader =
        CatalogLoader::new(CrawlOptions::new(rules)).with_inference(crawl.infer_weak_associations);
    if let Some(path) = crawl.attributes_path()? {
        loader = loader.with_attributes_file(path);
    }

    tracing::info!(connection, "loading catalog from settings");
    let mut session = config.open_session()?;
    Ok(loader.load(&mut session)?)
}
