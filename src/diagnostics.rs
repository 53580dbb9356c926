//! Structured diagnostics for skip and degradation decisions.
//!
//! Every time the pipeline or an overlay pass declines to do something
//! (an excluded schema, an index row with no parent table, an attributes
//! entry naming a table that was never crawled) it records a [`Diagnostic`]
//! here. Each diagnostic is also emitted as a `tracing` event with `phase`,
//! `kind` and `subject` fields.

use std::fmt;

use serde::Serialize;

/// The assembly phase a diagnostic was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Retrieval,
    Inference,
    Overlay,
    WeakAssociations,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Retrieval => "retrieval",
            Phase::Inference => "inference",
            Phase::Overlay => "overlay",
            Phase::WeakAssociations => "weak_associations",
        }
    }
}

/// What kind of decision was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An inclusion rule filtered the object out before it was queried.
    RuleExcluded,
    /// An extension row had no parent entity to attach to.
    MissingParent,
    /// A row referenced something the catalog does not hold.
    UnresolvedReference,
    /// An optional retrieval step failed and its enrichment is absent.
    OptionalStepFailed,
    /// An overlay entry named a table that was not crawled.
    UnresolvedTable,
    /// An overlay entry named a column that was not crawled.
    UnresolvedColumn,
    /// The attributes document could not be used.
    InputFormat,
    /// A weak association was inferred from naming conventions.
    Inferred,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::RuleExcluded => "rule_excluded",
            DiagnosticKind::MissingParent => "missing_parent",
            DiagnosticKind::UnresolvedReference => "unresolved_reference",
            DiagnosticKind::OptionalStepFailed => "optional_step_failed",
            DiagnosticKind::UnresolvedTable => "unresolved_table",
            DiagnosticKind::UnresolvedColumn => "unresolved_column",
            DiagnosticKind::InputFormat => "input_format",
            DiagnosticKind::Inferred => "inferred",
        }
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Expected filtering, nothing went wrong.
    Info,
    /// Something was skipped that the caller may care about.
    Warning,
    /// A pass could not run at all.
    Error,
}

/// A single recorded decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub phase: Phase,
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Qualified name of the object the decision concerns.
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(
            f,
            "{}[{}/{}] {}: {}",
            level,
            self.phase.as_str(),
            self.kind.as_str(),
            self.subject,
            self.message
        )
    }
}

/// Collector for diagnostics raised during one catalog build.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and emit it as a tracing event.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        let phase = diagnostic.phase.as_str();
        let kind = diagnostic.kind.as_str();
        let subject = diagnostic.subject.as_str();
        match diagnostic.severity {
            Severity::Info => {
                tracing::debug!(phase, kind, subject, "{}", diagnostic.message)
            }
            Severity::Warning => {
                tracing::warn!(phase, kind, subject, "{}", diagnostic.message)
            }
            Severity::Error => {
                tracing::error!(phase, kind, subject, "{}", diagnostic.message)
            }
        }
        self.items.push(diagnostic);
    }

    pub fn info(
        &mut self,
        phase: Phase,
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.record(phase, kind, Severity::Info, subject, message);
    }

    pub fn warning(
        &mut self,
        phase: Phase,
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.record(phase, kind, Severity::Warning, subject, message);
    }

    pub fn error(
        &mut self,
        phase: Phase,
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.record(phase, kind, Severity::Error, subject, message);
    }

    fn record(
        &mut self,
        phase: Phase,
        kind: DiagnosticKind,
        severity: Severity,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(Diagnostic {
            phase,
            kind,
            severity,
            subject: subject.into(),
            message: message.into(),
        });
    }

    /// Append every diagnostic from another collector, preserving order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Diagnostics of one kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.kind == kind)
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
