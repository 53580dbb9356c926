//! Inclusion rules that decide which database objects get crawled.
//!
//! A rule is a pure predicate over a qualified name (`schema`, `schema.table`,
//! `schema.table.column`, `schema.routine`). The retrieval pipeline evaluates
//! rules before it issues a metadata query for an object, so objects that are
//! filtered out are never queried at all.
//!
//! Pattern rules match the whole name, the way `Regex::is_match` would with
//! the pattern wrapped in `^(?:...)$`. When an include pattern and an exclude
//! pattern both match, the name is excluded.
//!
//! # Example
//!
//! ```
//! use schemascope::inclusion::InclusionRule;
//!
//! let rule = InclusionRule::pattern("books\\..*", Some("books\\.temp_.*")).unwrap();
//! assert!(rule.test("books.authors"));
//! assert!(!rule.test("books.temp_import"));
//! assert!(!rule.test("main.regions"));
//! ```

mod exclusions;

pub use exclusions::ExclusionList;

use regex::Regex;

use crate::error::ConfigurationError;

/// Predicate deciding whether a named object is in scope.
#[derive(Debug, Clone, Default)]
pub enum InclusionRule {
    /// Everything is in scope.
    #[default]
    IncludeAll,
    /// Nothing is in scope.
    ExcludeAll,
    /// Names matching `include` are in scope unless they also match `exclude`.
    Pattern {
        include: Regex,
        exclude: Option<Regex>,
    },
    /// Names on an explicit list (or matching one of its patterns) are out of scope.
    Exclusions(ExclusionList),
    /// In scope only if every member rule includes the name.
    Composite(Vec<InclusionRule>),
}

impl InclusionRule {
    /// Build a pattern rule from an include pattern and an optional exclude pattern.
    pub fn pattern(include: &str, exclude: Option<&str>) -> Result<Self, ConfigurationError> {
        Ok(Self::Pattern {
            include: compile_full_match(include)?,
            exclude: exclude.map(compile_full_match).transpose()?,
        })
    }

    /// Build a rule from optional include and exclude patterns.
    ///
    /// A missing include pattern means "include everything"; a missing
    /// exclude pattern means "exclude nothing".
    pub fn from_patterns(
        include: Option<&str>,
        exclude: Option<&str>,
    ) -> Result<Self, ConfigurationError> {
        match (include, exclude) {
            (None, None) => Ok(Self::IncludeAll),
            (include, exclude) => Self::pattern(include.unwrap_or(".*"), exclude),
        }
    }

    /// Combine an include rule with an exclusion rule. Exclusion wins.
    pub fn and(self, other: InclusionRule) -> Self {
        match (self, other) {
            (Self::IncludeAll, rule) | (rule, Self::IncludeAll) => rule,
            (Self::Composite(mut rules), Self::Composite(more)) => {
                rules.extend(more);
                Self::Composite(rules)
            }
            (Self::Composite(mut rules), rule) => {
                rules.push(rule);
                Self::Composite(rules)
            }
            (rule, Self::Composite(mut rules)) => {
                rules.insert(0, rule);
                Self::Composite(rules)
            }
            (first, second) => Self::Composite(vec![first, second]),
        }
    }

    /// Evaluate the rule. `true` means the object is in scope.
    pub fn test(&self, name: &str) -> bool {
        match self {
            Self::IncludeAll => true,
            Self::ExcludeAll => false,
            Self::Pattern { include, exclude } => {
                if exclude.as_ref().is_some_and(|re| re.is_match(name)) {
                    return false;
                }
                include.is_match(name)
            }
            Self::Exclusions(list) => !list.excludes(name),
            Self::Composite(rules) => rules.iter().all(|rule| rule.test(name)),
        }
    }
}

/// Compile a pattern so that it must match the entire name.
pub(crate) fn compile_full_match(pattern: &str) -> Result<Regex, ConfigurationError> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| ConfigurationError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// The inclusion rules applied by one crawl.
#[derive(Debug, Clone, Default)]
pub struct InclusionRules {
    /// Tested against the schema full name.
    pub schemas: InclusionRule,
    /// Tested against `schema.table`.
    pub tables: InclusionRule,
    /// Tested against `schema.table.column`.
    pub columns: InclusionRule,
    /// Tested against `schema.routine`.
    pub routines: InclusionRule,
}

impl InclusionRules {
    /// Include everything.
    pub fn include_all() -> Self {
        Self::default()
    }

    pub fn with_schemas(mut self, rule: InclusionRule) -> Self {
        self.schemas = rule;
        self
    }

    pub fn with_tables(mut self, rule: InclusionRule) -> Self {
        self.tables = rule;
        self
    }

    pub fn with_columns(mut self, rule: InclusionRule) -> Self {
        self.columns = rule;
        self
    }

    pub fn with_routines(mut self, rule: InclusionRule) -> Self {
        self.routines = rule;
        self
    }
}
