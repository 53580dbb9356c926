//! Explicit exclusion lists for vendor-internal schemas.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::compile_full_match;
use crate::error::ConfigurationError;

/// Oracle-maintained and sample schemas that are never interesting to crawl.
static ORACLE_SYSTEM_SCHEMAS: &[&str] = &[
    "ANONYMOUS",
    "APEX_050000",
    "APEX_PUBLIC_USER",
    "APPQOSSYS",
    "AUDSYS",
    "BI",
    "CTXSYS",
    "DBSFWUSER",
    "DBSNMP",
    "DIP",
    "DVF",
    "DVSYS",
    "EXFSYS",
    "FLOWS_FILES",
    "GGSYS",
    "GSMADMIN_INTERNAL",
    "GSMCATUSER",
    "GSMUSER",
    "HR",
    "IX",
    "LBACSYS",
    "MDDATA",
    "MDSYS",
    "MGMT_VIEW",
    "OE",
    "OLAPSYS",
    "ORACLE_OCM",
    "ORDDATA",
    "ORDPLUGINS",
    "ORDSYS",
    "OUTLN",
    "OWBSYS",
    "PM",
    "RDSADMIN",
    "REMOTE_SCHEDULER_AGENT",
    "SCOTT",
    "SH",
    "SI_INFORMTN_SCHEMA",
    "SPATIAL_CSW_ADMIN_USR",
    "SPATIAL_WFS_ADMIN_USR",
    "SYS",
    "SYS$UMF",
    "SYSBACKUP",
    "SYSDG",
    "SYSKM",
    "SYSMAN",
    "SYSRAC",
    "\"SYSTEM\"",
    "TSMSYS",
    "WKPROXY",
    "WKSYS",
    "WK_TEST",
    "WMSYS",
    "XDB",
    "XS$NULL",
];

/// Versioned APEX and Flows schemas.
static ORACLE_SYSTEM_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^APEX_[0-9]{6}$").unwrap(),
        Regex::new(r"^FLOWS_[0-9]{5,6}$").unwrap(),
    ]
});

/// A set of names (and optional patterns) to leave out of the crawl.
#[derive(Debug, Clone, Default)]
pub struct ExclusionList {
    names: BTreeSet<String>,
    patterns: Vec<Regex>,
}

impl ExclusionList {
    /// Build a list from exact names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            patterns: Vec::new(),
        }
    }

    /// Add a full-match exclusion pattern.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, ConfigurationError> {
        self.patterns.push(compile_full_match(pattern)?);
        Ok(self)
    }

    /// Oracle system and sample schemas.
    pub fn oracle() -> Self {
        Self {
            names: ORACLE_SYSTEM_SCHEMAS.iter().map(|s| s.to_string()).collect(),
            patterns: ORACLE_SYSTEM_PATTERNS.clone(),
        }
    }

    /// SQLite's temporary schema.
    pub fn sqlite() -> Self {
        Self::new(["temp"])
    }

    /// Schemas that hold the information schema views themselves.
    pub fn information_schema() -> Self {
        Self::new(["INFORMATION_SCHEMA", "DEFINITION_SCHEMA", "information_schema"])
    }

    /// Check whether a name is on the list.
    pub fn excludes(&self, name: &str) -> bool {
        if self.names.contains(name) {
            tracing::debug!("Excluding <{}> since it is on the exclude list", name);
            return true;
        }

        if self.patterns.iter().any(|re| re.is_match(name)) {
            tracing::debug!("Excluding <{}> since it matches exclusion pattern", name);
            return true;
        }

        false
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.patterns.is_empty()
    }
}
