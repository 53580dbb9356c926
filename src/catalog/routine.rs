use std::fmt;

use serde::Serialize;

use super::key::SchemaName;

/// Kind of stored routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineType {
    Procedure,
    Function,
    #[default]
    Unknown,
}

impl RoutineType {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "PROCEDURE" => RoutineType::Procedure,
            "FUNCTION" => RoutineType::Function,
            _ => RoutineType::Unknown,
        }
    }
}

/// A stored procedure or function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Routine {
    pub schema: SchemaName,
    pub name: String,
    pub routine_type: RoutineType,
    pub definition: String,
}

impl Routine {
    /// `schema.routine`.
    pub fn full_name(&self) -> String {
        let schema = self.schema.full_name();
        if schema.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", schema, self.name)
        }
    }
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}
