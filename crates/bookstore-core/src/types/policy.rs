//! Policy rule definitions: (subject, resource class, action) triples.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// An action a principal may perform on a resource class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read access.
    Read,
    /// Write access.
    Write,
}

impl Action {
    /// Returns the canonical lowercase name used in persisted rules.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            other => Err(AppError::validation(format!(
                "Unknown action '{other}'. Supported: read, write"
            ))),
        }
    }
}

/// A single permission triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Principal id the rule applies to.
    pub subject: String,
    /// Resource class (e.g. `"resource"`).
    pub resource: String,
    /// Permitted action.
    pub action: Action,
}

impl PolicyRule {
    /// Builds a rule.
    pub fn new(subject: impl Into<String>, resource: impl Into<String>, action: Action) -> Self {
        Self {
            subject: subject.into(),
            resource: resource.into(),
            action,
        }
    }
}

impl fmt::Display for PolicyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.subject, self.resource, self.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse_is_case_insensitive() {
        assert_eq!("READ".parse::<Action>().unwrap(), Action::Read);
        assert_eq!("write".parse::<Action>().unwrap(), Action::Write);
        assert!("delete".parse::<Action>().is_err());
    }

    #[test]
    fn test_action_serde_name() {
        let json = serde_json::to_string(&Action::Write).unwrap();
        assert_eq!(json, "\"write\"");
    }

    #[test]
    fn test_rule_display() {
        let rule = PolicyRule::new("u1", "resource", Action::Read);
        assert_eq!(rule.to_string(), "u1, resource, read");
    }
}
