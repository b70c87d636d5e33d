//! Tool choice mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Global policy controlling whether and how an agent invokes discovered tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// Tools are never offered to the agent
    None,
    /// The agent decides when to call tools
    #[default]
    Auto,
    /// Every tool call needs explicit user approval
    Manual,
}

impl ToolChoice {
    /// All modes, in display order.
    pub const ALL: [Self; 3] = [Self::None, Self::Auto, Self::Manual];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Auto => "auto",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for ToolChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of `none`, `auto`, `manual`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid tool choice '{0}': expected one of none, auto, manual")]
pub struct ToolChoiceParseError(pub String);

impl FromStr for ToolChoice {
    type Err = ToolChoiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|choice| choice.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ToolChoiceParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_closed_set() {
        assert_eq!("none".parse::<ToolChoice>(), Ok(ToolChoice::None));
        assert_eq!("Auto".parse::<ToolChoice>(), Ok(ToolChoice::Auto));
        assert_eq!(" MANUAL ".parse::<ToolChoice>(), Ok(ToolChoice::Manual));
    }

    #[test]
    fn test_parse_rejects_other_values() {
        for bad in ["", "always", "required", "auto-ish"] {
            assert!(bad.parse::<ToolChoice>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_display_matches_wire_name() {
        for choice in ToolChoice::ALL {
            let json = serde_json::to_string(&choice).unwrap();
            assert_eq!(json, format!("\"{choice}\""));
        }
    }
}
