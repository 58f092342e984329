//! Comparison operators used by constraints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Comparison applied between an attribute value and a constraint bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// `value = bound`
    Eq,
    /// `value != bound`
    Neq,
    /// `value <= bound`
    Lteq,
    /// `value >= bound`
    Gteq,
}

impl Comparison {
    /// All comparisons, in declaration order.
    pub const ALL: [Comparison; 4] = [
        Comparison::Eq,
        Comparison::Neq,
        Comparison::Lteq,
        Comparison::Gteq,
    ];

    /// Returns the upper-case mnemonic (`EQ`, `NEQ`, `LTEQ`, `GTEQ`).
    pub fn name(self) -> &'static str {
        match self {
            Comparison::Eq => "EQ",
            Comparison::Neq => "NEQ",
            Comparison::Lteq => "LTEQ",
            Comparison::Gteq => "GTEQ",
        }
    }

    /// Returns the operator symbol used in readable constraints.
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Neq => "!=",
            Comparison::Lteq => "<=",
            Comparison::Gteq => ">=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Error returned when parsing an unknown comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseComparisonError(pub String);

impl fmt::Display for ParseComparisonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown comparison `{}`, expected one of {{EQ,NEQ,LTEQ,GTEQ}}",
            self.0
        )
    }
}

impl std::error::Error for ParseComparisonError {}

impl FromStr for Comparison {
    type Err = ParseComparisonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eq" | "=" | "==" => Ok(Comparison::Eq),
            "neq" | "!=" => Ok(Comparison::Neq),
            "lteq" | "<=" => Ok(Comparison::Lteq),
            "gteq" | ">=" => Ok(Comparison::Gteq),
            _ => Err(ParseComparisonError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_symbols() {
        assert_eq!(Comparison::Eq.to_string(), "=");
        assert_eq!(Comparison::Neq.to_string(), "!=");
        assert_eq!(Comparison::Lteq.to_string(), "<=");
        assert_eq!(Comparison::Gteq.to_string(), ">=");
    }

    #[test]
    fn test_parse_mnemonics_and_symbols() {
        assert_eq!("EQ".parse::<Comparison>().unwrap(), Comparison::Eq);
        assert_eq!("gteq".parse::<Comparison>().unwrap(), Comparison::Gteq);
        assert_eq!("<=".parse::<Comparison>().unwrap(), Comparison::Lteq);
        assert_eq!(" != ".parse::<Comparison>().unwrap(), Comparison::Neq);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "lt".parse::<Comparison>().unwrap_err();
        assert!(err.to_string().contains("{EQ,NEQ,LTEQ,GTEQ}"));
    }
}
