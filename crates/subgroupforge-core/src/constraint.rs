//! Single attribute constraints and the missing value policy.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeType;
use crate::comparison::Comparison;
use crate::group::Signature;
use crate::value::AttributeValue;
use crate::IndexSet;

/// Which ordered comparisons pick up missing numerics when they count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDirection {
    #[default]
    Both,
    Lteq,
    Gteq,
}

/// How missing numeric values take part in constraint coverage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissingValuePolicy {
    /// Treat a missing numeric as `0.0`.
    pub as_zero: bool,
    pub direction: MissingDirection,
}

impl MissingValuePolicy {
    pub fn as_zero() -> Self {
        Self {
            as_zero: true,
            direction: MissingDirection::Both,
        }
    }

    pub fn with_direction(mut self, direction: MissingDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Whether rows with a missing value satisfy `? <comparison> bound`.
    pub fn includes_missing(
        &self,
        kind: AttributeType,
        bound: &AttributeValue,
        comparison: Comparison,
    ) -> bool {
        if !self.as_zero || kind != AttributeType::Numeric {
            return false;
        }
        let Some(bound) = bound.as_numeric() else {
            return false;
        };
        match comparison {
            Comparison::Eq => bound == 0.0,
            Comparison::Neq => bound != 0.0,
            Comparison::Lteq => {
                0.0 <= bound && matches!(self.direction, MissingDirection::Both | MissingDirection::Lteq)
            }
            Comparison::Gteq => {
                0.0 >= bound && matches!(self.direction, MissingDirection::Both | MissingDirection::Gteq)
            }
        }
    }

    /// Numeric stand-in for a missing value of `kind`, if any.
    pub fn substitute(&self, kind: AttributeType) -> Option<f64> {
        (self.as_zero && kind == AttributeType::Numeric).then_some(0.0)
    }
}

/// `attribute <comparison> value`, with its identity primes and covered rows.
///
/// The value prime is shared by every constraint on the same attribute value,
/// the comparison prime by every constraint using the same comparison on the
/// same attribute.
#[derive(Debug, Clone)]
pub struct Constraint {
    attribute: usize,
    attribute_name: String,
    value: AttributeValue,
    comparison: Comparison,
    value_prime: u64,
    comparison_prime: u64,
    covered: IndexSet,
}

impl Constraint {
    pub fn new(
        attribute: usize,
        attribute_name: impl Into<String>,
        value: AttributeValue,
        comparison: Comparison,
        value_prime: u64,
        comparison_prime: u64,
        covered: IndexSet,
    ) -> Self {
        Self {
            attribute,
            attribute_name: attribute_name.into(),
            value,
            comparison,
            value_prime,
            comparison_prime,
            covered,
        }
    }

    /// Position of the constrained attribute in the dataset.
    pub fn attribute(&self) -> usize {
        self.attribute
    }

    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    pub fn value_prime(&self) -> u64 {
        self.value_prime
    }

    pub fn comparison_prime(&self) -> u64 {
        self.comparison_prime
    }

    /// Product of the two identity primes.
    pub fn signature(&self) -> Signature {
        Signature::from_primes(self.value_prime, self.comparison_prime)
    }

    /// Rows satisfying the constraint.
    pub fn covered(&self) -> &IndexSet {
        &self.covered
    }

    pub fn coverage(&self) -> u64 {
        self.covered.len()
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.attribute_name, self.comparison, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: f64) -> AttributeValue {
        AttributeValue::Numeric(v)
    }

    #[test]
    fn test_policy_disabled_never_includes_missing() {
        let policy = MissingValuePolicy::default();
        for comparison in Comparison::ALL {
            assert!(!policy.includes_missing(AttributeType::Numeric, &num(0.0), comparison));
        }
    }

    #[test]
    fn test_zero_substitution_bounds() {
        let policy = MissingValuePolicy::as_zero();
        let numeric = AttributeType::Numeric;

        assert!(policy.includes_missing(numeric, &num(2.0), Comparison::Lteq));
        assert!(!policy.includes_missing(numeric, &num(-1.0), Comparison::Lteq));
        assert!(policy.includes_missing(numeric, &num(-1.0), Comparison::Gteq));
        assert!(!policy.includes_missing(numeric, &num(2.0), Comparison::Gteq));
        assert!(policy.includes_missing(numeric, &num(0.0), Comparison::Eq));
        assert!(policy.includes_missing(numeric, &num(3.0), Comparison::Neq));
        assert!(!policy.includes_missing(numeric, &num(0.0), Comparison::Neq));
    }

    #[test]
    fn test_direction_limits_ordered_comparisons() {
        let policy = MissingValuePolicy::as_zero().with_direction(MissingDirection::Gteq);
        assert!(!policy.includes_missing(AttributeType::Numeric, &num(2.0), Comparison::Lteq));
        assert!(policy.includes_missing(AttributeType::Numeric, &num(-2.0), Comparison::Gteq));
    }

    #[test]
    fn test_non_numeric_never_substituted() {
        let policy = MissingValuePolicy::as_zero();
        let value = AttributeValue::Category("a".to_string());
        assert!(!policy.includes_missing(AttributeType::Categorical, &value, Comparison::Neq));
        assert_eq!(policy.substitute(AttributeType::Categorical), None);
        assert_eq!(policy.substitute(AttributeType::Numeric), Some(0.0));
    }

    #[test]
    fn test_display_and_signature() {
        let constraint = Constraint::new(
            0,
            "x",
            num(6.0),
            Comparison::Gteq,
            5,
            3,
            IndexSet::new(),
        );
        assert_eq!(constraint.to_string(), "x >= 6.0");
        assert_eq!(constraint.signature().value(), 15);
    }
}
