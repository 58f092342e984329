//! Subgroups and their arithmetic identity.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::constraint::Constraint;
use crate::dataset::Dataset;
use crate::error::{Result, SubgroupError};
use crate::IndexSet;

/// Order-independent identity of a set of constraints.
///
/// The product of every member constraint's value prime and comparison
/// prime. Multiplication commutes, so the same set always yields the same
/// signature; arithmetic is checked and never wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(u128);

impl Signature {
    /// Identity of the empty conjunction.
    pub const ONE: Signature = Signature(1);

    pub fn from_primes(value_prime: u64, comparison_prime: u64) -> Self {
        Signature(value_prime as u128 * comparison_prime as u128)
    }

    pub fn value(self) -> u128 {
        self.0
    }

    pub fn checked_extend(self, other: Signature) -> Option<Signature> {
        self.0.checked_mul(other.0).map(Signature)
    }

    pub fn divisible_by(self, prime: u64) -> bool {
        self.0 % prime as u128 == 0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable conjunction of constraints.
#[derive(Debug, Clone)]
pub struct Group {
    constraints: SmallVec<[Arc<Constraint>; 4]>,
    signature: Signature,
}

impl Group {
    /// The empty conjunction, covering every row.
    pub fn root() -> Self {
        Self {
            constraints: SmallVec::new(),
            signature: Signature::ONE,
        }
    }

    /// Builds a group by extending the root with each constraint in turn.
    ///
    /// Fails on signature overflow. Redundant constraints (same attribute
    /// value or same attribute comparison) are rejected with `None`.
    pub fn from_constraints<I>(constraints: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = Arc<Constraint>>,
    {
        let mut seen = HashSet::new();
        let mut group = Group::root();
        for constraint in constraints {
            match group.extend(&constraint, &mut seen)? {
                Some(next) => group = next,
                None => return Ok(None),
            }
        }
        Ok(Some(group))
    }

    /// Conjoins one more constraint.
    ///
    /// Returns `Ok(None)` when the result was already seen, or when the group
    /// already holds a constraint sharing the value prime or the comparison
    /// prime. Accepted signatures are recorded in `seen`. Redundant
    /// extensions are rejected before the product is formed, so only a
    /// non-redundant extension can fail with `SignatureProductOverflow`.
    pub fn extend(
        &self,
        constraint: &Arc<Constraint>,
        seen: &mut HashSet<Signature>,
    ) -> Result<Option<Group>> {
        if self.signature.divisible_by(constraint.value_prime())
            || self.signature.divisible_by(constraint.comparison_prime())
        {
            return Ok(None);
        }
        let signature = self
            .signature
            .checked_extend(constraint.signature())
            .ok_or_else(|| SubgroupError::SignatureProductOverflow {
                group: self.to_string(),
                constraint: constraint.to_string(),
            })?;
        if !seen.insert(signature) {
            return Ok(None);
        }

        let mut constraints = self.constraints.clone();
        constraints.push(Arc::clone(constraint));
        Ok(Some(Group {
            constraints,
            signature,
        }))
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }

    pub fn constraints(&self) -> &[Arc<Constraint>] {
        &self.constraints
    }

    /// The most recently added constraint.
    pub fn last(&self) -> Option<&Arc<Constraint>> {
        self.constraints.last()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Whether a constraint on `attribute` is part of the group.
    pub fn constrains(&self, attribute: usize) -> bool {
        self.constraints.iter().any(|c| c.attribute() == attribute)
    }

    /// Rows satisfying every constraint.
    pub fn covered_indices(&self, dataset: &Dataset) -> IndexSet {
        let mut sets: SmallVec<[&IndexSet; 4]> =
            self.constraints.iter().map(|c| c.covered()).collect();
        sets.sort_by_key(|set| set.len());

        let mut sets = sets.into_iter();
        let Some(first) = sets.next() else {
            return dataset.all_rows();
        };
        let mut covered = first.clone();
        for set in sets {
            if covered.is_empty() {
                break;
            }
            covered &= set;
        }
        covered
    }

    /// Rows missing a value for any constrained attribute.
    pub fn missing_indices(&self, dataset: &Dataset) -> IndexSet {
        let mut missing = IndexSet::new();
        for constraint in &self.constraints {
            missing |= dataset.index(constraint.attribute()).missing_rows();
        }
        missing
    }

    /// Readable conjunction, e.g. `x >= 6.0 ∧ c = red`.
    pub fn describe(&self) -> String {
        let parts: Vec<String> = self.constraints.iter().map(|c| c.to_string()).collect();
        parts.join(" ∧ ")
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.constraints.is_empty() {
            f.write_str("(all)")
        } else {
            f.write_str(&self.describe())
        }
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.signature == other.signature
    }
}

impl Eq for Group {}

impl std::hash::Hash for Group {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.signature.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::Comparison;
    use crate::value::AttributeValue;

    fn constraint(attribute: usize, value: f64, comparison: Comparison, vp: u64, cp: u64) -> Arc<Constraint> {
        let covered: IndexSet = (0..10u32).filter(|r| f64::from(*r) >= value).collect();
        Arc::new(Constraint::new(
            attribute,
            format!("a{attribute}"),
            AttributeValue::Numeric(value),
            comparison,
            vp,
            cp,
            covered,
        ))
    }

    #[test]
    fn test_signature_is_order_independent() {
        let a = constraint(0, 1.0, Comparison::Gteq, 5, 2);
        let b = constraint(1, 2.0, Comparison::Gteq, 7, 3);

        let ab = Group::from_constraints([a.clone(), b.clone()]).unwrap().unwrap();
        let ba = Group::from_constraints([b, a]).unwrap().unwrap();
        assert_eq!(ab.signature(), ba.signature());
        assert_eq!(ab.signature().value(), 5 * 2 * 7 * 3);
    }

    #[test]
    fn test_extend_divides_by_constraint_signature() {
        let a = constraint(0, 1.0, Comparison::Gteq, 5, 2);
        let b = constraint(1, 2.0, Comparison::Gteq, 7, 3);
        let mut seen = HashSet::new();

        let g = Group::root().extend(&a, &mut seen).unwrap().unwrap();
        let g2 = g.extend(&b, &mut seen).unwrap().unwrap();
        assert_eq!(g2.signature().value() % b.signature().value(), 0);
        assert_eq!(g2.signature().value() / g.signature().value(), b.signature().value());
        assert!(seen.contains(&g2.signature()));
    }

    #[test]
    fn test_rejects_same_value_with_other_comparison() {
        let gteq = constraint(0, 3.0, Comparison::Gteq, 7, 2);
        let lteq = constraint(0, 3.0, Comparison::Lteq, 7, 3);
        let mut seen = HashSet::new();

        let g = Group::root().extend(&gteq, &mut seen).unwrap().unwrap();
        assert!(g.extend(&lteq, &mut seen).unwrap().is_none());
    }

    #[test]
    fn test_rejects_same_comparison_on_attribute() {
        let low = constraint(0, 3.0, Comparison::Gteq, 7, 2);
        let high = constraint(0, 5.0, Comparison::Gteq, 11, 2);
        let mut seen = HashSet::new();

        let g = Group::root().extend(&low, &mut seen).unwrap().unwrap();
        assert!(g.extend(&high, &mut seen).unwrap().is_none());
    }

    #[test]
    fn test_rejects_seen_signature() {
        let a = constraint(0, 1.0, Comparison::Gteq, 5, 2);
        let mut seen = HashSet::new();
        assert!(Group::root().extend(&a, &mut seen).unwrap().is_some());
        assert!(Group::root().extend(&a, &mut seen).unwrap().is_none());
    }

    #[test]
    fn test_overflow_is_reported() {
        let big = u64::MAX - 58; // largest prime below 2^64
        let a = constraint(0, 1.0, Comparison::Gteq, big, 2);
        let b = constraint(1, 1.0, Comparison::Gteq, big - 2, 3);
        let mut seen = HashSet::new();

        let g = Group::root().extend(&a, &mut seen).unwrap().unwrap();
        let err = g.extend(&b, &mut seen).unwrap_err();
        assert!(matches!(
            &err,
            SubgroupError::SignatureProductOverflow { group, constraint }
                if group == "a0 >= 1.0" && constraint == "a1 >= 1.0"
        ));
        assert!(err.to_string().contains("u128"));
    }

    #[test]
    fn test_redundant_extension_is_rejected_before_overflow() {
        let big = u64::MAX - 58;
        let a = constraint(0, 1.0, Comparison::Gteq, big, 2);
        // Shares the comparison prime, and the product would not fit either.
        let b = constraint(0, 3.0, Comparison::Gteq, big - 2, 2);
        let mut seen = HashSet::new();

        let g = Group::root().extend(&a, &mut seen).unwrap().unwrap();
        assert!(g.extend(&b, &mut seen).unwrap().is_none());
    }

    #[test]
    fn test_describe_joins_constraints() {
        let a = constraint(0, 1.0, Comparison::Gteq, 5, 2);
        let b = constraint(1, 2.0, Comparison::Lteq, 7, 3);
        let g = Group::from_constraints([a, b]).unwrap().unwrap();
        assert_eq!(g.describe(), "a0 >= 1.0 ∧ a1 <= 2.0");
        assert_eq!(Group::root().to_string(), "(all)");
    }
}
