//! Every constraint the search may use, with its identity and optional score.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::comparison::Comparison;
use crate::constraint::{Constraint, MissingValuePolicy};
use crate::dataset::Dataset;
use crate::error::{Result, SubgroupError};
use crate::group::Signature;
use crate::prime::PrimeAllocator;

/// Operators recognised in constraint text, longest first.
const OPERATORS: [(&str, Comparison); 4] = [
    (" >= ", Comparison::Gteq),
    (" <= ", Comparison::Lteq),
    (" != ", Comparison::Neq),
    (" = ", Comparison::Eq),
];

/// Options that shape which constraints are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CatalogOptions {
    pub missing: MissingValuePolicy,
    /// Also generate `=`/`!=` for ordered attributes.
    pub ordered_equality: bool,
}

/// All `(value, comparison)` constraints of every attribute.
///
/// Built once per dataset. Lookups are by readable text (`"x >= 3.0"`) and
/// by signature; the optional per-constraint scores feed quality-ordered
/// refinement.
#[derive(Debug, Clone)]
pub struct ConstraintCatalog {
    per_attribute: Vec<Vec<Arc<Constraint>>>,
    by_name: HashMap<String, Arc<Constraint>>,
    by_signature: HashMap<Signature, Arc<Constraint>>,
    scores: HashMap<Signature, f64>,
    primes: Vec<u64>,
    options: CatalogOptions,
}

impl ConstraintCatalog {
    /// Enumerates and identifies every constraint of `dataset`.
    ///
    /// Each attribute draws one comparison prime per applicable comparison,
    /// then one value prime per distinct observed value.
    pub fn build(dataset: &Dataset, primes: &mut PrimeAllocator, options: CatalogOptions) -> Self {
        let first_prime = primes.allocated().len();
        let mut per_attribute = Vec::with_capacity(dataset.attributes().len());
        let mut by_name = HashMap::new();
        let mut by_signature = HashMap::new();

        for (id, attribute) in dataset.attributes().iter().enumerate() {
            let kind = attribute.kind();
            let index = dataset.index(id);
            let comparisons: Vec<(Comparison, u64)> = kind
                .comparisons(options.ordered_equality)
                .into_iter()
                .map(|c| (c, primes.next_prime()))
                .collect();

            let mut constraints = Vec::with_capacity(index.ranges().len() * comparisons.len());
            for value in index.distinct_values() {
                let value_prime = primes.next_prime();
                for &(comparison, comparison_prime) in &comparisons {
                    let include_missing = options.missing.includes_missing(kind, value, comparison);
                    let constraint = Arc::new(Constraint::new(
                        id,
                        attribute.name(),
                        value.clone(),
                        comparison,
                        value_prime,
                        comparison_prime,
                        index.covered_indices(value, comparison, include_missing),
                    ));
                    by_name.insert(constraint.to_string(), Arc::clone(&constraint));
                    by_signature.insert(constraint.signature(), Arc::clone(&constraint));
                    constraints.push(constraint);
                }
            }

            debug!(
                event = "catalog_attribute",
                attribute = attribute.name(),
                kind = kind.name(),
                distinct_values = index.ranges().len(),
                constraints = constraints.len(),
            );
            per_attribute.push(constraints);
        }

        Self {
            per_attribute,
            by_name,
            by_signature,
            scores: HashMap::new(),
            primes: primes.allocated()[first_prime..].to_vec(),
            options,
        }
    }

    /// Primes drawn while building the catalog, in allocation order.
    pub fn primes(&self) -> &[u64] {
        &self.primes
    }

    pub fn options(&self) -> &CatalogOptions {
        &self.options
    }

    /// Constraints of one attribute, grouped by value in ascending order.
    pub fn constraints_for(&self, attribute: usize) -> &[Arc<Constraint>] {
        self.per_attribute
            .get(attribute)
            .map_or(&[], |constraints| constraints.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Constraint>> {
        self.per_attribute.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_signature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_signature.is_empty()
    }

    pub fn by_signature(&self, signature: Signature) -> Option<&Arc<Constraint>> {
        self.by_signature.get(&signature)
    }

    /// Finds a constraint from text such as `"x >= 3"` or `"colour = red"`.
    ///
    /// The value is parsed with the attribute's type, so `3` and `3.0`
    /// name the same constraint.
    pub fn lookup(&self, dataset: &Dataset, text: &str) -> Result<Arc<Constraint>> {
        let (name, comparison, raw) = OPERATORS
            .iter()
            .find_map(|(op, comparison)| {
                text.split_once(op)
                    .map(|(name, raw)| (name.trim(), *comparison, raw.trim()))
            })
            .ok_or_else(|| {
                SubgroupError::InvalidSettings(format!(
                    "constraint `{}` must look like `attribute <op> value` with op one of =, !=, <=, >=",
                    text
                ))
            })?;

        let id = dataset
            .attribute_id(name)
            .ok_or_else(|| SubgroupError::UnknownAttribute(name.to_string()))?;
        let attribute = dataset.attribute(id);
        let unknown = || SubgroupError::UnknownConstraint {
            constraint: text.to_string(),
            attribute: attribute.name().to_string(),
            supported: attribute.kind().comparisons(self.options.ordered_equality),
        };

        if !attribute
            .kind()
            .comparisons(self.options.ordered_equality)
            .contains(&comparison)
        {
            return Err(unknown());
        }
        let value = attribute.parse(raw)?;
        let key = format!("{} {} {}", attribute.name(), comparison, value);
        self.by_name.get(&key).cloned().ok_or_else(unknown)
    }

    /// Attaches a score to every constraint. `None` leaves a constraint unscored.
    pub fn score_with<F>(&mut self, score: F)
    where
        F: Fn(&Constraint) -> Option<f64>,
    {
        self.scores = self
            .by_signature
            .iter()
            .filter_map(|(signature, c)| score(c).map(|s| (*signature, s)))
            .collect();
    }

    pub fn score(&self, signature: Signature) -> Option<f64> {
        self.scores.get(&signature).copied()
    }

    pub fn is_scored(&self) -> bool {
        !self.scores.is_empty()
    }

    /// Largest group size whose signature is guaranteed to fit in a `u128`.
    ///
    /// A group never holds two constraints sharing a prime, so the product
    /// of the `2k` largest primes of the catalog bounds any `k`-group.
    /// Returns `usize::MAX` when even the product of all primes fits.
    pub fn max_safe_depth(&self) -> usize {
        let mut primes = self.primes.clone();
        primes.sort_unstable_by(|a, b| b.cmp(a));

        let mut product: u128 = 1;
        for (depth, pair) in primes.chunks(2).enumerate() {
            match pair.iter().try_fold(product, |acc, &p| acc.checked_mul(p as u128)) {
                Some(next) => product = next,
                None => return depth,
            }
        }
        usize::MAX
    }
}

#[cfg(test)]
mod tests;
