//! Extensions ordered by closeness to a target coverage.

use std::collections::HashSet;

use subgroupforge_core::{Group, Result, Signature};

use super::{RefinementContext, RefinementOperator, SimpleRefinement};

/// Same children as [`SimpleRefinement`], ordered by how close each child's
/// coverage is to `target_fraction` of the dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageBiasedRefinement {
    target_fraction: f64,
}

impl CoverageBiasedRefinement {
    pub fn new(target_fraction: f64) -> Self {
        Self { target_fraction }
    }

    /// Prefers children covering as many rows as possible.
    pub fn high() -> Self {
        Self::new(1.0)
    }

    /// Prefers children covering half of the rows.
    pub fn middle() -> Self {
        Self::new(0.5)
    }

    pub fn target_fraction(&self) -> f64 {
        self.target_fraction
    }
}

impl RefinementOperator for CoverageBiasedRefinement {
    fn name(&self) -> &'static str {
        "Coverage"
    }

    fn generate(
        &self,
        seed: &Group,
        context: &RefinementContext<'_>,
        seen: &mut HashSet<Signature>,
    ) -> Result<Vec<Group>> {
        let children = SimpleRefinement.generate(seed, context, seen)?;
        let target = self.target_fraction * context.dataset.row_count() as f64;

        let mut keyed: Vec<(f64, Group)> = children
            .into_iter()
            .map(|child| {
                let coverage = child
                    .last()
                    .map_or(context.seed_covered.len(), |c| {
                        c.covered().intersection_len(context.seed_covered)
                    });
                ((coverage as f64 - target).abs(), child)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(keyed.into_iter().map(|(_, child)| child).collect())
    }
}
