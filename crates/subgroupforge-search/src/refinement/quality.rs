//! Extensions restricted to individually promising constraints.

use std::collections::HashSet;

use subgroupforge_core::{Group, Result, Signature};

use super::{RefinementContext, RefinementOperator};

/// Skips constraints whose own score is below the quality floor and returns
/// children ordered by the added constraint's score, best first.
///
/// Needs a scored catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityRefinement;

impl QualityRefinement {
    pub fn new() -> Self {
        Self
    }
}

impl RefinementOperator for QualityRefinement {
    fn name(&self) -> &'static str {
        "Quality"
    }

    fn requires_scores(&self) -> bool {
        true
    }

    fn generate(
        &self,
        seed: &Group,
        context: &RefinementContext<'_>,
        seen: &mut HashSet<Signature>,
    ) -> Result<Vec<Group>> {
        let mut scored = Vec::new();
        for attribute in context.attributes() {
            for constraint in context.catalog.constraints_for(attribute) {
                let score = match context.catalog.score(constraint.signature()) {
                    Some(score) if score >= context.quality_floor => score,
                    _ => continue,
                };
                if let Some(child) = seed.extend(constraint, seen)? {
                    scored.push((score, child));
                }
            }
        }
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        Ok(scored.into_iter().map(|(_, child)| child).collect())
    }
}
