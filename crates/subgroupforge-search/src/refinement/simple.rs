//! Every valid one-constraint extension.

use std::collections::HashSet;

use subgroupforge_core::{Group, Result, Signature};

use super::{RefinementContext, RefinementOperator};

/// Tries every constraint of every eligible attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleRefinement;

impl SimpleRefinement {
    pub fn new() -> Self {
        Self
    }
}

impl RefinementOperator for SimpleRefinement {
    fn name(&self) -> &'static str {
        "Simple"
    }

    fn generate(
        &self,
        seed: &Group,
        context: &RefinementContext<'_>,
        seen: &mut HashSet<Signature>,
    ) -> Result<Vec<Group>> {
        let mut children = Vec::new();
        for attribute in context.attributes() {
            for constraint in context.catalog.constraints_for(attribute) {
                if let Some(child) = seed.extend(constraint, seen)? {
                    children.push(child);
                }
            }
        }
        Ok(children)
    }
}
