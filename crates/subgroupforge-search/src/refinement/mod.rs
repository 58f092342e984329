//! Refinement operators.
//!
//! A refinement operator extends a seed group by one constraint in every
//! valid way. Operators differ in which constraints they try and in the
//! order of the children they return; the set of children is always a
//! subset of what [`SimpleRefinement`] produces.

mod coverage;
mod quality;
mod simple;

use std::collections::HashSet;
use std::fmt::Debug;

use subgroupforge_core::{ConstraintCatalog, Dataset, Group, IndexSet, Result, Signature};

pub use coverage::CoverageBiasedRefinement;
pub use quality::QualityRefinement;
pub use simple::SimpleRefinement;

/// Read-only inputs for refining one seed.
#[derive(Debug, Clone, Copy)]
pub struct RefinementContext<'a> {
    pub dataset: &'a Dataset,
    pub catalog: &'a ConstraintCatalog,
    /// Per attribute id, whether it may not appear in refinements.
    pub excluded: &'a [bool],
    /// Quality a reported subgroup must exceed.
    pub quality_floor: f64,
    /// Rows covered by the seed.
    pub seed_covered: &'a IndexSet,
}

impl RefinementContext<'_> {
    /// Attribute ids eligible for refinement.
    pub fn attributes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.dataset.attributes().len())
            .filter(|&id| !self.excluded.get(id).copied().unwrap_or(false))
    }
}

/// Produces the children of a seed group.
pub trait RefinementOperator: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    /// Whether the catalog must be scored before refining.
    fn requires_scores(&self) -> bool {
        false
    }

    /// Extends `seed` by one constraint in every way not yet in `seen`.
    ///
    /// Each returned child's signature is added to `seen`.
    fn generate(
        &self,
        seed: &Group,
        context: &RefinementContext<'_>,
        seen: &mut HashSet<Signature>,
    ) -> Result<Vec<Group>>;
}
