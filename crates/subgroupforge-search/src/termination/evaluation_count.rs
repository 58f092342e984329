//! Termination after a number of evaluated candidates.

use super::Termination;
use crate::scope::SearchScope;

/// Terminates once at least `limit` candidates have been evaluated.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationCountTermination {
    limit: u64,
}

impl EvaluationCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for EvaluationCountTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.statistics().current_candidates_evaluated() >= self.limit
    }
}
