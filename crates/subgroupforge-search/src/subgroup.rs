//! A scored subgroup and its ranking.

use std::cmp::Ordering;
use std::fmt;

use subgroupforge_core::{Group, Signature};
use subgroupforge_scoring::{ConfusionMatrix, Evaluation};

/// A group together with its evaluation.
///
/// Ranked by quality, then by fewer constraints, then by signature, so that
/// every two distinct subgroups compare unequal. Greater is better.
#[derive(Debug, Clone)]
pub struct Subgroup {
    group: Group,
    evaluation: Evaluation,
}

impl Subgroup {
    pub fn new(group: Group, evaluation: Evaluation) -> Self {
        Self { group, evaluation }
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn into_group(self) -> Group {
        self.group
    }

    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    pub fn quality(&self) -> f64 {
        self.evaluation.quality()
    }

    pub fn coverage(&self) -> u64 {
        self.evaluation.coverage()
    }

    /// Number of constraints.
    pub fn depth(&self) -> usize {
        self.group.len()
    }

    pub fn signature(&self) -> Signature {
        self.group.signature()
    }

    pub fn matrix(&self) -> Option<&ConfusionMatrix> {
        self.evaluation.matrix()
    }

    /// Readable conjunction of the constraints.
    pub fn describe(&self) -> String {
        self.group.describe()
    }
}

/// Greater is better: higher quality, then fewer constraints, then the
/// smaller signature.
impl Ord for Subgroup {
    fn cmp(&self, other: &Self) -> Ordering {
        self.quality()
            .total_cmp(&other.quality())
            .then_with(|| other.depth().cmp(&self.depth()))
            .then_with(|| other.signature().cmp(&self.signature()))
    }
}

impl PartialOrd for Subgroup {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Subgroup {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Subgroup {}

impl fmt::Display for Subgroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] quality={:.6} coverage={}", self.group, self.quality(), self.coverage())
    }
}
