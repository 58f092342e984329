//! Confusion matrix of a subgroup relative to the target.

use std::fmt;

use subgroupforge_core::{IndexSet, Target};

/// Counts describing how a subgroup overlaps the target rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    /// Covered rows that are positive.
    pub p: u64,
    /// Covered rows that are negative.
    pub n: u64,
    /// Rows missing a constrained value that are positive.
    pub up: u64,
    /// Rows missing a constrained value that are negative.
    pub un: u64,
    /// Positive rows in the dataset.
    pub positives: u64,
    /// Negative rows in the dataset.
    pub negatives: u64,
}

impl ConfusionMatrix {
    pub fn new(p: u64, n: u64, up: u64, un: u64, positives: u64, negatives: u64) -> Self {
        Self {
            p,
            n,
            up,
            un,
            positives,
            negatives,
        }
    }

    /// Counts `covered` and `missing` rows against the target's positives.
    pub fn compute(covered: &IndexSet, missing: &IndexSet, target: &Target) -> Self {
        let p = covered.intersection_len(target.positives());
        let up = missing.intersection_len(target.positives());
        Self {
            p,
            n: covered.len() - p,
            up,
            un: missing.len() - up,
            positives: target.positive_count(),
            negatives: target.negative_count(),
        }
    }

    /// `p + n`.
    pub fn coverage(&self) -> u64 {
        self.p + self.n
    }

    /// `P + N`.
    pub fn total(&self) -> u64 {
        self.positives + self.negatives
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p={} n={} up={} un={} P={} N={}",
            self.p, self.n, self.up, self.un, self.positives, self.negatives
        )
    }
}
