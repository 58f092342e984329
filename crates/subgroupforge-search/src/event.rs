//! Progress events sent while a search runs.

use crate::subgroup::Subgroup;

/// Summary of one completed level.
#[derive(Debug, Clone)]
pub struct LevelReport {
    pub level: usize,
    pub seeds_expanded: usize,
    pub candidates_generated: usize,
    pub candidates_accepted: usize,
    /// Beam kept for the next level, best first.
    pub beam: Vec<Subgroup>,
}

impl LevelReport {
    /// Best quality in the beam.
    pub fn best_quality(&self) -> Option<f64> {
        self.beam.first().map(Subgroup::quality)
    }
}

/// Events emitted through an unbounded channel.
#[derive(Debug, Clone)]
pub enum SearchEvent {
    Started {
        depth: usize,
        width: usize,
        constraints: usize,
    },
    LevelCompleted(LevelReport),
    Finished {
        results: usize,
        terminated_early: bool,
    },
}
