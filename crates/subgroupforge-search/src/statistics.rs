//! Search statistics collection.
//!
//! Counters are updated concurrently from the worker pool and read once the
//! search finishes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Totals of one search run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStatistics {
    pub total_duration: Duration,
    /// Seeds handed to the refinement operator.
    pub seeds_expanded: u64,
    /// Children produced by refinement.
    pub candidates_generated: u64,
    /// Children whose covered rows were evaluated.
    pub candidates_evaluated: u64,
    /// Children that passed the quality floor and coverage bounds.
    pub candidates_accepted: u64,
    /// Children the evaluator could not score.
    pub degenerate: u64,
    pub levels_completed: u64,
}

impl SearchStatistics {
    /// Accepted / evaluated.
    pub fn acceptance_rate(&self) -> f64 {
        if self.candidates_evaluated == 0 {
            0.0
        } else {
            self.candidates_accepted as f64 / self.candidates_evaluated as f64
        }
    }

    pub fn candidates_per_second(&self) -> f64 {
        let secs = self.total_duration.as_secs_f64();
        if secs > 0.0 {
            self.candidates_evaluated as f64 / secs
        } else {
            0.0
        }
    }
}

/// Thread-safe collector for [`SearchStatistics`].
#[derive(Debug)]
pub struct StatisticsCollector {
    start_time: Instant,
    seeds_expanded: AtomicU64,
    candidates_generated: AtomicU64,
    candidates_evaluated: AtomicU64,
    candidates_accepted: AtomicU64,
    degenerate: AtomicU64,
    levels_completed: AtomicU64,
}

impl StatisticsCollector {
    /// Creates a collector; the start time is recorded now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            seeds_expanded: AtomicU64::new(0),
            candidates_generated: AtomicU64::new(0),
            candidates_evaluated: AtomicU64::new(0),
            candidates_accepted: AtomicU64::new(0),
            degenerate: AtomicU64::new(0),
            levels_completed: AtomicU64::new(0),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn record_seed(&self, generated: usize) {
        self.seeds_expanded.fetch_add(1, Ordering::Relaxed);
        self.candidates_generated
            .fetch_add(generated as u64, Ordering::Relaxed);
    }

    /// Records one evaluated candidate and whether it was kept.
    pub fn record_candidate(&self, accepted: bool) {
        self.candidates_evaluated.fetch_add(1, Ordering::Relaxed);
        if accepted {
            self.candidates_accepted.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_degenerate(&self) {
        self.degenerate.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_level(&self) {
        self.levels_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn current_candidates_evaluated(&self) -> u64 {
        self.candidates_evaluated.load(Ordering::Relaxed)
    }

    pub fn current_levels_completed(&self) -> u64 {
        self.levels_completed.load(Ordering::Relaxed)
    }

    /// Current totals.
    pub fn snapshot(&self) -> SearchStatistics {
        SearchStatistics {
            total_duration: self.elapsed(),
            seeds_expanded: self.seeds_expanded.load(Ordering::Relaxed),
            candidates_generated: self.candidates_generated.load(Ordering::Relaxed),
            candidates_evaluated: self.candidates_evaluated.load(Ordering::Relaxed),
            candidates_accepted: self.candidates_accepted.load(Ordering::Relaxed),
            degenerate: self.degenerate.load(Ordering::Relaxed),
            levels_completed: self.levels_completed.load(Ordering::Relaxed),
        }
    }
}

impl Default for StatisticsCollector {
    fn default() -> Self {
        Self::new()
    }
}
