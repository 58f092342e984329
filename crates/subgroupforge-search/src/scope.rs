//! Search-level state visible to termination conditions.

use std::sync::Arc;
use std::time::Duration;

use crate::statistics::StatisticsCollector;

/// State of a running search.
#[derive(Debug, Clone)]
pub struct SearchScope {
    statistics: Arc<StatisticsCollector>,
    level: usize,
}

impl SearchScope {
    pub fn new(statistics: Arc<StatisticsCollector>) -> Self {
        Self {
            statistics,
            level: 0,
        }
    }

    pub fn statistics(&self) -> &StatisticsCollector {
        &self.statistics
    }

    /// Time since the statistics collector was created.
    pub fn elapsed(&self) -> Duration {
        self.statistics.elapsed()
    }

    /// Level about to run, starting at 1.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn set_level(&mut self, level: usize) {
        self.level = level;
    }
}
