//! Level-by-level beam search.
//!
//! Each level drains the candidate queue one seed at a time. The children of
//! a seed are generated on the calling thread, then evaluated in parallel on
//! the worker pool; the level moves on to the next seed only after every
//! child of the current one has been evaluated. Accepted children go into
//! both the level's beam and the global result set. The beam becomes the
//! next level's candidate queue.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use subgroupforge_core::{ConstraintCatalog, Dataset, Group, Result, SubgroupError};
use subgroupforge_scoring::Evaluator;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, trace};

use crate::collection::SharedCollection;
use crate::event::{LevelReport, SearchEvent};
use crate::refinement::{RefinementContext, RefinementOperator};
use crate::scope::SearchScope;
use crate::statistics::{SearchStatistics, StatisticsCollector};
use crate::subgroup::Subgroup;
use crate::termination::Termination;

/// Numeric bounds of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub depth: usize,
    pub width: usize,
    pub result_set_size: usize,
    /// Smallest accepted coverage, in rows.
    pub min_coverage: u64,
    /// Largest accepted coverage, as a fraction of the dataset.
    pub max_coverage_fraction: f64,
    /// Quality a subgroup must exceed. `None` uses the evaluator's minimum.
    pub quality_floor: Option<f64>,
    /// Worker threads evaluating children.
    pub threads: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            depth: 1,
            width: 10,
            result_set_size: 100,
            min_coverage: 2,
            max_coverage_fraction: 1.0,
            quality_floor: None,
            threads: 8,
        }
    }
}

impl SearchSettings {
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| Err(SubgroupError::InvalidSettings(message.to_string()));
        if self.depth == 0 {
            return invalid("depth must be at least 1");
        }
        if self.width == 0 {
            return invalid("width must be at least 1");
        }
        if self.result_set_size == 0 {
            return invalid("result set size must be at least 1");
        }
        if !(self.max_coverage_fraction > 0.0 && self.max_coverage_fraction <= 1.0) {
            return invalid("maximum coverage fraction must lie in (0, 1]");
        }
        if self.quality_floor.is_some_and(|floor| !floor.is_finite()) {
            return invalid("quality floor must be finite");
        }
        if self.threads == 0 {
            return invalid("thread count must be at least 1");
        }
        Ok(())
    }
}

/// What a finished search returns.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Best subgroups over all levels, best first.
    pub results: Vec<Subgroup>,
    pub levels: Vec<LevelReport>,
    pub statistics: SearchStatistics,
    /// A termination condition stopped the search before `depth` levels.
    pub terminated_early: bool,
}

impl SearchOutcome {
    pub fn best(&self) -> Option<&Subgroup> {
        self.results.first()
    }
}

/// Beam search over conjunctions of catalog constraints.
#[derive(Debug)]
pub struct BeamSearch {
    settings: SearchSettings,
    refinement: Box<dyn RefinementOperator>,
    blacklist: Vec<usize>,
    termination: Option<Box<dyn Termination>>,
    sender: Option<UnboundedSender<SearchEvent>>,
}

impl BeamSearch {
    pub fn new(settings: SearchSettings, refinement: Box<dyn RefinementOperator>) -> Self {
        Self {
            settings,
            refinement,
            blacklist: Vec::new(),
            termination: None,
            sender: None,
        }
    }

    /// Attribute ids never used in refinements.
    pub fn with_blacklist(mut self, attributes: impl IntoIterator<Item = usize>) -> Self {
        self.blacklist.extend(attributes);
        self
    }

    pub fn with_termination(mut self, termination: Box<dyn Termination>) -> Self {
        self.termination = Some(termination);
        self
    }

    /// Streams progress events to `sender`.
    pub fn with_event_sender(mut self, sender: UnboundedSender<SearchEvent>) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Runs the search from `seed`.
    ///
    /// Fails before any work when the settings are out of range, when the
    /// refinement operator needs catalog scores that are missing, or when
    /// `seed.len() + depth` constraints could overflow a signature.
    pub fn run(
        &self,
        dataset: &Dataset,
        catalog: &ConstraintCatalog,
        evaluator: &dyn Evaluator,
        seed: Group,
    ) -> Result<SearchOutcome> {
        let settings = &self.settings;
        settings.validate()?;
        if self.refinement.requires_scores() && !catalog.is_scored() {
            return Err(SubgroupError::InvalidSettings(format!(
                "{} refinement needs a scored constraint catalog",
                self.refinement.name()
            )));
        }
        let bound = catalog.max_safe_depth();
        let constraints = seed.len().saturating_add(settings.depth);
        if constraints > bound {
            return Err(SubgroupError::SignatureOverflow { constraints, bound });
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(settings.threads)
            .build()
            .map_err(|e| SubgroupError::ThreadPool(e.to_string()))?;

        let mut excluded = vec![false; dataset.attributes().len()];
        for id in self.blacklist.iter().copied().chain(evaluator.reserved_attributes()) {
            if let Some(slot) = excluded.get_mut(id) {
                *slot = true;
            }
        }
        let floor = settings.quality_floor.unwrap_or_else(|| evaluator.minimum());
        let min_coverage = settings.min_coverage;
        let max_coverage = settings.max_coverage_fraction * dataset.row_count() as f64;

        let statistics = Arc::new(StatisticsCollector::new());
        let mut scope = SearchScope::new(Arc::clone(&statistics));
        let results = SharedCollection::new(settings.result_set_size);
        let mut seen = HashSet::from([seed.signature()]);
        let mut candidates = vec![seed];
        let mut levels = Vec::with_capacity(settings.depth);
        let mut terminated_early = false;

        info!(
            event = "search_start",
            depth = settings.depth,
            width = settings.width,
            constraints = catalog.len(),
            refinement = self.refinement.name(),
            evaluator = evaluator.name(),
            quality_floor = floor,
            threads = settings.threads,
        );
        self.send(SearchEvent::Started {
            depth: settings.depth,
            width: settings.width,
            constraints: catalog.len(),
        });

        for level in 1..=settings.depth {
            scope.set_level(level);
            if self
                .termination
                .as_ref()
                .is_some_and(|termination| termination.is_terminated(&scope))
            {
                terminated_early = true;
                break;
            }
            if candidates.is_empty() {
                break;
            }

            let level_start = Instant::now();
            info!(event = "level_start", level, candidates = candidates.len());

            let beam = SharedCollection::new(settings.width);
            let accepted = AtomicUsize::new(0);
            let mut generated = 0;

            for seed in &candidates {
                let seed_covered = seed.covered_indices(dataset);
                let seed_missing = seed.missing_indices(dataset);
                let context = RefinementContext {
                    dataset,
                    catalog,
                    excluded: &excluded,
                    quality_floor: floor,
                    seed_covered: &seed_covered,
                };
                let children = self.refinement.generate(seed, &context, &mut seen)?;
                statistics.record_seed(children.len());
                generated += children.len();
                debug!(
                    event = "seed_expanded",
                    level,
                    seed = %seed,
                    children = children.len(),
                );

                pool.install(|| {
                    children.into_par_iter().for_each(|child| {
                        let Some(last) = child.last() else {
                            return;
                        };
                        let covered = last.covered() & &seed_covered;
                        let coverage = covered.len();
                        if coverage < min_coverage || coverage as f64 > max_coverage {
                            statistics.record_candidate(false);
                            return;
                        }

                        let mut missing = seed_missing.clone();
                        missing |= dataset.index(last.attribute()).missing_rows();
                        let Some(evaluation) = evaluator.evaluate(&covered, &missing) else {
                            statistics.record_degenerate();
                            statistics.record_candidate(false);
                            trace!(event = "degenerate_candidate", group = %child, coverage);
                            return;
                        };

                        let keep = evaluation.quality() > floor;
                        statistics.record_candidate(keep);
                        if keep {
                            accepted.fetch_add(1, Ordering::Relaxed);
                            let subgroup = Subgroup::new(child, evaluation);
                            beam.add(subgroup.clone());
                            results.add(subgroup);
                        }
                    });
                });
            }

            statistics.record_level();
            let report = LevelReport {
                level,
                seeds_expanded: candidates.len(),
                candidates_generated: generated,
                candidates_accepted: accepted.into_inner(),
                beam: beam.into_sorted_vec(),
            };
            info!(
                event = "level_end",
                level,
                duration_ms = level_start.elapsed().as_millis() as u64,
                generated = report.candidates_generated,
                accepted = report.candidates_accepted,
                beam = report.beam.len(),
                best_quality = ?report.best_quality(),
            );

            candidates = report.beam.iter().map(|s| s.group().clone()).collect();
            self.send(SearchEvent::LevelCompleted(report.clone()));
            levels.push(report);
        }

        let results = results.into_sorted_vec();
        let statistics = statistics.snapshot();
        info!(
            event = "search_end",
            duration_ms = statistics.total_duration.as_millis() as u64,
            levels = statistics.levels_completed,
            evaluated = statistics.candidates_evaluated,
            results = results.len(),
            terminated_early,
        );
        self.send(SearchEvent::Finished {
            results: results.len(),
            terminated_early,
        });

        Ok(SearchOutcome {
            results,
            levels,
            statistics,
            terminated_early,
        })
    }

    fn send(&self, event: SearchEvent) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(event);
        }
    }
}
