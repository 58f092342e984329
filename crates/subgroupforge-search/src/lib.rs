//! Beam search engine for SubgroupForge.
//!
//! This crate provides:
//! - Bounded priority collections for the beam and the result set
//! - Refinement operators (simple, quality-ordered, coverage-biased)
//! - The level-by-level beam search with a per-seed worker pool
//! - Termination conditions, statistics and progress events
//! - Builders wiring configuration into search components

pub mod beam;
pub mod builder;
pub mod collection;
pub mod event;
pub mod refinement;
pub mod scope;
pub mod statistics;
pub mod subgroup;
pub mod termination;

pub use beam::{BeamSearch, SearchOutcome, SearchSettings};
pub use builder::{EvaluatorBuilder, MeasureBuilder, RefinementBuilder, TerminationBuilder};
pub use collection::{BoundedPriorityCollection, SharedCollection};
pub use event::{LevelReport, SearchEvent};
pub use refinement::{
    CoverageBiasedRefinement, QualityRefinement, RefinementContext, RefinementOperator,
    SimpleRefinement,
};
pub use scope::SearchScope;
pub use statistics::{SearchStatistics, StatisticsCollector};
pub use subgroup::Subgroup;
pub use termination::{
    EvaluationCountTermination, ExternalTermination, OrTermination, Termination, TimeTermination,
};
