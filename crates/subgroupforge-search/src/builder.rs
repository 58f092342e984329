//! Wiring between configuration types and search components.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use subgroupforge_config::{
    QualityMeasureConfig, QualityMeasureType, RefinementConfig, SearchConfig,
};
use subgroupforge_core::{Dataset, Result};
use subgroupforge_scoring::{
    ChiSquared, Evaluator, QualityMeasure, RegressionEvaluator, RegressionModel, Sensitivity,
    Specificity, TargetEvaluator, WeightedRelativeAccuracy,
};

use crate::beam::SearchSettings;
use crate::refinement::{
    CoverageBiasedRefinement, QualityRefinement, RefinementOperator, SimpleRefinement,
};
use crate::termination::{
    EvaluationCountTermination, ExternalTermination, OrTermination, Termination, TimeTermination,
};

/// Builds quality measures from configuration.
pub struct MeasureBuilder;

impl MeasureBuilder {
    pub fn build(config: &QualityMeasureConfig) -> Box<dyn QualityMeasure> {
        let minimum = config.minimum();
        match config.measure_type {
            QualityMeasureType::Wra => Box::new(WeightedRelativeAccuracy::new(minimum)),
            QualityMeasureType::Sensitivity => Box::new(Sensitivity::new(minimum)),
            QualityMeasureType::Specificity => Box::new(Specificity::new(minimum)),
            QualityMeasureType::ChiSquared => Box::new(ChiSquared::new(minimum)),
        }
    }
}

/// Builds refinement operators from configuration.
pub struct RefinementBuilder;

impl RefinementBuilder {
    pub fn build(config: &RefinementConfig) -> Box<dyn RefinementOperator> {
        match *config {
            RefinementConfig::Simple => Box::new(SimpleRefinement::new()),
            RefinementConfig::Quality => Box::new(QualityRefinement::new()),
            RefinementConfig::Coverage { target_fraction } => {
                Box::new(CoverageBiasedRefinement::new(target_fraction))
            }
        }
    }
}

/// Builds the evaluator a configuration asks for.
pub struct EvaluatorBuilder;

impl EvaluatorBuilder {
    /// A regression evaluator when `regression` is configured, otherwise a
    /// target evaluator with the configured quality measure.
    pub fn build(config: &SearchConfig, dataset: &Dataset) -> Result<Box<dyn Evaluator>> {
        if let Some(regression) = &config.regression {
            let model = RegressionModel::fit(
                dataset,
                &regression.y,
                &regression.x,
                config.missing_values,
                regression.minimum,
            )?;
            return Ok(Box::new(RegressionEvaluator::new(model)));
        }

        let target = dataset.resolve_target(
            config.target.attribute.as_deref(),
            &config.target.value,
            config.target.comparison,
        )?;
        Ok(Box::new(TargetEvaluator::new(
            target,
            MeasureBuilder::build(&config.quality_measure),
        )))
    }
}

/// Builds the termination condition from configuration.
pub struct TerminationBuilder;

impl TerminationBuilder {
    /// Combines the configured limits with an optional external flag.
    ///
    /// Returns `None` when nothing can stop the search early.
    pub fn build(
        config: &SearchConfig,
        flag: Option<Arc<AtomicBool>>,
    ) -> Option<Box<dyn Termination>> {
        let mut terminations: Vec<Box<dyn Termination>> = Vec::new();
        if let Some(limit) = config.time_limit() {
            terminations.push(Box::new(TimeTermination::new(limit)));
        }
        if let Some(limit) = config
            .termination
            .as_ref()
            .and_then(|t| t.candidates_evaluated_limit)
        {
            terminations.push(Box::new(EvaluationCountTermination::new(limit)));
        }
        if let Some(flag) = flag {
            terminations.push(Box::new(ExternalTermination::new(flag)));
        }

        let mut terminations = terminations.into_iter();
        match (terminations.next(), terminations.next(), terminations.next()) {
            (None, _, _) => None,
            (Some(a), None, _) => Some(a),
            (Some(a), Some(b), None) => Some(Box::new(OrTermination((a, b)))),
            (Some(a), Some(b), Some(c)) => Some(Box::new(OrTermination((a, b, c)))),
        }
    }
}

impl SearchSettings {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            depth: config.depth,
            width: config.width,
            result_set_size: config.result_set_size,
            min_coverage: config.min_coverage,
            max_coverage_fraction: config.max_coverage_fraction,
            quality_floor: Some(config.minimum_quality()),
            threads: config.thread_count.resolve(),
        }
    }
}
