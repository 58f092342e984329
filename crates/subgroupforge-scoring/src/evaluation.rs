//! Evaluation of covered rows.

use std::fmt::Debug;

use subgroupforge_core::{ConstraintCatalog, Dataset, IndexSet, Target};
use tracing::debug;

use crate::confusion::ConfusionMatrix;
use crate::measure::QualityMeasure;
use crate::regression::RegressionEvaluation;

/// Outcome of evaluating one subgroup.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// Quality measure applied to the confusion matrix.
    Classification {
        quality: f64,
        matrix: ConfusionMatrix,
    },
    /// Influence of the subgroup on a regression model.
    Regression(RegressionEvaluation),
}

impl Evaluation {
    /// The ranking scalar.
    pub fn quality(&self) -> f64 {
        match self {
            Evaluation::Classification { quality, .. } => *quality,
            Evaluation::Regression(r) => r.influence,
        }
    }

    /// Number of rows covered by the subgroup.
    pub fn coverage(&self) -> u64 {
        match self {
            Evaluation::Classification { matrix, .. } => matrix.coverage(),
            Evaluation::Regression(r) => r.coverage,
        }
    }

    pub fn matrix(&self) -> Option<&ConfusionMatrix> {
        match self {
            Evaluation::Classification { matrix, .. } => Some(matrix),
            Evaluation::Regression(_) => None,
        }
    }
}

/// Scores the rows covered by a subgroup.
///
/// Shared read-only across worker threads during a search.
pub trait Evaluator: Send + Sync + Debug {
    fn name(&self) -> &str;

    /// Lowest quality a reported subgroup may have.
    fn minimum(&self) -> f64;

    /// Attributes that must not appear in refinements.
    fn reserved_attributes(&self) -> Vec<usize>;

    /// Evaluates covered rows, with `missing` the rows lacking a constrained
    /// value. `None` means the subgroup cannot be scored and fails the floor.
    fn evaluate(&self, covered: &IndexSet, missing: &IndexSet) -> Option<Evaluation>;
}

/// Evaluates subgroups against a target condition with a quality measure.
#[derive(Debug)]
pub struct TargetEvaluator {
    target: Target,
    measure: Box<dyn QualityMeasure>,
}

impl TargetEvaluator {
    pub fn new(target: Target, measure: Box<dyn QualityMeasure>) -> Self {
        Self { target, measure }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn measure(&self) -> &dyn QualityMeasure {
        self.measure.as_ref()
    }
}

impl Evaluator for TargetEvaluator {
    fn name(&self) -> &str {
        self.measure.name()
    }

    fn minimum(&self) -> f64 {
        self.measure.minimum()
    }

    fn reserved_attributes(&self) -> Vec<usize> {
        vec![self.target.attribute]
    }

    fn evaluate(&self, covered: &IndexSet, missing: &IndexSet) -> Option<Evaluation> {
        let matrix = ConfusionMatrix::compute(covered, missing, &self.target);
        let quality = self.measure.evaluate(&matrix)?;
        Some(Evaluation::Classification { quality, matrix })
    }
}

/// Attaches each constraint's own quality to the catalog.
///
/// Constraints the evaluator cannot score stay unscored.
pub fn score_catalog(evaluator: &dyn Evaluator, catalog: &mut ConstraintCatalog, dataset: &Dataset) {
    catalog.score_with(|constraint| {
        let missing = dataset.index(constraint.attribute()).missing_rows();
        evaluator
            .evaluate(constraint.covered(), missing)
            .map(|evaluation| evaluation.quality())
    });
    debug!(
        event = "catalog_scored",
        evaluator = evaluator.name(),
        constraints = catalog.len(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{Sensitivity, WeightedRelativeAccuracy};
    use subgroupforge_core::{CatalogOptions, Comparison, PrimeAllocator};
    use subgroupforge_test::threshold_dataset;

    fn evaluator() -> (Dataset, TargetEvaluator) {
        let data = threshold_dataset();
        let target = data.resolve_target(Some("b"), "true", Comparison::Eq).unwrap();
        (data, TargetEvaluator::new(target, Box::new(Sensitivity::default())))
    }

    #[test]
    fn test_target_evaluation() {
        let (data, evaluator) = evaluator();
        let covered: IndexSet = (5..10).collect();
        let evaluation = evaluator.evaluate(&covered, &IndexSet::new()).unwrap();

        assert_eq!(evaluation.quality(), 1.0);
        assert_eq!(evaluation.coverage(), 5);
        assert_eq!(evaluator.reserved_attributes(), vec![data.attribute_id("b").unwrap()]);
    }

    #[test]
    fn test_empty_coverage_has_no_evaluation() {
        let (_, evaluator) = evaluator();
        assert!(evaluator.evaluate(&IndexSet::new(), &IndexSet::new()).is_none());
    }

    #[test]
    fn test_score_catalog() {
        let data = threshold_dataset();
        let target = data.resolve_target(Some("b"), "true", Comparison::Eq).unwrap();
        let evaluator = TargetEvaluator::new(target, Box::new(WeightedRelativeAccuracy::default()));
        let mut catalog =
            ConstraintCatalog::build(&data, &mut PrimeAllocator::new(), CatalogOptions::default());

        score_catalog(&evaluator, &mut catalog, &data);

        let best = catalog.lookup(&data, "x >= 6").unwrap();
        assert_eq!(catalog.score(best.signature()), Some(0.25));
        let weak = catalog.lookup(&data, "x <= 2").unwrap();
        assert!(catalog.score(weak.signature()).unwrap() < 0.0);
    }
}
