//! Scoring of subgroups against a target.
//!
//! - [`ConfusionMatrix`] - covered and missing positive/negative counts
//! - [`QualityMeasure`] - pure formulas over a confusion matrix
//! - [`Evaluator`] - turns covered rows into an [`Evaluation`], either
//!   against a target condition or against a regression model

pub mod confusion;
pub mod evaluation;
pub mod measure;
pub mod regression;

pub use confusion::ConfusionMatrix;
pub use evaluation::{score_catalog, Evaluation, Evaluator, TargetEvaluator};
pub use measure::{
    ChiSquared, QualityMeasure, Sensitivity, Specificity, WeightedRelativeAccuracy,
};
pub use regression::{RegressionEvaluation, RegressionEvaluator, RegressionModel};
