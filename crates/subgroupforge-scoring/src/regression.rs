//! Regression model evaluation.
//!
//! A subgroup is scored by how far the least-squares coefficients fitted on
//! its rows move away from the coefficients fitted on the whole dataset,
//! measured as a Cook's distance:
//!
//! ```text
//! D = (b_g - b)' X'X (b_g - b) / (p s^2)
//! ```
//!
//! with `X` the full design matrix (intercept column first), `b` the full
//! estimate, `b_g` the subgroup estimate, `p` the number of coefficients and
//! `s^2` the full-data residual variance.

use nalgebra::{DMatrix, DVector};
use subgroupforge_core::{
    AttributeType, Dataset, IndexSet, MissingValuePolicy, Result, SubgroupError,
};
use tracing::{debug, trace};

use crate::evaluation::{Evaluation, Evaluator};

/// Smallest accepted ratio between a Cholesky pivot and the largest
/// diagonal entry of `X'X`. Below this the columns are treated as collinear.
const RANK_TOLERANCE: f64 = 1e-10;

/// Result of evaluating one subgroup against the regression model.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionEvaluation {
    /// Cook's distance of the subgroup estimate.
    pub influence: f64,
    /// Subgroup coefficients, intercept first.
    pub estimators: Vec<f64>,
    /// Rows used for the subgroup fit.
    pub size: usize,
    /// Rows covered by the subgroup.
    pub coverage: u64,
}

/// Least-squares model of `y` on `x` fitted over the full dataset.
#[derive(Debug, Clone)]
pub struct RegressionModel {
    y: usize,
    xs: Vec<usize>,
    /// Row-major design values, `parameters` per row.
    design: Vec<f64>,
    response: Vec<f64>,
    usable: IndexSet,
    parameters: usize,
    full_xtx: DMatrix<f64>,
    estimators: DVector<f64>,
    scale: f64,
    minimum: f64,
}

impl RegressionModel {
    /// Fits `y ~ 1 + xs` on every row where all regression values are known.
    ///
    /// Missing values are replaced by zero when `policy` says so; otherwise
    /// such rows take no part in any fit.
    pub fn fit(
        dataset: &Dataset,
        y: &str,
        xs: &[String],
        policy: MissingValuePolicy,
        minimum: f64,
    ) -> Result<Self> {
        let y = numeric_attribute(dataset, y)?;
        let xs = xs
            .iter()
            .map(|name| numeric_attribute(dataset, name))
            .collect::<Result<Vec<_>>>()?;
        let parameters = xs.len() + 1;
        let rows = dataset.row_count();

        let mut design = Vec::with_capacity(rows * parameters);
        let mut response = Vec::with_capacity(rows);
        let mut usable = IndexSet::new();
        for row in 0..rows {
            let y_value = numeric_value(dataset, y, row, policy);
            let x_values: Option<Vec<f64>> = xs
                .iter()
                .map(|&x| numeric_value(dataset, x, row, policy))
                .collect();
            design.push(1.0);
            match (y_value, x_values) {
                (Some(y_value), Some(x_values)) => {
                    design.extend(x_values);
                    response.push(y_value);
                    usable.insert(row as u32);
                }
                _ => {
                    design.extend(std::iter::repeat(0.0).take(xs.len()));
                    response.push(0.0);
                }
            }
        }

        let mut model = Self {
            y,
            xs,
            design,
            response,
            usable,
            parameters,
            full_xtx: DMatrix::zeros(parameters, parameters),
            estimators: DVector::zeros(parameters),
            scale: 0.0,
            minimum,
        };

        let used = model.usable.len() as usize;
        if used <= parameters {
            return Err(SubgroupError::DegenerateDesign {
                rows: used,
                parameters,
                reason: "not enough rows with known values".to_string(),
            });
        }
        let (xtx, estimators) = model.solve(&model.usable).ok_or(SubgroupError::DegenerateDesign {
            rows: used,
            parameters,
            reason: "design columns are collinear".to_string(),
        })?;

        let residuals: f64 = model
            .usable
            .iter()
            .map(|row| {
                let e = model.response[row as usize] - model.row(row).dot(&estimators);
                e * e
            })
            .sum();
        let variance = residuals / (used - parameters) as f64;

        model.scale = parameters as f64 * variance;
        model.full_xtx = xtx;
        model.estimators = estimators;

        debug!(
            event = "regression_fit",
            rows = used,
            parameters,
            residual_variance = variance,
        );
        Ok(model)
    }

    /// Full-data coefficients, intercept first.
    pub fn estimators(&self) -> &[f64] {
        self.estimators.as_slice()
    }

    pub fn parameters(&self) -> usize {
        self.parameters
    }

    /// Attribute ids of the response and the regressors.
    pub fn attributes(&self) -> Vec<usize> {
        std::iter::once(self.y).chain(self.xs.iter().copied()).collect()
    }

    /// Rows with every regression value known.
    pub fn usable_rows(&self) -> &IndexSet {
        &self.usable
    }

    /// Cook's distance of the fit restricted to `covered`.
    ///
    /// Returns `None` when the restricted design is degenerate.
    pub fn influence(&self, covered: &IndexSet) -> Option<RegressionEvaluation> {
        let retained = covered & &self.usable;
        let size = retained.len() as usize;
        if size < self.parameters {
            trace!(event = "degenerate_design", rows = size, parameters = self.parameters);
            return None;
        }
        let Some((_, estimators)) = self.solve(&retained) else {
            trace!(event = "degenerate_design", rows = size, parameters = self.parameters);
            return None;
        };

        let delta = &estimators - &self.estimators;
        let influence = if delta.iter().all(|d| *d == 0.0) {
            0.0
        } else if self.scale > 0.0 {
            delta.dot(&(&self.full_xtx * &delta)) / self.scale
        } else {
            return None;
        };
        if !influence.is_finite() {
            return None;
        }

        Some(RegressionEvaluation {
            influence,
            estimators: estimators.iter().copied().collect(),
            size,
            coverage: covered.len(),
        })
    }

    fn row(&self, row: u32) -> DVector<f64> {
        let start = row as usize * self.parameters;
        DVector::from_column_slice(&self.design[start..start + self.parameters])
    }

    // Accumulates the normal equations over `rows` and solves them.
    fn solve(&self, rows: &IndexSet) -> Option<(DMatrix<f64>, DVector<f64>)> {
        let mut xtx = DMatrix::<f64>::zeros(self.parameters, self.parameters);
        let mut xty = DVector::<f64>::zeros(self.parameters);
        for row in rows.iter() {
            let x = self.row(row);
            xtx += &x * x.transpose();
            xty += &x * self.response[row as usize];
        }

        let largest = xtx.diagonal().iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let cholesky = xtx.clone().cholesky()?;
        let l = cholesky.l();
        let smallest_pivot = l.diagonal().iter().fold(f64::INFINITY, |acc, v| acc.min(v * v));
        if largest == 0.0 || smallest_pivot / largest < RANK_TOLERANCE {
            return None;
        }

        let estimators = cholesky.solve(&xty);
        Some((xtx, estimators))
    }
}

fn numeric_attribute(dataset: &Dataset, name: &str) -> Result<usize> {
    let id = dataset
        .attribute_id(name)
        .ok_or_else(|| SubgroupError::UnknownAttribute(name.to_string()))?;
    if dataset.attribute(id).kind() != AttributeType::Numeric {
        return Err(SubgroupError::NonNumericAttribute(name.to_string()));
    }
    Ok(id)
}

fn numeric_value(dataset: &Dataset, attribute: usize, row: usize, policy: MissingValuePolicy) -> Option<f64> {
    dataset
        .attribute(attribute)
        .value_at(row)
        .as_numeric()
        .or_else(|| policy.substitute(AttributeType::Numeric))
}

/// Evaluator scoring subgroups by their influence on a [`RegressionModel`].
#[derive(Debug)]
pub struct RegressionEvaluator {
    model: RegressionModel,
}

impl RegressionEvaluator {
    pub fn new(model: RegressionModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &RegressionModel {
        &self.model
    }
}

impl Evaluator for RegressionEvaluator {
    fn name(&self) -> &str {
        "Cook's distance"
    }

    fn minimum(&self) -> f64 {
        self.model.minimum
    }

    fn reserved_attributes(&self) -> Vec<usize> {
        self.model.attributes()
    }

    fn evaluate(&self, covered: &IndexSet, _missing: &IndexSet) -> Option<Evaluation> {
        self.model.influence(covered).map(Evaluation::Regression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subgroupforge_core::Attribute;
    use subgroupforge_test::regression_dataset;

    fn model(data: &Dataset) -> RegressionModel {
        RegressionModel::fit(data, "y", &["x".to_string()], MissingValuePolicy::default(), 0.0)
            .unwrap()
    }

    #[test]
    fn test_full_subgroup_has_zero_influence() {
        let data = regression_dataset();
        let model = model(&data);
        let evaluation = model.influence(&data.all_rows()).unwrap();
        assert_eq!(evaluation.influence, 0.0);
        assert_eq!(evaluation.estimators, model.estimators());
        assert_eq!(evaluation.size, 40);
    }

    #[test]
    fn test_deviating_region_has_high_influence() {
        let data = regression_dataset();
        let model = model(&data);
        let odd: IndexSet = (30..40).collect();
        let plain: IndexSet = (0..30).collect();

        let odd = model.influence(&odd).unwrap();
        let plain = model.influence(&plain).unwrap();
        assert!(odd.influence > plain.influence);
        assert!((odd.estimators[1] + 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_too_few_rows_is_degenerate() {
        let data = regression_dataset();
        let single: IndexSet = [4u32].into_iter().collect();
        assert!(model(&data).influence(&single).is_none());
    }

    #[test]
    fn test_constant_regressor_is_degenerate() {
        let data = regression_dataset();
        // Rows 0 and 20 share x = 0.
        let same_x: IndexSet = [0u32, 20].into_iter().collect();
        assert!(model(&data).influence(&same_x).is_none());
    }

    #[test]
    fn test_fit_rejects_collinear_design() {
        let data = Dataset::new(
            "flat",
            vec![
                Attribute::numeric("x", &[Some(1.0); 5]),
                Attribute::numeric("y", &[Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]),
            ],
        )
        .unwrap();
        let err = RegressionModel::fit(&data, "y", &["x".to_string()], MissingValuePolicy::default(), 0.0)
            .unwrap_err();
        assert!(matches!(err, SubgroupError::DegenerateDesign { .. }));
    }

    #[test]
    fn test_fit_rejects_non_numeric() {
        let data = regression_dataset();
        let err = RegressionModel::fit(&data, "y", &["group".to_string()], MissingValuePolicy::default(), 0.0)
            .unwrap_err();
        assert!(matches!(err, SubgroupError::NonNumericAttribute(name) if name == "group"));
    }

    #[test]
    fn test_missing_rows_excluded_unless_zero() {
        let data = Dataset::new(
            "gaps",
            vec![
                Attribute::numeric("x", &[Some(1.0), Some(2.0), None, Some(4.0), Some(5.0)]),
                Attribute::numeric("y", &[Some(2.0), Some(4.1), Some(6.0), Some(7.9), Some(10.2)]),
            ],
        )
        .unwrap();
        let skip = RegressionModel::fit(&data, "y", &["x".to_string()], MissingValuePolicy::default(), 0.0)
            .unwrap();
        assert_eq!(skip.usable_rows().len(), 4);

        let zero = RegressionModel::fit(&data, "y", &["x".to_string()], MissingValuePolicy::as_zero(), 0.0)
            .unwrap();
        assert_eq!(zero.usable_rows().len(), 5);
    }

    #[test]
    fn test_reserved_attributes() {
        let data = regression_dataset();
        let evaluator = RegressionEvaluator::new(model(&data));
        let mut reserved = evaluator.reserved_attributes();
        reserved.sort_unstable();
        assert_eq!(reserved, vec![0, 2]);
    }
}
