//! Quality measures over a confusion matrix.
//!
//! Every measure returns `None` when its formula is undefined for the
//! matrix (empty coverage, a zero class total). Callers treat `None` as
//! failing the quality floor.

use std::fmt::Debug;

use crate::confusion::ConfusionMatrix;

/// Scores a confusion matrix into a single value, higher is better.
pub trait QualityMeasure: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    /// Human-readable formula in terms of `p`, `n`, `P` and `N`.
    fn formula(&self) -> &'static str;

    /// Lowest quality a reported subgroup may have.
    fn minimum(&self) -> f64;

    fn evaluate(&self, matrix: &ConfusionMatrix) -> Option<f64>;
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// `((p + n) / (P + N)) * (p / (p + n) - P / (P + N))`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedRelativeAccuracy {
    pub minimum: f64,
}

impl WeightedRelativeAccuracy {
    pub fn new(minimum: f64) -> Self {
        Self { minimum }
    }
}

impl Default for WeightedRelativeAccuracy {
    fn default() -> Self {
        Self::new(0.02)
    }
}

impl QualityMeasure for WeightedRelativeAccuracy {
    fn name(&self) -> &'static str {
        "Weighted Relative Accuracy"
    }

    fn formula(&self) -> &'static str {
        "((p + n) / (P + N)) * (p / (p + n) - P / (P + N))"
    }

    fn minimum(&self) -> f64 {
        self.minimum
    }

    fn evaluate(&self, m: &ConfusionMatrix) -> Option<f64> {
        let coverage = m.coverage() as f64;
        let total = m.total() as f64;
        if m.coverage() == 0 || m.total() == 0 {
            return None;
        }
        finite((coverage / total) * (m.p as f64 / coverage - m.positives as f64 / total))
    }
}

/// `p / P`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sensitivity {
    pub minimum: f64,
}

impl Sensitivity {
    pub fn new(minimum: f64) -> Self {
        Self { minimum }
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl QualityMeasure for Sensitivity {
    fn name(&self) -> &'static str {
        "Sensitivity"
    }

    fn formula(&self) -> &'static str {
        "p / P"
    }

    fn minimum(&self) -> f64 {
        self.minimum
    }

    fn evaluate(&self, m: &ConfusionMatrix) -> Option<f64> {
        if m.coverage() == 0 || m.positives == 0 {
            return None;
        }
        finite(m.p as f64 / m.positives as f64)
    }
}

/// `1 - n / N`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Specificity {
    pub minimum: f64,
}

impl Specificity {
    pub fn new(minimum: f64) -> Self {
        Self { minimum }
    }
}

impl Default for Specificity {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl QualityMeasure for Specificity {
    fn name(&self) -> &'static str {
        "Specificity"
    }

    fn formula(&self) -> &'static str {
        "1 - n / N"
    }

    fn minimum(&self) -> f64 {
        self.minimum
    }

    fn evaluate(&self, m: &ConfusionMatrix) -> Option<f64> {
        if m.coverage() == 0 || m.negatives == 0 {
            return None;
        }
        finite(1.0 - m.n as f64 / m.negatives as f64)
    }
}

/// `((pN - Pn)^2 / (P + N)) * ((P + N)^2 / (P N (p + n) (P + N - p - n)))`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquared {
    pub minimum: f64,
}

impl ChiSquared {
    pub fn new(minimum: f64) -> Self {
        Self { minimum }
    }
}

impl Default for ChiSquared {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl QualityMeasure for ChiSquared {
    fn name(&self) -> &'static str {
        "Chi-squared"
    }

    fn formula(&self) -> &'static str {
        "((pN - Pn)^2 / (P + N)) * ((P + N)^2 / (P N (p + n) (P + N - p - n)))"
    }

    fn minimum(&self) -> f64 {
        self.minimum
    }

    fn evaluate(&self, m: &ConfusionMatrix) -> Option<f64> {
        let (p, n) = (m.p as f64, m.n as f64);
        let (big_p, big_n) = (m.positives as f64, m.negatives as f64);
        let total = big_p + big_n;
        let uncovered = m.total().checked_sub(m.coverage())?;
        if m.coverage() == 0 || uncovered == 0 || m.positives == 0 || m.negatives == 0 {
            return None;
        }
        let delta = p * big_n - big_p * n;
        finite(
            (delta * delta / total)
                * (total * total / (big_p * big_n * (p + n) * uncovered as f64)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(p: u64, n: u64, positives: u64, negatives: u64) -> ConfusionMatrix {
        ConfusionMatrix::new(p, n, 0, 0, positives, negatives)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_weighted_relative_accuracy() {
        let wra = WeightedRelativeAccuracy::default();
        assert_eq!(wra.minimum(), 0.02);
        // 0.5 * (1.0 - 0.5)
        assert!(close(wra.evaluate(&matrix(5, 0, 5, 5)).unwrap(), 0.25));
        // Matching the base rate scores zero.
        assert!(close(wra.evaluate(&matrix(2, 2, 5, 5)).unwrap(), 0.0));
    }

    #[test]
    fn test_sensitivity_and_specificity() {
        assert!(close(Sensitivity::default().evaluate(&matrix(3, 1, 4, 6)).unwrap(), 0.75));
        assert!(close(Specificity::default().evaluate(&matrix(3, 3, 4, 6)).unwrap(), 0.5));
    }

    #[test]
    fn test_chi_squared_perfect_split() {
        // A subgroup that is exactly the positives gets chi^2 = P + N.
        let value = ChiSquared::default().evaluate(&matrix(5, 0, 5, 5)).unwrap();
        assert!(close(value, 10.0));
    }

    #[test]
    fn test_empty_coverage_is_undefined() {
        let empty = matrix(0, 0, 5, 5);
        let measures: [&dyn QualityMeasure; 4] = [
            &WeightedRelativeAccuracy::default(),
            &Sensitivity::default(),
            &Specificity::default(),
            &ChiSquared::default(),
        ];
        for measure in measures {
            assert_eq!(measure.evaluate(&empty), None, "{}", measure.name());
        }
    }

    #[test]
    fn test_zero_class_totals_are_undefined() {
        assert_eq!(Sensitivity::default().evaluate(&matrix(0, 3, 0, 10)), None);
        assert_eq!(Specificity::default().evaluate(&matrix(3, 0, 10, 0)), None);
        assert_eq!(ChiSquared::default().evaluate(&matrix(3, 0, 10, 0)), None);
        // Covering every row leaves chi^2 undefined.
        assert_eq!(ChiSquared::default().evaluate(&matrix(5, 5, 5, 5)), None);
    }
}
