//! Configuration system for SubgroupForge.
//!
//! Load search configuration from TOML or YAML to control the beam, the
//! quality measure, the refinement operator and the target without code
//! changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use subgroupforge_config::{RefinementConfig, SearchConfig};
//!
//! let config = SearchConfig::from_toml_str(r#"
//!     depth = 2
//!     width = 20
//!     blacklist = ["id"]
//!
//!     [quality_measure]
//!     type = "chi_squared"
//!     minimum = 3.84
//!
//!     [refinement]
//!     type = "coverage"
//!     target_fraction = 0.5
//!
//!     [target]
//!     attribute = "churn"
//!     value = "1"
//! "#).unwrap();
//!
//! assert_eq!(config.depth, 2);
//! assert_eq!(config.refinement, RefinementConfig::Coverage { target_fraction: 0.5 });
//! assert_eq!(config.quality_measure.minimum(), 3.84);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use subgroupforge_config::SearchConfig;
//!
//! let config = SearchConfig::load("search.toml").unwrap_or_default();
//! assert_eq!(config.width, 10);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use subgroupforge_core::{Comparison, MissingValuePolicy};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main search configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SearchConfig {
    /// Number of refinement levels.
    pub depth: usize,

    /// Beam width kept between levels.
    pub width: usize,

    /// Number of subgroups reported.
    pub result_set_size: usize,

    /// Smallest number of covered rows a reported subgroup may have.
    pub min_coverage: u64,

    /// Largest covered fraction of the dataset, in `(0, 1]`.
    pub max_coverage_fraction: f64,

    pub quality_measure: QualityMeasureConfig,

    pub refinement: RefinementConfig,

    /// Attributes never used in refinements.
    pub blacklist: Vec<String>,

    pub missing_values: MissingValuePolicy,

    /// Also generate `=` and `!=` constraints for ordered attributes.
    pub ordered_equality: bool,

    /// Worker threads evaluating refinements.
    pub thread_count: ThreadCount,

    pub termination: Option<TerminationConfig>,

    pub target: TargetConfig,

    /// Constraints every subgroup starts from, e.g. `["age >= 30.0"]`.
    pub seed: Vec<String>,

    /// Score by regression influence instead of the target condition.
    pub regression: Option<RegressionConfig>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 1,
            width: 10,
            result_set_size: 100,
            min_coverage: 2,
            max_coverage_fraction: 1.0,
            quality_measure: QualityMeasureConfig::default(),
            refinement: RefinementConfig::default(),
            blacklist: Vec::new(),
            missing_values: MissingValuePolicy::default(),
            ordered_equality: false,
            thread_count: ThreadCount::default(),
            termination: None,
            target: TargetConfig::default(),
            seed: Vec::new(),
            regression: None,
        }
    }
}

impl SearchConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, as YAML when the extension is
    /// `yaml` or `yml` and as TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML/YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_result_set_size(mut self, size: usize) -> Self {
        self.result_set_size = size;
        self
    }

    /// Sets the coverage bounds: absolute minimum and maximum fraction.
    pub fn with_coverage(mut self, min_coverage: u64, max_coverage_fraction: f64) -> Self {
        self.min_coverage = min_coverage;
        self.max_coverage_fraction = max_coverage_fraction;
        self
    }

    pub fn with_quality_measure(mut self, measure: QualityMeasureConfig) -> Self {
        self.quality_measure = measure;
        self
    }

    pub fn with_refinement(mut self, refinement: RefinementConfig) -> Self {
        self.refinement = refinement;
        self
    }

    pub fn with_blacklist<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blacklist = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_missing_values(mut self, policy: MissingValuePolicy) -> Self {
        self.missing_values = policy;
        self
    }

    pub fn with_thread_count(mut self, threads: ThreadCount) -> Self {
        self.thread_count = threads;
        self
    }

    /// Sets the termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the target condition `attribute <comparison> value`.
    pub fn with_target(
        mut self,
        attribute: impl Into<String>,
        value: impl Into<String>,
        comparison: Comparison,
    ) -> Self {
        self.target = TargetConfig {
            attribute: Some(attribute.into()),
            value: value.into(),
            comparison,
        };
        self
    }

    /// Adds a seed constraint.
    pub fn with_seed(mut self, constraint: impl Into<String>) -> Self {
        self.seed.push(constraint.into());
        self
    }

    pub fn with_regression(mut self, regression: RegressionConfig) -> Self {
        self.regression = Some(regression);
        self
    }

    /// Returns the termination time limit, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// The quality floor of the active evaluator.
    pub fn minimum_quality(&self) -> f64 {
        match &self.regression {
            Some(regression) => regression.minimum,
            None => self.quality_measure.minimum(),
        }
    }

    /// Checks that every setting is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: &str| Err(ConfigError::Invalid(message.to_string()));
        if self.depth == 0 {
            return invalid("depth must be at least 1");
        }
        if self.width == 0 {
            return invalid("width must be at least 1");
        }
        if self.result_set_size == 0 {
            return invalid("result_set_size must be at least 1");
        }
        if !(self.max_coverage_fraction > 0.0 && self.max_coverage_fraction <= 1.0) {
            return invalid("max_coverage_fraction must lie in (0, 1]");
        }
        if !self.minimum_quality().is_finite() {
            return invalid("minimum quality must be finite");
        }
        if self.thread_count == ThreadCount::Count(0) {
            return invalid("thread_count must be at least 1");
        }
        if let RefinementConfig::Coverage { target_fraction } = self.refinement {
            if !(0.0..=1.0).contains(&target_fraction) {
                return invalid("refinement target_fraction must lie in [0, 1]");
            }
        }
        if let Some(regression) = &self.regression {
            if regression.x.is_empty() {
                return invalid("regression needs at least one regressor");
            }
        }
        Ok(())
    }
}

/// Available quality measures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityMeasureType {
    /// Weighted relative accuracy.
    #[default]
    Wra,
    Sensitivity,
    Specificity,
    ChiSquared,
}

impl QualityMeasureType {
    /// Floor used when the configuration names none.
    pub fn default_minimum(self) -> f64 {
        match self {
            QualityMeasureType::Wra => 0.02,
            _ => 0.0,
        }
    }
}

/// Quality measure configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QualityMeasureConfig {
    #[serde(rename = "type", default)]
    pub measure_type: QualityMeasureType,

    /// Lowest quality a reported subgroup may have.
    #[serde(default)]
    pub minimum: Option<f64>,
}

impl QualityMeasureConfig {
    pub fn new(measure_type: QualityMeasureType, minimum: f64) -> Self {
        Self {
            measure_type,
            minimum: Some(minimum),
        }
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
            .unwrap_or_else(|| self.measure_type.default_minimum())
    }
}

/// Refinement operator configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RefinementConfig {
    /// Every valid extension.
    Simple,

    /// Skip constraints scoring below the quality floor, best first.
    #[default]
    Quality,

    /// Order extensions by closeness to a coverage fraction.
    Coverage { target_fraction: f64 },
}

/// Worker thread configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadCount {
    /// One thread per available core.
    Auto,

    /// Evaluate on a single thread.
    None,

    /// Specific number of threads.
    Count(usize),
}

impl Default for ThreadCount {
    fn default() -> Self {
        ThreadCount::Count(8)
    }
}

impl ThreadCount {
    /// Number of worker threads to start.
    pub fn resolve(&self) -> usize {
        match self {
            ThreadCount::Auto => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            ThreadCount::None => 1,
            ThreadCount::Count(n) => *n,
        }
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend searching.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum minutes to spend searching.
    pub minutes_spent_limit: Option<u64>,

    /// Stop after this many candidates were evaluated.
    pub candidates_evaluated_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let seconds =
            self.seconds_spent_limit.unwrap_or(0) + self.minutes_spent_limit.unwrap_or(0) * 60;
        if seconds > 0 {
            Some(Duration::from_secs(seconds))
        } else {
            None
        }
    }
}

/// Target condition `attribute <comparison> value`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TargetConfig {
    /// Target attribute; the last attribute when absent.
    pub attribute: Option<String>,
    pub value: String,
    pub comparison: Comparison,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            attribute: None,
            value: "1".to_string(),
            comparison: Comparison::Eq,
        }
    }
}

/// Regression model configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RegressionConfig {
    /// Response attribute.
    pub y: String,

    /// Regressor attributes.
    pub x: Vec<String>,

    /// Lowest influence a reported subgroup may have.
    #[serde(default)]
    pub minimum: f64,
}
