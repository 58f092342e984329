//! Error types for SubgroupForge

use thiserror::Error;

use crate::comparison::Comparison;

/// Main error type for SubgroupForge operations
#[derive(Debug, Error)]
pub enum SubgroupError {
    /// No attribute with the given name exists in the dataset
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// A constraint string did not match any generated constraint
    #[error(
        "Unknown constraint `{constraint}`: attribute {attribute} only supports {}",
        format_comparisons(.supported)
    )]
    UnknownConstraint {
        constraint: String,
        attribute: String,
        supported: Vec<Comparison>,
    },

    /// The comparison cannot be applied to the attribute's type
    #[error(
        "Comparison {comparison} is not supported by attribute {attribute} (supported: {})",
        format_comparisons(.supported)
    )]
    UnsupportedComparison {
        attribute: String,
        comparison: Comparison,
        supported: Vec<Comparison>,
    },

    /// A raw value could not be converted to the attribute's type
    #[error("Invalid value `{value}` for attribute {attribute}: {reason}")]
    InvalidValue {
        attribute: String,
        value: String,
        reason: String,
    },

    /// A typed value does not belong to the attribute's type
    #[error("Attribute {attribute} holds {found} at row {row}, expected {expected}")]
    TypeMismatch {
        attribute: String,
        row: usize,
        expected: String,
        found: String,
    },

    /// Attributes of one dataset must describe the same rows
    #[error("Attribute {attribute} has {found} rows, expected {expected}")]
    LengthMismatch {
        attribute: String,
        expected: usize,
        found: usize,
    },

    /// Row indices are stored as u32
    #[error("Dataset has {0} rows, at most {max} are supported", max = u32::MAX)]
    TooManyRows(usize),

    /// Signature arithmetic would exceed the u128 identity space
    #[error("Subgroup signature overflow: {constraints} constraints exceed the safe bound of {bound}")]
    SignatureOverflow { constraints: usize, bound: usize },

    /// One extension's signature product does not fit in u128
    #[error("Subgroup signature overflow: adding `{constraint}` to `{group}` exceeds the u128 identity space")]
    SignatureProductOverflow { group: String, constraint: String },

    /// The least-squares design matrix cannot be inverted
    #[error("Degenerate regression design: {rows} rows for {parameters} parameters ({reason})")]
    DegenerateDesign {
        rows: usize,
        parameters: usize,
        reason: String,
    },

    /// Regression requires numeric attributes
    #[error("Attribute {0} is not numeric")]
    NonNumericAttribute(String),

    /// Search settings out of range
    #[error("Invalid search settings: {0}")]
    InvalidSettings(String),

    /// Worker pool construction failed
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Dataset text could not be parsed
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// I/O failure while loading a dataset
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_comparisons(comparisons: &[Comparison]) -> String {
    let names: Vec<String> = comparisons.iter().map(|c| c.name().to_string()).collect();
    format!("{{{}}}", names.join(","))
}

/// Result type alias for SubgroupForge operations
pub type Result<T> = std::result::Result<T, SubgroupError>;
