//! Typed attribute values.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::attribute::AttributeType;

/// Timestamp format used when displaying date values.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A single cell of the dataset.
///
/// Values order totally within their own type (numerics by `f64::total_cmp`),
/// and `Missing` sorts after every present value.
#[derive(Debug, Clone)]
pub enum AttributeValue {
    Numeric(f64),
    Boolean(bool),
    Category(String),
    Date(NaiveDateTime),
    Identifier(Uuid),
    Missing,
}

impl AttributeValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, AttributeValue::Missing)
    }

    /// Returns the numeric payload, if any.
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            AttributeValue::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the attribute type this value belongs to, or `None` for `Missing`.
    pub fn attribute_type(&self) -> Option<AttributeType> {
        match self {
            AttributeValue::Numeric(_) => Some(AttributeType::Numeric),
            AttributeValue::Boolean(_) => Some(AttributeType::Boolean),
            AttributeValue::Category(_) => Some(AttributeType::Categorical),
            AttributeValue::Date(_) => Some(AttributeType::Date),
            AttributeValue::Identifier(_) => Some(AttributeType::Identifier),
            AttributeValue::Missing => None,
        }
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        self.attribute_type().map_or("missing", AttributeType::name)
    }

    fn rank(&self) -> u8 {
        match self {
            AttributeValue::Numeric(_) => 0,
            AttributeValue::Boolean(_) => 1,
            AttributeValue::Category(_) => 2,
            AttributeValue::Date(_) => 3,
            AttributeValue::Identifier(_) => 4,
            AttributeValue::Missing => 5,
        }
    }
}

impl Ord for AttributeValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use AttributeValue::*;
        match (self, other) {
            (Numeric(a), Numeric(b)) => a.total_cmp(b),
            (Boolean(a), Boolean(b)) => a.cmp(b),
            (Category(a), Category(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            (Identifier(a), Identifier(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for AttributeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AttributeValue {}

impl Hash for AttributeValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            AttributeValue::Numeric(v) => v.to_bits().hash(state),
            AttributeValue::Boolean(v) => v.hash(state),
            AttributeValue::Category(v) => v.hash(state),
            AttributeValue::Date(v) => v.hash(state),
            AttributeValue::Identifier(v) => v.hash(state),
            AttributeValue::Missing => {}
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Integral values keep one decimal so `x >= 3.0` round-trips.
            AttributeValue::Numeric(v) if v.is_finite() && v.fract() == 0.0 => {
                write!(f, "{:.1}", v)
            }
            AttributeValue::Numeric(v) => write!(f, "{}", v),
            AttributeValue::Boolean(v) => write!(f, "{}", v),
            AttributeValue::Category(v) => f.write_str(v),
            AttributeValue::Date(v) => write!(f, "{}", v.format(DATE_FORMAT)),
            AttributeValue::Identifier(v) => write!(f, "{}", v),
            AttributeValue::Missing => f.write_str("?"),
        }
    }
}
