//! Typed dataset columns and their sort indexes.

mod index;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::comparison::Comparison;
use crate::error::{Result, SubgroupError};
use crate::value::AttributeValue;

pub use index::{AttributeIndex, ValueRange};

/// Accepted textual timestamp layouts, tried in order.
const DATE_LAYOUTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// The type of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    Numeric,
    Boolean,
    Categorical,
    Date,
    Identifier,
}

impl AttributeType {
    pub fn name(self) -> &'static str {
        match self {
            AttributeType::Numeric => "numeric",
            AttributeType::Boolean => "boolean",
            AttributeType::Categorical => "categorical",
            AttributeType::Date => "date",
            AttributeType::Identifier => "identifier",
        }
    }

    /// Whether values of this type carry a meaningful `<=`/`>=` order.
    pub fn is_ordered(self) -> bool {
        matches!(
            self,
            AttributeType::Numeric | AttributeType::Date | AttributeType::Identifier
        )
    }

    /// Comparisons used to generate refinement constraints.
    ///
    /// Ordered types get `LTEQ`/`GTEQ`, plus `EQ`/`NEQ` when
    /// `ordered_equality` is set. Unordered types get `EQ`/`NEQ`.
    pub fn comparisons(self, ordered_equality: bool) -> Vec<Comparison> {
        if !self.is_ordered() {
            return vec![Comparison::Eq, Comparison::Neq];
        }
        let mut comparisons = Vec::with_capacity(4);
        if ordered_equality {
            comparisons.extend([Comparison::Eq, Comparison::Neq]);
        }
        comparisons.extend([Comparison::Lteq, Comparison::Gteq]);
        comparisons
    }

    /// Every comparison the type can evaluate, regardless of generation options.
    pub fn supports(self, comparison: Comparison) -> bool {
        self.is_ordered() || matches!(comparison, Comparison::Eq | Comparison::Neq)
    }

    /// Converts raw text into a value of this type. `?` denotes a missing value.
    pub fn parse_value(self, raw: &str) -> std::result::Result<AttributeValue, String> {
        let raw = raw.trim();
        if raw == "?" {
            return Ok(AttributeValue::Missing);
        }
        let unquoted = strip_quotes(raw);
        match self {
            AttributeType::Numeric => match unquoted.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(AttributeValue::Numeric(v)),
                Ok(_) => Err("non-finite number".to_string()),
                Err(e) => Err(e.to_string()),
            },
            AttributeType::Boolean => match unquoted.to_ascii_lowercase().as_str() {
                "1" | "true" => Ok(AttributeValue::Boolean(true)),
                "0" | "false" => Ok(AttributeValue::Boolean(false)),
                _ => Err("expected one of 0, 1, true, false".to_string()),
            },
            AttributeType::Categorical => Ok(AttributeValue::Category(unquoted.to_string())),
            AttributeType::Date => parse_date(unquoted).map(AttributeValue::Date),
            AttributeType::Identifier => Uuid::parse_str(unquoted)
                .map(AttributeValue::Identifier)
                .map_err(|e| e.to_string()),
        }
    }
}

fn strip_quotes(raw: &str) -> &str {
    raw.strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(raw)
}

/// Parses a timestamp in one of the supported layouts, or a bare date.
pub fn parse_date(raw: &str) -> std::result::Result<NaiveDateTime, String> {
    for layout in DATE_LAYOUTS {
        if let Ok(date) = NaiveDateTime::parse_from_str(raw, layout) {
            return Ok(date);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("`{}` is not a timestamp", raw))
}

/// A named, typed column of the dataset.
#[derive(Debug, Clone)]
pub struct Attribute {
    name: String,
    kind: AttributeType,
    values: Vec<AttributeValue>,
}

impl Attribute {
    /// Creates an attribute, checking every value against `kind`.
    pub fn new(
        name: impl Into<String>,
        kind: AttributeType,
        values: Vec<AttributeValue>,
    ) -> Result<Self> {
        let name = name.into();
        for (row, value) in values.iter().enumerate() {
            if let Some(found) = value.attribute_type() {
                if found != kind {
                    return Err(SubgroupError::TypeMismatch {
                        attribute: name,
                        row,
                        expected: kind.name().to_string(),
                        found: found.name().to_string(),
                    });
                }
            }
        }
        Ok(Self { name, kind, values })
    }

    /// Creates an attribute by parsing raw cell text.
    pub fn from_raw<S: AsRef<str>>(
        name: impl Into<String>,
        kind: AttributeType,
        raw: &[S],
    ) -> Result<Self> {
        let name = name.into();
        let values = raw
            .iter()
            .map(|cell| parse_cell(&name, kind, cell.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { name, kind, values })
    }

    /// Numeric column; `None` is missing.
    pub fn numeric(name: impl Into<String>, values: &[Option<f64>]) -> Self {
        Self {
            name: name.into(),
            kind: AttributeType::Numeric,
            values: values
                .iter()
                .map(|v| v.map_or(AttributeValue::Missing, AttributeValue::Numeric))
                .collect(),
        }
    }

    /// Boolean column; `None` is missing.
    pub fn boolean(name: impl Into<String>, values: &[Option<bool>]) -> Self {
        Self {
            name: name.into(),
            kind: AttributeType::Boolean,
            values: values
                .iter()
                .map(|v| v.map_or(AttributeValue::Missing, AttributeValue::Boolean))
                .collect(),
        }
    }

    /// Categorical column; `None` is missing.
    pub fn categorical(name: impl Into<String>, values: &[Option<&str>]) -> Self {
        Self {
            name: name.into(),
            kind: AttributeType::Categorical,
            values: values
                .iter()
                .map(|v| v.map_or(AttributeValue::Missing, |s| AttributeValue::Category(s.to_string())))
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AttributeType {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value_at(&self, row: usize) -> &AttributeValue {
        &self.values[row]
    }

    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    /// Parses raw text as a value of this attribute.
    pub fn parse(&self, raw: &str) -> Result<AttributeValue> {
        parse_cell(&self.name, self.kind, raw)
    }
}

fn parse_cell(name: &str, kind: AttributeType, raw: &str) -> Result<AttributeValue> {
    kind.parse_value(raw)
        .map_err(|reason| SubgroupError::InvalidValue {
            attribute: name.to_string(),
            value: raw.to_string(),
            reason,
        })
}
