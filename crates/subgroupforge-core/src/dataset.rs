//! The dataset and the target condition.

use std::collections::HashMap;

use tracing::warn;

use crate::attribute::{Attribute, AttributeIndex};
use crate::comparison::Comparison;
use crate::error::{Result, SubgroupError};
use crate::value::AttributeValue;
use crate::IndexSet;

/// Typed attributes over a fixed number of rows, indexed once at load time.
#[derive(Debug, Clone)]
pub struct Dataset {
    relation: String,
    attributes: Vec<Attribute>,
    indexes: Vec<AttributeIndex>,
    by_name: HashMap<String, usize>,
    row_count: usize,
}

impl Dataset {
    /// Creates a dataset and builds one sort index per attribute.
    pub fn new(relation: impl Into<String>, attributes: Vec<Attribute>) -> Result<Self> {
        let row_count = attributes.first().map_or(0, Attribute::len);
        if row_count > u32::MAX as usize {
            return Err(SubgroupError::TooManyRows(row_count));
        }
        for attribute in &attributes {
            if attribute.len() != row_count {
                return Err(SubgroupError::LengthMismatch {
                    attribute: attribute.name().to_string(),
                    expected: row_count,
                    found: attribute.len(),
                });
            }
        }

        let indexes = attributes.iter().map(AttributeIndex::build).collect();
        let by_name = attributes
            .iter()
            .enumerate()
            .map(|(id, a)| (a.name().to_string(), id))
            .collect();

        Ok(Self {
            relation: relation.into(),
            attributes,
            indexes,
            by_name,
            row_count,
        })
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, id: usize) -> &Attribute {
        &self.attributes[id]
    }

    pub fn attribute_id(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn index(&self, id: usize) -> &AttributeIndex {
        &self.indexes[id]
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn all_rows(&self) -> IndexSet {
        let mut rows = IndexSet::new();
        rows.insert_range(0..self.row_count as u32);
        rows
    }

    /// Resolves the target condition `attribute <comparison> value`.
    ///
    /// Without an attribute name the last attribute is used.
    pub fn resolve_target(
        &self,
        attribute: Option<&str>,
        value: &str,
        comparison: Comparison,
    ) -> Result<Target> {
        let id = match attribute {
            Some(name) => self
                .attribute_id(name)
                .ok_or_else(|| SubgroupError::UnknownAttribute(name.to_string()))?,
            None => {
                let id = self
                    .attributes
                    .len()
                    .checked_sub(1)
                    .ok_or_else(|| SubgroupError::InvalidSettings("dataset has no attributes".to_string()))?;
                warn!(
                    event = "target_fallback",
                    attribute = self.attributes[id].name(),
                    "No target attribute given, using the last attribute"
                );
                id
            }
        };

        let target = &self.attributes[id];
        if !target.kind().supports(comparison) {
            return Err(SubgroupError::UnsupportedComparison {
                attribute: target.name().to_string(),
                comparison,
                supported: Comparison::ALL
                    .into_iter()
                    .filter(|c| target.kind().supports(*c))
                    .collect(),
            });
        }
        let value = target.parse(value)?;
        let positives = self.indexes[id].covered_indices(&value, comparison, false);

        Ok(Target {
            attribute: id,
            value,
            comparison,
            positives,
            row_count: self.row_count as u64,
        })
    }
}

/// Rows matching the target condition.
#[derive(Debug, Clone)]
pub struct Target {
    pub attribute: usize,
    pub value: AttributeValue,
    pub comparison: Comparison,
    positives: IndexSet,
    row_count: u64,
}

impl Target {
    pub fn positives(&self) -> &IndexSet {
        &self.positives
    }

    /// `P`: rows satisfying the target condition.
    pub fn positive_count(&self) -> u64 {
        self.positives.len()
    }

    /// `N`: every other row.
    pub fn negative_count(&self) -> u64 {
        self.row_count - self.positives.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::new(
            "test",
            vec![
                Attribute::numeric("x", &[Some(1.0), Some(2.0), Some(3.0), None]),
                Attribute::boolean("b", &[Some(false), Some(true), Some(true), Some(false)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_length_mismatch() {
        let err = Dataset::new(
            "bad",
            vec![
                Attribute::numeric("x", &[Some(1.0)]),
                Attribute::numeric("y", &[Some(1.0), Some(2.0)]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, SubgroupError::LengthMismatch { expected: 1, found: 2, .. }));
    }

    #[test]
    fn test_resolve_named_target() {
        let data = dataset();
        let target = data.resolve_target(Some("b"), "true", Comparison::Eq).unwrap();
        assert_eq!(target.attribute, 1);
        assert_eq!(target.positive_count(), 2);
        assert_eq!(target.negative_count(), 2);
    }

    #[test]
    fn test_target_falls_back_to_last_attribute() {
        let data = dataset();
        let target = data.resolve_target(None, "1", Comparison::Eq).unwrap();
        assert_eq!(target.attribute, 1);
    }

    #[test]
    fn test_unknown_target_attribute() {
        let err = dataset()
            .resolve_target(Some("missing"), "1", Comparison::Eq)
            .unwrap_err();
        assert!(matches!(err, SubgroupError::UnknownAttribute(name) if name == "missing"));
    }

    #[test]
    fn test_ordered_target_comparison_on_boolean_fails() {
        let err = dataset()
            .resolve_target(Some("b"), "1", Comparison::Gteq)
            .unwrap_err();
        assert!(err.to_string().contains("{EQ,NEQ}"));
    }

    #[test]
    fn test_all_rows() {
        assert_eq!(dataset().all_rows().len(), 4);
    }
}
