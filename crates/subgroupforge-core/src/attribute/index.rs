//! Sort index over the rows of one attribute.
//!
//! Rows are sorted once by the attribute's value (missing last), and every
//! distinct value owns a contiguous `[start, end)` range of that order. A
//! constraint's covered rows are then a prefix, suffix, or slice of the
//! sorted rows, found by binary search instead of a dataset scan.

use std::ops::Range;

use crate::attribute::Attribute;
use crate::comparison::Comparison;
use crate::value::AttributeValue;
use crate::IndexSet;

/// Position of one distinct value in the sorted row order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRange {
    pub value: AttributeValue,
    pub start: usize,
    pub end: usize,
}

impl ValueRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Read-only sort index of one attribute, built once per dataset load.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeIndex {
    sorted_rows: Vec<u32>,
    ranges: Vec<ValueRange>,
    null_start: Option<usize>,
    missing: IndexSet,
}

impl AttributeIndex {
    /// Sorts the attribute's rows by value and records the value ranges.
    ///
    /// Ties are broken by row number, so rebuilding yields identical output.
    pub fn build(attribute: &Attribute) -> Self {
        let mut sorted_rows: Vec<u32> = (0..attribute.len() as u32).collect();
        sorted_rows.sort_by(|&a, &b| {
            attribute
                .value_at(a as usize)
                .cmp(attribute.value_at(b as usize))
                .then(a.cmp(&b))
        });

        let mut ranges: Vec<ValueRange> = Vec::new();
        let mut null_start = None;
        for (position, &row) in sorted_rows.iter().enumerate() {
            let value = attribute.value_at(row as usize);
            if value.is_missing() {
                null_start = Some(position);
                break;
            }
            match ranges.last_mut() {
                Some(last) if last.value == *value => last.end = position + 1,
                _ => ranges.push(ValueRange {
                    value: value.clone(),
                    start: position,
                    end: position + 1,
                }),
            }
        }

        let missing = match null_start {
            Some(start) => sorted_rows[start..].iter().copied().collect(),
            None => IndexSet::new(),
        };

        Self {
            sorted_rows,
            ranges,
            null_start,
            missing,
        }
    }

    /// Number of rows indexed.
    pub fn len(&self) -> usize {
        self.sorted_rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted_rows.is_empty()
    }

    /// Row numbers in value order, missing rows last.
    pub fn sorted_rows(&self) -> &[u32] {
        &self.sorted_rows
    }

    /// Distinct present values with their ranges, in ascending order.
    pub fn ranges(&self) -> &[ValueRange] {
        &self.ranges
    }

    pub fn distinct_values(&self) -> impl Iterator<Item = &AttributeValue> {
        self.ranges.iter().map(|r| &r.value)
    }

    /// Start of the missing tail, or `None` when no row is missing.
    pub fn null_start(&self) -> Option<usize> {
        self.null_start
    }

    /// Rows whose value is missing.
    pub fn missing_rows(&self) -> &IndexSet {
        &self.missing
    }

    /// Range of an observed value.
    pub fn range_of(&self, value: &AttributeValue) -> Option<&ValueRange> {
        self.ranges
            .binary_search_by(|r| r.value.cmp(value))
            .ok()
            .map(|i| &self.ranges[i])
    }

    /// Rows satisfying `row_value <comparison> value`.
    ///
    /// Missing rows are never matched by a comparison; `include_missing`
    /// unions the whole missing tail into the result.
    pub fn covered_indices(
        &self,
        value: &AttributeValue,
        comparison: Comparison,
        include_missing: bool,
    ) -> IndexSet {
        let present_end = self.null_start.unwrap_or(self.sorted_rows.len());
        let lower = self.position(self.ranges.partition_point(|r| r.value < *value));
        let upper = self.position(self.ranges.partition_point(|r| r.value <= *value));

        let mut covered = match comparison {
            Comparison::Eq => self.collect(lower..upper),
            Comparison::Neq => {
                let mut rows = self.collect(0..lower);
                rows.extend(self.sorted_rows[upper..present_end].iter().copied());
                rows
            }
            Comparison::Lteq => self.collect(0..upper),
            Comparison::Gteq => self.collect(lower..present_end),
        };

        if include_missing {
            covered |= &self.missing;
        }
        covered
    }

    // Sorted-order position where the range at `range_index` begins.
    fn position(&self, range_index: usize) -> usize {
        match self.ranges.get(range_index) {
            Some(range) => range.start,
            None => self.null_start.unwrap_or(self.sorted_rows.len()),
        }
    }

    fn collect(&self, positions: Range<usize>) -> IndexSet {
        self.sorted_rows[positions].iter().copied().collect()
    }
}
