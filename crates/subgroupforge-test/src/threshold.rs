//! Datasets where one threshold explains the target.

use subgroupforge_core::{Attribute, Dataset};

/// Ten rows: `x` takes `1..=10`, `b` is true exactly when `x >= 6`,
/// and `noise` alternates between two categories.
pub fn threshold_dataset() -> Dataset {
    let x: Vec<Option<f64>> = (1..=10).map(|v| Some(v as f64)).collect();
    let noise: Vec<Option<&str>> = (1..=10)
        .map(|v| Some(if v % 2 == 0 { "even" } else { "odd" }))
        .collect();
    let b: Vec<Option<bool>> = (1..=10).map(|v| Some(v >= 6)).collect();

    Dataset::new(
        "threshold",
        vec![
            Attribute::numeric("x", &x),
            Attribute::categorical("noise", &noise),
            Attribute::boolean("b", &b),
        ],
    )
    .expect("threshold dataset is well formed")
}

/// Every row holds the same value of `c`.
pub fn single_value_dataset() -> Dataset {
    Dataset::new(
        "constant",
        vec![
            Attribute::categorical("c", &[Some("a"); 4]),
            Attribute::boolean("t", &[Some(true), Some(false), Some(true), Some(false)]),
        ],
    )
    .expect("constant dataset is well formed")
}
