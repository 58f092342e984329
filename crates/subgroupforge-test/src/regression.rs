//! A linear relation with one deviating region.

use subgroupforge_core::{Attribute, Dataset};

/// Forty rows where `y = 2x + 1` except when `group = "odd"`, where
/// `y = -3x + 40`. `group` is the attribute that explains the deviation.
pub fn regression_dataset() -> Dataset {
    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut group = Vec::new();
    for row in 0..40 {
        let xv = (row % 20) as f64;
        let odd = row >= 30;
        x.push(Some(xv));
        y.push(Some(if odd { -3.0 * xv + 40.0 } else { 2.0 * xv + 1.0 + 0.1 * (row % 3) as f64 }));
        group.push(Some(if odd { "odd" } else { "plain" }));
    }

    Dataset::new(
        "regression",
        vec![
            Attribute::numeric("x", &x),
            Attribute::categorical("group", &group),
            Attribute::numeric("y", &y),
        ],
    )
    .expect("regression dataset is well formed")
}
