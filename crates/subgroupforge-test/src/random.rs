//! Seeded random datasets.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use subgroupforge_core::{Attribute, Dataset};

/// `rows` rows of `numeric` integer-valued numeric attributes in `0..10`,
/// one categorical attribute `cat` and a boolean target `t`.
///
/// Roughly one numeric cell in twenty is missing. The same seed always
/// produces the same dataset.
pub fn random_dataset(seed: u64, rows: usize, numeric: usize) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut attributes = Vec::with_capacity(numeric + 2);

    for column in 0..numeric {
        let values: Vec<Option<f64>> = (0..rows)
            .map(|_| {
                if rng.random_bool(0.05) {
                    None
                } else {
                    Some(rng.random_range(0..10) as f64)
                }
            })
            .collect();
        attributes.push(Attribute::numeric(format!("n{column}"), &values));
    }

    let categories = ["a", "b", "c"];
    let cat: Vec<Option<&str>> = (0..rows)
        .map(|_| Some(categories[rng.random_range(0..categories.len())]))
        .collect();
    attributes.push(Attribute::categorical("cat", &cat));

    let target: Vec<Option<bool>> = (0..rows).map(|_| Some(rng.random_bool(0.4))).collect();
    attributes.push(Attribute::boolean("t", &target));

    Dataset::new(format!("random-{seed}"), attributes).expect("random dataset is well formed")
}
