//! Shared test datasets for SubgroupForge crates.
//!
//! - [`threshold`] - a numeric attribute that separates a boolean target exactly
//! - [`mixed`] - every attribute type, with missing values
//! - [`regression`] - a linear relation with one deviating region
//! - [`random`] - seeded random datasets for property-style tests
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! subgroupforge-test = { workspace = true }
//! ```

pub mod mixed;
pub mod random;
pub mod regression;
pub mod threshold;

pub use mixed::mixed_dataset;
pub use random::random_dataset;
pub use regression::regression_dataset;
pub use threshold::{single_value_dataset, threshold_dataset};
