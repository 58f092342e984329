//! SubgroupForge - beam-search subgroup discovery in Rust
//!
//! Load an ARFF dataset, describe the search in a [`SearchConfig`] and run
//! it through [`Discovery`].
//!
//! # Example
//!
//! ```rust
//! use subgroupforge::prelude::*;
//!
//! let data = load_arff_str(
//!     "@relation r\n\
//!      @attribute x numeric\n\
//!      @attribute y {0,1}\n\
//!      @data\n1,0\n2,0\n3,1\n4,1\n",
//!     &LoadOptions::default(),
//! )
//! .unwrap();
//!
//! let config = SearchConfig::new()
//!     .with_target("y", "1", Comparison::Eq)
//!     .with_thread_count(ThreadCount::None);
//! let outcome = Discovery::new(config).run(&data).unwrap();
//! assert_eq!(outcome.best().unwrap().coverage(), 2);
//! ```

// Data model
pub use subgroupforge_core::{
    Attribute, AttributeType, AttributeValue, Comparison, ConstraintCatalog, Dataset, Group,
    MissingDirection, MissingValuePolicy, Result, SubgroupError,
};

// Evaluation
pub use subgroupforge_scoring::{ConfusionMatrix, Evaluation, RegressionEvaluation};

// Configuration
pub use subgroupforge_config::{
    ConfigError, QualityMeasureConfig, QualityMeasureType, RefinementConfig, RegressionConfig,
    SearchConfig, TargetConfig, TerminationConfig, ThreadCount,
};

// Search results and progress
pub use subgroupforge_search::{LevelReport, SearchEvent, SearchOutcome, SearchStatistics, Subgroup};

mod discovery;
mod loader;

pub use discovery::Discovery;
pub use loader::{load_arff_file, load_arff_str, LoadOptions};

#[cfg(feature = "console")]
pub use subgroupforge_console as console;

pub mod prelude {
    pub use super::{load_arff_file, load_arff_str, Discovery, LoadOptions};
    pub use super::{Comparison, Dataset, SearchConfig, SearchOutcome, ThreadCount};
}
