//! SubgroupForge Core - data model for subgroup discovery
//!
//! This crate provides the read-only structures the search runs over:
//! - Typed attribute values and attributes
//! - Per-attribute sort indexes that turn a constraint into covered rows
//! - Prime-based constraint identities and the constraint catalog
//! - Subgroups (conjunctions of constraints) with arithmetic signatures

pub mod attribute;
pub mod catalog;
pub mod comparison;
pub mod constraint;
pub mod dataset;
pub mod error;
pub mod group;
pub mod prime;
pub mod value;

pub use attribute::{Attribute, AttributeIndex, AttributeType, ValueRange};
pub use catalog::{CatalogOptions, ConstraintCatalog};
pub use comparison::Comparison;
pub use constraint::{Constraint, MissingDirection, MissingValuePolicy};
pub use dataset::{Dataset, Target};
pub use error::{Result, SubgroupError};
pub use group::{Group, Signature};
pub use prime::PrimeAllocator;
pub use value::AttributeValue;

/// Set of row indices covered by a constraint or subgroup.
pub type IndexSet = roaring::RoaringBitmap;
