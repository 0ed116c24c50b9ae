//! Configuration module
//!
//! Loads and validates the run configuration: contract and output paths,
//! strategy switches, and enrichment settings.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLoader, LoadResult, apply_env, finalize};
pub use schema::*;
pub use validation::{ValidationResult, Validator};
