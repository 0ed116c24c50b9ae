//! Observability module
//!
//! Logging setup for `scenariogen` runs.

pub mod logging;

pub use logging::{LogFormat, init_logging};
