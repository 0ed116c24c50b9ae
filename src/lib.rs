//! `scenariogen` - Deterministic API test scenario synthesis
//!
//! Reads an OpenAPI-style contract, applies a fixed set of test-design
//! strategies to every operation, and renders the resulting scenarios as a
//! Karate feature or a JSON plan. Optional LLM enrichment rewrites rendered
//! scenarios on a best-effort basis.

pub mod cli;
pub mod config;
pub mod contract;
pub mod enrich;
pub mod error;
pub mod generator;
pub mod observability;
pub mod render;
pub mod scenario;
pub mod strategy;
pub mod synth;
pub mod writer;
