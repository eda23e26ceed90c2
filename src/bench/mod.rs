//! Benchmark engine module
//!
//! Contains the per-case write/read measurement and the run orchestrator
//! that sequences cases, isolates failures, and always cleans up.

pub mod case;
pub mod runner;

// Re-export commonly used types
pub use case::IoBenchmark;
pub use runner::{CancelToken, RunContext, Runner};
