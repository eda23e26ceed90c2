//! Data models module
//!
//! Contains phase results, per-case reports, and the run summary handed to
//! front ends and the results history.

pub mod result;

// Re-export commonly used types
pub use result::{CaseReport, CaseStatus, Phase, PhaseResult, RunSummary};
