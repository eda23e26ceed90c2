//! Utility functions module
//!
//! Contains helper functions for units formatting and parsing.

pub mod units;

// Re-export commonly used functions
pub use units::{format_bytes, format_duration, format_throughput, parse_bytes};
