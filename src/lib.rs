//! dirspeed - directory throughput benchmark
//!
//! Measures storage bandwidth by writing and reading synthetic files of
//! varying sizes and counts inside a target directory. The core exposes a
//! callback/event interface so any front end (CLI, TUI, web) can render
//! progress without the engine depending on a presentation toolkit.

use std::fmt;
use std::path::PathBuf;

// Public re-exports
pub mod bench;
pub mod cleanup;
pub mod config;
pub mod models;
pub mod plan;
pub mod report;
pub mod space;
pub mod util;

// Common error types
#[derive(Debug)]
pub enum DirSpeedError {
    /// I/O operation failed
    Io(std::io::Error),
    /// Target directory missing, not a directory, or its volume unqueryable
    Filesystem(String),
    /// Preflight free-space check failed
    InsufficientSpace {
        /// Space the run needs, in MB
        required_mb: u64,
        /// Space actually available, in MB
        available_mb: u64,
    },
    /// A single test case's I/O failed mid-run
    Benchmark {
        /// What went wrong
        cause: String,
        /// Files fully written before the failure
        partial_files_written: u32,
    },
    /// A generated artifact could not be removed
    Cleanup { path: PathBuf, cause: String },
    /// Configuration validation or parsing error
    Config(String),
    /// Run was cancelled cooperatively
    Cancelled,
}

impl fmt::Display for DirSpeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirSpeedError::Io(err) => write!(f, "I/O error: {}", err),
            DirSpeedError::Filesystem(msg) => write!(f, "Filesystem error: {}", msg),
            DirSpeedError::InsufficientSpace {
                required_mb,
                available_mb,
            } => write!(
                f,
                "Insufficient disk space: {} MB required, {} MB available",
                required_mb, available_mb
            ),
            DirSpeedError::Benchmark {
                cause,
                partial_files_written,
            } => write!(
                f,
                "Benchmark error after {} file(s): {}",
                partial_files_written, cause
            ),
            DirSpeedError::Cleanup { path, cause } => {
                write!(f, "Cleanup error for {}: {}", path.display(), cause)
            }
            DirSpeedError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DirSpeedError::Cancelled => write!(f, "Run cancelled"),
        }
    }
}

impl std::error::Error for DirSpeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirSpeedError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DirSpeedError {
    fn from(err: std::io::Error) -> Self {
        DirSpeedError::Io(err)
    }
}

impl From<serde_json::Error> for DirSpeedError {
    fn from(err: serde_json::Error) -> Self {
        DirSpeedError::Config(format!("JSON serialization error: {}", err))
    }
}

impl From<toml::de::Error> for DirSpeedError {
    fn from(err: toml::de::Error) -> Self {
        DirSpeedError::Config(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for DirSpeedError {
    fn from(err: toml::ser::Error) -> Self {
        DirSpeedError::Config(format!("TOML serialization error: {}", err))
    }
}

/// Result type alias for dirspeed operations
pub type Result<T> = std::result::Result<T, DirSpeedError>;

// Common constants
pub const APP_NAME: &str = "dirspeed";
pub const CONFIG_FILE: &str = "dirspeed.toml";
pub const RESULTS_FILE: &str = "results.json";
/// Prefix shared by every generated artifact (`test_{index}_{sizeMB}MB.bin`)
pub const ARTIFACT_PREFIX: &str = "test_";
/// Extension shared by every generated artifact
pub const ARTIFACT_EXT: &str = ".bin";
/// Free space required before a run may start, in MB
pub const DEFAULT_REQUIRED_SPACE_MB: u64 = 1024;
pub const MAX_RESULTS_HISTORY: usize = 100;

/// Bytes per megabyte as used throughout the crate (1 MiB)
pub const BYTES_PER_MB: u64 = 1_048_576;
