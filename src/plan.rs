//! Test planning
//!
//! Produces the ordered list of test cases a run executes and owns the
//! artifact naming convention shared with cleanup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{DirSpeedError, Result, ARTIFACT_EXT, ARTIFACT_PREFIX, BYTES_PER_MB};

/// One write+read benchmark unit: a file size and a file count.
///
/// Immutable once planned; the label identifies the case in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Human-readable case name, unique within a plan
    pub label: String,
    /// Size of each file in MB
    pub file_size_mb: u64,
    /// Number of files written and read back
    pub file_count: u32,
}

impl TestCase {
    /// Create a single-file case
    pub fn single(size_mb: u64) -> Self {
        Self {
            label: format!("Single {}MB File", size_mb),
            file_size_mb: size_mb,
            file_count: 1,
        }
    }

    /// Create a multi-file case
    pub fn multi(size_mb: u64, count: u32) -> Self {
        Self {
            label: format!("{} × {}MB Files", count, size_mb),
            file_size_mb: size_mb,
            file_count: count,
        }
    }

    /// Total bytes moved per phase
    pub fn total_bytes(&self) -> u64 {
        self.file_size_mb * self.file_count as u64 * BYTES_PER_MB
    }

    /// Total megabytes moved per phase
    pub fn total_mb(&self) -> u64 {
        self.file_size_mb * self.file_count as u64
    }

    /// Path of the `index`-th artifact for this case inside `dir`
    pub fn artifact_path(&self, dir: &Path, index: u32) -> PathBuf {
        dir.join(artifact_name(index, self.file_size_mb))
    }

    /// Reject degenerate cases: every case must move at least one byte per
    /// phase, otherwise a phase would produce a result with zero total bytes.
    pub fn validate(&self) -> Result<()> {
        if self.file_size_mb == 0 {
            return Err(DirSpeedError::Config(format!(
                "case '{}' has a file size of 0 MB",
                self.label
            )));
        }
        if self.file_count == 0 {
            return Err(DirSpeedError::Config(format!(
                "case '{}' has a file count of 0",
                self.label
            )));
        }
        Ok(())
    }
}

/// Name of an artifact: `test_{index}_{sizeMB}MB.bin`.
///
/// Stable across process restarts so cleanup can recognize artifacts left by
/// a crashed run. Cases with the same per-file size reuse names; runs are
/// strictly sequential so the reuse cannot collide mid-measurement.
pub fn artifact_name(index: u32, size_mb: u64) -> String {
    format!("{}{}_{}MB{}", ARTIFACT_PREFIX, index, size_mb, ARTIFACT_EXT)
}

/// Check whether a file name matches the artifact convention.
///
/// This is the defensive-scan pattern cleanup uses when the in-memory list of
/// generated paths is incomplete (e.g. after a crash).
pub fn is_artifact_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix(ARTIFACT_PREFIX) else {
        return false;
    };
    let Some(rest) = rest.strip_suffix(ARTIFACT_EXT) else {
        return false;
    };
    // Remaining shape: {index}_{size}MB
    let Some((index, size)) = rest.split_once('_') else {
        return false;
    };
    let Some(size) = size.strip_suffix("MB") else {
        return false;
    };
    !index.is_empty()
        && !size.is_empty()
        && index.bytes().all(|b| b.is_ascii_digit())
        && size.bytes().all(|b| b.is_ascii_digit())
}

/// Produce the default ordered test plan.
///
/// Deterministic and pure: single-file cases at 1, 100, and 1024 MB, then
/// multi-file batches of 1 MB files at counts 10, 20, 100, and 1000. The
/// order is the execution and reporting order and is stable across runs so
/// results stay comparable.
pub fn plan() -> Vec<TestCase> {
    let mut cases = Vec::new();

    for size_mb in [1, 100, 1024] {
        cases.push(TestCase::single(size_mb));
    }

    for count in [10, 20, 100, 1000] {
        cases.push(TestCase::multi(1, count));
    }

    cases
}
