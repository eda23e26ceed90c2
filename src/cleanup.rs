//! Artifact cleanup
//!
//! Removes every file a run generated, independent of how the run went.
//! Deletion is best-effort: each failure is recorded individually and never
//! aborts the remaining deletions, so the report always says which files
//! survived.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::plan::is_artifact_name;

/// One artifact that could not be removed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupFailure {
    pub path: PathBuf,
    pub cause: String,
}

/// What cleanup did and what it left behind
#[derive(Debug, Clone, Default)]
pub struct CleanupReport {
    /// Paths successfully deleted
    pub removed: Vec<PathBuf>,
    /// Per-file deletion failures
    pub errors: Vec<CleanupFailure>,
    /// Artifacts still present after cleanup; should be empty
    pub leftovers: Vec<PathBuf>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.leftovers.is_empty()
    }
}

/// Delete every known artifact that still exists, then defensively scan
/// `dir` for anything matching the artifact naming convention in case the
/// known set is incomplete (e.g. after a crash of a previous run).
pub fn cleanup(dir: &Path, known_paths: &BTreeSet<PathBuf>) -> CleanupReport {
    let mut report = CleanupReport::default();

    for path in known_paths {
        remove_one(path, &mut report);
    }

    // Secondary scan for artifacts the known set missed. A scan failure is
    // itself recorded rather than propagated; cleanup never throws away
    // visibility into what remains. Paths already handled above, removed or
    // failed, are not retried.
    match scan_artifacts(dir) {
        Ok(stray) => {
            for path in stray {
                if !report.removed.contains(&path)
                    && !report.errors.iter().any(|e| e.path == path)
                {
                    remove_one(&path, &mut report);
                }
            }
        }
        Err(err) => report.errors.push(CleanupFailure {
            path: dir.to_path_buf(),
            cause: format!("directory scan failed: {}", err),
        }),
    }

    report.leftovers = scan_artifacts(dir).unwrap_or_default();
    report
}

fn remove_one(path: &Path, report: &mut CleanupReport) {
    if !path.exists() {
        return;
    }
    match fs::remove_file(path) {
        Ok(()) => report.removed.push(path.to_path_buf()),
        Err(err) => report.errors.push(CleanupFailure {
            path: path.to_path_buf(),
            cause: err.to_string(),
        }),
    }
}

/// List files in `dir` whose names match the artifact convention
fn scan_artifacts(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if is_artifact_name(name) && entry.path().is_file() {
            found.push(entry.path());
        }
    }
    found.sort();
    Ok(found)
}
