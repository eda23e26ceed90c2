//! Results persistence module
//!
//! Handles saving, loading, and rotation of run summaries.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::models::RunSummary;
use crate::{DirSpeedError, Result, APP_NAME, MAX_RESULTS_HISTORY, RESULTS_FILE};

/// Results storage manager
#[derive(Debug)]
pub struct ResultsStorage {
    results_path: PathBuf,
}

/// Results file structure for JSON persistence
#[derive(Debug, Serialize, Deserialize)]
struct ResultsFile {
    version: u32,
    runs: Vec<RunSummary>,
}

impl Default for ResultsFile {
    fn default() -> Self {
        Self {
            version: 1,
            runs: Vec::new(),
        }
    }
}

impl ResultsStorage {
    /// Create a storage manager at the standard results location
    pub fn new() -> Result<Self> {
        let results_path = Self::results_file_path()?;
        Ok(Self { results_path })
    }

    /// Create a storage manager at an explicit path (used by tests)
    pub fn at_path(results_path: PathBuf) -> Self {
        Self { results_path }
    }

    /// Get the standard results file path
    /// Uses $DATA_HOME/dirspeed/results.json
    pub fn results_file_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir().ok_or_else(|| {
            DirSpeedError::Config("Unable to determine data directory".to_string())
        })?;

        Ok(data_dir.join(APP_NAME).join(RESULTS_FILE))
    }

    /// Load all stored run summaries
    pub fn load_runs(&self) -> Result<Vec<RunSummary>> {
        if !self.results_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.results_path).map_err(|e| {
            DirSpeedError::Config(format!(
                "Failed to read results file {}: {}",
                self.results_path.display(),
                e
            ))
        })?;

        let results_file: ResultsFile = serde_json::from_str(&content).map_err(|e| {
            DirSpeedError::Config(format!(
                "Failed to parse results file {}: {}",
                self.results_path.display(),
                e
            ))
        })?;

        Ok(results_file.runs)
    }

    /// Append a run summary, rotating out the oldest entries beyond
    /// `MAX_RESULTS_HISTORY`.
    pub fn append_run(&self, summary: RunSummary) -> Result<()> {
        let mut runs = self.load_runs()?;

        runs.push(summary);

        if runs.len() > MAX_RESULTS_HISTORY {
            let skip_count = runs.len() - MAX_RESULTS_HISTORY;
            runs = runs.into_iter().skip(skip_count).collect();
        }

        self.save_runs(runs)
    }

    fn save_runs(&self, runs: Vec<RunSummary>) -> Result<()> {
        if let Some(parent) = self.results_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DirSpeedError::Config(format!(
                    "Failed to create results directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let results_file = ResultsFile { version: 1, runs };

        let content = serde_json::to_string_pretty(&results_file)
            .map_err(|e| DirSpeedError::Config(format!("Failed to serialize results: {}", e)))?;

        fs::write(&self.results_path, content).map_err(|e| {
            DirSpeedError::Config(format!(
                "Failed to write results file {}: {}",
                self.results_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Get the most recent N run summaries
    pub fn recent_runs(&self, count: usize) -> Result<Vec<RunSummary>> {
        let runs = self.load_runs()?;

        if runs.len() <= count {
            Ok(runs)
        } else {
            let skip_count = runs.len() - count;
            Ok(runs.into_iter().skip(skip_count).collect())
        }
    }

    /// Remove the results file entirely
    pub fn clear(&self) -> Result<()> {
        if self.results_path.exists() {
            fs::remove_file(&self.results_path).map_err(|e| {
                DirSpeedError::Config(format!(
                    "Failed to remove results file {}: {}",
                    self.results_path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn summary_with_marker(removed_files: usize) -> RunSummary {
        RunSummary {
            timestamp: Utc::now(),
            target_dir: PathBuf::from("/tmp/bench"),
            cases: Vec::new(),
            cancelled: false,
            removed_files,
            cleanup_errors: Vec::new(),
            leftover_files: Vec::new(),
        }
    }

    #[test]
    fn test_load_empty_results() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ResultsStorage::at_path(temp_dir.path().join("results.json"));

        assert!(storage.load_runs().unwrap().is_empty());
    }

    #[test]
    fn test_append_and_load_run() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ResultsStorage::at_path(temp_dir.path().join("results.json"));

        storage.append_run(summary_with_marker(7)).unwrap();

        let runs = storage.load_runs().unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].removed_files, 7);
    }

    #[test]
    fn test_results_rotation() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ResultsStorage::at_path(temp_dir.path().join("results.json"));

        for i in 0..MAX_RESULTS_HISTORY + 10 {
            storage.append_run(summary_with_marker(i)).unwrap();
        }

        let runs = storage.load_runs().unwrap();
        assert_eq!(runs.len(), MAX_RESULTS_HISTORY);
        // The oldest 10 were rotated out.
        assert_eq!(runs[0].removed_files, 10);
        assert_eq!(
            runs[runs.len() - 1].removed_files,
            MAX_RESULTS_HISTORY + 10 - 1
        );
    }

    #[test]
    fn test_recent_runs() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ResultsStorage::at_path(temp_dir.path().join("results.json"));

        for i in 0..10 {
            storage.append_run(summary_with_marker(i)).unwrap();
        }

        let recent = storage.recent_runs(5).unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].removed_files, 5);
        assert_eq!(recent[4].removed_files, 9);

        let all = storage.recent_runs(20).unwrap();
        assert_eq!(all.len(), 10);
    }

    #[test]
    fn test_clear() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ResultsStorage::at_path(temp_dir.path().join("results.json"));

        storage.append_run(summary_with_marker(0)).unwrap();
        storage.clear().unwrap();

        assert!(storage.load_runs().unwrap().is_empty());
    }

    #[test]
    fn test_results_file_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("results.json");
        let storage = ResultsStorage::at_path(path.clone());

        storage.append_run(summary_with_marker(0)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let results_file: ResultsFile = serde_json::from_str(&content).unwrap();
        assert_eq!(results_file.version, 1);
        assert_eq!(results_file.runs.len(), 1);
    }
}
