//! Benchmark result data models
//!
//! Structures for storing and serializing per-phase measurements, per-case
//! outcomes, and the full run summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::cleanup::CleanupFailure;
use crate::plan::TestCase;
use crate::util::units::format_throughput;

/// Which half of a test case a measurement belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Write,
    Read,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Write => "Write",
            Phase::Read => "Read",
        }
    }
}

/// Measurement for one phase of one case. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseResult {
    /// Write or read
    pub phase: Phase,
    /// Achieved bandwidth in MB/s
    pub throughput_mbps: f64,
    /// Wall-clock time across all files of the phase
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Bytes moved during the phase
    pub total_bytes: u64,
}

/// Outcome of a single test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CaseStatus {
    /// Both phases finished
    Completed { write: PhaseResult, read: PhaseResult },
    /// The case's I/O failed mid-run; the run continued without it
    Failed {
        error: String,
        partial_files_written: u32,
    },
    /// Never attempted (run cancelled or aborted before this case)
    Skipped,
}

/// One test case's entry in the run summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    pub case: TestCase,
    pub status: CaseStatus,
}

impl CaseReport {
    /// One-line human-readable rendering for console output
    pub fn summary_line(&self) -> String {
        match &self.status {
            CaseStatus::Completed { write, read } => format!(
                "{}: write {} / read {}",
                self.case.label,
                format_throughput(write.throughput_mbps),
                format_throughput(read.throughput_mbps)
            ),
            CaseStatus::Failed {
                error,
                partial_files_written,
            } => format!(
                "{}: FAILED after {} file(s) ({})",
                self.case.label, partial_files_written, error
            ),
            CaseStatus::Skipped => format!("{}: skipped", self.case.label),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, CaseStatus::Completed { .. })
    }
}

/// Structured report for one full run, ordered as the plan was executed.
///
/// Distinguishes completed, failed, and never-attempted cases, and lists any
/// artifact that survived cleanup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// When the run started
    pub timestamp: DateTime<Utc>,
    /// Directory the run wrote into
    pub target_dir: PathBuf,
    /// Per-case outcomes in plan order
    pub cases: Vec<CaseReport>,
    /// Whether the run was cut short by cooperative cancellation
    pub cancelled: bool,
    /// Artifacts removed during cleanup
    pub removed_files: usize,
    /// Per-file cleanup failures (recovered, never fatal)
    pub cleanup_errors: Vec<CleanupFailure>,
    /// Artifacts still present after cleanup; should be empty
    pub leftover_files: Vec<PathBuf>,
}

impl RunSummary {
    pub fn completed_cases(&self) -> usize {
        self.cases.iter().filter(|c| c.is_completed()).count()
    }

    pub fn failed_cases(&self) -> usize {
        self.cases
            .iter()
            .filter(|c| matches!(c.status, CaseStatus::Failed { .. }))
            .count()
    }

    pub fn skipped_cases(&self) -> usize {
        self.cases
            .iter()
            .filter(|c| matches!(c.status, CaseStatus::Skipped))
            .count()
    }

    /// True when cleanup left the directory free of artifacts
    pub fn is_clean(&self) -> bool {
        self.leftover_files.is_empty()
    }
}

// Custom serde module for Duration serialization as nanoseconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_nanos().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = u128::deserialize(deserializer)?;
        Ok(Duration::from_nanos(nanos as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_result() -> PhaseResult {
        PhaseResult {
            phase: Phase::Write,
            throughput_mbps: 250.0,
            duration: Duration::from_millis(40),
            total_bytes: 10 * 1_048_576,
        }
    }

    fn read_result() -> PhaseResult {
        PhaseResult {
            phase: Phase::Read,
            throughput_mbps: 500.0,
            duration: Duration::from_millis(20),
            total_bytes: 10 * 1_048_576,
        }
    }

    fn summary_with(cases: Vec<CaseReport>) -> RunSummary {
        RunSummary {
            timestamp: Utc::now(),
            target_dir: PathBuf::from("/tmp/bench"),
            cases,
            cancelled: false,
            removed_files: 0,
            cleanup_errors: Vec::new(),
            leftover_files: Vec::new(),
        }
    }

    #[test]
    fn test_case_report_summary_line_completed() {
        let report = CaseReport {
            case: TestCase::multi(1, 10),
            status: CaseStatus::Completed {
                write: write_result(),
                read: read_result(),
            },
        };
        let line = report.summary_line();
        assert!(line.starts_with("10 × 1MB Files"));
        assert!(line.contains("write"));
        assert!(line.contains("read"));
    }

    #[test]
    fn test_case_report_summary_line_failed() {
        let report = CaseReport {
            case: TestCase::multi(1, 10),
            status: CaseStatus::Failed {
                error: "permission denied".to_string(),
                partial_files_written: 5,
            },
        };
        let line = report.summary_line();
        assert!(line.contains("FAILED after 5 file(s)"));
        assert!(line.contains("permission denied"));
    }

    #[test]
    fn test_run_summary_counts_by_status() {
        let summary = summary_with(vec![
            CaseReport {
                case: TestCase::single(1),
                status: CaseStatus::Completed {
                    write: write_result(),
                    read: read_result(),
                },
            },
            CaseReport {
                case: TestCase::multi(1, 10),
                status: CaseStatus::Failed {
                    error: "disk full".to_string(),
                    partial_files_written: 3,
                },
            },
            CaseReport {
                case: TestCase::multi(1, 20),
                status: CaseStatus::Skipped,
            },
        ]);

        assert_eq!(summary.completed_cases(), 1);
        assert_eq!(summary.failed_cases(), 1);
        assert_eq!(summary.skipped_cases(), 1);
        assert!(summary.is_clean());
    }

    #[test]
    fn test_run_summary_serde_round_trip() {
        let summary = summary_with(vec![CaseReport {
            case: TestCase::single(1),
            status: CaseStatus::Completed {
                write: write_result(),
                read: read_result(),
            },
        }]);

        let json = serde_json::to_string(&summary).unwrap();
        let back: RunSummary = serde_json::from_str(&json).unwrap();

        assert_eq!(back.cases.len(), 1);
        assert_eq!(back.timestamp, summary.timestamp);
        assert_eq!(back.target_dir, summary.target_dir);
        match &back.cases[0].status {
            CaseStatus::Completed { write, read } => {
                assert_eq!(write.duration, Duration::from_millis(40));
                assert_eq!(read.total_bytes, 10 * 1_048_576);
            }
            other => panic!("unexpected status: {:?}", other),
        }
    }

    #[test]
    fn test_duration_serde_nanosecond_precision() {
        let result = PhaseResult {
            phase: Phase::Write,
            throughput_mbps: 1.0,
            duration: Duration::from_nanos(123_456_789),
            total_bytes: 1,
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: PhaseResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.duration, result.duration);
    }
}
