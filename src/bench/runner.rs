//! Run orchestration
//!
//! Sequences the planned cases strictly one after another so no case's I/O
//! contends with another's, isolates per-case failures, polls for
//! cooperative cancellation between cases and phases, and always finishes
//! with artifact cleanup.

use chrono::Utc;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::bench::case::IoBenchmark;
use crate::cleanup;
use crate::config::RunConfig;
use crate::models::{CaseReport, CaseStatus, RunSummary};
use crate::plan::{self, TestCase};
use crate::report::ProgressReporter;
use crate::space;
use crate::{DirSpeedError, Result, BYTES_PER_MB};

/// Cooperative cancellation flag shared between a front end and the
/// benchmark thread. Polled between cases and between phases; no mid-phase
/// interruption.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the run skip remaining work and proceed to cleanup
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// State owned by the core for the duration of one run.
///
/// `generated` is the authoritative list of created artifacts and the first
/// thing cleanup consults; the defensive directory scan only backs it up.
#[derive(Debug)]
pub struct RunContext {
    pub target_dir: PathBuf,
    pub generated: BTreeSet<PathBuf>,
}

impl RunContext {
    pub fn new(target_dir: PathBuf) -> Self {
        Self {
            target_dir,
            generated: BTreeSet::new(),
        }
    }
}

/// Executes a full benchmark run: preflight, cases, cleanup, summary.
#[derive(Debug, Clone)]
pub struct Runner {
    config: RunConfig,
    cases: Vec<TestCase>,
}

impl Runner {
    /// Runner over the default test plan
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            cases: plan::plan(),
        }
    }

    /// Replace the default plan, e.g. for smaller smoke runs
    pub fn with_cases(mut self, cases: Vec<TestCase>) -> Self {
        self.cases = cases;
        self
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Execute the run on the calling thread.
    ///
    /// Fatal preflight failures (inaccessible directory, insufficient
    /// space) return an error before any file is created. Per-case failures
    /// are recorded in the summary and do not stop the run. Cleanup runs
    /// regardless of what happened before it, and its outcome lands in the
    /// summary rather than in an error.
    pub fn run(
        &self,
        reporter: &dyn ProgressReporter,
        cancel: &CancelToken,
    ) -> Result<RunSummary> {
        self.config.validate()?;
        for case in &self.cases {
            case.validate()?;
        }
        self.preflight()?;

        let timestamp = Utc::now();
        let mut ctx = RunContext::new(self.config.target_dir.clone());
        let mut reports = Vec::with_capacity(self.cases.len());
        let mut cancelled = false;

        let bench = IoBenchmark::new(reporter, cancel);
        for case in &self.cases {
            if cancelled || cancel.is_cancelled() {
                cancelled = true;
                reports.push(CaseReport {
                    case: case.clone(),
                    status: CaseStatus::Skipped,
                });
                continue;
            }

            reporter.on_case_start(case);
            match bench.run(case, &mut ctx) {
                Ok((write, read)) => reports.push(CaseReport {
                    case: case.clone(),
                    status: CaseStatus::Completed { write, read },
                }),
                Err(DirSpeedError::Cancelled) => {
                    // A case interrupted between its phases is not
                    // comparable to a complete one; report it as skipped.
                    cancelled = true;
                    reports.push(CaseReport {
                        case: case.clone(),
                        status: CaseStatus::Skipped,
                    });
                }
                Err(err) => {
                    reporter.on_case_failed(case, &err);
                    let (error, partial_files_written) = match err {
                        DirSpeedError::Benchmark {
                            cause,
                            partial_files_written,
                        } => (cause, partial_files_written),
                        other => (other.to_string(), 0),
                    };
                    reports.push(CaseReport {
                        case: case.clone(),
                        status: CaseStatus::Failed {
                            error,
                            partial_files_written,
                        },
                    });
                }
            }
        }

        let cleaned = cleanup::cleanup(&ctx.target_dir, &ctx.generated);

        let summary = RunSummary {
            timestamp,
            target_dir: ctx.target_dir,
            cases: reports,
            cancelled,
            removed_files: cleaned.removed.len(),
            cleanup_errors: cleaned.errors,
            leftover_files: cleaned.leftovers,
        };
        reporter.on_run_complete(&summary);

        Ok(summary)
    }

    /// Run the benchmark sequence on a dedicated blocking worker so an async
    /// front end stays responsive while the measurement is in flight.
    pub fn spawn(
        self,
        reporter: Arc<dyn ProgressReporter>,
        cancel: CancelToken,
    ) -> JoinHandle<Result<RunSummary>> {
        tokio::task::spawn_blocking(move || self.run(reporter.as_ref(), &cancel))
    }

    /// Gate the run on available space before touching the disk
    fn preflight(&self) -> Result<()> {
        let required_mb = self.config.required_space_mb;
        let available_mb = space::free_space_bytes(&self.config.target_dir)? / BYTES_PER_MB;
        if available_mb < required_mb {
            return Err(DirSpeedError::InsufficientSpace {
                required_mb,
                available_mb,
            });
        }
        Ok(())
    }
}
