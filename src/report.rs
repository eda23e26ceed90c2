//! Progress reporting interface
//!
//! The core emits per-case, per-phase updates through [`ProgressReporter`];
//! front ends implement it however they like. Calls are fire-and-forget from
//! the core's perspective and must never be allowed to block the benchmark
//! thread mid-measurement, which is why the bundled [`ChannelReporter`]
//! forwards owned events over an unbounded channel.

use tokio::sync::mpsc;

use crate::models::{PhaseResult, RunSummary};
use crate::plan::TestCase;
use crate::DirSpeedError;

/// Callback interface consumed by the run orchestrator.
///
/// All methods have empty default bodies so implementors only handle the
/// events they care about.
pub trait ProgressReporter: Send + Sync {
    /// A case is about to execute
    fn on_case_start(&self, _case: &TestCase) {}

    /// A write or read phase finished; emitted immediately, not batched
    fn on_phase_complete(&self, _case: &TestCase, _result: &PhaseResult) {}

    /// A case's I/O failed; the run continues with the remaining cases
    fn on_case_failed(&self, _case: &TestCase, _error: &DirSpeedError) {}

    /// The whole run finished, cleanup included
    fn on_run_complete(&self, _summary: &RunSummary) {}
}

/// Reporter that discards every event. Useful for tests and headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {}

/// Owned event forwarded to a consuming front end
#[derive(Debug, Clone)]
pub enum RunEvent {
    CaseStarted(TestCase),
    PhaseCompleted {
        case: TestCase,
        result: PhaseResult,
    },
    CaseFailed {
        case: TestCase,
        error: String,
        partial_files_written: u32,
    },
    RunCompleted(RunSummary),
}

/// Reporter that streams [`RunEvent`]s over an unbounded tokio channel.
///
/// The unbounded sender makes every callback non-blocking; a dropped
/// receiver simply means nobody is watching, which the benchmark tolerates.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    tx: mpsc::UnboundedSender<RunEvent>,
}

impl ChannelReporter {
    /// Create a reporter and the receiving end a front end consumes
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RunEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: RunEvent) {
        let _ = self.tx.send(event);
    }
}

impl ProgressReporter for ChannelReporter {
    fn on_case_start(&self, case: &TestCase) {
        self.send(RunEvent::CaseStarted(case.clone()));
    }

    fn on_phase_complete(&self, case: &TestCase, result: &PhaseResult) {
        self.send(RunEvent::PhaseCompleted {
            case: case.clone(),
            result: result.clone(),
        });
    }

    fn on_case_failed(&self, case: &TestCase, error: &DirSpeedError) {
        let partial_files_written = match error {
            DirSpeedError::Benchmark {
                partial_files_written,
                ..
            } => *partial_files_written,
            _ => 0,
        };
        self.send(RunEvent::CaseFailed {
            case: case.clone(),
            error: error.to_string(),
            partial_files_written,
        });
    }

    fn on_run_complete(&self, summary: &RunSummary) {
        self.send(RunEvent::RunCompleted(summary.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Phase;
    use std::time::Duration;

    fn sample_result() -> PhaseResult {
        PhaseResult {
            phase: Phase::Write,
            throughput_mbps: 100.0,
            duration: Duration::from_millis(10),
            total_bytes: 1_048_576,
        }
    }

    #[test]
    fn test_channel_reporter_forwards_events_in_order() {
        let (reporter, mut rx) = ChannelReporter::new();
        let case = TestCase::single(1);

        reporter.on_case_start(&case);
        reporter.on_phase_complete(&case, &sample_result());

        match rx.try_recv().unwrap() {
            RunEvent::CaseStarted(c) => assert_eq!(c.label, "Single 1MB File"),
            other => panic!("unexpected event: {:?}", other),
        }
        match rx.try_recv().unwrap() {
            RunEvent::PhaseCompleted { result, .. } => {
                assert_eq!(result.total_bytes, 1_048_576);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_channel_reporter_carries_partial_file_count() {
        let (reporter, mut rx) = ChannelReporter::new();
        let case = TestCase::multi(1, 10);
        let error = DirSpeedError::Benchmark {
            cause: "write failed".to_string(),
            partial_files_written: 5,
        };

        reporter.on_case_failed(&case, &error);

        match rx.try_recv().unwrap() {
            RunEvent::CaseFailed {
                partial_files_written,
                error,
                ..
            } => {
                assert_eq!(partial_files_written, 5);
                assert!(error.contains("write failed"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_channel_reporter_tolerates_dropped_receiver() {
        let (reporter, rx) = ChannelReporter::new();
        drop(rx);
        // Must not panic or block.
        reporter.on_case_start(&TestCase::single(1));
    }
}
