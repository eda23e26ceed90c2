//! Single-case benchmark execution
//!
//! Writes a case's files with fresh random content and times the whole
//! batch, then reads them back and times that too. Files are processed
//! strictly one after another; parallel I/O would measure queue-depth
//! aggregate throughput, a different metric than the single-stream number
//! this tool reports.
//!
//! Known limitation: reads happen right after writes, so the read phase
//! usually measures the OS page cache rather than the medium. Likewise the
//! write clock stops when the OS has accepted the data, not when it reaches
//! the platter.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::bench::runner::{CancelToken, RunContext};
use crate::models::{Phase, PhaseResult};
use crate::plan::TestCase;
use crate::report::ProgressReporter;
use crate::{DirSpeedError, Result, BYTES_PER_MB};

/// Executes one test case inside a run
pub struct IoBenchmark<'a> {
    reporter: &'a dyn ProgressReporter,
    cancel: &'a CancelToken,
}

impl<'a> IoBenchmark<'a> {
    pub fn new(reporter: &'a dyn ProgressReporter, cancel: &'a CancelToken) -> Self {
        Self { reporter, cancel }
    }

    /// Run the write phase then the read phase for `case`, emitting each
    /// [`PhaseResult`] through the reporter as soon as the phase finishes.
    ///
    /// Every created path is registered in `ctx.generated` before its write
    /// begins, so a failure partway through still leaves cleanup with a
    /// complete list.
    pub fn run(
        &self,
        case: &TestCase,
        ctx: &mut RunContext,
    ) -> Result<(PhaseResult, PhaseResult)> {
        let write = self.write_phase(case, ctx)?;
        self.reporter.on_phase_complete(case, &write);

        if self.cancel.is_cancelled() {
            return Err(DirSpeedError::Cancelled);
        }

        let read = self.read_phase(case, ctx)?;
        self.reporter.on_phase_complete(case, &read);

        Ok((write, read))
    }

    fn write_phase(&self, case: &TestCase, ctx: &mut RunContext) -> Result<PhaseResult> {
        let mut rng = SmallRng::from_entropy();
        let mut chunk = vec![0u8; BYTES_PER_MB as usize];
        let mut files_written = 0u32;

        let start = Instant::now();
        for index in 0..case.file_count {
            let path = case.artifact_path(&ctx.target_dir, index);
            ctx.generated.insert(path.clone());

            write_file(&mut rng, &mut chunk, &path, case.file_size_mb).map_err(|e| {
                DirSpeedError::Benchmark {
                    cause: format!("writing {}: {}", path.display(), e),
                    partial_files_written: files_written,
                }
            })?;
            files_written += 1;
        }
        let elapsed = start.elapsed();

        phase_result(Phase::Write, case, elapsed)
    }

    fn read_phase(&self, case: &TestCase, ctx: &RunContext) -> Result<PhaseResult> {
        let expected = case.file_size_mb * BYTES_PER_MB;
        let mut chunk = vec![0u8; BYTES_PER_MB as usize];
        let mut files_read = 0u32;

        let start = Instant::now();
        for index in 0..case.file_count {
            let path = case.artifact_path(&ctx.target_dir, index);

            let bytes = read_file(&path, &mut chunk).map_err(|e| DirSpeedError::Benchmark {
                cause: format!("reading {}: {}", path.display(), e),
                partial_files_written: case.file_count,
            })?;

            if bytes != expected {
                return Err(DirSpeedError::Benchmark {
                    cause: format!(
                        "short read from {}: got {} bytes, expected {}",
                        path.display(),
                        bytes,
                        expected
                    ),
                    partial_files_written: case.file_count,
                });
            }
            files_read += 1;
        }
        let elapsed = start.elapsed();

        debug_assert_eq!(files_read, case.file_count);
        phase_result(Phase::Read, case, elapsed)
    }
}

/// Write one artifact of `size_mb` MB, refilling the chunk buffer with fresh
/// random bytes for every megabyte. Reusing identical content across files
/// would let a deduplicating or compressing filesystem short-circuit the
/// test.
fn write_file(
    rng: &mut SmallRng,
    chunk: &mut [u8],
    path: &Path,
    size_mb: u64,
) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    for _ in 0..size_mb {
        rng.fill_bytes(chunk);
        file.write_all(chunk)?;
    }
    // Hands the last buffered bytes to the OS; physical durability is out of
    // scope for this measurement.
    file.flush()?;
    Ok(())
}

/// Read one artifact fully into the scratch buffer, discarding the content,
/// and return the byte count.
fn read_file(path: &Path, chunk: &mut [u8]) -> std::io::Result<u64> {
    let mut file = File::open(path)?;
    let mut total = 0u64;
    loop {
        let n = file.read(chunk)?;
        if n == 0 {
            break;
        }
        total += n as u64;
    }
    Ok(total)
}

fn phase_result(phase: Phase, case: &TestCase, elapsed: Duration) -> Result<PhaseResult> {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        // Clock resolution too coarse to produce a meaningful rate; better
        // to signal it than to report infinity.
        return Err(DirSpeedError::Benchmark {
            cause: format!(
                "{} phase of '{}' finished in zero measurable time",
                phase.label(),
                case.label
            ),
            partial_files_written: case.file_count,
        });
    }

    Ok(PhaseResult {
        phase,
        throughput_mbps: case.total_mb() as f64 / secs,
        duration: elapsed,
        total_bytes: case.total_bytes(),
    })
}
