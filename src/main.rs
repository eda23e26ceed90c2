use std::path::PathBuf;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};

use dirspeed::bench::{CancelToken, Runner};
use dirspeed::config::persistence::ResultsStorage;
use dirspeed::config::RunConfig;
use dirspeed::models::RunSummary;
use dirspeed::plan::TestCase;
use dirspeed::report::{ChannelReporter, RunEvent};
use dirspeed::util::units::{format_bytes, format_duration, format_throughput, parse_bytes};
use dirspeed::{DirSpeedError, Result, BYTES_PER_MB};

struct CliArgs {
    target_dir: Option<PathBuf>,
    min_free_mb: Option<u64>,
    quick: bool,
    no_save: bool,
}

fn print_usage() {
    println!("Usage: dirspeed [DIRECTORY] [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --min-free <SIZE>  Free space required before running (e.g. 2GiB, default 1024 MB)");
    println!("  --quick            Run only the small cases (≤ 20 MB per case)");
    println!("  --no-save          Do not append the summary to the results history");
    println!("  --help             Show this help");
}

fn parse_args() -> Result<Option<CliArgs>> {
    let mut args = CliArgs {
        target_dir: None,
        min_free_mb: None,
        quick: false,
        no_save: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(None),
            "--quick" => args.quick = true,
            "--no-save" => args.no_save = true,
            "--min-free" => {
                let value = iter.next().ok_or_else(|| {
                    DirSpeedError::Config("--min-free requires a size argument".to_string())
                })?;
                let bytes = parse_bytes(&value).map_err(DirSpeedError::Config)?;
                args.min_free_mb = Some(bytes / BYTES_PER_MB);
            }
            other if other.starts_with('-') => {
                return Err(DirSpeedError::Config(format!("Unknown flag: {}", other)));
            }
            dir => {
                if args.target_dir.is_some() {
                    return Err(DirSpeedError::Config(
                        "More than one directory given".to_string(),
                    ));
                }
                args.target_dir = Some(PathBuf::from(dir));
            }
        }
    }

    Ok(Some(args))
}

/// Reduced plan for fast smoke runs
fn quick_plan() -> Vec<TestCase> {
    vec![
        TestCase::single(1),
        TestCase::multi(1, 10),
        TestCase::multi(1, 20),
    ]
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("Run summary for {}:", summary.target_dir.display());
    for report in &summary.cases {
        println!("  {}", report.summary_line());
    }
    println!(
        "  {} completed, {} failed, {} skipped",
        summary.completed_cases(),
        summary.failed_cases(),
        summary.skipped_cases()
    );
    if summary.cancelled {
        println!("  Run was cancelled before finishing.");
    }
    println!("  Cleanup removed {} file(s).", summary.removed_files);
    for err in &summary.cleanup_errors {
        println!("  Cleanup error: {}: {}", err.path.display(), err.cause);
    }
    if !summary.is_clean() {
        println!("  WARNING: files survived cleanup:");
        for path in &summary.leftover_files {
            println!("    {}", path.display());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let Some(args) = parse_args()? else {
        print_usage();
        return Ok(());
    };

    let mut config = RunConfig::load().unwrap_or_default();
    if let Some(dir) = args.target_dir {
        config.target_dir = dir;
    }
    if let Some(mb) = args.min_free_mb {
        config.required_space_mb = mb;
    }

    let mut runner = Runner::new(config.clone());
    if args.quick {
        runner = runner.with_cases(quick_plan());
    }

    println!(
        "Benchmarking {} ({} case(s), {} MB free space required)",
        config.target_dir.display(),
        runner.cases().len(),
        config.required_space_mb
    );

    let (reporter, mut rx) = ChannelReporter::new();
    let cancel = CancelToken::new();

    // Ctrl-C requests cooperative cancellation; the run skips remaining
    // cases and still cleans up.
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nCancellation requested, finishing current phase...");
            signal_cancel.cancel();
        }
    });

    let handle = runner.spawn(Arc::new(reporter), cancel);

    // Scale bar position against a 1 GiB/s ceiling; raw numbers are printed
    // alongside so the clamp is cosmetic only.
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    while let Some(event) = rx.recv().await {
        match event {
            RunEvent::CaseStarted(case) => {
                pb.set_position(0);
                pb.set_message(format!("{} ...", case.label));
            }
            RunEvent::PhaseCompleted { case, result } => {
                pb.set_position((result.throughput_mbps / 1024.0 * 100.0).min(100.0) as u64);
                pb.println(format!(
                    "{} {}: {} ({} in {})",
                    case.label,
                    result.phase.label().to_lowercase(),
                    format_throughput(result.throughput_mbps),
                    format_bytes(result.total_bytes),
                    format_duration(result.duration)
                ));
            }
            RunEvent::CaseFailed {
                case,
                error,
                partial_files_written,
            } => {
                pb.println(format!(
                    "{} FAILED after {} file(s): {}",
                    case.label, partial_files_written, error
                ));
            }
            RunEvent::RunCompleted(_) => {}
        }
    }
    pb.finish_and_clear();

    let summary = handle
        .await
        .map_err(|e| DirSpeedError::Benchmark {
            cause: format!("benchmark task panicked: {}", e),
            partial_files_written: 0,
        })??;

    print_summary(&summary);

    if !args.no_save {
        match ResultsStorage::new() {
            Ok(storage) => {
                if let Err(err) = storage.append_run(summary) {
                    eprintln!("Could not save results history: {}", err);
                }
            }
            Err(err) => eprintln!("Could not open results history: {}", err),
        }
    }

    Ok(())
}
