//! music-transfer - sync a subset of a music library to a portable device
//!
//! Files listed in the manifest (or found under listed directories) that are
//! missing from the destination are copied when already MP3 and converted
//! otherwise. Destination files with no source counterpart are deleted after
//! confirmation.
//!
//! Exit codes: 0 success, 1 usage, 2 unreadable manifest, 3 missing source
//! path, 4 invalid configuration, 5 some items failed, 6 other I/O failure.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use mtx_common::config::{ConfigSource, TransferConfig};
use mtx_transfer::error::exit_code;
use mtx_transfer::models::TransferReport;
use mtx_transfer::services::{FfmpegCodec, PromptConfirmer};
use mtx_transfer::{
    Preparation, TransferError, TransferOutcome, TransferRequest, TransferWorkflow,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Command-line arguments for music-transfer
#[derive(Parser, Debug)]
#[command(name = "music-transfer")]
#[command(about = "Sync a subset of a music library to a portable device, converting to MP3")]
#[command(version)]
struct Args {
    /// File listing source files and directories, one per line
    #[arg(value_name = "PATHS-FILE")]
    paths_file: PathBuf,

    /// Destination directory
    #[arg(value_name = "DESTINATION-DIR")]
    destination_dir: PathBuf,

    /// Configuration file (overrides MTX_CONFIG)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of parallel conversion workers
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Write a JSON run report to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(parse_error_exit_code(&e));
        }
    };

    let code = match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[ERROR] {:#}", e);
            e.downcast_ref::<TransferError>()
                .map(TransferError::exit_code)
                .unwrap_or(exit_code::IO)
        }
    };

    std::process::exit(code);
}

/// Help and version requests succeed; every other parse failure is a usage error
fn parse_error_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => exit_code::SUCCESS,
        _ => exit_code::USAGE,
    }
}

/// Exit code of a run that produced a report
fn report_exit_code(report: &TransferReport) -> i32 {
    if report.has_failures() {
        exit_code::ITEM_FAILURES
    } else {
        exit_code::SUCCESS
    }
}

/// Load configuration and apply command-line overrides
fn effective_config(args: &Args) -> Result<(TransferConfig, ConfigSource), TransferError> {
    let (mut config, source) = TransferConfig::load(args.config.as_deref())?;
    if let Some(jobs) = args.jobs {
        config.workers = Some(jobs);
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    config.validate()?;
    Ok((config, source))
}

async fn run(args: Args) -> Result<i32> {
    let (config, source) = effective_config(&args)?;
    mtx_common::logging::init(&config.logging).map_err(TransferError::Config)?;

    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {}", source);

    let codec = Arc::new(FfmpegCodec::new(config.encoder.clone()));
    let workflow = TransferWorkflow::new(config, codec);
    let request = TransferRequest {
        manifest: args.paths_file,
        destination: args.destination_dir,
    };

    let mut confirmer = PromptConfirmer::stdio();
    let outcome = match workflow.prepare(&request, &mut confirmer)? {
        Preparation::Finished(outcome) => outcome,
        Preparation::Ready(prepared) => {
            let removed = prepared.report().removal.removed.len();
            if removed > 0 {
                println!("Deleted {} files not found in source files list", removed);
            }
            println!(
                "Copying {} songs to {}",
                prepared.plan().len(),
                request.destination.display()
            );
            workflow.execute(prepared).await
        }
    };

    let report = match outcome {
        TransferOutcome::NoSourceFiles => {
            println!("No source files to transfer");
            return Ok(exit_code::SUCCESS);
        }
        TransferOutcome::AllPresent { .. } => {
            println!("All source files already exist in target");
            return Ok(exit_code::SUCCESS);
        }
        TransferOutcome::Completed(report) => report,
    };

    if let Some(path) = &args.report {
        let json = report.to_json().context("Failed to serialize run report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write run report to {}", path.display()))?;
    }

    println!(
        "Finished copying {} new files to {}",
        report.transferred(),
        request.destination.display()
    );

    if report.has_failures() {
        eprintln!(
            "{} transfers and {} removals failed:",
            report.failed.len(),
            report.removal.failed.len()
        );
        for failure in &report.failed {
            eprintln!(
                "  {} -> {}: {}",
                failure.source.display(),
                failure.destination.display(),
                failure.reason
            );
        }
        for failure in &report.removal.failed {
            eprintln!("  {}: {}", failure.path.display(), failure.reason);
        }
    }

    Ok(report_exit_code(&report))
}
