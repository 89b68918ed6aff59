use super::CliError;
use std::fs;
use std::path::PathBuf;
use swecomp_core::common::CompareSettings;
use swecomp_core::domain::CompareError;
use swecomp_core::modules::collection::{
    render_collection_summary, walk_collection, write_collection_report,
};
use swecomp_core::modules::frame::{build_frames, render_human_summary, write_frame_reports};
use swecomp_core::modules::plan::{build_plan, scan_run_folders};
use swecomp_core::modules::runlog::{parse_log_source, RunOutcome};

#[derive(clap::Args)]
pub(super) struct FramesArgs {
    /// Comparison settings path
    #[arg(long, default_value = "compare-settings.json")]
    settings: PathBuf,

    /// Frame artifact output directory
    #[arg(long, default_value = "artifacts/frames")]
    out: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct CollectionArgs {
    /// Collection manifest path
    manifest: PathBuf,

    /// JSON report output path
    #[arg(long, default_value = "artifacts/collection/report.json")]
    report: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct LogArgs {
    /// Run timing log path
    log: PathBuf,
}

pub(super) fn run_frames_command(args: FramesArgs) -> Result<i32, CliError> {
    let settings = CompareSettings::from_json_file(&args.settings)
        .map_err(|error| CliError::Compute(error.into()))?;

    let active = scan_run_folders(&settings).map_err(CliError::Compute)?;
    if active.is_empty() {
        return Err(CliError::Compute(CompareError::input_validation(
            "INPUT.NO_RUN_FOLDERS",
            "none of the configured run folders exist",
        )));
    }

    let plan = build_plan(&active);
    let logs = active.load_logs();
    let frames = build_frames(&active, &plan, &logs);

    write_frame_reports(&frames, &args.out).map_err(CliError::Compute)?;
    print!("{}", render_human_summary(&frames));
    println!("Frame artifacts: {}", args.out.display());

    if frames.is_empty() { Ok(1) } else { Ok(0) }
}

pub(super) fn run_collection_command(args: CollectionArgs) -> Result<i32, CliError> {
    let report = walk_collection(&args.manifest).map_err(CliError::Compute)?;
    write_collection_report(&report, &args.report).map_err(CliError::Compute)?;

    println!("{}", render_collection_summary(&report));
    println!("JSON report: {}", args.report.display());
    Ok(0)
}

pub(super) fn run_log_command(args: LogArgs) -> Result<i32, CliError> {
    let source = fs::read_to_string(&args.log).map_err(|source| {
        CliError::Compute(CompareError::io_system(
            "IO.LOG_READ",
            format!("failed to read log '{}': {}", args.log.display(), source),
        ))
    })?;

    let outcomes = parse_log_source(&source);
    if outcomes.is_empty() {
        println!("no recognized entries");
        return Ok(1);
    }
    for (scenario, outcome) in &outcomes {
        match outcome {
            RunOutcome::Completed { duration_seconds } => {
                println!("{}: {:.3}s", scenario, duration_seconds);
            }
            RunOutcome::Failed { message } => {
                println!("{}: {}", scenario, message);
            }
        }
    }
    Ok(0)
}
