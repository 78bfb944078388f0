//! Command implementations

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{error, info};

use crate::adapters::tracing_log::init_logging;
use crate::app::{AppContainer, TrimInteractor};
use crate::cli::args::{BatchArgs, KeyframesArgs, PlanArgs, TimecodeArgs, TrimArgs};
use crate::cli::{Cli, Commands};
use crate::config::{ConfigOverrides, TrimConfig};
use crate::domain::model::{format_time_code, TimeCode};

/// Load configuration, start logging and run the selected command
pub fn run(cli: Cli) -> Result<ExitCode> {
    let mut overrides = ConfigOverrides {
        log_level: cli.log_level.clone(),
        log_json: cli.log_json,
        ..ConfigOverrides::default()
    };
    match &cli.command {
        Commands::Trim(args) => {
            apply_batch_overrides(&mut overrides, &args.batch);
            overrides.overwrite = args.overwrite;
        }
        Commands::Plan(args) => apply_batch_overrides(&mut overrides, &args.batch),
        Commands::Keyframes(args) => overrides.lookback_seconds = args.lookback,
        Commands::Timecode(_) => {}
    }

    let config = build_config(cli.config.as_deref(), &overrides)?;
    init_logging(&config.log_level, config.log_json).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Trim(args) => trim(config, args),
        Commands::Plan(args) => plan(config, args),
        Commands::Keyframes(args) => keyframes(config, args),
        Commands::Timecode(args) => timecode(args),
    }
}

fn apply_batch_overrides(overrides: &mut ConfigOverrides, batch: &BatchArgs) {
    overrides.output_dir = batch.output_dir.clone();
    overrides.lookback_seconds = batch.lookback;
}

fn build_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<TrimConfig> {
    let mut config = TrimConfig::load(path).context("Failed to load configuration")?;
    config.apply_overrides(overrides);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Execute the trim command
pub fn trim(config: TrimConfig, args: TrimArgs) -> Result<ExitCode> {
    let interactor = TrimInteractor::new(AppContainer::from_config(config));
    let batch = args.batch;
    let config = interactor.container().config();
    info!(
        ffmpeg = %config.ffmpeg_path.display(),
        ffprobe = %config.ffprobe_path.display(),
        overwrite = config.overwrite,
        "Starting trim operation"
    );

    let report = interactor
        .trim(&batch.videos, &batch.starts, &batch.ends)
        .context("Failed to prepare output directory")?;

    for outcome in &report.succeeded {
        println!(
            "trimmed {} -> {} ({:.2}s)",
            outcome.source_path.display(),
            outcome.destination_path.display(),
            outcome.elapsed.as_secs_f64()
        );
    }
    for failure in &report.failed {
        println!("failed  {}: {}", failure.source_path.display(), failure.error);
    }
    println!(
        "{} of {} trimmed, {} failed",
        report.succeeded.len(),
        report.total(),
        report.failed.len()
    );

    if report.is_success() {
        info!("Trim operation completed successfully");
        Ok(ExitCode::SUCCESS)
    } else {
        error!(failed = report.failed.len(), "Trim operation finished with failures");
        Ok(ExitCode::FAILURE)
    }
}

/// Execute the plan command
pub fn plan(config: TrimConfig, args: PlanArgs) -> Result<ExitCode> {
    let interactor = TrimInteractor::new(AppContainer::from_config(config));
    let batch = args.batch;
    let plans = interactor.plan(&batch.videos, &batch.starts, &batch.ends);

    let mut failures = 0;
    let mut entries = Vec::with_capacity(plans.len());

    for (request, result) in plans.requests().iter().zip(plans.iter()) {
        match result {
            Ok(plan) => {
                if args.json {
                    entries.push(json!({ "plan": plan }));
                } else {
                    println!("{}", plan.describe());
                }
            }
            Err(e) => {
                failures += 1;
                if args.json {
                    entries.push(json!({
                        "source_path": request.source,
                        "error": e.to_string(),
                    }));
                } else {
                    println!("failed  {}: {}", request.source.display(), e);
                }
            }
        }
    }

    if args.json {
        let json = serde_json::to_string_pretty(&entries)
            .context("Failed to serialize plans to JSON")?;
        println!("{}", json);
    }

    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Execute the keyframes command
pub fn keyframes(config: TrimConfig, args: KeyframesArgs) -> Result<ExitCode> {
    let interactor = TrimInteractor::new(AppContainer::from_config(config));
    let report = interactor
        .inspect_keyframes(&args.input, &args.before)
        .with_context(|| format!("Failed to inspect keyframes of {}", args.input.display()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize keyframe report to JSON")?;
        println!("{}", json);
        return Ok(ExitCode::SUCCESS);
    }

    println!("Source: {}", report.source_path.display());
    match &report.window {
        Some(window) => println!("Window: {} ({}s lookback)", window, report.lookback_seconds),
        None => {
            println!("No start requested, the file would be copied from its beginning");
            return Ok(ExitCode::SUCCESS);
        }
    }

    println!("Keyframes: {}", report.keyframes.len());
    for timestamp in report.keyframes.as_slice() {
        println!(
            "  {:>12.6}  {}",
            timestamp,
            format_time_code(Some(*timestamp)).unwrap_or_else(|| "0.000".to_string())
        );
    }
    println!(
        "Resolved start: {}",
        format_time_code(report.resolved_start).unwrap_or_else(|| "file start".to_string())
    );

    Ok(ExitCode::SUCCESS)
}

/// Execute the timecode command
pub fn timecode(args: TimecodeArgs) -> Result<ExitCode> {
    for value in &args.values {
        let parsed = TimeCode::parse(value)
            .with_context(|| format!("Invalid time code '{}'", value))?;
        match parsed {
            Some(tc) => println!("{}\t{}\t{}", value, tc.as_seconds(), tc),
            None => println!("{}\tunset", value),
        }
    }
    Ok(ExitCode::SUCCESS)
}
