use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use video_slimmer::{
    cli::{handle_commands, CliArgs},
    config::Config,
    plan::OperationPlanner,
    processing::{SlimJob, SlimOutcome, SlimSettings},
    utils::{
        find_video_files, output_path_for, resolve_tool, setup_logging, Error, FfmpegWrapper,
        Result,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    // --validate-config reports load errors itself.
    let config = if args.validate_config {
        Config::load_with_fallback(args.config.as_deref()).unwrap_or_default()
    } else {
        let config = Config::load_with_fallback(args.config.as_deref())?;
        config.validate()?;
        config
    };

    setup_logging(
        args.get_log_level(&config.logging.level),
        config.logging.show_timestamps,
        args.should_use_color(config.logging.colored_output),
    )?;

    if let Some(path) = Config::locate(args.config.as_deref()) {
        debug!("Loaded configuration from {}", path.display());
    }

    if handle_commands(&args, &config).await? {
        return Ok(());
    }

    args.validate()?;
    handle_slimming(&args, &config).await
}

async fn handle_slimming(args: &CliArgs, config: &Config) -> Result<()> {
    let input = args
        .input
        .as_ref()
        .ok_or_else(|| Error::validation("An input path is required"))?;

    let processing = args.resolve_processing(config);
    let ffmpeg = FfmpegWrapper::new(
        resolve_tool(args.ffmpeg.as_deref().or(Some(config.tools.ffmpeg.as_str())), "ffmpeg"),
        resolve_tool(args.ffprobe.as_deref().or(Some(config.tools.ffprobe.as_str())), "ffprobe"),
    )
    .with_suppressed_stderr(processing.suppress_stderr);

    if args.dry_run {
        ffmpeg
            .check_ffprobe()
            .await
            .map_err(|e| Error::ffmpeg(format!("ffprobe not available: {}", e)))?;
    } else {
        ffmpeg
            .check_availability()
            .await
            .map_err(|e| Error::ffmpeg(format!("FFmpeg tools not available: {}", e)))?;
    }

    let selection = args.resolve_selection(config)?;
    if let Some(profile) = &args.profile {
        info!("Using profile: {}", profile);
    }
    let planner = OperationPlanner::new(selection.to_plan_options());

    let mut progress = config.progress.clone();
    progress.enabled = progress.enabled && !args.no_progress;
    let settings = SlimSettings {
        dry_run: args.dry_run,
        processing,
        progress,
    };

    let video_files = find_video_files(input)?;
    let batch = input.is_dir();
    if video_files.is_empty() {
        warn!("No video files found in {}", input.display());
        return Ok(());
    }
    info!("Found {} video file(s) to process", video_files.len());

    let job = SlimJob::new(&ffmpeg, &planner, &settings);
    let mut slimmed = 0;
    let mut skipped = 0;
    let mut failed: Vec<(PathBuf, Error)> = Vec::new();

    for (index, input_path) in video_files.iter().enumerate() {
        info!(
            "Processing file {}/{}: {}",
            index + 1,
            video_files.len(),
            input_path.display()
        );

        let output_path = output_path_for(input_path, input, args.output.as_deref(), batch);
        match job.run(input_path, &output_path).await {
            Ok(SlimOutcome::Skipped) => skipped += 1,
            Ok(SlimOutcome::Slimmed | SlimOutcome::DryRun) => slimmed += 1,
            Err(e) if !batch => return Err(e),
            Err(e) => {
                error!("Failed to process {}: {}", input_path.display(), e);
                failed.push((input_path.clone(), e));
            }
        }
    }

    if batch {
        info!(
            "Batch complete: {} processed, {} skipped, {} failed",
            slimmed,
            skipped,
            failed.len()
        );

        if !failed.is_empty() {
            info!("Failed files:");
            for (path, e) in &failed {
                info!("  - {}: {}", path.display(), e);
            }
        }

        if slimmed + skipped == 0 && !failed.is_empty() {
            return Err(Error::validation("All files failed to process"));
        }
    }

    Ok(())
}
