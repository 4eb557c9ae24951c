//! Running a plan: either for real through ffmpeg, or as a dry run.

mod dry_run;
mod ffmpeg;

pub use dry_run::DryRunProcessor;
pub use ffmpeg::FfmpegProcessor;

use crate::config::{ProcessingConfig, ProgressConfig};
use crate::plan::{evaluator, Operation, OperationPlanner};
use crate::stream::{Container, ProbeReader};
use crate::utils::filesystem::get_file_size;
use crate::utils::logging::{log_noop_skip, log_plan, log_slim_complete, log_slim_start};
use crate::utils::{FfmpegWrapper, Result};
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Consumes a plan for one input file.
pub trait Processor {
    fn input(&self) -> &Path;

    fn operations(&self) -> &[Operation];

    /// True when processing would reproduce `container` unchanged.
    fn is_noop(&self, container: &Container) -> bool {
        evaluator::is_noop(self.operations(), container)
    }

    #[allow(async_fn_in_trait)]
    async fn process(&self, output: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlimOutcome {
    Slimmed,
    /// Every stream would have been copied unchanged
    Skipped,
    DryRun,
}

/// Settings shared by every file in a run.
#[derive(Debug, Clone, Default)]
pub struct SlimSettings {
    pub dry_run: bool,
    pub processing: ProcessingConfig,
    pub progress: ProgressConfig,
}

/// Probe, plan and process a single file.
pub struct SlimJob<'a> {
    ffmpeg: &'a FfmpegWrapper,
    planner: &'a OperationPlanner,
    settings: &'a SlimSettings,
}

impl<'a> SlimJob<'a> {
    pub fn new(
        ffmpeg: &'a FfmpegWrapper,
        planner: &'a OperationPlanner,
        settings: &'a SlimSettings,
    ) -> Self {
        Self {
            ffmpeg,
            planner,
            settings,
        }
    }

    pub async fn run(&self, input: &Path, output: &Path) -> Result<SlimOutcome> {
        debug!("Slimming {} into {}", input.display(), output.display());

        let container = ProbeReader::new(self.ffmpeg.clone()).open(input).await?;
        let operations = self.planner.plan(&container)?;
        log_plan(&operations, &container);

        if self.settings.dry_run {
            let processor = DryRunProcessor::new(input, operations);
            return self.execute(&processor, &container, output, SlimOutcome::DryRun).await;
        }

        let processor = FfmpegProcessor::new(self.ffmpeg.clone(), input, operations)
            .with_overwrite(self.settings.processing.overwrite)
            .with_progress(self.settings.progress.clone(), container.duration);
        self.execute(&processor, &container, output, SlimOutcome::Slimmed)
            .await
    }

    async fn execute<P: Processor>(
        &self,
        processor: &P,
        container: &Container,
        output: &Path,
        outcome: SlimOutcome,
    ) -> Result<SlimOutcome> {
        if self.settings.processing.skip_noops && processor.is_noop(container) {
            log_noop_skip(processor.input());
            return Ok(SlimOutcome::Skipped);
        }

        if outcome == SlimOutcome::DryRun {
            processor.process(output).await?;
            return Ok(outcome);
        }

        log_slim_start(processor.input(), output, processor.operations());
        let started = Instant::now();
        processor.process(output).await?;

        let input_size = get_file_size(processor.input()).unwrap_or(container.size);
        let output_size = get_file_size(output).unwrap_or(0);
        log_slim_complete(started.elapsed(), input_size, output_size);

        Ok(outcome)
    }
}
