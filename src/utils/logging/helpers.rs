//! Log lines shared by the processors and the batch driver.

use crate::plan::{Operation, PlanSummary};
use crate::stream::Container;
use crate::utils::filesystem::format_file_size;
use std::path::Path;
use std::time::Duration;

pub fn log_slim_start(input: &Path, output: &Path, operations: &[Operation]) {
    tracing::info!(
        "Starting slim: {} -> {} ({} stream(s))",
        input.display(),
        output.display(),
        operations.len()
    );
}

pub fn log_plan(operations: &[Operation], container: &Container) {
    let summary = PlanSummary::new(operations, container);
    tracing::info!(
        "Planned {} operation(s): {} copy, {} transcode, {} stream(s) dropped",
        operations.len(),
        summary.copied,
        summary.converted,
        summary.dropped
    );
    for operation in operations {
        tracing::debug!("  {}", operation);
    }
}

pub fn log_slim_complete(elapsed: Duration, input_size: u64, output_size: u64) {
    let saved = input_size.saturating_sub(output_size);
    tracing::info!(
        "Slimming completed in {:.1}s: {} -> {} (saved {})",
        elapsed.as_secs_f64(),
        format_file_size(input_size),
        format_file_size(output_size),
        format_file_size(saved)
    );
}

pub fn log_noop_skip(input: &Path) {
    tracing::info!(
        "Skipping {}: every stream would be copied unchanged",
        input.display()
    );
}
