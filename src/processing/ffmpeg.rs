use super::Processor;
use crate::config::ProgressConfig;
use crate::plan::{ffmpeg_arguments, Operation};
use crate::progress::ProgressTracker;
use crate::utils::filesystem::ensure_output_dir;
use crate::utils::{Error, FfmpegWrapper, Result};
use std::path::{Path, PathBuf};

/// Writes the slimmed file by running ffmpeg with the plan's arguments.
pub struct FfmpegProcessor {
    ffmpeg: FfmpegWrapper,
    input: PathBuf,
    operations: Vec<Operation>,
    overwrite: bool,
    progress: ProgressConfig,
    /// Input duration in seconds, for the progress bar
    duration: f64,
}

impl FfmpegProcessor {
    pub fn new<P: Into<PathBuf>>(
        ffmpeg: FfmpegWrapper,
        input: P,
        operations: Vec<Operation>,
    ) -> Self {
        Self {
            ffmpeg,
            input: input.into(),
            operations,
            overwrite: false,
            progress: ProgressConfig {
                enabled: false,
                ..Default::default()
            },
            duration: 0.0,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_progress(mut self, progress: ProgressConfig, duration: f64) -> Self {
        self.progress = progress;
        self.duration = duration;
        self
    }

    /// `[-y] [-progress pipe:1 -nostats] -i <input> <plan args> <output>`
    pub fn command_arguments(&self, output: &Path) -> Vec<String> {
        let mut args = Vec::new();
        if self.overwrite {
            args.push("-y".to_string());
        }
        if self.progress.enabled {
            args.extend(["-progress", "pipe:1", "-nostats"].map(String::from));
        }
        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().into_owned());
        args.extend(ffmpeg_arguments(&self.operations));
        args.push(output.to_string_lossy().into_owned());
        args
    }
}

impl Processor for FfmpegProcessor {
    fn input(&self) -> &Path {
        &self.input
    }

    fn operations(&self) -> &[Operation] {
        &self.operations
    }

    async fn process(&self, output: &Path) -> Result<()> {
        ensure_output_dir(output)?;

        let description = self
            .input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ffmpeg".to_string());
        let mut tracker = ProgressTracker::new(self.duration, &description, &self.progress);

        let mut child = self.ffmpeg.spawn_ffmpeg(&self.command_arguments(output))?;
        let status = tracker.follow(&mut child).await?;

        if status.success() {
            tracker.finish_successfully();
            Ok(())
        } else {
            let error = Error::bad_exit_code("ffmpeg", status);
            tracker.finish_with_error(&error.to_string());
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{OperationKind, StreamType};
    use pretty_assertions::assert_eq;

    fn operations() -> Vec<Operation> {
        vec![
            Operation::new(0, StreamType::Video, OperationKind::Copy),
            Operation::new(2, StreamType::Audio, OperationKind::Copy),
        ]
    }

    #[test]
    fn test_command_arguments() {
        let processor =
            FfmpegProcessor::new(FfmpegWrapper::new("ffmpeg", "ffprobe"), "in.mkv", operations());

        assert_eq!(
            processor.command_arguments(Path::new("out.mkv")),
            vec![
                "-i", "in.mkv", "-c:v", "copy", "-c:a", "copy", "-map", "0:0", "-map", "0:2",
                "out.mkv",
            ]
        );
    }

    #[test]
    fn test_overwrite_and_progress_flags_lead() {
        let processor =
            FfmpegProcessor::new(FfmpegWrapper::new("ffmpeg", "ffprobe"), "in.mkv", operations())
                .with_overwrite(true)
                .with_progress(ProgressConfig::default(), 60.0);

        let args = processor.command_arguments(Path::new("out.mkv"));
        assert_eq!(
            &args[..6],
            &["-y", "-progress", "pipe:1", "-nostats", "-i", "in.mkv"]
        );
        assert_eq!(args.last().map(String::as_str), Some("out.mkv"));
    }

    #[tokio::test]
    async fn test_missing_ffmpeg_fails() {
        let dir = tempfile::tempdir().unwrap();
        let processor = FfmpegProcessor::new(
            FfmpegWrapper::new("video-slimmer-no-ffmpeg", "ffprobe").with_suppressed_stderr(true),
            "in.mkv",
            operations(),
        );

        assert!(processor.process(&dir.path().join("out.mkv")).await.is_err());
    }
}
