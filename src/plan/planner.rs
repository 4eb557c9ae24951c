use super::operation::{Operation, OperationKind, StreamType};
use crate::stream::{
    best_video, AudioComparator, CodedStream, Container, SelectionPolicy, SubtitleComparator,
    VideoComparator,
};
use crate::utils::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Codec handling for one stream kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecPreferences {
    /// Codecs kept as-is, best first. The first entry is the transcode target
    /// for anything unlisted.
    pub preferred: Vec<String>,
    /// Fallback target when `preferred` is empty
    pub transcode: String,
    /// Extra ffmpeg arguments appended after the target codec
    pub options: Vec<String>,
}

impl CodecPreferences {
    pub fn resolve(&self, codec: &str) -> OperationKind {
        if self.preferred.iter().any(|preferred| preferred == codec) {
            return OperationKind::Copy;
        }

        let target = self
            .preferred
            .first()
            .map(String::as_str)
            .or_else(|| Some(self.transcode.as_str()).filter(|codec| !codec.is_empty()));

        match target {
            Some(target) => OperationKind::convert(target, self.options.clone()),
            None => OperationKind::Copy,
        }
    }
}

/// Everything planning depends on besides the container itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOptions {
    pub selection: SelectionPolicy,
    pub video: CodecPreferences,
    pub audio: CodecPreferences,
    /// Subtitle codec preference order
    pub subtitle_codecs: Vec<String>,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            selection: SelectionPolicy {
                languages: vec!["eng".to_string()],
                ..Default::default()
            },
            video: CodecPreferences {
                preferred: vec!["hevc".to_string(), "h264".to_string()],
                transcode: "hevc".to_string(),
                options: vec!["-profile:v".to_string(), "veryslow".to_string()],
            },
            audio: CodecPreferences {
                preferred: ["truehd", "dts", "eac3", "ac3", "flac", "aac"]
                    .iter()
                    .map(|codec| codec.to_string())
                    .collect(),
                transcode: "truehd".to_string(),
                options: Vec::new(),
            },
            subtitle_codecs: vec!["hdmv_pgs_subtitle".to_string(), "subrip".to_string()],
        }
    }
}

/// Turns a container into the ordered list of stream operations:
/// the best video stream, audio per language group, then subtitles.
#[derive(Debug, Clone)]
pub struct OperationPlanner {
    options: PlanOptions,
}

impl OperationPlanner {
    pub fn new(options: PlanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PlanOptions {
        &self.options
    }

    pub fn plan(&self, container: &Container) -> Result<Vec<Operation>> {
        let options = &self.options;
        let selection = &options.selection;
        let video_comparator = VideoComparator::new(options.video.preferred.clone());
        let audio_comparator = AudioComparator::new(options.audio.preferred.clone());
        let subtitle_comparator = SubtitleComparator::new(options.subtitle_codecs.clone());

        let video = best_video(container, &video_comparator)
            .ok_or_else(|| Error::no_video_stream(&container.filename))?;

        let mut operations = vec![Operation::new(
            video.index(),
            StreamType::Video,
            options.video.resolve(video.codec_name()),
        )];
        debug!(
            "Selected video stream {} ({} {}x{})",
            video.index(),
            video.codec_name,
            video.width,
            video.height
        );

        for language in selection.language_groups() {
            let streams = selection.audio_for_language(container, language, &audio_comparator);
            debug!(
                "Language {}: {} audio stream(s) kept",
                language.unwrap_or("<none>"),
                streams.len()
            );
            operations.extend(streams.into_iter().map(|audio| {
                Operation::new(
                    audio.index(),
                    StreamType::Audio,
                    options.audio.resolve(audio.codec_name()),
                )
            }));
        }

        operations.extend(
            selection
                .subtitles(container, &subtitle_comparator)
                .into_iter()
                .map(|subtitle| {
                    Operation::new(subtitle.index(), StreamType::Subtitle, OperationKind::Copy)
                }),
        );

        Ok(operations)
    }
}

/// Convenience wrapper around [`OperationPlanner::plan`].
pub fn plan(container: &Container, options: &PlanOptions) -> Result<Vec<Operation>> {
    OperationPlanner::new(options.clone()).plan(container)
}
