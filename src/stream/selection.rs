use super::comparator::{AudioComparator, StreamComparator, SubtitleComparator, VideoComparator};
use super::model::{AudioStream, Container, Disposition, SubtitleStream, VideoStream};
use crate::utils::collections::unique;
use serde::{Deserialize, Serialize};

/// Which audio and subtitle streams survive, independent of codec choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// Requested languages (ISO 639-2), in output order
    pub languages: Vec<String>,
    /// Keep audio and subtitle streams that carry no language tag
    pub preserve_no_language: bool,
    /// Keep non-default audio (commentary, descriptive audio, ...) as well
    pub include_other_audio: bool,
    /// When non-empty, subtitles whose codec is not listed are dropped
    pub subtitle_codec_filter: Vec<String>,
}

impl SelectionPolicy {
    /// Language groups in processing order. `None` is the untagged group and
    /// always comes last.
    pub fn language_groups(&self) -> Vec<Option<&str>> {
        let mut groups: Vec<Option<&str>> = unique(self.languages.iter().map(String::as_str))
            .into_iter()
            .map(Some)
            .collect();
        if self.preserve_no_language {
            groups.push(None);
        }
        groups
    }

    /// The single best primary audio stream for `language`.
    pub fn default_audio<'a>(
        &self,
        container: &'a Container,
        language: Option<&str>,
        comparator: &AudioComparator,
    ) -> Option<&'a AudioStream> {
        comparator.best(
            container
                .audio_streams()
                .filter(|stream| stream.common.language() == language)
                .filter(|stream| is_primary_audio(stream)),
        )
    }

    /// Every secondary audio stream for `language`, best first. Empty unless
    /// [`include_other_audio`](Self::include_other_audio) is set.
    pub fn other_audio<'a>(
        &self,
        container: &'a Container,
        language: Option<&str>,
        comparator: &AudioComparator,
    ) -> Vec<&'a AudioStream> {
        if !self.include_other_audio {
            return Vec::new();
        }
        comparator.sorted(
            container
                .audio_streams()
                .filter(|stream| stream.common.language() == language)
                .filter(|stream| is_other_audio(stream)),
        )
    }

    /// Default then other audio for one language group.
    pub fn audio_for_language<'a>(
        &self,
        container: &'a Container,
        language: Option<&str>,
        comparator: &AudioComparator,
    ) -> Vec<&'a AudioStream> {
        let mut streams: Vec<&AudioStream> = self
            .default_audio(container, language, comparator)
            .into_iter()
            .collect();
        streams.extend(self.other_audio(container, language, comparator));
        streams
    }

    pub fn subtitles<'a>(
        &self,
        container: &'a Container,
        comparator: &SubtitleComparator,
    ) -> Vec<&'a SubtitleStream> {
        comparator.sorted(
            container
                .subtitle_streams()
                .filter(|stream| self.keeps_subtitle(stream)),
        )
    }

    fn keeps_subtitle(&self, stream: &SubtitleStream) -> bool {
        let language_match = match stream.common.language() {
            Some(language) => self.languages.iter().any(|wanted| wanted == language),
            None => self.preserve_no_language,
        };
        if !language_match {
            return false;
        }
        self.subtitle_codec_filter.is_empty()
            || self
                .subtitle_codec_filter
                .iter()
                .any(|codec| *codec == stream.codec_name)
    }
}

/// The one video stream a plan keeps. Language and disposition play no part.
pub fn best_video<'a>(
    container: &'a Container,
    comparator: &VideoComparator,
) -> Option<&'a VideoStream> {
    comparator.best(container.video_streams())
}

/// Streams without any disposition are eligible: some muxers never set them.
fn is_primary_audio(stream: &AudioStream) -> bool {
    let common = &stream.common;
    common.dispositions.is_empty()
        || common.has_disposition(Disposition::Default)
        || common.has_disposition(Disposition::Dub)
}

fn is_other_audio(stream: &AudioStream) -> bool {
    let common = &stream.common;
    !common.dispositions.is_empty()
        && !common.has_disposition(Disposition::Default)
        && !common.has_disposition(Disposition::Dub)
}
