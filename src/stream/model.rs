use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Usage hints ffprobe reports for a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Default,
    /// Dubbed audio
    Dub,
    Original,
    /// Commentary audio or subtitles
    Comment,
    Lyrics,
    /// Karaoke audio (without lead singer)
    Karaoke,
    /// Subtitles displayed even when subtitles are turned off
    Forced,
    HearingImpaired,
    VisualImpaired,
    CleanEffects,
    /// Thumbnail or cover image
    AttachedPic,
    TimedThumbnails,
    /// Audio without music or narration
    NonDiegetic,
    Captions,
    Descriptions,
    Metadata,
    /// Track dependent on another track
    Dependent,
    StillImage,
    Multilayer,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Dub => "dub",
            Self::Original => "original",
            Self::Comment => "comment",
            Self::Lyrics => "lyrics",
            Self::Karaoke => "karaoke",
            Self::Forced => "forced",
            Self::HearingImpaired => "hearing_impaired",
            Self::VisualImpaired => "visual_impaired",
            Self::CleanEffects => "clean_effects",
            Self::AttachedPic => "attached_pic",
            Self::TimedThumbnails => "timed_thumbnails",
            Self::NonDiegetic => "non_diegetic",
            Self::Captions => "captions",
            Self::Descriptions => "descriptions",
            Self::Metadata => "metadata",
            Self::Dependent => "dependent",
            Self::StillImage => "still_image",
            Self::Multilayer => "multilayer",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "default" => Some(Self::Default),
            "dub" => Some(Self::Dub),
            "original" => Some(Self::Original),
            "comment" => Some(Self::Comment),
            "lyrics" => Some(Self::Lyrics),
            "karaoke" => Some(Self::Karaoke),
            "forced" => Some(Self::Forced),
            "hearing_impaired" => Some(Self::HearingImpaired),
            "visual_impaired" => Some(Self::VisualImpaired),
            "clean_effects" => Some(Self::CleanEffects),
            "attached_pic" => Some(Self::AttachedPic),
            "timed_thumbnails" => Some(Self::TimedThumbnails),
            "non_diegetic" => Some(Self::NonDiegetic),
            "captions" => Some(Self::Captions),
            "descriptions" => Some(Self::Descriptions),
            "metadata" => Some(Self::Metadata),
            "dependent" => Some(Self::Dependent),
            "still_image" => Some(Self::StillImage),
            "multilayer" => Some(Self::Multilayer),
            _ => None,
        }
    }
}

/// Video field order (progressive or one of the interlaced layouts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldOrder {
    Progressive,
    /// Top field coded and displayed first
    Tt,
    /// Bottom field coded and displayed first
    Bb,
    /// Top coded first, bottom displayed first
    Tb,
    /// Bottom coded first, top displayed first
    Bt,
}

impl FieldOrder {
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "progressive" => Some(Self::Progressive),
            "tt" => Some(Self::Tt),
            "bb" => Some(Self::Bb),
            "tb" => Some(Self::Tb),
            "bt" => Some(Self::Bt),
            _ => None,
        }
    }
}

/// Fields every stream carries regardless of its kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamCommon {
    pub index: u32,
    pub dispositions: BTreeSet<Disposition>,
    pub tags: HashMap<String, String>,
}

impl StreamCommon {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    pub fn with_dispositions<I: IntoIterator<Item = Disposition>>(mut self, dispositions: I) -> Self {
        self.dispositions.extend(dispositions);
        self
    }

    pub fn with_tag<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_language<T: Into<String>>(self, language: T) -> Self {
        self.with_tag("language", language)
    }

    /// ISO 639-2 language tag, if the container declares one.
    pub fn language(&self) -> Option<&str> {
        self.tags.get("language").map(String::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.tags.get("title").map(String::as_str)
    }

    /// Bits per second from the `BPS` tag; unparsable values count as absent.
    pub fn bits_per_second(&self) -> Option<u64> {
        self.tags.get("BPS").and_then(|bps| bps.trim().parse().ok())
    }

    pub fn has_disposition(&self, disposition: Disposition) -> bool {
        self.dispositions.contains(&disposition)
    }
}

/// A stream with an associated codec.
pub trait CodedStream {
    fn common(&self) -> &StreamCommon;

    fn codec_name(&self) -> &str;

    fn index(&self) -> u32 {
        self.common().index
    }

    fn bits_per_second(&self) -> Option<u64> {
        self.common().bits_per_second()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoStream {
    pub common: StreamCommon,
    pub codec_name: String,
    /// Encoding profile (e.g. `Main 10`)
    pub profile: String,
    pub width: u32,
    pub height: u32,
    /// Pixel format (e.g. `yuv420p10le`)
    pub pixel_format: String,
    pub field_order: Option<FieldOrder>,
}

impl VideoStream {
    pub fn new<T: Into<String>>(common: StreamCommon, codec_name: T, width: u32, height: u32) -> Self {
        Self {
            common,
            codec_name: codec_name.into(),
            profile: String::new(),
            width,
            height,
            pixel_format: String::new(),
            field_order: None,
        }
    }

    pub fn pixel_area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl CodedStream for VideoStream {
    fn common(&self) -> &StreamCommon {
        &self.common
    }

    fn codec_name(&self) -> &str {
        &self.codec_name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioStream {
    pub common: StreamCommon,
    pub codec_name: String,
    pub profile: Option<String>,
    pub sample_format: Option<String>,
    /// Sample rate in hertz
    pub sample_rate: u32,
    pub bits_per_sample: u32,
    pub channel_count: u32,
}

impl AudioStream {
    pub fn new<T: Into<String>>(
        common: StreamCommon,
        codec_name: T,
        channel_count: u32,
        sample_rate: u32,
        bits_per_sample: u32,
    ) -> Self {
        Self {
            common,
            codec_name: codec_name.into(),
            profile: None,
            sample_format: None,
            sample_rate,
            bits_per_sample,
            channel_count,
        }
    }
}

impl CodedStream for AudioStream {
    fn common(&self) -> &StreamCommon {
        &self.common
    }

    fn codec_name(&self) -> &str {
        &self.codec_name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleStream {
    pub common: StreamCommon,
    pub codec_name: String,
}

impl SubtitleStream {
    pub fn new<T: Into<String>>(common: StreamCommon, codec_name: T) -> Self {
        Self {
            common,
            codec_name: codec_name.into(),
        }
    }
}

impl CodedStream for SubtitleStream {
    fn common(&self) -> &StreamCommon {
        &self.common
    }

    fn codec_name(&self) -> &str {
        &self.codec_name
    }
}

/// Attached file data (fonts, cover art). Never operated on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentStream {
    pub common: StreamCommon,
}

/// Timecode or other data tracks. Never selected, but part of the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataStream {
    pub common: StreamCommon,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stream {
    Video(VideoStream),
    Audio(AudioStream),
    Subtitle(SubtitleStream),
    Attachment(AttachmentStream),
    Data(DataStream),
}

impl Stream {
    pub fn common(&self) -> &StreamCommon {
        match self {
            Self::Video(stream) => &stream.common,
            Self::Audio(stream) => &stream.common,
            Self::Subtitle(stream) => &stream.common,
            Self::Attachment(stream) => &stream.common,
            Self::Data(stream) => &stream.common,
        }
    }

    pub fn index(&self) -> u32 {
        self.common().index
    }

    pub fn language(&self) -> Option<&str> {
        self.common().language()
    }

    pub fn codec_type(&self) -> &'static str {
        match self {
            Self::Video(_) => "video",
            Self::Audio(_) => "audio",
            Self::Subtitle(_) => "subtitle",
            Self::Attachment(_) => "attachment",
            Self::Data(_) => "data",
        }
    }
}

/// A parsed media container. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub filename: String,
    /// Duration in seconds
    pub duration: f64,
    /// Size in bytes
    pub size: u64,
    pub tags: HashMap<String, String>,
    /// Streams in probe order
    pub streams: Vec<Stream>,
}

impl Container {
    pub fn new<T: Into<String>>(filename: T, streams: Vec<Stream>) -> Self {
        Self {
            filename: filename.into(),
            duration: 0.0,
            size: 0,
            tags: HashMap::new(),
            streams,
        }
    }

    pub fn video_streams(&self) -> impl Iterator<Item = &VideoStream> {
        self.streams.iter().filter_map(|stream| match stream {
            Stream::Video(video) => Some(video),
            _ => None,
        })
    }

    pub fn audio_streams(&self) -> impl Iterator<Item = &AudioStream> {
        self.streams.iter().filter_map(|stream| match stream {
            Stream::Audio(audio) => Some(audio),
            _ => None,
        })
    }

    pub fn subtitle_streams(&self) -> impl Iterator<Item = &SubtitleStream> {
        self.streams.iter().filter_map(|stream| match stream {
            Stream::Subtitle(subtitle) => Some(subtitle),
            _ => None,
        })
    }

    /// Attachments and data tracks: streams no plan ever keeps.
    pub fn unselectable_count(&self) -> usize {
        self.streams
            .iter()
            .filter(|stream| matches!(stream, Stream::Attachment(_) | Stream::Data(_)))
            .count()
    }

    pub fn attachment_count(&self) -> usize {
        self.streams
            .iter()
            .filter(|stream| matches!(stream, Stream::Attachment(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_round_trips_through_names() {
        for name in ["default", "dub", "hearing_impaired", "attached_pic", "still_image"] {
            let disposition = Disposition::from_string(name).unwrap();
            assert_eq!(disposition.as_str(), name);
        }
        assert_eq!(Disposition::from_string("bogus"), None);
    }

    #[test]
    fn test_bits_per_second_requires_numeric_tag() {
        let common = StreamCommon::new(0).with_tag("BPS", "640000");
        assert_eq!(common.bits_per_second(), Some(640_000));

        let common = StreamCommon::new(0).with_tag("BPS", "fast");
        assert_eq!(common.bits_per_second(), None);

        assert_eq!(StreamCommon::new(0).bits_per_second(), None);
    }

    #[test]
    fn test_container_partitions_streams_by_kind() {
        let container = Container::new(
            "movie.mkv",
            vec![
                Stream::Video(VideoStream::new(StreamCommon::new(0), "h264", 1920, 1080)),
                Stream::Audio(AudioStream::new(StreamCommon::new(1), "aac", 2, 48000, 16)),
                Stream::Subtitle(SubtitleStream::new(StreamCommon::new(2), "subrip")),
                Stream::Attachment(AttachmentStream {
                    common: StreamCommon::new(3),
                }),
            ],
        );

        assert_eq!(container.video_streams().count(), 1);
        assert_eq!(container.audio_streams().count(), 1);
        assert_eq!(container.subtitle_streams().count(), 1);
        assert_eq!(container.attachment_count(), 1);
        assert_eq!(container.streams[3].codec_type(), "attachment");
    }

    #[test]
    fn test_pixel_area_does_not_overflow() {
        let video = VideoStream::new(StreamCommon::new(0), "hevc", u32::MAX, 2);
        assert_eq!(video.pixel_area(), u64::from(u32::MAX) * 2);
    }
}
