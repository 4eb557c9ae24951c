//! Reads a media file with `ffprobe` and decodes the JSON report into a
//! [`Container`].

use super::model::{
    AttachmentStream, AudioStream, Container, DataStream, Disposition, FieldOrder, Stream,
    StreamCommon, SubtitleStream, VideoStream,
};
use crate::utils::{Error, FfmpegWrapper, Result};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::{debug, info};

pub struct ProbeReader {
    ffmpeg: FfmpegWrapper,
}

impl ProbeReader {
    pub fn new(ffmpeg: FfmpegWrapper) -> Self {
        Self { ffmpeg }
    }

    pub async fn open<P: AsRef<Path>>(&self, input_path: P) -> Result<Container> {
        let input_path = input_path.as_ref();

        info!("Analyzing stream structure: {}", input_path.display());

        let output = self
            .ffmpeg
            .run_ffprobe(&[
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
                &input_path.to_string_lossy(),
            ])
            .await?;

        if output.trim().is_empty() {
            return Err(Error::NoProbeData {
                path: input_path.display().to_string(),
            });
        }

        let container = parse_probe_output(&output)?;

        info!(
            "Stream analysis complete: {} video, {} audio, {} subtitle, {} other",
            container.video_streams().count(),
            container.audio_streams().count(),
            container.subtitle_streams().count(),
            container.unselectable_count()
        );

        Ok(container)
    }
}

#[derive(Debug, Deserialize)]
struct ProbeReport {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: ProbeFormat,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    filename: String,
    duration: Option<String>,
    size: Option<String>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    index: u32,
    codec_type: Option<String>,
    codec_name: Option<String>,
    profile: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    pix_fmt: Option<String>,
    field_order: Option<String>,
    sample_fmt: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u32>,
    bits_per_sample: Option<u32>,
    bits_per_raw_sample: Option<String>,
    #[serde(default)]
    disposition: HashMap<String, u8>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

/// Decodes `ffprobe -print_format json -show_format -show_streams` output.
pub fn parse_probe_output(json: &str) -> Result<Container> {
    let report: ProbeReport = serde_json::from_str(json)?;

    let mut streams = Vec::with_capacity(report.streams.len());
    for raw in report.streams {
        streams.push(decode_stream(raw)?);
    }

    let format = report.format;
    let duration = parse_numeric::<f64>(format.duration.as_deref(), "format duration")?;
    let size = parse_numeric::<u64>(format.size.as_deref(), "format size")?;

    Ok(Container {
        filename: format.filename,
        duration: duration.unwrap_or(0.0),
        size: size.unwrap_or(0),
        tags: format.tags,
        streams,
    })
}

fn decode_stream(raw: ProbeStream) -> Result<Stream> {
    let codec_type = raw.codec_type.clone().unwrap_or_default();
    let common = StreamCommon {
        index: raw.index,
        dispositions: decode_dispositions(raw.index, &raw.disposition),
        tags: raw.tags.clone(),
    };

    let stream = match codec_type.as_str() {
        "video" => Stream::Video(VideoStream {
            codec_name: required(raw.codec_name.clone(), raw.index, "codec_name")?,
            profile: raw.profile.clone().unwrap_or_default(),
            width: required(raw.width, raw.index, "width")?,
            height: required(raw.height, raw.index, "height")?,
            pixel_format: raw.pix_fmt.clone().unwrap_or_default(),
            field_order: raw.field_order.as_deref().and_then(FieldOrder::from_string),
            common,
        }),
        "audio" => Stream::Audio(decode_audio(raw, common)?),
        "subtitle" => Stream::Subtitle(SubtitleStream {
            codec_name: required(raw.codec_name, raw.index, "codec_name")?,
            common,
        }),
        "attachment" => Stream::Attachment(AttachmentStream { common }),
        "data" => {
            debug!("Stream {} is a data track and will not be kept", raw.index);
            Stream::Data(DataStream { common })
        }
        _ => return Err(Error::UnrecognizedStreamType(codec_type)),
    };

    Ok(stream)
}

fn decode_audio(raw: ProbeStream, common: StreamCommon) -> Result<AudioStream> {
    let sample_rate = parse_numeric::<u32>(raw.sample_rate.as_deref(), "sample_rate")?;
    let sample_rate = required(sample_rate, raw.index, "sample_rate")?;

    let mut bits_per_sample = raw.bits_per_sample.unwrap_or(0);
    if bits_per_sample == 0 {
        if let Some(raw_bits) = raw
            .bits_per_raw_sample
            .as_deref()
            .and_then(|bits| bits.parse::<u32>().ok())
        {
            bits_per_sample = raw_bits;
        }
    }

    Ok(AudioStream {
        codec_name: required(raw.codec_name, raw.index, "codec_name")?,
        profile: raw.profile,
        sample_format: raw.sample_fmt,
        sample_rate,
        bits_per_sample,
        channel_count: required(raw.channels, raw.index, "channels")?,
        common,
    })
}

fn decode_dispositions(index: u32, flags: &HashMap<String, u8>) -> BTreeSet<Disposition> {
    let mut dispositions = BTreeSet::new();
    for (key, value) in flags {
        if *value != 1 {
            continue;
        }
        match Disposition::from_string(key) {
            Some(disposition) => {
                dispositions.insert(disposition);
            }
            None => debug!("Ignoring unknown disposition '{}' on stream {}", key, index),
        }
    }
    dispositions
}

fn required<T>(value: Option<T>, index: u32, field: &str) -> Result<T> {
    value.ok_or_else(|| Error::parse(format!("Stream {} is missing '{}'", index, field)))
}

fn parse_numeric<T: std::str::FromStr>(value: Option<&str>, field: &str) -> Result<Option<T>> {
    match value {
        None => Ok(None),
        Some(text) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::parse(format!("Invalid {}: '{}'", field, text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REPORT: &str = r#"{
        "streams": [
            {
                "index": 0,
                "codec_name": "h264",
                "codec_type": "video",
                "profile": "High",
                "width": 1920,
                "height": 1080,
                "pix_fmt": "yuv420p",
                "field_order": "progressive",
                "disposition": {"default": 1, "dub": 0, "forced": 0},
                "tags": {"BPS": "8000000", "language": "und"}
            },
            {
                "index": 1,
                "codec_name": "truehd",
                "codec_type": "audio",
                "sample_fmt": "s32",
                "sample_rate": "48000",
                "channels": 8,
                "bits_per_sample": 0,
                "bits_per_raw_sample": "24",
                "disposition": {"default": 1, "comment": 0, "brand_new_flag": 1},
                "tags": {"language": "eng", "title": "Atmos"}
            },
            {
                "index": 2,
                "codec_name": "subrip",
                "codec_type": "subtitle",
                "disposition": {"default": 0, "forced": 1},
                "tags": {"language": "eng"}
            },
            {
                "index": 3,
                "codec_type": "data",
                "disposition": {}
            },
            {
                "index": 4,
                "codec_type": "attachment",
                "disposition": {"attached_pic": 0},
                "tags": {"filename": "font.ttf", "mimetype": "font/ttf"}
            }
        ],
        "format": {
            "filename": "movie.mkv",
            "duration": "5400.123000",
            "size": "734003200",
            "tags": {"title": "Movie"}
        }
    }"#;

    #[test]
    fn test_parse_probe_output() {
        let container = parse_probe_output(REPORT).unwrap();

        assert_eq!(container.filename, "movie.mkv");
        assert_eq!(container.duration, 5400.123);
        assert_eq!(container.size, 734_003_200);
        assert_eq!(container.tags.get("title").map(String::as_str), Some("Movie"));
        // The data stream is kept in the container so dropping it is visible.
        assert_eq!(container.streams.len(), 5);
        assert_eq!(container.streams[3].codec_type(), "data");

        let video = container.video_streams().next().unwrap();
        assert_eq!(video.codec_name, "h264");
        assert_eq!(video.profile, "High");
        assert_eq!(video.pixel_format, "yuv420p");
        assert_eq!(video.field_order, Some(FieldOrder::Progressive));
        assert_eq!(video.common.bits_per_second(), Some(8_000_000));
        assert_eq!(
            video.common.dispositions,
            BTreeSet::from([Disposition::Default])
        );

        let audio = container.audio_streams().next().unwrap();
        assert_eq!(audio.sample_rate, 48000);
        assert_eq!(audio.channel_count, 8);
        assert_eq!(audio.bits_per_sample, 24);
        assert_eq!(audio.sample_format.as_deref(), Some("s32"));
        assert_eq!(audio.common.title(), Some("Atmos"));
        assert_eq!(audio.common.dispositions, BTreeSet::from([Disposition::Default]));

        let subtitle = container.subtitle_streams().next().unwrap();
        assert_eq!(subtitle.common.dispositions, BTreeSet::from([Disposition::Forced]));

        assert_eq!(container.attachment_count(), 1);
        assert_eq!(container.unselectable_count(), 2);
    }

    #[test]
    fn test_unknown_stream_type_is_an_error() {
        let json = r#"{
            "streams": [{"index": 0, "codec_type": "hologram", "disposition": {}}],
            "format": {"filename": "x.mkv", "duration": "1.0", "size": "1"}
        }"#;

        match parse_probe_output(json) {
            Err(Error::UnrecognizedStreamType(kind)) => assert_eq!(kind, "hologram"),
            other => panic!("expected UnrecognizedStreamType, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_report_is_a_json_error() {
        assert!(matches!(
            parse_probe_output("{\"streams\": ["),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_missing_format_tags_default_to_empty() {
        let json = r#"{
            "streams": [],
            "format": {"filename": "x.mkv", "duration": "1.5", "size": "42"}
        }"#;

        let container = parse_probe_output(json).unwrap();
        assert!(container.tags.is_empty());
        assert!(container.streams.is_empty());
    }

    #[test]
    fn test_bad_numeric_strings_are_rejected() {
        let json = r#"{
            "streams": [],
            "format": {"filename": "x.mkv", "duration": "soon", "size": "42"}
        }"#;

        assert!(matches!(parse_probe_output(json), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_audio_keeps_primary_bit_depth_when_present() {
        let json = r#"{
            "streams": [{
                "index": 0, "codec_type": "audio", "codec_name": "flac",
                "sample_rate": "96000", "channels": 2,
                "bits_per_sample": 16, "bits_per_raw_sample": "24",
                "disposition": {}
            }],
            "format": {"filename": "x.flac", "duration": "1.0", "size": "1"}
        }"#;

        let container = parse_probe_output(json).unwrap();
        let audio = container.audio_streams().next().unwrap();
        assert_eq!(audio.bits_per_sample, 16);
        assert!(audio.common.dispositions.is_empty());
    }
}
