//! "Best stream first" orderings for each coded stream kind.
//!
//! Every comparator is a chain of steps that each return `Option<Ordering>`;
//! `None` means no preference and falls through to the next step. The chain
//! always ends in [`compare_index`], so the result is a strict order.
//! `Ordering::Less` means the left stream is preferred.

use super::model::{AudioStream, CodedStream, SubtitleStream, VideoStream};
use std::cmp::Ordering;

pub trait StreamComparator {
    type Stream: CodedStream;

    /// Codec names in order of preference.
    fn preferred_codecs(&self) -> &[String];

    fn compare(&self, lhs: &Self::Stream, rhs: &Self::Stream) -> Ordering;

    /// Ranks by position in [`preferred_codecs`](Self::preferred_codecs); an
    /// unlisted codec ranks after every listed one.
    fn compare_codecs(&self, lhs: &Self::Stream, rhs: &Self::Stream) -> Option<Ordering> {
        let rank = |codec: &str| {
            self.preferred_codecs()
                .iter()
                .position(|preferred| preferred == codec)
                .unwrap_or(usize::MAX)
        };
        non_equal(rank(lhs.codec_name()).cmp(&rank(rhs.codec_name())))
    }

    fn sorted<'a, I>(&self, streams: I) -> Vec<&'a Self::Stream>
    where
        I: IntoIterator<Item = &'a Self::Stream>,
        Self::Stream: 'a,
    {
        let mut streams: Vec<_> = streams.into_iter().collect();
        streams.sort_by(|lhs, rhs| self.compare(lhs, rhs));
        streams
    }

    fn best<'a, I>(&self, streams: I) -> Option<&'a Self::Stream>
    where
        I: IntoIterator<Item = &'a Self::Stream>,
        Self::Stream: 'a,
    {
        streams
            .into_iter()
            .min_by(|lhs, rhs| self.compare(lhs, rhs))
    }
}

/// Higher bitrate wins. No preference when either side lacks a `BPS` tag.
pub fn compare_bits_per_second<S: CodedStream>(lhs: &S, rhs: &S) -> Option<Ordering> {
    match (lhs.bits_per_second(), rhs.bits_per_second()) {
        (Some(lhs_bps), Some(rhs_bps)) => prefer_higher(lhs_bps, rhs_bps),
        _ => None,
    }
}

/// Lower index wins. Always decisive.
pub fn compare_index<S: CodedStream>(lhs: &S, rhs: &S) -> Ordering {
    lhs.index().cmp(&rhs.index())
}

fn prefer_higher<T: Ord>(lhs: T, rhs: T) -> Option<Ordering> {
    non_equal(rhs.cmp(&lhs))
}

fn non_equal(ordering: Ordering) -> Option<Ordering> {
    match ordering {
        Ordering::Equal => None,
        decisive => Some(decisive),
    }
}

/// Resolution, then codec preference, then bitrate.
#[derive(Debug, Clone)]
pub struct VideoComparator {
    preferred_codecs: Vec<String>,
}

impl VideoComparator {
    pub fn new(preferred_codecs: Vec<String>) -> Self {
        Self { preferred_codecs }
    }
}

impl StreamComparator for VideoComparator {
    type Stream = VideoStream;

    fn preferred_codecs(&self) -> &[String] {
        &self.preferred_codecs
    }

    fn compare(&self, lhs: &VideoStream, rhs: &VideoStream) -> Ordering {
        prefer_higher(lhs.pixel_area(), rhs.pixel_area())
            .or_else(|| self.compare_codecs(lhs, rhs))
            .or_else(|| compare_bits_per_second(lhs, rhs))
            .unwrap_or_else(|| compare_index(lhs, rhs))
    }
}

/// Channel count, codec preference, bit depth, sample rate, then bitrate.
#[derive(Debug, Clone)]
pub struct AudioComparator {
    preferred_codecs: Vec<String>,
}

impl AudioComparator {
    pub fn new(preferred_codecs: Vec<String>) -> Self {
        Self { preferred_codecs }
    }
}

impl StreamComparator for AudioComparator {
    type Stream = AudioStream;

    fn preferred_codecs(&self) -> &[String] {
        &self.preferred_codecs
    }

    fn compare(&self, lhs: &AudioStream, rhs: &AudioStream) -> Ordering {
        prefer_higher(lhs.channel_count, rhs.channel_count)
            .or_else(|| self.compare_codecs(lhs, rhs))
            .or_else(|| prefer_higher(lhs.bits_per_sample, rhs.bits_per_sample))
            .or_else(|| prefer_higher(lhs.sample_rate, rhs.sample_rate))
            .or_else(|| compare_bits_per_second(lhs, rhs))
            .unwrap_or_else(|| compare_index(lhs, rhs))
    }
}

#[derive(Debug, Clone)]
pub struct SubtitleComparator {
    preferred_codecs: Vec<String>,
}

impl SubtitleComparator {
    pub fn new(preferred_codecs: Vec<String>) -> Self {
        Self { preferred_codecs }
    }
}

impl StreamComparator for SubtitleComparator {
    type Stream = SubtitleStream;

    fn preferred_codecs(&self) -> &[String] {
        &self.preferred_codecs
    }

    fn compare(&self, lhs: &SubtitleStream, rhs: &SubtitleStream) -> Ordering {
        self.compare_codecs(lhs, rhs)
            .unwrap_or_else(|| compare_index(lhs, rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::model::StreamCommon;

    fn codecs(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn video(index: u32, codec: &str, width: u32, height: u32) -> VideoStream {
        VideoStream::new(StreamCommon::new(index), codec, width, height)
    }

    fn audio(index: u32, codec: &str, channels: u32) -> AudioStream {
        AudioStream::new(StreamCommon::new(index), codec, channels, 48000, 24)
    }

    #[test]
    fn test_resolution_outranks_codec_preference() {
        let comparator = VideoComparator::new(codecs(&["hevc", "h264"]));
        let uhd = video(0, "av1", 3840, 2160);
        let hd = video(1, "h264", 1920, 1080);

        assert_eq!(comparator.compare(&uhd, &hd), Ordering::Less);
        assert_eq!(comparator.compare(&hd, &uhd), Ordering::Greater);
    }

    #[test]
    fn test_unlisted_codecs_rank_last_and_tie_with_each_other() {
        let comparator = VideoComparator::new(codecs(&["hevc"]));
        let listed = video(5, "hevc", 1920, 1080);
        let vp9 = video(1, "vp9", 1920, 1080);
        let mpeg2 = video(2, "mpeg2video", 1920, 1080);

        assert_eq!(comparator.compare_codecs(&listed, &vp9), Some(Ordering::Less));
        assert_eq!(comparator.compare_codecs(&vp9, &mpeg2), None);
        // Both unlisted: falls through to index.
        assert_eq!(comparator.compare(&vp9, &mpeg2), Ordering::Less);
    }

    #[test]
    fn test_bitrate_breaks_codec_ties_only_when_both_tagged() {
        let comparator = VideoComparator::new(codecs(&["h264"]));
        let low = VideoStream {
            common: StreamCommon::new(0).with_tag("BPS", "4000000"),
            ..video(0, "h264", 1920, 1080)
        };
        let high = VideoStream {
            common: StreamCommon::new(1).with_tag("BPS", "9000000"),
            ..video(1, "h264", 1920, 1080)
        };
        let untagged = video(2, "h264", 1920, 1080);

        assert_eq!(comparator.compare(&high, &low), Ordering::Less);
        assert_eq!(compare_bits_per_second(&high, &untagged), None);
        assert_eq!(comparator.compare(&untagged, &high), Ordering::Greater);
    }

    #[test]
    fn test_audio_channel_count_comes_first() {
        let comparator = AudioComparator::new(codecs(&["truehd", "aac"]));
        let stereo_truehd = audio(1, "truehd", 2);
        let surround_aac = audio(2, "aac", 6);

        assert_eq!(comparator.compare(&surround_aac, &stereo_truehd), Ordering::Less);
    }

    #[test]
    fn test_audio_bit_depth_then_sample_rate() {
        let comparator = AudioComparator::new(codecs(&["flac"]));
        let deep = AudioStream::new(StreamCommon::new(3), "flac", 2, 44100, 24);
        let shallow = AudioStream::new(StreamCommon::new(1), "flac", 2, 96000, 16);
        let fast = AudioStream::new(StreamCommon::new(2), "flac", 2, 96000, 24);

        assert_eq!(comparator.compare(&deep, &shallow), Ordering::Less);
        assert_eq!(comparator.compare(&fast, &deep), Ordering::Less);
    }

    #[test]
    fn test_subtitles_order_by_codec_then_index() {
        let comparator = SubtitleComparator::new(codecs(&["hdmv_pgs_subtitle", "subrip"]));
        let srt = SubtitleStream::new(StreamCommon::new(1), "subrip");
        let pgs = SubtitleStream::new(StreamCommon::new(4), "hdmv_pgs_subtitle");
        let ass = SubtitleStream::new(StreamCommon::new(2), "ass");
        let other_srt = SubtitleStream::new(StreamCommon::new(3), "subrip");

        let sorted: Vec<u32> = comparator
            .sorted([&other_srt, &ass, &srt, &pgs])
            .into_iter()
            .map(|stream| stream.common.index)
            .collect();
        assert_eq!(sorted, vec![4, 1, 3, 2]);
    }

    #[test]
    fn test_sorting_is_independent_of_input_order() {
        let comparator = AudioComparator::new(codecs(&["truehd", "dts", "aac"]));
        let streams = vec![
            audio(1, "aac", 2),
            audio(2, "dts", 6),
            audio(3, "truehd", 6),
            audio(4, "truehd", 8),
            audio(5, "ac3", 6),
        ];

        let forward: Vec<u32> = comparator
            .sorted(streams.iter())
            .into_iter()
            .map(|stream| stream.common.index)
            .collect();
        let reversed: Vec<u32> = comparator
            .sorted(streams.iter().rev())
            .into_iter()
            .map(|stream| stream.common.index)
            .collect();

        assert_eq!(forward, vec![4, 3, 2, 5, 1]);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_best_of_empty_is_none() {
        let comparator = VideoComparator::new(Vec::new());
        assert!(comparator.best(std::iter::empty()).is_none());
    }
}
