use pretty_assertions::assert_eq;
use video_slimmer::plan::{CodecPreferences, PlanSummary};
use video_slimmer::stream::{
    AudioStream, Disposition, StreamCommon, SubtitleStream, VideoStream,
};
use video_slimmer::{
    ffmpeg_arguments, is_noop, parse_probe_output, plan, Container, Error, Operation,
    OperationKind, PlanOptions, SelectionPolicy, Stream, StreamType,
};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn video(index: u32, codec: &str, width: u32, height: u32) -> Stream {
    Stream::Video(VideoStream::new(StreamCommon::new(index), codec, width, height))
}

fn audio(index: u32, language: &str, codec: &str, channels: u32, dispositions: &[Disposition]) -> Stream {
    let common = StreamCommon::new(index)
        .with_language(language)
        .with_dispositions(dispositions.iter().copied());
    Stream::Audio(AudioStream::new(common, codec, channels, 48000, 24))
}

fn subtitle(index: u32, language: &str, codec: &str) -> Stream {
    Stream::Subtitle(SubtitleStream::new(
        StreamCommon::new(index).with_language(language),
        codec,
    ))
}

fn options(video_codecs: &[&str], audio_codecs: &[&str], include_other_audio: bool) -> PlanOptions {
    let defaults = PlanOptions::default();
    PlanOptions {
        selection: SelectionPolicy {
            languages: strings(&["eng"]),
            include_other_audio,
            ..Default::default()
        },
        video: CodecPreferences {
            preferred: strings(video_codecs),
            ..defaults.video
        },
        audio: CodecPreferences {
            preferred: strings(audio_codecs),
            ..defaults.audio
        },
        subtitle_codecs: strings(&["hdmv_pgs_subtitle", "subrip"]),
    }
}

/// 1080p h264, 5.1 truehd (default), 2.0 aac commentary, English subrip.
fn movie() -> Container {
    Container::new(
        "movie.mkv",
        vec![
            video(0, "h264", 1920, 1080),
            audio(1, "eng", "truehd", 6, &[Disposition::Default]),
            audio(2, "eng", "aac", 2, &[Disposition::Comment]),
            subtitle(3, "eng", "subrip"),
        ],
    )
}

#[test]
fn test_unlisted_codecs_are_converted_to_the_first_preference() {
    let operations = plan(&movie(), &options(&["hevc"], &["truehd", "dts"], true)).unwrap();

    assert_eq!(
        operations,
        vec![
            Operation::new(
                0,
                StreamType::Video,
                OperationKind::convert("hevc", strings(&["-profile:v", "veryslow"]))
            ),
            Operation::new(1, StreamType::Audio, OperationKind::Copy),
            Operation::new(2, StreamType::Audio, OperationKind::convert("truehd", Vec::new())),
            Operation::new(3, StreamType::Subtitle, OperationKind::Copy),
        ]
    );
}

#[test]
fn test_listed_codecs_are_copied() {
    let operations = plan(
        &movie(),
        &options(&["hevc", "h264"], &["truehd", "dts", "aac"], true),
    )
    .unwrap();

    assert!(operations.iter().all(Operation::is_copy));
    assert_eq!(
        operations.iter().map(|op| op.stream_index).collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );
    assert!(is_noop(&operations, &movie()));
}

#[test]
fn test_commentary_is_dropped_without_other_audio() {
    let container = movie();
    let operations = plan(&container, &options(&["hevc", "h264"], &["truehd"], false)).unwrap();

    assert_eq!(
        operations.iter().map(|op| op.stream_index).collect::<Vec<_>>(),
        vec![0, 1, 3]
    );
    assert!(!is_noop(&operations, &container));
    assert_eq!(PlanSummary::new(&operations, &container).dropped, 1);
}

#[test]
fn test_absent_language_keeps_only_video() {
    let mut options = options(&["hevc", "h264"], &["truehd"], true);
    options.selection.languages = strings(&["fre"]);

    let operations = plan(&movie(), &options).unwrap();

    assert_eq!(
        operations,
        vec![Operation::new(0, StreamType::Video, OperationKind::Copy)]
    );
}

#[test]
fn test_resolution_beats_codec_preference() {
    let container = Container::new(
        "uhd.mkv",
        vec![video(0, "h264", 1920, 1080), video(1, "av1", 3840, 2160)],
    );

    let operations = plan(&container, &options(&["hevc", "h264"], &[], false)).unwrap();

    assert_eq!(
        operations,
        vec![Operation::new(
            1,
            StreamType::Video,
            OperationKind::convert("hevc", strings(&["-profile:v", "veryslow"]))
        )]
    );
}

#[test]
fn test_no_video_stream_is_fatal() {
    let container = Container::new("audio.mka", vec![audio(0, "eng", "flac", 2, &[])]);

    match plan(&container, &PlanOptions::default()) {
        Err(Error::NoVideoStream { filename }) => assert_eq!(filename, "audio.mka"),
        other => panic!("expected NoVideoStream, got {:?}", other),
    }
}

#[test]
fn test_planning_is_idempotent() {
    let options = options(&["hevc"], &["truehd", "dts"], true);
    let first = plan(&movie(), &options).unwrap();
    let second = plan(&movie(), &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_probe_report_to_ffmpeg_arguments() {
    let report = r#"{
        "streams": [
            {"index": 0, "codec_type": "video", "codec_name": "h264",
             "width": 1920, "height": 1080, "disposition": {"default": 1}},
            {"index": 1, "codec_type": "audio", "codec_name": "dts",
             "sample_rate": "48000", "channels": 6, "bits_per_sample": 0,
             "disposition": {"default": 1}, "tags": {"language": "ger"}},
            {"index": 2, "codec_type": "audio", "codec_name": "ac3",
             "sample_rate": "48000", "channels": 6,
             "disposition": {"default": 0}, "tags": {"language": "eng"}},
            {"index": 3, "codec_type": "subtitle", "codec_name": "hdmv_pgs_subtitle",
             "disposition": {"default": 0}, "tags": {"language": "eng"}},
            {"index": 4, "codec_type": "subtitle", "codec_name": "subrip",
             "disposition": {"default": 0}, "tags": {"language": "ger"}}
        ],
        "format": {"filename": "film.mkv", "duration": "6000.0", "size": "1000"}
    }"#;

    let container = parse_probe_output(report).unwrap();
    let operations = plan(&container, &PlanOptions::default()).unwrap();

    // All-zero disposition flags decode to none, so stream 2 is primary.
    assert_eq!(
        ffmpeg_arguments(&operations),
        strings(&[
            "-c:v", "copy", "-c:a", "copy", "-c:s", "copy", "-map", "0:0", "-map", "0:2", "-map",
            "0:3",
        ])
    );
}

#[test]
fn test_ffmpeg_arguments_keep_conversion_options_in_place() {
    let operations = plan(&movie(), &options(&["hevc"], &["truehd", "dts"], true)).unwrap();

    assert_eq!(
        ffmpeg_arguments(&operations),
        strings(&[
            "-c:v", "hevc", "-profile:v", "veryslow", "-c:a:0", "copy", "-c:a:1", "truehd",
            "-c:s", "copy", "-map", "0:0", "-map", "0:1", "-map", "0:2", "-map", "0:3",
        ])
    );
}

#[test]
fn test_dropping_a_data_track_is_not_a_noop() {
    let report = r#"{
        "streams": [
            {"index": 0, "codec_type": "video", "codec_name": "hevc",
             "width": 1920, "height": 1080, "disposition": {"default": 1}},
            {"index": 1, "codec_type": "audio", "codec_name": "truehd",
             "sample_rate": "48000", "channels": 8,
             "disposition": {"default": 1}, "tags": {"language": "eng"}},
            {"index": 2, "codec_type": "data", "disposition": {}}
        ],
        "format": {"filename": "film.mkv", "duration": "6000.0", "size": "1000"}
    }"#;

    let container = parse_probe_output(report).unwrap();
    let operations = plan(&container, &PlanOptions::default()).unwrap();

    assert_eq!(operations.len(), 2);
    assert!(operations.iter().all(Operation::is_copy));
    assert!(!is_noop(&operations, &container));
    assert_eq!(PlanSummary::new(&operations, &container).dropped, 1);
}
