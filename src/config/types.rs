use crate::plan::{CodecPreferences, PlanOptions};
use crate::stream::SelectionPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg: String,
    pub ffprobe: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub show_timestamps: bool,
    pub colored_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_timestamps: false,
            colored_output: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub enabled: bool,
    pub update_interval_ms: u64,
    pub show_eta: bool,
    pub show_file_size: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            update_interval_ms: 500,
            show_eta: true,
            show_file_size: true,
        }
    }
}

/// Codec handling for one stream kind, as written in the config file.
/// Keys left out of a written block are empty: no `transcode` means unlisted
/// codecs convert to the first preferred codec, or are copied when there is
/// none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub preferred: Vec<String>,
    pub transcode: String,
    pub options: Vec<String>,
}

impl From<CodecPreferences> for CodecConfig {
    fn from(preferences: CodecPreferences) -> Self {
        Self {
            preferred: preferences.preferred,
            transcode: preferences.transcode,
            options: preferences.options,
        }
    }
}

impl From<CodecConfig> for CodecPreferences {
    fn from(config: CodecConfig) -> Self {
        Self {
            preferred: config.preferred,
            transcode: config.transcode,
            options: config.options,
        }
    }
}

/// Default stream selection and codec handling. Profiles and command-line
/// flags are layered on top of this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub languages: Vec<String>,
    pub no_language: bool,
    pub include_other_audio: bool,
    /// Subtitle codec allow-list; empty keeps every codec
    pub keep_subtitle_codecs: Vec<String>,
    pub video: CodecConfig,
    pub audio: CodecConfig,
    pub subtitle_codecs: Vec<String>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        PlanOptions::default().into()
    }
}

impl From<PlanOptions> for SelectionConfig {
    fn from(options: PlanOptions) -> Self {
        Self {
            languages: options.selection.languages,
            no_language: options.selection.preserve_no_language,
            include_other_audio: options.selection.include_other_audio,
            keep_subtitle_codecs: options.selection.subtitle_codec_filter,
            video: options.video.into(),
            audio: options.audio.into(),
            subtitle_codecs: options.subtitle_codecs,
        }
    }
}

impl SelectionConfig {
    pub fn to_plan_options(&self) -> PlanOptions {
        PlanOptions {
            selection: SelectionPolicy {
                languages: self.languages.clone(),
                preserve_no_language: self.no_language,
                include_other_audio: self.include_other_audio,
                subtitle_codec_filter: self.keep_subtitle_codecs.clone(),
            },
            video: self.video.clone().into(),
            audio: self.audio.clone().into(),
            subtitle_codecs: self.subtitle_codecs.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Pass `-y` to ffmpeg
    pub overwrite: bool,
    /// Leave files alone when every stream would be copied unchanged
    pub skip_noops: bool,
    pub suppress_stderr: bool,
}

/// A named set of overrides for [`SelectionConfig`]. Unset fields keep the
/// underlying value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_language: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_other_audio: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_subtitle_codecs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_codecs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_transcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_codecs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_transcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_codecs: Option<Vec<String>>,
}

impl SelectionOverrides {
    pub fn apply(&self, selection: &mut SelectionConfig) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        set(&mut selection.languages, &self.languages);
        set(&mut selection.no_language, &self.no_language);
        set(&mut selection.include_other_audio, &self.include_other_audio);
        set(&mut selection.keep_subtitle_codecs, &self.keep_subtitle_codecs);
        set(&mut selection.video.preferred, &self.video_codecs);
        set(&mut selection.video.transcode, &self.video_transcode);
        set(&mut selection.video.options, &self.video_options);
        set(&mut selection.audio.preferred, &self.audio_codecs);
        set(&mut selection.audio.transcode, &self.audio_transcode);
        set(&mut selection.audio.options, &self.audio_options);
        set(&mut selection.subtitle_codecs, &self.subtitle_codecs);
    }
}
