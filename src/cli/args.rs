use crate::config::{Config, ProcessingConfig, SelectionConfig, SelectionOverrides};
use crate::utils::{Error, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version)]
#[command(name = "video-slimmer")]
#[command(
    about = "Removes unneeded audio and subtitle tracks from movie containers using FFmpeg"
)]
#[command(long_about = "
Removes unneeded audio and subtitle tracks from movie container files using FFmpeg.
No transcoding occurs unless necessary: kept tracks are copied into the new container
without modification whenever their codec is one of the preferred codecs.

EXAMPLES:
  # Keep English audio and subtitles, write next to the input with a UUID name
  video-slimmer movie.mkv

  # English and Japanese, plus untagged tracks, into an explicit output file
  video-slimmer -l eng -l jpn -n movie.mkv slim.mkv

  # Show the plan for every file in a directory without writing anything
  video-slimmer --dry-run ~/Videos/Movies/

  # Use a named profile from the configuration file
  video-slimmer --profile archival movie.mkv /mnt/archive/
")]
pub struct CliArgs {
    /// Video file or directory to slim
    #[arg(value_name = "INPUT", required_unless_present_any = ["list_profiles", "show_profile", "validate_config"])]
    pub input: Option<PathBuf>,

    /// Output file, or output directory when INPUT is a directory (default: UUID-named sibling of each input)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Audio and subtitle language to keep, in output order (repeatable, default: eng)
    #[arg(short = 'l', long = "language", value_name = "LANG", action = ArgAction::Append)]
    pub languages: Vec<String>,

    /// Keep audio and subtitle tracks with no language tag
    #[arg(short = 'n', long)]
    pub no_language: bool,

    /// Keep non-default audio tracks (commentary, descriptive audio, ...)
    #[arg(long)]
    pub include_other_audio: bool,

    /// Preferred video codec, best first (repeatable)
    #[arg(long = "video-codec", value_name = "CODEC", action = ArgAction::Append)]
    pub video_codecs: Vec<String>,

    /// Preferred audio codec, best first (repeatable)
    #[arg(long = "audio-codec", value_name = "CODEC", action = ArgAction::Append)]
    pub audio_codecs: Vec<String>,

    /// Preferred subtitle codec, best first (repeatable)
    #[arg(long = "subtitle-codec", value_name = "CODEC", action = ArgAction::Append)]
    pub subtitle_codecs: Vec<String>,

    /// Only keep subtitles with this codec (repeatable, default: keep all)
    #[arg(long = "keep-subtitle-codec", value_name = "CODEC", action = ArgAction::Append)]
    pub keep_subtitle_codecs: Vec<String>,

    /// Video codec to transcode to when the preferred list is empty
    #[arg(long, value_name = "CODEC")]
    pub video_transcode: Option<String>,

    /// Audio codec to transcode to when the preferred list is empty
    #[arg(long, value_name = "CODEC")]
    pub audio_transcode: Option<String>,

    /// Extra ffmpeg argument when transcoding video (repeatable)
    #[arg(long = "video-option", value_name = "ARG", action = ArgAction::Append, allow_hyphen_values = true)]
    pub video_options: Vec<String>,

    /// Extra ffmpeg argument when transcoding audio (repeatable)
    #[arg(long = "audio-option", value_name = "ARG", action = ArgAction::Append, allow_hyphen_values = true)]
    pub audio_options: Vec<String>,

    /// Print the operations instead of running ffmpeg
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Do not process files that would not change
    #[arg(long)]
    pub skip_noops: bool,

    /// Send ffmpeg and ffprobe diagnostics to /dev/null
    #[arg(long)]
    pub suppress_stderr: bool,

    /// Overwrite existing output files
    #[arg(short = 'y', long)]
    pub overwrite: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Path to the ffmpeg executable
    #[arg(long, value_name = "PATH")]
    pub ffmpeg: Option<String>,

    /// Path to the ffprobe executable
    #[arg(long, value_name = "PATH")]
    pub ffprobe: Option<String>,

    /// Slimming profile to apply on top of the configured defaults
    #[arg(short, long, value_name = "PROFILE")]
    pub profile: Option<String>,

    /// Configuration file path (default: ./config.yaml, then the user config directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// List available slimming profiles
    #[arg(long)]
    pub list_profiles: bool,

    /// Show the settings a profile resolves to
    #[arg(long, value_name = "PROFILE")]
    pub show_profile: Option<String>,

    /// Validate the configuration file and exit
    #[arg(long)]
    pub validate_config: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl CliArgs {
    pub fn get_log_level<'a>(&self, config_level: &'a str) -> &'a str {
        if self.debug {
            "debug"
        } else {
            config_level
        }
    }

    pub fn should_use_color(&self, config_colored: bool) -> bool {
        config_colored && !self.no_color
    }

    pub fn is_info_command(&self) -> bool {
        self.list_profiles || self.show_profile.is_some() || self.validate_config
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_info_command() {
            return Ok(());
        }

        let input = self
            .input
            .as_ref()
            .ok_or_else(|| Error::validation("An input path is required"))?;
        if !input.exists() {
            return Err(Error::validation(format!(
                "Input path does not exist: {}",
                input.display()
            )));
        }

        if let Some(output) = &self.output {
            let same = match (input.canonicalize(), output.canonicalize()) {
                (Ok(input), Ok(output)) => input == output,
                _ => false,
            };
            if same {
                return Err(Error::validation(
                    "Output must differ from the input; ffmpeg cannot write in place",
                ));
            }
        }

        if input.is_dir() {
            if let Some(output) = &self.output {
                if output.is_file() {
                    return Err(Error::validation(format!(
                        "Output must be a directory when the input is a directory: {}",
                        output.display()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Command-line settings that override the profile and config file.
    pub fn selection_overrides(&self) -> SelectionOverrides {
        fn list(values: &[String]) -> Option<Vec<String>> {
            (!values.is_empty()).then(|| values.to_vec())
        }

        SelectionOverrides {
            title: None,
            languages: list(&self.languages),
            no_language: self.no_language.then_some(true),
            include_other_audio: self.include_other_audio.then_some(true),
            keep_subtitle_codecs: list(&self.keep_subtitle_codecs),
            video_codecs: list(&self.video_codecs),
            video_transcode: self.video_transcode.clone(),
            video_options: list(&self.video_options),
            audio_codecs: list(&self.audio_codecs),
            audio_transcode: self.audio_transcode.clone(),
            audio_options: list(&self.audio_options),
            subtitle_codecs: list(&self.subtitle_codecs),
        }
    }

    /// Config defaults, then `--profile`, then explicit flags.
    pub fn resolve_selection(&self, config: &Config) -> Result<SelectionConfig> {
        let mut selection = match &self.profile {
            Some(name) => config
                .profile_manager()
                .get_profile(name)?
                .resolve(&config.selection),
            None => config.selection.clone(),
        };
        self.selection_overrides().apply(&mut selection);
        Ok(selection)
    }

    pub fn resolve_processing(&self, config: &Config) -> ProcessingConfig {
        ProcessingConfig {
            overwrite: config.processing.overwrite || self.overwrite,
            skip_noops: config.processing.skip_noops || self.skip_noops,
            suppress_stderr: config.processing.suppress_stderr || self.suppress_stderr,
        }
    }
}
