use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("FFmpeg error: {message}")]
    Ffmpeg { message: String },

    #[error("{process} exited with {status}")]
    BadExitCode { process: String, status: String },

    #[error("No probe data returned for {path}")]
    NoProbeData { path: String },

    #[error("No video stream found in {filename}")]
    NoVideoStream { filename: String },

    #[error("Unrecognized stream type: {0}")]
    UnrecognizedStreamType(String),

    #[error("Profile error: {message}")]
    Profile { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl Error {
    pub fn ffmpeg<T: Into<String>>(message: T) -> Self {
        Self::Ffmpeg {
            message: message.into(),
        }
    }

    pub fn bad_exit_code<P: Into<String>>(process: P, status: std::process::ExitStatus) -> Self {
        let status = match status.code() {
            Some(code) => format!("exit code {}", code),
            None => "no exit code (terminated by signal)".to_string(),
        };
        Self::BadExitCode {
            process: process.into(),
            status,
        }
    }

    pub fn no_video_stream<T: Into<String>>(filename: T) -> Self {
        Self::NoVideoStream {
            filename: filename.into(),
        }
    }

    pub fn profile<T: Into<String>>(message: T) -> Self {
        Self::Profile {
            message: message.into(),
        }
    }

    pub fn parse<T: Into<String>>(message: T) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failing_input() {
        assert_eq!(
            Error::no_video_stream("audio_only.mka").to_string(),
            "No video stream found in audio_only.mka"
        );
        assert_eq!(
            Error::UnrecognizedStreamType("hologram".into()).to_string(),
            "Unrecognized stream type: hologram"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_bad_exit_code_reports_status() {
        use std::os::unix::process::ExitStatusExt;

        let error = Error::bad_exit_code("ffprobe", std::process::ExitStatus::from_raw(1 << 8));
        assert_eq!(error.to_string(), "ffprobe exited with exit code 1");
    }
}
