use crate::utils::{Error, Result};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::{Child, Command as TokioCommand};
use tracing::{debug, warn};

/// Paths to the ffmpeg tools plus how their diagnostics are handled.
#[derive(Debug, Clone)]
pub struct FfmpegWrapper {
    ffmpeg_path: String,
    ffprobe_path: String,
    suppress_stderr: bool,
}

impl FfmpegWrapper {
    pub fn new<F: Into<String>, P: Into<String>>(ffmpeg_path: F, ffprobe_path: P) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
            suppress_stderr: false,
        }
    }

    /// Discard the tools' stderr instead of passing it through.
    pub fn with_suppressed_stderr(mut self, suppress: bool) -> Self {
        self.suppress_stderr = suppress;
        self
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.ffprobe_path
    }

    pub fn suppresses_stderr(&self) -> bool {
        self.suppress_stderr
    }

    pub async fn check_availability(&self) -> Result<()> {
        self.check_tool(&self.ffmpeg_path, "FFmpeg").await?;
        self.check_tool(&self.ffprobe_path, "FFprobe").await
    }

    /// Only ffprobe is needed when nothing will be written.
    pub async fn check_ffprobe(&self) -> Result<()> {
        self.check_tool(&self.ffprobe_path, "FFprobe").await
    }

    async fn check_tool(&self, path: &str, name: &str) -> Result<()> {
        let output = TokioCommand::new(path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::ffmpeg(format!("{} is not available at '{}': {}", name, path, e)))?;

        if !output.status.success() {
            return Err(Error::ffmpeg(format!(
                "{} is not available or not executable",
                name
            )));
        }

        Ok(())
    }

    /// Runs ffprobe and returns its stdout.
    pub async fn run_ffprobe(&self, args: &[&str]) -> Result<String> {
        debug!("Running {} with args: {:?}", self.ffprobe_path, args);

        let output = TokioCommand::new(&self.ffprobe_path)
            .args(["-v", "error"])
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            if !self.suppress_stderr {
                let stderr = String::from_utf8_lossy(&output.stderr);
                for line in diagnostic_lines(&stderr) {
                    warn!("ffprobe: {}", line);
                }
            }
            return Err(Error::bad_exit_code("ffprobe", output.status));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Spawns ffmpeg with stdout piped for `-progress pipe:1` output. Stderr
    /// is inherited unless suppressed.
    pub fn spawn_ffmpeg(&self, args: &[String]) -> Result<Child> {
        debug!("Running {} {}", self.ffmpeg_path, args.join(" "));

        let stderr = if self.suppress_stderr {
            Stdio::null()
        } else {
            Stdio::inherit()
        };

        let child = TokioCommand::new(&self.ffmpeg_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(stderr)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::ffmpeg(format!("Failed to start {}: {}", self.ffmpeg_path, e)))?;

        Ok(child)
    }
}

/// Non-empty stderr lines, trimmed. Logged through `tracing` so the console
/// formatter can drop known container noise.
fn diagnostic_lines(stderr: &str) -> Vec<&str> {
    stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Looks `program` up on `PATH`, falling back to the bare name so the
/// operating system gets the final say when the tool is started.
pub fn locate_executable(program: &str) -> String {
    match which::which(program) {
        Ok(path) => path.to_string_lossy().into_owned(),
        Err(_) => {
            debug!("{} not found on PATH, using bare name", program);
            program.to_string()
        }
    }
}

/// An explicitly configured path wins over a `PATH` lookup.
pub fn resolve_tool(configured: Option<&str>, program: &str) -> String {
    match configured.map(str::trim).filter(|path| !path.is_empty()) {
        Some(path) if PathBuf::from(path).components().count() > 1 => path.to_string(),
        Some(name) => locate_executable(name),
        None => locate_executable(program),
    }
}
