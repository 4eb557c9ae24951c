use crate::config::ProgressConfig;
use crate::utils::Result;
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;
use regex::Regex;
use std::process::ExitStatus;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tracing::{debug, info};

static OUT_TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2}(?:\.\d+)?)$").expect("out_time pattern")
});

/// State accumulated from ffmpeg `-progress` records.
#[derive(Debug, Clone, Default)]
pub struct ProgressMetrics {
    pub current_time: f64,
    pub total_duration: f64,
    pub speed: Option<f32>,
    pub total_size: Option<u64>,
    pub progress_percentage: f32,
    pub finished: bool,
}

impl ProgressMetrics {
    pub fn new(total_duration: f64) -> Self {
        Self {
            total_duration,
            ..Default::default()
        }
    }

    /// Applies one `key=value` line. Returns true when the line closes a
    /// record (`progress=continue` or `progress=end`).
    pub fn update_from_ffmpeg_output(&mut self, line: &str) -> bool {
        let Some((key, value)) = line.trim().split_once('=') else {
            return false;
        };
        let value = value.trim();

        match key.trim() {
            // Both are microseconds despite the name of the second one.
            "out_time_us" | "out_time_ms" => {
                if let Ok(micros) = value.parse::<i64>() {
                    self.set_time(micros.max(0) as f64 / 1_000_000.0);
                }
            }
            "out_time" => {
                if let Some(seconds) = parse_clock(value) {
                    self.set_time(seconds);
                }
            }
            "speed" => {
                self.speed = value.trim_end_matches('x').trim().parse().ok();
            }
            "total_size" => {
                self.total_size = value.parse().ok();
            }
            "progress" => {
                if value == "end" {
                    self.finished = true;
                    self.progress_percentage = 100.0;
                }
                return true;
            }
            _ => {}
        }

        false
    }

    fn set_time(&mut self, seconds: f64) {
        self.current_time = seconds;
        if self.total_duration > 0.0 {
            self.progress_percentage =
                (seconds / self.total_duration * 100.0).clamp(0.0, 100.0) as f32;
        }
    }

    /// Projected output size from the bytes written so far.
    pub fn estimated_final_size(&self) -> Option<u64> {
        let written = self.total_size?;
        let ratio = self.current_time / self.total_duration;
        (self.total_duration > 0.0 && ratio > 0.01).then(|| (written as f64 / ratio) as u64)
    }
}

fn parse_clock(value: &str) -> Option<f64> {
    let captures = OUT_TIME_REGEX.captures(value)?;
    let hours: f64 = captures[1].parse().ok()?;
    let minutes: f64 = captures[2].parse().ok()?;
    let seconds: f64 = captures[3].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// Terminal progress bar fed by ffmpeg's `-progress pipe:1` output.
pub struct ProgressTracker {
    bar: ProgressBar,
    metrics: ProgressMetrics,
    start_time: Instant,
    last_update: Option<Instant>,
    update_interval: Duration,
    show_eta: bool,
    show_file_size: bool,
}

impl ProgressTracker {
    pub fn new(total_duration: f64, description: &str, config: &ProgressConfig) -> Self {
        let bar = if config.enabled {
            ProgressBar::new(10000)
        } else {
            ProgressBar::hidden()
        };

        let template = format!(
            "{}: [{{bar:40.cyan/blue}}] {{percent:>3}}% {{msg}}",
            description
        );
        bar.set_style(
            ProgressStyle::with_template(&template)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏ "),
        );

        Self {
            bar,
            metrics: ProgressMetrics::new(total_duration),
            start_time: Instant::now(),
            last_update: None,
            update_interval: Duration::from_millis(config.update_interval_ms),
            show_eta: config.show_eta,
            show_file_size: config.show_file_size,
        }
    }

    pub fn metrics(&self) -> &ProgressMetrics {
        &self.metrics
    }

    pub fn update_from_ffmpeg_line(&mut self, line: &str) {
        if !self.metrics.update_from_ffmpeg_output(line) {
            return;
        }

        let now = Instant::now();
        let due = self
            .last_update
            .map_or(true, |last| now.duration_since(last) >= self.update_interval);
        if due || self.metrics.finished {
            self.update_display(now);
            self.last_update = Some(now);
        }
    }

    /// Reads progress records until `reader` closes.
    pub async fn consume<R: AsyncRead + Unpin>(&mut self, reader: R) -> Result<()> {
        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await? {
            self.update_from_ffmpeg_line(&line);
        }
        Ok(())
    }

    /// Follows a spawned ffmpeg until it exits.
    pub async fn follow(&mut self, child: &mut Child) -> Result<ExitStatus> {
        if let Some(stdout) = child.stdout.take() {
            self.consume(stdout).await?;
        }
        let status = child.wait().await?;
        debug!("ffmpeg exited with {}", status);
        Ok(status)
    }

    fn update_display(&self, now: Instant) {
        self.bar
            .set_position((self.metrics.progress_percentage * 100.0) as u64);
        self.bar.set_message(self.build_status_message(now));
    }

    fn build_status_message(&self, now: Instant) -> String {
        let mut parts = Vec::new();

        let percentage = self.metrics.progress_percentage as f64;
        if self.show_eta && percentage > 0.1 && !self.metrics.finished {
            let elapsed = now.duration_since(self.start_time);
            let estimated_total = Duration::from_secs_f64(elapsed.as_secs_f64() * 100.0 / percentage);
            let eta = estimated_total.saturating_sub(elapsed);
            parts.push(format!("ETA {:02}:{:02}", eta.as_secs() / 60, eta.as_secs() % 60));
        }

        if self.show_file_size {
            if let Some(estimated) = self.metrics.estimated_final_size() {
                parts.push(format!("~{:.1}MB", estimated as f64 / 1_048_576.0));
            } else if let Some(written) = self.metrics.total_size {
                parts.push(format!("{:.1}MB", written as f64 / 1_048_576.0));
            }
        }

        if let Some(speed) = self.metrics.speed {
            parts.push(format!("{:.1}x", speed));
        }

        parts.join(" | ")
    }

    pub fn finish_successfully(&self) {
        let elapsed = self.start_time.elapsed();
        self.bar.set_position(10000);
        self.bar.finish_with_message(format!(
            "Completed in {:02}:{:02}",
            elapsed.as_secs() / 60,
            elapsed.as_secs() % 60
        ));
        info!("ffmpeg finished in {:.1} seconds", elapsed.as_secs_f32());
    }

    pub fn finish_with_error(&self, error: &str) {
        let elapsed = self.start_time.elapsed();
        self.bar.abandon_with_message(format!(
            "Failed after {:02}:{:02} - {}",
            elapsed.as_secs() / 60,
            elapsed.as_secs() % 60,
            error
        ));
    }
}
