//! Hierarchy levels for console output.

use console::style;
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingLevel {
    /// One input file or the batch as a whole
    Root,
    /// Planning and running ffmpeg
    Stage,
    /// Steps within a stage
    Step,
    Detail,
}

impl ProcessingLevel {
    pub fn of(message: &str) -> Self {
        if message.starts_with("Processing file")
            || (message.starts_with("Found") && message.contains("file(s) to process"))
            || message.starts_with("Batch complete")
        {
            return Self::Root;
        }

        if message.starts_with("Starting slim")
            || message.starts_with("Planned")
            || message.starts_with("Slimming completed")
        {
            return Self::Stage;
        }

        if message.starts_with("Analyzing stream structure")
            || message.starts_with("Stream analysis complete")
            || message.starts_with("Skipping")
            || message.starts_with("Using profile")
            || message.starts_with("Loaded configuration")
        {
            return Self::Step;
        }

        Self::Detail
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Self::Root => "▶",
            Self::Stage => "●",
            Self::Step | Self::Detail => " ",
        }
    }

    pub fn style(self, message: &str, use_color: bool) -> String {
        if !use_color {
            return match self {
                Self::Root => message.to_uppercase(),
                _ => message.to_string(),
            };
        }
        match self {
            Self::Root => style(message).bold().cyan().to_string(),
            Self::Stage => style(message).bold().green().to_string(),
            Self::Step => style(message).cyan().to_string(),
            Self::Detail => style(message).dim().to_string(),
        }
    }
}

/// INFO carries no label; everything else is tagged.
pub fn level_label(level: &Level, use_color: bool) -> String {
    let (label, styled) = match *level {
        Level::ERROR => ("ERROR", style("ERROR").red().bold()),
        Level::WARN => ("WARN ", style("WARN ").yellow()),
        Level::INFO => return String::new(),
        Level::DEBUG => ("DEBUG", style("DEBUG").blue()),
        Level::TRACE => ("TRACE", style("TRACE").magenta()),
    };
    if use_color {
        styled.to_string()
    } else {
        label.to_string()
    }
}
