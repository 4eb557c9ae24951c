mod filters;
mod levels;

use chrono::Local;
use console::style;
use std::fmt::{self as std_fmt, Debug};
use tracing::Level;
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};

pub use filters::should_show_message;
use levels::{level_label, ProcessingLevel};

pub struct CleanFormatter {
    show_timestamps: bool,
    use_color: bool,
}

impl CleanFormatter {
    pub fn new(show_timestamps: bool, use_color: bool) -> Self {
        Self {
            show_timestamps,
            use_color,
        }
    }

    fn format_message(&self, message: &str, metadata_level: &Level) -> String {
        let level = ProcessingLevel::of(message);
        let label = level_label(metadata_level, self.use_color);
        let label = if label.is_empty() {
            label
        } else {
            format!("{} ", label)
        };

        format!(
            "{} {}{}",
            level.prefix(),
            label,
            level.style(message, self.use_color)
        )
    }

    fn timestamp(&self) -> String {
        let now = Local::now().format("%H:%M:%S").to_string();
        if self.use_color {
            format!("[{}] ", style(now).dim())
        } else {
            format!("[{}] ", now)
        }
    }
}

impl<S, N> FormatEvent<S, N> for CleanFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std_fmt::Result {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        if !should_show_message(&visitor.message) {
            return Ok(());
        }

        let timestamp = if self.show_timestamps {
            self.timestamp()
        } else {
            String::new()
        };

        writeln!(
            writer,
            "{}{}",
            timestamp,
            self.format_message(&visitor.message, event.metadata().level())
        )
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value).trim_matches('"').to_string();
        }
    }
}
