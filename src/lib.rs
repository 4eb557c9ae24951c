pub mod cli;
pub mod config;
pub mod plan;
pub mod processing;
pub mod progress;
pub mod stream;
pub mod utils;

pub use config::{Config, SelectionConfig, SelectionOverrides};
pub use plan::{
    ffmpeg_arguments, is_noop, plan, Operation, OperationKind, OperationPlanner, PlanOptions,
    StreamType,
};
pub use processing::{SlimJob, SlimOutcome, SlimSettings};
pub use stream::{parse_probe_output, Container, ProbeReader, SelectionPolicy, Stream};
pub use utils::{Error, FfmpegWrapper, Result};
