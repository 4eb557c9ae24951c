pub mod collections;
pub mod error;
pub mod ffmpeg;
pub mod filesystem;
pub mod logging;

pub use error::{Error, Result};
pub use ffmpeg::{locate_executable, resolve_tool, FfmpegWrapper};
pub use filesystem::{find_video_files, generate_uuid_filename, output_path_for};
pub use logging::setup_logging;
