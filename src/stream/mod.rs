pub mod comparator;
pub mod model;
pub mod probe;
pub mod selection;

pub use comparator::{AudioComparator, StreamComparator, SubtitleComparator, VideoComparator};
pub use model::{
    AttachmentStream, AudioStream, CodedStream, Container, DataStream, Disposition, FieldOrder,
    Stream, StreamCommon, SubtitleStream, VideoStream,
};
pub use probe::{parse_probe_output, ProbeReader};
pub use selection::{best_video, SelectionPolicy};
