pub mod evaluator;
pub mod operation;
pub mod planner;

pub use evaluator::{is_noop, PlanSummary};
pub use operation::{ffmpeg_arguments, Operation, OperationKind, StreamType};
pub use planner::{plan, CodecPreferences, OperationPlanner, PlanOptions};
