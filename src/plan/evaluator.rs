use super::operation::Operation;
use crate::stream::Container;

/// True when running the plan would reproduce the container: every stream is
/// kept and every operation is a copy.
pub fn is_noop(operations: &[Operation], container: &Container) -> bool {
    operations.len() == container.streams.len() && operations.iter().all(Operation::is_copy)
}

/// Counts for reporting what a plan does to a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanSummary {
    pub copied: usize,
    pub converted: usize,
    /// Streams in the container with no operation
    pub dropped: usize,
}

impl PlanSummary {
    pub fn new(operations: &[Operation], container: &Container) -> Self {
        let copied = operations.iter().filter(|op| op.is_copy()).count();
        Self {
            copied,
            converted: operations.len() - copied,
            dropped: container.streams.len().saturating_sub(operations.len()),
        }
    }
}
