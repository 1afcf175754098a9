use grid_util::point::Point;
use thiserror::Error;

/// Reasons a planning call reports `found = false`.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error("start {0} lies outside the costmap")]
    StartOutOfBounds(Point),
    #[error("goal {0} lies outside the costmap")]
    GoalOutOfBounds(Point),
    #[error("goal {goal} is not reachable from {start}")]
    Unreachable { start: Point, goal: Point },
    /// The path walk did not reach the start within the bound on steps. This means the
    /// consistency invariant was violated somewhere.
    #[error("path extraction exceeded {steps} steps without reaching the start")]
    ExtractionCycle { steps: usize },
    /// The path walk hit a node without any finite predecessor.
    #[error("path extraction stalled at {0}")]
    ExtractionStalled(Point),
    #[error("search stopped after {limit} expansions")]
    ExpansionLimit { limit: usize },
}

impl PlanError {
    /// Errors that can only come from a bug in the incremental search rather than from the map.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            PlanError::ExtractionCycle { .. } | PlanError::ExtractionStalled(_)
        )
    }
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum CostmapError {
    #[error("costmap must have a non-zero width and height")]
    Empty,
    #[error("expected {expected} cost values but got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}
