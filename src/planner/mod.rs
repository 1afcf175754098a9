use grid_util::point::Point;

use crate::costmap::Costmap;
use crate::error::PlanError;
use crate::node::Cost;

pub mod astar;
pub mod lpa_star;

/// Outcome of a planning call. On failure `path` is empty and `failure` says why.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PlanResult {
    pub found: bool,
    /// Grid coordinates from start to goal, both included.
    pub path: Vec<Point>,
    /// Coordinates visited by the search, for visualisation.
    pub expanded: Vec<Point>,
    /// Expansions performed by this call.
    pub expansions: usize,
    pub cost: Option<Cost>,
    pub failure: Option<PlanError>,
}

impl PlanResult {
    pub fn success(path: Vec<Point>, cost: Cost, expanded: Vec<Point>, expansions: usize) -> Self {
        PlanResult {
            found: true,
            path,
            expanded,
            expansions,
            cost: Some(cost),
            failure: None,
        }
    }

    pub fn failure(error: PlanError, expanded: Vec<Point>, expansions: usize) -> Self {
        PlanResult {
            found: false,
            path: Vec::new(),
            expanded,
            expansions,
            cost: None,
            failure: Some(error),
        }
    }
}

/// The contract every grid planner satisfies: given a costmap, a start and a goal, report
/// whether a path was found, the path, and the cells visited on the way.
pub trait GridPlanner {
    fn plan(&mut self, costmap: &Costmap, start: Point, goal: Point) -> PlanResult;

    /// Path only, for callers that do not care about diagnostics.
    fn get_path(&mut self, costmap: &Costmap, start: Point, goal: Point) -> Option<Vec<Point>> {
        let result = self.plan(costmap, start, goal);
        result.found.then_some(result.path)
    }
}

/// Checks start and goal against the costmap bounds before any search work.
pub(crate) fn check_bounds(costmap: &Costmap, start: Point, goal: Point) -> Result<(), PlanError> {
    if !costmap.in_bounds(start) {
        return Err(PlanError::StartOutOfBounds(start));
    }
    if !costmap.in_bounds(goal) {
        return Err(PlanError::GoalOutOfBounds(goal));
    }
    Ok(())
}
