use grid_util::point::Point;
use log::{info, warn};

use crate::astar::astar;
use crate::config::PlannerConfig;
use crate::costmap::Costmap;
use crate::error::PlanError;
use crate::evaluator::CostEvaluator;
use crate::planner::{check_bounds, GridPlanner, PlanResult};

/// Plans every query from scratch. Shares the cost model of
/// [LpaStar](crate::planner::lpa_star::LpaStar), which makes it the reference the incremental
/// planner is checked against.
#[derive(Clone, Debug)]
pub struct AstarPlanner {
    pub config: PlannerConfig,
    /// Values above 1.0 trade optimality for fewer expansions.
    pub heuristic_factor: f32,
}

impl Default for AstarPlanner {
    fn default() -> AstarPlanner {
        AstarPlanner::new(PlannerConfig::default())
    }
}

impl AstarPlanner {
    pub fn new(config: PlannerConfig) -> AstarPlanner {
        AstarPlanner {
            config,
            heuristic_factor: 1.0,
        }
    }
}

impl GridPlanner for AstarPlanner {
    fn plan(&mut self, costmap: &Costmap, start: Point, goal: Point) -> PlanResult {
        if let Err(e) = check_bounds(costmap, start, goal) {
            warn!("{}", e);
            return PlanResult::failure(e, Vec::new(), 0);
        }
        let eval = CostEvaluator::new(costmap, &self.config);
        // Check if start and goal are on the same connected component.
        let components = eval.components();
        if start != goal && !eval.reachable(&components, &start, &goal) {
            info!("{} is not reachable from {}", goal, start);
            return PlanResult::failure(PlanError::Unreachable { start, goal }, Vec::new(), 0);
        }
        let mut expanded = Vec::new();
        let result = astar(
            &start,
            |node| eval.successors(*node),
            |point| (eval.heuristic(point, &goal) as f32 * self.heuristic_factor) as i32,
            |point| *point == goal,
            &mut expanded,
        );
        let expansions = expanded.len();
        match result {
            Some((path, cost)) => PlanResult::success(path, cost, expanded, expansions),
            None => {
                warn!("Reachable goal could not be pathed to, is reachable graph correct?");
                PlanResult::failure(PlanError::Unreachable { start, goal }, expanded, expansions)
            }
        }
    }
}
