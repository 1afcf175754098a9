//! # grid_lpastar
//!
//! Incremental path replanning on 2D costmaps with
//! [Lifelong Planning A*](https://en.wikipedia.org/wiki/Lifelong_Planning_A*). The planner keeps
//! its search state between calls: when only a few cells of the costmap change, the next query
//! repairs the affected part of the search instead of starting over. Movement is 8-connected with
//! octile costs, diagonal moves may not cut the corner of a lethal cell, and the cost of a cell
//! is added to every step entering it.
//!
//! A plain [A*](planner::astar::AstarPlanner) planner over the same cost model is included as a
//! reference and for one-off queries.
//!
//! ```
//! use grid_lpastar::{costs, Costmap, GridPlanner, LpaStar, Point};
//!
//! let mut costmap = Costmap::filled(10, 5, costs::FREE);
//! let mut planner = LpaStar::default();
//! let (start, goal) = (Point::new(0, 2), Point::new(9, 2));
//! assert!(planner.plan(&costmap, start, goal).found);
//!
//! costmap.set_rect(5, 0, 1, 4, costs::LETHAL);
//! let result = planner.plan(&costmap, start, goal);
//! assert!(result.path.contains(&Point::new(5, 4)));
//! ```
pub mod astar;
pub mod config;
pub mod costmap;
pub mod error;
pub mod evaluator;
pub mod grid_store;
pub mod node;
pub mod open_list;
pub mod planner;
pub mod search;

pub use config::PlannerConfig;
pub use costmap::{costs, Costmap};
pub use error::{CostmapError, PlanError};
pub use grid_util::point::Point;
pub use node::{Cost, INF};
pub use planner::astar::AstarPlanner;
pub use planner::lpa_star::{LpaStar, SessionReset};
pub use planner::{GridPlanner, PlanResult};

/// Cost of a cardinal move. Together with [D] this approximates a diagonal cost of
/// sqrt(2) using integers.
pub const C: Cost = 99;
/// Cost of a diagonal move.
pub const D: Cost = 140;
/// Difference used by the octile heuristic.
pub const E: Cost = 2 * C - D;

const N_SMALLVEC_SIZE: usize = 8;

/// Converts the integer cost to an approximate floating point equivalent where cardinal directions have cost 1.0.
pub fn convert_cost_to_unit_cost_float(cost: Cost) -> f64 {
    (cost as f64) / (C as f64)
}
