use grid_util::point::Point;
use log::{debug, error, info, warn};

use crate::config::PlannerConfig;
use crate::costmap::Costmap;
use crate::error::PlanError;
use crate::evaluator::CostEvaluator;
use crate::node::Cost;
use crate::planner::{check_bounds, GridPlanner, PlanResult};
use crate::search::LpaSearch;

/// Why a planning call discarded the previous search instead of repairing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionReset {
    /// No session existed yet.
    Fresh,
    GoalChanged,
    DimensionsChanged,
    /// The start moved and no scan window is configured to tolerate drift.
    StartChanged,
    /// The start moved further from the current path than half the scan window.
    DriftedOutOfWindow,
}

/// Incremental planner. Keeps one [LpaSearch] per goal and, between calls, repairs it using the
/// cells whose cost changed since the previous costmap instead of searching from scratch.
///
/// The search stays rooted at the start it was created with. When a scan window is configured
/// the robot may drift within it without resetting the session; the returned path then still
/// begins at the session's start and [LpaStar::get_state] tells where to resume following it.
/// Only cells inside the window around that point are compared and taken over on each call, so
/// changes elsewhere stay unseen until the window passes over them.
#[derive(Clone, Debug, Default)]
pub struct LpaStar {
    pub config: PlannerConfig,
    search: Option<LpaSearch>,
    previous: Option<Costmap>,
    path: Vec<Point>,
    last_reset: Option<SessionReset>,
}

impl LpaStar {
    pub fn new(config: PlannerConfig) -> LpaStar {
        LpaStar {
            config,
            ..LpaStar::default()
        }
    }

    /// Drops the session, so the next call starts a fresh search.
    pub fn reset(&mut self) {
        self.search = None;
        self.previous = None;
        self.path.clear();
        self.last_reset = None;
    }

    pub fn search(&self) -> Option<&LpaSearch> {
        self.search.as_ref()
    }

    /// Path of the most recent successful call.
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Reset performed by the most recent call, if it performed one.
    pub fn last_reset(&self) -> Option<SessionReset> {
        self.last_reset
    }

    pub fn expanded(&self) -> &[Point] {
        self.search
            .as_ref()
            .map(|search| search.expanded())
            .unwrap_or(&[])
    }

    /// Point of the current path closest to `current`. Without a path this is the session's
    /// start, or `current` itself if there is no session.
    pub fn get_state(&self, current: Point) -> Point {
        let distance = |p: &Point| {
            let (dx, dy) = ((p.x - current.x) as i64, (p.y - current.y) as i64);
            dx * dx + dy * dy
        };
        self.path
            .iter()
            .copied()
            // min_by_key keeps the earliest of equally close points
            .min_by_key(distance)
            .or_else(|| self.search.as_ref().map(|search| search.start()))
            .unwrap_or(current)
    }

    /// Decides whether the stored session can be repaired for this query.
    pub fn session_staleness(
        &self,
        costmap: &Costmap,
        start: Point,
        goal: Point,
    ) -> Option<SessionReset> {
        let search = match &self.search {
            Some(search) => search,
            None => return Some(SessionReset::Fresh),
        };
        if search.goal() != goal {
            return Some(SessionReset::GoalChanged);
        }
        if search.dimensions() != costmap.dimensions() {
            return Some(SessionReset::DimensionsChanged);
        }
        if search.start() != start {
            match self.config.scan_window {
                None => return Some(SessionReset::StartChanged),
                Some(size) => {
                    let anchor = self.get_state(start);
                    let drift = (anchor.x - start.x).abs().max((anchor.y - start.y).abs());
                    if drift as usize > size / 2 {
                        return Some(SessionReset::DriftedOutOfWindow);
                    }
                }
            }
        }
        None
    }

    fn replan(
        &mut self,
        costmap: &Costmap,
        start: Point,
        goal: Point,
    ) -> Result<(Vec<Point>, Cost, usize), (PlanError, usize)> {
        check_bounds(costmap, start, goal).map_err(|e| (e, 0))?;
        let reset = self.session_staleness(costmap, start, goal);
        let window = self
            .config
            .scan_window
            .map(|size| (self.get_state(start), size));
        self.last_reset = reset;

        // The search runs on the last perceived map. With a scan window only the cells inside it
        // are taken over from `costmap`, the rest keep their previously seen costs.
        let changed = match self.previous.as_mut() {
            Some(previous) if reset.is_none() => {
                let current = CostEvaluator::new(costmap, &self.config);
                let changed = current.changed_cells(previous, window);
                match window {
                    Some(_) => {
                        for &p in &changed {
                            previous.set(p, costmap.get(p));
                        }
                    }
                    None => previous.clone_from(costmap),
                }
                changed
            }
            Some(previous) => {
                previous.clone_from(costmap);
                Vec::new()
            }
            None => {
                self.previous = Some(costmap.clone());
                Vec::new()
            }
        };
        let perceived = self.previous.as_ref().unwrap_or(costmap);
        let eval = CostEvaluator::new(perceived, &self.config);

        let search = match (reset, self.search.take()) {
            (None, Some(mut search)) => {
                debug!("Repairing LPA* search around {} changed cells", changed.len());
                for p in changed {
                    search.repair_cell(&eval, p);
                }
                search
            }
            (reason, search) => {
                info!(
                    "Starting LPA* session from {} to {} ({:?})",
                    start,
                    goal,
                    reason.unwrap_or(SessionReset::Fresh)
                );
                self.path.clear();
                match search {
                    Some(mut search) => {
                        search.reset(&eval, start, goal);
                        search
                    }
                    None => LpaSearch::new(&eval, start, goal),
                }
            }
        };
        let search = self.search.insert(search);

        let expansions = search
            .compute_shortest_path(&eval, self.config.max_expansions)
            .map_err(|e| (e, self.config.max_expansions.unwrap_or(0)))?;
        debug!(
            "LPA* settled after {} expansions, {} nodes populated, {} queued",
            expansions,
            search.store().populated(),
            search.open_list().len()
        );
        match search.extract_path(&eval) {
            Ok(path) => {
                let cost = search.goal_cost();
                self.path.clone_from(&path);
                Ok((path, cost, expansions))
            }
            Err(e) => {
                self.path.clear();
                Err((e, expansions))
            }
        }
    }
}

impl GridPlanner for LpaStar {
    fn plan(&mut self, costmap: &Costmap, start: Point, goal: Point) -> PlanResult {
        match self.replan(costmap, start, goal) {
            Ok((path, cost, expansions)) => {
                PlanResult::success(path, cost, self.expanded().to_vec(), expansions)
            }
            Err((e, expansions)) => {
                if e.is_internal() {
                    error!("LPA* consistency violated: {}", e);
                } else {
                    warn!("LPA* found no path: {}", e);
                }
                PlanResult::failure(e, self.expanded().to_vec(), expansions)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costmap::costs;
    use crate::node::INF;
    use crate::planner::astar::AstarPlanner;
    use crate::{C, D};

    fn straight_corridor() -> (Costmap, Point, Point) {
        (
            Costmap::filled(20, 9, costs::FREE),
            Point::new(1, 4),
            Point::new(18, 4),
        )
    }

    fn reference_cost(costmap: &Costmap, start: Point, goal: Point) -> Option<Cost> {
        AstarPlanner::default().plan(costmap, start, goal).cost
    }

    #[test]
    fn start_equals_goal() {
        let costmap = Costmap::filled(5, 5, costs::FREE);
        let mut planner = LpaStar::default();
        let p = Point::new(2, 2);
        let result = planner.plan(&costmap, p, p);
        assert!(result.found);
        assert_eq!(result.path, vec![p]);
        assert_eq!(result.expanded, vec![p]);
        assert_eq!(result.expansions, 1);
        assert_eq!(result.cost, Some(0));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let mut costmap = Costmap::filled(15, 15, costs::FREE);
        costmap.set_rect(5, 2, 1, 10, costs::LETHAL);
        let mut planner = LpaStar::default();
        let first = planner.plan(&costmap, Point::new(1, 7), Point::new(13, 6));
        let second = planner.plan(&costmap, Point::new(1, 7), Point::new(13, 6));
        assert!(first.found);
        assert_eq!(first.path, second.path);
        assert_eq!(first.expanded, second.expanded);
        assert_eq!(second.expansions, 0);
        assert_eq!(planner.last_reset(), None);
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let mut costmap = Costmap::filled(8, 8, costs::FREE);
        costmap.set_rect(4, 4, 3, 3, costs::LETHAL);
        costmap.set(Point::new(5, 5), costs::FREE);
        let mut planner = LpaStar::default();
        let goal = Point::new(5, 5);
        let result = planner.plan(&costmap, Point::new(0, 0), goal);
        assert!(!result.found);
        assert!(result.path.is_empty());
        assert!(matches!(result.failure, Some(PlanError::Unreachable { .. })));
        let node = planner.search().unwrap().node(goal).unwrap();
        assert_eq!(node.g, INF);
        assert!(planner.path().is_empty());
    }

    #[test]
    fn replans_around_new_obstacle() {
        let (mut costmap, start, goal) = straight_corridor();
        let mut planner = LpaStar::default();
        let first = planner.plan(&costmap, start, goal);
        assert_eq!(first.cost, Some(17 * C));
        let blocked = Point::new(9, 4);
        assert!(first.path.contains(&blocked));

        costmap.set(blocked, costs::LETHAL);
        let second = planner.plan(&costmap, start, goal);
        assert!(second.found);
        assert_eq!(planner.last_reset(), None);
        assert!(!second.path.contains(&blocked));
        assert_eq!(second.cost, reference_cost(&costmap, start, goal));
        assert_eq!(second.cost, Some(15 * C + 2 * D));
        let eval = CostEvaluator::new(&costmap, &planner.config);
        assert_eq!(Some(eval.path_cost(&second.path)), second.cost);

        // Clearing the obstacle again restores the straight line.
        costmap.set(blocked, costs::FREE);
        let third = planner.plan(&costmap, start, goal);
        assert_eq!(third.path, first.path);
    }

    #[test]
    fn raised_cell_cost_is_avoided() {
        let (mut costmap, start, goal) = straight_corridor();
        let mut planner = LpaStar::default();
        planner.plan(&costmap, start, goal);
        costmap.set(Point::new(9, 4), 200);
        let result = planner.plan(&costmap, start, goal);
        assert_eq!(result.cost, reference_cost(&costmap, start, goal));
        assert!(!result.path.contains(&Point::new(9, 4)));
    }

    #[test]
    fn weighted_cells_settle_quickly() {
        let mut costmap = Costmap::filled(6, 1, 200);
        costmap.set(Point::new(0, 0), costs::FREE);
        let config = PlannerConfig::default()
            .with_cost_weight(3)
            .with_max_expansions(100);
        let mut planner = LpaStar::new(config.clone());
        let (start, goal) = (Point::new(0, 0), Point::new(5, 0));
        let result = planner.plan(&costmap, start, goal);
        assert!(result.found, "{:?}", result.failure);
        assert!(result.expansions <= 6);
        assert_eq!(result.cost, Some(5 * (C + 3 * 200)));
        let reference = AstarPlanner::new(config).plan(&costmap, start, goal);
        assert_eq!(result.cost, reference.cost);
    }

    #[test]
    fn localized_edit_expands_little() {
        let (mut costmap, start, goal) = straight_corridor();
        let mut planner = LpaStar::default();
        let first = planner.plan(&costmap, start, goal);
        let cells = costmap.width() * costmap.height();

        // Far from the path: nothing there has been searched yet.
        costmap.set(Point::new(17, 0), costs::LETHAL);
        let far = planner.plan(&costmap, start, goal);
        assert_eq!(far.expansions, 0);
        assert_eq!(far.path, first.path);

        // On the path: only the region behind the obstacle is repaired.
        costmap.set(Point::new(14, 4), costs::LETHAL);
        let near = planner.plan(&costmap, start, goal);
        assert!(near.found);
        assert!(near.expansions > 0);
        assert!(near.expansions < cells / 4, "{} expansions", near.expansions);
    }

    #[test]
    fn diagonal_gaps_are_never_squeezed_through() {
        //  _____
        // |S #  |
        // |  #  |
        // |   # |
        // |   #G|
        //  -----
        // The wall has a diagonal gap between (2, 1) and (3, 2).
        let mut costmap = Costmap::filled(5, 4, costs::FREE);
        for p in [(2, 0), (2, 1), (3, 2), (3, 3)] {
            costmap.set(Point::new(p.0, p.1), costs::LETHAL);
        }
        let mut planner = LpaStar::default();
        let result = planner.plan(&costmap, Point::new(0, 0), Point::new(4, 3));
        assert!(!result.found);

        // With the wall removed a path exists but must not cut any corner.
        let mut costmap = Costmap::filled(5, 4, costs::FREE);
        costmap.set(Point::new(2, 1), costs::LETHAL);
        costmap.set(Point::new(3, 2), costs::LETHAL);
        let result = planner.plan(&costmap, Point::new(0, 0), Point::new(4, 3));
        assert!(result.found);
        let eval = CostEvaluator::new(&costmap, &planner.config);
        for step in result.path.windows(2) {
            assert!(!eval.is_blocked(step[0], step[1]));
        }
    }

    #[test]
    fn out_of_bounds_fails_without_touching_session() {
        let (mut costmap, start, goal) = straight_corridor();
        let mut planner = LpaStar::default();
        let result = planner.plan(&costmap, Point::new(-1, 0), goal);
        assert_eq!(
            result.failure,
            Some(PlanError::StartOutOfBounds(Point::new(-1, 0)))
        );
        assert!(planner.search().is_none());

        planner.plan(&costmap, start, goal);
        costmap.set(Point::new(9, 4), costs::LETHAL);
        let result = planner.plan(&costmap, start, Point::new(20, 4));
        assert_eq!(
            result.failure,
            Some(PlanError::GoalOutOfBounds(Point::new(20, 4)))
        );
        // The edit made during the failed call is still picked up afterwards.
        let result = planner.plan(&costmap, start, goal);
        assert!(!result.path.contains(&Point::new(9, 4)));
        assert_eq!(result.cost, reference_cost(&costmap, start, goal));
    }

    #[test]
    fn new_goal_resets_session() {
        let (costmap, start, goal) = straight_corridor();
        let mut planner = LpaStar::default();
        planner.plan(&costmap, start, goal);
        assert_eq!(planner.last_reset(), Some(SessionReset::Fresh));
        let result = planner.plan(&costmap, start, Point::new(10, 8));
        assert_eq!(planner.last_reset(), Some(SessionReset::GoalChanged));
        assert_eq!(result.cost, reference_cost(&costmap, start, Point::new(10, 8)));
        assert!(result.expanded.iter().all(|p| p.x <= 11));

        let larger = Costmap::filled(30, 30, costs::FREE);
        planner.plan(&larger, start, Point::new(10, 8));
        assert_eq!(planner.last_reset(), Some(SessionReset::DimensionsChanged));

        planner.plan(&larger, Point::new(2, 4), Point::new(10, 8));
        assert_eq!(planner.last_reset(), Some(SessionReset::StartChanged));
    }

    #[test]
    fn drift_within_window_keeps_session() {
        let (costmap, start, goal) = straight_corridor();
        let mut planner = LpaStar::new(PlannerConfig::default().with_scan_window(6));
        planner.plan(&costmap, start, goal);

        let robot = Point::new(6, 5);
        assert_eq!(planner.get_state(robot), Point::new(6, 4));
        let result = planner.plan(&costmap, robot, goal);
        assert_eq!(planner.last_reset(), None);
        assert_eq!(result.path.first(), Some(&start));
        assert_eq!(result.expansions, 0);

        let lost = Point::new(6, 8);
        let result = planner.plan(&costmap, lost, goal);
        assert_eq!(planner.last_reset(), Some(SessionReset::DriftedOutOfWindow));
        assert_eq!(result.path.first(), Some(&lost));
    }

    #[test]
    fn scan_window_only_sees_nearby_changes() {
        let (mut costmap, start, goal) = straight_corridor();
        let mut planner = LpaStar::new(PlannerConfig::default().with_scan_window(6));
        planner.plan(&costmap, start, goal);

        // Outside the window around the start: ignored.
        costmap.set(Point::new(12, 4), costs::LETHAL);
        let result = planner.plan(&costmap, start, goal);
        assert_eq!(result.expansions, 0);
        assert!(result.path.contains(&Point::new(12, 4)));

        // Inside the window: repaired.
        costmap.set(Point::new(3, 4), costs::LETHAL);
        let result = planner.plan(&costmap, start, goal);
        assert!(result.expansions > 0);
        assert!(!result.path.contains(&Point::new(3, 4)));
    }

    #[test]
    fn expansion_limit_resumes_on_next_call() {
        let (costmap, start, goal) = straight_corridor();
        let mut planner = LpaStar::new(PlannerConfig::default().with_max_expansions(5));
        let result = planner.plan(&costmap, start, goal);
        assert_eq!(result.failure, Some(PlanError::ExpansionLimit { limit: 5 }));
        assert_eq!(result.expansions, 5);

        planner.config.max_expansions = None;
        let result = planner.plan(&costmap, start, goal);
        assert_eq!(planner.last_reset(), None);
        assert_eq!(result.cost, Some(17 * C));
    }

    #[test]
    fn explicit_reset_forgets_session() {
        let (costmap, start, goal) = straight_corridor();
        let mut planner = LpaStar::default();
        planner.plan(&costmap, start, goal);
        planner.reset();
        assert!(planner.search().is_none());
        assert!(planner.expanded().is_empty());
        assert_eq!(planner.get_state(Point::new(3, 3)), Point::new(3, 3));
        planner.plan(&costmap, start, goal);
        assert_eq!(planner.last_reset(), Some(SessionReset::Fresh));
    }
}
