//! The incremental search core of Lifelong Planning A*.
//!
//! Every node keeps two cost estimates: `g`, the cost the search currently believes, and `rhs`,
//! a one-step lookahead computed from the predecessors' `g` values. A node is queued on the
//! [OpenList] exactly when the two disagree. [LpaSearch::compute_shortest_path] settles queued
//! nodes in key order until the goal is consistent and nothing left in the queue could still
//! lower its cost. After an edit to the map only the endpoints of changed edges are fed back
//! through [LpaSearch::update_vertex], so the next run repairs that region instead of starting
//! over.
use grid_util::point::Point;
use log::error;

use crate::error::PlanError;
use crate::evaluator::CostEvaluator;
use crate::grid_store::GridStore;
use crate::node::{add_cost, Cost, LpaNode, INF};
use crate::open_list::OpenList;

#[derive(Clone, Debug)]
pub struct LpaSearch {
    start: Point,
    goal: Point,
    start_ix: usize,
    goal_ix: usize,
    store: GridStore,
    open: OpenList,
    /// Distinct coordinates expanded since the session started, in first-expansion order.
    expanded: Vec<Point>,
}

impl LpaSearch {
    /// Starts a fresh search rooted at `start`. The start is seeded with `rhs = 0` and queued.
    pub fn new(eval: &CostEvaluator, start: Point, goal: Point) -> LpaSearch {
        let costmap = eval.costmap();
        let mut search = LpaSearch {
            start,
            goal,
            start_ix: 0,
            goal_ix: 0,
            store: GridStore::new(costmap.width(), costmap.height()),
            open: OpenList::new(),
            expanded: Vec::new(),
        };
        search.reset(eval, start, goal);
        search
    }

    /// Discards every node and the open list, then seeds a new session.
    pub fn reset(&mut self, eval: &CostEvaluator, start: Point, goal: Point) {
        let costmap = eval.costmap();
        self.store.reset(costmap.width(), costmap.height());
        self.open.clear();
        self.expanded.clear();
        self.start = start;
        self.goal = goal;
        self.start_ix = self.ensure(eval, start);
        self.goal_ix = self.ensure(eval, goal);
        self.store[self.start_ix].rhs = 0;
        self.update_vertex(eval, self.start_ix);
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn goal(&self) -> Point {
        self.goal
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.store.width(), self.store.height())
    }

    pub fn store(&self) -> &GridStore {
        &self.store
    }

    pub fn open_list(&self) -> &OpenList {
        &self.open
    }

    pub fn expanded(&self) -> &[Point] {
        &self.expanded
    }

    pub fn node(&self, point: Point) -> Option<&LpaNode> {
        self.store.get_point(point)
    }

    pub fn goal_cost(&self) -> Cost {
        self.store[self.goal_ix].g
    }

    fn ensure(&mut self, eval: &CostEvaluator, point: Point) -> usize {
        let goal = self.goal;
        self.store.ensure(point, |p| eval.heuristic(p, &goal))
    }

    fn mark_expanded(&mut self, ix: usize) {
        let node = &mut self.store[ix];
        if !node.expanded {
            node.expanded = true;
            self.expanded.push(node.point);
        }
    }

    /// Best predecessor of `point` among the populated nodes, as `(g(p) + c(p, point), p)`.
    /// Unpopulated predecessors have `g = INF` and can never improve on it.
    fn best_predecessor(&self, eval: &CostEvaluator, point: Point) -> Option<(Cost, usize)> {
        eval.neighbors(point)
            .into_iter()
            .filter_map(|p| {
                let pred = self.store.get_point(p)?;
                let cost = add_cost(pred.g, eval.edge_cost(p, point));
                (cost != INF).then_some((cost, pred.id))
            })
            // min_by_key keeps the first of equal minima, so ties resolve in neighbour order
            .min_by_key(|&(cost, _)| cost)
    }

    /// Recomputes `rhs` of the node at `ix` and requeues it if it is inconsistent.
    pub fn update_vertex(&mut self, eval: &CostEvaluator, ix: usize) {
        if ix != self.start_ix {
            let best = self.best_predecessor(eval, self.store[ix].point);
            let node = &mut self.store[ix];
            node.rhs = best.map_or(INF, |(cost, _)| cost);
            node.parent = best.map(|(_, p)| p);
        }
        let node = &mut self.store[ix];
        if let Some(token) = node.open.take() {
            self.open.remove(token);
        }
        if !node.is_consistent() {
            node.key = node.calculate_key();
            node.open = Some(self.open.insert(node.key, ix));
        }
    }

    /// Feeds every populated node around a changed cell back through [Self::update_vertex].
    /// Those are the destinations of all edges whose cost depends on the cell.
    pub fn repair_cell(&mut self, eval: &CostEvaluator, point: Point) {
        let affected = std::iter::once(point).chain(eval.neighbors(point));
        for p in affected {
            if let Some(node) = self.store.get_point(p) {
                let ix = node.id;
                self.update_vertex(eval, ix);
            }
        }
    }

    /// Expands nodes until the goal is locally consistent and no queued key is below the goal's.
    /// Returns the number of expansions. With a `limit` the loop stops early with
    /// [PlanError::ExpansionLimit], leaving the open list intact for a later call.
    pub fn compute_shortest_path(
        &mut self,
        eval: &CostEvaluator,
        limit: Option<usize>,
    ) -> Result<usize, PlanError> {
        let mut expansions = 0;
        while let Some((top_key, ix)) = self.open.peek() {
            let goal = &self.store[self.goal_ix];
            if top_key >= goal.calculate_key() && goal.is_consistent() {
                break;
            }
            if let Some(limit) = limit {
                if expansions >= limit {
                    return Err(PlanError::ExpansionLimit { limit });
                }
            }
            self.open.pop();
            self.store[ix].open = None;
            self.mark_expanded(ix);
            expansions += 1;

            let node = &mut self.store[ix];
            let point = node.point;
            if node.is_overconsistent() {
                node.g = node.rhs;
            } else {
                node.g = INF;
                self.update_vertex(eval, ix);
            }
            for v in eval.neighbors(point) {
                let v_ix = self.ensure(eval, v);
                self.update_vertex(eval, v_ix);
            }
        }
        Ok(expansions)
    }

    /// Walks from the goal to the start, always stepping to the predecessor minimising
    /// `g(p) + c(p, current)`. Every visited coordinate is recorded as expanded.
    pub fn extract_path(&mut self, eval: &CostEvaluator) -> Result<Vec<Point>, PlanError> {
        if self.goal_cost() == INF {
            return Err(PlanError::Unreachable {
                start: self.start,
                goal: self.goal,
            });
        }
        let max_steps = self.store.capacity();
        let mut path = vec![self.goal];
        let mut current = self.goal_ix;
        self.mark_expanded(current);
        while current != self.start_ix {
            if path.len() > max_steps {
                error!(
                    "Path extraction from {} to {} exceeded {} steps, search state is inconsistent",
                    self.goal, self.start, max_steps
                );
                return Err(PlanError::ExtractionCycle { steps: max_steps });
            }
            let point = self.store[current].point;
            match self.best_predecessor(eval, point) {
                Some((_, next)) => {
                    current = next;
                    self.mark_expanded(current);
                    path.push(self.store[current].point);
                }
                None => {
                    error!(
                        "Path extraction stalled at {} with g = {}",
                        point, self.store[current].g
                    );
                    return Err(PlanError::ExtractionStalled(point));
                }
            }
        }
        path.reverse();
        Ok(path)
    }
}
