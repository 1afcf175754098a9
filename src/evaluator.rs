use grid_util::point::Point;
use itertools::iproduct;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::config::PlannerConfig;
use crate::costmap::Costmap;
use crate::node::{add_cost, Cost, INF};
use crate::{C, D, E, N_SMALLVEC_SIZE};

/// Moore neighbourhood offsets, clockwise starting north.
const MOORE_OFFSETS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Derives heuristics, traversability and edge costs from a raw [Costmap].
#[derive(Clone, Copy, Debug)]
pub struct CostEvaluator<'a> {
    costmap: &'a Costmap,
    lethal_cost: u8,
    cost_weight: u32,
}

impl<'a> CostEvaluator<'a> {
    pub fn new(costmap: &'a Costmap, config: &PlannerConfig) -> CostEvaluator<'a> {
        CostEvaluator {
            costmap,
            lethal_cost: config.lethal_cost,
            cost_weight: config.cost_weight,
        }
    }

    pub fn costmap(&self) -> &'a Costmap {
        self.costmap
    }

    /// Octile distance using C for cardinal and D for diagonal steps.
    pub fn heuristic(&self, p1: &Point, p2: &Point) -> Cost {
        let delta_x = (p1.x - p2.x).abs();
        let delta_y = (p1.y - p2.y).abs();
        // Formula from https://github.com/riscy/a_star_on_grids
        // to efficiently compute the cost of a path taking the maximal amount
        // of diagonal steps before going straight
        (E * (delta_x - delta_y).abs() + D * (delta_x + delta_y)) / 2
    }

    pub fn is_lethal_cost(&self, raw: u8) -> bool {
        raw >= self.lethal_cost
    }

    /// Out-of-bounds cells count as lethal.
    pub fn is_lethal(&self, point: Point) -> bool {
        self.costmap
            .get_checked(point)
            .map_or(true, |raw| self.is_lethal_cost(raw))
    }

    /// Whether the move between the adjacent cells `a` and `b` is impossible. A diagonal move is
    /// also blocked when either of the two orthogonal cells it passes between is lethal.
    pub fn is_blocked(&self, a: Point, b: Point) -> bool {
        debug_assert!((a.x - b.x).abs() <= 1 && (a.y - b.y).abs() <= 1);
        if self.is_lethal(a) || self.is_lethal(b) {
            return true;
        }
        a.x != b.x
            && a.y != b.y
            && (self.is_lethal(Point::new(a.x, b.y)) || self.is_lethal(Point::new(b.x, a.y)))
    }

    /// Movement cost between adjacent cells, ignoring cell costs.
    pub fn base_cost(&self, a: Point, b: Point) -> Cost {
        if a.x != b.x && a.y != b.y {
            D
        } else {
            C
        }
    }

    /// Cost of moving from `a` to the adjacent cell `b`, or [INF] if the move is blocked.
    pub fn edge_cost(&self, a: Point, b: Point) -> Cost {
        if self.is_blocked(a, b) {
            return INF;
        }
        let penalty = u64::from(self.cost_weight) * u64::from(self.costmap.get(b));
        add_cost(
            self.base_cost(a, b),
            Cost::try_from(penalty).unwrap_or(INF),
        )
    }

    /// In-bounds grid neighbours of `point`, whether traversable or not.
    pub fn neighbors(&self, point: Point) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        MOORE_OFFSETS
            .iter()
            .map(|&(dx, dy)| Point::new(point.x + dx, point.y + dy))
            .filter(|p| self.costmap.in_bounds(*p))
            .collect()
    }

    /// Neighbours reachable from `point` with their edge costs.
    pub fn successors(&self, point: Point) -> SmallVec<[(Point, Cost); N_SMALLVEC_SIZE]> {
        self.neighbors(point)
            .into_iter()
            .map(|p| (p, self.edge_cost(point, p)))
            .filter(|&(_, cost)| cost != INF)
            .collect()
    }

    /// Whether a change of a cell's raw cost from `old` to `new` changes any edge cost.
    pub fn cell_changed(&self, old: u8, new: u8) -> bool {
        let old_lethal = self.is_lethal_cost(old);
        let new_lethal = self.is_lethal_cost(new);
        old_lethal != new_lethal || (!new_lethal && self.cost_weight != 0 && old != new)
    }

    /// Cells whose cost change since `previous` affects traversal. With a window `(centre, size)`
    /// only the `size x size` square around `centre` is compared.
    pub fn changed_cells(
        &self,
        previous: &Costmap,
        window: Option<(Point, usize)>,
    ) -> Vec<Point> {
        debug_assert_eq!(previous.dimensions(), self.costmap.dimensions());
        let (w, h) = self.costmap.dimensions();
        let (x_range, y_range) = match window {
            Some((centre, size)) => {
                // A window larger than the grid covers all of it.
                let half = i32::try_from(size / 2)
                    .unwrap_or(i32::MAX)
                    .min(w.max(h) as i32);
                (
                    (centre.x - half).max(0)..(centre.x + half + 1).min(w as i32),
                    (centre.y - half).max(0)..(centre.y + half + 1).min(h as i32),
                )
            }
            None => (0..w as i32, 0..h as i32),
        };
        iproduct!(y_range, x_range)
            .map(|(y, x)| Point::new(x, y))
            .filter(|&p| self.cell_changed(previous.get(p), self.costmap.get(p)))
            .collect()
    }

    /// Summed edge costs along a path; [INF] if any step is blocked or not between neighbours.
    pub fn path_cost(&self, path: &[Point]) -> Cost {
        path.windows(2).fold(0, |total, step| {
            let (a, b) = (step[0], step[1]);
            if (a.x - b.x).abs() > 1 || (a.y - b.y).abs() > 1 || a == b {
                INF
            } else {
                add_cost(total, self.edge_cost(a, b))
            }
        })
    }

    /// Groups cells connected by traversable edges into components.
    pub fn components(&self) -> UnionFind<usize> {
        let (w, h) = self.costmap.dimensions();
        let mut components = UnionFind::new(w * h);
        for y in 0..h as i32 {
            for x in 0..w as i32 {
                let point = Point::new(x, y);
                if self.is_lethal(point) {
                    continue;
                }
                let parent_ix = self.costmap.compute_ix(point);
                // Visiting every cell, linking half of the neighbourhood covers every edge once.
                [
                    Point::new(x + 1, y),
                    Point::new(x + 1, y + 1),
                    Point::new(x, y + 1),
                    Point::new(x - 1, y + 1),
                ]
                .into_iter()
                .filter(|p| self.costmap.in_bounds(*p) && !self.is_blocked(point, *p))
                .for_each(|p| {
                    components.union(parent_ix, self.costmap.compute_ix(p));
                });
            }
        }
        components
    }

    /// Checks if start and goal are in bounds and on the same component.
    pub fn reachable(&self, components: &UnionFind<usize>, start: &Point, goal: &Point) -> bool {
        self.costmap.in_bounds(*start)
            && self.costmap.in_bounds(*goal)
            && !self.is_lethal(*start)
            && !self.is_lethal(*goal)
            && components.equiv(
                self.costmap.compute_ix(*start),
                self.costmap.compute_ix(*goal),
            )
    }
}
