use grid_util::point::Point;

use crate::open_list::OpenToken;

/// Integer path cost. Integer costs keep the `g == rhs` consistency test exact.
pub type Cost = i32;

/// Sentinel for "no known path". Every cost addition saturates at this value.
pub const INF: Cost = Cost::MAX;

/// Adds two costs, saturating at [INF] so that combining an infinite (or near-infinite)
/// cost with anything stays infinite instead of wrapping around.
#[inline(always)]
pub fn add_cost(a: Cost, b: Cost) -> Cost {
    if a == INF || b == INF {
        INF
    } else {
        a.saturating_add(b)
    }
}

/// Two-component priority. Ordered lexicographically: first on `min(g, rhs) + h`, then on
/// `min(g, rhs)` to break ties between nodes with the same estimated total cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(pub Cost, pub Cost);

impl Key {
    pub const INFINITE: Key = Key(INF, INF);
}

/// Per-cell search record. The identifier of a node is its row-major cell index, which is
/// also the slot it occupies in the [GridStore](crate::grid_store::GridStore).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LpaNode {
    pub point: Point,
    pub id: usize,
    /// Best known cost from the start.
    pub g: Cost,
    /// One-step lookahead cost computed from the predecessors' `g` values.
    pub rhs: Cost,
    /// Heuristic estimate to the goal of the session that created this node.
    pub h: Cost,
    /// Predecessor realising `rhs`, if any.
    pub parent: Option<usize>,
    pub key: Key,
    pub(crate) open: Option<OpenToken>,
    pub(crate) expanded: bool,
}

impl LpaNode {
    pub fn new(point: Point, id: usize, h: Cost) -> LpaNode {
        LpaNode {
            point,
            id,
            g: INF,
            rhs: INF,
            h,
            parent: None,
            key: Key::INFINITE,
            open: None,
            expanded: false,
        }
    }

    pub fn calculate_key(&self) -> Key {
        let k2 = self.g.min(self.rhs);
        Key(add_cost(k2, self.h), k2)
    }

    pub fn is_consistent(&self) -> bool {
        self.g == self.rhs
    }

    /// `g > rhs`: a cheaper way to reach the node has been found.
    pub fn is_overconsistent(&self) -> bool {
        self.g > self.rhs
    }

    /// `g < rhs`: the node became more expensive to reach, e.g. behind a new obstacle.
    pub fn is_underconsistent(&self) -> bool {
        self.g < self.rhs
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }
}
