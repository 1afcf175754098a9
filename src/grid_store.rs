use core::ops::{Index, IndexMut};

use grid_util::point::Point;

use crate::node::{Cost, LpaNode, INF};

/// Owns every [LpaNode] of a planning session in a flat, row-major array of slots. A slot stays
/// empty until the cell is first referenced by the search.
#[derive(Clone, Debug, Default)]
pub struct GridStore {
    width: usize,
    height: usize,
    nodes: Vec<Option<LpaNode>>,
    populated: usize,
}

impl GridStore {
    pub fn new(width: usize, height: usize) -> GridStore {
        GridStore {
            width,
            height,
            nodes: vec![None; width * height],
            populated: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of populated slots.
    pub fn populated(&self) -> usize {
        self.populated
    }

    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width
            && (point.y as usize) < self.height
    }

    pub fn compute_ix(&self, point: Point) -> usize {
        debug_assert!(self.in_bounds(point));
        point.y as usize * self.width + point.x as usize
    }

    pub fn get(&self, ix: usize) -> Option<&LpaNode> {
        self.nodes.get(ix).and_then(Option::as_ref)
    }

    pub fn get_point(&self, point: Point) -> Option<&LpaNode> {
        if self.in_bounds(point) {
            self.get(self.compute_ix(point))
        } else {
            None
        }
    }

    /// `g` of the node at `ix`, treating an empty slot as unreached.
    pub fn g(&self, ix: usize) -> Cost {
        self.get(ix).map_or(INF, |node| node.g)
    }

    /// Returns the index of the node at `point`, creating it with `g = rhs = INF` and the given
    /// heuristic on first access.
    pub fn ensure<F>(&mut self, point: Point, heuristic: F) -> usize
    where
        F: FnOnce(&Point) -> Cost,
    {
        let ix = self.compute_ix(point);
        let slot = &mut self.nodes[ix];
        if slot.is_none() {
            *slot = Some(LpaNode::new(point, ix, heuristic(&point)));
            self.populated += 1;
        }
        ix
    }

    /// Drops every node and resizes the store for a new session.
    pub fn reset(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.nodes.clear();
        self.nodes.resize(width * height, None);
        self.populated = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &LpaNode> {
        self.nodes.iter().flatten()
    }
}

impl Index<usize> for GridStore {
    type Output = LpaNode;

    fn index(&self, ix: usize) -> &LpaNode {
        self.nodes[ix]
            .as_ref()
            .unwrap_or_else(|| panic!("node slot {ix} is not populated"))
    }
}

impl IndexMut<usize> for GridStore {
    fn index_mut(&mut self, ix: usize) -> &mut LpaNode {
        self.nodes[ix]
            .as_mut()
            .unwrap_or_else(|| panic!("node slot {ix} is not populated"))
    }
}
