//! One-shot A* used by [AstarPlanner](crate::planner::astar::AstarPlanner).
//!
//! Parents and best costs live in an insertion-ordered map, so a node is identified by its
//! index there and the heap only carries indices. Every expanded node is reported to the
//! caller, which lets a from-scratch search be compared with the incremental planner on equal
//! terms.
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

use fxhash::FxBuildHasher;
use indexmap::map::Entry;
use indexmap::IndexMap;
use num_traits::Zero;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Heap entry; the heap is a max-heap, so the ordering is reversed on `f`.
struct Frontier<C> {
    f: C,
    g: C,
    index: usize,
}

impl<C: PartialEq> PartialEq for Frontier<C> {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.g == other.g
    }
}

impl<C: PartialEq> Eq for Frontier<C> {}

impl<C: Ord> PartialOrd for Frontier<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord> Ord for Frontier<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lowest f first; among equal f the larger g, which lies closer to the goal.
        other.f.cmp(&self.f).then_with(|| self.g.cmp(&other.g))
    }
}

/// Follows parent indices from `index` back to the root and returns the nodes root first.
fn backtrack<N: Clone, C>(parents: &FxIndexMap<N, (usize, C)>, index: usize) -> Vec<N> {
    let mut current = Some(index);
    let mut path: Vec<N> = std::iter::from_fn(|| {
        let (node, &(parent, _)) = parents.get_index(current?)?;
        current = (parent != usize::MAX).then_some(parent);
        Some(node.clone())
    })
    .collect();
    path.reverse();
    path
}

/// Best-first search from `start` until `success` holds. Returns the path and its cost.
/// Expanded nodes are appended to `expanded` in expansion order.
pub fn astar<N, C, FN, IN, FH, FS>(
    start: &N,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
    expanded: &mut Vec<N>,
) -> Option<(Vec<N>, C)>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    let mut frontier = BinaryHeap::new();
    frontier.push(Frontier {
        f: C::zero(),
        g: C::zero(),
        index: 0,
    });
    let mut parents: FxIndexMap<N, (usize, C)> = FxIndexMap::default();
    parents.insert(start.clone(), (usize::MAX, C::zero()));

    while let Some(Frontier { g, index, .. }) = frontier.pop() {
        let (node, &(_, best)) = parents.get_index(index)?;
        // Stale entry left behind by a later improvement.
        if g > best {
            continue;
        }
        expanded.push(node.clone());
        if success(node) {
            return Some((backtrack(&parents, index), g));
        }
        for (next, step) in successors(node) {
            let next_g = g + step;
            let (next_index, h) = match parents.entry(next) {
                Entry::Vacant(e) => {
                    let h = heuristic(e.key());
                    let next_index = e.index();
                    e.insert((index, next_g));
                    (next_index, h)
                }
                Entry::Occupied(mut e) if next_g < e.get().1 => {
                    let h = heuristic(e.key());
                    e.insert((index, next_g));
                    (e.index(), h)
                }
                Entry::Occupied(_) => continue,
            };
            frontier.push(Frontier {
                f: next_g + h,
                g: next_g,
                index: next_index,
            });
        }
    }
    None
}
