#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! A* search over the arena grid.
//!
//! Every call builds a private node arena, consults the supplied
//! [`OccupancyOracle`] for each candidate neighbour and throws the arena away
//! before returning. Nothing is cached between calls because the set of
//! blocked cells changes whenever a snake moves.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
};

use snake_hunt_core::{Cell, OccupancyOracle};
use tracing::debug;

/// Finds the shortest 4-connected route from `start` to `goal`.
///
/// The returned cells run from the first step to `goal` and never include
/// `start`. An empty vector means the agent already stands on `goal`, while
/// `None` means the goal cannot be reached through walkable cells.
///
/// Among open nodes the search expands the lowest `f`, then the lowest `h`,
/// then whichever node entered the frontier first. Neighbours are visited in
/// [`Cell::neighbors`] order, so identical inputs always yield identical paths.
pub fn find_path<O>(start: Cell, goal: Cell, oracle: &O) -> Option<Vec<Cell>>
where
    O: OccupancyOracle + ?Sized,
{
    if start == goal {
        return Some(Vec::new());
    }

    let mut search = Search::new(goal);
    let root = search.open(start, None, 0);

    while let Some(entry) = search.frontier.pop() {
        let index = entry.node;
        if search.nodes[index].closed || search.nodes[index].g != entry.g {
            continue;
        }

        if search.nodes[index].cell == goal {
            let path = search.reconstruct(index, root);
            debug!(
                ?start,
                ?goal,
                steps = path.len(),
                expanded = search.expanded,
                "path found"
            );
            return Some(path);
        }

        search.nodes[index].closed = true;
        search.expanded += 1;

        let current = search.nodes[index].cell;
        let tentative = search.nodes[index].g + 1;
        for neighbor in current.neighbors() {
            match search.index.get(&neighbor).copied() {
                Some(existing) if search.nodes[existing].closed => continue,
                Some(existing) => {
                    if tentative < search.nodes[existing].g {
                        search.relax(existing, index, tentative);
                    }
                }
                None => {
                    if oracle.is_walkable(neighbor) {
                        let _ = search.open(neighbor, Some(index), tentative);
                    }
                }
            }
        }
    }

    debug!(?start, ?goal, expanded = search.expanded, "no path");
    None
}

#[derive(Debug)]
struct Node {
    cell: Cell,
    parent: Option<usize>,
    g: u64,
    h: u64,
    seq: u64,
    closed: bool,
}

/// Heap entry ordered so that [`BinaryHeap`] pops the best candidate first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Frontier {
    f: u64,
    h: u64,
    seq: u64,
    g: u64,
    node: usize,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
struct Search {
    goal: Cell,
    nodes: Vec<Node>,
    index: HashMap<Cell, usize>,
    frontier: BinaryHeap<Frontier>,
    next_seq: u64,
    expanded: usize,
}

impl Search {
    fn new(goal: Cell) -> Self {
        Self {
            goal,
            nodes: Vec::new(),
            index: HashMap::new(),
            frontier: BinaryHeap::new(),
            next_seq: 0,
            expanded: 0,
        }
    }

    fn open(&mut self, cell: Cell, parent: Option<usize>, g: u64) -> usize {
        let index = self.nodes.len();
        let seq = self.next_seq;
        self.next_seq += 1;
        self.nodes.push(Node {
            cell,
            parent,
            g,
            h: cell.manhattan_distance(self.goal),
            seq,
            closed: false,
        });
        let _ = self.index.insert(cell, index);
        self.push(index);
        index
    }

    /// Records a cheaper route to an open node; the stale heap entry is
    /// skipped when popped.
    fn relax(&mut self, index: usize, parent: usize, g: u64) {
        let node = &mut self.nodes[index];
        node.parent = Some(parent);
        node.g = g;
        self.push(index);
    }

    fn push(&mut self, index: usize) {
        let node = &self.nodes[index];
        self.frontier.push(Frontier {
            f: node.g.saturating_add(node.h),
            h: node.h,
            seq: node.seq,
            g: node.g,
            node: index,
        });
    }

    fn reconstruct(&self, goal: usize, root: usize) -> Vec<Cell> {
        let mut path = Vec::with_capacity(usize::try_from(self.nodes[goal].g).unwrap_or(0));
        let mut cursor = goal;
        while cursor != root {
            path.push(self.nodes[cursor].cell);
            match self.nodes[cursor].parent {
                Some(parent) => cursor = parent,
                None => break,
            }
        }
        path.reverse();
        path
    }
}
