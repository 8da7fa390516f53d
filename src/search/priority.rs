//! One indexed-removable min-heap per motif node, used to pick the cheapest unmapped
//! motif node to map next.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::graph::NodeId;
use crate::motif::MotifNodeId;

/// A pending candidate-list narrowing: mapping `start_node` to motif position
/// `from_pos` induced a restriction on `to_pos`'s candidates, whose current size is
/// `num_neighbors`.
#[derive(Debug, Clone, Copy)]
pub struct PriorityObject {
    pub start_node: NodeId,
    pub from_pos: MotifNodeId,
    pub to_pos: MotifNodeId,
    pub num_neighbors: usize,
}

impl PartialEq for PriorityObject {
    fn eq(&self, other: &Self) -> bool {
        self.num_neighbors == other.num_neighbors
    }
}
impl Eq for PriorityObject {}

impl PartialOrd for PriorityObject {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for PriorityObject {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.num_neighbors.cmp(&other.num_neighbors)
    }
}

/// Min-heap (by `num_neighbors`) of [`PriorityObject`]s headed for one motif node.
#[derive(Debug, Default)]
pub struct PriorityQueue {
    heap: BinaryHeap<Reverse<PriorityObject>>,
}

impl PriorityQueue {
    fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, obj: PriorityObject) {
        self.heap.push(Reverse(obj));
    }

    fn peek(&self) -> Option<&PriorityObject> {
        self.heap.peek().map(|Reverse(o)| o)
    }

    /// Removes every pending entry that came from motif position `from_pos`.
    /// Amortized-inefficient scan-and-rebuild, same trade-off the original tool
    /// makes with `list.index` + `heapq.heapify` -- fine at the motif sizes this
    /// engine targets.
    fn remove_from(&mut self, from_pos: MotifNodeId) {
        if !self.heap.iter().any(|Reverse(o)| o.from_pos == from_pos) {
            return;
        }
        let kept: Vec<Reverse<PriorityObject>> =
            std::mem::take(&mut self.heap).into_iter().filter(|Reverse(o)| o.from_pos != from_pos).collect();
        self.heap = kept.into_iter().collect();
    }
}

/// One [`PriorityQueue`] per motif node.
#[derive(Debug)]
pub struct PriorityQueueMap {
    queues: Vec<PriorityQueue>,
}

impl PriorityQueueMap {
    pub fn new(n: usize) -> Self {
        Self {
            queues: (0..n).map(|_| PriorityQueue::new()).collect(),
        }
    }

    pub fn add(&mut self, obj: PriorityObject) {
        self.queues[obj.to_pos.index()].add(obj);
    }

    pub fn remove_from(&mut self, to_pos: MotifNodeId, from_pos: MotifNodeId) {
        self.queues[to_pos.index()].remove_from(from_pos);
    }

    /// The cheapest pending entry among `indices`, without removing it.
    pub fn poll(&self, indices: impl Iterator<Item = MotifNodeId>) -> Option<PriorityObject> {
        indices.filter_map(|i| self.queues[i.index()].peek()).min_by_key(|o| o.num_neighbors).copied()
    }
}
