//! The backtracking search itself: maps motif nodes to host nodes depth-first,
//! narrowing each unmapped node's candidates as its neighbors get mapped and undoing
//! that narrowing on backtrack.

use std::collections::{BTreeSet, HashSet};

use fixedbitset::FixedBitSet;
use log::info;

use crate::graph::{HostGraph, NodeId};
use crate::motif::{Motif, MotifNodeId};
use crate::symmetry;

use super::candidate::CandidateIterator;
use super::priority::{PriorityObject, PriorityQueueMap};

/// One occurrence of the motif: `instance[i]` is the host node mapped to motif node `i`.
pub type MotifInstance = Vec<NodeId>;

/// Everything a search run produces.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub instances: Vec<MotifInstance>,
    /// Every host edge used by some instance, canonicalized as `(min, max)`. Populated
    /// only when the caller asked to save links.
    pub used_links: Option<BTreeSet<(NodeId, NodeId)>>,
}

fn canonical_pair(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Finds every occurrence of `motif` in `graph`. If `save_links` is set, also collects
/// the set of host edges touched by at least one instance.
pub struct SearchEngine;

impl SearchEngine {
    pub fn find_motif(graph: &HostGraph, motif: &Motif, save_links: bool) -> SearchOutcome {
        info!("performing motif search...");
        let n = motif.n();

        let mut iterators: Vec<CandidateIterator> = (0..n).map(|_| CandidateIterator::new()).collect();
        let mut best_node = None;
        let mut best_len = usize::MAX;

        for i in 0..n {
            let node = MotifNodeId::new(i);
            let kinds = motif.link_kind(node);
            let mut seen = HashSet::new();
            let mut smallest_for_node = usize::MAX;

            for &kind in kinds {
                if !seen.insert(kind) {
                    continue;
                }
                let list = graph.by_kind(kind).to_vec();
                smallest_for_node = smallest_for_node.min(list.len());
                iterators[i].add_restriction(list);
            }
            if seen.is_empty() {
                let list = graph.all_nodes();
                smallest_for_node = list.len();
                iterators[i].add_restriction(list);
            }

            if smallest_for_node < best_len {
                best_len = smallest_for_node;
                best_node = Some(node);
            }
        }

        let Some(start) = best_node else {
            return SearchOutcome::default();
        };

        let symmetry = symmetry::analyze(motif);

        let mut state = State {
            graph,
            motif,
            iterators,
            pq: PriorityQueueMap::new(n),
            smaller: symmetry.smaller,
            larger: symmetry.larger,
            mapped: vec![None; n],
            mapped_pos: FixedBitSet::with_capacity(n),
            used: FixedBitSet::with_capacity(graph.node_count().max(1)),
            outcome: SearchOutcome {
                instances: Vec::new(),
                used_links: save_links.then(BTreeSet::new),
            },
            cancelled: false,
        };

        state.search_node(start, 0);
        info!(
            "found {} instances of {} motif",
            state.outcome.instances.len(),
            motif.description()
        );
        state.outcome
    }
}

struct State<'g> {
    graph: &'g HostGraph,
    motif: &'g Motif,
    iterators: Vec<CandidateIterator>,
    pq: PriorityQueueMap,
    smaller: Vec<HashSet<MotifNodeId>>,
    larger: Vec<HashSet<MotifNodeId>>,
    mapped: Vec<Option<NodeId>>,
    mapped_pos: FixedBitSet,
    used: FixedBitSet,
    outcome: SearchOutcome,
    /// Carried for interface parity with the tool this engine is modeled on, which
    /// exposed a cancellation flag for cooperative parallel search. Never read here:
    /// this engine is single-threaded and always runs to completion.
    #[allow(dead_code)]
    cancelled: bool,
}

impl<'g> State<'g> {
    /// The candidate set for `motif_node` given everything mapped so far: its pushed
    /// neighbor restrictions (if any) or its initial per-kind lists, narrowed by the
    /// symmetry-breaking bounds implied by already-mapped orbit-mates.
    fn candidates(&self, motif_node: MotifNodeId) -> Vec<NodeId> {
        let min_bound = self.larger[motif_node.index()]
            .iter()
            .filter_map(|&w| self.mapped[w.index()])
            .max();
        let max_bound = self.smaller[motif_node.index()]
            .iter()
            .filter_map(|&w| self.mapped[w.index()])
            .min();

        let iter = &self.iterators[motif_node.index()];
        if iter.has_restrictions() {
            iter.intersect(&self.used, min_bound, max_bound).unwrap_or_default()
        } else {
            let mut nodes = iter.enumerate();
            if let Some(bound) = min_bound {
                nodes.retain(|&node| node > bound);
            }
            if let Some(bound) = max_bound {
                nodes.retain(|&node| node < bound);
            }
            nodes.retain(|&node| !self.used.contains(node.index()));
            nodes
        }
    }

    /// Pushes the restrictions that mapping `motif_node` to `node` places on its
    /// not-yet-mapped motif neighbors, and records their new candidate counts in the
    /// priority queue. Returns `false` as soon as one neighbor has no host edges of the
    /// required kind, meaning `node` cannot extend the mapping at all.
    fn propagate(&mut self, motif_node: MotifNodeId, node: NodeId) -> bool {
        let conn = self.motif.conn(motif_node);
        let kinds = self.motif.link_kind(motif_node);
        for i in 0..conn.len() {
            let neighbor = conn[i];
            if self.mapped[neighbor.index()].is_some() {
                continue;
            }
            let links = self.graph.node(node).neighbors(kinds[i]);
            if links.is_empty() {
                return false;
            }
            self.iterators[neighbor.index()].push_restriction(links.to_vec(), node);
            self.pq.add(PriorityObject {
                start_node: node,
                from_pos: motif_node,
                to_pos: neighbor,
                num_neighbors: links.len(),
            });
        }
        true
    }

    /// Undoes every restriction `propagate` may have pushed for `motif_node`, whether
    /// or not propagation ran to completion.
    fn undo_propagate(&mut self, motif_node: MotifNodeId) {
        let conn = self.motif.conn(motif_node).to_vec();
        for neighbor in conn {
            self.iterators[neighbor.index()].pop_all_from(self.mapped[motif_node.index()].unwrap());
            self.pq.remove_from(neighbor, motif_node);
        }
    }

    /// The cheapest unmapped motif node with a pending restriction, if any. `None`
    /// means the remaining unmapped nodes are disconnected from everything mapped so
    /// far; the caller just leaves them for a later, independent start.
    fn choose_next(&self) -> Option<MotifNodeId> {
        let unmapped = (0..self.motif.n())
            .filter(|&i| !self.mapped_pos.contains(i))
            .map(MotifNodeId::new);
        self.pq.poll(unmapped).map(|best| best.to_pos)
    }

    fn record_links_among_mapped(&mut self, except: MotifNodeId) {
        if self.outcome.used_links.is_none() {
            return;
        }
        let mut found = Vec::new();
        for i in 0..self.motif.n() {
            let i_id = MotifNodeId::new(i);
            if i_id == except {
                continue;
            }
            let Some(host_i) = self.mapped[i] else { continue };
            for &neighbor in self.motif.conn(i_id) {
                if neighbor == except {
                    continue;
                }
                if let Some(host_neighbor) = self.mapped[neighbor.index()] {
                    found.push(canonical_pair(host_i, host_neighbor));
                }
            }
        }
        self.outcome.used_links.as_mut().unwrap().extend(found);
    }

    fn record_links_for(&mut self, motif_node: MotifNodeId, node: NodeId) {
        let Some(set) = self.outcome.used_links.as_mut() else {
            return;
        };
        for &neighbor in self.motif.conn(motif_node) {
            if let Some(host_neighbor) = self.mapped[neighbor.index()] {
                set.insert(canonical_pair(node, host_neighbor));
            }
        }
    }

    /// Recursively maps `motif_node`, the `depth`-th node mapped along this branch.
    fn search_node(&mut self, motif_node: MotifNodeId, depth: usize) {
        let nodes = self.candidates(motif_node);
        if nodes.is_empty() {
            return;
        }

        if depth == self.motif.n() - 1 {
            self.record_links_among_mapped(motif_node);
            for node in nodes {
                self.mapped[motif_node.index()] = Some(node);
                self.record_links_for(motif_node, node);
                self.outcome
                    .instances
                    .push(self.mapped.iter().map(|m| m.unwrap()).collect());
            }
            self.mapped[motif_node.index()] = None;
            return;
        }

        self.mapped_pos.insert(motif_node.index());
        for node in nodes {
            self.mapped[motif_node.index()] = Some(node);
            self.used.insert(node.index());

            if self.propagate(motif_node, node) {
                if let Some(next) = self.choose_next() {
                    self.search_node(next, depth + 1);
                }
            }

            self.undo_propagate(motif_node);
            self.used.set(node.index(), false);
            self.mapped[motif_node.index()] = None;
        }
        self.mapped_pos.set(motif_node.index(), false);
    }
}
