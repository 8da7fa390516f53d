//! Per-motif-node candidate set, maintained as a stack of intersected node lists.

use fixedbitset::FixedBitSet;

use crate::graph::NodeId;

/// Tracks the sorted node lists that bound one motif node's candidates.
///
/// `initial_lists` are fixed at search setup (one per distinct incident link kind,
/// shortest first). `neighbor_lists`/`restriction_source` form a parallel stack pushed
/// and popped as the search maps and unmaps the host node that induced each
/// restriction -- `pop_all_from` pops every restriction tagged with a given source in
/// one call, since a single mapped node can restrict several motif-node incidences.
#[derive(Debug, Default)]
pub struct CandidateIterator {
    initial_lists: Vec<Vec<NodeId>>,
    neighbor_lists: Vec<Vec<NodeId>>,
    restriction_source: Vec<NodeId>,
}

impl CandidateIterator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Setup-only: registers one of the global per-link-kind node lists. Kept sorted
    /// shortest-first so `enumerate`'s intersection starts from the smallest list.
    pub fn add_restriction(&mut self, list: Vec<NodeId>) {
        let pos = self.initial_lists.partition_point(|l| l.len() <= list.len());
        self.initial_lists.insert(pos, list);
    }

    /// Search-phase: pushes a new restriction induced by mapping `source`.
    pub fn push_restriction(&mut self, list: Vec<NodeId>, source: NodeId) {
        self.neighbor_lists.push(list);
        self.restriction_source.push(source);
    }

    /// Whether any search-phase restriction has been pushed yet. `false` only for a
    /// motif node that hasn't had any of its neighbors mapped -- in particular the
    /// node chosen to start the search.
    pub fn has_restrictions(&self) -> bool {
        !self.neighbor_lists.is_empty()
    }

    /// Pops every restriction (there may be more than one) induced by `source`.
    pub fn pop_all_from(&mut self, source: NodeId) {
        while self.restriction_source.last() == Some(&source) {
            self.restriction_source.pop();
            self.neighbor_lists.pop();
        }
    }

    /// The full candidate set implied by the initial lists alone (used once, to seed
    /// the search at the start motif node). Sorted-list intersection: a genuine n-way
    /// merge, not the union the original tool falls back to when more than one
    /// initial list is present.
    pub fn enumerate(&self) -> Vec<NodeId> {
        match self.initial_lists.len() {
            0 => Vec::new(),
            1 => self.initial_lists[0].clone(),
            _ => intersect_sorted(&self.initial_lists),
        }
    }

    /// Narrows the currently pushed restriction lists to the nodes that appear in all
    /// of them, fall within `(min_bound, max_bound)` (both exclusive), and are not
    /// already in use. Returns `None` if no restrictions are pushed, or none survive.
    pub fn intersect(&self, used: &FixedBitSet, min_bound: Option<NodeId>, max_bound: Option<NodeId>) -> Option<Vec<NodeId>> {
        if self.neighbor_lists.is_empty() {
            return None;
        }
        let pivot = self
            .neighbor_lists
            .iter()
            .enumerate()
            .min_by_key(|(_, l)| l.len())
            .map(|(i, _)| i)
            .unwrap();
        let nodes = &self.neighbor_lists[pivot];

        let start = match min_bound {
            Some(bound) => match nodes.binary_search(&bound) {
                Ok(p) => p + 1,
                Err(p) => p,
            },
            None => 0,
        };
        let end = match max_bound {
            Some(bound) => match nodes.binary_search(&bound) {
                Ok(p) => p,
                Err(p) => p,
            },
            None => nodes.len(),
        };
        if start >= end {
            return None;
        }

        let mut result = Vec::new();
        for &node in &nodes[start..end] {
            if used.contains(node.index()) {
                continue;
            }
            if self
                .neighbor_lists
                .iter()
                .enumerate()
                .all(|(i, list)| i == pivot || list.binary_search(&node).is_ok())
            {
                result.push(node);
            }
        }
        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }
}

fn intersect_sorted(lists: &[Vec<NodeId>]) -> Vec<NodeId> {
    let mut idx = vec![0usize; lists.len()];
    let mut result = Vec::new();
    loop {
        let mut target = None;
        for (list, &i) in lists.iter().zip(idx.iter()) {
            if i >= list.len() {
                return result;
            }
            let v = list[i];
            target = Some(match target {
                None => v,
                Some(m) => std::cmp::max(m, v),
            });
        }
        let target = target.unwrap();
        let mut all_equal = true;
        for (list, i) in lists.iter().zip(idx.iter_mut()) {
            while *i < list.len() && list[*i] < target {
                *i += 1;
            }
            if *i >= list.len() {
                return result;
            }
            if list[*i] != target {
                all_equal = false;
            }
        }
        if all_equal {
            result.push(target);
            for i in idx.iter_mut() {
                *i += 1;
            }
        }
    }
}
