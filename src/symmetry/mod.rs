//! Automorphism-group analysis of a motif via ordered-pair-partition (OPP) refinement.
//!
//! An OPP tracks two orderings ("top" and "bottom") of the motif's nodes, partitioned
//! into colored cells. Branching tentatively couples one top node to one bottom node
//! within a cell and re-refines; a path from the root to an all-singleton leaf is a
//! discovered automorphism. Orbits accumulate across every discovered automorphism,
//! and the orbit of each node on the "main diagonal" (coupled to itself at every
//! ancestor branch) becomes a symmetry-breaking order constraint.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::graph::LinkKindId;
use crate::motif::{Motif, MotifNodeId};

/// Ordered-pair-partition state: a two-row colored partition of the motif's nodes.
#[derive(Debug, Clone)]
struct Opp {
    top_color: Vec<usize>,
    color_to_top: HashMap<usize, Vec<MotifNodeId>>,
    color_to_bottom: HashMap<usize, Vec<MotifNodeId>>,
    next_color: usize,
}

impl Opp {
    fn initial(n: usize) -> Self {
        let all: Vec<MotifNodeId> = (0..n).map(MotifNodeId::new).collect();
        let mut color_to_top = HashMap::new();
        let mut color_to_bottom = HashMap::new();
        color_to_top.insert(0, all.clone());
        color_to_bottom.insert(0, all);
        Self {
            top_color: vec![0; n],
            color_to_top,
            color_to_bottom,
            next_color: 1,
        }
    }

    /// Splits `split_color`, coupling `top_id` (top row) to `bottom_id` (bottom row)
    /// into a fresh singleton color, then re-refines. `None` means the resulting OPP
    /// is invalid (no consistent automorphism extends this coupling).
    fn branch(&self, top_id: MotifNodeId, bottom_id: MotifNodeId, split_color: usize, motif: &Motif) -> Option<Opp> {
        let mut next = self.clone();
        next.color_to_top.get_mut(&split_color).unwrap().retain(|&n| n != top_id);
        next.color_to_bottom.get_mut(&split_color).unwrap().retain(|&n| n != bottom_id);

        let new_color = next.next_color;
        next.next_color += 1;
        next.color_to_top.insert(new_color, vec![top_id]);
        next.color_to_bottom.insert(new_color, vec![bottom_id]);
        next.top_color[top_id.index()] = new_color;

        if next.refine(new_color, motif) {
            Some(next)
        } else {
            None
        }
    }

    fn refine(&mut self, start_color: usize, motif: &Motif) -> bool {
        let mut recheck: VecDeque<usize> = VecDeque::new();
        if !self.refine_one(start_color, motif, &mut recheck) {
            return false;
        }
        while let Some(color) = recheck.pop_front() {
            if !self.refine_one(color, motif, &mut recheck) {
                return false;
            }
        }
        true
    }

    /// Signature of `node`'s incidences into `cell`: for each incident edge whose
    /// other endpoint is a member of `cell`, one tally keyed by that incidence's own
    /// link kind (as recorded in `node`'s adjacency, so direction is already baked
    /// into the kind id for directed types).
    fn incidence_signature(motif: &Motif, node: MotifNodeId, cell: &HashSet<MotifNodeId>) -> Vec<(LinkKindId, u32)> {
        let mut tally: HashMap<LinkKindId, u32> = HashMap::new();
        for (&nbr, &kind) in motif.conn(node).iter().zip(motif.link_kind(node).iter()) {
            if cell.contains(&nbr) {
                *tally.entry(kind).or_insert(0) += 1;
            }
        }
        let mut sig: Vec<(LinkKindId, u32)> = tally.into_iter().collect();
        sig.sort_unstable_by_key(|&(k, _)| k);
        sig
    }

    fn refine_one(&mut self, color: usize, motif: &Motif, recheck: &mut VecDeque<usize>) -> bool {
        let top_cell: HashSet<MotifNodeId> = self.color_to_top[&color].iter().copied().collect();
        let bottom_cell: HashSet<MotifNodeId> = self.color_to_bottom[&color].iter().copied().collect();

        let mut reached_colors: HashSet<usize> = HashSet::new();
        for &node in &top_cell {
            for &nbr in motif.conn(node) {
                reached_colors.insert(self.top_color[nbr.index()]);
            }
        }

        for reached in reached_colors {
            let nodes_in_color = self.color_to_top[&reached].clone();
            let mut buckets: Vec<(Vec<(LinkKindId, u32)>, usize)> = Vec::new(); // (signature, color id)
            let first = nodes_in_color[0];
            let first_sig = Self::incidence_signature(motif, first, &top_cell);
            self.color_to_top.insert(reached, vec![first]);
            buckets.push((first_sig, reached));

            for &node in &nodes_in_color[1..] {
                let sig = Self::incidence_signature(motif, node, &top_cell);
                if let Some(&(_, bucket_color)) = buckets.iter().find(|(s, _)| *s == sig) {
                    self.color_to_top.get_mut(&bucket_color).unwrap().push(node);
                    self.top_color[node.index()] = bucket_color;
                } else {
                    let new_color = self.next_color;
                    self.next_color += 1;
                    recheck.push_back(new_color);
                    recheck.push_back(color);
                    self.color_to_top.insert(new_color, vec![node]);
                    self.top_color[node.index()] = new_color;
                    buckets.push((sig, new_color));
                }
            }

            let bottom_nodes = self.color_to_bottom.remove(&reached).unwrap_or_default();
            for node in bottom_nodes {
                let sig = Self::incidence_signature(motif, node, &bottom_cell);
                if let Some(&(_, bucket_color)) = buckets.iter().find(|(s, _)| *s == sig) {
                    self.color_to_bottom.entry(bucket_color).or_default().push(node);
                }
                // No matching bucket: the node is dropped, same as the original
                // `_refine_bottom` silently discarding an unmatched node -- the
                // top/bottom size-mismatch check below then invalidates this OPP.
            }
        }

        for (&c, top_set) in &self.color_to_top {
            let bottom_len = self.color_to_bottom.get(&c).map(Vec::len).unwrap_or(0);
            if bottom_len != top_set.len() {
                return false;
            }
        }
        true
    }
}

/// Orbit partition under construction: `-1` means "not yet merged with anything".
struct Orbits {
    labels: Vec<i64>,
    next: i64,
}

impl Orbits {
    fn new(n: usize) -> Self {
        Self {
            labels: vec![-1; n],
            next: 0,
        }
    }

    fn merge(&mut self, a: MotifNodeId, b: MotifNodeId) {
        let (ai, bi) = (a.index(), b.index());
        match (self.labels[ai], self.labels[bi]) {
            (-1, -1) => {
                self.next += 1;
                self.labels[ai] = self.next;
                self.labels[bi] = self.next;
            }
            (_, -1) => self.labels[bi] = self.labels[ai],
            (-1, _) => self.labels[ai] = self.labels[bi],
            (oa, ob) if oa != ob => {
                for l in self.labels.iter_mut() {
                    if *l == oa {
                        *l = ob;
                    }
                }
            }
            _ => {}
        }
    }

    fn of(&self, node: MotifNodeId) -> i64 {
        self.labels[node.index()]
    }
}

/// Everything the search engine needs from the motif's automorphism group: the
/// symmetry-breaking order constraints, indexed by motif node.
#[derive(Debug, Default)]
pub struct SymmetryInfo {
    pub smaller: Vec<HashSet<MotifNodeId>>,
    pub larger: Vec<HashSet<MotifNodeId>>,
    pub permutations: Vec<Vec<MotifNodeId>>,
}

impl SymmetryInfo {
    fn new(n: usize) -> Self {
        Self {
            smaller: vec![HashSet::new(); n],
            larger: vec![HashSet::new(); n],
            permutations: Vec::new(),
        }
    }

    fn add_constraint(&mut self, lower: MotifNodeId, higher: MotifNodeId) {
        let smaller_b_snapshot: Vec<MotifNodeId> = self.smaller[higher.index()].iter().copied().collect();
        let larger_a_snapshot: Vec<MotifNodeId> = self.larger[lower.index()].iter().copied().collect();

        self.smaller[lower.index()].insert(higher);
        self.larger[higher.index()].insert(lower);

        self.smaller[lower.index()].extend(smaller_b_snapshot.iter().copied());
        self.larger[higher.index()].extend(larger_a_snapshot.iter().copied());

        for z in &smaller_b_snapshot {
            self.larger[z.index()].insert(lower);
        }
        for w in &larger_a_snapshot {
            self.smaller[w.index()].insert(higher);
        }
    }

    /// Extracts order constraints from `node`'s now-final orbit: every later-indexed
    /// node sharing the orbit must be strictly greater than `node`.
    fn fix(&mut self, node: MotifNodeId, orbits: &Orbits, n: usize) {
        let orbit = orbits.of(node);
        for i in (node.index() + 1)..n {
            let other = MotifNodeId::new(i);
            if orbits.of(other) == orbit {
                self.add_constraint(node, other);
            }
        }
    }
}

/// Computes the full automorphism-group analysis of `motif`.
pub fn analyze(motif: &Motif) -> SymmetryInfo {
    let n = motif.n();
    let mut info = SymmetryInfo::new(n);
    let mut orbits = Orbits::new(n);
    let opp = Opp::initial(n);
    map_nodes(motif, &opp, &mut info, &mut orbits, true);
    info
}

fn map_nodes(motif: &Motif, opp: &Opp, info: &mut SymmetryInfo, orbits: &mut Orbits, main: bool) {
    let n = motif.n();

    let mut split_color = None;
    let mut lowest = usize::MAX;
    let mut all_singleton = true;
    for (&color, top_nodes) in &opp.color_to_top {
        if top_nodes.len() != 1 {
            all_singleton = false;
            if let Some(&smallest_in_cell) = top_nodes.iter().min() {
                if smallest_in_cell.index() < lowest {
                    lowest = smallest_in_cell.index();
                    split_color = Some(color);
                }
            }
        }
    }

    if all_singleton {
        let mut permutation = vec![MotifNodeId::new(0); n];
        for j in 0..n {
            let bottom = opp.color_to_bottom[&j][0];
            let top = opp.color_to_top[&j][0];
            permutation[top.index()] = bottom;
            orbits.merge(bottom, top);
        }
        info.permutations.push(permutation);
        return;
    }

    let split_color = split_color.unwrap();
    let top = MotifNodeId::new(lowest);
    let bottom_split = opp.color_to_bottom[&split_color].clone();

    for &candidate in &bottom_split {
        if orbits.of(top) != -1 && orbits.of(top) == orbits.of(candidate) {
            continue;
        }
        if let Some(next_opp) = opp.branch(top, candidate, split_color, motif) {
            let new_main = main && candidate == top;
            map_nodes(motif, &next_opp, info, orbits, new_main);
        }
    }

    if main {
        info.fix(top, orbits, n);
    }
}
