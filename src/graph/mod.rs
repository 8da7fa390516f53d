//! The host graph: the (usually large) network the motif is searched against.
//!
//! Immutable once built. Every node carries a dense, allocator-assigned id; neighbor
//! lists and the per-kind node lists are kept sorted ascending by id so the search
//! engine can binary-search and merge them directly.

pub mod loader;

use indexmap::IndexMap;

/// Identifies a host node. Dense, starts at 0, assigned by [`NodeIdAllocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a directed link kind (one id per direction of a link type). Dense `u16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkKindId(u16);

impl LinkKindId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Constructs a kind id directly from its raw value. Only needed for tests and
    /// benchmarks that build motifs without going through a [`LinkTypeRegistry`].
    pub fn from_raw(raw: u16) -> Self {
        LinkKindId(raw)
    }
}

/// Hands out dense, monotonically increasing [`NodeId`]s. Replaces the original
/// tool's process-global id counter with an object owned by whoever is building a graph.
#[derive(Debug, Default)]
pub struct NodeIdAllocator {
    next: u32,
}

impl NodeIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.next as usize
    }
}

/// A named, directed-or-undirected relation type. Undirected types share a single
/// `LinkKindId` for both directions; directed types get two distinct kinds.
#[derive(Debug, Clone)]
pub struct LinkType {
    pub name: String,
    pub directed: bool,
    pub src_network: String,
    pub dst_network: String,
    forward: LinkKindId,
    inverse: LinkKindId,
}

impl LinkType {
    /// The kind id for an edge traversed from its declared source side.
    pub fn forward(&self) -> LinkKindId {
        self.forward
    }

    /// The kind id for the same edge traversed from its declared destination side.
    /// Equal to `forward()` for undirected types.
    pub fn inverse(&self) -> LinkKindId {
        self.inverse
    }
}

/// Assigns dense [`LinkKindId`]s to named link types as they are registered.
#[derive(Debug, Default)]
pub struct LinkTypeRegistry {
    types: Vec<LinkType>,
    next_kind: u16,
}

impl LinkTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new link type, or returns the existing one if `name` was already
    /// registered (the original CLI lets the same name appear in more than one tetrad
    /// and treats it as the same type; we preserve that).
    pub fn register(&mut self, name: &str, directed: bool, src_network: &str, dst_network: &str) -> &LinkType {
        if let Some(i) = self.types.iter().position(|t| t.name == name) {
            return &self.types[i];
        }
        let forward = LinkKindId(self.next_kind);
        self.next_kind += 1;
        let inverse = if directed {
            let k = LinkKindId(self.next_kind);
            self.next_kind += 1;
            k
        } else {
            forward
        };
        self.types.push(LinkType {
            name: name.to_string(),
            directed,
            src_network: src_network.to_string(),
            dst_network: dst_network.to_string(),
            forward,
            inverse,
        });
        self.types.last().unwrap()
    }

    pub fn get(&self, name: &str) -> Option<&LinkType> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn num_kinds(&self) -> usize {
        self.next_kind as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = &LinkType> {
        self.types.iter()
    }
}

/// One node of the host graph: a stable id, an opaque description, and a sorted
/// neighbor list per link kind.
#[derive(Debug, Clone)]
pub struct HostNode {
    id: NodeId,
    description: String,
    nbr: Vec<Vec<NodeId>>,
}

impl HostNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Sorted ascending by id, no duplicates.
    pub fn neighbors(&self, kind: LinkKindId) -> &[NodeId] {
        self.nbr.get(kind.index()).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// The full host graph, built once via [`HostGraphBuilder`] and read-only afterwards.
#[derive(Debug)]
pub struct HostGraph {
    nodes_by_id: Vec<HostNode>,
    nodes_by_description: IndexMap<String, NodeId>,
    by_kind: Vec<Vec<NodeId>>,
}

impl HostGraph {
    pub fn node(&self, id: NodeId) -> &HostNode {
        &self.nodes_by_id[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes_by_id.len()
    }

    pub fn find_by_description(&self, description: &str) -> Option<NodeId> {
        self.nodes_by_description.get(description).copied()
    }

    /// Nodes with at least one outgoing link of `kind`, sorted ascending by id.
    pub fn by_kind(&self, kind: LinkKindId) -> &[NodeId] {
        self.by_kind.get(kind.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All nodes, sorted ascending by id. Used as the fallback candidate set for a
    /// motif node with no incident links at all.
    pub fn all_nodes(&self) -> Vec<NodeId> {
        self.nodes_by_id.iter().map(|n| n.id).collect()
    }
}

/// Accumulates nodes and edges while a graph is being read in, then finalizes into
/// an immutable, index-sorted [`HostGraph`].
#[derive(Debug)]
pub struct HostGraphBuilder {
    num_kinds: usize,
    nodes_by_id: Vec<HostNode>,
    nodes_by_description: IndexMap<String, NodeId>,
}

impl HostGraphBuilder {
    pub fn new(num_kinds: usize) -> Self {
        Self {
            num_kinds,
            nodes_by_id: Vec::new(),
            nodes_by_description: IndexMap::new(),
        }
    }

    /// Returns the id for `description`, allocating a fresh node from `alloc` the
    /// first time it is seen.
    pub fn node_for_description(&mut self, alloc: &mut NodeIdAllocator, description: &str) -> NodeId {
        if let Some(&id) = self.nodes_by_description.get(description) {
            return id;
        }
        let id = alloc.alloc();
        self.nodes_by_description.insert(description.to_string(), id);
        self.nodes_by_id.push(HostNode {
            id,
            description: description.to_string(),
            nbr: vec![Vec::new(); self.num_kinds],
        });
        id
    }

    /// Adds a directed edge `src -> dst` of kind `kind`, skipping it if it already
    /// exists (mirrors the original loader's de-duplication).
    pub fn add_edge(&mut self, src: NodeId, dst: NodeId, kind: LinkKindId) {
        let list = &mut self.nodes_by_id[src.index()].nbr[kind.index()];
        if list.binary_search(&dst).is_err() {
            let pos = list.partition_point(|n| *n < dst);
            list.insert(pos, dst);
        }
    }

    pub fn finalize(self) -> HostGraph {
        let mut by_kind = vec![Vec::new(); self.num_kinds];
        for node in &self.nodes_by_id {
            for (k, nbrs) in node.nbr.iter().enumerate() {
                if !nbrs.is_empty() {
                    by_kind[k].push(node.id);
                }
            }
        }
        for list in &mut by_kind {
            list.sort_unstable();
        }
        HostGraph {
            nodes_by_id: self.nodes_by_id,
            nodes_by_description: self.nodes_by_description,
            by_kind,
        }
    }
}
