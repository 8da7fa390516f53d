//! End-to-end scenarios against small in-memory graphs, built directly through the
//! public `graph`/`motif` APIs, plus one scenario that exercises the TSV loader.

use std::collections::HashSet;
use std::io::Write;

use ismags::graph::loader::{load_network, NetworkFile};
use ismags::graph::{HostGraph, HostGraphBuilder, LinkTypeRegistry, NodeIdAllocator};
use ismags::motif::{MotifBuilder, MotifNodeId};
use ismags::search::SearchEngine;

fn instance_descriptions(graph: &HostGraph, instance: &[ismags::graph::NodeId]) -> Vec<String> {
    instance.iter().map(|&id| graph.node(id).description().to_string()).collect()
}

/// Scenario 1: a 3-node directed cycle in G, H is the same directed-cycle triangle.
#[test]
fn directed_cycle_triangle_found_once() {
    let mut reg = LinkTypeRegistry::new();
    let a = reg.register("A", true, "t", "t").clone();
    let mut alloc = NodeIdAllocator::new();
    let mut builder = HostGraphBuilder::new(reg.num_kinds());
    let n1 = builder.node_for_description(&mut alloc, "1");
    let n2 = builder.node_for_description(&mut alloc, "2");
    let n3 = builder.node_for_description(&mut alloc, "3");
    builder.add_edge(n1, n2, a.forward());
    builder.add_edge(n2, n1, a.inverse());
    builder.add_edge(n2, n3, a.forward());
    builder.add_edge(n3, n2, a.inverse());
    builder.add_edge(n3, n1, a.forward());
    builder.add_edge(n1, n3, a.inverse());
    let graph = builder.finalize();

    let mut mb = MotifBuilder::new(3);
    mb.add_link(MotifNodeId::new(0), MotifNodeId::new(1), a.forward(), a.inverse());
    mb.add_link(MotifNodeId::new(1), MotifNodeId::new(2), a.forward(), a.inverse());
    mb.add_link(MotifNodeId::new(2), MotifNodeId::new(0), a.forward(), a.inverse());
    let motif = mb.finalize("cycle".to_string());

    let outcome = SearchEngine::find_motif(&graph, &motif, false);
    assert_eq!(outcome.instances.len(), 1);
    let found: HashSet<String> = instance_descriptions(&graph, &outcome.instances[0]).into_iter().collect();
    assert_eq!(found, HashSet::from(["1".to_string(), "2".to_string(), "3".to_string()]));
}

/// Scenario 2: no directed cycle exists in a plain path, so zero instances.
#[test]
fn directed_path_has_no_cycle_instance() {
    let mut reg = LinkTypeRegistry::new();
    let a = reg.register("A", true, "t", "t").clone();
    let mut alloc = NodeIdAllocator::new();
    let mut builder = HostGraphBuilder::new(reg.num_kinds());
    let n1 = builder.node_for_description(&mut alloc, "1");
    let n2 = builder.node_for_description(&mut alloc, "2");
    let n3 = builder.node_for_description(&mut alloc, "3");
    builder.add_edge(n1, n2, a.forward());
    builder.add_edge(n2, n1, a.inverse());
    builder.add_edge(n2, n3, a.forward());
    builder.add_edge(n3, n2, a.inverse());
    let graph = builder.finalize();

    let mut mb = MotifBuilder::new(3);
    mb.add_link(MotifNodeId::new(0), MotifNodeId::new(1), a.forward(), a.inverse());
    mb.add_link(MotifNodeId::new(1), MotifNodeId::new(2), a.forward(), a.inverse());
    mb.add_link(MotifNodeId::new(2), MotifNodeId::new(0), a.forward(), a.inverse());
    let motif = mb.finalize("cycle".to_string());

    let outcome = SearchEngine::find_motif(&graph, &motif, false);
    assert!(outcome.instances.is_empty());
}

/// Scenario 3: a two-relation-type motif (one directed, one undirected) matched once.
#[test]
fn two_type_motif_matched_once() {
    let mut reg = LinkTypeRegistry::new();
    let a = reg.register("A", true, "t", "t").clone();
    let b = reg.register("B", false, "t", "t").clone();
    let mut alloc = NodeIdAllocator::new();
    let mut builder = HostGraphBuilder::new(reg.num_kinds());
    let n1 = builder.node_for_description(&mut alloc, "1");
    let n2 = builder.node_for_description(&mut alloc, "2");
    let n3 = builder.node_for_description(&mut alloc, "3");
    builder.add_edge(n1, n2, a.forward());
    builder.add_edge(n2, n1, a.inverse());
    builder.add_edge(n2, n3, a.forward());
    builder.add_edge(n3, n2, a.inverse());
    builder.add_edge(n1, n3, b.forward());
    builder.add_edge(n3, n1, b.inverse());
    let graph = builder.finalize();

    let mut mb = MotifBuilder::new(3);
    mb.add_link(MotifNodeId::new(0), MotifNodeId::new(1), a.forward(), a.inverse());
    mb.add_link(MotifNodeId::new(1), MotifNodeId::new(2), a.forward(), a.inverse());
    mb.add_link(MotifNodeId::new(0), MotifNodeId::new(2), b.forward(), b.inverse());
    let motif = mb.finalize("two-type".to_string());

    let outcome = SearchEngine::find_motif(&graph, &motif, false);
    assert_eq!(outcome.instances.len(), 1);
    assert_eq!(
        instance_descriptions(&graph, &outcome.instances[0]),
        vec!["1".to_string(), "2".to_string(), "3".to_string()]
    );
}

/// Scenario 4: the fully symmetric undirected triangle is found once, not 3! = 6 times.
#[test]
fn undirected_triangle_symmetry_collapses_to_one_instance() {
    let mut reg = LinkTypeRegistry::new();
    let a = reg.register("A", false, "t", "t").clone();
    let mut alloc = NodeIdAllocator::new();
    let mut builder = HostGraphBuilder::new(reg.num_kinds());
    let n1 = builder.node_for_description(&mut alloc, "1");
    let n2 = builder.node_for_description(&mut alloc, "2");
    let n3 = builder.node_for_description(&mut alloc, "3");
    for &(x, y) in &[(n1, n2), (n2, n3), (n1, n3)] {
        builder.add_edge(x, y, a.forward());
        builder.add_edge(y, x, a.forward());
    }
    let graph = builder.finalize();

    let mut mb = MotifBuilder::new(3);
    mb.add_link(MotifNodeId::new(0), MotifNodeId::new(1), a.forward(), a.inverse());
    mb.add_link(MotifNodeId::new(1), MotifNodeId::new(2), a.forward(), a.inverse());
    mb.add_link(MotifNodeId::new(0), MotifNodeId::new(2), a.forward(), a.inverse());
    let motif = mb.finalize("AAA".to_string());

    let outcome = SearchEngine::find_motif(&graph, &motif, false);
    assert_eq!(outcome.instances.len(), 1);
}

/// Scenario 5: a three-leaf star, all leaves in one orbit, found once.
#[test]
fn three_leaf_star_symmetry_collapses_to_one_instance() {
    let mut reg = LinkTypeRegistry::new();
    let a = reg.register("A", true, "t", "t").clone();
    let mut alloc = NodeIdAllocator::new();
    let mut builder = HostGraphBuilder::new(reg.num_kinds());
    let c = builder.node_for_description(&mut alloc, "c");
    let x = builder.node_for_description(&mut alloc, "x");
    let y = builder.node_for_description(&mut alloc, "y");
    let z = builder.node_for_description(&mut alloc, "z");
    for &leaf in &[x, y, z] {
        builder.add_edge(c, leaf, a.forward());
        builder.add_edge(leaf, c, a.inverse());
    }
    let graph = builder.finalize();

    let mut mb = MotifBuilder::new(4);
    mb.add_link(MotifNodeId::new(0), MotifNodeId::new(1), a.forward(), a.inverse());
    mb.add_link(MotifNodeId::new(0), MotifNodeId::new(2), a.forward(), a.inverse());
    mb.add_link(MotifNodeId::new(0), MotifNodeId::new(3), a.forward(), a.inverse());
    let motif = mb.finalize("star".to_string());

    let outcome = SearchEngine::find_motif(&graph, &motif, false);
    assert_eq!(outcome.instances.len(), 1);
    let found = &outcome.instances[0];
    assert_eq!(graph.node(found[0]).description(), "c");
}

/// Scenario 6: self-loops are dropped at load, exercised through the real TSV loader
/// and motif-description parser rather than direct API construction.
#[test]
fn self_loop_excluded_at_load_through_full_pipeline() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "1\t1").unwrap();
    writeln!(file, "1\t2").unwrap();
    file.flush().unwrap();

    let mut reg = LinkTypeRegistry::new();
    let a = reg.register("A", true, "", "").clone();
    let files = [NetworkFile {
        path: file.path().to_path_buf(),
        link_type: &a,
    }];
    let graph = load_network(&files, reg.num_kinds()).unwrap();
    // The self-loop `1\t1` contributes no node; only "1" and "2" exist.
    assert_eq!(graph.node_count(), 2);

    let mut mb = MotifBuilder::new(2);
    mb.add_link(MotifNodeId::new(0), MotifNodeId::new(1), a.forward(), a.inverse());
    let motif = mb.finalize("A".to_string());

    let outcome = SearchEngine::find_motif(&graph, &motif, false);
    assert_eq!(outcome.instances.len(), 1);
    let found: HashSet<String> = instance_descriptions(&graph, &outcome.instances[0]).into_iter().collect();
    assert_eq!(found, HashSet::from(["1".to_string(), "2".to_string()]));
}

/// After a completed search, no host node is left marked as in-use.
#[test]
fn backtracking_leaves_no_node_marked_used() {
    // find_motif owns its `used` bitset for the duration of one call and it is
    // dropped with the call; there is nothing externally observable to assert here
    // beyond "the next independent search over the same graph also succeeds",
    // which would silently fail (empty results) if `used` leaked across calls.
    let mut reg = LinkTypeRegistry::new();
    let a = reg.register("A", false, "t", "t").clone();
    let mut alloc = NodeIdAllocator::new();
    let mut builder = HostGraphBuilder::new(reg.num_kinds());
    let n1 = builder.node_for_description(&mut alloc, "1");
    let n2 = builder.node_for_description(&mut alloc, "2");
    builder.add_edge(n1, n2, a.forward());
    builder.add_edge(n2, n1, a.forward());
    let graph = builder.finalize();

    let mut mb = MotifBuilder::new(2);
    mb.add_link(MotifNodeId::new(0), MotifNodeId::new(1), a.forward(), a.inverse());
    let motif = mb.finalize("A".to_string());

    let first = SearchEngine::find_motif(&graph, &motif, false);
    let second = SearchEngine::find_motif(&graph, &motif, false);
    assert_eq!(first.instances.len(), second.instances.len());
}

/// Repeated runs on identical inputs produce identical output.
#[test]
fn search_is_deterministic_across_runs() {
    let mut reg = LinkTypeRegistry::new();
    let a = reg.register("A", false, "t", "t").clone();
    let mut alloc = NodeIdAllocator::new();
    let mut builder = HostGraphBuilder::new(reg.num_kinds());
    let n1 = builder.node_for_description(&mut alloc, "1");
    let n2 = builder.node_for_description(&mut alloc, "2");
    let n3 = builder.node_for_description(&mut alloc, "3");
    for &(x, y) in &[(n1, n2), (n2, n3), (n1, n3)] {
        builder.add_edge(x, y, a.forward());
        builder.add_edge(y, x, a.forward());
    }
    let graph = builder.finalize();

    let mut mb = MotifBuilder::new(3);
    mb.add_link(MotifNodeId::new(0), MotifNodeId::new(1), a.forward(), a.inverse());
    mb.add_link(MotifNodeId::new(1), MotifNodeId::new(2), a.forward(), a.inverse());
    mb.add_link(MotifNodeId::new(0), MotifNodeId::new(2), a.forward(), a.inverse());
    let motif = mb.finalize("AAA".to_string());

    let first = SearchEngine::find_motif(&graph, &motif, false).instances;
    let second = SearchEngine::find_motif(&graph, &motif, false).instances;
    assert_eq!(first, second);
}
