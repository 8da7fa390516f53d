//! Benchmarks the search engine against a moderately sized random-ish host graph and
//! a small motif, the regime the engine is actually tuned for.

use criterion::{criterion_group, criterion_main, Criterion};

use ismags::graph::{HostGraphBuilder, LinkTypeRegistry, NodeIdAllocator};
use ismags::motif::{MotifBuilder, MotifNodeId};
use ismags::search::SearchEngine;

/// A ring of `n` nodes, each also linked to its second neighbor, giving every node
/// degree 4 -- dense enough to exercise real candidate-list intersection.
fn ring_graph(n: usize) -> (ismags::graph::HostGraph, ismags::graph::LinkKindId) {
    let mut reg = LinkTypeRegistry::new();
    let kind = reg.register("A", false, "t", "t").forward();
    let mut alloc = NodeIdAllocator::new();
    let mut builder = HostGraphBuilder::new(reg.num_kinds());
    let nodes: Vec<_> = (0..n).map(|i| builder.node_for_description(&mut alloc, &i.to_string())).collect();
    for i in 0..n {
        let a = nodes[i];
        let b = nodes[(i + 1) % n];
        let c = nodes[(i + 2) % n];
        builder.add_edge(a, b, kind);
        builder.add_edge(b, a, kind);
        builder.add_edge(a, c, kind);
        builder.add_edge(c, a, kind);
    }
    (builder.finalize(), kind)
}

fn triangle_motif(kind: ismags::graph::LinkKindId) -> ismags::motif::Motif {
    let mut b = MotifBuilder::new(3);
    b.add_link(MotifNodeId::new(0), MotifNodeId::new(1), kind, kind);
    b.add_link(MotifNodeId::new(1), MotifNodeId::new(2), kind, kind);
    b.add_link(MotifNodeId::new(0), MotifNodeId::new(2), kind, kind);
    b.finalize("AAA".to_string())
}

fn bench_triangle_search(c: &mut Criterion) {
    let (graph, kind) = ring_graph(200);
    let motif = triangle_motif(kind);
    c.bench_function("triangle_in_ring_200", |b| {
        b.iter(|| SearchEngine::find_motif(&graph, &motif, false));
    });
}

criterion_group!(benches, bench_triangle_search);
criterion_main!(benches);
