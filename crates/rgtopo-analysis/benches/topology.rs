use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rgtopo_analysis::graph::{ReactionGraph, decompose};
use rgtopo_analysis::metrics::betweenness::betweenness_centrality;
use rgtopo_analysis::metrics::eigenvector::{EigenConfig, eigenvector_left};
use rgtopo_analysis::topology::analyze_reachability;

/// `layers` layers of `width` reactions, each feeding the next layer's
/// neighbours, with a feedback edge every `cycle_every` layers.
fn layered(layers: usize, width: usize, cycle_every: usize) -> ReactionGraph {
    let id = |l: usize, w: usize| format!("R{l}_{w}");
    let nodes: Vec<String> = (0..layers)
        .flat_map(|l| (0..width).map(move |w| (l, w)))
        .map(|(l, w)| id(l, w))
        .collect();

    let mut edges = Vec::new();
    for l in 1..layers {
        for w in 0..width {
            edges.push((id(l - 1, w), id(l, w)));
            edges.push((id(l - 1, w), id(l, (w + 1) % width)));
        }
        if cycle_every > 0 && l % cycle_every == 0 {
            edges.push((id(l, 0), id(l - cycle_every, 0)));
        }
    }

    ReactionGraph::from_parts("bench", nodes, edges).expect("layered graph is valid")
}

fn bench_topology(c: &mut Criterion) {
    let mut group = c.benchmark_group("topology");

    for (layers, width) in [(10, 10), (20, 25), (40, 25)] {
        let dag = layered(layers, width, 0);
        let cyclic = layered(layers, width, 5);
        let label = format!("{layers}x{width}");
        group.throughput(Throughput::Elements(dag.node_count() as u64));

        group.bench_with_input(BenchmarkId::new("decompose", &label), &dag, |b, g| {
            b.iter(|| black_box(decompose(g)));
        });
        group.bench_with_input(BenchmarkId::new("betweenness", &label), &dag, |b, g| {
            b.iter(|| black_box(betweenness_centrality(g)));
        });
        group.bench_with_input(BenchmarkId::new("reachability", &label), &dag, |b, g| {
            b.iter(|| black_box(analyze_reachability(g)));
        });
        group.bench_with_input(BenchmarkId::new("eigen_left", &label), &cyclic, |b, g| {
            let cfg = EigenConfig::default();
            b.iter(|| black_box(eigenvector_left(g, &cfg)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_topology);
criterion_main!(benches);
