//! Criterion benchmarks for the heavier graph analyses.
//!
//! Run with:
//! ```bash
//! cargo bench -p trellis-graph
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use trellis_graph::{GraphStore, GridMap, PageRankConfig};

// ── helpers ─────────────────────────────────────────────────────────────────

/// Ring plus random chords, so the graph is connected.
fn random_graph(n: usize, chords: usize) -> GraphStore {
    let mut rng = StdRng::seed_from_u64(7);
    let mut graph = GraphStore::new();
    graph.add_vertices(n);
    for v in 0..n {
        let weight = rng.gen_range(1.0..10.0);
        graph.add_undirected_edge(v, (v + 1) % n, weight).unwrap();
    }
    for _ in 0..chords {
        let (u, v) = (rng.gen_range(0..n), rng.gen_range(0..n));
        let weight = rng.gen_range(1.0..10.0);
        graph.add_undirected_edge(u, v, weight).unwrap();
    }
    graph
}

// ── benches ─────────────────────────────────────────────────────────────────

fn bench_shortest_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("paths/dijkstra");
    for &n in &[1_000usize, 10_000] {
        let graph = random_graph(n, n * 2);
        group.bench_with_input(BenchmarkId::from_parameter(n), &graph, |b, graph| {
            b.iter(|| graph.shortest_paths(0).unwrap())
        });
    }
    group.finish();
}

fn bench_grid(c: &mut Criterion) {
    let mut grid = GridMap::new(200, 200);
    for row in (4..196).step_by(8) {
        for col in 0..180 {
            grid.mark_obstacle((row, col)).unwrap();
        }
    }
    c.bench_function("paths/grid_200x200", |b| {
        b.iter(|| grid.find_path((0, 0), (199, 199)).unwrap())
    });
}

fn bench_structure(c: &mut Criterion) {
    let graph = random_graph(10_000, 5_000);
    c.bench_function("structure/bridges_10k", |b| b.iter(|| graph.bridges()));
    c.bench_function("structure/mst_10k", |b| {
        b.iter(|| graph.minimum_spanning_tree(0).unwrap())
    });

    let small = random_graph(300, 600);
    c.bench_function("structure/edge_betweenness_300", |b| {
        b.iter(|| small.edge_betweenness())
    });
}

fn bench_ranking(c: &mut Criterion) {
    let graph = random_graph(10_000, 20_000);
    let config = PageRankConfig::default();
    c.bench_function("ranking/page_rank_10k", |b| {
        b.iter(|| graph.page_rank(&config).unwrap())
    });
    c.bench_function("community/label_propagation_10k", |b| {
        b.iter(|| graph.label_propagation(100))
    });
}

criterion_group!(
    benches,
    bench_shortest_paths,
    bench_grid,
    bench_structure,
    bench_ranking
);
criterion_main!(benches);
