use criterion::{criterion_group, criterion_main, Criterion};

use test_fixtures::random_dag;

fn bench_dseparation(c: &mut Criterion) {
    let dag = random_dag(100, 3.0, 7);
    let g = dag.graph();
    let nodes = g.nodes();
    let z: Vec<_> = nodes[40..45].to_vec();

    c.bench_function("d_separation_100_nodes", |b| {
        b.iter(|| {
            let mut connected = 0;
            for y in &nodes[50..70] {
                if g.is_d_connected_to(&nodes[0], y, &z) {
                    connected += 1;
                }
            }
            connected
        })
    });
}

fn bench_ancestors(c: &mut Criterion) {
    let dag = random_dag(200, 4.0, 11);
    let g = dag.graph();
    let targets: Vec<_> = g.nodes()[190..].to_vec();

    c.bench_function("ancestors_200_nodes", |b| b.iter(|| g.ancestors(&targets).len()));
}

criterion_group!(benches, bench_dseparation, bench_ancestors);
criterion_main!(benches);
