use criterion::{criterion_group, criterion_main, Criterion};

use tetrad_core::RunContext;
use tetrad_search::{DSeparationTest, Fas, FisherZ, GraphSearch, Pc};
use test_fixtures::{random_dag, simulate_linear_gaussian};

fn bench_fas_oracle(c: &mut Criterion) {
    let dag = random_dag(30, 2.0, 3);
    let test = DSeparationTest::new(dag.graph().clone());

    c.bench_function("fas_oracle_30_nodes", |b| {
        b.iter(|| {
            Fas::new(&test)
                .with_depth(3)
                .search(&RunContext::new())
                .map(|o| o.data.graph.num_edges())
        })
    });
}

fn bench_pc_fisher_z(c: &mut Criterion) {
    let dag = random_dag(20, 2.0, 17);
    let data = simulate_linear_gaussian(&dag, 1000, 17);
    let Ok(test) = FisherZ::new(&data, 0.01) else {
        return;
    };

    c.bench_function("pc_fisher_z_20_vars_1000_rows", |b| {
        b.iter(|| Pc::new(&test).search(&RunContext::new()).map(|o| o.data.graph.num_edges()))
    });
}

criterion_group!(benches, bench_fas_oracle, bench_pc_fisher_z);
criterion_main!(benches);
