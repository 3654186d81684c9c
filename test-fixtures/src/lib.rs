//! Shared fixtures for Tetrad test suites: canonical graphs, seeded random
//! DAGs, data simulated from a DAG, and JSON graph fixtures under `dags/`.
//!
//! Everything here is deterministic for a given seed.

use std::path::PathBuf;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Gamma, Normal};
use serde::Deserialize;
use tetrad_core::{DataSet, Node};
use tetrad_graph::Dag;

/// Root directory of the test-fixtures crate.
fn fixtures_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    // Walk up from whichever crate is running the tests.
    while !path.join("test-fixtures").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

#[derive(Debug, Deserialize)]
struct DagFixture {
    nodes: Vec<String>,
    #[serde(default)]
    latent: Vec<String>,
    edges: Vec<(String, String)>,
}

/// Load a DAG from a JSON fixture (`{"nodes": [...], "latent": [...],
/// "edges": [[from, to], ...]}`).
///
/// # Panics
/// Panics if the file is missing, malformed, or not a DAG.
pub fn load_dag(relative_path: &str) -> Dag {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    let fixture: DagFixture = serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e));

    let mut dag = Dag::new();
    for name in &fixture.nodes {
        let node = if fixture.latent.contains(name) {
            Node::latent(name.as_str())
        } else {
            Node::measured(name.as_str())
        };
        dag.add_node(node).expect("fixture node names are unique");
    }
    for (from, to) in &fixture.edges {
        dag.add_directed_edge(&Node::measured(from.as_str()), &Node::measured(to.as_str()))
            .unwrap_or_else(|e| panic!("Fixture {} is not a DAG: {}", path.display(), e));
    }
    dag
}

/// Nodes `X1..=Xn`.
pub fn numbered_nodes(n: usize) -> Vec<Node> {
    (1..=n).map(|i| Node::measured(format!("X{i}"))).collect()
}

/// Build a DAG from node names and `(from, to)` pairs.
///
/// # Panics
/// Panics on unknown names or cycles.
pub fn dag_from_edges(names: &[&str], edges: &[(&str, &str)]) -> Dag {
    let nodes: Vec<Node> = names.iter().map(|n| Node::measured(*n)).collect();
    let mut dag = Dag::with_nodes(&nodes);
    for (from, to) in edges {
        dag.add_directed_edge(&Node::measured(*from), &Node::measured(*to))
            .unwrap_or_else(|e| panic!("bad fixture edge {from} -> {to}: {e}"));
    }
    dag
}

/// `A --> B --> C --> D`.
pub fn chain4() -> Dag {
    dag_from_edges(&["A", "B", "C", "D"], &[("A", "B"), ("B", "C"), ("C", "D")])
}

/// `A --> C <-- B`.
pub fn collider() -> Dag {
    dag_from_edges(&["A", "B", "C"], &[("A", "C"), ("B", "C")])
}

/// A random DAG over `X1..=Xn`. Nodes are shuffled into a causal order and
/// each forward pair gets an edge with probability
/// `avg_degree / (n - 1)`.
pub fn random_dag(n: usize, avg_degree: f64, seed: u64) -> Dag {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let nodes = numbered_nodes(n);
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut rng);

    let p = if n > 1 {
        (avg_degree / (n as f64 - 1.0)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut dag = Dag::with_nodes(&nodes);
    for i in 0..n {
        for j in (i + 1)..n {
            if rng.gen_bool(p) {
                dag.add_directed_edge(&nodes[order[i]], &nodes[order[j]])
                    .expect("forward edges in a fixed order cannot form a cycle");
            }
        }
    }
    dag
}

/// Simulate a linear-Gaussian structural model over the measured nodes of
/// `dag`. Edge coefficients are drawn from `±[0.5, 1.5]`, noise is standard
/// normal. Latent nodes are simulated but not returned.
pub fn simulate_linear_gaussian(dag: &Dag, rows: usize, seed: u64) -> DataSet {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 1.0).expect("unit normal");
    let graph = dag.graph();
    let order = dag.topological_order();
    let all = graph.nodes();
    let position = |node: &Node| all.iter().position(|n| n == node).expect("node from this graph");

    let mut coefficients: Vec<Vec<(usize, f64)>> = vec![Vec::new(); all.len()];
    for node in &order {
        for parent in graph.parents(node) {
            let magnitude = rng.gen_range(0.5..1.5);
            let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            coefficients[position(node)].push((position(&parent), sign * magnitude));
        }
    }

    let mut values = vec![vec![0.0; all.len()]; rows];
    for row in values.iter_mut() {
        for node in &order {
            let i = position(node);
            let mean: f64 = coefficients[i].iter().map(|&(p, c)| c * row[p]).sum();
            row[i] = mean + noise.sample(&mut rng);
        }
    }

    let measured: Vec<usize> = (0..all.len()).filter(|&i| !is_latent(&all[i])).collect();
    let names: Vec<&str> = measured.iter().map(|&i| all[i].name()).collect();
    let rows: Vec<Vec<f64>> = values
        .iter()
        .map(|row| measured.iter().map(|&i| row[i]).collect())
        .collect();
    DataSet::continuous(&names, &rows).expect("simulated columns are well formed")
}

/// Simulate categorical data with `categories` values per node. Each parent
/// configuration gets its own conditional distribution, drawn with a small
/// Gamma shape so that dependencies are strong.
pub fn simulate_discrete(dag: &Dag, rows: usize, categories: usize, seed: u64) -> DataSet {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let gamma = Gamma::new(0.4, 1.0).expect("positive gamma parameters");
    let graph = dag.graph();
    let order = dag.topological_order();
    let all = graph.nodes();
    let position = |node: &Node| all.iter().position(|n| n == node).expect("node from this graph");

    let parents: Vec<Vec<usize>> = all
        .iter()
        .map(|n| graph.parents(n).iter().map(position).collect())
        .collect();
    let tables: Vec<Vec<Vec<f64>>> = parents
        .iter()
        .map(|ps| {
            let configs = categories.pow(ps.len() as u32);
            (0..configs)
                .map(|_| {
                    let raw: Vec<f64> = (0..categories).map(|_| gamma.sample(&mut rng) + 1e-3).collect();
                    let total: f64 = raw.iter().sum();
                    raw.into_iter().map(|p| p / total).collect()
                })
                .collect()
        })
        .collect();

    let mut values = vec![vec![0usize; all.len()]; rows];
    for row in values.iter_mut() {
        for node in &order {
            let i = position(node);
            let config = parents[i].iter().fold(0, |acc, &p| acc * categories + row[p]);
            let dist = &tables[i][config];
            let u: f64 = rng.gen();
            let mut cumulative = 0.0;
            let mut value = categories - 1;
            for (k, p) in dist.iter().enumerate() {
                cumulative += p;
                if u < cumulative {
                    value = k;
                    break;
                }
            }
            row[i] = value;
        }
    }

    let measured: Vec<usize> = (0..all.len()).filter(|&i| !is_latent(&all[i])).collect();
    let names: Vec<&str> = measured.iter().map(|&i| all[i].name()).collect();
    let rows: Vec<Vec<usize>> = values
        .iter()
        .map(|row| measured.iter().map(|&i| row[i]).collect())
        .collect();
    DataSet::discrete(&names, &rows).expect("simulated columns are well formed")
}

fn is_latent(node: &Node) -> bool {
    node.node_type() == tetrad_core::NodeType::Latent
}
