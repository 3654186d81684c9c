//! Property tests for tetrad-graph over random DAGs.

use proptest::prelude::*;

use test_fixtures::random_dag;
use tetrad_graph::dag::find_cycles;

// =============================================================================
// Random DAGs never contain a cycle.
// =============================================================================
proptest! {
    #[test]
    fn random_dags_are_acyclic(n in 2usize..15, degree in 0.5f64..4.0, seed in any::<u64>()) {
        let dag = random_dag(n, degree, seed);
        prop_assert!(find_cycles(dag.graph()).is_empty());
        prop_assert_eq!(dag.topological_order().len(), n);
    }
}

// =============================================================================
// Adjacent nodes are never d-separated; a node is d-separated from any
// non-descendant non-parent given its parents (local Markov property).
// =============================================================================
proptest! {
    #[test]
    fn local_markov_property(n in 2usize..10, degree in 0.5f64..3.0, seed in any::<u64>()) {
        let dag = random_dag(n, degree, seed);
        let g = dag.graph();
        let nodes = g.nodes();
        for x in &nodes {
            let parents = g.parents(x);
            let descendants = g.descendants(std::slice::from_ref(x));
            for y in &nodes {
                if y == x {
                    continue;
                }
                if g.is_adjacent(x, y) {
                    prop_assert!(g.is_d_connected_to(x, y, &[]));
                    prop_assert!(g.is_d_connected_to(x, y, &parents.iter().filter(|p| *p != y).cloned().collect::<Vec<_>>()));
                } else if !descendants.contains(y) {
                    prop_assert!(g.is_d_separated_from(x, y, &parents));
                }
            }
        }
    }
}

// =============================================================================
// d-separation is symmetric.
// =============================================================================
proptest! {
    #[test]
    fn dseparation_is_symmetric(n in 3usize..9, degree in 0.5f64..3.0, seed in any::<u64>()) {
        let dag = random_dag(n, degree, seed);
        let g = dag.graph();
        let nodes = g.nodes();
        let z = vec![nodes[n - 1].clone()];
        for x in &nodes[..n - 1] {
            for y in &nodes[..n - 1] {
                if x != y {
                    prop_assert_eq!(g.is_d_connected_to(x, y, &z), g.is_d_connected_to(y, x, &z));
                }
            }
        }
    }
}
