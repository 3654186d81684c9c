//! Property tests for tetrad-search over random DAGs with the
//! d-separation oracle.

use std::collections::BTreeSet;

use proptest::prelude::*;

use tetrad_core::{Node, RunContext};
use tetrad_graph::{Endpoint, Knowledge};
use tetrad_search::collider::orient_colliders;
use tetrad_search::{DSeparationTest, Fas, FciOrient, GraphSearch, GrowShrink, MbSearch, Pc};
use test_fixtures::random_dag;

// =============================================================================
// With a perfect oracle the adjacency search finds the true skeleton.
// =============================================================================
proptest! {
    #[test]
    fn oracle_skeleton_matches_dag(n in 2usize..9, degree in 0.5f64..3.0, seed in any::<u64>()) {
        let dag = random_dag(n, degree, seed);
        let truth = dag.graph();
        let test = DSeparationTest::new(truth.clone());
        let result = Fas::new(&test).search(&RunContext::new()).unwrap().data;

        prop_assert_eq!(result.graph.num_edges(), truth.num_edges());
        let nodes = truth.nodes();
        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                prop_assert_eq!(result.graph.is_adjacent(a, b), truth.is_adjacent(a, b));
                // Every removed pair carries a sepset.
                prop_assert_eq!(result.sepsets.contains(a, b), !truth.is_adjacent(a, b));
            }
        }
    }
}

// =============================================================================
// PC never directs an edge against the generating DAG.
// =============================================================================
proptest! {
    #[test]
    fn pc_directions_agree_with_dag(n in 2usize..8, degree in 0.5f64..3.0, seed in any::<u64>()) {
        let dag = random_dag(n, degree, seed);
        let truth = dag.graph();
        let test = DSeparationTest::new(truth.clone());
        let pattern = Pc::new(&test).search(&RunContext::new()).unwrap().data.graph;
        for edge in pattern.edges() {
            if edge.is_directed() {
                let (from, to) = if edge.endpoint2() == Endpoint::Arrow {
                    (edge.node1(), edge.node2())
                } else {
                    (edge.node2(), edge.node1())
                };
                prop_assert!(truth.is_parent_of(from, to), "{} not in DAG", edge);
            }
        }
    }
}

// =============================================================================
// FCI rule passes only ever replace circles.
// =============================================================================
proptest! {
    #[test]
    fn fci_rules_never_add_circles(n in 3usize..8, degree in 1.0f64..3.0, seed in any::<u64>()) {
        let dag = random_dag(n, degree, seed);
        let test = DSeparationTest::new(dag.graph().clone());
        let result = Fas::new(&test).search(&RunContext::new()).unwrap().data;
        let knowledge = Knowledge::new();

        let mut pag = result.graph;
        pag.reorient_all_with(Endpoint::Circle);
        orient_colliders(&mut pag, &result.sepsets, &knowledge, false).unwrap();

        let rules = FciOrient::new(&result.sepsets, &knowledge);
        let mut circles = pag.count_endpoints(Endpoint::Circle);
        for _ in 0..(2 * pag.num_edges() + 1) {
            let changed = rules.apply_rules_once(&mut pag).unwrap();
            let now = pag.count_endpoints(Endpoint::Circle);
            prop_assert!(now <= circles);
            prop_assert!(changed == 0 || now < circles);
            circles = now;
            if changed == 0 {
                break;
            }
        }
    }
}

// =============================================================================
// Grow-shrink finds parents, children and the children's other parents.
// =============================================================================
proptest! {
    #[test]
    fn grow_shrink_returns_true_blanket(n in 2usize..9, degree in 0.5f64..3.0, seed in any::<u64>(), pick in any::<prop::sample::Index>()) {
        let dag = random_dag(n, degree, seed);
        let truth = dag.graph();
        let nodes = truth.nodes();
        let target = pick.get(&nodes).clone();

        let mut expected: BTreeSet<Node> = truth.parents(&target).into_iter().collect();
        for child in truth.children(&target) {
            expected.extend(truth.parents(&child));
            expected.insert(child);
        }
        expected.remove(&target);

        let test = DSeparationTest::new(truth.clone());
        let found = GrowShrink::new(&test).find_mb(&target, &RunContext::new()).unwrap().data;
        let found: BTreeSet<Node> = found.into_iter().collect();
        prop_assert_eq!(found, expected);
    }
}
