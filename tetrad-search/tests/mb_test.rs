//! Markov-blanket searches under the d-separation oracle. Every variant
//! should return parents, children and the children's other parents.

use tetrad_core::errors::SearchError;
use tetrad_core::{CancellationToken, Node, RunContext, SearchStatus};
use tetrad_search::{CpcMb, DSeparationTest, GrowShrink, HitonMb, MbSearch, Mbfs, Pcmb};
use test_fixtures::load_dag;

fn n(name: &str) -> Node {
    Node::measured(name)
}

fn names(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(Node::name).collect()
}

fn five_node_oracle() -> DSeparationTest {
    DSeparationTest::new(load_dag("dags/five_node.json").into_graph())
}

fn all_searches(test: &DSeparationTest) -> Vec<Box<dyn MbSearch + '_>> {
    vec![
        Box::new(GrowShrink::new(test)),
        Box::new(HitonMb::new(test)),
        Box::new(Pcmb::new(test)),
        Box::new(Mbfs::new(test)),
        Box::new(CpcMb::new(test)),
    ]
}

#[test]
fn blanket_includes_spouse_of_child() {
    let test = five_node_oracle();
    for search in all_searches(&test) {
        let outcome = search.find_mb(&n("X4"), &RunContext::new()).unwrap();
        assert!(outcome.is_complete(), "{}", search.algorithm_name());
        assert_eq!(names(&outcome.data), ["X2", "X3", "X5"], "{}", search.algorithm_name());
    }
}

#[test]
fn blanket_of_collider_child_is_parents_and_child() {
    let test = five_node_oracle();
    for search in all_searches(&test) {
        let outcome = search.find_mb(&n("X3"), &RunContext::new()).unwrap();
        assert_eq!(names(&outcome.data), ["X1", "X2", "X4"], "{}", search.algorithm_name());
    }
}

#[test]
fn unknown_target_is_rejected() {
    let test = five_node_oracle();
    for search in all_searches(&test) {
        assert!(matches!(
            search.find_mb(&n("Q"), &RunContext::new()),
            Err(SearchError::UnknownTarget { .. })
        ));
    }
}

#[test]
fn invalid_depth_is_rejected() {
    let test = five_node_oracle();
    assert!(matches!(
        Mbfs::new(&test).with_depth(-3).find_mb(&n("X4"), &RunContext::new()),
        Err(SearchError::InvalidDepth { depth: -3 })
    ));
    assert!(matches!(
        HitonMb::new(&test).with_depth(-2).find_mb(&n("X4"), &RunContext::new()),
        Err(SearchError::InvalidDepth { .. })
    ));
}

#[test]
fn cancelled_search_is_flagged() {
    let test = five_node_oracle();
    let token = CancellationToken::new();
    token.cancel();
    let ctx = RunContext::new().with_token(token);
    for search in all_searches(&test) {
        let outcome = search.find_mb(&n("X4"), &ctx).unwrap();
        assert_eq!(outcome.status, SearchStatus::Cancelled, "{}", search.algorithm_name());
    }
}

#[test]
fn mbfs_graph_orients_spouse_collider() {
    let test = five_node_oracle();
    let graph = Mbfs::new(&test).find_mb_graph(&n("X4"), &RunContext::new()).unwrap().data;
    assert!(graph.is_parent_of(&n("X4"), &n("X5")));
    assert!(graph.is_parent_of(&n("X2"), &n("X5")));
    assert!(graph.is_adjacent(&n("X3"), &n("X4")));
}

#[test]
fn cpc_mb_graph_marks_noncolliders() {
    let test = five_node_oracle();
    let graph = CpcMb::new(&test).find_mb_graph(&n("X4"), &RunContext::new()).unwrap().data;
    assert!(graph.is_parent_of(&n("X2"), &n("X5")));
    assert!(graph.is_underline_triple(&n("X4"), &n("X3"), &n("X1")));
    assert!(graph.ambiguous_triples().is_empty());
}
