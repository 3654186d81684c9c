//! d-separation and path queries on DAGs and PAGs.

use test_fixtures::{chain4, collider, load_dag};
use tetrad_graph::{Edge, Graph, Node};

fn n(name: &str) -> Node {
    Node::measured(name)
}

#[test]
fn chain_dseparation() {
    let dag = chain4();
    let g = dag.graph();
    assert!(g.is_d_connected_to(&n("A"), &n("D"), &[]));
    assert!(g.is_d_separated_from(&n("A"), &n("D"), &[n("B")]));
    assert!(g.is_d_separated_from(&n("A"), &n("D"), &[n("C")]));
    assert!(g.is_d_separated_from(&n("A"), &n("C"), &[n("B")]));
}

#[test]
fn collider_dseparation() {
    let dag = collider();
    let g = dag.graph();
    assert!(g.is_d_separated_from(&n("A"), &n("B"), &[]));
    assert!(g.is_d_connected_to(&n("A"), &n("B"), &[n("C")]));
}

#[test]
fn five_node_fixture() {
    // X1 -> X3 <- X2, X3 -> X4 -> X5, X2 -> X5
    let dag = load_dag("dags/five_node.json");
    let g = dag.graph();
    assert_eq!(g.num_nodes(), 5);
    assert!(g.is_d_separated_from(&n("X1"), &n("X2"), &[]));
    assert!(g.is_d_connected_to(&n("X1"), &n("X2"), &[n("X4")]));
    assert!(g.is_d_separated_from(&n("X1"), &n("X5"), &[n("X4"), n("X2")]));
    assert!(g.is_d_connected_to(&n("X1"), &n("X5"), &[n("X2")]));
    assert!(g.is_ancestor_of(&n("X1"), &n("X5")));
    assert!(!g.is_ancestor_of(&n("X5"), &n("X1")));
}

#[test]
fn latent_nodes_keep_their_type() {
    let dag = load_dag("dags/latent_confounded.json");
    let latent = dag.graph().node("L").unwrap();
    assert_eq!(latent.node_type(), tetrad_graph::NodeType::Latent);
}

#[test]
fn pag_possible_ancestors() {
    // A o-> B <-> C, B --> D
    let mut g = Graph::with_nodes(&[n("A"), n("B"), n("C"), n("D")]);
    g.add_edge(Edge::partially_oriented(n("A"), n("B"))).unwrap();
    g.add_edge(Edge::bidirected(n("B"), n("C"))).unwrap();
    g.add_edge(Edge::directed(n("B"), n("D"))).unwrap();
    let pa = g.possible_ancestors(&[n("D")]);
    assert!(pa.contains(&n("A")));
    assert!(pa.contains(&n("B")));
    assert!(!pa.contains(&n("C")));
    // B is a collider on A *-> B <-> C and a possible ancestor of D.
    assert!(g.is_d_connected_to(&n("A"), &n("C"), &[n("D")]));
    assert!(g.is_d_separated_from(&n("A"), &n("C"), &[]));
}

#[test]
fn directed_and_potentially_directed_paths() {
    let mut g = Graph::with_nodes(&[n("A"), n("B"), n("C")]);
    g.add_edge(Edge::nondirected(n("A"), n("B"))).unwrap();
    g.add_edge(Edge::directed(n("B"), n("C"))).unwrap();
    assert!(!g.exists_directed_path(&n("A"), &n("C")));
    assert!(g.exists_potentially_directed_path(&n("A"), &n("C")));
    assert!(!g.exists_potentially_directed_path(&n("C"), &n("A")));
    assert!(g.exists_semi_directed_path(&n("A"), &n("C")));
}
