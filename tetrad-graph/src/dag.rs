//! DAG adapter: a [`Graph`] that only ever holds directed, acyclic edges.
//!
//! Cycle detection mirrors the usual petgraph approach: a reachability check
//! before every insertion, and Tarjan's SCC for validating a whole graph.

use std::collections::{HashMap, VecDeque};

use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use tetrad_core::errors::GraphError;
use tetrad_core::Node;

use crate::edge::Edge;
use crate::graph::Graph;

/// A directed acyclic graph. Wraps a [`Graph`] and rejects non-directed
/// edges and edges that would close a cycle; all queries go through
/// [`Dag::graph`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dag {
    graph: Graph,
}

impl Dag {
    pub fn new() -> Self {
        Self::default()
    }

    /// A DAG over `nodes` with no edges.
    pub fn with_nodes<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        Self {
            graph: Graph::with_nodes(nodes),
        }
    }

    /// Adopt an existing graph after checking it is a DAG.
    pub fn from_graph(graph: Graph) -> Result<Self, GraphError> {
        if let Some(edge) = graph.edges().into_iter().find(|e| !e.is_directed()) {
            return Err(GraphError::NotDirected {
                edge: edge.to_string(),
            });
        }
        if let Some(cycle) = find_cycles(&graph).into_iter().next() {
            let path: Vec<&str> = cycle.iter().map(Node::name).collect();
            return Err(GraphError::CycleDetected {
                path: path.join(" -> "),
            });
        }
        Ok(Self { graph })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        self.graph.add_node(node)
    }

    pub fn remove_node(&mut self, node: &Node) -> Result<(), GraphError> {
        self.graph.remove_node(node)
    }

    /// Insert a directed edge, refusing anything else and anything that
    /// would create a cycle.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        if !edge.is_directed() {
            return Err(GraphError::NotDirected {
                edge: edge.to_string(),
            });
        }
        let (from, to) = if edge.points_towards(edge.node2()) {
            (edge.node1(), edge.node2())
        } else {
            (edge.node2(), edge.node1())
        };
        if self.graph.contains_node(from) && self.graph.contains_node(to) && self.graph.exists_directed_path(to, from) {
            return Err(GraphError::CycleDetected {
                path: format!("{} -> {} -> ... -> {}", from.name(), to.name(), from.name()),
            });
        }
        self.graph.add_edge(edge)
    }

    /// Shorthand for `add_edge(Edge::directed(from, to))`.
    pub fn add_directed_edge(&mut self, from: &Node, to: &Node) -> Result<(), GraphError> {
        self.add_edge(Edge::directed(from.clone(), to.clone()))
    }

    pub fn remove_edge(&mut self, a: &Node, b: &Node) -> Result<Edge, GraphError> {
        self.graph.remove_edge(a, b)
    }

    /// Nodes ordered so that every parent precedes its children; ties keep
    /// insertion order.
    pub fn topological_order(&self) -> Vec<Node> {
        let nodes = self.graph.nodes();
        let mut in_degree: HashMap<Node, usize> = nodes
            .iter()
            .map(|n| (n.clone(), self.graph.parents(n).len()))
            .collect();
        let mut ready: VecDeque<Node> = nodes
            .iter()
            .filter(|n| in_degree.get(*n) == Some(&0))
            .cloned()
            .collect();
        let mut order = Vec::with_capacity(nodes.len());
        while let Some(node) = ready.pop_front() {
            for child in self.graph.children(&node) {
                if let Some(deg) = in_degree.get_mut(&child) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.push_back(child);
                    }
                }
            }
            order.push(node);
        }
        order
    }
}

/// Directed cycles in `graph`, considering only its `-->` edges. Each entry
/// is one strongly connected component with more than one node.
pub fn find_cycles(graph: &Graph) -> Vec<Vec<Node>> {
    let nodes = graph.nodes();
    let mut directed: DiGraph<usize, ()> = DiGraph::new();
    let positions: HashMap<&Node, petgraph::graph::NodeIndex> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n, directed.add_node(i)))
        .collect();
    for edge in graph.edges().iter().filter(|e| e.is_directed()) {
        let (from, to) = if edge.points_towards(edge.node2()) {
            (edge.node1(), edge.node2())
        } else {
            (edge.node2(), edge.node1())
        };
        if let (Some(&a), Some(&b)) = (positions.get(from), positions.get(to)) {
            directed.add_edge(a, b, ());
        }
    }
    tarjan_scc(&directed)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .map(|scc| scc.into_iter().map(|i| nodes[directed[i]].clone()).collect())
        .collect()
}
