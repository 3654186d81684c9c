//! petgraph::StableGraph wrapper carrying endpoint marks on every edge.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Undirected;
use tetrad_core::errors::GraphError;
use tetrad_core::Node;

use crate::edge::Edge;
use crate::endpoint::Endpoint;
use crate::triple::Triple;

/// Node weight: the node plus its insertion sequence number, which fixes
/// the enumeration order even after petgraph reuses vacant slots.
#[derive(Debug, Clone)]
pub(crate) struct GraphNode {
    pub(crate) node: Node,
    pub(crate) seq: u64,
}

/// Edge weight. `at_source` is the mark at the node petgraph stores as the
/// edge source (the first node passed to `add_edge`).
#[derive(Debug, Clone, Copy)]
pub(crate) struct EdgeMarks {
    pub(crate) at_source: Endpoint,
    pub(crate) at_target: Endpoint,
}

pub(crate) type MarkedStableGraph = StableGraph<GraphNode, EdgeMarks, Undirected>;

/// A mixed graph: at most one edge per node pair, each edge with its own
/// pair of endpoint marks. Node and adjacency enumeration follow insertion
/// order.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub(crate) graph: MarkedStableGraph,
    node_index: HashMap<String, NodeIndex>,
    next_seq: u64,
    ambiguous: BTreeSet<Triple>,
    underlines: BTreeSet<Triple>,
    dotted_underlines: BTreeSet<Triple>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph over `nodes` with no edges. Duplicate names are skipped.
    pub fn with_nodes<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            let _ = graph.add_node(node.clone());
        }
        graph
    }

    /// A graph over `nodes` with an undirected edge between every pair.
    pub fn complete_undirected(nodes: &[Node]) -> Self {
        let mut graph = Self::with_nodes(nodes);
        let indices: Vec<NodeIndex> = graph.ordered_indices();
        for (i, &a) in indices.iter().enumerate() {
            for &b in &indices[i + 1..] {
                graph.graph.add_edge(
                    a,
                    b,
                    EdgeMarks {
                        at_source: Endpoint::Tail,
                        at_target: Endpoint::Tail,
                    },
                );
            }
        }
        graph
    }

    // --- nodes ---

    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.node_index.contains_key(node.name()) {
            return Err(GraphError::DuplicateNode {
                name: node.name().to_string(),
            });
        }
        let name = node.name().to_string();
        let seq = self.next_seq;
        self.next_seq += 1;
        let idx = self.graph.add_node(GraphNode { node, seq });
        self.node_index.insert(name, idx);
        Ok(())
    }

    /// Remove a node together with its edges and any triple mentioning it.
    pub fn remove_node(&mut self, node: &Node) -> Result<(), GraphError> {
        let idx = self
            .node_index
            .remove(node.name())
            .ok_or_else(|| GraphError::NodeNotFound {
                name: node.name().to_string(),
            })?;
        self.graph.remove_node(idx);
        for set in [&mut self.ambiguous, &mut self.underlines, &mut self.dotted_underlines] {
            set.retain(|t| !t.contains(node));
        }
        Ok(())
    }

    pub fn contains_node(&self, node: &Node) -> bool {
        self.node_index.contains_key(node.name())
    }

    /// Look a node up by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.node_index
            .get(name)
            .and_then(|&idx| self.graph.node_weight(idx))
            .map(|w| &w.node)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> Vec<Node> {
        self.ordered_indices()
            .into_iter()
            .map(|idx| self.graph[idx].node.clone())
            .collect()
    }

    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    // --- edges ---

    /// Insert an edge. Rejects unknown nodes, self loops and a second edge
    /// between the same pair.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        if edge.node1() == edge.node2() {
            return Err(GraphError::SelfLoop {
                name: edge.node1().name().to_string(),
            });
        }
        let a = self.require(edge.node1())?;
        let b = self.require(edge.node2())?;
        if self.graph.find_edge(a, b).is_some() {
            return Err(GraphError::DuplicateEdge {
                node1: edge.node1().name().to_string(),
                node2: edge.node2().name().to_string(),
            });
        }
        self.graph.add_edge(
            a,
            b,
            EdgeMarks {
                at_source: edge.endpoint1(),
                at_target: edge.endpoint2(),
            },
        );
        Ok(())
    }

    /// Remove the edge between `a` and `b`, returning it. Triples running
    /// along the removed edge are dropped.
    pub fn remove_edge(&mut self, a: &Node, b: &Node) -> Result<Edge, GraphError> {
        let edge = self.edge(a, b).ok_or_else(|| GraphError::EdgeNotFound {
            node1: a.name().to_string(),
            node2: b.name().to_string(),
        })?;
        if let Some(e) = self.edge_index(a, b) {
            self.graph.remove_edge(e);
        }
        for set in [&mut self.ambiguous, &mut self.underlines, &mut self.dotted_underlines] {
            set.retain(|t| !t.uses_edge(a, b));
        }
        Ok(edge)
    }

    pub fn is_adjacent(&self, a: &Node, b: &Node) -> bool {
        self.edge_index(a, b).is_some()
    }

    /// The edge between `a` and `b`, stored with `a` as `node1` when the
    /// edge was inserted that way round.
    pub fn edge(&self, a: &Node, b: &Node) -> Option<Edge> {
        let e = self.edge_index(a, b)?;
        self.materialize(e)
    }

    /// All edges, ordered by the insertion order of their first node then
    /// their second.
    pub fn edges(&self) -> Vec<Edge> {
        let mut indexed: Vec<(u64, u64, EdgeIndex)> = self
            .graph
            .edge_references()
            .map(|e| {
                let (s, t) = (self.graph[e.source()].seq, self.graph[e.target()].seq);
                (s.min(t), s.max(t), e.id())
            })
            .collect();
        indexed.sort_unstable_by_key(|&(a, b, _)| (a, b));
        indexed
            .into_iter()
            .filter_map(|(_, _, e)| self.materialize(e))
            .collect()
    }

    /// Edges touching `node`, in adjacency order.
    pub fn edges_of(&self, node: &Node) -> Vec<Edge> {
        self.adjacent_nodes(node)
            .iter()
            .filter_map(|other| self.edge(node, other))
            .collect()
    }

    /// The mark at `b` on the edge `a - b`.
    pub fn endpoint(&self, a: &Node, b: &Node) -> Option<Endpoint> {
        let e = self.edge_index(a, b)?;
        let b_idx = self.index_of(b)?;
        let (source, _) = self.graph.edge_endpoints(e)?;
        let marks = self.graph[e];
        Some(if source == b_idx {
            marks.at_source
        } else {
            marks.at_target
        })
    }

    /// Set the mark at `b` on the edge `a - b`.
    pub fn set_endpoint(&mut self, a: &Node, b: &Node, endpoint: Endpoint) -> Result<(), GraphError> {
        let e = self.edge_index(a, b).ok_or_else(|| GraphError::EdgeNotFound {
            node1: a.name().to_string(),
            node2: b.name().to_string(),
        })?;
        let b_idx = self.require(b)?;
        let (source, _) = self
            .graph
            .edge_endpoints(e)
            .ok_or_else(|| GraphError::EdgeNotFound {
                node1: a.name().to_string(),
                node2: b.name().to_string(),
            })?;
        let marks = &mut self.graph[e];
        if source == b_idx {
            marks.at_source = endpoint;
        } else {
            marks.at_target = endpoint;
        }
        Ok(())
    }

    /// Orient `from --> to`, replacing whatever marks the edge had.
    pub fn set_directed(&mut self, from: &Node, to: &Node) -> Result<(), GraphError> {
        self.set_endpoint(to, from, Endpoint::Tail)?;
        self.set_endpoint(from, to, Endpoint::Arrow)
    }

    /// Set every endpoint of every edge to `endpoint`.
    pub fn reorient_all_with(&mut self, endpoint: Endpoint) {
        for marks in self.graph.edge_weights_mut() {
            marks.at_source = endpoint;
            marks.at_target = endpoint;
        }
    }

    /// Number of endpoint marks equal to `endpoint` across the graph.
    pub fn count_endpoints(&self, endpoint: Endpoint) -> usize {
        self.graph
            .edge_weights()
            .map(|m| usize::from(m.at_source == endpoint) + usize::from(m.at_target == endpoint))
            .sum()
    }

    // --- neighbourhoods ---

    /// Nodes adjacent to `node`, in insertion order.
    pub fn adjacent_nodes(&self, node: &Node) -> Vec<Node> {
        let Some(idx) = self.index_of(node) else {
            return Vec::new();
        };
        self.ordered_neighbors(idx)
            .into_iter()
            .map(|n| self.graph[n].node.clone())
            .collect()
    }

    pub fn degree(&self, node: &Node) -> usize {
        self.index_of(node)
            .map(|idx| self.graph.neighbors(idx).count())
            .unwrap_or(0)
    }

    /// Largest degree in the graph.
    pub fn max_degree(&self) -> usize {
        self.graph
            .node_indices()
            .map(|idx| self.graph.neighbors(idx).count())
            .max()
            .unwrap_or(0)
    }

    /// `a --> b`.
    pub fn is_parent_of(&self, a: &Node, b: &Node) -> bool {
        self.endpoint(b, a) == Some(Endpoint::Tail) && self.endpoint(a, b) == Some(Endpoint::Arrow)
    }

    pub fn is_child_of(&self, a: &Node, b: &Node) -> bool {
        self.is_parent_of(b, a)
    }

    /// Nodes `p` with `p --> node`.
    pub fn parents(&self, node: &Node) -> Vec<Node> {
        self.adjacent_nodes(node)
            .into_iter()
            .filter(|p| self.is_parent_of(p, node))
            .collect()
    }

    /// Nodes `c` with `node --> c`.
    pub fn children(&self, node: &Node) -> Vec<Node> {
        self.adjacent_nodes(node)
            .into_iter()
            .filter(|c| self.is_parent_of(node, c))
            .collect()
    }

    /// Neighbours `m` whose edge to `node` carries `endpoint` at `node`.
    pub fn nodes_into(&self, node: &Node, endpoint: Endpoint) -> Vec<Node> {
        self.adjacent_nodes(node)
            .into_iter()
            .filter(|m| self.endpoint(m, node) == Some(endpoint))
            .collect()
    }

    /// The subgraph induced by `nodes`, keeping their relative order.
    pub fn subgraph(&self, nodes: &[Node]) -> Graph {
        let keep: Vec<Node> = self
            .nodes()
            .into_iter()
            .filter(|n| nodes.contains(n))
            .collect();
        let mut sub = Graph::with_nodes(&keep);
        for edge in self.edges() {
            if keep.contains(edge.node1()) && keep.contains(edge.node2()) {
                let _ = sub.add_edge(edge);
            }
        }
        for t in &self.ambiguous {
            if keep.contains(t.x()) && keep.contains(t.y()) && keep.contains(t.z()) {
                sub.ambiguous.insert(t.clone());
            }
        }
        sub
    }

    // --- collider classification ---

    /// Arrow at `y` on both `x *-> y` and `z *-> y`. Shielding is ignored.
    pub fn is_def_collider(&self, x: &Node, y: &Node, z: &Node) -> bool {
        self.endpoint(x, y) == Some(Endpoint::Arrow) && self.endpoint(z, y) == Some(Endpoint::Arrow)
    }

    /// A tail (or null mark) at `y` on either edge. Circles leave the triple
    /// undetermined.
    pub fn is_def_noncollider(&self, x: &Node, y: &Node, z: &Node) -> bool {
        let (Some(e1), Some(e2)) = (self.endpoint(x, y), self.endpoint(z, y)) else {
            return false;
        };
        matches!(e1, Endpoint::Tail | Endpoint::Null) || matches!(e2, Endpoint::Tail | Endpoint::Null)
    }

    /// A definite collider whose ends are not adjacent.
    pub fn is_unshielded_collider(&self, x: &Node, y: &Node, z: &Node) -> bool {
        x != z && self.is_def_collider(x, y, z) && !self.is_adjacent(x, z)
    }

    /// `x - y - z` with `x` and `z` not adjacent.
    pub fn is_unshielded_triple(&self, x: &Node, y: &Node, z: &Node) -> bool {
        x != z && self.is_adjacent(x, y) && self.is_adjacent(z, y) && !self.is_adjacent(x, z)
    }

    // --- triple annotations ---

    pub fn add_ambiguous_triple(&mut self, x: &Node, y: &Node, z: &Node) {
        self.ambiguous.insert(Triple::new(x.clone(), y.clone(), z.clone()));
    }

    pub fn add_underline_triple(&mut self, x: &Node, y: &Node, z: &Node) {
        self.underlines.insert(Triple::new(x.clone(), y.clone(), z.clone()));
    }

    pub fn add_dotted_underline_triple(&mut self, x: &Node, y: &Node, z: &Node) {
        self.dotted_underlines
            .insert(Triple::new(x.clone(), y.clone(), z.clone()));
    }

    pub fn is_ambiguous_triple(&self, x: &Node, y: &Node, z: &Node) -> bool {
        self.ambiguous
            .contains(&Triple::new(x.clone(), y.clone(), z.clone()))
    }

    pub fn is_underline_triple(&self, x: &Node, y: &Node, z: &Node) -> bool {
        self.underlines
            .contains(&Triple::new(x.clone(), y.clone(), z.clone()))
    }

    pub fn is_dotted_underline_triple(&self, x: &Node, y: &Node, z: &Node) -> bool {
        self.dotted_underlines
            .contains(&Triple::new(x.clone(), y.clone(), z.clone()))
    }

    pub fn ambiguous_triples(&self) -> &BTreeSet<Triple> {
        &self.ambiguous
    }

    pub fn underline_triples(&self) -> &BTreeSet<Triple> {
        &self.underlines
    }

    pub fn dotted_underline_triples(&self) -> &BTreeSet<Triple> {
        &self.dotted_underlines
    }

    pub fn clear_triples(&mut self) {
        self.ambiguous.clear();
        self.underlines.clear();
        self.dotted_underlines.clear();
    }

    // --- index plumbing ---

    pub(crate) fn index_of(&self, node: &Node) -> Option<NodeIndex> {
        self.node_index.get(node.name()).copied()
    }

    fn require(&self, node: &Node) -> Result<NodeIndex, GraphError> {
        self.index_of(node).ok_or_else(|| GraphError::NodeNotFound {
            name: node.name().to_string(),
        })
    }

    fn edge_index(&self, a: &Node, b: &Node) -> Option<EdgeIndex> {
        let a = self.index_of(a)?;
        let b = self.index_of(b)?;
        self.graph.find_edge(a, b)
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> &Node {
        &self.graph[idx].node
    }

    /// Mark at `at` on the edge between `from` and `at`.
    pub(crate) fn endpoint_idx(&self, from: NodeIndex, at: NodeIndex) -> Option<Endpoint> {
        let e = self.graph.find_edge(from, at)?;
        let (source, _) = self.graph.edge_endpoints(e)?;
        let marks = self.graph[e];
        Some(if source == at {
            marks.at_source
        } else {
            marks.at_target
        })
    }

    pub(crate) fn ordered_indices(&self) -> Vec<NodeIndex> {
        let mut indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        indices.sort_unstable_by_key(|&idx| self.graph[idx].seq);
        indices
    }

    pub(crate) fn ordered_neighbors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors(idx).collect();
        neighbors.sort_unstable_by_key(|&n| self.graph[n].seq);
        neighbors.dedup();
        neighbors
    }

    fn materialize(&self, e: EdgeIndex) -> Option<Edge> {
        let (s, t) = self.graph.edge_endpoints(e)?;
        let marks = self.graph.edge_weight(e)?;
        Some(Edge::new(
            self.graph[s].node.clone(),
            self.graph[t].node.clone(),
            marks.at_source,
            marks.at_target,
        ))
    }
}

impl PartialEq for Graph {
    /// Same node names and the same edges; triple annotations are ignored.
    fn eq(&self, other: &Self) -> bool {
        if self.num_nodes() != other.num_nodes() || self.num_edges() != other.num_edges() {
            return false;
        }
        if self.nodes().iter().any(|n| !other.contains_node(n)) {
            return false;
        }
        self.edges().iter().all(|e| {
            other
                .edge(e.node1(), e.node2())
                .is_some_and(|o| &o == e)
        })
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Graph Nodes:")?;
        let names: Vec<&str> = self
            .ordered_indices()
            .into_iter()
            .map(|idx| self.graph[idx].node.name())
            .collect();
        writeln!(f, "{}", names.join(";"))?;
        writeln!(f)?;
        writeln!(f, "Graph Edges:")?;
        for (i, edge) in self.edges().iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, edge)?;
        }
        for (label, set) in [
            ("Ambiguous triples", &self.ambiguous),
            ("Underline triples", &self.underlines),
            ("Dotted underline triples", &self.dotted_underlines),
        ] {
            if set.is_empty() {
                continue;
            }
            writeln!(f)?;
            let items: Vec<String> = set.iter().map(ToString::to_string).collect();
            writeln!(f, "{label}: {}", items.join(", "))?;
        }
        Ok(())
    }
}
