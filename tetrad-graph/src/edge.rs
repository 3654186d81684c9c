//! Edges with an endpoint mark at each end.

use std::fmt;

use serde::{Deserialize, Serialize};
use tetrad_core::Node;

use crate::endpoint::Endpoint;

/// An edge between two nodes. `endpoint1` sits at `node1`, `endpoint2` at
/// `node2`.
///
/// Two edges are equal when they join the same pair with the same mark at
/// each node, whichever node is stored first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    node1: Node,
    node2: Node,
    endpoint1: Endpoint,
    endpoint2: Endpoint,
}

impl Edge {
    pub fn new(node1: Node, node2: Node, endpoint1: Endpoint, endpoint2: Endpoint) -> Self {
        Self {
            node1,
            node2,
            endpoint1,
            endpoint2,
        }
    }

    /// `from --> to`.
    pub fn directed(from: Node, to: Node) -> Self {
        Self::new(from, to, Endpoint::Tail, Endpoint::Arrow)
    }

    /// `a --- b`.
    pub fn undirected(a: Node, b: Node) -> Self {
        Self::new(a, b, Endpoint::Tail, Endpoint::Tail)
    }

    /// `a o-o b`.
    pub fn nondirected(a: Node, b: Node) -> Self {
        Self::new(a, b, Endpoint::Circle, Endpoint::Circle)
    }

    /// `a <-> b`.
    pub fn bidirected(a: Node, b: Node) -> Self {
        Self::new(a, b, Endpoint::Arrow, Endpoint::Arrow)
    }

    /// `from o-> to`.
    pub fn partially_oriented(from: Node, to: Node) -> Self {
        Self::new(from, to, Endpoint::Circle, Endpoint::Arrow)
    }

    pub fn node1(&self) -> &Node {
        &self.node1
    }

    pub fn node2(&self) -> &Node {
        &self.node2
    }

    pub fn endpoint1(&self) -> Endpoint {
        self.endpoint1
    }

    pub fn endpoint2(&self) -> Endpoint {
        self.endpoint2
    }

    pub fn contains(&self, node: &Node) -> bool {
        &self.node1 == node || &self.node2 == node
    }

    /// The mark at `node`, or `None` if the edge does not touch it.
    pub fn proximal_endpoint(&self, node: &Node) -> Option<Endpoint> {
        if &self.node1 == node {
            Some(self.endpoint1)
        } else if &self.node2 == node {
            Some(self.endpoint2)
        } else {
            None
        }
    }

    /// The mark at the end away from `node`.
    pub fn distal_endpoint(&self, node: &Node) -> Option<Endpoint> {
        if &self.node1 == node {
            Some(self.endpoint2)
        } else if &self.node2 == node {
            Some(self.endpoint1)
        } else {
            None
        }
    }

    /// The node at the other end from `node`.
    pub fn distal_node(&self, node: &Node) -> Option<&Node> {
        if &self.node1 == node {
            Some(&self.node2)
        } else if &self.node2 == node {
            Some(&self.node1)
        } else {
            None
        }
    }

    /// Tail at one end and arrow at the other.
    pub fn is_directed(&self) -> bool {
        matches!(
            (self.endpoint1, self.endpoint2),
            (Endpoint::Tail, Endpoint::Arrow) | (Endpoint::Arrow, Endpoint::Tail)
        )
    }

    pub fn is_bidirected(&self) -> bool {
        self.endpoint1 == Endpoint::Arrow && self.endpoint2 == Endpoint::Arrow
    }

    pub fn is_undirected(&self) -> bool {
        self.endpoint1 == Endpoint::Tail && self.endpoint2 == Endpoint::Tail
    }

    pub fn is_nondirected(&self) -> bool {
        self.endpoint1 == Endpoint::Circle && self.endpoint2 == Endpoint::Circle
    }

    /// True for `a --> b` written either way round, with `b == node`.
    pub fn points_towards(&self, node: &Node) -> bool {
        self.is_directed() && self.proximal_endpoint(node) == Some(Endpoint::Arrow)
    }

    /// The same edge with its nodes swapped.
    pub fn reversed_storage(&self) -> Self {
        Self::new(
            self.node2.clone(),
            self.node1.clone(),
            self.endpoint2,
            self.endpoint1,
        )
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        (self.node1 == other.node1
            && self.node2 == other.node2
            && self.endpoint1 == other.endpoint1
            && self.endpoint2 == other.endpoint2)
            || (self.node1 == other.node2
                && self.node2 == other.node1
                && self.endpoint1 == other.endpoint2
                && self.endpoint2 == other.endpoint1)
    }
}

impl Eq for Edge {}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `A <-o B` reads better as `B o-> A`; Tetrad prints directed-ish
        // edges with the arrow on the right.
        if self.endpoint1 == Endpoint::Arrow && self.endpoint2 != Endpoint::Arrow {
            return self.reversed_storage().fmt(f);
        }
        write!(
            f,
            "{} {}-{} {}",
            self.node1,
            self.endpoint1.left_glyph(),
            self.endpoint2.right_glyph(),
            self.node2
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(name: &str) -> Node {
        Node::measured(name)
    }

    #[test]
    fn display_uses_tetrad_glyphs() {
        assert_eq!(Edge::directed(n("A"), n("B")).to_string(), "A --> B");
        assert_eq!(Edge::undirected(n("A"), n("B")).to_string(), "A --- B");
        assert_eq!(Edge::nondirected(n("A"), n("B")).to_string(), "A o-o B");
        assert_eq!(Edge::bidirected(n("A"), n("B")).to_string(), "A <-> B");
        assert_eq!(Edge::partially_oriented(n("A"), n("B")).to_string(), "A o-> B");
        assert_eq!(Edge::directed(n("B"), n("A")).reversed_storage().to_string(), "B --> A");
    }

    #[test]
    fn equality_ignores_storage_order() {
        let e = Edge::directed(n("A"), n("B"));
        assert_eq!(e, e.reversed_storage());
        assert_ne!(e, Edge::directed(n("B"), n("A")));
    }

    #[test]
    fn proximal_and_distal() {
        let e = Edge::partially_oriented(n("A"), n("B"));
        assert_eq!(e.proximal_endpoint(&n("A")), Some(Endpoint::Circle));
        assert_eq!(e.distal_endpoint(&n("A")), Some(Endpoint::Arrow));
        assert_eq!(e.distal_node(&n("B")), Some(&n("A")));
        assert_eq!(e.proximal_endpoint(&n("C")), None);
        assert!(Edge::directed(n("A"), n("B")).points_towards(&n("B")));
        assert!(!Edge::directed(n("A"), n("B")).points_towards(&n("A")));
    }
}
