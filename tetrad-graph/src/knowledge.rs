//! Background knowledge: forbidden and required directed pairs plus
//! temporal tiers.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tetrad_core::errors::GraphError;
use tetrad_core::Node;

use crate::endpoint::Endpoint;
use crate::graph::Graph;

/// Constraints a search must respect while building a graph.
///
/// A node in a later tier cannot cause a node in an earlier tier, so every
/// pair `(later, earlier)` is implicitly forbidden.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Knowledge {
    forbidden: BTreeSet<(String, String)>,
    required: BTreeSet<(String, String)>,
    tiers: BTreeMap<String, usize>,
}

impl Knowledge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forbid `from --> to`.
    pub fn set_forbidden(&mut self, from: &str, to: &str) {
        self.forbidden.insert((from.to_string(), to.to_string()));
    }

    /// Require `from --> to`.
    pub fn set_required(&mut self, from: &str, to: &str) {
        self.required.insert((from.to_string(), to.to_string()));
    }

    /// Place `name` in `tier` (moving it if already tiered).
    pub fn add_to_tier(&mut self, tier: usize, name: &str) {
        self.tiers.insert(name.to_string(), tier);
    }

    pub fn tier_of(&self, name: &str) -> Option<usize> {
        self.tiers.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.forbidden.is_empty() && self.required.is_empty() && self.tiers.is_empty()
    }

    /// Explicitly forbidden, or `from` sits in a later tier than `to`.
    pub fn is_forbidden(&self, from: &Node, to: &Node) -> bool {
        if self
            .forbidden
            .contains(&(from.name().to_string(), to.name().to_string()))
        {
            return true;
        }
        matches!(
            (self.tier_of(from.name()), self.tier_of(to.name())),
            (Some(a), Some(b)) if a > b
        )
    }

    pub fn is_required(&self, from: &Node, to: &Node) -> bool {
        self.required
            .contains(&(from.name().to_string(), to.name().to_string()))
    }

    /// Neither direction is allowed, so the adjacency can be dropped before
    /// any test runs.
    pub fn forbids_adjacency(&self, a: &Node, b: &Node) -> bool {
        self.is_forbidden(a, b) && self.is_forbidden(b, a)
    }

    /// Either direction is required, so the adjacency must survive.
    pub fn requires_adjacency(&self, a: &Node, b: &Node) -> bool {
        self.is_required(a, b) || self.is_required(b, a)
    }

    /// Required pairs, as `(from, to)` names.
    pub fn required_edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.required.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// Explicitly forbidden pairs, as `(from, to)` names. Tier-implied pairs
    /// are not listed.
    pub fn forbidden_edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.forbidden.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }
}

/// A mutable view of a [`Graph`] that refuses mutations contradicting
/// [`Knowledge`]. Only endpoint writes and edge removals are intercepted;
/// everything else is read through [`KnowledgeGuard::graph`].
pub struct KnowledgeGuard<'a> {
    graph: &'a mut Graph,
    knowledge: &'a Knowledge,
}

impl<'a> KnowledgeGuard<'a> {
    pub fn new(graph: &'a mut Graph, knowledge: &'a Knowledge) -> Self {
        Self { graph, knowledge }
    }

    pub fn graph(&self) -> &Graph {
        self.graph
    }

    pub fn knowledge(&self) -> &Knowledge {
        self.knowledge
    }

    /// Whether an arrowhead may be put at `y` on `x *-* y`: the edge exists,
    /// knowledge does not require `y --> x` or forbid `x --> y`, and the mark
    /// at `y` is not an oriented tail. The tails of an undirected `x --- y`
    /// count as unoriented.
    pub fn arrowpoint_allowed(&self, x: &Node, y: &Node) -> bool {
        match (self.graph.endpoint(y, x), self.graph.endpoint(x, y)) {
            (None, _) | (_, None) => return false,
            (Some(Endpoint::Tail), Some(Endpoint::Tail)) => {}
            (_, Some(Endpoint::Tail)) => return false,
            _ => {}
        }
        !self.knowledge.is_required(y, x) && !self.knowledge.is_forbidden(x, y)
    }

    /// Set the mark at `b` on `a *-* b`. Returns `Ok(false)` and leaves the
    /// graph untouched when knowledge rules the mark out.
    pub fn set_endpoint(&mut self, a: &Node, b: &Node, endpoint: Endpoint) -> Result<bool, GraphError> {
        let allowed = match endpoint {
            Endpoint::Arrow => !self.knowledge.is_required(b, a) && !self.knowledge.is_forbidden(a, b),
            // A tail at `b` makes `b` an ancestor of `a`.
            Endpoint::Tail => !self.knowledge.is_forbidden(b, a),
            Endpoint::Circle | Endpoint::Null => true,
        };
        if !allowed {
            return Ok(false);
        }
        self.graph.set_endpoint(a, b, endpoint)?;
        Ok(true)
    }

    /// Remove `a *-* b` unless knowledge requires the adjacency.
    pub fn remove_edge(&mut self, a: &Node, b: &Node) -> Result<bool, GraphError> {
        if self.knowledge.requires_adjacency(a, b) {
            return Ok(false);
        }
        self.graph.remove_edge(a, b)?;
        Ok(true)
    }

    /// Orient every required pair present in the graph, and put an arrow
    /// against every forbidden direction whose reverse is still open.
    /// Returns the number of endpoints changed.
    pub fn orient_by_knowledge(&mut self) -> Result<usize, GraphError> {
        let mut changed = 0;
        for edge in self.graph.edges() {
            let (a, b) = (edge.node1().clone(), edge.node2().clone());
            for (from, to) in [(&a, &b), (&b, &a)] {
                if self.knowledge.is_required(from, to) {
                    if self.graph.endpoint(to, from) != Some(Endpoint::Tail) {
                        self.graph.set_endpoint(to, from, Endpoint::Tail)?;
                        changed += 1;
                    }
                    if self.graph.endpoint(from, to) != Some(Endpoint::Arrow) {
                        self.graph.set_endpoint(from, to, Endpoint::Arrow)?;
                        changed += 1;
                    }
                } else if self.knowledge.is_forbidden(from, to)
                    && !self.knowledge.is_forbidden(to, from)
                    && self.graph.endpoint(to, from) == Some(Endpoint::Circle)
                {
                    // `from --> to` is ruled out, so `from` gets an arrowhead.
                    self.graph.set_endpoint(to, from, Endpoint::Arrow)?;
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edge;

    fn n(name: &str) -> Node {
        Node::measured(name)
    }

    #[test]
    fn tiers_forbid_backwards_causation() {
        let mut k = Knowledge::new();
        k.add_to_tier(0, "A");
        k.add_to_tier(1, "B");
        assert!(k.is_forbidden(&n("B"), &n("A")));
        assert!(!k.is_forbidden(&n("A"), &n("B")));
        assert!(!k.forbids_adjacency(&n("A"), &n("B")));
    }

    #[test]
    fn guard_refuses_forbidden_arrow() {
        let mut g = Graph::with_nodes(&[n("A"), n("B")]);
        g.add_edge(Edge::nondirected(n("A"), n("B"))).unwrap();
        let mut k = Knowledge::new();
        k.set_forbidden("A", "B");
        let mut guard = KnowledgeGuard::new(&mut g, &k);
        assert!(!guard.arrowpoint_allowed(&n("A"), &n("B")));
        assert!(!guard.set_endpoint(&n("A"), &n("B"), Endpoint::Arrow).unwrap());
        assert!(guard.set_endpoint(&n("B"), &n("A"), Endpoint::Arrow).unwrap());
        assert_eq!(g.endpoint(&n("A"), &n("B")), Some(Endpoint::Circle));
    }

    #[test]
    fn guard_keeps_required_adjacency() {
        let mut g = Graph::with_nodes(&[n("A"), n("B")]);
        g.add_edge(Edge::undirected(n("A"), n("B"))).unwrap();
        let mut k = Knowledge::new();
        k.set_required("A", "B");
        let mut guard = KnowledgeGuard::new(&mut g, &k);
        assert!(!guard.remove_edge(&n("A"), &n("B")).unwrap());
        assert_eq!(guard.orient_by_knowledge().unwrap(), 1);
        assert!(g.is_parent_of(&n("A"), &n("B")));
    }
}
