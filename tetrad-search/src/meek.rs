//! Meek's orientation rules for patterns (CPDAGs).

use tetrad_core::errors::GraphError;
use tetrad_core::{Node, RunContext, SearchStatus};
use tetrad_graph::{Endpoint, Graph, Knowledge, KnowledgeGuard};
use tracing::debug;

/// Applies rules R1-R4 to undirected edges until none fires.
///
/// - R1: `a --> b --- c`, `a`, `c` non-adjacent ⇒ `b --> c`.
/// - R2: `a --> c --> b`, `a --- b` ⇒ `a --> b`.
/// - R3: `a --- b`, `a --- c --> b`, `a --- d --> b`, `c`, `d` non-adjacent
///   ⇒ `a --> b`.
/// - R4: `a --- b`, `a --- d --> c --> b`, `a` adjacent to `c`, `b`, `d`
///   non-adjacent ⇒ `a --> b`.
///
/// R1 does not fire through a triple marked ambiguous.
pub struct MeekRules<'a> {
    knowledge: &'a Knowledge,
}

impl<'a> MeekRules<'a> {
    pub fn new(knowledge: &'a Knowledge) -> Self {
        Self { knowledge }
    }

    /// Run to a fixpoint, checking `ctx` between passes.
    pub fn orient(&self, graph: &mut Graph, ctx: &RunContext) -> Result<SearchStatus, GraphError> {
        loop {
            if let Some(status) = ctx.interrupted() {
                return Ok(status);
            }
            if self.apply_once(graph)? == 0 {
                return Ok(SearchStatus::Complete);
            }
        }
    }

    /// One pass over every undirected edge in both directions. Returns how
    /// many edges were oriented.
    pub fn apply_once(&self, graph: &mut Graph) -> Result<usize, GraphError> {
        let mut changed = 0;
        for edge in graph.edges() {
            if !edge.is_undirected() {
                continue;
            }
            let (u, v) = (edge.node1().clone(), edge.node2().clone());
            for (a, b) in [(&u, &v), (&v, &u)] {
                if !graph.edge(a, b).is_some_and(|e| e.is_undirected()) {
                    break;
                }
                let fired = if self.r1(graph, a, b) {
                    Some("R1")
                } else if self.r2(graph, a, b) {
                    Some("R2")
                } else if self.r3(graph, a, b) {
                    Some("R3")
                } else if self.r4(graph, a, b) {
                    Some("R4")
                } else {
                    None
                };
                if let Some(rule) = fired {
                    if self.direct(graph, a, b)? {
                        debug!(rule, from = %a, to = %b, "oriented");
                        changed += 1;
                    }
                }
            }
        }
        Ok(changed)
    }

    /// Orient `a --> b` if knowledge allows it.
    fn direct(&self, graph: &mut Graph, a: &Node, b: &Node) -> Result<bool, GraphError> {
        let mut guard = KnowledgeGuard::new(graph, self.knowledge);
        if !guard.arrowpoint_allowed(a, b) {
            return Ok(false);
        }
        guard.set_endpoint(a, b, Endpoint::Arrow)
    }

    /// Some `c --> a` with `c` not adjacent to `b`.
    fn r1(&self, graph: &Graph, a: &Node, b: &Node) -> bool {
        graph
            .parents(a)
            .iter()
            .any(|c| c != b && !graph.is_adjacent(c, b) && !graph.is_ambiguous_triple(c, a, b))
    }

    /// Some `a --> c --> b`.
    fn r2(&self, graph: &Graph, a: &Node, b: &Node) -> bool {
        graph.children(a).iter().any(|c| graph.is_parent_of(c, b))
    }

    /// Two non-adjacent `c`, `d` with `a --- c --> b` and `a --- d --> b`.
    fn r3(&self, graph: &Graph, a: &Node, b: &Node) -> bool {
        let mids: Vec<Node> = graph
            .parents(b)
            .into_iter()
            .filter(|c| graph.edge(a, c).is_some_and(|e| e.is_undirected()))
            .collect();
        mids.iter()
            .enumerate()
            .any(|(i, c)| mids[i + 1..].iter().any(|d| !graph.is_adjacent(c, d)))
    }

    /// `a --- d --> c --> b` with `a` adjacent to `c` and `b`, `d`
    /// non-adjacent.
    fn r4(&self, graph: &Graph, a: &Node, b: &Node) -> bool {
        graph.parents(b).iter().any(|c| {
            c != a
                && graph.is_adjacent(a, c)
                && graph.parents(c).iter().any(|d| {
                    d != a
                        && d != b
                        && !graph.is_adjacent(b, d)
                        && graph.edge(a, d).is_some_and(|e| e.is_undirected())
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetrad_graph::Edge;

    fn n(name: &str) -> Node {
        Node::measured(name)
    }

    #[test]
    fn r1_propagates_away_from_collider() {
        let mut g = Graph::with_nodes(&[n("A"), n("B"), n("C")]);
        g.add_edge(Edge::directed(n("A"), n("B"))).unwrap();
        g.add_edge(Edge::undirected(n("B"), n("C"))).unwrap();
        let k = Knowledge::new();
        MeekRules::new(&k).orient(&mut g, &RunContext::new()).unwrap();
        assert!(g.is_parent_of(&n("B"), &n("C")));
    }

    #[test]
    fn r2_avoids_cycle() {
        let mut g = Graph::with_nodes(&[n("A"), n("B"), n("C")]);
        g.add_edge(Edge::directed(n("A"), n("C"))).unwrap();
        g.add_edge(Edge::directed(n("C"), n("B"))).unwrap();
        g.add_edge(Edge::undirected(n("A"), n("B"))).unwrap();
        let k = Knowledge::new();
        assert_eq!(MeekRules::new(&k).apply_once(&mut g).unwrap(), 1);
        assert!(g.is_parent_of(&n("A"), &n("B")));
    }

    #[test]
    fn r3_orients_into_double_collider() {
        let mut g = Graph::with_nodes(&[n("A"), n("B"), n("C"), n("D")]);
        g.add_edge(Edge::undirected(n("A"), n("B"))).unwrap();
        g.add_edge(Edge::undirected(n("A"), n("C"))).unwrap();
        g.add_edge(Edge::undirected(n("A"), n("D"))).unwrap();
        g.add_edge(Edge::directed(n("C"), n("B"))).unwrap();
        g.add_edge(Edge::directed(n("D"), n("B"))).unwrap();
        let k = Knowledge::new();
        MeekRules::new(&k).orient(&mut g, &RunContext::new()).unwrap();
        assert!(g.is_parent_of(&n("A"), &n("B")));
        assert!(g.edge(&n("A"), &n("C")).unwrap().is_undirected());
    }
}
