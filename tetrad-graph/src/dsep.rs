//! d-connection by breadth-first search over (previous, current) pairs.

use std::collections::{HashSet, VecDeque};

use petgraph::stable_graph::NodeIndex;
use tetrad_core::Node;

use crate::endpoint::Endpoint;
use crate::graph::Graph;

impl Graph {
    /// Whether some path between `x` and `y` is active given `z`.
    ///
    /// Passing through `b` on the sub-path `a - b - c` is allowed when `b` is
    /// not a definite collider there and is not in `z`, or when it is a
    /// definite collider and a possible ancestor of `z` (members of `z`
    /// included). Works on DAGs, CPDAGs and PAGs; on a DAG it is ordinary
    /// d-connection.
    pub fn is_d_connected_to(&self, x: &Node, y: &Node, z: &[Node]) -> bool {
        let (Some(xi), Some(yi)) = (self.index_of(x), self.index_of(y)) else {
            return false;
        };
        if xi == yi {
            return true;
        }

        let z_set: HashSet<NodeIndex> = z.iter().filter_map(|n| self.index_of(n)).collect();
        let z_seeds: Vec<NodeIndex> = z_set.iter().copied().collect();
        let ancestors_of_z = self.possible_ancestor_indices(&z_seeds);

        let mut visited: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
        let mut queue: VecDeque<(NodeIndex, NodeIndex)> = VecDeque::new();

        for next in self.ordered_neighbors(xi) {
            if next == yi {
                return true;
            }
            if visited.insert((xi, next)) {
                queue.push_back((xi, next));
            }
        }

        while let Some((a, b)) = queue.pop_front() {
            for c in self.ordered_neighbors(b) {
                if c == a {
                    continue;
                }
                if !self.passes_through(a, b, c, &z_set, &ancestors_of_z) {
                    continue;
                }
                if c == yi {
                    return true;
                }
                if visited.insert((b, c)) {
                    queue.push_back((b, c));
                }
            }
        }
        false
    }

    pub fn is_d_separated_from(&self, x: &Node, y: &Node, z: &[Node]) -> bool {
        !self.is_d_connected_to(x, y, z)
    }

    fn passes_through(
        &self,
        a: NodeIndex,
        b: NodeIndex,
        c: NodeIndex,
        z: &HashSet<NodeIndex>,
        ancestors_of_z: &HashSet<NodeIndex>,
    ) -> bool {
        let collider = self.endpoint_idx(a, b) == Some(Endpoint::Arrow)
            && self.endpoint_idx(c, b) == Some(Endpoint::Arrow);
        if collider {
            ancestors_of_z.contains(&b)
        } else {
            !z.contains(&b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edge;

    fn n(name: &str) -> Node {
        Node::measured(name)
    }

    fn dag(names: &[&str], edges: &[(&str, &str)]) -> Graph {
        let nodes: Vec<Node> = names.iter().map(|s| n(s)).collect();
        let mut g = Graph::with_nodes(&nodes);
        for (a, b) in edges {
            g.add_edge(Edge::directed(n(a), n(b))).unwrap();
        }
        g
    }

    #[test]
    fn chain_blocked_by_middle() {
        let g = dag(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        assert!(g.is_d_connected_to(&n("A"), &n("C"), &[]));
        assert!(g.is_d_separated_from(&n("A"), &n("C"), &[n("B")]));
    }

    #[test]
    fn collider_opened_by_descendant() {
        let g = dag(&["A", "B", "C", "D"], &[("A", "C"), ("B", "C"), ("C", "D")]);
        assert!(g.is_d_separated_from(&n("A"), &n("B"), &[]));
        assert!(g.is_d_connected_to(&n("A"), &n("B"), &[n("C")]));
        assert!(g.is_d_connected_to(&n("A"), &n("B"), &[n("D")]));
    }
}
