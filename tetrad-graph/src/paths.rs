//! Ancestry closures and path-existence queries.
//!
//! Closures use a visited set over petgraph indices; path searches that need
//! the nodes of the current path keep an explicit stack of frames, each
//! holding the neighbours still to try, so deep graphs cannot overflow the
//! call stack.

use std::collections::{BTreeSet, HashSet, VecDeque};

use petgraph::stable_graph::NodeIndex;
use tetrad_core::Node;

use crate::endpoint::Endpoint;
use crate::graph::Graph;

impl Graph {
    /// `nodes` plus every node with a directed path into one of them.
    pub fn ancestors(&self, nodes: &[Node]) -> BTreeSet<Node> {
        self.closure(nodes, |g, cur, next| g.is_parent_idx(next, cur))
    }

    /// `nodes` plus every node reachable from one of them along directed
    /// edges.
    pub fn descendants(&self, nodes: &[Node]) -> BTreeSet<Node> {
        self.closure(nodes, |g, cur, next| g.is_parent_idx(cur, next))
    }

    /// `nodes` plus every node that may be an ancestor of one of them: an
    /// edge `m *-* n` extends the set from `n` to `m` when the mark at `m` is
    /// not an arrow and the mark at `n` is not a tail. On a DAG this is
    /// ordinary ancestry.
    pub fn possible_ancestors(&self, nodes: &[Node]) -> BTreeSet<Node> {
        self.closure(nodes, |g, cur, next| g.is_possible_parent_idx(next, cur))
    }

    /// `a == b`, or a directed path runs from `a` to `b`.
    pub fn is_ancestor_of(&self, a: &Node, b: &Node) -> bool {
        a == b || self.exists_directed_path(a, b)
    }

    pub fn is_descendant_of(&self, a: &Node, b: &Node) -> bool {
        self.is_ancestor_of(b, a)
    }

    /// A trek joins `a` and `b`: some node (possibly `a` or `b` itself) has a
    /// directed path into each of them.
    pub fn exists_trek(&self, a: &Node, b: &Node) -> bool {
        let of_a = self.ancestors(std::slice::from_ref(a));
        let of_b = self.ancestors(std::slice::from_ref(b));
        !of_a.is_disjoint(&of_b)
    }

    /// A path of one or more `-->` edges from `from` to `to`.
    pub fn exists_directed_path(&self, from: &Node, to: &Node) -> bool {
        let (Some(start), Some(goal)) = (self.index_of(from), self.index_of(to)) else {
            return false;
        };
        let mut visited = HashSet::new();
        let mut stack = vec![start];
        while let Some(cur) = stack.pop() {
            for next in self.ordered_neighbors(cur) {
                if !self.is_parent_idx(cur, next) {
                    continue;
                }
                if next == goal {
                    return true;
                }
                if visited.insert(next) {
                    stack.push(next);
                }
            }
        }
        false
    }

    /// A path from `from` to `to` on which no edge has an arrowhead pointing
    /// back toward `from`: each step `a *-* b` needs a non-arrow mark at `a`.
    pub fn exists_semi_directed_path(&self, from: &Node, to: &Node) -> bool {
        let targets: BTreeSet<Node> = std::iter::once(to.clone()).collect();
        self.exists_semi_directed_path_to_set(from, &targets)
    }

    /// Semi-directed reachability from `from` to any member of `targets`.
    pub fn exists_semi_directed_path_to_set(&self, from: &Node, targets: &BTreeSet<Node>) -> bool {
        let Some(start) = self.index_of(from) else {
            return false;
        };
        let goals: HashSet<NodeIndex> = targets.iter().filter_map(|t| self.index_of(t)).collect();
        if goals.is_empty() {
            return false;
        }

        let mut on_path: HashSet<NodeIndex> = HashSet::from([start]);
        let mut stack: Vec<(NodeIndex, Vec<NodeIndex>)> = vec![(start, self.semi_directed_steps(start))];

        while let Some((cur, pending)) = stack.last_mut() {
            let cur = *cur;
            match pending.pop() {
                Some(next) => {
                    if goals.contains(&next) {
                        return true;
                    }
                    if on_path.insert(next) {
                        stack.push((next, self.semi_directed_steps(next)));
                    }
                }
                None => {
                    on_path.remove(&cur);
                    stack.pop();
                }
            }
        }
        false
    }

    /// A path from `from` to `to` on which every edge `a *-* b` has a
    /// non-arrow mark at `a` and a non-tail mark at `b`.
    pub fn exists_potentially_directed_path(&self, from: &Node, to: &Node) -> bool {
        let (Some(start), Some(goal)) = (self.index_of(from), self.index_of(to)) else {
            return false;
        };
        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(cur) = queue.pop_front() {
            for next in self.ordered_neighbors(cur) {
                if !self.is_possible_parent_idx(cur, next) {
                    continue;
                }
                if next == goal {
                    return true;
                }
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// Every uncovered potentially directed path from `from` to `to` with at
    /// most `max_length` edges (`-1` unbounded). A path is uncovered when no
    /// two nodes two steps apart on it are adjacent.
    pub fn uncovered_potentially_directed_paths(
        &self,
        from: &Node,
        to: &Node,
        max_length: i32,
    ) -> Vec<Vec<Node>> {
        let (Some(start), Some(goal)) = (self.index_of(from), self.index_of(to)) else {
            return Vec::new();
        };
        if start == goal {
            return Vec::new();
        }
        let limit = usize::try_from(max_length).ok();
        let mut found = Vec::new();
        let mut path = vec![start];
        let mut stack: Vec<Vec<NodeIndex>> = vec![self.pd_steps(start, None, &path)];

        while let Some(pending) = stack.last_mut() {
            match pending.pop() {
                Some(next) => {
                    if next == goal {
                        let mut full = path.clone();
                        full.push(next);
                        found.push(full.into_iter().map(|i| self.node_at(i).clone()).collect());
                        continue;
                    }
                    // Extending past `next` only pays off if another edge fits.
                    if limit.is_some_and(|l| path.len() + 1 > l) {
                        continue;
                    }
                    let prev = path.last().copied();
                    path.push(next);
                    let steps = self.pd_steps(next, prev, &path);
                    stack.push(steps);
                }
                None => {
                    stack.pop();
                    if !stack.is_empty() {
                        path.pop();
                    }
                }
            }
        }
        found
    }

    // --- index-level helpers shared with d-separation ---

    /// `a --> b`.
    pub(crate) fn is_parent_idx(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.endpoint_idx(b, a) == Some(Endpoint::Tail) && self.endpoint_idx(a, b) == Some(Endpoint::Arrow)
    }

    /// `a *-* b` with no arrow at `a` and no tail at `b`.
    pub(crate) fn is_possible_parent_idx(&self, a: NodeIndex, b: NodeIndex) -> bool {
        match (self.endpoint_idx(b, a), self.endpoint_idx(a, b)) {
            (Some(at_a), Some(at_b)) => at_a != Endpoint::Arrow && at_b != Endpoint::Tail,
            _ => false,
        }
    }

    pub(crate) fn possible_ancestor_indices(&self, seeds: &[NodeIndex]) -> HashSet<NodeIndex> {
        let mut visited: HashSet<NodeIndex> = seeds.iter().copied().collect();
        let mut queue: VecDeque<NodeIndex> = seeds.iter().copied().collect();
        while let Some(cur) = queue.pop_front() {
            for next in self.ordered_neighbors(cur) {
                if self.is_possible_parent_idx(next, cur) && visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        visited
    }

    fn closure(
        &self,
        nodes: &[Node],
        step: impl Fn(&Graph, NodeIndex, NodeIndex) -> bool,
    ) -> BTreeSet<Node> {
        let seeds: Vec<NodeIndex> = nodes.iter().filter_map(|n| self.index_of(n)).collect();
        let mut visited: HashSet<NodeIndex> = seeds.iter().copied().collect();
        let mut queue: VecDeque<NodeIndex> = seeds.into_iter().collect();
        while let Some(cur) = queue.pop_front() {
            for next in self.ordered_neighbors(cur) {
                if step(self, cur, next) && visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        visited.into_iter().map(|i| self.node_at(i).clone()).collect()
    }

    /// Neighbours reachable in one semi-directed step, reversed so that
    /// popping yields them in adjacency order.
    fn semi_directed_steps(&self, cur: NodeIndex) -> Vec<NodeIndex> {
        let mut steps: Vec<NodeIndex> = self
            .ordered_neighbors(cur)
            .into_iter()
            .filter(|&next| self.endpoint_idx(next, cur) != Some(Endpoint::Arrow))
            .collect();
        steps.reverse();
        steps
    }

    /// Potentially directed steps from `cur` that keep the path simple and
    /// uncovered.
    fn pd_steps(&self, cur: NodeIndex, prev: Option<NodeIndex>, path: &[NodeIndex]) -> Vec<NodeIndex> {
        let mut steps: Vec<NodeIndex> = self
            .ordered_neighbors(cur)
            .into_iter()
            .filter(|&next| !path.contains(&next))
            .filter(|&next| self.is_possible_parent_idx(cur, next))
            .filter(|&next| prev.map_or(true, |p| self.graph.find_edge(p, next).is_none()))
            .collect();
        steps.reverse();
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edge;

    fn n(name: &str) -> Node {
        Node::measured(name)
    }

    fn graph(names: &[&str], edges: Vec<Edge>) -> Graph {
        let nodes: Vec<Node> = names.iter().map(|s| n(s)).collect();
        let mut g = Graph::with_nodes(&nodes);
        for e in edges {
            g.add_edge(e).unwrap();
        }
        g
    }

    #[test]
    fn ancestors_include_seed() {
        let g = graph(
            &["A", "B", "C"],
            vec![Edge::directed(n("A"), n("B")), Edge::directed(n("B"), n("C"))],
        );
        let anc = g.ancestors(&[n("C")]);
        assert_eq!(anc.len(), 3);
        assert!(g.descendants(&[n("B")]).contains(&n("C")));
        assert!(!g.descendants(&[n("B")]).contains(&n("A")));
    }

    #[test]
    fn trek_needs_a_common_source() {
        // A <-- B --> C <-- D
        let g = graph(
            &["A", "B", "C", "D"],
            vec![
                Edge::directed(n("B"), n("A")),
                Edge::directed(n("B"), n("C")),
                Edge::directed(n("D"), n("C")),
            ],
        );
        assert!(g.exists_trek(&n("A"), &n("C")));
        assert!(g.exists_trek(&n("D"), &n("C")));
        assert!(!g.exists_trek(&n("A"), &n("D")));
    }

    #[test]
    fn semi_directed_blocks_on_back_arrow() {
        let g = graph(
            &["A", "B", "C"],
            vec![Edge::partially_oriented(n("A"), n("B")), Edge::directed(n("C"), n("B"))],
        );
        assert!(g.exists_semi_directed_path(&n("A"), &n("B")));
        // B <-- C: the mark at B is an arrow, so B cannot step to C.
        assert!(!g.exists_semi_directed_path(&n("A"), &n("C")));
    }

    #[test]
    fn uncovered_paths_skip_shielded_routes() {
        // A o-> B --> C with A - C adjacent: <A, B, C> is covered.
        let g = graph(
            &["A", "B", "C"],
            vec![
                Edge::partially_oriented(n("A"), n("B")),
                Edge::directed(n("B"), n("C")),
                Edge::nondirected(n("A"), n("C")),
            ],
        );
        let paths = g.uncovered_potentially_directed_paths(&n("A"), &n("C"), -1);
        assert_eq!(paths, vec![vec![n("A"), n("C")]]);
    }
}
