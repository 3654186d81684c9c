//! Depth-bounded adjacency search around one node at a time, shared by
//! MBFS and CPC-MB.

use std::collections::HashMap;

use tetrad_core::errors::TestError;
use tetrad_core::{Node, RunContext, SearchStatus};
use tetrad_graph::{Edge, Graph};

use crate::choice::ChoiceGenerator;
use crate::independence::IndependenceTest;
use crate::sepset::SepsetMap;

/// Caches each node's local adjacencies and every sepset found on the way.
pub(crate) struct LocalSearch<'a> {
    test: &'a dyn IndependenceTest,
    depth: i32,
    pub sepsets: SepsetMap,
    cache: HashMap<Node, Vec<Node>>,
}

impl<'a> LocalSearch<'a> {
    pub fn new(test: &'a dyn IndependenceTest, depth: i32) -> Self {
        Self {
            test,
            depth,
            sepsets: SepsetMap::new(),
            cache: HashMap::new(),
        }
    }

    /// Variables not separated from `node` by any subset (up to `depth`) of
    /// its surviving candidates, in variable order.
    pub fn adjacencies(&mut self, node: &Node) -> Result<Vec<Node>, TestError> {
        if let Some(adj) = self.cache.get(node) {
            return Ok(adj.clone());
        }
        let mut adj: Vec<Node> = self
            .test
            .variables()
            .iter()
            .filter(|v| *v != node)
            .cloned()
            .collect();

        let mut d = 0usize;
        loop {
            if self.depth >= 0 && d > self.depth as usize {
                break;
            }
            if d > 0 && adj.len().saturating_sub(1) < d {
                break;
            }
            for v in adj.clone() {
                if !adj.contains(&v) {
                    continue;
                }
                let pool: Vec<Node> = adj.iter().filter(|n| *n != &v).cloned().collect();
                if pool.len() < d {
                    continue;
                }
                for choice in ChoiceGenerator::new(pool.len(), d) {
                    let z: Vec<Node> = choice.iter().map(|&i| pool[i].clone()).collect();
                    let result = self.test.check_independence(node, &v, &z)?;
                    if result.independent {
                        adj.retain(|n| n != &v);
                        self.sepsets.set_with_p_value(node, &v, z, result.p_value);
                        break;
                    }
                }
            }
            d += 1;
        }

        self.cache.insert(node.clone(), adj.clone());
        Ok(adj)
    }
}

/// The target's adjacencies and those of each of its neighbours. An
/// adjacency is kept only when each end finds the other.
pub(crate) struct LocalStructure<'a> {
    pub target: Node,
    pub adjacent: Vec<Node>,
    pub neighbourhoods: Vec<(Node, Vec<Node>)>,
    pub search: LocalSearch<'a>,
}

impl<'a> LocalStructure<'a> {
    /// Run the local searches, stopping early (with what was found) when
    /// `ctx` is interrupted.
    pub fn discover(
        test: &'a dyn IndependenceTest,
        target: &Node,
        depth: i32,
        ctx: &RunContext,
    ) -> Result<(Self, SearchStatus), TestError> {
        let mut structure = Self {
            target: target.clone(),
            adjacent: Vec::new(),
            neighbourhoods: Vec::new(),
            search: LocalSearch::new(test, depth),
        };
        if let Some(status) = ctx.interrupted() {
            return Ok((structure, status));
        }
        for y in structure.search.adjacencies(target)? {
            if structure.search.adjacencies(&y)?.contains(target) {
                structure.adjacent.push(y);
            }
        }
        for y in structure.adjacent.clone() {
            if let Some(status) = ctx.interrupted() {
                return Ok((structure, status));
            }
            let mut adj_y = Vec::new();
            for x in structure.search.adjacencies(&y)? {
                if x == *target || structure.adjacent.contains(&x) || structure.search.adjacencies(&x)?.contains(&y) {
                    adj_y.push(x);
                }
            }
            structure.neighbourhoods.push((y, adj_y));
        }
        Ok((structure, SearchStatus::Complete))
    }

    /// Unshielded triples `target - y - x`: `x` adjacent to `y` but not to the
    /// target.
    pub fn spouse_candidates(&self) -> Vec<(Node, Node)> {
        let mut out = Vec::new();
        for (y, adj_y) in &self.neighbourhoods {
            for x in adj_y {
                if x != &self.target && !self.adjacent.contains(x) {
                    out.push((y.clone(), x.clone()));
                }
            }
        }
        out
    }

    /// Undirected graph over the target, its neighbours and theirs, nodes in
    /// variable order.
    pub fn skeleton(&self) -> Graph {
        let mut nodes: Vec<Node> = vec![self.target.clone()];
        nodes.extend(self.adjacent.iter().cloned());
        for (_, adj_y) in &self.neighbourhoods {
            nodes.extend(adj_y.iter().cloned());
        }
        let test = self.search.test;
        nodes.sort_by_key(|n| test.index_of(n).unwrap_or(usize::MAX));
        nodes.dedup();

        let mut graph = Graph::with_nodes(&nodes);
        for y in &self.adjacent {
            let _ = graph.add_edge(Edge::undirected(self.target.clone(), y.clone()));
        }
        for (y, adj_y) in &self.neighbourhoods {
            for x in adj_y {
                if !graph.is_adjacent(y, x) {
                    let _ = graph.add_edge(Edge::undirected(y.clone(), x.clone()));
                }
            }
        }
        graph
    }
}
