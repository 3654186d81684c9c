//! Fast adjacency search: the skeleton phase shared by PC and FCI.

use tetrad_core::errors::SearchError;
use tetrad_core::{Node, RunContext, SearchOutcome};
use tetrad_graph::{Graph, Knowledge};
use tracing::{debug, info, info_span};

use crate::choice::ChoiceGenerator;
use crate::independence::IndependenceTest;
use crate::search::{validate_depth, GraphSearch, SearchResult};
use crate::sepset::SepsetMap;

/// Learns an undirected skeleton by removing every edge `x - y` for which
/// some subset of the current neighbours of `x` (or of `y`) separates the
/// pair.
///
/// `depth` caps the conditioning-set size (`-1` unbounded). Lower depths
/// run fewer, better-powered tests at the price of possibly keeping edges
/// that only a larger set would remove.
pub struct Fas<'a> {
    test: &'a dyn IndependenceTest,
    knowledge: Knowledge,
    depth: i32,
}

impl<'a> Fas<'a> {
    pub fn new(test: &'a dyn IndependenceTest) -> Self {
        Self {
            test,
            knowledge: Knowledge::default(),
            depth: -1,
        }
    }

    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_knowledge(mut self, knowledge: Knowledge) -> Self {
        self.knowledge = knowledge;
        self
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// The complete starting graph, minus pairs knowledge forbids both ways.
    fn initial_graph(&self, nodes: &[Node]) -> Result<Graph, SearchError> {
        let mut graph = Graph::complete_undirected(nodes);
        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                if self.knowledge.forbids_adjacency(a, b) && !self.knowledge.requires_adjacency(a, b) {
                    graph.remove_edge(a, b).map_err(SearchError::invariant)?;
                }
            }
        }
        Ok(graph)
    }

    /// One pass at conditioning size `d`. Returns the number of edges removed.
    fn search_at_depth(
        &self,
        graph: &mut Graph,
        sepsets: &mut SepsetMap,
        nodes: &[Node],
        d: usize,
    ) -> Result<usize, SearchError> {
        let mut removed = 0;
        for x in nodes {
            for y in graph.adjacent_nodes(x) {
                if !graph.is_adjacent(x, &y) || self.knowledge.requires_adjacency(x, &y) {
                    continue;
                }
                let candidates: Vec<Node> = graph
                    .adjacent_nodes(x)
                    .into_iter()
                    .filter(|n| n != &y)
                    .collect();
                if candidates.len() < d {
                    continue;
                }
                for choice in ChoiceGenerator::new(candidates.len(), d) {
                    let z: Vec<Node> = choice.iter().map(|&i| candidates[i].clone()).collect();
                    let result = self.test.check_independence(x, &y, &z)?;
                    if result.independent {
                        graph.remove_edge(x, &y).map_err(SearchError::invariant)?;
                        debug!(x = %x, y = %y, sepset = ?names(&z), p = result.p_value, "removed edge");
                        sepsets.set_with_p_value(x, &y, z, result.p_value);
                        removed += 1;
                        break;
                    }
                }
            }
        }
        Ok(removed)
    }
}

impl GraphSearch for Fas<'_> {
    fn search(&self, ctx: &RunContext) -> Result<SearchOutcome<SearchResult>, SearchError> {
        validate_depth(self.depth)?;
        let nodes = self.test.variables().to_vec();
        let span = info_span!("tetrad.fas", depth = self.depth, variables = nodes.len());
        let _guard = span.enter();

        let mut graph = self.initial_graph(&nodes)?;
        let mut sepsets = SepsetMap::new();

        let mut d = 0usize;
        loop {
            if self.depth >= 0 && d > self.depth as usize {
                break;
            }
            // A set of size d needs some node with d neighbours besides y.
            if d > 0 && graph.max_degree().saturating_sub(1) < d {
                break;
            }
            if let Some(status) = ctx.interrupted() {
                info!(depth = d, ?status, "adjacency search interrupted");
                return Ok(SearchOutcome::partial(SearchResult { graph, sepsets }, status));
            }

            let removed = self.search_at_depth(&mut graph, &mut sepsets, &nodes, d)?;
            info!(depth = d, removed, edges = graph.num_edges(), "finished depth");
            d += 1;
        }

        Ok(SearchOutcome::complete(SearchResult { graph, sepsets }))
    }

    fn algorithm_name(&self) -> &'static str {
        "FAS"
    }
}

pub(crate) fn names(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(Node::name).collect()
}
