//! PC: adjacency search, collider orientation, then Meek's rules.

use tetrad_core::errors::SearchError;
use tetrad_core::{RunContext, SearchOutcome, SearchStatus};
use tetrad_graph::{Endpoint, Graph, Knowledge, KnowledgeGuard};
use tracing::{info, info_span};

use crate::collider::{orient_colliders, orient_colliders_conservatively};
use crate::fas::Fas;
use crate::independence::IndependenceTest;
use crate::meek::MeekRules;
use crate::search::{validate_depth, GraphSearch, SearchResult};

/// Learns a pattern (CPDAG) from an independence oracle.
///
/// In conservative mode colliders are decided by re-testing each unshielded
/// triple over all candidate conditioning sets instead of trusting the
/// first sepset recorded by the adjacency search; disagreeing triples are
/// marked ambiguous and left unoriented.
pub struct Pc<'a> {
    test: &'a dyn IndependenceTest,
    knowledge: Knowledge,
    depth: i32,
    conservative: bool,
}

impl<'a> Pc<'a> {
    pub fn new(test: &'a dyn IndependenceTest) -> Self {
        Self {
            test,
            knowledge: Knowledge::default(),
            depth: -1,
            conservative: false,
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

    pub fn conservative(mut self, conservative: bool) -> Self {
        self.conservative = conservative;
        self
    }

    /// Direct every undirected edge that knowledge settles: required pairs
    /// point the required way, and a pair forbidden one way only points the
    /// other way.
    fn orient_by_knowledge(&self, graph: &mut Graph) -> Result<(), SearchError> {
        if self.knowledge.is_empty() {
            return Ok(());
        }
        for edge in graph.edges() {
            if !edge.is_undirected() {
                continue;
            }
            let (a, b) = (edge.node1().clone(), edge.node2().clone());
            let direction = if self.knowledge.is_required(&a, &b) || self.knowledge.is_forbidden(&b, &a) {
                Some((a, b))
            } else if self.knowledge.is_required(&b, &a) || self.knowledge.is_forbidden(&a, &b) {
                Some((b, a))
            } else {
                None
            };
            if let Some((from, to)) = direction {
                let mut guard = KnowledgeGuard::new(graph, &self.knowledge);
                guard
                    .set_endpoint(&from, &to, Endpoint::Arrow)
                    .map_err(SearchError::invariant)?;
            }
        }
        Ok(())
    }
}

impl GraphSearch for Pc<'_> {
    fn search(&self, ctx: &RunContext) -> Result<SearchOutcome<SearchResult>, SearchError> {
        validate_depth(self.depth)?;
        let span = info_span!("tetrad.pc", depth = self.depth, conservative = self.conservative);
        let _guard = span.enter();

        let skeleton = Fas::new(self.test)
            .with_depth(self.depth)
            .with_knowledge(self.knowledge.clone())
            .search(ctx)?;
        if !skeleton.is_complete() {
            return Ok(skeleton);
        }
        let SearchResult { mut graph, sepsets } = skeleton.data;

        self.orient_by_knowledge(&mut graph)?;
        let colliders = if self.conservative {
            orient_colliders_conservatively(&mut graph, self.test, &self.knowledge, self.depth, true)?
        } else {
            orient_colliders(&mut graph, &sepsets, &self.knowledge, true).map_err(SearchError::invariant)?
        };
        info!(colliders, "oriented colliders");

        let status = MeekRules::new(&self.knowledge)
            .orient(&mut graph, ctx)
            .map_err(SearchError::invariant)?;
        info!(edges = graph.num_edges(), ?status, "PC finished");

        let result = SearchResult { graph, sepsets };
        Ok(match status {
            SearchStatus::Complete => SearchOutcome::complete(result),
            other => SearchOutcome::partial(result, other),
        })
    }

    fn algorithm_name(&self) -> &'static str {
        if self.conservative {
            "CPC"
        } else {
            "PC"
        }
    }
}
