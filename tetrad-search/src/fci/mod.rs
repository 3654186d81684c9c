//! FCI: causal search allowing latent common causes, producing a PAG.

mod orient;
pub mod possible_dsep;

use tetrad_core::errors::SearchError;
use tetrad_core::{RunContext, SearchOutcome, SearchStatus};
use tetrad_graph::{Endpoint, Graph, Knowledge, KnowledgeGuard};
use tracing::{info, info_span};

use crate::collider::{orient_colliders, orient_colliders_conservatively};
use crate::fas::Fas;
use crate::independence::IndependenceTest;
use crate::search::{validate_depth, GraphSearch, SearchResult};
use crate::sepset::SepsetMap;

pub use orient::FciOrient;

/// FCI over an independence oracle.
///
/// Runs the adjacency search, orients colliders on a circle graph (R0),
/// optionally removes further edges using possible-d-separating sets, then
/// re-orients from scratch and applies the final orientation rules.
pub struct Fci<'a> {
    test: &'a dyn IndependenceTest,
    knowledge: Knowledge,
    depth: i32,
    max_path_length: i32,
    complete_rule_set: bool,
    possible_dsep: bool,
    conservative: bool,
}

impl<'a> Fci<'a> {
    pub fn new(test: &'a dyn IndependenceTest) -> Self {
        Self {
            test,
            knowledge: Knowledge::default(),
            depth: -1,
            max_path_length: -1,
            complete_rule_set: true,
            possible_dsep: true,
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

    /// Bound on possible-d-sep and discriminating path length, `-1` unbounded.
    pub fn with_max_path_length(mut self, max_path_length: i32) -> Self {
        self.max_path_length = max_path_length;
        self
    }

    /// Apply R8-R10 in addition to R1-R4.
    pub fn with_complete_rule_set(mut self, complete: bool) -> Self {
        self.complete_rule_set = complete;
        self
    }

    pub fn with_possible_dsep(mut self, enabled: bool) -> Self {
        self.possible_dsep = enabled;
        self
    }

    pub fn conservative(mut self, conservative: bool) -> Self {
        self.conservative = conservative;
        self
    }

    /// Reset every endpoint to a circle and orient unshielded colliders.
    fn r0(&self, graph: &mut Graph, sepsets: &SepsetMap) -> Result<usize, SearchError> {
        graph.reorient_all_with(Endpoint::Circle);
        graph.clear_triples();
        if self.conservative {
            orient_colliders_conservatively(graph, self.test, &self.knowledge, self.depth, false)
        } else {
            orient_colliders(graph, sepsets, &self.knowledge, false).map_err(SearchError::invariant)
        }
    }
}

impl GraphSearch for Fci<'_> {
    fn search(&self, ctx: &RunContext) -> Result<SearchOutcome<SearchResult>, SearchError> {
        validate_depth(self.depth)?;
        let span = info_span!(
            "tetrad.fci",
            depth = self.depth,
            max_path_length = self.max_path_length,
            complete_rule_set = self.complete_rule_set
        );
        let _guard = span.enter();

        let skeleton = Fas::new(self.test)
            .with_depth(self.depth)
            .with_knowledge(self.knowledge.clone())
            .search(ctx)?;
        if !skeleton.is_complete() {
            return Ok(skeleton.map(|mut result| {
                result.graph.reorient_all_with(Endpoint::Circle);
                result
            }));
        }
        let SearchResult {
            mut graph,
            mut sepsets,
        } = skeleton.data;

        let colliders = self.r0(&mut graph, &sepsets)?;
        info!(colliders, "R0 on adjacency-search skeleton");

        if self.possible_dsep {
            if let Some(status) = ctx.interrupted() {
                return Ok(SearchOutcome::partial(SearchResult { graph, sepsets }, status));
            }
            let removed = possible_dsep::remove_by_possible_dsep(
                &mut graph,
                &mut sepsets,
                self.test,
                &self.knowledge,
                self.depth,
                self.max_path_length,
            )?;
            info!(removed, "possible-d-sep edge removal");
            let colliders = self.r0(&mut graph, &sepsets)?;
            info!(colliders, "R0 after possible-d-sep");
        }

        KnowledgeGuard::new(&mut graph, &self.knowledge)
            .orient_by_knowledge()
            .map_err(SearchError::invariant)?;

        let status = FciOrient::new(&sepsets, &self.knowledge)
            .with_complete_rule_set(self.complete_rule_set)
            .with_max_path_length(self.max_path_length)
            .orient(&mut graph, ctx)
            .map_err(SearchError::invariant)?;
        info!(
            edges = graph.num_edges(),
            circles = graph.count_endpoints(Endpoint::Circle),
            ?status,
            "FCI finished"
        );

        let result = SearchResult { graph, sepsets };
        Ok(match status {
            SearchStatus::Complete => SearchOutcome::complete(result),
            other => SearchOutcome::partial(result, other),
        })
    }

    fn algorithm_name(&self) -> &'static str {
        "FCI"
    }
}
