//! Markov blanket fan search.

use tetrad_core::errors::SearchError;
use tetrad_core::{Node, RunContext, SearchOutcome, SearchStatus};
use tetrad_graph::{Graph, Knowledge};
use tracing::{debug, info, info_span};

use super::local::LocalStructure;
use super::{in_variable_order, resolve_target, MbSearch};
use crate::collider::orient_colliders;
use crate::independence::IndependenceTest;
use crate::meek::MeekRules;
use crate::search::validate_depth;

/// Finds the target's adjacencies with a local, depth-bounded adjacency
/// search, repeats it for each neighbour, and adds as spouses the far ends
/// `x` of unshielded colliders `target --> y <-- x` read off the recorded
/// sepsets.
pub struct Mbfs<'a> {
    test: &'a dyn IndependenceTest,
    depth: i32,
}

impl<'a> Mbfs<'a> {
    pub fn new(test: &'a dyn IndependenceTest) -> Self {
        Self { test, depth: -1 }
    }

    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    /// The oriented local pattern around `target`: colliders from recorded
    /// sepsets, then Meek's rules.
    pub fn find_mb_graph(&self, target: &Node, ctx: &RunContext) -> Result<SearchOutcome<Graph>, SearchError> {
        validate_depth(self.depth)?;
        let target = resolve_target(self.test, target)?;
        let span = info_span!("tetrad.mb", algorithm = self.algorithm_name(), target = %target);
        let _guard = span.enter();

        let (local, status) = LocalStructure::discover(self.test, &target, self.depth, ctx)?;
        let mut graph = local.skeleton();
        if status != SearchStatus::Complete {
            return Ok(SearchOutcome::partial(graph, status));
        }
        let knowledge = Knowledge::default();
        orient_colliders(&mut graph, &local.search.sepsets, &knowledge, true).map_err(SearchError::invariant)?;
        let status = MeekRules::new(&knowledge)
            .orient(&mut graph, ctx)
            .map_err(SearchError::invariant)?;
        Ok(SearchOutcome::partial(graph, status))
    }
}

impl MbSearch for Mbfs<'_> {
    fn find_mb(&self, target: &Node, ctx: &RunContext) -> Result<SearchOutcome<Vec<Node>>, SearchError> {
        validate_depth(self.depth)?;
        let target = resolve_target(self.test, target)?;
        let span = info_span!("tetrad.mb", algorithm = self.algorithm_name(), target = %target);
        let _guard = span.enter();

        let (local, status) = LocalStructure::discover(self.test, &target, self.depth, ctx)?;
        let mut blanket = local.adjacent.clone();
        if status == SearchStatus::Complete {
            for (y, x) in local.spouse_candidates() {
                let Some(sepset) = local.search.sepsets.get(&target, &x) else {
                    continue;
                };
                if !sepset.contains(&y) && !blanket.contains(&x) {
                    debug!(spouse = %x, child = %y, "collider spouse");
                    blanket.push(x);
                }
            }
        }

        let blanket = in_variable_order(self.test, blanket);
        info!(size = blanket.len(), ?status, "Markov blanket");
        Ok(SearchOutcome::partial(blanket, status))
    }

    fn algorithm_name(&self) -> &'static str {
        "MBFS"
    }
}
