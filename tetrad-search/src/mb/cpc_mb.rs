//! MBFS with conservative collider decisions.

use tetrad_core::errors::SearchError;
use tetrad_core::{Node, RunContext, SearchOutcome, SearchStatus};
use tetrad_graph::{Edge, Endpoint, Graph};
use tracing::{debug, info, info_span};

use super::local::LocalStructure;
use super::{in_variable_order, resolve_target, MbSearch};
use crate::collider::{conservative_decision, ColliderDecision};
use crate::independence::IndependenceTest;
use crate::search::validate_depth;

/// Like [`super::Mbfs`], but a spouse candidate `x` behind neighbour `y` is
/// only accepted when every separating set of target and `x` drawn from
/// either side's adjacencies excludes `y`. Ambiguous candidates are left
/// out of the blanket and recorded as ambiguous triples in the local graph.
pub struct CpcMb<'a> {
    test: &'a dyn IndependenceTest,
    depth: i32,
}

/// Local graph plus the blanket read from it.
struct Decided {
    graph: Graph,
    blanket: Vec<Node>,
}

impl<'a> CpcMb<'a> {
    pub fn new(test: &'a dyn IndependenceTest) -> Self {
        Self { test, depth: -1 }
    }

    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    /// The local graph around `target` with spouse colliders oriented and
    /// ambiguous triples marked.
    pub fn find_mb_graph(&self, target: &Node, ctx: &RunContext) -> Result<SearchOutcome<Graph>, SearchError> {
        Ok(self.run(target, ctx)?.map(|d| d.graph))
    }

    fn run(&self, target: &Node, ctx: &RunContext) -> Result<SearchOutcome<Decided>, SearchError> {
        validate_depth(self.depth)?;
        let target = resolve_target(self.test, target)?;
        let span = info_span!("tetrad.mb", algorithm = self.algorithm_name(), target = %target);
        let _guard = span.enter();

        let (mut local, status) = LocalStructure::discover(self.test, &target, self.depth, ctx)?;
        let mut graph = local.skeleton();
        let mut blanket = local.adjacent.clone();
        if status != SearchStatus::Complete {
            return Ok(SearchOutcome::partial(Decided { graph, blanket }, status));
        }

        for (y, x) in local.spouse_candidates() {
            if let Some(status) = ctx.interrupted() {
                return Ok(SearchOutcome::partial(Decided { graph, blanket }, status));
            }
            let pool_x = local.search.adjacencies(&x)?;
            let decision = conservative_decision(self.test, &target, &y, &x, &local.adjacent, &pool_x, self.depth)?;
            match decision {
                ColliderDecision::Collider => {
                    if !blanket.contains(&x) {
                        blanket.push(x.clone());
                    }
                    orient_into(&mut graph, &target, &y)?;
                    orient_into(&mut graph, &x, &y)?;
                }
                ColliderDecision::NonCollider => graph.add_underline_triple(&target, &y, &x),
                ColliderDecision::Ambiguous => {
                    debug!(child = %y, candidate = %x, "ambiguous spouse excluded");
                    graph.add_ambiguous_triple(&target, &y, &x);
                }
            }
        }

        let blanket = in_variable_order(self.test, blanket);
        info!(size = blanket.len(), ambiguous = graph.ambiguous_triples().len(), "Markov blanket");
        Ok(SearchOutcome::complete(Decided { graph, blanket }))
    }
}

/// Arrowhead at `y` on `x - y`, adding the edge when the local skeleton
/// lacks it.
fn orient_into(graph: &mut Graph, x: &Node, y: &Node) -> Result<(), SearchError> {
    if !graph.is_adjacent(x, y) {
        graph
            .add_edge(Edge::undirected(x.clone(), y.clone()))
            .map_err(SearchError::invariant)?;
    }
    graph.set_endpoint(x, y, Endpoint::Arrow).map_err(SearchError::invariant)
}

impl MbSearch for CpcMb<'_> {
    fn find_mb(&self, target: &Node, ctx: &RunContext) -> Result<SearchOutcome<Vec<Node>>, SearchError> {
        Ok(self.run(target, ctx)?.map(|d| d.blanket))
    }

    fn algorithm_name(&self) -> &'static str {
        "CPC-MB"
    }
}
