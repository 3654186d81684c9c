//! Collider orientation for unshielded triples, from recorded sepsets or
//! conservatively from fresh tests.

use tetrad_core::errors::{GraphError, SearchError, TestError};
use tetrad_core::Node;
use tetrad_graph::{Endpoint, Graph, Knowledge, KnowledgeGuard};
use tracing::debug;

use crate::choice::subsets_up_to;
use crate::independence::IndependenceTest;
use crate::sepset::SepsetMap;

/// How an unshielded triple `x - y - z` is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderDecision {
    /// Every separating set found excludes `y`.
    Collider,
    /// Every separating set found includes `y`.
    NonCollider,
    /// Separating sets disagree, or none was found.
    Ambiguous,
}

/// Unshielded triples `(x, y, z)` in node order, each listed once with `x`
/// before `z` in `y`'s adjacency order.
pub fn unshielded_triples(graph: &Graph) -> Vec<(Node, Node, Node)> {
    let mut triples = Vec::new();
    for y in graph.nodes() {
        let adj = graph.adjacent_nodes(&y);
        for (i, x) in adj.iter().enumerate() {
            for z in &adj[i + 1..] {
                if !graph.is_adjacent(x, z) {
                    triples.push((x.clone(), y.clone(), z.clone()));
                }
            }
        }
    }
    triples
}

/// Orient `x *-> y <-* z` for every unshielded triple whose recorded sepset
/// omits `y`; mark the triple underlined when the sepset contains `y`.
/// Triples without a recorded sepset are left alone.
///
/// With `avoid_bidirected`, a collider that would put an arrowhead against
/// an existing one is skipped and the triple marked ambiguous. Returns the
/// number of colliders oriented.
pub fn orient_colliders(
    graph: &mut Graph,
    sepsets: &SepsetMap,
    knowledge: &Knowledge,
    avoid_bidirected: bool,
) -> Result<usize, GraphError> {
    let mut oriented = 0;
    for (x, y, z) in unshielded_triples(graph) {
        let Some(sepset) = sepsets.get(&x, &z) else {
            continue;
        };
        if sepset.contains(&y) {
            graph.add_underline_triple(&x, &y, &z);
            continue;
        }
        if make_collider(graph, knowledge, &x, &y, &z, avoid_bidirected)? {
            oriented += 1;
        }
    }
    Ok(oriented)
}

/// Classify `x - y - z` by testing `x ⊥ z | s` for every `s` drawn from
/// `pool_x` and from `pool_z` (sizes up to `depth`, `-1` unbounded) and
/// checking whether the separating sets contain `y`.
pub fn conservative_decision(
    test: &dyn IndependenceTest,
    x: &Node,
    y: &Node,
    z: &Node,
    pool_x: &[Node],
    pool_z: &[Node],
    depth: i32,
) -> Result<ColliderDecision, TestError> {
    let mut with_y = false;
    let mut without_y = false;
    for pool in [pool_x, pool_z] {
        let pool: Vec<Node> = pool.iter().filter(|n| *n != x && *n != z).cloned().collect();
        for s in subsets_up_to(&pool, depth) {
            if test.is_independent(x, z, &s)? {
                if s.contains(y) {
                    with_y = true;
                } else {
                    without_y = true;
                }
            }
        }
    }
    Ok(match (with_y, without_y) {
        (false, true) => ColliderDecision::Collider,
        (true, false) => ColliderDecision::NonCollider,
        _ => ColliderDecision::Ambiguous,
    })
}

/// Conservative counterpart of [`orient_colliders`]: each unshielded triple
/// is classified with [`conservative_decision`] over the current
/// adjacencies of its ends.
pub fn orient_colliders_conservatively(
    graph: &mut Graph,
    test: &dyn IndependenceTest,
    knowledge: &Knowledge,
    depth: i32,
    avoid_bidirected: bool,
) -> Result<usize, SearchError> {
    let mut oriented = 0;
    for (x, y, z) in unshielded_triples(graph) {
        let pool_x = graph.adjacent_nodes(&x);
        let pool_z = graph.adjacent_nodes(&z);
        match conservative_decision(test, &x, &y, &z, &pool_x, &pool_z, depth)? {
            ColliderDecision::Collider => {
                if make_collider(graph, knowledge, &x, &y, &z, avoid_bidirected).map_err(SearchError::invariant)? {
                    oriented += 1;
                }
            }
            ColliderDecision::NonCollider => graph.add_underline_triple(&x, &y, &z),
            ColliderDecision::Ambiguous => {
                debug!(x = %x, y = %y, z = %z, "ambiguous triple");
                graph.add_ambiguous_triple(&x, &y, &z);
            }
        }
    }
    Ok(oriented)
}

/// Put arrowheads at `y` on `x *-* y` and `z *-* y` if knowledge allows.
fn make_collider(
    graph: &mut Graph,
    knowledge: &Knowledge,
    x: &Node,
    y: &Node,
    z: &Node,
    avoid_bidirected: bool,
) -> Result<bool, GraphError> {
    if avoid_bidirected
        && (graph.endpoint(y, x) == Some(Endpoint::Arrow) || graph.endpoint(y, z) == Some(Endpoint::Arrow))
    {
        debug!(x = %x, y = %y, z = %z, "collider conflicts with existing arrowhead; marking ambiguous");
        graph.add_ambiguous_triple(x, y, z);
        return Ok(false);
    }
    let mut guard = KnowledgeGuard::new(graph, knowledge);
    if !(guard.arrowpoint_allowed(x, y) && guard.arrowpoint_allowed(z, y)) {
        return Ok(false);
    }
    guard.set_endpoint(x, y, Endpoint::Arrow)?;
    guard.set_endpoint(z, y, Endpoint::Arrow)?;
    debug!(x = %x, y = %y, z = %z, "oriented collider");
    Ok(true)
}
