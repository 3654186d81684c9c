//! Second-stage edge removal over possible-d-separating sets.

use std::collections::{HashSet, VecDeque};

use tetrad_core::errors::SearchError;
use tetrad_core::Node;
use tetrad_graph::{Graph, Knowledge};
use tracing::debug;

use crate::choice::ChoiceGenerator;
use crate::fas::names;
use crate::independence::IndependenceTest;
use crate::sepset::SepsetMap;

/// Nodes `v` reachable from `x` along a path on which every interior node
/// is a definite collider or has its two path neighbours adjacent. `x` and
/// `y` are excluded. `max_path_length` bounds the path (`-1` unbounded).
pub fn possible_dsep(graph: &Graph, x: &Node, y: &Node, max_path_length: i32) -> Vec<Node> {
    let limit = usize::try_from(max_path_length).ok();
    let mut reached: Vec<Node> = Vec::new();
    let mut seen_pairs: HashSet<(Node, Node)> = HashSet::new();
    let mut queue: VecDeque<(Node, Node, usize)> = VecDeque::new();

    for b in graph.adjacent_nodes(x) {
        seen_pairs.insert((x.clone(), b.clone()));
        queue.push_back((x.clone(), b, 1));
    }

    while let Some((a, b, length)) = queue.pop_front() {
        if &b != x && &b != y && !reached.contains(&b) {
            reached.push(b.clone());
        }
        if limit.is_some_and(|l| length >= l) {
            continue;
        }
        for c in graph.adjacent_nodes(&b) {
            if c == a || &c == x {
                continue;
            }
            if !(graph.is_def_collider(&a, &b, &c) || graph.is_adjacent(&a, &c)) {
                continue;
            }
            if seen_pairs.insert((b.clone(), c.clone())) {
                queue.push_back((b.clone(), c, length + 1));
            }
        }
    }
    reached
}

/// Remove every edge `x - y` separated by some subset of
/// `possible_dsep(x, y)` or `possible_dsep(y, x)`, of size 1 up to `depth`
/// (`-1` unbounded). Empty sets were already tried by the adjacency search.
/// Returns the number of edges removed.
pub fn remove_by_possible_dsep(
    graph: &mut Graph,
    sepsets: &mut SepsetMap,
    test: &dyn IndependenceTest,
    knowledge: &Knowledge,
    depth: i32,
    max_path_length: i32,
) -> Result<usize, SearchError> {
    let mut removed = 0;
    for edge in graph.edges() {
        let (x, y) = (edge.node1().clone(), edge.node2().clone());
        if knowledge.requires_adjacency(&x, &y) {
            continue;
        }
        'sides: for (a, b) in [(&x, &y), (&y, &x)] {
            let pool = possible_dsep(graph, a, b, max_path_length);
            let bound = usize::try_from(depth).map_or(pool.len(), |d| d.min(pool.len()));
            for size in 1..=bound {
                for choice in ChoiceGenerator::new(pool.len(), size) {
                    let z: Vec<Node> = choice.iter().map(|&i| pool[i].clone()).collect();
                    let result = test.check_independence(a, b, &z)?;
                    if result.independent {
                        graph.remove_edge(a, b).map_err(SearchError::invariant)?;
                        debug!(x = %a, y = %b, sepset = ?names(&z), "removed edge by possible-d-sep");
                        sepsets.set_with_p_value(a, b, z, result.p_value);
                        removed += 1;
                        break 'sides;
                    }
                }
            }
        }
    }
    Ok(removed)
}
