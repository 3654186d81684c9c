//! Zhang's orientation rules for partial ancestral graphs.

use std::collections::{HashSet, VecDeque};

use tetrad_core::errors::GraphError;
use tetrad_core::{Node, RunContext, SearchStatus};
use tetrad_graph::{Endpoint, Graph, Knowledge, KnowledgeGuard};
use tracing::debug;

use crate::sepset::SepsetMap;

/// Applies R1-R4 and, with the complete rule set, R8-R10 to a PAG.
///
/// Every write replaces a circle with a tail or an arrowhead and nothing
/// else, so each pass either changes at least one circle or is the last;
/// the loop in [`FciOrient::orient`] finishes within as many passes as the
/// graph had circles. R5-R7 (selection bias) are not applied.
pub struct FciOrient<'a> {
    sepsets: &'a SepsetMap,
    knowledge: &'a Knowledge,
    complete_rule_set: bool,
    max_path_length: i32,
}

impl<'a> FciOrient<'a> {
    pub fn new(sepsets: &'a SepsetMap, knowledge: &'a Knowledge) -> Self {
        Self {
            sepsets,
            knowledge,
            complete_rule_set: true,
            max_path_length: -1,
        }
    }

    pub fn with_complete_rule_set(mut self, complete: bool) -> Self {
        self.complete_rule_set = complete;
        self
    }

    /// Bound on discriminating and uncovered path length, `-1` unbounded.
    pub fn with_max_path_length(mut self, max_path_length: i32) -> Self {
        self.max_path_length = max_path_length;
        self
    }

    /// Apply passes until one changes nothing, checking `ctx` between passes.
    pub fn orient(&self, graph: &mut Graph, ctx: &RunContext) -> Result<SearchStatus, GraphError> {
        let mut pass = 0;
        loop {
            if let Some(status) = ctx.interrupted() {
                return Ok(status);
            }
            let changed = self.apply_rules_once(graph)?;
            pass += 1;
            debug!(pass, changed, circles = graph.count_endpoints(Endpoint::Circle), "rule pass");
            if changed == 0 {
                return Ok(SearchStatus::Complete);
            }
        }
    }

    /// One pass of every enabled rule. Returns the number of endpoints
    /// changed.
    pub fn apply_rules_once(&self, graph: &mut Graph) -> Result<usize, GraphError> {
        let mut changed = self.rules_r1_to_r3(graph)?;
        changed += self.rule_r4(graph)?;
        if self.complete_rule_set {
            changed += self.rule_r8(graph)?;
            changed += self.rule_r9(graph)?;
            changed += self.rule_r10(graph)?;
        }
        Ok(changed)
    }

    /// Set the mark at `b` on `a *-* b` only if it is currently a circle and
    /// knowledge allows the new mark.
    fn set_if_circle(&self, graph: &mut Graph, a: &Node, b: &Node, endpoint: Endpoint) -> Result<bool, GraphError> {
        if graph.endpoint(a, b) != Some(Endpoint::Circle) {
            return Ok(false);
        }
        let mut guard = KnowledgeGuard::new(graph, self.knowledge);
        if endpoint == Endpoint::Arrow && !guard.arrowpoint_allowed(a, b) {
            return Ok(false);
        }
        guard.set_endpoint(a, b, endpoint)
    }

    /// Orient `b o-* c` as `b --> c`, writing only circle marks.
    fn direct(&self, graph: &mut Graph, b: &Node, c: &Node) -> Result<usize, GraphError> {
        let tail = self.set_if_circle(graph, c, b, Endpoint::Tail)?;
        let arrow = self.set_if_circle(graph, b, c, Endpoint::Arrow)?;
        Ok(usize::from(tail) + usize::from(arrow))
    }

    fn rules_r1_to_r3(&self, graph: &mut Graph) -> Result<usize, GraphError> {
        let mut changed = 0;
        for b in graph.nodes() {
            let adj = graph.adjacent_nodes(&b);
            for a in &adj {
                for c in &adj {
                    if a == c {
                        continue;
                    }
                    changed += self.rule_r1(graph, a, &b, c)?;
                    changed += self.rule_r2(graph, a, &b, c)?;
                }
            }
            changed += self.rule_r3(graph, &b)?;
        }
        Ok(changed)
    }

    /// R1: `a *-> b o-* c`, `a`, `c` non-adjacent ⇒ `b --> c`.
    fn rule_r1(&self, graph: &mut Graph, a: &Node, b: &Node, c: &Node) -> Result<usize, GraphError> {
        if graph.is_adjacent(a, c)
            || graph.endpoint(a, b) != Some(Endpoint::Arrow)
            || graph.endpoint(c, b) != Some(Endpoint::Circle)
        {
            return Ok(0);
        }
        if graph.endpoint(b, c) == Some(Endpoint::Circle) {
            let guard = KnowledgeGuard::new(graph, self.knowledge);
            if !guard.arrowpoint_allowed(b, c) {
                return Ok(0);
            }
        }
        let changed = self.direct(graph, b, c)?;
        if changed > 0 {
            debug!(rule = "R1", from = %b, to = %c, "oriented");
        }
        Ok(changed)
    }

    /// R2: `a --> b *-> c` or `a *-> b --> c`, with `a *-o c` ⇒ `a *-> c`.
    fn rule_r2(&self, graph: &mut Graph, a: &Node, b: &Node, c: &Node) -> Result<usize, GraphError> {
        if graph.endpoint(a, c) != Some(Endpoint::Circle) {
            return Ok(0);
        }
        let through_parent = graph.is_parent_of(a, b) && graph.endpoint(b, c) == Some(Endpoint::Arrow);
        let into_child = graph.endpoint(a, b) == Some(Endpoint::Arrow) && graph.is_parent_of(b, c);
        if !(through_parent || into_child) {
            return Ok(0);
        }
        let changed = self.set_if_circle(graph, a, c, Endpoint::Arrow)?;
        if changed {
            debug!(rule = "R2", from = %a, to = %c, "arrowhead");
        }
        Ok(usize::from(changed))
    }

    /// R3: `a *-> b <-* c`, `a *-o d o-* c`, `a`, `c` non-adjacent,
    /// `d *-o b` ⇒ `d *-> b`.
    fn rule_r3(&self, graph: &mut Graph, b: &Node) -> Result<usize, GraphError> {
        let mut changed = 0;
        let into_b: Vec<Node> = graph.nodes_into(b, Endpoint::Arrow);
        for (i, a) in into_b.iter().enumerate() {
            for c in &into_b[i + 1..] {
                if graph.is_adjacent(a, c) {
                    continue;
                }
                for d in graph.nodes_into(b, Endpoint::Circle) {
                    if !(graph.is_adjacent(&d, a) && graph.is_adjacent(&d, c)) {
                        continue;
                    }
                    if graph.endpoint(a, &d) != Some(Endpoint::Circle) || graph.endpoint(c, &d) != Some(Endpoint::Circle) {
                        continue;
                    }
                    if self.set_if_circle(graph, &d, b, Endpoint::Arrow)? {
                        debug!(rule = "R3", from = %d, to = %b, "arrowhead");
                        changed += 1;
                    }
                }
            }
        }
        Ok(changed)
    }

    /// R4: for a discriminating path `<θ, ..., a, b, c>` for `b` with
    /// `b o-* c`: if `b` is in the sepset of `θ` and `c`, orient `b --> c`,
    /// otherwise `a <-> b <-> c`. Pairs with no recorded sepset are skipped.
    fn rule_r4(&self, graph: &mut Graph) -> Result<usize, GraphError> {
        let mut changed = 0;
        for b in graph.nodes() {
            for c in graph.adjacent_nodes(&b) {
                if graph.endpoint(&c, &b) != Some(Endpoint::Circle) {
                    continue;
                }
                for a in graph.adjacent_nodes(&b) {
                    if a == c || !graph.is_parent_of(&a, &c) || graph.endpoint(&b, &a) != Some(Endpoint::Arrow) {
                        continue;
                    }
                    let Some(theta) = self.discriminating_end(graph, &a, &b, &c) else {
                        continue;
                    };
                    let Some(sepset) = self.sepsets.get(&theta, &c) else {
                        continue;
                    };
                    let n = if sepset.contains(&b) {
                        self.direct(graph, &b, &c)?
                    } else {
                        usize::from(self.set_if_circle(graph, &a, &b, Endpoint::Arrow)?)
                            + usize::from(self.set_if_circle(graph, &c, &b, Endpoint::Arrow)?)
                            + usize::from(self.set_if_circle(graph, &b, &c, Endpoint::Arrow)?)
                    };
                    if n > 0 {
                        debug!(rule = "R4", theta = %theta, a = %a, b = %b, c = %c, "discriminating path");
                        changed += n;
                        break;
                    }
                }
            }
        }
        Ok(changed)
    }

    /// Breadth-first search back from `a` for the far end `θ` of a
    /// discriminating path `<θ, ..., a, b, c>`: every node strictly between
    /// `θ` and `b` is a collider on the path and a parent of `c`, and `θ` is
    /// not adjacent to `c`.
    fn discriminating_end(&self, graph: &Graph, a: &Node, b: &Node, c: &Node) -> Option<Node> {
        let limit = usize::try_from(self.max_path_length).ok();
        let mut visited: HashSet<Node> = [a.clone(), b.clone(), c.clone()].into_iter().collect();
        // Path <d, a, b, c> already has three edges.
        let mut queue: VecDeque<(Node, usize)> = VecDeque::from([(a.clone(), 3)]);

        while let Some((d, length)) = queue.pop_front() {
            if limit.is_some_and(|l| length >= l) {
                continue;
            }
            for e in graph.adjacent_nodes(&d) {
                if visited.contains(&e) || graph.endpoint(&e, &d) != Some(Endpoint::Arrow) {
                    continue;
                }
                if !graph.is_adjacent(&e, c) {
                    return Some(e);
                }
                if graph.is_parent_of(&e, c) && graph.endpoint(&d, &e) == Some(Endpoint::Arrow) {
                    visited.insert(e.clone());
                    queue.push_back((e, length + 1));
                }
            }
        }
        None
    }

    /// R8: `a --> b --> c` or `a --o b --> c`, with `a o-> c` ⇒ `a --> c`.
    fn rule_r8(&self, graph: &mut Graph) -> Result<usize, GraphError> {
        let mut changed = 0;
        for (a, c) in partially_oriented_edges(graph) {
            let fires = graph.adjacent_nodes(&a).iter().any(|b| {
                b != &c
                    && graph.is_parent_of(b, &c)
                    && graph.endpoint(b, &a) == Some(Endpoint::Tail)
                    && matches!(graph.endpoint(&a, b), Some(Endpoint::Arrow | Endpoint::Circle))
            });
            if fires && self.set_if_circle(graph, &c, &a, Endpoint::Tail)? {
                debug!(rule = "R8", from = %a, to = %c, "tail");
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// R9: `a o-> c` and an uncovered potentially directed path
    /// `<a, b, ..., c>` with `b`, `c` non-adjacent ⇒ `a --> c`.
    fn rule_r9(&self, graph: &mut Graph) -> Result<usize, GraphError> {
        let mut changed = 0;
        for (a, c) in partially_oriented_edges(graph) {
            let fires = graph
                .uncovered_potentially_directed_paths(&a, &c, self.max_path_length)
                .iter()
                .any(|path| path.len() > 3 && !graph.is_adjacent(&path[1], &c));
            if fires && self.set_if_circle(graph, &c, &a, Endpoint::Tail)? {
                debug!(rule = "R9", from = %a, to = %c, "tail");
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// R10: `a o-> c`, `b --> c <-- d`, uncovered potentially directed paths
    /// from `a` to `b` and from `a` to `d` whose second nodes `m`, `w`
    /// differ and are non-adjacent ⇒ `a --> c`.
    fn rule_r10(&self, graph: &mut Graph) -> Result<usize, GraphError> {
        let mut changed = 0;
        for (a, c) in partially_oriented_edges(graph) {
            let parents: Vec<Node> = graph.parents(&c).into_iter().filter(|p| p != &a).collect();
            if parents.len() < 2 {
                continue;
            }
            let firsts = |target: &Node| -> Vec<Node> {
                graph
                    .uncovered_potentially_directed_paths(&a, target, self.max_path_length)
                    .into_iter()
                    .filter(|p| !p.contains(&c))
                    .filter_map(|p| p.get(1).cloned())
                    .collect()
            };
            let mut fires = false;
            'pairs: for (i, b) in parents.iter().enumerate() {
                let from_b = firsts(b);
                if from_b.is_empty() {
                    continue;
                }
                for d in &parents[i + 1..] {
                    for w in firsts(d) {
                        if from_b.iter().any(|m| m != &w && !graph.is_adjacent(m, &w)) {
                            fires = true;
                            break 'pairs;
                        }
                    }
                }
            }
            if fires && self.set_if_circle(graph, &c, &a, Endpoint::Tail)? {
                debug!(rule = "R10", from = %a, to = %c, "tail");
                changed += 1;
            }
        }
        Ok(changed)
    }
}

/// Edges `a o-> c`, as `(a, c)`.
fn partially_oriented_edges(graph: &Graph) -> Vec<(Node, Node)> {
    graph
        .edges()
        .into_iter()
        .filter_map(|e| {
            let (n1, n2) = (e.node1().clone(), e.node2().clone());
            match (e.endpoint1(), e.endpoint2()) {
                (Endpoint::Circle, Endpoint::Arrow) => Some((n1, n2)),
                (Endpoint::Arrow, Endpoint::Circle) => Some((n2, n1)),
                _ => None,
            }
        })
        .collect()
}
