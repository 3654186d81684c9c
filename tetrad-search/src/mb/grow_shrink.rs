//! Grow-shrink Markov blanket search.

use tetrad_core::errors::SearchError;
use tetrad_core::{Node, RunContext, SearchOutcome};
use tracing::{debug, info, info_span};

use super::{in_variable_order, resolve_target, MbSearch};
use crate::independence::IndependenceTest;

/// Grows the blanket by repeatedly adding the candidate most strongly
/// dependent on the target given the current blanket, then shrinks it by
/// dropping members independent of the target given the rest.
pub struct GrowShrink<'a> {
    test: &'a dyn IndependenceTest,
}

impl<'a> GrowShrink<'a> {
    pub fn new(test: &'a dyn IndependenceTest) -> Self {
        Self { test }
    }

    /// Remove members independent of `target` given the others until no
    /// member can be removed.
    fn shrink(&self, target: &Node, blanket: &mut Vec<Node>) -> Result<(), SearchError> {
        loop {
            let mut removed = None;
            for (i, y) in blanket.iter().enumerate() {
                let rest: Vec<Node> = blanket.iter().filter(|n| *n != y).cloned().collect();
                if self.test.is_independent(target, y, &rest)? {
                    removed = Some(i);
                    break;
                }
            }
            match removed {
                Some(i) => {
                    let y = blanket.remove(i);
                    debug!(removed = %y, "shrink");
                }
                None => return Ok(()),
            }
        }
    }
}

impl MbSearch for GrowShrink<'_> {
    fn find_mb(&self, target: &Node, ctx: &RunContext) -> Result<SearchOutcome<Vec<Node>>, SearchError> {
        let target = resolve_target(self.test, target)?;
        let span = info_span!("tetrad.mb", algorithm = self.algorithm_name(), target = %target);
        let _guard = span.enter();

        let mut blanket: Vec<Node> = Vec::new();
        loop {
            if let Some(status) = ctx.interrupted() {
                return Ok(SearchOutcome::partial(in_variable_order(self.test, blanket), status));
            }
            let mut best: Option<(Node, f64)> = None;
            for v in self.test.variables() {
                if v == &target || blanket.contains(v) {
                    continue;
                }
                let result = self.test.check_independence(&target, v, &blanket)?;
                if result.independent {
                    continue;
                }
                if best.as_ref().map_or(true, |(_, p)| result.p_value < *p) {
                    best = Some((v.clone(), result.p_value));
                }
            }
            match best {
                Some((v, p)) => {
                    debug!(added = %v, p_value = p, "grow");
                    blanket.push(v);
                }
                None => break,
            }
        }

        if let Some(status) = ctx.interrupted() {
            return Ok(SearchOutcome::partial(in_variable_order(self.test, blanket), status));
        }
        self.shrink(&target, &mut blanket)?;

        let blanket = in_variable_order(self.test, blanket);
        info!(size = blanket.len(), "Markov blanket");
        Ok(SearchOutcome::complete(blanket))
    }

    fn algorithm_name(&self) -> &'static str {
        "Grow-Shrink"
    }
}
