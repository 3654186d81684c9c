//! HITON-MB.

use std::collections::HashMap;

use tetrad_core::errors::{SearchError, TestError};
use tetrad_core::{Node, RunContext, SearchOutcome, SearchStatus};
use tracing::{debug, info, info_span};

use super::{find_sepset, in_variable_order, resolve_target, spouses, MbSearch};
use crate::independence::IndependenceTest;
use crate::search::validate_depth;
use crate::sepset::SepsetMap;

/// HITON-PC admits candidates in order of unconditional association with
/// the target and prunes after each admission any member separated from
/// the target by a subset of the others. Parents and children are kept only
/// when the relation is symmetric; spouses are added from the children's
/// own parent/child sets.
pub struct HitonMb<'a> {
    test: &'a dyn IndependenceTest,
    depth: i32,
}

struct State {
    sepsets: SepsetMap,
    pc_cache: HashMap<Node, Vec<Node>>,
}

impl<'a> HitonMb<'a> {
    pub fn new(test: &'a dyn IndependenceTest) -> Self {
        Self { test, depth: -1 }
    }

    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    fn hiton_pc(&self, target: &Node, state: &mut State) -> Result<Vec<Node>, TestError> {
        if let Some(pc) = state.pc_cache.get(target) {
            return Ok(pc.clone());
        }

        let mut ranked: Vec<(Node, f64)> = Vec::new();
        for v in self.test.variables() {
            if v == target {
                continue;
            }
            let result = self.test.check_independence(target, v, &[])?;
            if result.independent {
                state.sepsets.set_with_p_value(target, v, Vec::new(), result.p_value);
            } else {
                ranked.push((v.clone(), result.p_value));
            }
        }
        // Stable sort keeps variable order among equal p-values.
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut pc: Vec<Node> = Vec::new();
        for (candidate, _) in ranked {
            pc.push(candidate);
            for y in pc.clone() {
                let others: Vec<Node> = pc.iter().filter(|n| *n != &y).cloned().collect();
                if let Some((s, p)) = find_sepset(self.test, target, &y, &others, self.depth)? {
                    pc.retain(|n| n != &y);
                    state.sepsets.set_with_p_value(target, &y, s, p);
                }
            }
        }

        state.pc_cache.insert(target.clone(), pc.clone());
        Ok(pc)
    }

    /// HITON-PC of `target` restricted to the symmetric relation.
    fn symmetric_pc(&self, target: &Node, state: &mut State) -> Result<Vec<Node>, TestError> {
        let mut pc = Vec::new();
        for y in self.hiton_pc(target, state)? {
            if self.hiton_pc(&y, state)?.contains(target) {
                pc.push(y);
            } else {
                debug!(dropped = %y, "asymmetric parent/child");
            }
        }
        Ok(pc)
    }
}

impl MbSearch for HitonMb<'_> {
    fn find_mb(&self, target: &Node, ctx: &RunContext) -> Result<SearchOutcome<Vec<Node>>, SearchError> {
        validate_depth(self.depth)?;
        let target = resolve_target(self.test, target)?;
        let span = info_span!("tetrad.mb", algorithm = self.algorithm_name(), target = %target);
        let _guard = span.enter();

        let mut state = State {
            sepsets: SepsetMap::new(),
            pc_cache: HashMap::new(),
        };
        if let Some(status) = ctx.interrupted() {
            return Ok(SearchOutcome::partial(Vec::new(), status));
        }
        let pc = self.symmetric_pc(&target, &mut state)?;
        if let Some(status) = ctx.interrupted() {
            return Ok(SearchOutcome::partial(in_variable_order(self.test, pc), status));
        }

        let mut neighbourhoods: HashMap<Node, Vec<Node>> = HashMap::new();
        let mut status = SearchStatus::Complete;
        for y in &pc {
            if let Some(s) = ctx.interrupted() {
                status = s;
                break;
            }
            let pc_y = self.hiton_pc(y, &mut state)?;
            neighbourhoods.insert(y.clone(), pc_y);
        }

        let mut blanket = pc.clone();
        if status == SearchStatus::Complete {
            let found = spouses(
                self.test,
                &target,
                &pc,
                |y| neighbourhoods.get(y).cloned().unwrap_or_default(),
                &mut state.sepsets,
                self.depth,
            )?;
            blanket.extend(found);
        }

        let blanket = in_variable_order(self.test, blanket);
        info!(size = blanket.len(), ?status, "Markov blanket");
        Ok(SearchOutcome::partial(blanket, status))
    }

    fn algorithm_name(&self) -> &'static str {
        "HITON-MB"
    }
}
