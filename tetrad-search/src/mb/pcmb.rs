//! PCMB: max-min parent/child discovery with a symmetry check.

use std::collections::HashMap;

use tetrad_core::errors::{SearchError, TestError};
use tetrad_core::{Node, RunContext, SearchOutcome, SearchStatus};
use tracing::{debug, info, info_span};

use super::{find_sepset, in_variable_order, resolve_target, spouses, MbSearch};
use crate::choice::subsets_up_to;
use crate::independence::IndependenceTest;
use crate::search::validate_depth;
use crate::sepset::SepsetMap;

pub struct Pcmb<'a> {
    test: &'a dyn IndependenceTest,
    depth: i32,
}

#[derive(Default)]
struct State {
    sepsets: SepsetMap,
    pcd_cache: HashMap<Node, Vec<Node>>,
    pc_cache: HashMap<Node, Vec<Node>>,
}

impl<'a> Pcmb<'a> {
    pub fn new(test: &'a dyn IndependenceTest) -> Self {
        Self { test, depth: -1 }
    }

    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    /// Candidate parents and children of `target`. Each round drops
    /// candidates separated by a subset of the current set, admits the
    /// candidate whose weakest association (largest p-value over those
    /// subsets) is strongest, then drops members separated by the others.
    fn pcd(&self, target: &Node, state: &mut State) -> Result<Vec<Node>, TestError> {
        if let Some(pcd) = state.pcd_cache.get(target) {
            return Ok(pcd.clone());
        }
        let mut can: Vec<Node> = self
            .test
            .variables()
            .iter()
            .filter(|v| *v != target)
            .cloned()
            .collect();
        let mut pcd: Vec<Node> = Vec::new();

        while !can.is_empty() {
            let mut best: Option<(Node, f64)> = None;
            let mut survivors = Vec::with_capacity(can.len());
            for x in can {
                let mut max_p = f64::NEG_INFINITY;
                let mut separated = None;
                for s in subsets_up_to(&pcd, self.depth) {
                    let result = self.test.check_independence(target, &x, &s)?;
                    if result.independent {
                        separated = Some((s, result.p_value));
                        break;
                    }
                    max_p = max_p.max(result.p_value);
                }
                match separated {
                    Some((s, p)) => {
                        state.sepsets.set_with_p_value(target, &x, s, p);
                    }
                    None => {
                        if best.as_ref().map_or(true, |(_, p)| max_p < *p) {
                            best = Some((x.clone(), max_p));
                        }
                        survivors.push(x);
                    }
                }
            }
            can = survivors;

            let Some((chosen, _)) = best else {
                break;
            };
            can.retain(|n| n != &chosen);
            pcd.push(chosen);

            for y in pcd.clone() {
                let others: Vec<Node> = pcd.iter().filter(|n| *n != &y).cloned().collect();
                if let Some((s, p)) = find_sepset(self.test, target, &y, &others, self.depth)? {
                    pcd.retain(|n| n != &y);
                    state.sepsets.set_with_p_value(target, &y, s, p);
                }
            }
        }

        let pcd = in_variable_order(self.test, pcd);
        state.pcd_cache.insert(target.clone(), pcd.clone());
        Ok(pcd)
    }

    /// Members of `pcd(target)` whose own candidate set contains `target`.
    fn pc(&self, target: &Node, state: &mut State) -> Result<Vec<Node>, TestError> {
        if let Some(pc) = state.pc_cache.get(target) {
            return Ok(pc.clone());
        }
        let mut pc = Vec::new();
        for y in self.pcd(target, state)? {
            if self.pcd(&y, state)?.contains(target) {
                pc.push(y);
            } else {
                debug!(dropped = %y, "asymmetric candidate");
            }
        }
        state.pc_cache.insert(target.clone(), pc.clone());
        Ok(pc)
    }
}

impl MbSearch for Pcmb<'_> {
    fn find_mb(&self, target: &Node, ctx: &RunContext) -> Result<SearchOutcome<Vec<Node>>, SearchError> {
        validate_depth(self.depth)?;
        let target = resolve_target(self.test, target)?;
        let span = info_span!("tetrad.mb", algorithm = self.algorithm_name(), target = %target);
        let _guard = span.enter();

        let mut state = State::default();
        if let Some(status) = ctx.interrupted() {
            return Ok(SearchOutcome::partial(Vec::new(), status));
        }
        let pc = self.pc(&target, &mut state)?;

        let mut neighbourhoods: HashMap<Node, Vec<Node>> = HashMap::new();
        let mut status = SearchStatus::Complete;
        for y in &pc {
            if let Some(s) = ctx.interrupted() {
                status = s;
                break;
            }
            let pc_y = self.pc(y, &mut state)?;
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
        "PCMB"
    }
}
