//! Markov-blanket discovery around a single target variable.
//!
//! Every variant returns the blanket ordered by the test's variable order,
//! and breaks ties between equally good candidates the same way.

mod cpc_mb;
mod grow_shrink;
mod hiton;
mod local;
mod mbfs;
mod pcmb;

use tetrad_core::errors::{SearchError, TestError};
use tetrad_core::{Node, RunContext, SearchOutcome};

use crate::choice::subsets_up_to;
use crate::independence::IndependenceTest;
use crate::sepset::SepsetMap;

pub use cpc_mb::CpcMb;
pub use grow_shrink::GrowShrink;
pub use hiton::HitonMb;
pub use mbfs::Mbfs;
pub use pcmb::Pcmb;

/// A Markov-blanket search.
pub trait MbSearch {
    /// The Markov blanket of `target`, in variable order. A cancelled or
    /// timed-out run returns the blanket found so far.
    fn find_mb(&self, target: &Node, ctx: &RunContext) -> Result<SearchOutcome<Vec<Node>>, SearchError>;

    fn algorithm_name(&self) -> &'static str;
}

/// Resolve `target` against the test's variables.
pub(crate) fn resolve_target(test: &dyn IndependenceTest, target: &Node) -> Result<Node, SearchError> {
    test.variable(target.name())
        .cloned()
        .ok_or_else(|| SearchError::UnknownTarget {
            name: target.name().to_string(),
        })
}

/// Sort `nodes` by position in the test's variable list.
pub(crate) fn in_variable_order(test: &dyn IndependenceTest, mut nodes: Vec<Node>) -> Vec<Node> {
    nodes.sort_by_key(|n| test.index_of(n).unwrap_or(usize::MAX));
    nodes.dedup();
    nodes
}

/// First subset of `pool` (sizes up to `depth`, `-1` unbounded) that
/// separates `x` and `y`, with the p-value of that test.
pub(crate) fn find_sepset(
    test: &dyn IndependenceTest,
    x: &Node,
    y: &Node,
    pool: &[Node],
    depth: i32,
) -> Result<Option<(Vec<Node>, f64)>, TestError> {
    let pool: Vec<Node> = pool.iter().filter(|n| *n != x && *n != y).cloned().collect();
    for s in subsets_up_to(&pool, depth) {
        let result = test.check_independence(x, y, &s)?;
        if result.independent {
            return Ok(Some((s, result.p_value)));
        }
    }
    Ok(None)
}

/// Spouses of `target`: for each child candidate `y` in `pc` and each `x`
/// in `pc_of(y)` outside `pc` ∪ {target}, `x` joins when it is dependent
/// on the target given `sepset(target, x) ∪ {y}`. A sepset missing from
/// `sepsets` is searched for among `pc`.
pub(crate) fn spouses(
    test: &dyn IndependenceTest,
    target: &Node,
    pc: &[Node],
    neighbours_of: impl Fn(&Node) -> Vec<Node>,
    sepsets: &mut SepsetMap,
    depth: i32,
) -> Result<Vec<Node>, TestError> {
    let mut found: Vec<Node> = Vec::new();
    for y in pc {
        for x in neighbours_of(y) {
            if &x == target || pc.contains(&x) || found.contains(&x) {
                continue;
            }
            let sepset = match sepsets.get(target, &x) {
                Some(s) => s.to_vec(),
                None => match find_sepset(test, target, &x, pc, depth)? {
                    Some((s, p)) => {
                        sepsets.set_with_p_value(target, &x, s.clone(), p);
                        s
                    }
                    None => continue,
                },
            };
            if sepset.contains(y) {
                continue;
            }
            let mut z = sepset;
            z.push(y.clone());
            if !test.is_independent(target, &x, &z)? {
                found.push(x);
            }
        }
    }
    Ok(found)
}
