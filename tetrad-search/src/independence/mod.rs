//! Conditional independence tests.
//!
//! Every test is bound to one dataset (or graph) and one significance level
//! at construction, and is shared read-only by the searches that use it.

mod chi_square;
mod cramer_t;
mod dsep;
mod fisher_z;
pub mod matrix;

use std::collections::HashMap;
use std::sync::RwLock;

use tetrad_core::config::TestConfig;
use tetrad_core::errors::TestError;
use tetrad_core::{DataSet, Node};

pub use chi_square::{ChiSquare, ChiSquareStatistic};
pub use cramer_t::CramerT;
pub use dsep::DSeparationTest;
pub use fisher_z::FisherZ;

/// Outcome of one independence query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndependenceResult {
    pub independent: bool,
    pub p_value: f64,
    pub statistic: f64,
}

impl IndependenceResult {
    /// Independent iff `p_value > alpha`.
    pub fn from_p_value(p_value: f64, statistic: f64, alpha: f64) -> Self {
        Self {
            independent: p_value > alpha,
            p_value,
            statistic,
        }
    }

    /// The answer for numerically degenerate queries: dependent, p = 0.
    pub fn degenerate() -> Self {
        Self {
            independent: false,
            p_value: 0.0,
            statistic: f64::INFINITY,
        }
    }
}

/// A conditional independence oracle over a fixed, ordered set of variables.
pub trait IndependenceTest: Send + Sync {
    /// The variables this test can answer about, in dataset order.
    fn variables(&self) -> &[Node];

    /// Test `x ⊥ y | z`.
    fn check_independence(&self, x: &Node, y: &Node, z: &[Node]) -> Result<IndependenceResult, TestError>;

    fn is_independent(&self, x: &Node, y: &Node, z: &[Node]) -> Result<bool, TestError> {
        Ok(self.check_independence(x, y, z)?.independent)
    }

    fn alpha(&self) -> f64;

    fn name(&self) -> &'static str;

    /// p-value of the most recent query, if any.
    fn last_p_value(&self) -> Option<f64>;

    /// Look a variable up by name.
    fn variable(&self, name: &str) -> Option<&Node> {
        self.variables().iter().find(|v| v.name() == name)
    }

    /// Position of `node` in [`IndependenceTest::variables`].
    fn index_of(&self, node: &Node) -> Option<usize> {
        self.variables().iter().position(|v| v == node)
    }
}

/// Build the test named in `config` over `data`.
pub fn build_test(data: &DataSet, config: &TestConfig) -> Result<Box<dyn IndependenceTest>, TestError> {
    let test: Box<dyn IndependenceTest> = match config.kind.as_str() {
        "fisher-z" => Box::new(FisherZ::new(data, config.alpha)?.with_tolerance(config.singularity_tolerance)),
        "cramer-t" => Box::new(CramerT::new(data, config.alpha)?.with_tolerance(config.singularity_tolerance)),
        "chi-square" => Box::new(ChiSquare::new(data, config.alpha, ChiSquareStatistic::PearsonChiSquare)?),
        "g-square" => Box::new(ChiSquare::new(data, config.alpha, ChiSquareStatistic::GSquare)?),
        other => {
            return Err(TestError::IncompatibleData {
                reason: format!("unknown test kind '{other}'"),
            })
        }
    };
    Ok(test)
}

pub(crate) fn validate_alpha(alpha: f64) -> Result<(), TestError> {
    if alpha > 0.0 && alpha <= 1.0 {
        Ok(())
    } else {
        Err(TestError::InvalidAlpha { alpha })
    }
}

/// Name-to-column lookup shared by the data-backed tests.
#[derive(Debug, Clone)]
pub(crate) struct VariableIndex {
    nodes: Vec<Node>,
    positions: HashMap<String, usize>,
}

/// Column positions of a validated query.
pub(crate) struct Query {
    pub x: usize,
    pub y: usize,
    pub z: Vec<usize>,
}

impl VariableIndex {
    pub fn new(nodes: Vec<Node>) -> Self {
        let positions = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.name().to_string(), i))
            .collect();
        Self { nodes, positions }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn position(&self, node: &Node) -> Result<usize, TestError> {
        self.positions
            .get(node.name())
            .copied()
            .ok_or_else(|| TestError::UnknownVariable {
                name: node.name().to_string(),
            })
    }

    /// Resolve `x ⊥ y | z`, rejecting unknown variables, `x == y`, and `x`
    /// or `y` inside `z`. Repeated members of `z` are collapsed.
    pub fn resolve(&self, x: &Node, y: &Node, z: &[Node]) -> Result<Query, TestError> {
        let xi = self.position(x)?;
        let yi = self.position(y)?;
        if xi == yi {
            return Err(TestError::InvalidQuery {
                reason: format!("{} tested against itself", x.name()),
            });
        }
        let mut zi = Vec::with_capacity(z.len());
        for node in z {
            let i = self.position(node)?;
            if i == xi || i == yi {
                return Err(TestError::InvalidQuery {
                    reason: format!("{} appears in its own conditioning set", node.name()),
                });
            }
            if !zi.contains(&i) {
                zi.push(i);
            }
        }
        Ok(Query { x: xi, y: yi, z: zi })
    }
}

/// Lock-protected slot for the last computed p-value.
#[derive(Debug, Default)]
pub(crate) struct LastPValue(RwLock<Option<f64>>);

impl LastPValue {
    pub fn record(&self, p_value: f64) {
        if let Ok(mut slot) = self.0.write() {
            *slot = Some(p_value);
        }
    }

    pub fn get(&self) -> Option<f64> {
        self.0.read().ok().and_then(|slot| *slot)
    }
}

/// Render a query for log output.
pub(crate) fn describe(x: &Node, y: &Node, z: &[Node]) -> String {
    let z: Vec<&str> = z.iter().map(Node::name).collect();
    format!("{} _||_ {} | [{}]", x.name(), y.name(), z.join(", "))
}
