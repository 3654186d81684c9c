//! Exact independence oracle reading d-separation off a known graph.

use tetrad_core::errors::TestError;
use tetrad_core::{Node, NodeType};
use tetrad_graph::Graph;

use super::{IndependenceResult, IndependenceTest, LastPValue, VariableIndex};

/// Answers `x ⊥ y | z` by d-separation in `graph`. p-values are 1.0 for
/// independent and 0.0 for dependent, so any alpha in (0, 1) gives the same
/// decisions. Latent nodes are not exposed as variables.
#[derive(Debug)]
pub struct DSeparationTest {
    graph: Graph,
    index: VariableIndex,
    last_p: LastPValue,
}

impl DSeparationTest {
    pub fn new(graph: Graph) -> Self {
        let observed: Vec<Node> = graph
            .nodes()
            .into_iter()
            .filter(|n| n.node_type() != NodeType::Latent)
            .collect();
        Self {
            index: VariableIndex::new(observed),
            graph,
            last_p: LastPValue::default(),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

impl IndependenceTest for DSeparationTest {
    fn variables(&self) -> &[Node] {
        self.index.nodes()
    }

    fn check_independence(&self, x: &Node, y: &Node, z: &[Node]) -> Result<IndependenceResult, TestError> {
        self.index.resolve(x, y, z)?;
        let independent = self.graph.is_d_separated_from(x, y, z);
        let p = if independent { 1.0 } else { 0.0 };
        self.last_p.record(p);
        Ok(IndependenceResult {
            independent,
            p_value: p,
            statistic: if independent { 0.0 } else { f64::INFINITY },
        })
    }

    fn alpha(&self) -> f64 {
        0.5
    }

    fn name(&self) -> &'static str {
        "d-Separation"
    }

    fn last_p_value(&self) -> Option<f64> {
        self.last_p.get()
    }
}
