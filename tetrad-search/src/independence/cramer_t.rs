//! Student-t test of vanishing partial correlation.

use statrs::distribution::{ContinuousCDF, StudentsT};
use tetrad_core::constants::SINGULARITY_TOLERANCE;
use tetrad_core::errors::TestError;
use tetrad_core::{DataSet, Node};
use tracing::warn;

use super::fisher_z::continuous_columns;
use super::matrix::{correlation_matrix, partial_correlation};
use super::{describe, validate_alpha, IndependenceResult, IndependenceTest, LastPValue, VariableIndex};

/// `t = r · sqrt(df / (1 − r²))` with `df = n − 2 − |z|`, two-sided against
/// Student's t with `df` degrees of freedom.
#[derive(Debug)]
pub struct CramerT {
    index: VariableIndex,
    correlations: Vec<Vec<f64>>,
    sample_size: usize,
    alpha: f64,
    tolerance: f64,
    last_p: LastPValue,
}

impl CramerT {
    pub fn new(data: &DataSet, alpha: f64) -> Result<Self, TestError> {
        validate_alpha(alpha)?;
        let columns = continuous_columns(data)?;
        Ok(Self {
            index: VariableIndex::new(data.nodes()),
            correlations: correlation_matrix(&columns),
            sample_size: data.num_rows(),
            alpha,
            tolerance: SINGULARITY_TOLERANCE,
            last_p: LastPValue::default(),
        })
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn degenerate(&self, x: &Node, y: &Node, z: &[Node], why: &str) -> IndependenceResult {
        warn!(query = %describe(x, y, z), reason = why, "Cramer T fallback; reporting dependence");
        self.last_p.record(0.0);
        IndependenceResult::degenerate()
    }
}

impl IndependenceTest for CramerT {
    fn variables(&self) -> &[Node] {
        self.index.nodes()
    }

    fn check_independence(&self, x: &Node, y: &Node, z: &[Node]) -> Result<IndependenceResult, TestError> {
        let q = self.index.resolve(x, y, z)?;

        let df = self.sample_size as f64 - 2.0 - q.z.len() as f64;
        if df <= 0.0 {
            return Ok(self.degenerate(x, y, z, "too few samples"));
        }
        let Some(r) = partial_correlation(&self.correlations, q.x, q.y, &q.z, self.tolerance) else {
            return Ok(self.degenerate(x, y, z, "singular correlation submatrix"));
        };
        let denom = 1.0 - r * r;
        if denom <= 0.0 {
            return Ok(self.degenerate(x, y, z, "perfect correlation"));
        }

        let t = r * (df / denom).sqrt();
        let p = match StudentsT::new(0.0, 1.0, df) {
            Ok(dist) => (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0),
            Err(_) => f64::NAN,
        };
        if !p.is_finite() {
            return Ok(self.degenerate(x, y, z, "non-finite statistic"));
        }

        self.last_p.record(p);
        Ok(IndependenceResult::from_p_value(p, t, self.alpha))
    }

    fn alpha(&self) -> f64 {
        self.alpha
    }

    fn name(&self) -> &'static str {
        "Cramer T"
    }

    fn last_p_value(&self) -> Option<f64> {
        self.last_p.get()
    }
}
