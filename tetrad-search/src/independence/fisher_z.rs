//! Fisher's Z test of vanishing partial correlation, for continuous data.

use statrs::distribution::{ContinuousCDF, Normal};
use tetrad_core::constants::SINGULARITY_TOLERANCE;
use tetrad_core::errors::TestError;
use tetrad_core::{DataSet, Node};
use tracing::warn;

use super::matrix::{correlation_matrix, partial_correlation};
use super::{describe, validate_alpha, IndependenceResult, IndependenceTest, LastPValue, VariableIndex};

/// Tests `x ⊥ y | z` with the statistic
/// `0.5 · sqrt(n − |z| − 3) · ln((1 + r) / (1 − r))`, `r` the sample partial
/// correlation, against a standard normal (two-sided).
///
/// The correlation matrix is computed once at construction.
#[derive(Debug)]
pub struct FisherZ {
    index: VariableIndex,
    correlations: Vec<Vec<f64>>,
    sample_size: usize,
    alpha: f64,
    tolerance: f64,
    last_p: LastPValue,
}

impl FisherZ {
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

    /// Pivot tolerance for inverting correlation submatrices.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }
}

impl IndependenceTest for FisherZ {
    fn variables(&self) -> &[Node] {
        self.index.nodes()
    }

    fn check_independence(&self, x: &Node, y: &Node, z: &[Node]) -> Result<IndependenceResult, TestError> {
        let q = self.index.resolve(x, y, z)?;

        let dof = self.sample_size as f64 - q.z.len() as f64 - 3.0;
        if dof <= 0.0 {
            warn!(query = %describe(x, y, z), n = self.sample_size, "too few samples for Fisher Z; reporting dependence");
            self.last_p.record(0.0);
            return Ok(IndependenceResult::degenerate());
        }

        let Some(r) = partial_correlation(&self.correlations, q.x, q.y, &q.z, self.tolerance) else {
            warn!(query = %describe(x, y, z), "singular or degenerate correlation submatrix; reporting dependence");
            self.last_p.record(0.0);
            return Ok(IndependenceResult::degenerate());
        };

        let fisher = 0.5 * dof.sqrt() * ((1.0 + r) / (1.0 - r)).ln();
        let p = two_sided_normal_p(fisher);
        if !p.is_finite() {
            warn!(query = %describe(x, y, z), r, "non-finite Fisher Z statistic; reporting dependence");
            self.last_p.record(0.0);
            return Ok(IndependenceResult::degenerate());
        }

        self.last_p.record(p);
        Ok(IndependenceResult::from_p_value(p, fisher, self.alpha))
    }

    fn alpha(&self) -> f64 {
        self.alpha
    }

    fn name(&self) -> &'static str {
        "Fisher Z"
    }

    fn last_p_value(&self) -> Option<f64> {
        self.last_p.get()
    }
}

/// `2 · (1 − Φ(|z|))`; `|z| = ∞` gives 0.
pub(crate) fn two_sided_normal_p(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    match Normal::new(0.0, 1.0) {
        Ok(normal) => (2.0 * (1.0 - normal.cdf(z.abs()))).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}

/// Borrow every column as `f64`, rejecting discrete data.
pub(crate) fn continuous_columns(data: &DataSet) -> Result<Vec<&[f64]>, TestError> {
    (0..data.num_columns())
        .map(|c| {
            data.continuous_column(c).ok_or_else(|| TestError::IncompatibleData {
                reason: format!(
                    "column {} is discrete; this test needs continuous data",
                    data.variables()[c].name()
                ),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p_value_of_zero_statistic_is_one() {
        assert!((two_sided_normal_p(0.0) - 1.0).abs() < 1e-12);
        assert!((two_sided_normal_p(1.959964) - 0.05).abs() < 1e-4);
        assert_eq!(two_sided_normal_p(f64::INFINITY), 0.0);
    }
}
