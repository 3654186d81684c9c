//! Stratified chi-square and G-square tests for discrete data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use tetrad_core::errors::TestError;
use tetrad_core::{DataSet, Node};
use tracing::warn;

use super::{describe, validate_alpha, IndependenceResult, IndependenceTest, LastPValue, VariableIndex};

/// Which contingency-table statistic to accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChiSquareStatistic {
    /// `Σ (O − E)² / E`.
    PearsonChiSquare,
    /// `2 Σ O ln(O / E)`.
    GSquare,
}

/// Tests `x ⊥ y | z` by splitting the rows on the joint value of `z` and
/// summing the per-stratum statistic and degrees of freedom. Rows and
/// columns that are empty within a stratum do not count towards its degrees
/// of freedom; zero total degrees of freedom means independent with p = 1.
#[derive(Debug)]
pub struct ChiSquare {
    index: VariableIndex,
    columns: Vec<Vec<usize>>,
    categories: Vec<usize>,
    num_rows: usize,
    alpha: f64,
    statistic: ChiSquareStatistic,
    last_p: LastPValue,
}

impl ChiSquare {
    pub fn new(data: &DataSet, alpha: f64, statistic: ChiSquareStatistic) -> Result<Self, TestError> {
        validate_alpha(alpha)?;
        let mut columns = Vec::with_capacity(data.num_columns());
        let mut categories = Vec::with_capacity(data.num_columns());
        for (c, variable) in data.variables().iter().enumerate() {
            let (Some(values), Some(k)) = (data.discrete_column(c), variable.num_categories()) else {
                return Err(TestError::IncompatibleData {
                    reason: format!(
                        "column {} is continuous; this test needs discrete data",
                        variable.name()
                    ),
                });
            };
            columns.push(values.to_vec());
            categories.push(k);
        }
        Ok(Self {
            index: VariableIndex::new(data.nodes()),
            columns,
            categories,
            num_rows: data.num_rows(),
            alpha,
            statistic,
            last_p: LastPValue::default(),
        })
    }

    pub fn statistic_kind(&self) -> ChiSquareStatistic {
        self.statistic
    }

    /// One stratum's statistic and degrees of freedom.
    fn stratum(&self, table: &[Vec<f64>]) -> (f64, usize) {
        let row_sums: Vec<f64> = table.iter().map(|r| r.iter().sum()).collect();
        let cols = table.first().map_or(0, Vec::len);
        let col_sums: Vec<f64> = (0..cols).map(|j| table.iter().map(|r| r[j]).sum()).collect();
        let total: f64 = row_sums.iter().sum();

        let live_rows = row_sums.iter().filter(|&&s| s > 0.0).count();
        let live_cols = col_sums.iter().filter(|&&s| s > 0.0).count();
        if live_rows < 2 || live_cols < 2 || total <= 0.0 {
            return (0.0, 0);
        }
        let df = (live_rows - 1) * (live_cols - 1);

        let mut stat = 0.0;
        for (i, row) in table.iter().enumerate() {
            for (j, &observed) in row.iter().enumerate() {
                let expected = row_sums[i] * col_sums[j] / total;
                if expected <= 0.0 {
                    continue;
                }
                stat += match self.statistic {
                    ChiSquareStatistic::PearsonChiSquare => (observed - expected).powi(2) / expected,
                    ChiSquareStatistic::GSquare if observed > 0.0 => 2.0 * observed * (observed / expected).ln(),
                    ChiSquareStatistic::GSquare => 0.0,
                };
            }
        }
        (stat, df)
    }
}

impl IndependenceTest for ChiSquare {
    fn variables(&self) -> &[Node] {
        self.index.nodes()
    }

    fn check_independence(&self, x: &Node, y: &Node, z: &[Node]) -> Result<IndependenceResult, TestError> {
        let q = self.index.resolve(x, y, z)?;
        let (kx, ky) = (self.categories[q.x], self.categories[q.y]);

        let mut strata: BTreeMap<Vec<usize>, Vec<Vec<f64>>> = BTreeMap::new();
        for row in 0..self.num_rows {
            let key: Vec<usize> = q.z.iter().map(|&c| self.columns[c][row]).collect();
            let table = strata.entry(key).or_insert_with(|| vec![vec![0.0; ky]; kx]);
            table[self.columns[q.x][row]][self.columns[q.y][row]] += 1.0;
        }

        let (stat, df) = strata
            .values()
            .map(|t| self.stratum(t))
            .fold((0.0, 0usize), |(s, d), (s1, d1)| (s + s1, d + d1));

        if df == 0 {
            self.last_p.record(1.0);
            return Ok(IndependenceResult {
                independent: true,
                p_value: 1.0,
                statistic: 0.0,
            });
        }

        let p = match ChiSquared::new(df as f64) {
            Ok(dist) => (1.0 - dist.cdf(stat)).clamp(0.0, 1.0),
            Err(_) => f64::NAN,
        };
        if !p.is_finite() || !stat.is_finite() {
            warn!(query = %describe(x, y, z), stat, df, "non-finite chi-square result; reporting dependence");
            self.last_p.record(0.0);
            return Ok(IndependenceResult::degenerate());
        }

        self.last_p.record(p);
        Ok(IndependenceResult::from_p_value(p, stat, self.alpha))
    }

    fn alpha(&self) -> f64 {
        self.alpha
    }

    fn name(&self) -> &'static str {
        match self.statistic {
            ChiSquareStatistic::PearsonChiSquare => "Chi Square",
            ChiSquareStatistic::GSquare => "G Square",
        }
    }

    fn last_p_value(&self) -> Option<f64> {
        self.last_p.get()
    }
}
