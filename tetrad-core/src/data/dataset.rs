use std::collections::HashMap;

use crate::errors::DataError;
use crate::models::Node;

use super::variable::{Variable, VariableKind};

/// Column storage matching a variable's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Continuous(Vec<f64>),
    Discrete(Vec<usize>),
}

impl Column {
    fn len(&self) -> usize {
        match self {
            Self::Continuous(v) => v.len(),
            Self::Discrete(v) => v.len(),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Continuous(_) => "continuous",
            Self::Discrete(_) => "discrete",
        }
    }
}

/// A single cell value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Continuous(f64),
    Discrete(usize),
}

/// Immutable column-major dataset. Validated once at construction, so tests
/// can index into it without further checks.
#[derive(Debug, Clone)]
pub struct DataSet {
    variables: Vec<Variable>,
    columns: Vec<Column>,
    num_rows: usize,
    index: HashMap<String, usize>,
}

impl DataSet {
    /// Build a dataset from headers and matching columns.
    pub fn new(variables: Vec<Variable>, columns: Vec<Column>) -> Result<Self, DataError> {
        if variables.is_empty() {
            return Err(DataError::NoVariables);
        }
        if variables.len() != columns.len() {
            return Err(DataError::RowLengthMismatch {
                row: 0,
                expected: variables.len(),
                actual: columns.len(),
            });
        }

        let mut index = HashMap::with_capacity(variables.len());
        for (i, var) in variables.iter().enumerate() {
            if index.insert(var.name().to_string(), i).is_some() {
                return Err(DataError::DuplicateVariable {
                    name: var.name().to_string(),
                });
            }
        }

        let num_rows = columns[0].len();
        for (var, column) in variables.iter().zip(&columns) {
            if column.len() != num_rows {
                return Err(DataError::ColumnLengthMismatch {
                    column: var.name().to_string(),
                    expected: num_rows,
                    actual: column.len(),
                });
            }
            match (&var.kind, column) {
                (VariableKind::Continuous, Column::Continuous(values)) => {
                    if let Some(row) = values.iter().position(|v| !v.is_finite()) {
                        return Err(DataError::NonFiniteValue {
                            column: var.name().to_string(),
                            row,
                        });
                    }
                }
                (VariableKind::Discrete { categories }, Column::Discrete(values)) => {
                    if let Some(&bad) = values.iter().find(|&&v| v >= categories.len()) {
                        return Err(DataError::CategoryOutOfRange {
                            variable: var.name().to_string(),
                            index: bad,
                            categories: categories.len(),
                        });
                    }
                }
                (kind, column) => {
                    return Err(DataError::KindMismatch {
                        variable: var.name().to_string(),
                        expected: kind.label(),
                        actual: column.label(),
                    });
                }
            }
        }

        Ok(Self {
            variables,
            columns,
            num_rows,
            index,
        })
    }

    /// Build an all-continuous dataset from row-major values.
    pub fn continuous(names: &[&str], rows: &[Vec<f64>]) -> Result<Self, DataError> {
        let mut columns = vec![Vec::with_capacity(rows.len()); names.len()];
        for (r, row) in rows.iter().enumerate() {
            if row.len() != names.len() {
                return Err(DataError::RowLengthMismatch {
                    row: r,
                    expected: names.len(),
                    actual: row.len(),
                });
            }
            for (c, &value) in row.iter().enumerate() {
                columns[c].push(value);
            }
        }
        let variables = names.iter().map(|n| Variable::continuous(*n)).collect();
        Self::new(variables, columns.into_iter().map(Column::Continuous).collect())
    }

    /// Build an all-discrete dataset from row-major category indices.
    /// Each variable gets categories "0".."k-1" where k is one past the
    /// largest index seen in its column (at least 2).
    pub fn discrete(names: &[&str], rows: &[Vec<usize>]) -> Result<Self, DataError> {
        let mut columns = vec![Vec::with_capacity(rows.len()); names.len()];
        for (r, row) in rows.iter().enumerate() {
            if row.len() != names.len() {
                return Err(DataError::RowLengthMismatch {
                    row: r,
                    expected: names.len(),
                    actual: row.len(),
                });
            }
            for (c, &value) in row.iter().enumerate() {
                columns[c].push(value);
            }
        }
        let variables = names
            .iter()
            .zip(&columns)
            .map(|(name, column)| {
                let k = column.iter().copied().max().map_or(2, |m| (m + 1).max(2));
                Variable::discrete(*name, (0..k).map(|i| i.to_string()).collect())
            })
            .collect();
        Self::new(variables, columns.into_iter().map(Column::Discrete).collect())
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Nodes in column order.
    pub fn nodes(&self) -> Vec<Node> {
        self.variables.iter().map(|v| v.node.clone()).collect()
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.variables.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.column_index(name).map(|i| &self.variables[i])
    }

    /// Cell accessor; `None` when out of range.
    pub fn cell(&self, row: usize, column: usize) -> Option<Cell> {
        match self.columns.get(column)? {
            Column::Continuous(values) => values.get(row).map(|&v| Cell::Continuous(v)),
            Column::Discrete(values) => values.get(row).map(|&v| Cell::Discrete(v)),
        }
    }

    pub fn continuous_column(&self, column: usize) -> Option<&[f64]> {
        match self.columns.get(column)? {
            Column::Continuous(values) => Some(values),
            Column::Discrete(_) => None,
        }
    }

    pub fn discrete_column(&self, column: usize) -> Option<&[usize]> {
        match self.columns.get(column)? {
            Column::Discrete(values) => Some(values),
            Column::Continuous(_) => None,
        }
    }

    pub fn is_continuous(&self) -> bool {
        self.variables.iter().all(Variable::is_continuous)
    }

    pub fn is_discrete(&self) -> bool {
        self.variables.iter().all(|v| !v.is_continuous())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuous_builder_transposes_rows() {
        let data = DataSet::continuous(&["X", "Y"], &[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(data.num_rows(), 2);
        assert_eq!(data.continuous_column(1).unwrap(), &[2.0, 4.0]);
        assert_eq!(data.cell(1, 0), Some(Cell::Continuous(3.0)));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = DataSet::continuous(&["X", "Y"], &[vec![1.0]]).unwrap_err();
        assert!(matches!(err, DataError::RowLengthMismatch { .. }));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let err = DataSet::continuous(&["X"], &[vec![f64::NAN]]).unwrap_err();
        assert!(matches!(err, DataError::NonFiniteValue { .. }));
    }

    #[test]
    fn discrete_builder_infers_categories() {
        let data = DataSet::discrete(&["A"], &[vec![0], vec![2]]).unwrap();
        assert_eq!(data.variables()[0].num_categories(), Some(3));
        assert!(data.is_discrete());
    }
}
