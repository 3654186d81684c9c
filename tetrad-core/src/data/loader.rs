//! Minimal delimited-text reader for the command-line driver.
//!
//! Header line of variable names, one row per line. Cells are separated by
//! tabs, commas, or runs of whitespace. A column whose every cell parses as
//! `f64` is continuous; otherwise it is discrete with categories in order of
//! first appearance. [`ColumnTyping::Discrete`] reads every column as
//! categorical, for integer-coded discrete data.

use std::io::BufRead;
use std::path::Path;

use crate::errors::DataError;

use super::dataset::{Column, DataSet};
use super::variable::Variable;

/// How the loader assigns a kind to each column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnTyping {
    /// Continuous when every cell parses as `f64`, discrete otherwise.
    #[default]
    Inferred,
    /// Every column is discrete, numeric codes included.
    Discrete,
}

fn split_line(line: &str) -> Vec<&str> {
    if line.contains('\t') {
        line.split('\t').map(str::trim).collect()
    } else if line.contains(',') {
        line.split(',').map(str::trim).collect()
    } else {
        line.split_whitespace().collect()
    }
}

impl DataSet {
    /// Parse a delimited dataset from any buffered reader, inferring column
    /// kinds.
    pub fn from_delimited<R: BufRead>(reader: R) -> Result<Self, DataError> {
        Self::from_delimited_with(reader, ColumnTyping::Inferred)
    }

    /// Parse a delimited dataset, typing columns as `typing` says.
    pub fn from_delimited_with<R: BufRead>(reader: R, typing: ColumnTyping) -> Result<Self, DataError> {
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l))
            .filter(|(_, l)| l.as_ref().map_or(true, |s| !s.trim().is_empty() && !s.starts_with("//")));

        let (_, header) = lines.next().ok_or(DataError::NoVariables)?;
        let header = header.map_err(|e| DataError::ParseError {
            line: 1,
            message: e.to_string(),
        })?;
        let names: Vec<String> = split_line(&header).into_iter().map(str::to_string).collect();
        if names.is_empty() {
            return Err(DataError::NoVariables);
        }

        let mut raw: Vec<Vec<String>> = vec![Vec::new(); names.len()];
        for (line_no, line) in lines {
            let line = line.map_err(|e| DataError::ParseError {
                line: line_no,
                message: e.to_string(),
            })?;
            let cells = split_line(&line);
            if cells.len() != names.len() {
                return Err(DataError::ParseError {
                    line: line_no,
                    message: format!("expected {} cells, found {}", names.len(), cells.len()),
                });
            }
            for (column, cell) in raw.iter_mut().zip(cells) {
                column.push(cell.to_string());
            }
        }

        let mut variables = Vec::with_capacity(names.len());
        let mut columns = Vec::with_capacity(names.len());
        for (name, cells) in names.iter().zip(raw) {
            let parsed: Option<Vec<f64>> = match typing {
                ColumnTyping::Inferred => cells.iter().map(|c| c.parse::<f64>().ok()).collect(),
                ColumnTyping::Discrete => None,
            };
            match parsed {
                Some(values) => {
                    variables.push(Variable::continuous(name.as_str()));
                    columns.push(Column::Continuous(values));
                }
                None => {
                    let mut categories: Vec<String> = Vec::new();
                    let mut values = Vec::with_capacity(cells.len());
                    for cell in cells {
                        let idx = match categories.iter().position(|c| *c == cell) {
                            Some(idx) => idx,
                            None => {
                                categories.push(cell);
                                categories.len() - 1
                            }
                        };
                        values.push(idx);
                    }
                    variables.push(Variable::discrete(name.as_str(), categories));
                    columns.push(Column::Discrete(values));
                }
            }
        }

        Self::new(variables, columns)
    }

    /// Read a delimited dataset from a file, inferring column kinds.
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        Self::from_path_with(path, ColumnTyping::Inferred)
    }

    pub fn from_path_with(path: &Path, typing: ColumnTyping) -> Result<Self, DataError> {
        let file = std::fs::File::open(path).map_err(|e| DataError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_delimited_with(std::io::BufReader::new(file), typing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::VariableKind;

    #[test]
    fn mixed_columns_are_typed_by_content() {
        let text = "X\tY\n1.5\ta\n2.0\tb\n-3\ta\n";
        let data = DataSet::from_delimited(text.as_bytes()).unwrap();
        assert_eq!(data.num_rows(), 3);
        assert!(data.variables()[0].is_continuous());
        assert_eq!(
            data.variables()[1].kind,
            VariableKind::Discrete {
                categories: vec!["a".to_string(), "b".to_string()]
            }
        );
        assert_eq!(data.discrete_column(1).unwrap(), &[0, 1, 0]);
    }

    #[test]
    fn discrete_typing_keeps_integer_codes_categorical() {
        let text = "X,Y\n0,2\n1,0\n0,1\n";
        let inferred = DataSet::from_delimited(text.as_bytes()).unwrap();
        assert!(inferred.variables()[0].is_continuous());

        let data = DataSet::from_delimited_with(text.as_bytes(), ColumnTyping::Discrete).unwrap();
        assert!(!data.variables()[0].is_continuous());
        assert_eq!(
            data.variables()[1].kind,
            VariableKind::Discrete {
                categories: vec!["2".to_string(), "0".to_string(), "1".to_string()]
            }
        );
        assert_eq!(data.discrete_column(0).unwrap(), &[0, 1, 0]);
    }

    #[test]
    fn whitespace_and_comma_delimiters() {
        let ws = DataSet::from_delimited("A B\n1 2\n".as_bytes()).unwrap();
        let csv = DataSet::from_delimited("A,B\n1,2\n".as_bytes()).unwrap();
        assert_eq!(ws.num_columns(), 2);
        assert_eq!(csv.num_columns(), 2);
    }

    #[test]
    fn short_row_reports_line_number() {
        let err = DataSet::from_delimited("A B\n1 2\n3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::ParseError { line: 3, .. }));
    }
}
