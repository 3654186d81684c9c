use serde::{Deserialize, Serialize};

use crate::models::Node;

/// Measurement scale of a dataset column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    Continuous,
    /// Discrete with named categories; cells hold category indices.
    Discrete { categories: Vec<String> },
}

impl VariableKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Continuous => "continuous",
            Self::Discrete { .. } => "discrete",
        }
    }
}

/// A dataset column header: the node it measures plus its scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub node: Node,
    pub kind: VariableKind,
}

impl Variable {
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            node: Node::measured(name),
            kind: VariableKind::Continuous,
        }
    }

    pub fn discrete(name: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            node: Node::measured(name),
            kind: VariableKind::Discrete { categories },
        }
    }

    pub fn name(&self) -> &str {
        self.node.name()
    }

    pub fn is_continuous(&self) -> bool {
        matches!(self.kind, VariableKind::Continuous)
    }

    /// Number of categories, `None` for continuous variables.
    pub fn num_categories(&self) -> Option<usize> {
        match &self.kind {
            VariableKind::Continuous => None,
            VariableKind::Discrete { categories } => Some(categories.len()),
        }
    }
}
