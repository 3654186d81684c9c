//! Graph/dataset variables. A node's identity is its name.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// What a node stands for in a causal model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// An observed variable.
    #[default]
    Measured,
    /// An unobserved common cause.
    Latent,
    /// An error term in a structural equation.
    Error,
    /// Untyped (used for auxiliary nodes).
    NoType,
}

/// A named variable. Equality, ordering and hashing use the name only, so a
/// node can be looked up from any copy carrying the same name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    name: String,
    node_type: NodeType,
}

impl Node {
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
        }
    }

    /// A measured node.
    pub fn measured(name: impl Into<String>) -> Self {
        Self::new(name, NodeType::Measured)
    }

    /// A latent node.
    pub fn latent(name: impl Into<String>) -> Self {
        Self::new(name, NodeType::Latent)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn identity_is_name_only() {
        let a = Node::measured("X");
        let b = Node::latent("X");
        assert_eq!(a, b);
        let set: HashSet<Node> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn ordering_is_by_name() {
        let mut nodes = vec![Node::measured("C"), Node::measured("A"), Node::measured("B")];
        nodes.sort();
        let names: Vec<&str> = nodes.iter().map(Node::name).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }
}
