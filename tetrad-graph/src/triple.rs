//! Unordered-end triples `X - Y - Z`.

use std::fmt;

use serde::{Deserialize, Serialize};
use tetrad_core::Node;

/// A path of length two through `y`. `(x, y, z)` and `(z, y, x)` are the
/// same triple; the constructor stores the ends in name order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    x: Node,
    y: Node,
    z: Node,
}

impl Triple {
    pub fn new(x: Node, y: Node, z: Node) -> Self {
        if x <= z {
            Self { x, y, z }
        } else {
            Self { x: z, y, z: x }
        }
    }

    pub fn x(&self) -> &Node {
        &self.x
    }

    pub fn y(&self) -> &Node {
        &self.y
    }

    pub fn z(&self) -> &Node {
        &self.z
    }

    pub fn contains(&self, node: &Node) -> bool {
        &self.x == node || &self.y == node || &self.z == node
    }

    /// Whether the triple runs along the edge `a - b` (either direction).
    pub(crate) fn uses_edge(&self, a: &Node, b: &Node) -> bool {
        let pair = |p: &Node, q: &Node| (p == a && q == b) || (p == b && q == a);
        pair(&self.x, &self.y) || pair(&self.y, &self.z)
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}>", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ends_are_unordered() {
        let a = Node::measured("A");
        let b = Node::measured("B");
        let c = Node::measured("C");
        let t1 = Triple::new(a.clone(), b.clone(), c.clone());
        let t2 = Triple::new(c, b, a);
        assert_eq!(t1, t2);
        assert_eq!(t1.to_string(), "<A, B, C>");
    }
}
