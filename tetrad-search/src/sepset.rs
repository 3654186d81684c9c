//! Separating sets recorded during adjacency search.

use std::collections::BTreeMap;

use tetrad_core::Node;

/// Unordered pair → the conditioning set that separated it. The first set
/// recorded for a pair is kept; later writes are ignored and nothing is
/// ever removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SepsetMap {
    sepsets: BTreeMap<(Node, Node), Vec<Node>>,
    p_values: BTreeMap<(Node, Node), f64>,
}

impl SepsetMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(x: &Node, y: &Node) -> (Node, Node) {
        if x <= y {
            (x.clone(), y.clone())
        } else {
            (y.clone(), x.clone())
        }
    }

    /// Record `z` as separating `x` and `y` unless a set is already present.
    /// Returns whether the set was stored.
    pub fn set(&mut self, x: &Node, y: &Node, z: Vec<Node>) -> bool {
        let key = Self::key(x, y);
        if self.sepsets.contains_key(&key) {
            return false;
        }
        self.sepsets.insert(key, z);
        true
    }

    /// As [`SepsetMap::set`], also keeping the p-value of the separating test.
    pub fn set_with_p_value(&mut self, x: &Node, y: &Node, z: Vec<Node>, p_value: f64) -> bool {
        let stored = self.set(x, y, z);
        if stored {
            self.p_values.insert(Self::key(x, y), p_value);
        }
        stored
    }

    pub fn get(&self, x: &Node, y: &Node) -> Option<&[Node]> {
        self.sepsets.get(&Self::key(x, y)).map(Vec::as_slice)
    }

    pub fn p_value(&self, x: &Node, y: &Node) -> Option<f64> {
        self.p_values.get(&Self::key(x, y)).copied()
    }

    pub fn contains(&self, x: &Node, y: &Node) -> bool {
        self.sepsets.contains_key(&Self::key(x, y))
    }

    /// Recorded pairs in name order.
    pub fn pairs(&self) -> impl Iterator<Item = (&Node, &Node)> {
        self.sepsets.keys().map(|(a, b)| (a, b))
    }

    pub fn len(&self) -> usize {
        self.sepsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sepsets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_writer_wins_and_pair_is_unordered() {
        let (a, b, c) = (Node::measured("A"), Node::measured("B"), Node::measured("C"));
        let mut map = SepsetMap::new();
        assert!(map.set_with_p_value(&b, &a, vec![c.clone()], 0.4));
        assert!(!map.set(&a, &b, vec![]));
        assert_eq!(map.get(&a, &b), Some(&[c][..]));
        assert_eq!(map.p_value(&a, &b), Some(0.4));
        assert_eq!(map.get(&a, &Node::measured("D")), None);
        assert_eq!(map.pairs().count(), 1);
    }
}
