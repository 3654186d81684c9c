//! Endpoint marks.

use serde::{Deserialize, Serialize};

/// The mark at one end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// `-`: the node at this end is an ancestor of the other.
    Tail,
    /// `>`: the node at this end is not an ancestor of the other.
    Arrow,
    /// `o`: undetermined.
    Circle,
    /// No mark.
    Null,
}

impl Endpoint {
    /// Glyph used when the mark sits at the left end of a printed edge.
    pub(crate) fn left_glyph(self) -> char {
        match self {
            Self::Tail => '-',
            Self::Arrow => '<',
            Self::Circle => 'o',
            Self::Null => ' ',
        }
    }

    /// Glyph used when the mark sits at the right end of a printed edge.
    pub(crate) fn right_glyph(self) -> char {
        match self {
            Self::Tail => '-',
            Self::Arrow => '>',
            Self::Circle => 'o',
            Self::Null => ' ',
        }
    }
}
