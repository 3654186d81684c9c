//! # tetrad-search
//!
//! Constraint-based structure learning over an [`IndependenceTest`] oracle:
//! the [`Fas`] adjacency search, [`Pc`] and [`Fci`] orientation, and the
//! Markov-blanket family under [`mb`].

pub mod choice;
pub mod collider;
pub mod fas;
pub mod fci;
pub mod independence;
pub mod mb;
pub mod meek;
pub mod pc;
pub mod search;
pub mod sepset;

pub use fas::Fas;
pub use fci::{Fci, FciOrient};
pub use independence::{
    ChiSquare, ChiSquareStatistic, CramerT, DSeparationTest, FisherZ, IndependenceResult,
    IndependenceTest,
};
pub use mb::{CpcMb, GrowShrink, HitonMb, Mbfs, MbSearch, Pcmb};
pub use pc::Pc;
pub use search::{GraphSearch, SearchResult};
pub use sepset::SepsetMap;
