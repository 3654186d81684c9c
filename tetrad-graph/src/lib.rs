//! # tetrad-graph
//!
//! The graph model shared by every search: nodes joined by edges whose two
//! ends carry independent endpoint marks (tail, arrow, circle). Covers DAGs,
//! CPDAGs and PAGs with one concrete [`Graph`] type; [`Dag`] and
//! [`KnowledgeGuard`] are adapters that constrain its mutations.

pub mod dag;
pub mod dsep;
pub mod edge;
pub mod endpoint;
pub mod graph;
pub mod knowledge;
pub mod paths;
pub mod triple;

pub use dag::Dag;
pub use edge::Edge;
pub use endpoint::Endpoint;
pub use graph::Graph;
pub use knowledge::{Knowledge, KnowledgeGuard};
pub use triple::Triple;

pub use tetrad_core::{Node, NodeType};
