//! Shared model types.

pub mod node;

pub use node::{Node, NodeType};
