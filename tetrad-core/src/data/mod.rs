//! Rectangular tabular datasets consumed by independence tests.

pub mod dataset;
pub mod loader;
pub mod variable;

pub use dataset::{Cell, Column, DataSet};
pub use loader::ColumnTyping;
pub use variable::{Variable, VariableKind};
