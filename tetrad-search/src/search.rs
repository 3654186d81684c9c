//! Common entry point for whole-graph searches.

use tetrad_core::errors::SearchError;
use tetrad_core::{RunContext, SearchOutcome};
use tetrad_graph::Graph;

use crate::sepset::SepsetMap;

/// Graph produced by a search together with the separating sets it found.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub graph: Graph,
    pub sepsets: SepsetMap,
}

/// A search that learns a whole graph from an independence oracle.
pub trait GraphSearch {
    fn search(&self, ctx: &RunContext) -> Result<SearchOutcome<SearchResult>, SearchError>;

    fn algorithm_name(&self) -> &'static str;
}

pub(crate) fn validate_depth(depth: i32) -> Result<(), SearchError> {
    if depth < -1 {
        Err(SearchError::InvalidDepth { depth })
    } else {
        Ok(())
    }
}
