use tetrad_core::errors::*;

#[test]
fn graph_error_duplicate_edge_names_both_nodes() {
    let err = GraphError::DuplicateEdge {
        node1: "X".into(),
        node2: "Y".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains('X') && msg.contains('Y'));
}

#[test]
fn cycle_detected_has_its_own_code() {
    let err = GraphError::CycleDetected {
        path: "A -> B -> A".into(),
    };
    assert_eq!(err.error_code(), "CYCLE_DETECTED");
    assert!(err.to_string().contains("A -> B -> A"));
}

#[test]
fn unknown_variable_carries_name_and_code() {
    let err = TestError::UnknownVariable { name: "Q".into() };
    assert_eq!(err.error_code(), "UNKNOWN_VARIABLE");
    assert_eq!(err.coded_string(), "[UNKNOWN_VARIABLE] variable not known to the test: Q");
}

#[test]
fn test_error_converts_to_search_error() {
    let search: SearchError = TestError::InvalidQuery {
        reason: "x = y".into(),
    }
    .into();
    assert_eq!(search.error_code(), "INVALID_QUERY");
}

#[test]
fn invariant_wraps_graph_error() {
    let err = SearchError::invariant(GraphError::SelfLoop { name: "A".into() });
    assert_eq!(err.error_code(), "INVARIANT_VIOLATED");
    assert!(err.to_string().contains("self loop on A"));
}

#[test]
fn subsystem_errors_convert_to_tetrad_error() {
    let err: TetradError = ConfigError::ValidationFailed {
        field: "test.alpha".into(),
        message: "bad".into(),
    }
    .into();
    assert!(matches!(err, TetradError::Config(_)));
    assert_eq!(err.error_code(), "CONFIG_ERROR");

    let err: TetradError = DataError::NoVariables.into();
    assert_eq!(err.error_code(), "DATA_ERROR");
}
