//! Integration tests for the independence tests: decisions on simulated
//! data, query validation, and the degenerate fallbacks.

use tetrad_core::config::TestConfig;
use tetrad_core::errors::TestError;
use tetrad_core::{DataSet, Node};
use tetrad_search::independence::build_test;
use tetrad_search::{ChiSquare, ChiSquareStatistic, CramerT, DSeparationTest, FisherZ, IndependenceTest};
use test_fixtures::{chain4, collider, load_dag, simulate_discrete, simulate_linear_gaussian};

fn n(name: &str) -> Node {
    Node::measured(name)
}

// =============================================================================
// Continuous tests
// =============================================================================

#[test]
fn fisher_z_recovers_chain_independence() {
    let data = simulate_linear_gaussian(&chain4(), 2000, 42);
    let test = FisherZ::new(&data, 0.001).unwrap();
    assert_eq!(test.sample_size(), 2000);

    let dependent = test.check_independence(&n("A"), &n("B"), &[]).unwrap();
    assert!(!dependent.independent);
    assert!(dependent.p_value < 1e-6);

    assert!(test.is_independent(&n("A"), &n("C"), &[n("B")]).unwrap());
}

#[test]
fn cramer_t_agrees_with_fisher_z_on_strong_effects() {
    let data = simulate_linear_gaussian(&collider(), 2000, 3);
    let fz = FisherZ::new(&data, 0.001).unwrap();
    let ct = CramerT::new(&data, 0.001).unwrap();
    for (x, y, z) in [("A", "C", vec![]), ("B", "C", vec![]), ("A", "B", vec![n("C")])] {
        assert_eq!(
            fz.is_independent(&n(x), &n(y), &z).unwrap(),
            ct.is_independent(&n(x), &n(y), &z).unwrap(),
            "{x} vs {y}"
        );
    }
    assert!(!ct.is_independent(&n("A"), &n("B"), &[n("C")]).unwrap());
}

#[test]
fn last_p_value_tracks_latest_query() {
    let data = simulate_linear_gaussian(&chain4(), 500, 1);
    let test = FisherZ::new(&data, 0.05).unwrap();
    assert_eq!(test.last_p_value(), None);
    let result = test.check_independence(&n("B"), &n("D"), &[n("C")]).unwrap();
    assert_eq!(test.last_p_value(), Some(result.p_value));
}

#[test]
fn zero_variance_column_reports_dependence() {
    let rows: Vec<Vec<f64>> = (0..50).map(|i| vec![i as f64, 3.0, (i % 7) as f64]).collect();
    let data = DataSet::continuous(&["X", "K", "Y"], &rows).unwrap();
    let test = FisherZ::new(&data, 0.05).unwrap();
    let result = test.check_independence(&n("X"), &n("K"), &[]).unwrap();
    assert!(!result.independent);
    assert_eq!(result.p_value, 0.0);
    assert_eq!(test.last_p_value(), Some(0.0));
}

#[test]
fn too_few_samples_reports_dependence() {
    let rows = vec![vec![1.0, 2.0, 0.5], vec![2.0, 1.0, 0.1], vec![3.0, 5.0, 0.9]];
    let data = DataSet::continuous(&["X", "Y", "Z"], &rows).unwrap();
    let test = FisherZ::new(&data, 0.05).unwrap();
    let result = test.check_independence(&n("X"), &n("Y"), &[n("Z")]).unwrap();
    assert!(!result.independent);
    assert_eq!(result.p_value, 0.0);
}

// =============================================================================
// Discrete tests
// =============================================================================

#[test]
fn chi_square_detects_discrete_collider() {
    let data = simulate_discrete(&collider(), 3000, 3, 11);
    for statistic in [ChiSquareStatistic::PearsonChiSquare, ChiSquareStatistic::GSquare] {
        let test = ChiSquare::new(&data, 0.001, statistic).unwrap();
        assert!(!test.is_independent(&n("A"), &n("C"), &[]).unwrap());
        assert!(!test.is_independent(&n("B"), &n("C"), &[]).unwrap());
    }
}

#[test]
fn chi_square_with_no_degrees_of_freedom_is_independent() {
    let rows: Vec<Vec<usize>> = (0..40).map(|i| vec![i % 3, 0]).collect();
    let data = DataSet::discrete(&["X", "K"], &rows).unwrap();
    let test = ChiSquare::new(&data, 0.05, ChiSquareStatistic::PearsonChiSquare).unwrap();
    let result = test.check_independence(&n("X"), &n("K"), &[]).unwrap();
    assert!(result.independent);
    assert_eq!(result.p_value, 1.0);
    assert_eq!(test.name(), "Chi Square");
}

#[test]
fn data_kind_mismatch_is_rejected() {
    let continuous = simulate_linear_gaussian(&chain4(), 20, 0);
    assert!(matches!(
        ChiSquare::new(&continuous, 0.05, ChiSquareStatistic::GSquare),
        Err(TestError::IncompatibleData { .. })
    ));
    let discrete = simulate_discrete(&chain4(), 20, 2, 0);
    assert!(matches!(FisherZ::new(&discrete, 0.05), Err(TestError::IncompatibleData { .. })));
}

// =============================================================================
// Query validation
// =============================================================================

#[test]
fn invalid_queries_are_rejected() {
    let data = simulate_linear_gaussian(&chain4(), 100, 5);
    let test = FisherZ::new(&data, 0.05).unwrap();
    assert_eq!(
        test.check_independence(&n("A"), &n("Q"), &[]),
        Err(TestError::UnknownVariable { name: "Q".into() })
    );
    assert!(matches!(
        test.check_independence(&n("A"), &n("A"), &[]),
        Err(TestError::InvalidQuery { .. })
    ));
    assert!(matches!(
        test.check_independence(&n("A"), &n("B"), &[n("B")]),
        Err(TestError::InvalidQuery { .. })
    ));
}

#[test]
fn alpha_outside_unit_interval_is_rejected() {
    let data = simulate_linear_gaussian(&chain4(), 100, 5);
    for alpha in [0.0, -0.1, 1.5, f64::NAN] {
        assert!(matches!(FisherZ::new(&data, alpha), Err(TestError::InvalidAlpha { .. })));
    }
    assert!(FisherZ::new(&data, 1.0).is_ok());
}

#[test]
fn build_test_follows_config_kind() {
    let data = simulate_linear_gaussian(&chain4(), 100, 5);
    let config = TestConfig {
        kind: "cramer-t".into(),
        ..TestConfig::default()
    };
    let test = build_test(&data, &config).unwrap();
    assert_eq!(test.variables().len(), 4);
    assert_eq!(test.alpha(), config.alpha);

    let unknown = TestConfig {
        kind: "kci".into(),
        ..TestConfig::default()
    };
    assert!(build_test(&data, &unknown).is_err());
}

// =============================================================================
// d-separation oracle
// =============================================================================

#[test]
fn dseparation_oracle_hides_latents() {
    let dag = load_dag("dags/latent_confounded.json");
    let test = DSeparationTest::new(dag.into_graph());
    let names: Vec<&str> = test.variables().iter().map(Node::name).collect();
    assert_eq!(names, ["A", "B", "C", "D"]);
    assert!(matches!(
        test.check_independence(&n("A"), &n("L"), &[]),
        Err(TestError::UnknownVariable { .. })
    ));

    assert!(test.is_independent(&n("A"), &n("C"), &[]).unwrap());
    assert!(!test.is_independent(&n("A"), &n("C"), &[n("B")]).unwrap());
    assert!(!test.is_independent(&n("B"), &n("C"), &[]).unwrap());
    assert_eq!(test.last_p_value(), Some(0.0));
}
