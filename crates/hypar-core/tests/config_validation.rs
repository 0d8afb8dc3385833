use hypar_core::{
    HyparError, InitialAlgorithm, Mode, Objective, PartitionConfig, RefineAlgorithm,
};

fn code(err: HyparError) -> String {
    err.info().code.clone()
}

#[test]
fn defaults_are_valid() {
    let config = PartitionConfig::with_k(2);
    assert!(config.validate().is_ok());
    assert_eq!(config.epsilon, 0.03);
    assert_eq!(config.coarsening.contraction_limit_multiplier, 160);
    assert_eq!(config.coarsening.max_allowed_weight_multiplier, 3.25);
    assert_eq!(config.coarsening.large_edge_threshold, 1000);
    assert_eq!(config.initial_partitioning.runs, 20);
    assert_eq!(config.refinement.max_passes, 3);
    assert_eq!(config.objective, Objective::Connectivity);
    assert_eq!(config.mode, Mode::DirectKway);
}

#[test]
fn rejects_bad_k() {
    let config = PartitionConfig::with_k(1);
    assert_eq!(code(config.validate().unwrap_err()), "bad-k");
}

#[test]
fn rejects_negative_epsilon() {
    let mut config = PartitionConfig::with_k(4);
    config.epsilon = -0.1;
    assert_eq!(code(config.validate().unwrap_err()), "bad-epsilon");

    config.epsilon = f64::NAN;
    assert_eq!(code(config.validate().unwrap_err()), "bad-epsilon");

    // perfect balance is allowed
    config.epsilon = 0.0;
    assert!(config.validate().is_ok());
}

#[test]
fn rejects_vcycles_with_recursive_bisection() {
    let mut config = PartitionConfig::with_k(4);
    config.mode = Mode::RecursiveBisection;
    config.v_cycles = 1;
    assert_eq!(code(config.validate().unwrap_err()), "vcycle-mode-conflict");
}

#[test]
fn rejects_twoway_fm_for_large_k() {
    let mut config = PartitionConfig::with_k(4);
    config.refinement.algorithm = RefineAlgorithm::TwowayFm;
    assert_eq!(
        code(config.validate().unwrap_err()),
        "twoway-needs-bisection"
    );

    config.k = 2;
    assert!(config.validate().is_ok());
}

#[test]
fn rejects_degenerate_phase_parameters() {
    let mut config = PartitionConfig::with_k(2);
    config.initial_partitioning.runs = 0;
    assert_eq!(code(config.validate().unwrap_err()), "bad-initial-runs");

    let mut config = PartitionConfig::with_k(2);
    config.refinement.max_passes = 0;
    assert_eq!(code(config.validate().unwrap_err()), "bad-max-passes");

    let mut config = PartitionConfig::with_k(2);
    config.coarsening.max_allowed_weight_multiplier = 0.0;
    assert_eq!(code(config.validate().unwrap_err()), "bad-weight-multiplier");
}

#[test]
fn yaml_with_partial_fields_fills_defaults() {
    let yaml = "k: 8\nepsilon: 0.1\nmode: recursive-bisection\nobjective: cut\n";
    let config: PartitionConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.k, 8);
    assert_eq!(config.epsilon, 0.1);
    assert_eq!(config.mode, Mode::RecursiveBisection);
    assert_eq!(config.objective, Objective::Cut);
    assert_eq!(config.seed, 0);
    assert_eq!(config.initial_partitioning.algorithm, InitialAlgorithm::Pool);
    assert_eq!(config.refinement.stagnation_fraction, 1.0);
    assert!(config.validate().is_ok());
}

#[test]
fn yaml_reads_nested_sections() {
    let yaml = "\
k: 4
coarsening:
  contraction_limit_multiplier: 100
initial_partitioning:
  runs: 5
refinement:
  algorithm: kway-fm
  max_passes: 2
";
    let config: PartitionConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.coarsening.contraction_limit_multiplier, 100);
    assert_eq!(config.coarsening.large_edge_threshold, 1000);
    assert_eq!(config.initial_partitioning.runs, 5);
    assert_eq!(config.refinement.max_passes, 2);
    assert_eq!(config.refinement.algorithm, RefineAlgorithm::KwayFm);
}

#[test]
fn yaml_serialization_roundtrips() {
    let mut config = PartitionConfig::with_k(4);
    config.v_cycles = 3;
    config.quiet_mode = true;
    let text = serde_yaml::to_string(&config).unwrap();
    let back: PartitionConfig = serde_yaml::from_str(&text).unwrap();
    assert_eq!(back, config);
}
