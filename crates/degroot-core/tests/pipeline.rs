//! End-to-end tests: configuration file to report.

use std::fs;

use degroot_core::{
    build_report, default_config_toml, step_trace, BeliefBounds, DegrootConfig, ModelError,
    Scenario,
};
use degroot_events::{BeliefSnapshot, RunReport};
use tempfile::tempdir;

fn run_config(config: &DegrootConfig) -> RunReport {
    let mut model = config.build_model().expect("Failed to build model");
    let run = model.iterate_with(&config.iteration).expect("Failed to iterate");
    build_report(&model, &run, &config.iteration, &config.display).expect("Failed to build report")
}

#[test]
fn test_default_config_file_runs() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("degroot.toml");
    fs::write(&path, default_config_toml()).unwrap();

    let config = DegrootConfig::from_file(&path).unwrap();
    let report = run_config(&config);

    assert!(report.converged);
    assert_eq!(report.agents, 3);
    assert_eq!(report.status_line(), format!("Convergence reached at step {}", report.steps));
}

#[test]
fn test_missing_config_file() {
    let dir = tempdir().unwrap();

    let result = DegrootConfig::from_file(&dir.path().join("absent.toml"));

    assert!(result.is_err());
}

#[test]
fn test_custom_scenario_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("swap.toml");
    fs::write(
        &path,
        r#"
            [scenario]
            beliefs = [1.0, 0.0]
            trust = [[0.0, 1.0], [1.0, 0.0]]

            [iteration]
            max_steps = 12
        "#,
    )
    .unwrap();

    let config = DegrootConfig::from_file(&path).unwrap();
    let report = run_config(&config);

    assert!(!report.converged);
    assert_eq!(report.history.len(), 12);
    assert_eq!(report.last_frame_index(), Some(11));
    assert_eq!(report.frame(11).unwrap().beliefs, vec![0.0, 1.0]);
}

#[test]
fn test_invalid_scenario_surfaces_model_error() {
    let config = DegrootConfig::from_str(
        r#"
            [scenario]
            beliefs = [0.5, 0.5]
            trust = [[0.5, 0.4], [0.0, 1.0]]
        "#,
    )
    .unwrap();

    assert!(matches!(
        config.build_model(),
        Err(ModelError::RowSum { row: 0, .. })
    ));
}

#[test]
fn test_open_bounds_reject_reference_beliefs() {
    let mut config = DegrootConfig::default();
    config.model.belief_bounds = BeliefBounds::Open;

    assert!(matches!(
        config.build_model(),
        Err(ModelError::Range { index: 0, .. })
    ));
}

#[test]
fn test_report_output_parses_back() {
    let report = run_config(&DegrootConfig::default());

    let parsed = RunReport::from_json(&report.to_json().unwrap()).unwrap();
    assert_eq!(parsed, report);

    let frames: Vec<BeliefSnapshot> = report
        .history_jsonl()
        .unwrap()
        .lines()
        .map(|line| BeliefSnapshot::from_jsonl(line).unwrap())
        .collect();
    assert_eq!(frames, report.history);
}

#[test]
fn test_display_section_controls_step_output() {
    let config = DegrootConfig::from_str(
        r#"
            [display]
            text_max_denominator = 3
        "#,
    )
    .unwrap();
    let mut coarse = config.build_model().unwrap();
    let mut fine = DegrootConfig::default().build_model().unwrap();

    let coarse_lines = step_trace(&mut coarse, 3, &config.display).unwrap();
    let fine_lines = step_trace(&mut fine, 3, &DegrootConfig::default().display).unwrap();

    assert_eq!(coarse_lines[3], "[Step    3] 1/2 1/3 1/3");
    assert_eq!(fine_lines[3], "[Step    3] 1/2 1/4 1/4");
    assert_eq!(coarse.beliefs(), fine.beliefs());
}

/// Same configuration, same report.
#[test]
fn test_runs_are_deterministic() {
    let mut config = DegrootConfig::default();
    config.scenario = Scenario::self_weighted_cycle();

    let first = run_config(&config);
    let second = run_config(&config);

    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}
