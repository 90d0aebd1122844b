//! Integration tests for the CLI application
//!
//! These tests drive the compiled binary against model artifacts written
//! to a temporary directory.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

const SVM_MODEL: &str = r#"{
  "model": {
    "kind": "ovr_svm",
    "gamma": 0.1,
    "classes": [
      {"class_id": 0, "support_vectors": [[8, 2, 2, 8, 1]],
       "dual_coefficients": [1.0], "support_vector_labels": [1.0]},
      {"class_id": 1, "support_vectors": [[5, 5, 5, 5, 5]],
       "dual_coefficients": [1.0], "support_vector_labels": [1.0]},
      {"class_id": 2, "support_vectors": [[1, 9, 9, 1, 9]],
       "dual_coefficients": [1.0], "support_vector_labels": [1.0]}
    ]
  },
  "metadata": {"library_version": "0.1.0", "created_at": "2024-01-01T00:00:00+00:00"}
}"#;

const KNN_MODEL: &str = r#"{
  "model": {
    "kind": "knn",
    "k": 1,
    "samples": [[8, 2, 2, 8, 1], [5, 5, 5, 5, 5], [1, 9, 9, 1, 9]],
    "labels": [0, 1, 2]
  }
}"#;

const FOREST_MODEL: &str = r#"{
  "model": {
    "kind": "random_forest",
    "n_features": 5,
    "trees": [
      {"nodes": [
        {"type": "split", "feature": 1, "threshold": 3.5, "left": 1, "right": 2},
        {"type": "leaf", "class_id": 0},
        {"type": "split", "feature": 1, "threshold": 6.5, "left": 3, "right": 4},
        {"type": "leaf", "class_id": 1},
        {"type": "leaf", "class_id": 2}
      ]}
    ]
  }
}"#;

/// Model directory with all three artifacts
fn model_dir() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join("svm_model.json"), SVM_MODEL).expect("write svm");
    fs::write(dir.path().join("knn_model.json"), KNN_MODEL).expect("write knn");
    fs::write(dir.path().join("rf_model.json"), FOREST_MODEL).expect("write forest");
    dir
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stress-svm"))
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn predict_args<'a>(dir: &'a Path, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec!["predict", "--model-dir", dir.to_str().expect("utf-8 path")];
    args.extend_from_slice(extra);
    args
}

#[test]
fn test_cli_help() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("predict"));
    assert!(stdout.contains("batch"));
    assert!(stdout.contains("info"));
}

#[test]
fn test_cli_predict_each_backend() {
    let dir = model_dir();
    let overwhelmed = [
        "--self-esteem",
        "1",
        "--depression",
        "9.5",
        "--anxiety",
        "9",
        "--sleep-quality",
        "1.5",
        "--bullying",
        "9",
    ];

    for classifier in ["svm", "random-forest", "knn"] {
        let mut extra = vec!["--classifier", classifier];
        extra.extend_from_slice(&overwhelmed);
        let output = run_cli(&predict_args(dir.path(), &extra));

        assert!(
            output.status.success(),
            "{classifier} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(
            stdout.contains("Predicted stress level: 2 (High stress level"),
            "{classifier}: {stdout}"
        );
    }
}

#[test]
fn test_cli_predict_defaults_and_advice() {
    let dir = model_dir();
    let output = run_cli(&predict_args(dir.path(), &["--advice"]));
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Predicted stress level: 1"));
    assert!(stdout.contains("Suggestions:"));
}

#[test]
fn test_cli_predict_rejects_out_of_range_input() {
    let dir = model_dir();
    let output = run_cli(&predict_args(dir.path(), &["--depression", "12"]));
    assert!(!output.status.success());

    let output = run_cli(&predict_args(dir.path(), &["--bullying", "-1"]));
    assert!(!output.status.success());
}

#[test]
fn test_cli_predict_missing_model() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_cli(&predict_args(dir.path(), &[]));
    assert!(!output.status.success());
}

#[test]
fn test_cli_predict_invalid_gamma() {
    let dir = model_dir();
    let output = run_cli(&predict_args(dir.path(), &["--gamma", "0"]));
    assert!(!output.status.success());
}

#[test]
fn test_cli_batch_with_evaluation() {
    let dir = model_dir();
    let mut data = NamedTempFile::with_suffix(".csv").expect("Failed to create temp file");
    writeln!(
        data,
        "self_esteem,depression,anxiety_level,sleep_quality,bullying,stress_level"
    )
    .expect("Failed to write");
    writeln!(data, "8.5,1.5,2,8.5,0.5,0").expect("Failed to write");
    writeln!(data, "5,5.5,5,4.5,5,1").expect("Failed to write");
    writeln!(data, "1,9.5,9,1.5,9,2").expect("Failed to write");
    writeln!(data, "1,9.5,9,1.5,9,0").expect("Failed to write");
    data.flush().expect("Failed to flush");

    let output = run_cli(&[
        "batch",
        "--model-dir",
        dir.path().to_str().expect("utf-8 path"),
        "--data",
        data.path().to_str().expect("utf-8 path"),
        "--evaluate",
    ]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# Predictions for 4 samples"));
    assert!(stdout.contains("0 0\n1 1\n2 2\n3 2\n"));
    assert!(stdout.contains("Accuracy: 75.00%"));
}

#[test]
fn test_cli_batch_output_file() {
    let dir = model_dir();
    let mut data = NamedTempFile::with_suffix(".csv").expect("Failed to create temp file");
    writeln!(data, "8,2,2,8,1").expect("Failed to write");
    writeln!(data, "1,9,9,1,9").expect("Failed to write");
    data.flush().expect("Failed to flush");

    let out_dir = TempDir::new().expect("Failed to create temp dir");
    let out_path = out_dir.path().join("predictions.txt");

    let output = run_cli(&[
        "batch",
        "--model-dir",
        dir.path().to_str().expect("utf-8 path"),
        "--classifier",
        "knn",
        "--data",
        data.path().to_str().expect("utf-8 path"),
        "--output",
        out_path.to_str().expect("utf-8 path"),
    ]);
    assert!(output.status.success());

    let written = fs::read_to_string(&out_path).expect("predictions written");
    assert!(written.contains("0 0"));
    assert!(written.contains("1 2"));
}

#[test]
fn test_cli_batch_evaluate_without_labels_fails() {
    let dir = model_dir();
    let mut data = NamedTempFile::with_suffix(".csv").expect("Failed to create temp file");
    writeln!(data, "8,2,2,8,1").expect("Failed to write");
    data.flush().expect("Failed to flush");

    let output = run_cli(&[
        "batch",
        "--model-dir",
        dir.path().to_str().expect("utf-8 path"),
        "--data",
        data.path().to_str().expect("utf-8 path"),
        "--evaluate",
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_info() {
    let dir = model_dir();
    let output = run_cli(&[
        "info",
        dir.path().join("svm_model.json").to_str().expect("utf-8 path"),
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Kind: svm"));
    assert!(stdout.contains("Classes: 3"));
    assert!(stdout.contains("Created: 2024-01-01"));
}

#[test]
fn test_cli_describe() {
    let output = run_cli(&["describe"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("self_esteem"));
    assert!(stdout.contains("2 -> High stress level"));
}
