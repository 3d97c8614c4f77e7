use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn aquarium_train() -> Command {
    Command::cargo_bin("aquarium-train").unwrap()
}

#[test]
fn test_version() {
    aquarium_train().arg("--version").assert().success().stdout(predicate::str::contains("aquarium-train 0.1.0"));
}

#[test]
fn test_help() {
    aquarium_train()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aquarium detector fine-tuning launcher"));
}

#[test]
fn test_missing_toolkit_aborts_cleanly() {
    let temp_dir = TempDir::new().unwrap();

    aquarium_train()
        .current_dir(temp_dir.path())
        .arg("--yolo")
        .arg("/nonexistent/bin/yolo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Using device:"))
        .stdout(predicate::str::contains("Attempting to load YOLOv11 model..."))
        .stdout(predicate::str::contains("Error loading model:"))
        .stdout(predicate::str::contains("Model loading failed:"))
        .stdout(predicate::str::contains("Training completed").not());

    assert!(!temp_dir.path().join("best.pt").exists());
    assert!(!temp_dir.path().join("runs").exists());
}

#[cfg(unix)]
#[test]
fn test_failing_toolkit_version_is_a_model_load_failure() {
    let temp_dir = TempDir::new().unwrap();

    aquarium_train()
        .current_dir(temp_dir.path())
        .args(["--yolo", "false", "train"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error loading model:"));
}

#[cfg(unix)]
#[test]
fn test_training_without_run_output_fails() {
    let temp_dir = TempDir::new().unwrap();

    // `true` accepts every invocation but never writes a run directory.
    aquarium_train()
        .current_dir(temp_dir.path())
        .args(["--yolo", "true"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Model loaded successfully."))
        .stderr(predicate::str::contains("Training job failed"));

    assert!(!temp_dir.path().join("best.pt").exists());
}

#[test]
fn test_missing_config_file_fails() {
    let temp_dir = TempDir::new().unwrap();

    aquarium_train()
        .current_dir(temp_dir.path())
        .args(["--config", "missing.toml", "plan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}
