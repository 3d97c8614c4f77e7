//! Integration tests for the `aquarium-train plan` and `device` commands.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_plan_shows_fixed_command() {
    let mut cmd = Command::cargo_bin("aquarium-train").unwrap();
    cmd.arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("yolo train model=yolo11n.pt data=aquarium_pretrain_dataset/data.yaml"))
        .stdout(predicate::str::contains("epochs=100 batch=4 imgsz=640"))
        .stdout(predicate::str::contains("project=runs/train name=aquarium_yolov11"))
        .stdout(predicate::str::contains("optimizer=Adam lr0=0.001 weight_decay=0.0005 augment=True"));
}

#[test]
fn test_plan_json() {
    let mut cmd = Command::cargo_bin("aquarium-train").unwrap();
    let output = cmd.args(["plan", "--json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["job"]["hyperparams"]["epochs"], 100);
    assert_eq!(value["job"]["hyperparams"]["optimizer"], "Adam");
    assert_eq!(value["job"]["checkpoint_name"], "best.pt");
    assert!(value["args"].as_array().unwrap().iter().any(|a| *a == "patience=10"));
}

#[test]
fn test_plan_applies_config_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("launch.toml");
    std::fs::write(&config, "weights = \"yolo11s.pt\"\n\n[hyperparams]\nepochs = 3\n").unwrap();

    let mut cmd = Command::cargo_bin("aquarium-train").unwrap();
    cmd.arg("--config")
        .arg(&config)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("model=yolo11s.pt"))
        .stdout(predicate::str::contains("epochs=3 batch=4"));
}

#[test]
fn test_device_json() {
    let mut cmd = Command::cargo_bin("aquarium-train").unwrap();
    let output = cmd.args(["device", "--json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let device = value["device"].as_str().unwrap();
    assert!(device == "cuda" || device == "cpu");
    assert_eq!(value["accelerator"]["available"], device == "cuda");
}
