use crate::device::Device;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Pretrained weights the aquarium detector is fine-tuned from.
pub const DEFAULT_WEIGHTS: &str = "yolo11n.pt";
/// Dataset descriptor consumed by the toolkit, relative to the working directory.
pub const DEFAULT_DATASET: &str = "aquarium_pretrain_dataset/data.yaml";
pub const DEFAULT_PROJECT: &str = "runs/train";
pub const DEFAULT_RUN_NAME: &str = "aquarium_yolov11";
/// File the best checkpoint is copied to once training finishes.
pub const DEFAULT_CHECKPOINT_NAME: &str = "best.pt";

/// Identifier for a training job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainingJobId(pub String);

impl TrainingJobId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for TrainingJobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TrainingJobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Pretrained weights identifier (a local path or an official release name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub weights: String,
}

impl ModelSpec {
    pub fn new(weights: impl Into<String>) -> Self {
        Self { weights: weights.into() }
    }
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHTS)
    }
}

impl std::fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.weights.fmt(f)
    }
}

/// Dataset descriptor file. Its contents belong to the toolkit and are never parsed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub path: PathBuf,
}

impl Default for DatasetDescriptor {
    fn default() -> Self {
        Self { path: PathBuf::from(DEFAULT_DATASET) }
    }
}

/// Optimizer names as the toolkit spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Optimizer {
    #[serde(rename = "SGD")]
    Sgd,
    Adam,
    AdamW,
    NAdam,
    RAdam,
    RMSProp,
    #[serde(rename = "auto")]
    Auto,
}

impl Optimizer {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sgd => "SGD",
            Self::Adam => "Adam",
            Self::AdamW => "AdamW",
            Self::NAdam => "NAdam",
            Self::RAdam => "RAdam",
            Self::RMSProp => "RMSProp",
            Self::Auto => "auto",
        }
    }
}

impl std::fmt::Display for Optimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hyperparameters handed unchanged to the delegated training call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingHyperParams {
    pub epochs: u32,
    pub batch: u32,
    pub imgsz: u32,
    pub optimizer: Optimizer,
    pub lr0: f64,
    pub weight_decay: f64,
    /// Epochs without improvement before the toolkit stops early.
    pub patience: u32,
    /// Checkpoint cadence in epochs.
    pub save_period: u32,
    pub workers: u32,
    pub augment: bool,
    /// Cache decoded images in RAM.
    pub cache: bool,
}

impl Default for TrainingHyperParams {
    fn default() -> Self {
        Self {
            epochs: 100,
            batch: 4,
            imgsz: 640,
            optimizer: Optimizer::Adam,
            lr0: 0.001,
            weight_decay: 0.0005,
            patience: 10,
            save_period: 10,
            workers: 4,
            augment: true,
            cache: false,
        }
    }
}

/// Where the toolkit organizes a run's artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutput {
    pub project: PathBuf,
    pub name: String,
    pub save: bool,
}

impl Default for RunOutput {
    fn default() -> Self {
        Self { project: PathBuf::from(DEFAULT_PROJECT), name: DEFAULT_RUN_NAME.to_string(), save: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingJobSpec {
    pub job_id: TrainingJobId,
    pub created_at: DateTime<Utc>,
    pub model: ModelSpec,
    pub dataset: DatasetDescriptor,
    pub hyperparams: TrainingHyperParams,
    pub output: RunOutput,
    pub checkpoint_name: PathBuf,
}

impl TrainingJobSpec {
    #[must_use]
    pub fn new(model: ModelSpec, dataset: DatasetDescriptor) -> Self {
        Self {
            job_id: TrainingJobId::new(),
            created_at: Utc::now(),
            model,
            dataset,
            hyperparams: TrainingHyperParams::default(),
            output: RunOutput::default(),
            checkpoint_name: PathBuf::from(DEFAULT_CHECKPOINT_NAME),
        }
    }
}

impl Default for TrainingJobSpec {
    fn default() -> Self {
        Self::new(ModelSpec::default(), DatasetDescriptor::default())
    }
}

/// What the delegated call reports back once it returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRun {
    pub run_dir: PathBuf,
    pub device: Device,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_job_uses_fixed_values() {
        let job = TrainingJobSpec::default();
        assert_eq!(job.model.weights, "yolo11n.pt");
        assert_eq!(job.dataset.path, PathBuf::from("aquarium_pretrain_dataset/data.yaml"));
        assert_eq!(job.output.project, PathBuf::from("runs/train"));
        assert_eq!(job.output.name, "aquarium_yolov11");
        assert!(job.output.save);
        assert_eq!(job.checkpoint_name, PathBuf::from("best.pt"));

        let hp = &job.hyperparams;
        assert_eq!(hp.epochs, 100);
        assert_eq!(hp.batch, 4);
        assert_eq!(hp.imgsz, 640);
        assert_eq!(hp.optimizer, Optimizer::Adam);
        assert!((hp.lr0 - 0.001).abs() < f64::EPSILON);
        assert!((hp.weight_decay - 0.0005).abs() < f64::EPSILON);
        assert_eq!(hp.patience, 10);
        assert_eq!(hp.save_period, 10);
        assert_eq!(hp.workers, 4);
        assert!(hp.augment);
        assert!(!hp.cache);
    }

    #[test]
    fn test_job_ids_are_unique() {
        assert_ne!(TrainingJobSpec::default().job_id, TrainingJobSpec::default().job_id);
    }

    #[test]
    fn test_optimizer_serde_matches_toolkit_names() {
        assert_eq!(serde_json::to_string(&Optimizer::Sgd).unwrap(), "\"SGD\"");
        assert_eq!(serde_json::to_string(&Optimizer::Adam).unwrap(), "\"Adam\"");
        let parsed: Optimizer = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(parsed, Optimizer::Auto);
        assert_eq!(Optimizer::RMSProp.to_string(), "RMSProp");
    }
}
