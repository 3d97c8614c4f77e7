//! Launch configuration file support.
//!
//! A config file is only read when explicitly requested. Every field is
//! optional and overlays the fixed defaults of [`TrainingJobSpec`].

use crate::job::{Optimizer, TrainingJobSpec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Launch configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaunchConfig {
    /// Pretrained weights identifier
    #[serde(default)]
    pub weights: Option<String>,

    /// Dataset descriptor path
    #[serde(default)]
    pub data: Option<PathBuf>,

    /// Directory the toolkit writes runs under
    #[serde(default)]
    pub project: Option<PathBuf>,

    /// Run name inside the project directory
    #[serde(default)]
    pub name: Option<String>,

    /// File the best checkpoint is copied to
    #[serde(default)]
    pub checkpoint_name: Option<PathBuf>,

    /// Log level
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub hyperparams: HyperParamOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HyperParamOverrides {
    pub epochs: Option<u32>,
    pub batch: Option<u32>,
    pub imgsz: Option<u32>,
    pub optimizer: Option<Optimizer>,
    pub lr0: Option<f64>,
    pub weight_decay: Option<f64>,
    pub patience: Option<u32>,
    pub save_period: Option<u32>,
    pub workers: Option<u32>,
    pub augment: Option<bool>,
    pub cache: Option<bool>,
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(String),

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl LaunchConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
    }

    /// Overlay the fields set in this config onto `job`.
    pub fn apply_to(&self, job: &mut TrainingJobSpec) {
        if let Some(ref weights) = self.weights {
            job.model.weights = weights.clone();
        }
        if let Some(ref data) = self.data {
            job.dataset.path = data.clone();
        }
        if let Some(ref project) = self.project {
            job.output.project = project.clone();
        }
        if let Some(ref name) = self.name {
            job.output.name = name.clone();
        }
        if let Some(ref checkpoint_name) = self.checkpoint_name {
            job.checkpoint_name = checkpoint_name.clone();
        }

        let hp = &mut job.hyperparams;
        let o = &self.hyperparams;
        if let Some(v) = o.epochs {
            hp.epochs = v;
        }
        if let Some(v) = o.batch {
            hp.batch = v;
        }
        if let Some(v) = o.imgsz {
            hp.imgsz = v;
        }
        if let Some(v) = o.optimizer {
            hp.optimizer = v;
        }
        if let Some(v) = o.lr0 {
            hp.lr0 = v;
        }
        if let Some(v) = o.weight_decay {
            hp.weight_decay = v;
        }
        if let Some(v) = o.patience {
            hp.patience = v;
        }
        if let Some(v) = o.save_period {
            hp.save_period = v;
        }
        if let Some(v) = o.workers {
            hp.workers = v;
        }
        if let Some(v) = o.augment {
            hp.augment = v;
        }
        if let Some(v) = o.cache {
            hp.cache = v;
        }
    }

    /// Build a job spec from the fixed defaults plus this config.
    #[must_use]
    pub fn job_spec(&self) -> TrainingJobSpec {
        let mut job = TrainingJobSpec::default();
        self.apply_to(&mut job);
        job
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::TrainingHyperParams;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_keeps_defaults() {
        let job = LaunchConfig::default().job_spec();
        assert_eq!(job.hyperparams, TrainingHyperParams::default());
        assert_eq!(job.model.weights, "yolo11n.pt");
        assert_eq!(job.checkpoint_name, PathBuf::from("best.pt"));
    }

    #[test]
    fn test_load_and_apply_overrides() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("launch.toml");
        std::fs::write(
            &path,
            r#"
weights = "yolo11s.pt"
name = "aquarium_small"
log_level = "debug"

[hyperparams]
epochs = 5
optimizer = "SGD"
cache = true
"#,
        )
        .unwrap();

        let config = LaunchConfig::load_from_file(&path).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));

        let job = config.job_spec();
        assert_eq!(job.model.weights, "yolo11s.pt");
        assert_eq!(job.output.name, "aquarium_small");
        assert_eq!(job.hyperparams.epochs, 5);
        assert_eq!(job.hyperparams.optimizer, Optimizer::Sgd);
        assert!(job.hyperparams.cache);
        // untouched fields keep the fixed values
        assert_eq!(job.hyperparams.batch, 4);
        assert_eq!(job.hyperparams.workers, 4);
        assert_eq!(job.output.project, PathBuf::from("runs/train"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = LaunchConfig::load_from_file(&temp.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("launch.toml");
        std::fs::write(&path, "[hyperparams]\nepoch = 3\n").unwrap();
        let err = LaunchConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
