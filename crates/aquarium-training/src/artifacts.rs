use crate::device::Device;
use crate::error::{TrainingError, TrainingResult};
use crate::job::{ModelSpec, TrainingHyperParams, TrainingJobId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    BestCheckpoint,
    LastCheckpoint,
    /// The copy of the best checkpoint written at the end of the job.
    ExportedCheckpoint,
    Metrics,
    Config,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub sha256: String,
}

/// Final-epoch metrics as reported by the toolkit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TrainingMetrics {
    pub epochs_completed: Option<u32>,
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub map50: Option<f64>,
    pub map50_95: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingManifest {
    pub job_id: TrainingJobId,
    pub created_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub model: ModelSpec,
    pub dataset: PathBuf,
    pub device: Device,
    pub hyperparams: TrainingHyperParams,
    pub run_dir: PathBuf,
    #[serde(default)]
    pub metrics: TrainingMetrics,
    pub artifacts: Vec<TrainingArtifact>,
}

impl TrainingManifest {
    pub fn write(&self, path: &Path) -> TrainingResult<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn read(path: &Path) -> TrainingResult<Self> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

pub fn sha256_file(path: &Path) -> TrainingResult<String> {
    let bytes = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

pub fn make_artifact(kind: ArtifactKind, path: PathBuf) -> TrainingResult<TrainingArtifact> {
    if !path.exists() {
        return Err(TrainingError::Artifact(format!(
            "artifact path does not exist: {}",
            path.display()
        )));
    }

    let hash = sha256_file(&path)?;
    Ok(TrainingArtifact { kind, path, sha256: hash })
}

/// Like [`make_artifact`], but files the toolkit did not write are skipped.
pub fn collect_optional(kind: ArtifactKind, path: PathBuf) -> TrainingResult<Option<TrainingArtifact>> {
    if path.exists() {
        make_artifact(kind, path).map(Some)
    } else {
        Ok(None)
    }
}

/// Read the last row of the toolkit's per-epoch `results.csv`.
///
/// Older toolkit releases pad header names with spaces, so fields are trimmed.
/// A missing file yields empty metrics. A short trailing row (an epoch still
/// being written) is skipped in favour of the last complete one.
pub fn read_final_metrics(results_csv: &Path) -> TrainingResult<TrainingMetrics> {
    if !results_csv.exists() {
        return Ok(TrainingMetrics::default());
    }

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).flexible(true).from_path(results_csv)?;
    let headers = reader.headers()?.clone();

    let mut last = None;
    for record in reader.records() {
        let record = record?;
        if record.len() == headers.len() {
            last = Some(record);
        }
    }
    let Some(row) = last else {
        return Ok(TrainingMetrics::default());
    };

    let field = |name: &str| -> Option<f64> {
        let idx = headers.iter().position(|h| h == name)?;
        row.get(idx)?.parse::<f64>().ok()
    };

    Ok(TrainingMetrics {
        epochs_completed: field("epoch").map(|e| e as u32),
        precision: field("metrics/precision(B)"),
        recall: field("metrics/recall(B)"),
        map50: field("metrics/mAP50(B)"),
        map50_95: field("metrics/mAP50-95(B)"),
    })
}
