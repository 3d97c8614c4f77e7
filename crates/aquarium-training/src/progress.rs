use crate::device::Device;
use crate::job::TrainingJobId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    DeviceSelected { job_id: TrainingJobId, device: Device },
    ModelLoading { job_id: TrainingJobId, weights: String },
    ModelLoaded { job_id: TrainingJobId, weights: String },
    ModelLoadFailed { job_id: TrainingJobId, error: String },
    TrainingStarted { job_id: TrainingJobId, command: String },
    TrainingFinished { job_id: TrainingJobId, run_dir: PathBuf },
    CheckpointSaved { job_id: TrainingJobId, path: PathBuf },
}

pub trait ProgressSink: Send + Sync {
    fn on_event(&self, event: ProgressEvent);
}

/// Human-readable console channel.
#[derive(Debug, Default)]
pub struct StdoutProgressSink;

impl ProgressSink for StdoutProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::DeviceSelected { device, .. } => println!("Using device: {device}"),
            ProgressEvent::ModelLoading { .. } => println!("Attempting to load YOLOv11 model..."),
            ProgressEvent::ModelLoaded { .. } => println!("Model loaded successfully."),
            ProgressEvent::ModelLoadFailed { error, .. } => println!("Error loading model: {error}"),
            ProgressEvent::TrainingStarted { job_id, command } => println!("[train:{job_id}] {command}"),
            ProgressEvent::TrainingFinished { job_id, run_dir } => {
                println!("[train:{job_id}] run artifacts in {}", run_dir.display());
            }
            ProgressEvent::CheckpointSaved { path, .. } => {
                println!("Training completed. Best model saved as '{}'", path.display());
            }
        }
    }
}

/// Drops every event. Useful when only the returned report matters.
#[derive(Debug, Default)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn on_event(&self, _event: ProgressEvent) {}
}
