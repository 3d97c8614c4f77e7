//! Training-job launcher.
//!
//! Runs the fixed sequence: select a device, load the model, train once,
//! save the best checkpoint. Only the model load is guarded; a failure there
//! aborts the job without touching the training call. Failures during
//! training or persistence propagate to the caller.

use crate::artifacts::{
    collect_optional, make_artifact, read_final_metrics, ArtifactKind, TrainingManifest, TrainingMetrics,
};
use crate::device::{select_device, Device, DeviceProbe};
use crate::error::TrainingResult;
use crate::job::TrainingJobSpec;
use crate::layout::RunLayout;
use crate::model::ModelLoader;
use crate::progress::{ProgressEvent, ProgressSink};
use chrono::Utc;
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct LaunchReport {
    pub device: Device,
    pub run_dir: PathBuf,
    pub checkpoint: PathBuf,
    /// `None` when the manifest could not be written; the checkpoint is still saved.
    pub manifest_path: Option<PathBuf>,
    pub metrics: TrainingMetrics,
}

#[derive(Debug, Clone)]
pub enum LaunchOutcome {
    Completed(LaunchReport),
    /// The model could not be loaded; nothing was trained.
    Aborted { reason: String },
}

impl LaunchOutcome {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

pub struct Launcher<'a> {
    probe: &'a dyn DeviceProbe,
    loader: &'a dyn ModelLoader,
    progress: &'a dyn ProgressSink,
}

impl<'a> Launcher<'a> {
    #[must_use]
    pub fn new(probe: &'a dyn DeviceProbe, loader: &'a dyn ModelLoader, progress: &'a dyn ProgressSink) -> Self {
        Self { probe, loader, progress }
    }

    pub async fn launch(&self, job: &TrainingJobSpec) -> TrainingResult<LaunchOutcome> {
        let job_id = job.job_id.clone();

        let device = select_device(self.probe);
        info!(job_id = %job_id, device = %device, "device selected");
        self.progress.on_event(ProgressEvent::DeviceSelected { job_id: job_id.clone(), device });

        self.progress.on_event(ProgressEvent::ModelLoading {
            job_id: job_id.clone(),
            weights: job.model.weights.clone(),
        });
        let mut model = match self.loader.load(&job.model).await {
            Ok(model) => model,
            Err(e) => {
                let reason = e.to_string();
                self.progress.on_event(ProgressEvent::ModelLoadFailed {
                    job_id: job_id.clone(),
                    error: reason.clone(),
                });
                error!(job_id = %job_id, loader = self.loader.id(), "Model loading failed: {reason}");
                return Ok(LaunchOutcome::Aborted { reason });
            }
        };
        info!(job_id = %job_id, weights = %model.spec(), "model loaded");
        self.progress.on_event(ProgressEvent::ModelLoaded {
            job_id: job_id.clone(),
            weights: model.spec().weights.clone(),
        });

        let run = model.train(job, device, self.progress).await?;
        self.progress.on_event(ProgressEvent::TrainingFinished {
            job_id: job_id.clone(),
            run_dir: run.run_dir.clone(),
        });

        let checkpoint = model.save(&job.checkpoint_name).await?;
        info!(job_id = %job_id, checkpoint = %checkpoint.display(), "best checkpoint saved");

        self.progress.on_event(ProgressEvent::CheckpointSaved { job_id: job_id.clone(), path: checkpoint.clone() });

        let metrics = read_final_metrics(&RunLayout::results_csv(&run.run_dir)).unwrap_or_else(|e| {
            warn!(job_id = %job_id, error = %e, "could not read final metrics");
            TrainingMetrics::default()
        });
        let manifest_path = RunLayout::manifest_path(&run.run_dir);
        let written = build_manifest(job, device, &run.run_dir, &checkpoint, metrics.clone())
            .and_then(|manifest| manifest.write(&manifest_path));
        let manifest_path = match written {
            Ok(()) => Some(manifest_path),
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "training manifest not written");
                None
            }
        };

        Ok(LaunchOutcome::Completed(LaunchReport {
            device,
            run_dir: run.run_dir,
            checkpoint,
            manifest_path,
            metrics,
        }))
    }
}

fn build_manifest(
    job: &TrainingJobSpec,
    device: Device,
    run_dir: &std::path::Path,
    checkpoint: &std::path::Path,
    metrics: TrainingMetrics,
) -> TrainingResult<TrainingManifest> {
    let mut artifacts = vec![make_artifact(ArtifactKind::ExportedCheckpoint, checkpoint.to_path_buf())?];
    for (kind, path) in [
        (ArtifactKind::BestCheckpoint, RunLayout::best_weights(run_dir)),
        (ArtifactKind::LastCheckpoint, RunLayout::last_weights(run_dir)),
        (ArtifactKind::Metrics, RunLayout::results_csv(run_dir)),
        (ArtifactKind::Config, RunLayout::args_yaml(run_dir)),
    ] {
        artifacts.extend(collect_optional(kind, path)?);
    }

    Ok(TrainingManifest {
        job_id: job.job_id.clone(),
        created_at: job.created_at,
        finished_at: Utc::now(),
        model: job.model.clone(),
        dataset: job.dataset.path.clone(),
        device,
        hyperparams: job.hyperparams.clone(),
        run_dir: run_dir.to_path_buf(),
        metrics,
        artifacts,
    })
}
