//! Ultralytics toolkit backend.
//!
//! Drives the `yolo` command-line program: `yolo train key=value ...`.

use crate::device::Device;
use crate::error::{TrainingError, TrainingResult};
use crate::job::{ModelSpec, TrainingJobSpec, TrainingRun};
use crate::layout::RunLayout;
use crate::model::{ModelHandle, ModelLoader};
use crate::progress::{ProgressEvent, ProgressSink};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

pub const DEFAULT_PROGRAM: &str = "yolo";

/// Loads models by checking that the toolkit runs and the weights resolve.
#[derive(Debug, Clone)]
pub struct UltralyticsLoader {
    program: OsString,
    leading_args: Vec<OsString>,
}

impl Default for UltralyticsLoader {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl UltralyticsLoader {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self { program: program.into(), leading_args: Vec::new() }
    }

    /// Arguments placed before the toolkit mode, e.g. a script run by an interpreter.
    #[must_use]
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args);
        cmd
    }

    /// The full command line a training run would execute.
    #[must_use]
    pub fn render_command(&self, job: &TrainingJobSpec, device: Device) -> String {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.leading_args.iter().map(|a| a.to_string_lossy().into_owned()))
            .chain(training_args(job, device))
            .collect::<Vec<_>>()
            .join(" ")
    }

    async fn toolkit_version(&self) -> TrainingResult<String> {
        let output = self.command().arg("version").output().await.map_err(|e| {
            TrainingError::Trainer(format!("toolkit `{}` not runnable: {e}", self.program.to_string_lossy()))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TrainingError::Trainer(format!(
                "toolkit `{}` exited with {}: {}",
                self.program.to_string_lossy(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl ModelLoader for UltralyticsLoader {
    fn id(&self) -> &'static str {
        "ultralytics"
    }

    async fn load(&self, model: &ModelSpec) -> TrainingResult<Box<dyn ModelHandle>> {
        let version = self
            .toolkit_version()
            .await
            .map_err(|e| TrainingError::model_load(&model.weights, e.to_string()))?;
        debug!(version = %version, "ultralytics toolkit available");

        if !Path::new(&model.weights).is_file() && !is_toolkit_model_name(&model.weights) {
            return Err(TrainingError::model_load(
                &model.weights,
                "weights file not found and not a model name the toolkit resolves",
            ));
        }

        Ok(Box::new(UltralyticsModel { loader: self.clone(), spec: model.clone(), run_dir: None }))
    }
}

/// Handle on a model whose training is delegated to the toolkit.
#[derive(Debug)]
pub struct UltralyticsModel {
    loader: UltralyticsLoader,
    spec: ModelSpec,
    run_dir: Option<PathBuf>,
}

#[async_trait]
impl ModelHandle for UltralyticsModel {
    fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    async fn train(
        &mut self,
        job: &TrainingJobSpec,
        device: Device,
        progress: &dyn ProgressSink,
    ) -> TrainingResult<TrainingRun> {
        let args = training_args(job, device);
        progress.on_event(ProgressEvent::TrainingStarted {
            job_id: job.job_id.clone(),
            command: self.loader.render_command(job, device),
        });
        debug!(?args, "launching ultralytics training");

        let layout = RunLayout::for_output(&job.output);
        let before = layout.snapshot()?;

        let status = self.loader.command().args(&args).status().await?;
        if !status.success() {
            return Err(TrainingError::Trainer(format!("yolo train exited with {status}")));
        }

        let run_dir = layout.resolve_new_run(&before)?.ok_or_else(|| {
            TrainingError::Trainer(format!(
                "yolo train wrote no new weights/best.pt under {}",
                layout.project().display()
            ))
        })?;
        info!(run_dir = %run_dir.display(), "ultralytics training finished");

        self.run_dir = Some(run_dir.clone());
        Ok(TrainingRun { run_dir, device })
    }

    async fn save(&self, target: &Path) -> TrainingResult<PathBuf> {
        let run_dir = self
            .run_dir
            .as_ref()
            .ok_or_else(|| TrainingError::Trainer("model has not been trained yet".to_string()))?;

        let best = RunLayout::best_weights(run_dir);
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(&best, target).await.map_err(|e| {
            TrainingError::Artifact(format!("failed to copy {} to {}: {e}", best.display(), target.display()))
        })?;

        Ok(target.to_path_buf())
    }
}

/// `key=value` arguments for `yolo train`, in the toolkit's spelling.
#[must_use]
pub fn training_args(job: &TrainingJobSpec, device: Device) -> Vec<String> {
    let hp = &job.hyperparams;
    vec![
        "train".to_string(),
        format!("model={}", job.model.weights),
        format!("data={}", job.dataset.path.display()),
        format!("epochs={}", hp.epochs),
        format!("batch={}", hp.batch),
        format!("imgsz={}", hp.imgsz),
        format!("device={}", device.as_arg()),
        format!("project={}", job.output.project.display()),
        format!("name={}", job.output.name),
        format!("save={}", py_bool(job.output.save)),
        format!("save_period={}", hp.save_period),
        format!("cache={}", py_bool(hp.cache)),
        format!("workers={}", hp.workers),
        format!("patience={}", hp.patience),
        format!("optimizer={}", hp.optimizer),
        format!("lr0={}", hp.lr0),
        format!("weight_decay={}", hp.weight_decay),
        format!("augment={}", py_bool(hp.augment)),
    ]
}

const fn py_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Model names the toolkit resolves without a local file.
///
/// Accepted: YOLO release weights (`yolo11n.pt`, `yolov8s.pt`, `yolo11m-seg.pt`),
/// which are downloaded on first use; the matching model configs
/// (`yolo11n.yaml`, `yolo11.yaml`), which build an untrained model; and the
/// RT-DETR releases `rtdetr-l` / `rtdetr-x` in either form. Any other name
/// must point at an existing file.
fn is_toolkit_model_name(name: &str) -> bool {
    let (stem, is_config) = if let Some(stem) = name.strip_suffix(".pt") {
        (stem, false)
    } else if let Some(stem) = name.strip_suffix(".yaml").or_else(|| name.strip_suffix(".yml")) {
        (stem, true)
    } else {
        return false;
    };

    if matches!(stem, "rtdetr-l" | "rtdetr-x") {
        return true;
    }

    let Some(stem) = stem.strip_prefix("yolo") else {
        return false;
    };
    let stem = stem.strip_prefix('v').unwrap_or(stem);
    let (base, task) = match stem.split_once('-') {
        Some((base, task)) => (base, Some(task)),
        None => (stem, None),
    };

    let digits = base.chars().take_while(char::is_ascii_digit).count();
    let size = &base[digits..];
    // Configs may omit the scale; weights always carry one.
    let size_ok = matches!(size, "n" | "s" | "m" | "l" | "x") || (is_config && size.is_empty());
    digits > 0 && size_ok && task.is_none_or(|t| matches!(t, "seg" | "pose" | "obb" | "cls"))
}
