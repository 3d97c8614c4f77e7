//! Aquarium Training
//!
//! Launcher for fine-tuning a pretrained YOLO detector on the aquarium dataset:
//! - Describing the job (`TrainingJobSpec`, fixed hyperparameters)
//! - Selecting the compute device (`DeviceProbe`)
//! - Delegating training to a toolkit behind `ModelLoader` / `ModelHandle`
//! - Writing the final checkpoint and a run manifest

pub mod artifacts;
pub mod backend;
pub mod config;
pub mod device;
pub mod error;
pub mod job;
pub mod launcher;
pub mod layout;
pub mod model;
pub mod progress;

pub use artifacts::{ArtifactKind, TrainingArtifact, TrainingManifest, TrainingMetrics};
pub use backend::{UltralyticsLoader, UltralyticsModel};
pub use config::{ConfigError, LaunchConfig};
pub use device::{select_device, AcceleratorStatus, Device, DeviceProbe, NvidiaSmiProbe};
pub use error::{TrainingError, TrainingResult};
pub use job::{
    DatasetDescriptor, ModelSpec, Optimizer, RunOutput, TrainingHyperParams, TrainingJobId, TrainingJobSpec,
    TrainingRun,
};
pub use launcher::{LaunchOutcome, LaunchReport, Launcher};
pub use layout::{RunLayout, RunSnapshot};
pub use model::{ModelHandle, ModelLoader};
pub use progress::{NullProgressSink, ProgressEvent, ProgressSink, StdoutProgressSink};
