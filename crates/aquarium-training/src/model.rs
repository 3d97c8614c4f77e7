use crate::device::Device;
use crate::error::TrainingResult;
use crate::job::{ModelSpec, TrainingJobSpec, TrainingRun};
use crate::progress::ProgressSink;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Builds model handles from a pretrained-weights identifier.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    fn id(&self) -> &'static str;

    async fn load(&self, model: &ModelSpec) -> TrainingResult<Box<dyn ModelHandle>>;
}

/// Opaque handle on a pretrained model.
///
/// A handle is trained once and then asked to persist its best state.
#[async_trait]
pub trait ModelHandle: Send + Sync {
    fn spec(&self) -> &ModelSpec;

    /// Run the delegated training routine to completion.
    async fn train(
        &mut self,
        job: &TrainingJobSpec,
        device: Device,
        progress: &dyn ProgressSink,
    ) -> TrainingResult<TrainingRun>;

    /// Write the best-performing state to `target` and return where it landed.
    async fn save(&self, target: &Path) -> TrainingResult<PathBuf>;
}
