use crate::error::TrainingResult;
use crate::job::RunOutput;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Runs that already held a best checkpoint before a training call.
#[derive(Debug, Clone, Default)]
pub struct RunSnapshot(HashMap<PathBuf, SystemTime>);

/// Filesystem layout of a toolkit training run.
///
/// Runs live under `<project>/<name>/` with weights in `weights/best.pt` and
/// `weights/last.pt`. When `<name>` is taken the toolkit appends an increment
/// (`<name>2`, `<name>3`, ...).
#[derive(Debug, Clone)]
pub struct RunLayout {
    project: PathBuf,
    name: String,
}

impl RunLayout {
    #[must_use]
    pub fn new(project: PathBuf, name: String) -> Self {
        Self { project, name }
    }

    #[must_use]
    pub fn for_output(output: &RunOutput) -> Self {
        Self::new(output.project.clone(), output.name.clone())
    }

    #[must_use]
    pub fn project(&self) -> &Path {
        &self.project
    }

    /// Run directory the toolkit uses when the name is still free.
    #[must_use]
    pub fn run_dir(&self) -> PathBuf {
        self.project.join(&self.name)
    }

    #[must_use]
    pub fn weights_dir(run_dir: &Path) -> PathBuf {
        run_dir.join("weights")
    }

    #[must_use]
    pub fn best_weights(run_dir: &Path) -> PathBuf {
        Self::weights_dir(run_dir).join("best.pt")
    }

    #[must_use]
    pub fn last_weights(run_dir: &Path) -> PathBuf {
        Self::weights_dir(run_dir).join("last.pt")
    }

    #[must_use]
    pub fn results_csv(run_dir: &Path) -> PathBuf {
        run_dir.join("results.csv")
    }

    #[must_use]
    pub fn args_yaml(run_dir: &Path) -> PathBuf {
        run_dir.join("args.yaml")
    }

    #[must_use]
    pub fn manifest_path(run_dir: &Path) -> PathBuf {
        run_dir.join("training_manifest.json")
    }

    /// Best-checkpoint modification times of the runs currently on disk.
    pub fn snapshot(&self) -> TrainingResult<RunSnapshot> {
        Ok(RunSnapshot(self.runs_with_best()?.into_iter().collect()))
    }

    /// Most recently modified run whose best checkpoint is absent from
    /// `before` or has changed since it was taken.
    pub fn resolve_new_run(&self, before: &RunSnapshot) -> TrainingResult<Option<PathBuf>> {
        let latest = self
            .runs_with_best()?
            .into_iter()
            .filter(|(path, modified)| before.0.get(path) != Some(modified))
            .max_by_key(|(_, modified)| *modified);

        Ok(latest.map(|(path, _)| path))
    }

    fn runs_with_best(&self) -> TrainingResult<Vec<(PathBuf, SystemTime)>> {
        let dir = match std::fs::read_dir(&self.project) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut runs = Vec::new();
        for entry in dir {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() || !self.is_run_of_name(&entry.file_name().to_string_lossy()) {
                continue;
            }
            let best = Self::best_weights(&path);
            let Ok(modified) = best.metadata().and_then(|m| m.modified()) else {
                continue;
            };
            runs.push((path, modified));
        }

        Ok(runs)
    }

    /// `name` itself or `name` followed by a numeric increment.
    fn is_run_of_name(&self, dir_name: &str) -> bool {
        dir_name
            .strip_prefix(self.name.as_str())
            .is_some_and(|suffix| suffix.chars().all(|c| c.is_ascii_digit()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn touch_best(run_dir: &Path) {
        std::fs::create_dir_all(RunLayout::weights_dir(run_dir)).unwrap();
        std::fs::write(RunLayout::best_weights(run_dir), b"weights").unwrap();
    }

    #[test]
    fn test_layout_paths() {
        let layout = RunLayout::new(PathBuf::from("runs/train"), "aquarium_yolov11".to_string());
        let run = layout.run_dir();
        assert_eq!(run, PathBuf::from("runs/train/aquarium_yolov11"));
        assert_eq!(RunLayout::best_weights(&run), PathBuf::from("runs/train/aquarium_yolov11/weights/best.pt"));
        assert_eq!(RunLayout::last_weights(&run), PathBuf::from("runs/train/aquarium_yolov11/weights/last.pt"));
        assert!(RunLayout::manifest_path(&run).ends_with("training_manifest.json"));
    }

    #[test]
    fn test_resolve_new_run_missing_project() {
        let temp = TempDir::new().unwrap();
        let layout = RunLayout::new(temp.path().join("nope"), "aquarium_yolov11".to_string());
        assert!(layout.resolve_new_run(&RunSnapshot::default()).unwrap().is_none());
    }

    #[test]
    fn test_resolve_new_run_prefers_newest_increment() {
        let temp = TempDir::new().unwrap();
        let layout = RunLayout::new(temp.path().to_path_buf(), "aquarium_yolov11".to_string());

        touch_best(&temp.path().join("aquarium_yolov11"));
        std::thread::sleep(Duration::from_millis(20));
        touch_best(&temp.path().join("aquarium_yolov112"));

        let latest = layout.resolve_new_run(&RunSnapshot::default()).unwrap().unwrap();
        assert_eq!(latest, temp.path().join("aquarium_yolov112"));
    }

    #[test]
    fn test_resolve_new_run_ignores_unrelated_and_incomplete_dirs() {
        let temp = TempDir::new().unwrap();
        let layout = RunLayout::new(temp.path().to_path_buf(), "aquarium_yolov11".to_string());

        touch_best(&temp.path().join("aquarium_yolov11"));
        std::thread::sleep(Duration::from_millis(20));
        touch_best(&temp.path().join("aquarium_yolov11_old"));
        touch_best(&temp.path().join("other_run"));
        std::fs::create_dir_all(temp.path().join("aquarium_yolov113")).unwrap();

        let latest = layout.resolve_new_run(&RunSnapshot::default()).unwrap().unwrap();
        assert_eq!(latest, temp.path().join("aquarium_yolov11"));
    }

    #[test]
    fn test_resolve_new_run_ignores_runs_from_before_the_snapshot() {
        let temp = TempDir::new().unwrap();
        let layout = RunLayout::new(temp.path().to_path_buf(), "aquarium_yolov11".to_string());

        touch_best(&temp.path().join("aquarium_yolov11"));
        let before = layout.snapshot().unwrap();
        assert!(layout.resolve_new_run(&before).unwrap().is_none());

        std::thread::sleep(Duration::from_millis(20));
        touch_best(&temp.path().join("aquarium_yolov112"));
        let latest = layout.resolve_new_run(&before).unwrap().unwrap();
        assert_eq!(latest, temp.path().join("aquarium_yolov112"));
    }

    #[test]
    fn test_resolve_new_run_accepts_rewritten_run() {
        let temp = TempDir::new().unwrap();
        let layout = RunLayout::new(temp.path().to_path_buf(), "aquarium_yolov11".to_string());
        let run = temp.path().join("aquarium_yolov11");

        touch_best(&run);
        let before = layout.snapshot().unwrap();
        std::thread::sleep(Duration::from_millis(20));
        touch_best(&run);

        assert_eq!(layout.resolve_new_run(&before).unwrap(), Some(run));
    }
}
