//! Training command implementation.

use anyhow::{Context, Result};
use aquarium_training::{
    LaunchOutcome, Launcher, NvidiaSmiProbe, StdoutProgressSink, TrainingJobSpec, UltralyticsLoader,
};
use colored::Colorize;

pub async fn execute(job: &TrainingJobSpec, loader: &UltralyticsLoader) -> Result<()> {
    let launcher = Launcher::new(&NvidiaSmiProbe, loader, &StdoutProgressSink);

    // A model that fails to load is reported by the launcher and ends the job normally.
    let LaunchOutcome::Completed(report) = launcher.launch(job).await.context("Training job failed")? else {
        return Ok(());
    };

    println!();
    println!("{}", "Aquarium training complete".bold().green());
    println!("  Job: {}", job.job_id.0.cyan());
    println!("  Device: {}", report.device.to_string().cyan());
    println!("  Run: {}", report.run_dir.display().to_string().dimmed());
    println!("  Checkpoint: {}", report.checkpoint.display().to_string().cyan());
    if let Some(map50) = report.metrics.map50 {
        println!("  mAP50: {map50:.4}");
    }
    if let Some(map50_95) = report.metrics.map50_95 {
        println!("  mAP50-95: {map50_95:.4}");
    }
    if let Some(ref manifest) = report.manifest_path {
        println!("  Manifest: {}", manifest.display().to_string().dimmed());
    }
    println!();
    Ok(())
}
