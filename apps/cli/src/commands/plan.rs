//! Plan command implementation.
//!
//! Prints what a training run would do without probing the toolkit or
//! starting it.

use anyhow::Result;
use aquarium_training::backend::training_args;
use aquarium_training::{select_device, NvidiaSmiProbe, TrainingJobSpec, UltralyticsLoader};
use colored::Colorize;
use serde_json::json;

pub fn execute(job: &TrainingJobSpec, loader: &UltralyticsLoader, json_output: bool) -> Result<()> {
    let device = select_device(&NvidiaSmiProbe);

    if json_output {
        let out = json!({
            "job": job,
            "device": device,
            "args": training_args(job, device),
            "command": loader.render_command(job, device),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let hp = &job.hyperparams;
    println!();
    println!("{}", "Aquarium training plan".bold().cyan());
    println!("  Weights: {}", job.model.weights.cyan());
    println!("  Dataset: {}", job.dataset.path.display());
    println!("  Device: {device}");
    println!("  Output: {}", job.output.project.join(&job.output.name).display().to_string().dimmed());
    println!("  Checkpoint: {}", job.checkpoint_name.display());
    println!(
        "  Hyperparameters: epochs={} batch={} imgsz={} optimizer={} lr0={} weight_decay={}",
        hp.epochs, hp.batch, hp.imgsz, hp.optimizer, hp.lr0, hp.weight_decay
    );
    println!(
        "                   patience={} save_period={} workers={} augment={} cache={}",
        hp.patience, hp.save_period, hp.workers, hp.augment, hp.cache
    );
    println!();
    println!("  {}", loader.render_command(job, device).dimmed());
    println!();
    Ok(())
}
