//! Aquarium training CLI
//!
//! Provides the `aquarium-train` command, which fine-tunes a pretrained YOLO11
//! detector on the aquarium dataset through the Ultralytics toolkit.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Fine-tune a pretrained YOLO11 detector on the aquarium dataset.
///
/// With no subcommand the training job runs with its fixed settings.
#[derive(Parser, Debug)]
#[command(name = "aquarium-train", author, version, about = "Aquarium detector fine-tuning launcher")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// TOML file overriding the fixed job settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Ultralytics `yolo` executable
    #[arg(long, default_value = aquarium_training::backend::ultralytics::DEFAULT_PROGRAM, global = true)]
    yolo: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the training job (default)
    Train,

    /// Report which compute device training would use
    Device {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved job and toolkit command without running it
    Plan {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let launch_config = config::load_config(args.config.as_deref())?;

    // Initialize tracing
    let log_level = args.log_level.as_deref().or(launch_config.log_level.as_deref()).unwrap_or("info");
    let level = match log_level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber =
        FmtSubscriber::builder().with_max_level(level).without_time().with_target(false).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let job = launch_config.job_spec();
    let loader = aquarium_training::UltralyticsLoader::new(&args.yolo);

    match args.command.unwrap_or(Command::Train) {
        Command::Train => commands::train::execute(&job, &loader).await?,
        Command::Device { json } => commands::device::execute(json)?,
        Command::Plan { json } => commands::plan::execute(&job, &loader, json)?,
    }

    Ok(())
}
