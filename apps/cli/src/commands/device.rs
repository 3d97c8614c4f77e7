//! Device command implementation.

use anyhow::Result;
use aquarium_training::{select_device, DeviceProbe, NvidiaSmiProbe};
use colored::Colorize;
use serde_json::json;

pub fn execute(json_output: bool) -> Result<()> {
    let probe = NvidiaSmiProbe;
    let status = probe.status();
    let device = select_device(&probe);

    if json_output {
        let out = json!({ "device": device, "accelerator": status });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Using device: {}", device.to_string().bold());
    if status.available {
        let name = status.device_name.as_deref().unwrap_or("unknown");
        let vendor = status.vendor.as_deref().unwrap_or("unknown");
        println!("  Accelerator: {} ({})", name.cyan(), vendor.dimmed());
        if let Some(mb) = status.memory_total_mb {
            println!("  Memory: {mb} MiB");
        }
    } else {
        println!("  {}", "No CUDA accelerator detected; training will run on the CPU.".dimmed());
    }
    Ok(())
}
