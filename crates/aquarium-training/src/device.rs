//! Compute device selection.
//!
//! The device is decided once at startup by probing for a CUDA-capable
//! accelerator and never changes for the rest of the process.

use serde::{Deserialize, Serialize};
use std::process::Command;

/// Device the delegated training call runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Device {
    #[serde(rename = "cuda")]
    Accelerated,
    #[serde(rename = "cpu")]
    Fallback,
}

impl Device {
    /// Value passed to the toolkit's `device=` argument.
    #[must_use]
    pub const fn as_arg(self) -> &'static str {
        match self {
            Self::Accelerated => "cuda",
            Self::Fallback => "cpu",
        }
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_arg())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceleratorStatus {
    pub available: bool,
    pub vendor: Option<String>,
    pub device_name: Option<String>,
    pub memory_total_mb: Option<u64>,
}

impl AcceleratorStatus {
    #[must_use]
    pub fn unavailable() -> Self {
        Self { available: false, vendor: None, device_name: None, memory_total_mb: None }
    }
}

pub trait DeviceProbe {
    fn status(&self) -> AcceleratorStatus;
}

/// Probes for NVIDIA GPUs through `nvidia-smi`.
#[derive(Debug, Default)]
pub struct NvidiaSmiProbe;

impl DeviceProbe for NvidiaSmiProbe {
    fn status(&self) -> AcceleratorStatus {
        if cuda_hidden(std::env::var("CUDA_VISIBLE_DEVICES").ok().as_deref()) {
            return AcceleratorStatus::unavailable();
        }

        let output = match Command::new("nvidia-smi")
            .args(["--query-gpu=name,memory.total", "--format=csv,noheader,nounits"])
            .output()
        {
            Ok(output) if output.status.success() => output,
            _ => return AcceleratorStatus::unavailable(),
        };

        parse_nvidia_smi(&String::from_utf8_lossy(&output.stdout))
            .unwrap_or_else(AcceleratorStatus::unavailable)
    }
}

/// `CUDA_VISIBLE_DEVICES=""` or `-1` hides every GPU from CUDA.
fn cuda_hidden(visible: Option<&str>) -> bool {
    matches!(visible.map(str::trim), Some("" | "-1"))
}

fn parse_nvidia_smi(stdout: &str) -> Option<AcceleratorStatus> {
    let line = stdout.lines().map(str::trim).find(|l| !l.is_empty())?;
    let mut parts = line.split(',');
    let name = parts.next()?.trim().to_string();
    let memory_total_mb = parts.next().and_then(|v| v.trim().parse::<u64>().ok());

    Some(AcceleratorStatus {
        available: true,
        vendor: Some("NVIDIA".to_string()),
        device_name: Some(name),
        memory_total_mb,
    })
}

/// Pick the accelerated device when the probe reports one, the CPU otherwise.
pub fn select_device(probe: &dyn DeviceProbe) -> Device {
    if probe.status().available {
        Device::Accelerated
    } else {
        Device::Fallback
    }
}
