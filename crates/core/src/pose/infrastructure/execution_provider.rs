use std::fmt;
use std::str::FromStr;

use ort::ep::ExecutionProviderDispatch;
use thiserror::Error;

/// Compute device requested for inference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Device {
    Cpu,
    /// CUDA GPU by ordinal.
    Cuda(i32),
}

#[derive(Error, Debug, PartialEq)]
#[error("invalid device '{0}': expected 'cpu', 'cuda' or 'cuda:<index>'")]
pub struct DeviceParseError(pub String);

impl FromStr for Device {
    type Err = DeviceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "cpu" => Ok(Device::Cpu),
            "cuda" => Ok(Device::Cuda(0)),
            _ => lower
                .strip_prefix("cuda:")
                .and_then(|id| id.parse::<i32>().ok())
                .filter(|id| *id >= 0)
                .map(Device::Cuda)
                .ok_or_else(|| DeviceParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda(id) => write!(f, "cuda:{id}"),
        }
    }
}

/// Execution providers for `device`, in priority order.
///
/// ONNX Runtime falls back to CPU when a listed provider cannot be registered.
pub fn execution_providers(device: Device) -> Vec<ExecutionProviderDispatch> {
    let mut providers = Vec::new();
    if let Device::Cuda(id) = device {
        push_cuda(&mut providers, id);
    }
    providers.extend(platform_providers());
    providers
}

#[cfg(not(target_os = "macos"))]
fn push_cuda(providers: &mut Vec<ExecutionProviderDispatch>, id: i32) {
    providers.push(
        ort::ep::CUDA::default()
            .with_device_id(id)
            .build(),
    );
}

#[cfg(target_os = "macos")]
fn push_cuda(_providers: &mut Vec<ExecutionProviderDispatch>, id: i32) {
    log::warn!("CUDA device {id} requested but CUDA is unavailable on macOS");
}

fn platform_providers() -> Vec<ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    {
        vec![ort::ep::CoreML::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::ep::DirectML::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}
