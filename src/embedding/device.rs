//! Compute device selection for the sentence encoder.

use candle_core::Device;
use candle_core::utils::{cuda_is_available, metal_is_available};
use tracing::{debug, info, warn};

use super::error::EmbeddingError;

/// Backends the encoder can run on, in preference order after GPU detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeBackend {
    Cuda,
    Metal,
    Cpu,
}

impl ComputeBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComputeBackend::Cuda => "cuda",
            ComputeBackend::Metal => "metal",
            ComputeBackend::Cpu => "cpu",
        }
    }

    /// GPU backends compiled into this build.
    fn compiled_gpus() -> Vec<ComputeBackend> {
        let mut gpus = Vec::with_capacity(2);
        if cuda_is_available() {
            gpus.push(ComputeBackend::Cuda);
        }
        if metal_is_available() {
            gpus.push(ComputeBackend::Metal);
        }
        gpus
    }

    fn open(self) -> Result<Device, EmbeddingError> {
        let opened = match self {
            ComputeBackend::Cuda => Device::new_cuda(0),
            ComputeBackend::Metal => Device::new_metal(0),
            ComputeBackend::Cpu => return Ok(Device::Cpu),
        };

        opened.map_err(|e| EmbeddingError::DeviceUnavailable {
            device: self.as_str().to_string(),
            reason: e.to_string(),
        })
    }
}

/// First GPU that opens, else the CPU. GPU failures are logged and skipped.
pub fn select_device() -> (Device, ComputeBackend) {
    let gpus = ComputeBackend::compiled_gpus();
    if gpus.is_empty() {
        debug!("No GPU backend compiled, using CPU");
        return (Device::Cpu, ComputeBackend::Cpu);
    }

    for backend in gpus {
        match backend.open() {
            Ok(device) => {
                info!(backend = backend.as_str(), "Using GPU acceleration");
                return (device, backend);
            }
            Err(e) => warn!(error = %e, "GPU backend unavailable"),
        }
    }

    warn!("Falling back to CPU device");
    (Device::Cpu, ComputeBackend::Cpu)
}
