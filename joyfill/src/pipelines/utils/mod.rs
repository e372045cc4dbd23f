use super::cache::ModelOptions;
use crate::error::{PipelineError, Result};
use candle_core::Device;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Where model inference runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeviceRequest {
    /// Run on the CPU (default).
    #[default]
    Cpu,
    /// Run on the CUDA GPU with this index.
    Cuda(usize),
}

impl DeviceRequest {
    pub(crate) fn resolve(self) -> Result<Device> {
        match self {
            DeviceRequest::Cpu => Ok(Device::Cpu),
            DeviceRequest::Cuda(i) => {
                // One device per GPU so cached models and fresh ones share a stream.
                static CUDA_DEVICE_CACHE: Lazy<Mutex<HashMap<usize, Device>>> =
                    Lazy::new(|| Mutex::new(HashMap::new()));

                let mut cache = CUDA_DEVICE_CACHE
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                if let Some(dev) = cache.get(&i) {
                    return Ok(dev.clone());
                }

                let dev = Device::new_cuda(i).map_err(|e| {
                    PipelineError::Device(format!(
                        "Failed to init CUDA device {i}: {e}. Try CPU as fallback."
                    ))
                })?;
                cache.insert(i, dev.clone());
                Ok(dev)
            }
        }
    }
}

pub(crate) fn build_cache_key<O: ModelOptions>(options: &O, device: &Device) -> String {
    format!("{}-{:?}", options.cache_key(), device.location())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_request_resolves_without_hardware() {
        let device = DeviceRequest::default().resolve().unwrap();
        assert!(device.is_cpu());
    }

    #[test]
    fn cache_key_includes_device() {
        struct Opts;
        impl ModelOptions for Opts {
            fn cache_key(&self) -> String {
                "modernbert-base".into()
            }
        }
        let key = build_cache_key(&Opts, &Device::Cpu);
        assert!(key.starts_with("modernbert-base-"));
        assert!(key.contains("Cpu"));
    }
}
