//! Device and precision selection

use candle_core::{DType, Device, utils};

/// Where weights live and at which precision.
#[derive(Debug, Clone)]
pub struct Placement {
    /// Compute device.
    pub device: Device,
    /// Weight and activation dtype: f16 on accelerators, f32 on CPU.
    pub dtype: DType,
}

impl Placement {
    /// Whether the placement is on an accelerator.
    pub fn accelerated(&self) -> bool {
        !self.device.is_cpu()
    }
}

/// Pick CUDA, then Metal, else CPU. `cpu` forces the CPU.
pub fn detect(cpu: bool) -> anyhow::Result<Placement> {
    let device = if cpu {
        Device::Cpu
    } else if utils::cuda_is_available() {
        Device::new_cuda(0)?
    } else if utils::metal_is_available() {
        Device::new_metal(0)?
    } else {
        tracing::warn!("no GPU detected, running on CPU (build with `--features cuda` or `metal`)");
        Device::Cpu
    };

    let dtype = if device.is_cpu() {
        DType::F32
    } else {
        DType::F16
    };
    Ok(Placement { device, dtype })
}
