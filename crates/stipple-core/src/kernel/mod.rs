//! Scalar noise primitives `(x, y) -> [-1, 1]`.
//!
//! Each kernel is built once per request from the seed and is read-only
//! afterwards, so a single instance can be shared across worker threads.
pub mod gradient;
pub mod value;
pub mod white;

pub use gradient::GradientKernel;
pub use value::ValueKernel;
pub use white::WhiteKernel;

use noise::NoiseFn;

use crate::error::NoiseResult;
use crate::params::{KernelKind, NoiseParameters};

/// Closed set of kernels, selected once at construction.
#[derive(Debug, Clone)]
pub enum NoiseKernel {
    Gradient(GradientKernel),
    White(WhiteKernel),
    Value(ValueKernel),
}

impl NoiseKernel {
    /// `width`/`height` size the white-noise table; other kernels ignore them.
    pub fn build(kind: KernelKind, seed: u32, width: u32, height: u32) -> NoiseResult<Self> {
        Ok(match kind {
            KernelKind::Gradient => NoiseKernel::Gradient(GradientKernel::new(seed)),
            KernelKind::White => NoiseKernel::White(WhiteKernel::new(seed, width, height)?),
            KernelKind::Value => NoiseKernel::Value(ValueKernel::new(seed)),
        })
    }

    pub fn for_params(params: &NoiseParameters) -> NoiseResult<Self> {
        Self::build(params.noise_type.kernel(), params.seed, params.width, params.height)
    }

    pub fn kind(&self) -> KernelKind {
        match self {
            NoiseKernel::Gradient(_) => KernelKind::Gradient,
            NoiseKernel::White(_) => KernelKind::White,
            NoiseKernel::Value(_) => KernelKind::Value,
        }
    }

    #[inline]
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        match self {
            NoiseKernel::Gradient(k) => k.evaluate(x, y),
            NoiseKernel::White(k) => k.evaluate(x, y),
            NoiseKernel::Value(k) => k.evaluate(x, y),
        }
    }
}

impl NoiseFn<f64, 2> for NoiseKernel {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.evaluate(point[0], point[1])
    }
}
