//! Multi-octave compositing.
//!
//! Octave `i` samples the kernel at `frequency · lacunarityⁱ`, passes the
//! value through the fractal transform and weights it by
//! `amplitude · persistenceⁱ`. The sum is mapped into [0, 1] by
//! [`normalize`] and hard-clamped.
use noise::NoiseFn;
use serde::{Deserialize, Serialize};

use crate::params::{FractalType, NoiseParameters};

/// How the octave sum is mapped to [0, 1].
///
/// `Approximate` bounds the sum by the infinite geometric series
/// `amplitude / (1 − persistence)` regardless of the octave count, which
/// under-uses the range for few octaves; the final clamp keeps it safe.
/// Existing presets are calibrated against it. `Exact` uses the finite sum
/// `amplitude · Σ persistenceⁱ` over the octaves actually evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationMode {
    #[default]
    Approximate,
    Exact,
}

/// Per-octave shaping of a kernel sample.
#[inline]
pub fn apply_fractal_transform(v: f64, fractal: FractalType) -> f64 {
    match fractal {
        FractalType::None | FractalType::Fbm => v,
        FractalType::Billow => v.abs() * 2.0 - 1.0,
        FractalType::Ridged => 1.0 - v.abs(),
        FractalType::Turbulence => v.abs(),
        FractalType::Iq => (1.0 / (v.abs() + 0.1) * 0.2 - 0.5).clamp(-1.0, 1.0),
    }
}

/// Clamp into [0, 1]; NaN maps to 0.
#[inline]
pub fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Amplitude bound used by [`normalize`].
pub fn amplitude_bound(amplitude: f64, persistence: f64, octaves: u32, mode: NormalizationMode) -> f64 {
    let exact = || {
        let mut sum = 0.0;
        let mut amp = amplitude;
        for _ in 0..octaves {
            sum += amp;
            amp *= persistence;
        }
        sum
    };
    match mode {
        NormalizationMode::Approximate => {
            let bound = amplitude * (1.0 / (1.0 - persistence));
            // persistence = 1 has no geometric bound.
            if bound.is_finite() && bound > 0.0 { bound } else { exact() }
        }
        NormalizationMode::Exact => exact(),
    }
}

/// Map an octave sum into [0, 1]: `(total + bound) / (2 · bound)`, clamped.
pub fn normalize(total: f64, amplitude: f64, persistence: f64, octaves: u32, mode: NormalizationMode) -> f64 {
    let bound = amplitude_bound(amplitude, persistence, octaves, mode);
    clamp_unit((total + bound) / (2.0 * bound))
}

/// A kernel plus the octave settings needed to evaluate it.
#[derive(Debug, Clone)]
pub struct FractalCompositor<N> {
    kernel: N,
    fractal: FractalType,
    frequency: f64,
    amplitude: f64,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
    normalization: NormalizationMode,
}

impl<N: NoiseFn<f64, 2>> FractalCompositor<N> {
    pub fn new(kernel: N, params: &NoiseParameters) -> Self {
        Self {
            kernel,
            fractal: params.fractal_type,
            frequency: params.frequency,
            amplitude: params.amplitude,
            octaves: params.effective_octaves(),
            persistence: params.persistence,
            lacunarity: params.lacunarity,
            normalization: params.normalization,
        }
    }

    pub fn octaves(&self) -> u32 {
        self.octaves
    }

    /// Evaluate at a normalized coordinate. Result is in [0, 1].
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        if self.fractal == FractalType::None {
            return self.single_octave(x, y);
        }

        let mut total = 0.0;
        let mut amp = self.amplitude;
        let mut freq = self.frequency;
        for _ in 0..self.octaves {
            let v = self.kernel.get([x * freq, y * freq]);
            total += apply_fractal_transform(v, self.fractal) * amp;
            amp *= self.persistence;
            freq *= self.lacunarity;
        }
        normalize(total, self.amplitude, self.persistence, self.octaves, self.normalization)
    }

    /// Raw kernel output mapped straight to [0, 1].
    fn single_octave(&self, x: f64, y: f64) -> f64 {
        let v = self.kernel.get([x * self.frequency, y * self.frequency]);
        clamp_unit((v * self.amplitude + self.amplitude) / (2.0 * self.amplitude))
    }
}

impl<N: NoiseFn<f64, 2>> NoiseFn<f64, 2> for FractalCompositor<N> {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.sample(point[0], point[1])
    }
}
