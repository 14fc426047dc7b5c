//! Deterministic procedural noise textures.
//!
//! `NoiseParameters` in, encoded image bytes out. The pipeline runs leaves
//! first: seeded PRNG → noise kernel → optional domain warp → fractal
//! compositor → colour ramp → encoder. The seed fully determines every
//! random choice, so identical parameters give byte-identical output.
pub mod encode;
pub mod error;
pub mod fractal;
pub mod generator;
pub mod kernel;
pub mod params;
pub mod prng;
pub mod synth;
pub mod warp;

pub use encode::{encode, EncodedImage};
pub use error::{NoiseError, NoiseResult};
pub use fractal::{FractalCompositor, NormalizationMode};
pub use generator::{generate, render, NoiseGenerator};
pub use kernel::NoiseKernel;
pub use params::{Color, FractalType, KernelKind, NoiseParameters, NoiseType, OutputFormat};
pub use prng::SeededPrng;
pub use synth::{ImageSynthesizer, NoiseField, RasterBuffer};
pub use warp::DomainWarp;
