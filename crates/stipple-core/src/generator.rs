//! Request orchestrator: validate → build kernels → shade → encode.
//!
//! Holds no state between calls. The same parameters always produce the
//! same bytes; nothing here reads the clock or a global random source.
use std::sync::atomic::AtomicU64;

use crate::encode::{encode, EncodedImage};
use crate::error::NoiseResult;
use crate::params::NoiseParameters;
use crate::synth::{ImageSynthesizer, RasterBuffer};

#[derive(Debug, Clone, Copy, Default)]
pub struct NoiseGenerator<'a> {
    pixel_probe: Option<&'a AtomicU64>,
}

impl<'a> NoiseGenerator<'a> {
    pub fn new() -> Self {
        Self { pixel_probe: None }
    }

    /// Increment `probe` once per shaded pixel.
    pub fn with_pixel_probe(mut self, probe: &'a AtomicU64) -> Self {
        self.pixel_probe = Some(probe);
        self
    }

    /// Produce the raw RGBA raster.
    #[tracing::instrument(
        skip_all,
        fields(
            width = params.width,
            height = params.height,
            seed = params.seed,
            noise = %params.noise_type,
            fractal = %params.fractal_type,
            warp = params.domain_warp,
        )
    )]
    pub fn render(&self, params: &NoiseParameters) -> NoiseResult<RasterBuffer> {
        let synth = match ImageSynthesizer::new(params) {
            Ok(s) => s,
            Err(err) => {
                tracing::warn!(%err, "rejected generation request");
                return Err(err);
            }
        };
        tracing::debug!(kernel = ?params.noise_type.kernel(), octaves = params.effective_octaves(), "kernels built");

        let synth = match self.pixel_probe {
            Some(probe) => synth.with_probe(probe),
            None => synth,
        };
        let raster = synth.render()?;
        tracing::debug!(pixels = raster.width() as u64 * raster.height() as u64, "raster shaded");
        Ok(raster)
    }

    /// Produce the encoded image in `params.output_format`.
    pub fn generate(&self, params: &NoiseParameters) -> NoiseResult<EncodedImage> {
        let raster = self.render(params)?;
        let image = encode(&raster, params.output_format, params.quality)?;
        tracing::debug!(format = %image.format, bytes = image.len(), "image encoded");
        Ok(image)
    }
}

/// Render and encode one image.
pub fn generate(params: &NoiseParameters) -> NoiseResult<EncodedImage> {
    NoiseGenerator::new().generate(params)
}

/// Render one raster without encoding it.
pub fn render(params: &NoiseParameters) -> NoiseResult<RasterBuffer> {
    NoiseGenerator::new().render(params)
}
