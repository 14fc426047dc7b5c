//! Per-pixel synthesis: coordinates → warp → fractal field → colour ramp.
//!
//! Each pixel depends only on its coordinates and the immutable parameters,
//! so rows are shaded independently (in parallel with the `threading`
//! feature) and the output is identical either way.
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{NoiseError, NoiseResult};
use crate::fractal::{clamp_unit, FractalCompositor};
use crate::kernel::NoiseKernel;
use crate::params::{Color, NoiseParameters};
use crate::warp::DomainWarp;

/// Row-major RGBA8 raster, alpha always 255.
pub type RasterBuffer = image::RgbaImage;

const CHANNELS: usize = 4;

/// The scalar field `(nx, ny) -> [0, 1]` for one request.
#[derive(Debug, Clone)]
pub struct NoiseField {
    compositor: FractalCompositor<NoiseKernel>,
    warp: Option<DomainWarp>,
}

impl NoiseField {
    pub fn new(params: &NoiseParameters) -> NoiseResult<Self> {
        let kernel = NoiseKernel::for_params(params)?;
        Ok(Self {
            compositor: FractalCompositor::new(kernel, params),
            warp: params.domain_warp.then(|| DomainWarp::new(params.seed)),
        })
    }

    /// Sample at a normalized coordinate.
    #[inline]
    pub fn sample(&self, nx: f64, ny: f64) -> f64 {
        let (x, y) = match &self.warp {
            Some(warp) => warp.apply(nx, ny),
            None => (nx, ny),
        };
        clamp_unit(self.compositor.sample(x, y))
    }
}

/// Interpolate from `background` (v = 0) to white (v = 1), flooring each channel.
#[inline]
pub fn ramp(background: Color, v: f64) -> [u8; 4] {
    let v = clamp_unit(v);
    let mix = |bg: u8| (bg as f64 * (1.0 - v) + 255.0 * v).floor() as u8;
    [mix(background.r), mix(background.g), mix(background.b), 255]
}

pub struct ImageSynthesizer<'a> {
    width: u32,
    height: u32,
    background: Color,
    field: NoiseField,
    probe: Option<&'a AtomicU64>,
}

impl<'a> ImageSynthesizer<'a> {
    /// Validates `params` and builds the kernel tables. No pixel work yet.
    pub fn new(params: &NoiseParameters) -> NoiseResult<Self> {
        params.validate()?;
        Ok(Self {
            width: params.width,
            height: params.height,
            background: params.background_color,
            field: NoiseField::new(params)?,
            probe: None,
        })
    }

    /// Count every shaded pixel into `probe`.
    pub fn with_probe(mut self, probe: &'a AtomicU64) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn field(&self) -> &NoiseField {
        &self.field
    }

    /// Shade every pixel; rows run on the rayon pool with `threading`.
    pub fn render(&self) -> NoiseResult<RasterBuffer> {
        let (mut buf, row_bytes) = self.allocate()?;

        #[cfg(feature = "threading")]
        {
            use rayon::prelude::*;
            buf.par_chunks_mut(row_bytes)
                .enumerate()
                .for_each(|(py, row)| self.shade_row(py, row));
        }
        #[cfg(not(feature = "threading"))]
        self.shade_rows(&mut buf, row_bytes);

        self.finish(buf)
    }

    /// Shade every pixel on the calling thread, whatever the feature set.
    pub fn render_sequential(&self) -> NoiseResult<RasterBuffer> {
        let (mut buf, row_bytes) = self.allocate()?;
        self.shade_rows(&mut buf, row_bytes);
        self.finish(buf)
    }

    /// Zeroed RGBA buffer plus its row stride.
    fn allocate(&self) -> NoiseResult<(Vec<u8>, usize)> {
        let row_bytes = (self.width as usize)
            .checked_mul(CHANNELS)
            .ok_or_else(|| NoiseError::render("row size overflows"))?;
        let len = row_bytes
            .checked_mul(self.height as usize)
            .ok_or_else(|| NoiseError::render(format!("raster {}x{} overflows", self.width, self.height)))?;

        let mut buf: Vec<u8> = Vec::new();
        buf.try_reserve_exact(len)
            .map_err(|e| NoiseError::render(format!("cannot allocate {len}-byte raster: {e}")))?;
        buf.resize(len, 0);
        Ok((buf, row_bytes))
    }

    fn shade_rows(&self, buf: &mut [u8], row_bytes: usize) {
        buf.chunks_mut(row_bytes)
            .enumerate()
            .for_each(|(py, row)| self.shade_row(py, row));
    }

    fn finish(&self, buf: Vec<u8>) -> NoiseResult<RasterBuffer> {
        RasterBuffer::from_raw(self.width, self.height, buf)
            .ok_or_else(|| NoiseError::render("raster length does not match dimensions"))
    }

    fn shade_row(&self, py: usize, row: &mut [u8]) {
        let ny = py as f64 / self.height as f64;
        for (px, pixel) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let nx = px as f64 / self.width as f64;
            let v = self.field.sample(nx, ny);
            pixel.copy_from_slice(&ramp(self.background, v));
            if let Some(probe) = self.probe {
                probe.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}
