//! Lattice value noise with cosine-smoothed bilinear interpolation.
//!
//! The lattice holds `(grid_size + 1)²` independent draws and tiles with
//! period `grid_size + 1` in lattice units: `evaluate(x + grid_size + 1, y)`
//! equals `evaluate(x, y)`.
use std::f64::consts::PI;

use noise::NoiseFn;

use crate::prng::SeededPrng;

pub const DEFAULT_GRID_SIZE: usize = 16;

#[derive(Debug, Clone)]
pub struct ValueKernel {
    /// Lattice points per side, `grid_size + 1`.
    side: usize,
    /// Draws in [0, 1), row-major (`y * side + x`).
    lattice: Vec<f64>,
}

impl ValueKernel {
    pub fn new(seed: u32) -> Self {
        Self::with_grid_size(seed, DEFAULT_GRID_SIZE)
    }

    pub fn with_grid_size(seed: u32, grid_size: usize) -> Self {
        let side = grid_size + 1;
        let mut rng = SeededPrng::from(seed);
        let lattice = (0..side * side).map(|_| rng.next_f64()).collect();
        Self { side, lattice }
    }

    pub fn grid_size(&self) -> usize {
        self.side - 1
    }

    /// Raw lattice value in [0, 1); indices wrap modulo `grid_size + 1`.
    pub fn corner(&self, ix: i64, iy: i64) -> f64 {
        let side = self.side as i64;
        let x = ix.rem_euclid(side) as usize;
        let y = iy.rem_euclid(side) as usize;
        self.lattice[y * self.side + x]
    }

    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let tx = x - x0;
        let ty = y - y0;
        // Reduce before casting so far octaves cannot saturate the index.
        let side = self.side as f64;
        let (ix, iy) = (x0.rem_euclid(side) as i64, y0.rem_euclid(side) as i64);

        let top = cosine_interpolate(self.corner(ix, iy), self.corner(ix + 1, iy), tx);
        let bottom = cosine_interpolate(self.corner(ix, iy + 1), self.corner(ix + 1, iy + 1), tx);
        cosine_interpolate(top, bottom, ty) * 2.0 - 1.0
    }
}

/// `a·(1 − f) + b·f` with `f = (1 − cos(t·π)) / 2`.
#[inline]
pub fn cosine_interpolate(a: f64, b: f64, t: f64) -> f64 {
    let f = (1.0 - (t * PI).cos()) * 0.5;
    a * (1.0 - f) + b * f
}

impl NoiseFn<f64, 2> for ValueKernel {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.evaluate(point[0], point[1])
    }
}
