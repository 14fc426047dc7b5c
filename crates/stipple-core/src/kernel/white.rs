//! Uncorrelated per-pixel noise backed by a precomputed table.
use noise::NoiseFn;

use crate::error::{NoiseError, NoiseResult};
use crate::prng::SeededPrng;

/// `width × height` table of independent draws in [-1, 1), row-major.
///
/// `evaluate` treats its input as a normalized coordinate and returns the
/// entry of the pixel containing it. There is no interpolation and no
/// wrapping: coordinates outside `[0, 1)` read as 0.
#[derive(Debug, Clone)]
pub struct WhiteKernel {
    width: usize,
    height: usize,
    table: Vec<f64>,
}

impl WhiteKernel {
    pub fn new(seed: u32, width: u32, height: u32) -> NoiseResult<Self> {
        let (width, height) = (width as usize, height as usize);
        let n = width
            .checked_mul(height)
            .ok_or_else(|| NoiseError::render(format!("white-noise table {width}x{height} overflows")))?;

        let mut table = Vec::new();
        table
            .try_reserve_exact(n)
            .map_err(|e| NoiseError::render(format!("cannot allocate white-noise table: {e}")))?;

        let mut rng = SeededPrng::from(seed);
        table.extend((0..n).map(|_| rng.next_signed()));
        Ok(Self { width, height, table })
    }

    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let px = (x * self.width as f64).floor();
        let py = (y * self.height as f64).floor();
        if !(px >= 0.0 && py >= 0.0) || px >= self.width as f64 || py >= self.height as f64 {
            return 0.0;
        }
        self.table[py as usize * self.width + px as usize]
    }

    pub fn table(&self) -> &[f64] {
        &self.table
    }
}

impl NoiseFn<f64, 2> for WhiteKernel {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.evaluate(point[0], point[1])
    }
}
