//! 2-D simplex gradient noise with a seed-derived permutation table.
//!
//! Output is continuous and roughly within [-1, 1]. The table is shuffled
//! with [`SeededPrng`], so two kernels built from the same seed are
//! bit-identical.
use noise::NoiseFn;

use crate::prng::SeededPrng;

// Skew / unskew factors for the 2-D simplex grid.
const F2: f64 = 0.366_025_403_784_438_6; // (sqrt(3) - 1) / 2
const G2: f64 = 0.211_324_865_405_187_1; // (3 - sqrt(3)) / 6

// Twelve gradient directions, indexed by `perm % 12`.
const GRAD2: [[f64; 2]; 12] = [
    [1.0, 1.0], [-1.0, 1.0], [1.0, -1.0], [-1.0, -1.0],
    [1.0, 0.0], [-1.0, 0.0], [1.0, 0.0], [-1.0, 0.0],
    [0.0, 1.0], [0.0, -1.0], [0.0, 1.0], [0.0, -1.0],
];

const TABLE_SIZE: usize = 512;

#[derive(Debug, Clone)]
pub struct GradientKernel {
    perm: [u8; TABLE_SIZE],
    grad: [[f64; 2]; TABLE_SIZE],
}

impl GradientKernel {
    pub fn new(seed: u32) -> Self {
        Self::from_prng(&mut SeededPrng::from(seed))
    }

    /// Build the doubled permutation table by a partial Fisher-Yates
    /// shuffle driven by `rng`.
    pub fn from_prng(rng: &mut SeededPrng) -> Self {
        let mut perm = [0u8; TABLE_SIZE];
        for (i, p) in perm.iter_mut().take(256).enumerate() {
            *p = i as u8;
        }
        for i in 0..255 {
            let r = i + (rng.next_f64() * (256 - i) as f64) as usize;
            perm.swap(i, r);
        }
        for i in 256..TABLE_SIZE {
            perm[i] = perm[i - 256];
        }
        let grad = std::array::from_fn(|i| GRAD2[perm[i] as usize % 12]);
        Self { perm, grad }
    }

    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        // Which of the two triangles of the skewed cell we are in.
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;

        let n0 = self.corner(ii + self.perm[jj] as usize, x0, y0);
        let n1 = self.corner(ii + i1 + self.perm[jj + j1] as usize, x1, y1);
        let n2 = self.corner(ii + 1 + self.perm[jj + 1] as usize, x2, y2);

        70.0 * (n0 + n1 + n2)
    }

    #[inline]
    fn corner(&self, gi: usize, x: f64, y: f64) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            return 0.0;
        }
        let [gx, gy] = self.grad[gi];
        let t2 = t * t;
        t2 * t2 * (gx * x + gy * y)
    }
}

impl NoiseFn<f64, 2> for GradientKernel {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.evaluate(point[0], point[1])
    }
}
