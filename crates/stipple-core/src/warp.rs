//! Coordinate pre-distortion.
//!
//! Two auxiliary gradient kernels, decorrelated by seed offset, displace
//! each normalized sample point before it reaches the main noise pipeline.
use crate::kernel::GradientKernel;

/// Maximum displacement in normalized units.
pub const WARP_STRENGTH: f64 = 0.05;
/// Spatial scale at which the warp kernels are sampled.
pub const WARP_SCALE: f64 = 5.0;
const SEED_OFFSET_X: u32 = 100;
const SEED_OFFSET_Y: u32 = 200;

#[derive(Debug, Clone)]
pub struct DomainWarp {
    warp_x: GradientKernel,
    warp_y: GradientKernel,
}

impl DomainWarp {
    pub fn new(seed: u32) -> Self {
        Self {
            warp_x: GradientKernel::new(seed.wrapping_add(SEED_OFFSET_X)),
            warp_y: GradientKernel::new(seed.wrapping_add(SEED_OFFSET_Y)),
        }
    }

    /// Warp a normalized `(nx, ny)`; applied before frequency scaling.
    #[inline]
    pub fn apply(&self, nx: f64, ny: f64) -> (f64, f64) {
        let (sx, sy) = (nx * WARP_SCALE, ny * WARP_SCALE);
        let dx = self.warp_x.evaluate(sx, sy) * WARP_STRENGTH;
        let dy = self.warp_y.evaluate(sx, sy) * WARP_STRENGTH;
        (nx + dx, ny + dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displacement_bounded_by_strength() {
        let warp = DomainWarp::new(99);
        for r in 0..32 {
            for c in 0..32 {
                let (nx, ny) = (c as f64 / 32.0, r as f64 / 32.0);
                let (wx, wy) = warp.apply(nx, ny);
                assert!((wx - nx).abs() <= WARP_STRENGTH * 1.01, "x displacement too large");
                assert!((wy - ny).abs() <= WARP_STRENGTH * 1.01, "y displacement too large");
            }
        }
    }

    #[test]
    fn warp_moves_some_points() {
        let warp = DomainWarp::new(7);
        let moved = (1..64).any(|i| {
            let p = i as f64 / 64.0;
            let (wx, wy) = warp.apply(p, 1.0 - p);
            (wx - p).abs() > 1e-9 || (wy - (1.0 - p)).abs() > 1e-9
        });
        assert!(moved, "warp must displace at least one point");
    }

    #[test]
    fn axes_use_offset_seeds() {
        let warp = DomainWarp::new(42);
        let kx = GradientKernel::new(142);
        let ky = GradientKernel::new(242);
        let (wx, wy) = warp.apply(0.31, 0.67);
        assert_eq!(wx, 0.31 + kx.evaluate(0.31 * 5.0, 0.67 * 5.0) * WARP_STRENGTH);
        assert_eq!(wy, 0.67 + ky.evaluate(0.31 * 5.0, 0.67 * 5.0) * WARP_STRENGTH);
    }

    #[test]
    fn seed_offset_wraps_near_u32_max() {
        let warp = DomainWarp::new(u32::MAX);
        let (wx, wy) = warp.apply(0.5, 0.5);
        assert!(wx.is_finite() && wy.is_finite());
    }
}
