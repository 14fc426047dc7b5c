//! Seeded pseudo-random stream.
//!
//! A linear congruential recurrence `s = (s·9301 + 49297) mod 233280`.
//! Every random choice in a generation request (gradient permutation,
//! white-noise table, value-noise lattice) is drawn from one of these, so
//! the same seed reproduces the same image on every platform. The state
//! stays below 233280, so the arithmetic is exact in `u64`.

const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233_280;

#[derive(Debug, Clone)]
pub struct SeededPrng {
    state: u64,
}

impl SeededPrng {
    /// Negative seeds are folded into `[0, 233280)` first.
    pub fn new(seed: i64) -> Self {
        Self { state: seed.rem_euclid(MODULUS as i64) as u64 }
    }

    /// Next draw in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER + INCREMENT) % MODULUS;
        self.state as f64 / MODULUS as f64
    }

    /// Next draw mapped to `[-1, 1)`.
    #[inline]
    pub fn next_signed(&mut self) -> f64 {
        self.next_f64() * 2.0 - 1.0
    }
}

impl From<u32> for SeededPrng {
    fn from(seed: u32) -> Self {
        Self::new(seed as i64)
    }
}
