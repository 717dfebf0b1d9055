#![forbid(unsafe_code)]

//! Tiny deterministic PRNG for timing jitter.

use std::time::Duration;

/// xorshift64 generator. Not for anything security-sensitive.
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Seeded generator. Zero is remapped, since xorshift never leaves it.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform duration in `[base, base + spread)` at millisecond
    /// granularity. A zero spread always yields `base`.
    pub fn jitter(&mut self, base: Duration, spread: Duration) -> Duration {
        let spread_ms = spread.as_millis() as u64;
        if spread_ms == 0 {
            return base;
        }
        base + Duration::from_millis(self.next_u64() % spread_ms)
    }
}
