//! Per-thread random sampling.
//!
//! `Pcg32` is a PCG-XSH-RR generator: 64 bits of LCG state, 32-bit output
//! permuted by an xorshift and a random rotation. Each render worker owns
//! one instance, selected by a distinct stream (increment), so no two
//! workers draw correlated sequences.

use rand::{RngCore, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const PCG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;

/// Odd constant used to spread time-derived seeds across the state space.
const SEED_SPREAD: u64 = 9_600_629_759_793_949_339;

/// 2^-24: maps the top 24 bits of a draw onto [0, 1).
const F32_SCALE: f32 = 1.0 / 16_777_216.0;

/// Process-wide stream counter for time-seeded samplers.
static NEXT_STREAM: AtomicU64 = AtomicU64::new(0);

/// Permuted congruential generator (PCG32).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pcg32 {
    state: u64,
    increment: u64,
}

impl Pcg32 {
    /// Create a generator from an initial state and a stream selector.
    ///
    /// Generators sharing a seed but with different streams produce
    /// unrelated sequences.
    pub fn new(seed: u64, stream: u64) -> Self {
        let mut rng = Self {
            state: 0,
            increment: (stream << 1) | 1,
        };
        rng.step();
        rng.state = rng.state.wrapping_add(seed);
        rng.step();
        rng
    }

    /// Create a generator seeded from the wall clock.
    ///
    /// The stream comes from a process-wide counter, so two calls in the
    /// same microsecond still yield distinct sequences.
    pub fn from_time() -> Self {
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_micros() as u64)
            .unwrap_or(0);
        let stream = NEXT_STREAM.fetch_add(1, Ordering::SeqCst);
        Self::new(SEED_SPREAD.wrapping_mul(micros | 1), stream)
    }

    #[inline]
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(PCG_MULTIPLIER)
            .wrapping_add(self.increment);
    }

    /// Next uniformly distributed 32-bit integer.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.step();
        let xor_shifted = (((old >> 18) ^ old) >> 27) as u32;
        let rotation = (old >> 59) as u32;
        xor_shifted.rotate_right(rotation)
    }

    /// Uniform integer in `[0, bound)` without modulo bias.
    ///
    /// Draws below `2^32 mod bound` are rejected so every residue is
    /// equally likely. `bound` must be non-zero.
    pub fn next_bounded(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0, "bound must be non-zero");
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let draw = Pcg32::next_u32(self);
            if draw >= threshold {
                return draw % bound;
            }
        }
    }

    /// Next uniformly distributed float in [0, 1).
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        unit_f32(self.next_u32())
    }
}

impl RngCore for Pcg32 {
    fn next_u32(&mut self) -> u32 {
        Pcg32::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(Pcg32::next_u32(self));
        let lo = u64::from(Pcg32::next_u32(self));
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = Pcg32::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Pcg32 {
    /// 8 bytes of state followed by 8 bytes of stream selector (little endian).
    type Seed = [u8; 16];

    fn from_seed(seed: Self::Seed) -> Self {
        let mut state = [0u8; 8];
        let mut stream = [0u8; 8];
        state.copy_from_slice(&seed[..8]);
        stream.copy_from_slice(&seed[8..]);
        Self::new(u64::from_le_bytes(state), u64::from_le_bytes(stream))
    }
}

/// Convert a 32-bit draw to a float in [0, 1) using its top 24 bits.
#[inline]
fn unit_f32(bits: u32) -> f32 {
    (bits >> 8) as f32 * F32_SCALE
}

/// Generate a random f32 in [0.0, 1.0) from any generator.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    unit_f32(rng.next_u32())
}
