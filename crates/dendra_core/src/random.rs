//! Random draws consumed by the growth rules.
//!
//! Rules never touch an RNG directly; they ask a [`UniformSource`]. In a run
//! that source is a `ChaCha8Rng` seeded per segment and per step, so the
//! draw sequence of a segment is reproducible whatever thread visits it.

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait UniformSource {
    /// Uniform draw in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Uniform draw in `[lo, hi)`.
    fn uniform_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.uniform()
    }

    /// Three independent draws in `[lo, hi)`, taken in x, y, z order.
    fn uniform_vec3(&mut self, lo: f64, hi: f64) -> DVec3 {
        let x = self.uniform_range(lo, hi);
        let y = self.uniform_range(lo, hi);
        let z = self.uniform_range(lo, hi);
        DVec3::new(x, y, z)
    }
}

impl UniformSource for ChaCha8Rng {
    fn uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Source returning the same value for every `uniform()` call.
///
/// `FixedUniform(0.0)` passes every probability gate, `FixedUniform(1.0)`
/// fails all of them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedUniform(pub f64);

impl UniformSource for FixedUniform {
    fn uniform(&mut self) -> f64 {
        self.0
    }
}

/// Seed for the stream of one segment during one step.
#[must_use]
pub fn segment_seed(world_seed: u64, step: u64, segment: usize) -> u64 {
    world_seed
        .wrapping_add(step)
        .wrapping_mul(0x517C_C1B7_2722_0A95)
        ^ (segment as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[must_use]
pub fn segment_rng(world_seed: u64, step: u64, segment: usize) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(segment_seed(world_seed, step, segment))
}
