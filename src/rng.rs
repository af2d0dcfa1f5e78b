// src/rng.rs
//! Seeded Random Number Generation for Ensemble Initial Conditions
//!
//! # Reproducibility
//!
//! The only randomness in the crate is the Gaussian perturbation applied to
//! the proto state when an ensemble is built. Every draw comes from a
//! `StdRng` seeded with a fixed `u64`, so re-running with the same seed and
//! ensemble size yields bit-identical initial states.
//!
//! Draws are consumed in member-major order: member 0 takes the first `dim`
//! normals, member 1 the next `dim`, and so on. Growing the ensemble therefore
//! keeps the existing members unchanged.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Seed used when the caller does not pick one
pub const DEFAULT_SEED: u64 = 1;

pub fn seed_rng_from_u64(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn get_normal_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

/// Fill `out` with independent standard normal draws
pub fn fill_normal<R: Rng + ?Sized>(rng: &mut R, out: &mut [f64]) {
    for slot in out.iter_mut() {
        *slot = get_normal_draw(rng);
    }
}
