// src/sim/ensemble.rs
//! Ensemble Initial Conditions
//!
//! Each member is the proto state plus independent Gaussian noise:
//! ```text
//! x₀[n, i] = proto[i] + ε · z[n, i],   z[n, i] ~ N(0, 1)
//! ```
//! Draws come from a single RNG seeded once, consumed member by member, so a
//! given `(seed, N)` always reproduces the same ensemble bit for bit.

use crate::error::{validation::*, ChaosResult};
use crate::rng;
use ndarray::{Array2, ArrayView1};

/// Build `members` perturbed copies of `proto`, shaped `[member, component]`.
pub fn perturbed_ensemble(
    proto: ArrayView1<'_, f64>,
    epsilon: f64,
    members: usize,
    seed: u64,
) -> ChaosResult<Array2<f64>> {
    validate_ensemble_size(members)?;
    validate_finite("epsilon", epsilon)?;
    validate_non_negative("epsilon", epsilon)?;

    let dim = proto.len();
    let mut rng = rng::seed_rng_from_u64(seed);
    let mut noise = vec![0.0; members * dim];
    rng::fill_normal(&mut rng, &mut noise);

    let mut ensemble = Array2::zeros((members, dim));
    for (n, mut row) in ensemble.outer_iter_mut().enumerate() {
        for i in 0..dim {
            row[i] = proto[i] + epsilon * noise[n * dim + i];
        }
    }
    Ok(ensemble)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_zero_epsilon_copies_proto() {
        let proto = array![-6.1, 1.2, 32.5];
        let ensemble = perturbed_ensemble(proto.view(), 0.0, 4, 1).unwrap();
        for row in ensemble.outer_iter() {
            assert_eq!(row, proto);
        }
    }

    #[test]
    fn test_larger_ensemble_extends_smaller_one() {
        let proto = array![-6.1, 1.2, 32.5];
        let small = perturbed_ensemble(proto.view(), 0.01, 3, 1).unwrap();
        let large = perturbed_ensemble(proto.view(), 0.01, 5, 1).unwrap();
        assert_eq!(large.slice(ndarray::s![..3, ..]), small);
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let proto = array![0.0, 0.0, 0.0];
        assert!(perturbed_ensemble(proto.view(), 0.01, 0, 1).is_err());
        assert!(perturbed_ensemble(proto.view(), -0.01, 2, 1).is_err());
        assert!(perturbed_ensemble(proto.view(), f64::NAN, 2, 1).is_err());
    }
}
