// src/analytics/growth.rs
//! Growth of Small Perturbations
//!
//! Member 0 of an ensemble is taken as the control run and every other member
//! as a perturbed twin. For a chaotic flow their separation grows roughly as
//! ```text
//! d(t) ≈ d(0) · exp(λ t)
//! ```
//! until it saturates at the size of the attractor. `λ` is estimated by a
//! least-squares fit of `ln d` against `t` over the pre-saturation samples.

use crate::error::{ChaosError, ChaosResult};
use crate::math_utils::{euclidean_distance, linear_fit};
use crate::sim::trajectory::Trajectory;
use ndarray::{Array1, Array2, Axis};

#[derive(Clone, Debug)]
pub struct PerturbationGrowth {
    pub times: Vec<f64>,
    /// `[twin, time step]` distance of member `twin + 1` from member 0
    pub distances: Array2<f64>,
    /// Average of `distances` over twins, per time step
    pub mean_distance: Array1<f64>,
}

impl PerturbationGrowth {
    pub fn from_trajectory(trajectory: &Trajectory) -> ChaosResult<Self> {
        let members = trajectory.members();
        if members < 2 {
            return Err(ChaosError::InvalidConfiguration {
                field: "ensemble_size".to_string(),
                reason: "perturbation growth needs at least two members".to_string(),
            });
        }

        let steps = trajectory.steps();
        let control = trajectory.member(0);
        let mut distances = Array2::zeros((members - 1, steps));
        for twin in 1..members {
            let perturbed = trajectory.member(twin);
            for k in 0..steps {
                let a = control.row(k);
                let b = perturbed.row(k);
                distances[[twin - 1, k]] = euclidean_distance(&a.to_vec(), &b.to_vec());
            }
        }
        let mean_distance = distances
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(steps));

        Ok(PerturbationGrowth {
            times: trajectory.times().to_vec(),
            distances,
            mean_distance,
        })
    }

    /// Separation at the last sample relative to the first.
    ///
    /// `None` when the members start on top of each other (ε = 0), since no
    /// finite ratio exists then.
    pub fn amplification(&self) -> Option<f64> {
        let n = self.mean_distance.len();
        if n == 0 {
            return None;
        }
        let (first, last) = (self.mean_distance[0], self.mean_distance[n - 1]);
        if first > 0.0 {
            Some(last / first)
        } else {
            None
        }
    }

    /// Exponential growth rate of the mean separation, using only samples
    /// below `ceiling` (pass `f64::INFINITY` to use them all).
    pub fn growth_rate(&self, ceiling: f64) -> Option<f64> {
        growth_rate(&self.times, self.mean_distance.as_slice()?, ceiling)
    }
}

/// Fit `ln d = λ t + c` over finite, positive samples with `d < ceiling`.
///
/// Stops at the first sample that reaches `ceiling`, so the fit never mixes
/// the growth phase with the saturated phase.
pub fn growth_rate(times: &[f64], distances: &[f64], ceiling: f64) -> Option<f64> {
    let mut t = Vec::new();
    let mut log_d = Vec::new();
    for (&ti, &di) in times.iter().zip(distances.iter()) {
        if di >= ceiling {
            break;
        }
        if di.is_finite() && di > 0.0 {
            t.push(ti);
            log_d.push(di.ln());
        }
    }
    linear_fit(&t, &log_d).map(|(slope, _)| slope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::TimeGrid;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_recovers_synthetic_rate() {
        let times: Vec<f64> = (0..50).map(|k| k as f64 * 0.1).collect();
        let distances: Vec<f64> = times.iter().map(|t| 0.01 * (0.9 * t).exp()).collect();
        let rate = growth_rate(&times, &distances, f64::INFINITY).unwrap();
        assert_relative_eq!(rate, 0.9, epsilon = 1e-9);
    }

    #[test]
    fn test_ceiling_cuts_saturation() {
        let times: Vec<f64> = (0..60).map(|k| k as f64 * 0.1).collect();
        let distances: Vec<f64> = times
            .iter()
            .map(|t| (0.01 * (1.5 * t).exp()).min(20.0))
            .collect();
        let rate = growth_rate(&times, &distances, 10.0).unwrap();
        assert_relative_eq!(rate, 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_too_few_samples() {
        assert!(growth_rate(&[0.0], &[1.0], f64::INFINITY).is_none());
        assert!(growth_rate(&[0.0, 1.0], &[0.0, 0.0], f64::INFINITY).is_none());
    }

    #[test]
    fn test_amplification_needs_initial_separation() {
        let grid = TimeGrid::linspace(1.0, 2).unwrap();
        let control = array![[0.0, 0.0], [1.0, 1.0]];
        let twin = array![[0.0, 0.0], [4.0, 5.0]];
        let coincident = Trajectory::from_members(&grid, vec![control.clone(), twin]);
        let growth = PerturbationGrowth::from_trajectory(&coincident).unwrap();
        assert_eq!(growth.amplification(), None);

        let shifted = array![[0.0, 0.5], [1.0, 3.0]];
        let separated = Trajectory::from_members(&grid, vec![control, shifted]);
        let growth = PerturbationGrowth::from_trajectory(&separated).unwrap();
        assert_relative_eq!(growth.amplification().unwrap(), 4.0, epsilon = 1e-12);
    }
}
