// src/analytics/ensemble_stats.rs
//! Ensemble Moments Over Time
//!
//! For an ensemble `E` of `N` members at each time step:
//! ```text
//! μ      = (1/N) Σₙ Eₙ
//! var    = (1/(N−1)) Σₙ (Eₙ − μ)²        (0 when N = 1)
//! mad    = (1/N) Σₙ |Eₙ − μ|
//! spread = √(mean over components of var)
//! rmse   = √(mean over components of (μ − x_ref)²)
//! skew   = mean over components of ((1/N) Σₙ (Eₙ − μ)³) / var^(3/2)
//! kurt   = mean over components of ((1/N) Σₙ (Eₙ − μ)⁴) / var² − 3
//! ```
//! `x_ref` is a reference trajectory, by default member 0, which plays the
//! role of the "truth" that the rest of the ensemble drifts away from.
//!
//! Skewness and kurtosis use the plain empirical third and fourth moments.
//! Components with zero variance are left out of their averages; when every
//! component is degenerate both are NaN. Kurtosis is reported in excess form,
//! so a Gaussian ensemble scores about 0.
//!
//! # Rank Histogram
//!
//! For each step and component, the rank of the reference is the number of
//! compared members strictly below it. A well-calibrated ensemble gives a
//! flat histogram of these ranks over time.

use crate::error::{validation::*, ChaosError, ChaosResult};
use crate::sim::trajectory::Trajectory;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

#[derive(Clone, Debug)]
pub struct EnsembleStats {
    /// `[time step, component]`
    pub mean: Array2<f64>,
    /// `[time step, component]`, unbiased
    pub variance: Array2<f64>,
    /// `[time step, component]`
    pub mad: Array2<f64>,
    /// Root-mean variance per time step
    pub spread: Array1<f64>,
    /// RMS error of the ensemble mean against the reference per time step
    pub rmse: Array1<f64>,
    /// Component-averaged skewness per time step
    pub skew: Array1<f64>,
    /// Component-averaged excess kurtosis per time step
    pub kurt: Array1<f64>,
    /// `[time step, component]` rank of the reference among the compared members
    pub ranks: Array2<usize>,
    /// Number of possible ranks (compared members + 1)
    pub rank_bins: usize,
}

impl EnsembleStats {
    /// Statistics with member 0 as the reference trajectory.
    ///
    /// Ranks compare member 0 against the other members only.
    pub fn from_trajectory(trajectory: &Trajectory) -> ChaosResult<Self> {
        Self::compute(trajectory, trajectory.member(0), Some(0))
    }

    /// Statistics against an explicit `[time step, component]` reference.
    pub fn against(trajectory: &Trajectory, reference: ArrayView2<'_, f64>) -> ChaosResult<Self> {
        Self::compute(trajectory, reference, None)
    }

    fn compute(
        trajectory: &Trajectory,
        reference: ArrayView2<'_, f64>,
        reference_member: Option<usize>,
    ) -> ChaosResult<Self> {
        let (members, steps, dim) = (trajectory.members(), trajectory.steps(), trajectory.dim());
        if members == 0 {
            return Err(ChaosError::InvalidConfiguration {
                field: "trajectory".to_string(),
                reason: "ensemble statistics need at least one member".to_string(),
            });
        }
        validate_dimension(steps, reference.nrows())?;
        validate_dimension(dim, reference.ncols())?;

        let mut mean = Array2::zeros((steps, dim));
        let mut variance = Array2::zeros((steps, dim));
        let mut mad = Array2::zeros((steps, dim));
        let mut spread = Array1::zeros(steps);
        let mut rmse = Array1::zeros(steps);
        let mut skew = Array1::zeros(steps);
        let mut kurt = Array1::zeros(steps);
        let mut ranks = Array2::zeros((steps, dim));

        for k in 0..steps {
            let ensemble = trajectory.at_step(k);
            let mu = ensemble
                .mean_axis(Axis(0))
                .unwrap_or_else(|| Array1::zeros(dim));
            let anomalies = &ensemble - &mu;

            let var = if members > 1 {
                anomalies.mapv(|a| a * a).sum_axis(Axis(0)) / (members - 1) as f64
            } else {
                Array1::zeros(dim)
            };
            let abs_dev = anomalies
                .mapv(f64::abs)
                .mean_axis(Axis(0))
                .unwrap_or_else(|| Array1::zeros(dim));
            let err = &mu - &reference.row(k);

            let (s, c) = shape_moments(anomalies.view(), var.view());
            skew[k] = s;
            kurt[k] = c;
            spread[k] = var.mean().unwrap_or(0.0).sqrt();
            rmse[k] = err.mapv(|e| e * e).mean().unwrap_or(0.0).sqrt();
            mean.row_mut(k).assign(&mu);
            variance.row_mut(k).assign(&var);
            mad.row_mut(k).assign(&abs_dev);

            for i in 0..dim {
                let truth = reference[[k, i]];
                ranks[[k, i]] = ensemble
                    .column(i)
                    .iter()
                    .enumerate()
                    .filter(|&(n, &v)| Some(n) != reference_member && v < truth)
                    .count();
            }
        }

        let compared = members - usize::from(reference_member.is_some());
        Ok(EnsembleStats {
            mean,
            variance,
            mad,
            spread,
            rmse,
            skew,
            kurt,
            ranks,
            rank_bins: compared + 1,
        })
    }

    /// Occurrences of each rank of the reference in component `i`, over all steps.
    pub fn rank_histogram(&self, i: usize) -> ChaosResult<Vec<usize>> {
        if i >= self.ranks.ncols() {
            return Err(ChaosError::InvalidConfiguration {
                field: "component".to_string(),
                reason: format!(
                    "index {} out of range for {}-dimensional state",
                    i,
                    self.ranks.ncols()
                ),
            });
        }
        let mut counts = vec![0; self.rank_bins];
        for &rank in self.ranks.column(i) {
            counts[rank] += 1;
        }
        Ok(counts)
    }

    /// Rank occurrences pooled over every step and component.
    pub fn pooled_rank_histogram(&self) -> Vec<usize> {
        let mut counts = vec![0; self.rank_bins];
        for &rank in self.ranks.iter() {
            counts[rank] += 1;
        }
        counts
    }
}

/// Component-averaged skewness and excess kurtosis of one step's anomalies.
fn shape_moments(anomalies: ArrayView2<'_, f64>, var: ArrayView1<'_, f64>) -> (f64, f64) {
    let mut skew_sum = 0.0;
    let mut kurt_sum = 0.0;
    let mut used = 0usize;
    for (column, &v) in anomalies.columns().into_iter().zip(var.iter()) {
        if !(v > 0.0) {
            continue;
        }
        let m3 = column.mapv(|a| a * a * a).mean().unwrap_or(0.0);
        let m4 = column.mapv(|a| a * a * a * a).mean().unwrap_or(0.0);
        skew_sum += m3 / v.powf(1.5);
        kurt_sum += m4 / (v * v) - 3.0;
        used += 1;
    }
    if used == 0 {
        (f64::NAN, f64::NAN)
    } else {
        (skew_sum / used as f64, kurt_sum / used as f64)
    }
}
