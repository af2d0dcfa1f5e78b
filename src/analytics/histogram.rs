// src/analytics/histogram.rs
//! Histograms of State Components
//!
//! Pools every sample of one component (all members, all time steps) into
//! equal-width bins spanning the observed range. Non-finite samples, which a
//! diverging run may produce, are counted separately instead of binned.

use crate::error::{ChaosError, ChaosResult};
use crate::sim::trajectory::Trajectory;
use statrs::statistics::Statistics;

#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    /// `bins + 1` increasing bin edges
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    /// Samples left out because they were NaN or infinite
    pub skipped: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl Histogram {
    pub fn from_samples<I>(samples: I, bins: usize) -> ChaosResult<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        if bins == 0 {
            return Err(ChaosError::InvalidConfiguration {
                field: "bins".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        let mut finite = Vec::new();
        let mut skipped = 0;
        for value in samples {
            if value.is_finite() {
                finite.push(value);
            } else {
                skipped += 1;
            }
        }
        if finite.is_empty() {
            return Err(ChaosError::InvalidConfiguration {
                field: "samples".to_string(),
                reason: "no finite samples to bin".to_string(),
            });
        }

        let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins)
            .map(|i| if i == bins { hi } else { lo + width * i as f64 })
            .collect();

        let mut counts = vec![0; bins];
        for &value in &finite {
            let idx = (((value - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let mean = finite.iter().mean();
        let std_dev = if finite.len() > 1 {
            finite.iter().std_dev()
        } else {
            0.0
        };

        Ok(Histogram {
            edges,
            counts,
            skipped,
            mean,
            std_dev,
        })
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn bin_centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|e| 0.5 * (e[0] + e[1])).collect()
    }

    /// Counts normalised so the histogram integrates to one.
    pub fn density(&self) -> Vec<f64> {
        let total = self.total() as f64;
        self.edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(e, &c)| c as f64 / (total * (e[1] - e[0])))
            .collect()
    }
}

/// Histogram of component `i` pooled over members and time steps.
pub fn component_histogram(
    trajectory: &Trajectory,
    component: usize,
    bins: usize,
) -> ChaosResult<Histogram> {
    if component >= trajectory.dim() {
        return Err(ChaosError::InvalidConfiguration {
            field: "component".to_string(),
            reason: format!(
                "index {} out of range for {}-dimensional state",
                component,
                trajectory.dim()
            ),
        });
    }
    Histogram::from_samples(trajectory.component(component).iter().copied(), bins)
}

/// Histogram of every component pooled together.
///
/// Suited to Lorenz-96, whose components are statistically interchangeable.
pub fn pooled_histogram(trajectory: &Trajectory, bins: usize) -> ChaosResult<Histogram> {
    Histogram::from_samples(trajectory.states().iter().copied(), bins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_counts_and_edges() {
        let hist = Histogram::from_samples(vec![0.0, 1.0, 2.0, 3.0, 4.0], 4).unwrap();
        assert_eq!(hist.edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(hist.counts, vec![1, 1, 1, 2]);
        assert_eq!(hist.total(), 5);
        assert_abs_diff_eq!(hist.mean, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hist.std_dev, 2.5f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_density_integrates_to_one() {
        let samples: Vec<f64> = (0..1000).map(|i| (i as f64 * 0.37).sin()).collect();
        let hist = Histogram::from_samples(samples, 17).unwrap();
        let width = hist.edges[1] - hist.edges[0];
        let integral: f64 = hist.density().iter().map(|d| d * width).sum();
        assert_abs_diff_eq!(integral, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_non_finite_samples_skipped() {
        let hist = Histogram::from_samples(vec![1.0, f64::NAN, f64::INFINITY, 1.0], 3).unwrap();
        assert_eq!(hist.skipped, 2);
        assert_eq!(hist.total(), 2);
        assert_eq!(hist.edges[0], 0.5);
        assert_eq!(hist.edges[3], 1.5);
    }

    #[test]
    fn test_rejects_degenerate_inputs() {
        assert!(Histogram::from_samples(vec![1.0], 0).is_err());
        assert!(Histogram::from_samples(vec![f64::NAN], 4).is_err());
    }
}
