// src/sim/grid.rs
//! Output Time Grid
//!
//! Trajectories are sampled at `n` equally spaced instants on `[0, T]`:
//! ```text
//! n = ⌊samples_per_unit_time · T⌋ + 1
//! t_k = k · T / (n − 1)
//! ```
//! A zero-length span therefore yields the single instant `t = 0`, and the
//! trajectory consists of the initial state alone.

use crate::error::{validation::*, ChaosError, ChaosResult};

/// Default sampling density (samples per unit of model time)
pub const DEFAULT_SAMPLES_PER_UNIT_TIME: f64 = 100.0;

#[derive(Clone, Debug, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
}

impl TimeGrid {
    /// Grid on `[0, t_end]` with density `samples_per_unit_time`.
    pub fn new(t_end: f64, samples_per_unit_time: f64) -> ChaosResult<Self> {
        validate_finite("t_end", t_end)?;
        validate_non_negative("t_end", t_end)?;
        validate_finite("samples_per_unit_time", samples_per_unit_time)?;
        validate_positive("samples_per_unit_time", samples_per_unit_time)?;

        // The small slack keeps products such as 100 · 0.29 from flooring one short.
        let intervals = (samples_per_unit_time * t_end + 1e-9).floor();
        if intervals >= MAX_GRID_SAMPLES as f64 {
            return Err(ChaosError::InvalidConfiguration {
                field: "samples_per_unit_time".to_string(),
                reason: format!(
                    "grid of {} samples exceeds maximum allowed ({})",
                    intervals, MAX_GRID_SAMPLES
                ),
            });
        }
        Self::linspace(t_end, intervals as usize + 1)
    }

    /// `samples` equally spaced instants from 0 to `t_end` inclusive.
    pub fn linspace(t_end: f64, samples: usize) -> ChaosResult<Self> {
        validate_finite("t_end", t_end)?;
        validate_non_negative("t_end", t_end)?;
        if samples == 0 {
            return Err(ChaosError::InvalidConfiguration {
                field: "samples".to_string(),
                reason: "a time grid needs at least one sample".to_string(),
            });
        }
        if samples == 1 {
            return Ok(TimeGrid { times: vec![0.0] });
        }

        let last = (samples - 1) as f64;
        let mut times: Vec<f64> = (0..samples).map(|k| t_end * k as f64 / last).collect();
        times[samples - 1] = t_end;
        Ok(TimeGrid { times })
    }

    /// Grid from explicit instants; must start at 0 and be non-decreasing.
    pub fn from_times(times: Vec<f64>) -> ChaosResult<Self> {
        match times.first() {
            None => {
                return Err(ChaosError::InvalidConfiguration {
                    field: "times".to_string(),
                    reason: "a time grid needs at least one sample".to_string(),
                })
            }
            Some(&t0) if t0 != 0.0 => {
                return Err(ChaosError::InvalidParameters {
                    parameter: "times[0]".to_string(),
                    value: t0,
                    constraint: "grid must start at 0".to_string(),
                })
            }
            _ => {}
        }
        for (k, pair) in times.windows(2).enumerate() {
            validate_finite("times", pair[1])?;
            if pair[1] < pair[0] {
                return Err(ChaosError::InvalidParameters {
                    parameter: format!("times[{}]", k + 1),
                    value: pair[1],
                    constraint: "grid must be non-decreasing".to_string(),
                });
            }
        }
        Ok(TimeGrid { times })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn t_end(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Consecutive `(t_k, t_{k+1})` pairs.
    pub fn intervals(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_span_is_single_sample() {
        let grid = TimeGrid::new(0.0, DEFAULT_SAMPLES_PER_UNIT_TIME).unwrap();
        assert_eq!(grid.times(), &[0.0]);
        assert_eq!(grid.intervals().count(), 0);
    }

    #[test]
    fn test_density_sets_sample_count() {
        let grid = TimeGrid::new(2.0, 100.0).unwrap();
        assert_eq!(grid.len(), 201);
        assert_eq!(grid.t_end(), 2.0);
        assert!((grid.times()[1] - 0.01).abs() < 1e-15);

        let coarse = TimeGrid::new(0.29, 100.0).unwrap();
        assert_eq!(coarse.len(), 30);
    }

    #[test]
    fn test_short_span_keeps_endpoints() {
        let grid = TimeGrid::new(0.001, 1.0).unwrap();
        assert_eq!(grid.times(), &[0.0]);

        let grid = TimeGrid::linspace(0.001, 2).unwrap();
        assert_eq!(grid.times(), &[0.0, 0.001]);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(TimeGrid::new(-1.0, 100.0).is_err());
        assert!(TimeGrid::new(1.0, 0.0).is_err());
        assert!(TimeGrid::new(f64::INFINITY, 100.0).is_err());
        assert!(TimeGrid::new(1.0e9, 100.0).is_err());
        assert!(TimeGrid::linspace(1.0, 0).is_err());
        assert!(TimeGrid::from_times(vec![]).is_err());
        assert!(TimeGrid::from_times(vec![0.5, 1.0]).is_err());
        assert!(TimeGrid::from_times(vec![0.0, 1.0, 0.5]).is_err());
        assert!(TimeGrid::from_times(vec![0.0, 0.5, 1.0]).is_ok());
    }
}
