// src/sim/sim_engine.rs
use crate::error::{validation::*, ChaosResult};
use crate::math_utils::Timer;
use crate::models::lorenz63::{Lorenz63, Lorenz63Params, PROTO_STATE};
use crate::models::lorenz96::{Lorenz96, Lorenz96Params};
use crate::models::model::Dynamics;
use crate::rng::DEFAULT_SEED;
use crate::sim::ensemble::perturbed_ensemble;
use crate::sim::grid::{TimeGrid, DEFAULT_SAMPLES_PER_UNIT_TIME};
use crate::sim::trajectory::Trajectory;
use crate::solvers::{OdeIntegrator, Scheme};
use ndarray::{Array1, Array2, ArrayView2};
use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, warn};

/// Resolution and scheme shared by both systems
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub samples_per_unit_time: f64,
    pub scheme: Scheme,
    /// Upper bound on a single internal solver step
    pub max_step: f64,
    pub rtol: f64,
    pub atol: f64,
    /// Integrate ensemble members on the rayon pool
    pub parallel: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            samples_per_unit_time: DEFAULT_SAMPLES_PER_UNIT_TIME,
            scheme: Scheme::Dopri5,
            max_step: 0.01,
            rtol: 1e-8,
            atol: 1e-8,
            parallel: true,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> ChaosResult<()> {
        validate_finite("samples_per_unit_time", self.samples_per_unit_time)?;
        validate_positive("samples_per_unit_time", self.samples_per_unit_time)?;
        validate_finite("max_step", self.max_step)?;
        validate_positive("max_step", self.max_step)?;
        validate_positive("rtol", self.rtol)?;
        validate_positive("atol", self.atol)?;
        Ok(())
    }

    pub fn time_grid(&self, t_end: f64) -> ChaosResult<TimeGrid> {
        TimeGrid::new(t_end, self.samples_per_unit_time)
    }

    pub fn integrator(&self) -> OdeIntegrator {
        OdeIntegrator::new(self.scheme, self.rtol, self.atol, self.max_step)
    }
}

/// Ensemble run of the Lorenz-63 system
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Lorenz63Config {
    pub params: Lorenz63Params,
    pub proto: [f64; 3],
    pub ensemble_size: usize,
    pub epsilon: f64,
    pub t_end: f64,
    pub seed: u64,
    pub grid: GridConfig,
}

impl Default for Lorenz63Config {
    fn default() -> Self {
        Lorenz63Config {
            params: Lorenz63Params::default(),
            proto: PROTO_STATE,
            ensemble_size: 2,
            epsilon: 0.01,
            t_end: 1.0,
            seed: DEFAULT_SEED,
            grid: GridConfig::default(),
        }
    }
}

impl Lorenz63Config {
    /// Validate the run configuration
    pub fn validate(&self) -> ChaosResult<()> {
        self.params.validate()?;
        for value in self.proto {
            validate_finite("proto", value)?;
        }
        validate_ensemble_size(self.ensemble_size)?;
        validate_finite("epsilon", self.epsilon)?;
        validate_non_negative("epsilon", self.epsilon)?;
        validate_finite("t_end", self.t_end)?;
        validate_non_negative("t_end", self.t_end)?;
        self.grid.validate()
    }
}

/// Single-trajectory run of the Lorenz-96 system
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Lorenz96Config {
    pub params: Lorenz96Params,
    pub epsilon: f64,
    pub t_end: f64,
    /// Damp components above this magnitude before each output interval
    pub clip_threshold: Option<f64>,
    pub grid: GridConfig,
}

impl Default for Lorenz96Config {
    fn default() -> Self {
        Lorenz96Config {
            params: Lorenz96Params::default(),
            epsilon: 0.01,
            t_end: 5.0,
            clip_threshold: None,
            grid: GridConfig::default(),
        }
    }
}

impl Lorenz96Config {
    /// Validate the run configuration
    pub fn validate(&self) -> ChaosResult<()> {
        self.params.validate()?;
        validate_finite("epsilon", self.epsilon)?;
        validate_finite("t_end", self.t_end)?;
        validate_non_negative("t_end", self.t_end)?;
        if let Some(threshold) = self.clip_threshold {
            validate_positive("clip_threshold", threshold)?;
        }
        self.grid.validate()
    }
}

/// Result of one Lorenz-63 request, handed straight to the renderer
#[derive(Clone, Debug)]
pub struct Lorenz63Run {
    pub config: Lorenz63Config,
    pub initial: Array2<f64>,
    pub trajectory: Trajectory,
}

/// Result of one Lorenz-96 request, handed straight to the renderer
#[derive(Clone, Debug)]
pub struct Lorenz96Run {
    pub config: Lorenz96Config,
    pub initial: Array1<f64>,
    pub trajectory: Trajectory,
}

/// Integrate every row of `initial` over `grid`.
///
/// The result is indexed `[member, time step, component]` and is identical
/// whether members run sequentially or on the rayon pool.
pub fn integrate_ensemble<D: Dynamics>(
    dynamics: &D,
    initial: ArrayView2<'_, f64>,
    grid: &TimeGrid,
    cfg: &GridConfig,
) -> ChaosResult<Trajectory> {
    cfg.validate()?;
    validate_ensemble_size(initial.nrows())?;
    validate_dimension(dynamics.dim(), initial.ncols())?;

    let members = integrate_members(
        &cfg.integrator(),
        dynamics,
        initial,
        grid,
        cfg.parallel,
    );

    let trajectory = Trajectory::from_members(grid, members);
    if !trajectory.is_finite() {
        warn!(
            members = trajectory.members(),
            t_end = grid.t_end(),
            "trajectory left the representable range"
        );
    }
    Ok(trajectory)
}

fn integrate_members<D: Dynamics>(
    integrator: &OdeIntegrator,
    dynamics: &D,
    initial: ArrayView2<'_, f64>,
    grid: &TimeGrid,
    parallel: bool,
) -> Vec<Array2<f64>> {
    debug!(
        scheme = integrator.scheme.name(),
        members = initial.nrows(),
        samples = grid.len(),
        parallel,
        "integrating ensemble"
    );
    if parallel && initial.nrows() > 1 {
        (0..initial.nrows())
            .into_par_iter()
            .map(|n| integrator.integrate(dynamics, initial.row(n), grid))
            .collect()
    } else {
        initial
            .outer_iter()
            .map(|x0| integrator.integrate(dynamics, x0, grid))
            .collect()
    }
}

/// Perturb the proto state, then integrate the whole Lorenz-63 ensemble.
pub fn run_lorenz63(cfg: &Lorenz63Config) -> ChaosResult<Lorenz63Run> {
    cfg.validate()?;
    let timer = Timer::new();

    let model = Lorenz63::new(cfg.params)?;
    let proto = Array1::from(cfg.proto.to_vec());
    Lorenz63::check_state(proto.view())?;
    let initial = perturbed_ensemble(proto.view(), cfg.epsilon, cfg.ensemble_size, cfg.seed)?;
    let grid = cfg.grid.time_grid(cfg.t_end)?;
    let trajectory = integrate_ensemble(&model, initial.view(), &grid, &cfg.grid)?;

    debug!(
        sigma = cfg.params.sigma,
        beta = cfg.params.beta,
        rho = cfg.params.rho,
        members = cfg.ensemble_size,
        elapsed_ms = timer.elapsed_ms(),
        "lorenz-63 run complete"
    );
    Ok(Lorenz63Run {
        config: cfg.clone(),
        initial,
        trajectory,
    })
}

/// Integrate Lorenz-96 from rest with a single bump of size ε at index 0.
pub fn run_lorenz96(cfg: &Lorenz96Config) -> ChaosResult<Lorenz96Run> {
    cfg.validate()?;
    let timer = Timer::new();

    let mut model = Lorenz96::new(cfg.params)?;
    if let Some(threshold) = cfg.clip_threshold {
        model = model.with_clip_threshold(threshold)?;
    }
    let initial = model.perturbed_rest_state(cfg.epsilon);
    let grid = cfg.grid.time_grid(cfg.t_end)?;
    let stacked = initial.clone().insert_axis(ndarray::Axis(0));
    let trajectory = integrate_ensemble(&model, stacked.view(), &grid, &cfg.grid)?;

    debug!(
        m = cfg.params.m,
        forcing = cfg.params.forcing,
        samples = grid.len(),
        elapsed_ms = timer.elapsed_ms(),
        "lorenz-96 run complete"
    );
    Ok(Lorenz96Run {
        config: cfg.clone(),
        initial,
        trajectory,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_validate() {
        assert!(Lorenz63Config::default().validate().is_ok());
        assert!(Lorenz96Config::default().validate().is_ok());
    }

    #[test]
    fn test_grid_defaults_match_integrator_defaults() {
        assert_eq!(GridConfig::default().integrator(), OdeIntegrator::default());
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let cfg = Lorenz63Config {
            ensemble_size: 0,
            ..Default::default()
        };
        assert!(run_lorenz63(&cfg).is_err());

        let cfg = Lorenz63Config {
            t_end: -1.0,
            ..Default::default()
        };
        assert!(run_lorenz63(&cfg).is_err());

        let cfg = Lorenz96Config {
            params: Lorenz96Params { m: 2, forcing: 8.0 },
            ..Default::default()
        };
        assert!(run_lorenz96(&cfg).is_err());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let grid = TimeGrid::new(0.1, 100.0).unwrap();
        let initial = Array2::<f64>::zeros((2, 4));
        let result = integrate_ensemble(
            &Lorenz63::default(),
            initial.view(),
            &grid,
            &GridConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let parallel = Lorenz63Config {
            ensemble_size: 6,
            t_end: 2.0,
            ..Default::default()
        };
        let sequential = Lorenz63Config {
            grid: GridConfig {
                parallel: false,
                ..GridConfig::default()
            },
            ..parallel.clone()
        };

        let a = run_lorenz63(&parallel).unwrap();
        let b = run_lorenz63(&sequential).unwrap();
        assert_eq!(a.trajectory.states(), b.trajectory.states());
    }

    #[test]
    fn test_trajectory_shape() {
        let cfg = Lorenz63Config {
            ensemble_size: 3,
            t_end: 0.5,
            ..Default::default()
        };
        let run = run_lorenz63(&cfg).unwrap();
        assert_eq!(run.trajectory.members(), 3);
        assert_eq!(run.trajectory.steps(), 51);
        assert_eq!(run.trajectory.dim(), 3);
        assert_eq!(run.trajectory.at_step(0), run.initial);
    }

    #[test]
    fn test_clip_threshold_reaches_the_run() {
        let clipped = Lorenz96Config {
            epsilon: 50.0,
            t_end: 0.5,
            clip_threshold: Some(30.0),
            ..Default::default()
        };
        let damped_start = Lorenz96Config {
            epsilon: 5.0,
            ..clipped.clone()
        };

        let a = run_lorenz96(&clipped).unwrap();
        let b = run_lorenz96(&damped_start).unwrap();

        assert_eq!(a.trajectory.state(0, 0)[0], 50.0);
        for k in 1..a.trajectory.steps() {
            assert_eq!(a.trajectory.state(0, k), b.trajectory.state(0, k));
        }
    }

    #[test]
    fn test_invalid_clip_threshold_rejected() {
        let cfg = Lorenz96Config {
            clip_threshold: Some(0.0),
            ..Default::default()
        };
        assert!(run_lorenz96(&cfg).is_err());
    }
}
