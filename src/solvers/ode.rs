// src/solvers/ode.rs
//! Grid-Aligned Driver for `ode_solvers`
//!
//! # Output Instants
//!
//! Each grid interval `[t_k, t_{k+1}]` is one solver run in sparse output
//! mode. The last accepted step of a run is clipped to land on `t_{k+1}`, so
//! every stored sample sits exactly on its grid instant and no dense-output
//! interpolation is involved. Row 0 of the result is the initial state,
//! untouched.
//!
//! # Blow-up
//!
//! A state that overflows makes the error estimate non-finite, and the solver
//! then gives up with a step-size underflow (or step-count) error. That is a
//! legitimate outcome for an unstable configuration: the samples from that
//! interval on are left as NaN and a warning is logged.

use super::Scheme;
use crate::models::model::Dynamics;
use crate::sim::grid::TimeGrid;
use nalgebra::DVector;
use ndarray::{Array1, Array2, ArrayView1};
use ode_solvers::dop_shared::{IntegrationError, OutputType};
use ode_solvers::{Dop853, Dopri5, System};
use tracing::warn;

/// Step budget for a single grid interval
const MAX_STEPS_PER_INTERVAL: u32 = 100_000;
/// Accepted steps between stiffness checks
const STIFFNESS_CHECK: u32 = 1000;

/// Exposes a [`Dynamics`] right-hand side as an `ode_solvers` system.
struct OdeStepper<'a, D: ?Sized> {
    dynamics: &'a D,
}

impl<D: Dynamics + ?Sized> System<f64, DVector<f64>> for OdeStepper<'_, D> {
    fn system(&self, t: f64, y: &DVector<f64>, dy: &mut DVector<f64>) {
        let derivative = self.dynamics.rhs(ArrayView1::from(y.as_slice()), t);
        for (slot, value) in dy.iter_mut().zip(derivative.iter()) {
            *slot = *value;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OdeIntegrator {
    pub scheme: Scheme,
    pub rtol: f64,
    pub atol: f64,
    /// Upper bound on a single internal step
    pub max_step: f64,
}

impl Default for OdeIntegrator {
    fn default() -> Self {
        OdeIntegrator {
            scheme: Scheme::Dopri5,
            rtol: 1e-8,
            atol: 1e-8,
            max_step: 0.01,
        }
    }
}

impl OdeIntegrator {
    pub fn new(scheme: Scheme, rtol: f64, atol: f64, max_step: f64) -> Self {
        OdeIntegrator {
            scheme,
            rtol,
            atol,
            max_step,
        }
    }

    /// Carry `x` from `t0` to `t1`.
    pub fn advance<D: Dynamics + ?Sized>(
        &self,
        dynamics: &D,
        x: ArrayView1<'_, f64>,
        t0: f64,
        t1: f64,
    ) -> Result<Array1<f64>, IntegrationError> {
        let span = t1 - t0;
        if !(span > 0.0) {
            return Ok(x.to_owned());
        }

        let system = OdeStepper { dynamics };
        let y0 = DVector::from_iterator(x.len(), x.iter().copied());
        let h_max = self.max_step.min(span);

        let last = match self.scheme {
            Scheme::Dopri5 => {
                let mut stepper = Dopri5::from_param(
                    system,
                    t0,
                    t1,
                    span,
                    y0,
                    self.rtol,
                    self.atol,
                    0.9,
                    0.04,
                    0.2,
                    10.0,
                    h_max,
                    0.0,
                    MAX_STEPS_PER_INTERVAL,
                    STIFFNESS_CHECK,
                    OutputType::Sparse,
                );
                stepper.integrate()?;
                stepper.y_out().last().cloned()
            }
            Scheme::Dop853 => {
                let mut stepper = Dop853::from_param(
                    system,
                    t0,
                    t1,
                    span,
                    y0,
                    self.rtol,
                    self.atol,
                    0.9,
                    0.0,
                    0.333,
                    6.0,
                    h_max,
                    0.0,
                    MAX_STEPS_PER_INTERVAL,
                    STIFFNESS_CHECK,
                    OutputType::Sparse,
                );
                stepper.integrate()?;
                stepper.y_out().last().cloned()
            }
        };

        Ok(match last {
            Some(y) => Array1::from_iter(y.iter().copied()),
            None => x.to_owned(),
        })
    }

    /// States at every instant of `grid`, shaped `[time step, component]`.
    pub fn integrate<D: Dynamics + ?Sized>(
        &self,
        dynamics: &D,
        x0: ArrayView1<'_, f64>,
        grid: &TimeGrid,
    ) -> Array2<f64> {
        let mut out = Array2::from_elem((grid.len(), x0.len()), f64::NAN);
        out.row_mut(0).assign(&x0);

        let mut x = x0.to_owned();
        for (k, (t0, t1)) in grid.intervals().enumerate() {
            dynamics.guard(x.view_mut());
            match self.advance(dynamics, x.view(), t0, t1) {
                Ok(next) => {
                    out.row_mut(k + 1).assign(&next);
                    x = next;
                }
                Err(err) => {
                    warn!(
                        scheme = self.scheme.name(),
                        t = t0,
                        error = ?err,
                        "integration stopped, remaining samples left as NaN"
                    );
                    break;
                }
            }
        }
        out
    }
}
