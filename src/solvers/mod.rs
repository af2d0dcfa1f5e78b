// src/solvers/mod.rs
//! Adaptive ODE integration on an output time grid.
//!
//! The stepping itself is done by the `ode_solvers` crate. This module adapts
//! a [`Dynamics`](crate::models::model::Dynamics) implementation to its
//! `System` trait, drives one solver run per grid interval and collects the
//! states into `[time step, component]` arrays.

pub mod ode;

use serde::Deserialize;

pub use ode::OdeIntegrator;

/// Embedded Runge-Kutta pair used for a run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Dormand-Prince 5(4)
    #[default]
    Dopri5,
    /// Dormand-Prince 8(5,3)
    Dop853,
}

impl Scheme {
    pub fn name(&self) -> &'static str {
        match self {
            Scheme::Dopri5 => "dopri5",
            Scheme::Dop853 => "dop853",
        }
    }
}
