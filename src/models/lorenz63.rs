// src/models/lorenz63.rs
//! Lorenz-63 Convection Model
//!
//! # Mathematical Framework
//!
//! ```text
//! dx/dt = σ (y − x)
//! dy/dt = x (ρ − z) − y
//! dz/dt = x y − β z
//! ```
//!
//! Where:
//! - σ: Prandtl number
//! - ρ: Rayleigh number (relative to its critical value)
//! - β: Geometric aspect factor
//!
//! With the classical values σ = 10, β = 8/3, ρ = 28 the flow settles on the
//! butterfly-shaped strange attractor and nearby trajectories separate at an
//! exponential rate (leading Lyapunov exponent ≈ 0.9).
//!
//! # Fixed Points
//!
//! The origin is always stationary. For ρ > 1 two further fixed points exist:
//! ```text
//! C± = (±√(β(ρ−1)), ±√(β(ρ−1)), ρ − 1)
//! ```

use super::model::Dynamics;
use crate::error::{validation::*, ChaosResult};
use ndarray::{array, Array1, ArrayView1};
use serde::Deserialize;

/// Starting point of the classical demonstration, close to the attractor
pub const PROTO_STATE: [f64; 3] = [-6.1, 1.2, 32.5];

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Lorenz63Params {
    pub sigma: f64,
    pub beta: f64,
    pub rho: f64,
}

impl Default for Lorenz63Params {
    fn default() -> Self {
        Lorenz63Params {
            sigma: 10.0,
            beta: 8.0 / 3.0,
            rho: 28.0,
        }
    }
}

impl Lorenz63Params {
    pub fn validate(&self) -> ChaosResult<()> {
        validate_finite("sigma", self.sigma)?;
        validate_finite("beta", self.beta)?;
        validate_finite("rho", self.rho)?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Lorenz63 {
    pub params: Lorenz63Params,
}

impl Lorenz63 {
    pub fn new(params: Lorenz63Params) -> ChaosResult<Self> {
        params.validate()?;
        Ok(Lorenz63 { params })
    }

    /// Derivative of the state `[x, y, z]`.
    ///
    /// Defined for every real input; no clamping is applied, so extreme
    /// parameters simply produce extreme derivatives.
    pub fn dxdt(&self, state: [f64; 3]) -> [f64; 3] {
        let Lorenz63Params { sigma, beta, rho } = self.params;
        let [x, y, z] = state;
        [sigma * (y - x), x * (rho - z) - y, x * y - beta * z]
    }

    /// Stationary points of the flow. Only the origin is returned when ρ ≤ 1.
    pub fn fixed_points(&self) -> Vec<[f64; 3]> {
        let Lorenz63Params { beta, rho, .. } = self.params;
        let mut points = vec![[0.0, 0.0, 0.0]];
        let radius_sq = beta * (rho - 1.0);
        if radius_sq > 0.0 {
            let r = radius_sq.sqrt();
            points.push([r, r, rho - 1.0]);
            points.push([-r, -r, rho - 1.0]);
        }
        points
    }

    /// Check that a state has three components.
    pub fn check_state(state: ArrayView1<'_, f64>) -> ChaosResult<()> {
        validate_dimension(3, state.len())
    }
}

impl Default for Lorenz63 {
    fn default() -> Self {
        Lorenz63 {
            params: Lorenz63Params::default(),
        }
    }
}

impl Dynamics for Lorenz63 {
    fn dim(&self) -> usize {
        3
    }

    fn rhs(&self, x: ArrayView1<'_, f64>, _t: f64) -> Array1<f64> {
        debug_assert_eq!(x.len(), 3);
        let [dx, dy, dz] = self.dxdt([x[0], x[1], x[2]]);
        array![dx, dy, dz]
    }
}
