// src/models/model.rs
use ndarray::{Array1, ArrayView1, ArrayViewMut1};

/// Right-hand side `f` of an autonomous or time-dependent ODE `dx/dt = f(x, t)`.
///
/// Implementations are pure: the derivative depends only on the state, the
/// time and the parameters held by `self`, and has the same length as `x`.
pub trait Dynamics: Sync {
    /// Number of state components
    fn dim(&self) -> usize;

    /// Evaluate the derivative at `(x, t)`
    fn rhs(&self, x: ArrayView1<'_, f64>, t: f64) -> Array1<f64>;

    /// Adjust a state in place before it is carried across one output
    /// interval. Most models leave it untouched.
    fn guard(&self, _x: ArrayViewMut1<'_, f64>) {}
}

impl<D: Dynamics + ?Sized> Dynamics for &D {
    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn rhs(&self, x: ArrayView1<'_, f64>, t: f64) -> Array1<f64> {
        (**self).rhs(x, t)
    }

    fn guard(&self, x: ArrayViewMut1<'_, f64>) {
        (**self).guard(x)
    }
}
