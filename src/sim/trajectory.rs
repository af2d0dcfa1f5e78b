// src/sim/trajectory.rs
use super::grid::TimeGrid;
use ndarray::{Array2, Array3, ArrayView1, ArrayView2, Axis};

/// States of one or more ensemble members on a shared time grid.
///
/// `states` is indexed `[member, time step, component]`; `states[[n, 0, ..]]`
/// is always the initial state of member `n`.
#[derive(Clone, Debug)]
pub struct Trajectory {
    times: Vec<f64>,
    states: Array3<f64>,
}

impl Trajectory {
    /// Stack per-member `[time step, component]` arrays.
    pub(crate) fn from_members(grid: &TimeGrid, members: Vec<Array2<f64>>) -> Self {
        let steps = grid.len();
        let dim = members.first().map_or(0, |m| m.ncols());
        let mut states = Array3::zeros((members.len(), steps, dim));
        for (n, member) in members.iter().enumerate() {
            states.index_axis_mut(Axis(0), n).assign(member);
        }
        Trajectory {
            times: grid.times().to_vec(),
            states,
        }
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &Array3<f64> {
        &self.states
    }

    pub fn members(&self) -> usize {
        self.states.len_of(Axis(0))
    }

    pub fn steps(&self) -> usize {
        self.states.len_of(Axis(1))
    }

    pub fn dim(&self) -> usize {
        self.states.len_of(Axis(2))
    }

    /// `[time step, component]` view of one member
    pub fn member(&self, n: usize) -> ArrayView2<'_, f64> {
        self.states.index_axis(Axis(0), n)
    }

    /// `[member, component]` view at one time step
    pub fn at_step(&self, k: usize) -> ArrayView2<'_, f64> {
        self.states.index_axis(Axis(1), k)
    }

    pub fn final_states(&self) -> ArrayView2<'_, f64> {
        self.at_step(self.steps() - 1)
    }

    /// `[member, time step]` view of one state component
    pub fn component(&self, i: usize) -> ArrayView2<'_, f64> {
        self.states.index_axis(Axis(2), i)
    }

    /// State of member `n` at step `k`
    pub fn state(&self, n: usize, k: usize) -> ArrayView1<'_, f64> {
        self.member(n).index_axis_move(Axis(0), k)
    }

    pub fn is_finite(&self) -> bool {
        self.states.iter().all(|v| v.is_finite())
    }
}
