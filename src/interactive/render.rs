// src/interactive/render.rs
use crate::analytics::growth::PerturbationGrowth;
use crate::analytics::histogram::{component_histogram, pooled_histogram};
use crate::error::ChaosResult;
use crate::sim::sim_engine::{Lorenz63Run, Lorenz96Run};
use tracing::info;

/// Sink for freshly computed runs (plots, files, logs).
pub trait Renderer {
    fn render_lorenz63(&mut self, run: &Lorenz63Run) -> ChaosResult<()>;

    fn render_lorenz96(&mut self, run: &Lorenz96Run) -> ChaosResult<()>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render_lorenz63(&mut self, run: &Lorenz63Run) -> ChaosResult<()> {
        (**self).render_lorenz63(run)
    }

    fn render_lorenz96(&mut self, run: &Lorenz96Run) -> ChaosResult<()> {
        (**self).render_lorenz96(run)
    }
}

impl<A: Renderer, B: Renderer> Renderer for (A, B) {
    fn render_lorenz63(&mut self, run: &Lorenz63Run) -> ChaosResult<()> {
        self.0.render_lorenz63(run)?;
        self.1.render_lorenz63(run)
    }

    fn render_lorenz96(&mut self, run: &Lorenz96Run) -> ChaosResult<()> {
        self.0.render_lorenz96(run)?;
        self.1.render_lorenz96(run)
    }
}

/// Logs a one-line digest of each run through `tracing`.
#[derive(Clone, Debug)]
pub struct SummaryRenderer {
    pub bins: usize,
}

impl Default for SummaryRenderer {
    fn default() -> Self {
        SummaryRenderer { bins: 30 }
    }
}

impl Renderer for SummaryRenderer {
    fn render_lorenz63(&mut self, run: &Lorenz63Run) -> ChaosResult<()> {
        let trajectory = &run.trajectory;
        let (amplification, rate) = match PerturbationGrowth::from_trajectory(trajectory) {
            Ok(growth) => (
                growth.amplification().unwrap_or(f64::NAN),
                growth.growth_rate(f64::INFINITY),
            ),
            Err(_) => (f64::NAN, None),
        };
        let x_hist = component_histogram(trajectory, 0, self.bins).ok();

        info!(
            members = trajectory.members(),
            samples = trajectory.steps(),
            t_end = run.config.t_end,
            amplification,
            growth_rate = rate.unwrap_or(f64::NAN),
            x_mean = x_hist.as_ref().map_or(f64::NAN, |h| h.mean),
            x_std = x_hist.as_ref().map_or(f64::NAN, |h| h.std_dev),
            "lorenz-63 ensemble"
        );
        Ok(())
    }

    fn render_lorenz96(&mut self, run: &Lorenz96Run) -> ChaosResult<()> {
        let trajectory = &run.trajectory;
        let hist = pooled_histogram(trajectory, self.bins).ok();

        info!(
            m = run.config.params.m,
            forcing = run.config.params.forcing,
            samples = trajectory.steps(),
            t_end = run.config.t_end,
            mean = hist.as_ref().map_or(f64::NAN, |h| h.mean),
            std = hist.as_ref().map_or(f64::NAN, |h| h.std_dev),
            skipped = hist.as_ref().map_or(0, |h| h.skipped),
            "lorenz-96 trajectory"
        );
        Ok(())
    }
}
