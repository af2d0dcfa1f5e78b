// src/interactive/surface.rs
//! Parameter Surface
//!
//! Holds the current slider values of one system and a single change handler.
//! Every accepted change re-invokes the handler synchronously with the full
//! parameter set and hands its result back to the caller; nothing is cached
//! between calls.

use super::render::Renderer;
use super::slider::{SliderSet, SliderSpec};
use crate::error::ChaosResult;
use crate::sim::sim_engine::{
    run_lorenz63, run_lorenz96, Lorenz63Config, Lorenz63Run, Lorenz96Config, Lorenz96Run,
};
use tracing::info;

pub type ChangeHandler<P, O> = Box<dyn FnMut(&P) -> ChaosResult<O>>;

pub struct ParameterSurface<P: SliderSet, O> {
    params: P,
    handler: Option<ChangeHandler<P, O>>,
}

impl<P: SliderSet, O> ParameterSurface<P, O> {
    pub fn new(params: P) -> Self {
        ParameterSurface {
            params,
            handler: None,
        }
    }

    /// Register the handler run on every change, replacing any previous one.
    pub fn on_change<F>(&mut self, handler: F)
    where
        F: FnMut(&P) -> ChaosResult<O> + 'static,
    {
        self.handler = Some(Box::new(handler));
    }

    pub fn params(&self) -> &P {
        &self.params
    }

    pub fn sliders(&self) -> &'static [SliderSpec] {
        P::sliders()
    }

    /// Move one slider and recompute.
    pub fn set(&mut self, name: &str, value: f64) -> ChaosResult<Option<O>> {
        self.update(&[(name, value)])
    }

    /// Move several sliders at once, then recompute a single time.
    ///
    /// If any name is unknown no slider moves and the handler is not invoked.
    pub fn update(&mut self, changes: &[(&str, f64)]) -> ChaosResult<Option<O>> {
        let mut next = self.params.clone();
        for &(name, value) in changes {
            let applied = next.set(name, value)?;
            info!(slider = name, requested = value, applied, "parameter change");
        }
        self.params = next;
        self.refresh()
    }

    /// Re-run the handler with the current parameters.
    pub fn refresh(&mut self) -> ChaosResult<Option<O>> {
        match self.handler.as_mut() {
            Some(handler) => handler(&self.params).map(Some),
            None => Ok(None),
        }
    }
}

/// Lorenz-63 surface whose handler integrates the ensemble and renders it.
pub fn lorenz63_surface<R>(
    config: Lorenz63Config,
    mut renderer: R,
) -> ParameterSurface<Lorenz63Config, Lorenz63Run>
where
    R: Renderer + 'static,
{
    let mut surface = ParameterSurface::new(config);
    surface.on_change(move |params: &Lorenz63Config| {
        let run = run_lorenz63(params)?;
        renderer.render_lorenz63(&run)?;
        Ok(run)
    });
    surface
}

/// Lorenz-96 surface whose handler integrates the trajectory and renders it.
pub fn lorenz96_surface<R>(
    config: Lorenz96Config,
    mut renderer: R,
) -> ParameterSurface<Lorenz96Config, Lorenz96Run>
where
    R: Renderer + 'static,
{
    let mut surface = ParameterSurface::new(config);
    surface.on_change(move |params: &Lorenz96Config| {
        let run = run_lorenz96(params)?;
        renderer.render_lorenz96(&run)?;
        Ok(run)
    });
    surface
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_no_handler_means_no_result() {
        let mut surface: ParameterSurface<Lorenz63Config, ()> =
            ParameterSurface::new(Lorenz63Config::default());
        assert!(surface.set("rho", 20.0).unwrap().is_none());
        assert_eq!(surface.params().params.rho, 20.0);
    }

    #[test]
    fn test_handler_sees_every_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);

        let mut surface = ParameterSurface::new(Lorenz96Config::default());
        surface.on_change(move |p: &Lorenz96Config| {
            log.borrow_mut().push(p.params.forcing);
            Ok(p.params.m)
        });

        assert_eq!(surface.set("Force", 12.0).unwrap(), Some(40));
        assert_eq!(surface.update(&[("m", 10.0), ("Force", 4.0)]).unwrap(), Some(10));
        assert_eq!(*seen.borrow(), vec![12.0, 4.0]);
    }

    #[test]
    fn test_failed_update_leaves_parameters_untouched() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);

        let mut surface = ParameterSurface::new(Lorenz63Config::default());
        surface.on_change(move |_: &Lorenz63Config| {
            *counter.borrow_mut() += 1;
            Ok(())
        });

        assert!(surface.update(&[("sigma", 5.0), ("gamma", 1.0)]).is_err());
        assert_eq!(surface.params().params.sigma, 10.0);
        assert_eq!(*calls.borrow(), 0);
    }
}
