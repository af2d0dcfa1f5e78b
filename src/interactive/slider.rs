// src/interactive/slider.rs
use crate::error::{ChaosError, ChaosResult};
use crate::sim::sim_engine::{Lorenz63Config, Lorenz96Config};

/// Name and bounds of one slider
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderSpec {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    /// Integer sliders round to the nearest whole number
    pub integer: bool,
}

impl SliderSpec {
    pub const fn continuous(name: &'static str, min: f64, max: f64) -> Self {
        SliderSpec {
            name,
            min,
            max,
            integer: false,
        }
    }

    pub const fn integer(name: &'static str, min: f64, max: f64) -> Self {
        SliderSpec {
            name,
            min,
            max,
            integer: true,
        }
    }

    /// Bring `value` into range the way a slider widget would.
    pub fn clamp(&self, value: f64) -> ChaosResult<f64> {
        if value.is_nan() {
            return Err(ChaosError::InvalidParameters {
                parameter: self.name.to_string(),
                value,
                constraint: "slider value must be a number".to_string(),
            });
        }
        let clamped = value.clamp(self.min, self.max);
        Ok(if self.integer {
            clamped.round()
        } else {
            clamped
        })
    }
}

/// A parameter set driven by named sliders.
pub trait SliderSet: Clone {
    fn sliders() -> &'static [SliderSpec];

    fn value(&self, name: &str) -> Option<f64>;

    /// Store an already clamped value; `name` is known to be a slider.
    fn assign(&mut self, name: &str, value: f64);

    fn spec(name: &str) -> ChaosResult<SliderSpec> {
        Self::sliders()
            .iter()
            .find(|s| s.name == name)
            .copied()
            .ok_or_else(|| ChaosError::UnknownParameter {
                name: name.to_string(),
                available: Self::sliders().iter().map(|s| s.name.to_string()).collect(),
            })
    }

    /// Clamp then store; returns the value actually applied.
    fn set(&mut self, name: &str, value: f64) -> ChaosResult<f64> {
        let applied = Self::spec(name)?.clamp(value)?;
        self.assign(name, applied);
        Ok(applied)
    }
}

const LORENZ63_SLIDERS: [SliderSpec; 6] = [
    SliderSpec::continuous("sigma", 0.0, 50.0),
    SliderSpec::continuous("beta", 0.0, 8.0),
    SliderSpec::continuous("rho", 0.0, 50.0),
    SliderSpec::integer("N", 1.0, 50.0),
    SliderSpec::continuous("eps", 0.01, 10.0),
    SliderSpec::continuous("T", 0.0, 40.0),
];

const LORENZ96_SLIDERS: [SliderSpec; 4] = [
    SliderSpec::integer("m", 4.0, 60.0),
    SliderSpec::continuous("Force", 0.0, 40.0),
    SliderSpec::continuous("eps", 0.01, 3.0),
    SliderSpec::continuous("T", 0.0, 30.0),
];

impl SliderSet for Lorenz63Config {
    fn sliders() -> &'static [SliderSpec] {
        &LORENZ63_SLIDERS
    }

    fn value(&self, name: &str) -> Option<f64> {
        match name {
            "sigma" => Some(self.params.sigma),
            "beta" => Some(self.params.beta),
            "rho" => Some(self.params.rho),
            "N" => Some(self.ensemble_size as f64),
            "eps" => Some(self.epsilon),
            "T" => Some(self.t_end),
            _ => None,
        }
    }

    fn assign(&mut self, name: &str, value: f64) {
        match name {
            "sigma" => self.params.sigma = value,
            "beta" => self.params.beta = value,
            "rho" => self.params.rho = value,
            "N" => self.ensemble_size = value as usize,
            "eps" => self.epsilon = value,
            "T" => self.t_end = value,
            _ => {}
        }
    }
}

impl SliderSet for Lorenz96Config {
    fn sliders() -> &'static [SliderSpec] {
        &LORENZ96_SLIDERS
    }

    fn value(&self, name: &str) -> Option<f64> {
        match name {
            "m" => Some(self.params.m as f64),
            "Force" => Some(self.params.forcing),
            "eps" => Some(self.epsilon),
            "T" => Some(self.t_end),
            _ => None,
        }
    }

    fn assign(&mut self, name: &str, value: f64) {
        match name {
            "m" => self.params.m = value as usize,
            "Force" => self.params.forcing = value,
            "eps" => self.epsilon = value,
            "T" => self.t_end = value,
            _ => {}
        }
    }
}
