// src/settings.rs
//! Layered run settings.
//!
//! Later sources override earlier ones:
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. environment variables prefixed with `LORENZ_`, nested with `__`
//!    (e.g. `LORENZ_LORENZ63__PARAMS__RHO=20`)

use crate::error::ChaosResult;
use crate::output::OutputFlags;
use crate::sim::sim_engine::{Lorenz63Config, Lorenz96Config};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub lorenz63: Lorenz63Config,
    pub lorenz96: Lorenz96Config,
    pub output: OutputSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: PathBuf,
    pub trajectory: bool,
    pub histogram: bool,
    pub spread: bool,
    pub bins: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            dir: PathBuf::from("results"),
            trajectory: true,
            histogram: true,
            spread: true,
            bins: 30,
        }
    }
}

impl OutputSettings {
    pub fn flags(&self) -> OutputFlags {
        let mut flags = OutputFlags::NONE;
        flags.set(OutputFlags::TRAJECTORY, self.trajectory);
        flags.set(OutputFlags::HISTOGRAM, self.histogram);
        flags.set(OutputFlags::SPREAD, self.spread);
        flags
    }
}

impl Settings {
    /// Load defaults, then `path` if given, then `LORENZ_*` variables.
    pub fn load(path: Option<&Path>) -> ChaosResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let config = builder
            .add_source(
                Environment::with_prefix("LORENZ")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml_str(contents: &str) -> ChaosResult<Self> {
        let config = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?;
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> ChaosResult<()> {
        self.lorenz63.validate()?;
        self.lorenz96.validate()
    }
}
