// src/lib.rs
//! # lorenz-chaos: Sensitivity to Initial Conditions in Lorenz Systems
//!
//! A Rust library for integrating the Lorenz-63 and Lorenz-96 models and
//! watching small perturbations grow into completely different trajectories
//! (the "butterfly effect").
//!
//! ## Key Features
//!
//! - **Two classical models**: Lorenz-63 (3 variables) and Lorenz-96 (ring of `m` variables)
//! - **Reproducible ensembles**: Gaussian perturbations from a fixed seed
//! - **Deterministic integration**: adaptive Dormand-Prince (via `ode_solvers`) on an explicit time grid
//! - **Parallel members**: ensemble members integrate independently on Rayon
//! - **Diagnostics**: ensemble spread, histograms, perturbation growth rates
//! - **Interactive wiring**: named sliders with a synchronous recompute-and-render handler
//!
//! ## Quick Start
//!
//! ```rust
//! use lorenz_chaos::sim::{run_lorenz63, Lorenz63Config};
//!
//! // Three nearly identical starting points, integrated for two time units
//! let config = Lorenz63Config {
//!     ensemble_size: 3,
//!     epsilon: 0.01,
//!     t_end: 2.0,
//!     ..Default::default()
//! };
//!
//! let run = run_lorenz63(&config).expect("Valid configuration");
//! assert_eq!(run.trajectory.members(), 3);
//! assert_eq!(run.trajectory.steps(), 201);
//! ```
//!
//! ## Data Layout
//!
//! Trajectories are `[member, time step, component]` arrays. Sample 0 of every
//! member is its initial state, and the time grid holds
//! `⌊samples_per_unit_time · T⌋ + 1` equally spaced instants on `[0, T]`.

// Module declarations
pub mod analytics;
pub mod error;
pub mod interactive;
pub mod logging;
pub mod math_utils;
pub mod models;
pub mod output;
pub mod rng;
pub mod settings;
pub mod sim;
pub mod solvers;

// Re-export commonly used types for convenience
pub use error::{ChaosError, ChaosResult};
