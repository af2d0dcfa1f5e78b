// src/sim/mod.rs
pub mod ensemble;
pub mod grid;
pub mod sim_engine;
pub mod trajectory;

pub use grid::TimeGrid;
pub use sim_engine::{
    integrate_ensemble, run_lorenz63, run_lorenz96, GridConfig, Lorenz63Config, Lorenz63Run,
    Lorenz96Config, Lorenz96Run,
};
pub use trajectory::Trajectory;
