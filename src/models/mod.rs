// src/models/mod.rs
pub mod lorenz63;
pub mod lorenz96;
pub mod model;

pub use lorenz63::{Lorenz63, Lorenz63Params};
pub use lorenz96::{Lorenz96, Lorenz96Params};
pub use model::Dynamics;
