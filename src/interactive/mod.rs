// src/interactive/mod.rs
//! Parameter sliders and the synchronous recompute-and-render loop that sits
//! between a user interface and the simulation engine.

pub mod render;
pub mod slider;
pub mod surface;

pub use render::{Renderer, SummaryRenderer};
pub use slider::{SliderSet, SliderSpec};
pub use surface::{lorenz63_surface, lorenz96_surface, ParameterSurface};
