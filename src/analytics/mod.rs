// src/analytics/mod.rs
pub mod ensemble_stats;
pub mod growth;
pub mod histogram;

pub use ensemble_stats::EnsembleStats;
pub use growth::PerturbationGrowth;
pub use histogram::Histogram;
