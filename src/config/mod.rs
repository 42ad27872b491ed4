// src/config/mod.rs

pub mod error;
pub mod parameters;
pub mod scenario;

pub use error::ParameterError;
pub use parameters::{EstimatorParameters, FuzeParameters, GuidanceParameters, MissileParameters};
pub use scenario::Scenario;
