// src/models/mod.rs

pub mod devices;
pub mod estimator;
pub mod fuze;
pub mod guidance;
pub mod missile;

#[cfg(test)]
pub mod mock;

pub use devices::{DetectedEntity, Pose, Relationship};
pub use estimator::{TargetEstimator, TrackMode};
pub use fuze::{detonation_causes, DetonationCause, FuzeController, PayloadSet};
pub use guidance::{compute_steering, GuidanceCommand, GuidanceState};
pub use missile::{
    validate_capabilities, Capabilities, Missile, MissileError, MissileErrorFlags, MissileStatus,
    TickReport,
};
