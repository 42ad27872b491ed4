// src/math/mod.rs

pub mod vector;

pub use vector::distance_squared;
pub use vector::finite_or;
pub use vector::normalize_with_magnitude;
pub use vector::EPSILON;
