// src/lib.rs

pub mod config;
pub mod math;
pub mod models;
pub mod simulation;

pub use models::missile::Missile;
