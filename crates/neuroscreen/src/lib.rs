//! Core library for the NeuroScreen cognitive screening service.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
