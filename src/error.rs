//! Error types for dustlight.
//!
//! Only construction can fail. Once a [`Simulation`](crate::Simulation) exists,
//! stepping and classification are total functions.

use glam::Vec3;
use thiserror::Error;

/// Rejected configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Room extent has a non-positive or non-finite component.
    #[error("room extent must be positive and finite on every axis, got {0}")]
    DegenerateRoom(Vec3),
    /// Light volume half extent has a negative or non-finite component.
    #[error("light volume half extent must be non-negative and finite, got {0}")]
    InvalidHalfExtent(Vec3),
    /// Light volume center has a non-finite component.
    #[error("light volume center must be finite, got {0}")]
    InvalidCenter(Vec3),
    /// Matrix is not a pure shear (unit diagonal, no translation, affine last row).
    #[error("matrix is not a shear: {0}")]
    NotAShear(&'static str),
    /// Shear matrix cannot be inverted.
    #[error("shear matrix is singular (determinant {0})")]
    SingularShear(f32),
    /// Speed multiplier is negative or non-finite.
    #[error("speed must be finite and non-negative, got {0}")]
    InvalidSpeed(f32),
    /// Velocity sampling range is negative or non-finite.
    #[error("velocity range must be finite and non-negative, got {0}")]
    InvalidVelocityRange(f32),
    /// Maximum step length is not a positive finite number.
    #[error("max delta must be finite and positive, got {0}")]
    InvalidMaxDelta(f32),
    /// Configuration JSON could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors that can occur when creating a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
}

/// Errors from the headless GPU classifier.
#[cfg(feature = "gpu")]
#[derive(Debug, Error)]
pub enum GpuError {
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// Failed to map buffer for reading.
    #[error("failed to map GPU buffer: {0}")]
    BufferMapping(String),
}
