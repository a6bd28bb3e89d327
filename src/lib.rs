//! # dustlight
//!
//! Dust motes drifting through a shaft of light.
//!
//! dustlight owns the simulation half of the effect: a dense cloud of
//! particles drifting through a room, respawning when they leave it, and a
//! sheared light volume that decides which particles are drawn lit and which
//! are drawn faded. Rendering stays with the host; it only needs to feed in
//! frame time and upload a packed position buffer.
//!
//! ## Quick Start
//!
//! ```ignore
//! use dustlight::prelude::*;
//!
//! let config = SimConfig::new()
//!     .with_particle_count(100_000)
//!     .with_room_extent(Vec3::splat(100.0))
//!     .with_light_volume(LightVolumeConfig {
//!         center: Vec3::ZERO,
//!         half_extent: Vec3::new(50.0, 15.0, 15.0),
//!         shear: Shear { xy: 0.4, ..Shear::IDENTITY },
//!     })
//!     .with_speed(0.5);
//!
//! let mut sim = Simulation::new(config)?;
//! let mut time = Time::new();
//!
//! loop {
//!     let (_, dt) = time.update();
//!     sim.advance(dt);
//!     upload(sim.position_buffer());
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Particles
//!
//! Every particle has a `position` and a `velocity`. The velocity is drawn once
//! and never changes, so each mote drifts in a fixed lane. When a particle
//! leaves the room it is respawned at a uniformly random point inside it,
//! keeping its velocity.
//!
//! ### Light volume
//!
//! A box with a center, a half extent and a [`Shear`]. A particle is inside
//! when `abs(center - shear * position) <= half_extent` on every axis. The same
//! test is available as WGSL ([`shader_utils::CLASSIFY_WGSL`]) for the
//! rendering side, and with the `gpu` feature as a headless compute pass
//! ([`GpuClassifier`]) for checking the two agree.
//!
//! ### Determinism
//!
//! Creation and respawn draws are seeded from `(seed, frame, index)`. The same
//! seed and the same sequence of delta times give bit-identical buffers, on
//! one thread or many.

mod bounds;
mod config;
mod error;
#[cfg(feature = "gpu")]
mod gpu;
mod integrator;
mod light_volume;
mod particle;
pub mod shader_utils;
mod shear;
mod simulation;
mod spawn;
mod store;
pub mod time;
mod uniforms;

pub use bytemuck;
pub use bounds::RoomBounds;
pub use config::{SimConfig, DEFAULT_PARALLEL_THRESHOLD};
#[cfg(feature = "gpu")]
pub use error::GpuError;
pub use error::{ConfigError, SimulationError};
pub use glam::{Mat4, Vec2, Vec3};
#[cfg(feature = "gpu")]
pub use gpu::GpuClassifier;
pub use integrator::{StepReport, VolumeIntegrator};
pub use light_volume::{classify, Classification, LightVolume, LightVolumeConfig, Shading};
pub use particle::Particle;
pub use shear::Shear;
pub use simulation::Simulation;
pub use spawn::SpawnContext;
pub use store::ParticleStore;
pub use time::Time;
pub use uniforms::{LightVolumeUniforms, Uniforms};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use dustlight::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::SimConfig;
    #[cfg(feature = "gpu")]
    pub use crate::gpu::GpuClassifier;
    pub use crate::light_volume::{Classification, LightVolume, LightVolumeConfig, Shading};
    pub use crate::shear::Shear;
    pub use crate::simulation::Simulation;
    pub use crate::time::Time;
    pub use crate::{Mat4, Vec2, Vec3};
}
