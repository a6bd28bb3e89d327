//! Simulation configuration.
//!
//! [`SimConfig`] is fixed once a simulation is built. It serializes to JSON so
//! a host can keep it next to its scene description; fields missing from the
//! JSON take their default values.
//!
//! ```ignore
//! let config = SimConfig::new()
//!     .with_particle_count(100_000)
//!     .with_room_extent(Vec3::new(100.0, 100.0, 100.0))
//!     .with_light_volume(LightVolumeConfig {
//!         center: Vec3::ZERO,
//!         half_extent: Vec3::new(50.0, 15.0, 15.0),
//!         shear: Shear { xy: 0.5, ..Shear::IDENTITY },
//!     })
//!     .with_speed(0.5);
//! ```

use crate::bounds::RoomBounds;
use crate::error::ConfigError;
use crate::light_volume::{LightVolume, LightVolumeConfig, Shading};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Particle count at and above which stepping is split across the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 65_536;

/// Everything a simulation needs, set once at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of particles.
    pub particle_count: u32,
    /// Full room width/height/depth, centered on the origin.
    pub room_extent: Vec3,
    /// Light shaft used to classify particles.
    pub light_volume: LightVolumeConfig,
    /// Multiplier on each particle's drift velocity.
    pub speed: f32,
    /// Seed for creation and respawn sampling.
    pub seed: u64,
    /// Velocity components are drawn from `[-velocity_range, velocity_range]`.
    pub velocity_range: f32,
    /// Upper clamp on a single step's delta time, in seconds.
    pub max_delta: f32,
    /// Particle count at which stepping goes parallel.
    pub parallel_threshold: usize,
    /// Visual treatment for lit and faded particles.
    pub shading: Shading,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            particle_count: 10_000,
            room_extent: Vec3::splat(100.0),
            light_volume: LightVolumeConfig::default(),
            speed: 0.5,
            seed: 0,
            velocity_range: 0.5,
            max_delta: 0.1,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            shading: Shading::default(),
        }
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_particle_count(mut self, count: u32) -> Self {
        self.particle_count = count;
        self
    }

    pub fn with_room_extent(mut self, extent: Vec3) -> Self {
        self.room_extent = extent;
        self
    }

    pub fn with_light_volume(mut self, light_volume: LightVolumeConfig) -> Self {
        self.light_volume = light_volume;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_velocity_range(mut self, range: f32) -> Self {
        self.velocity_range = range;
        self
    }

    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Set the particle count at which stepping goes parallel.
    ///
    /// `usize::MAX` keeps stepping on the calling thread.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.shading = shading;
        self
    }

    /// Check every field, returning the validated room and light volume.
    pub fn validate(&self) -> Result<(RoomBounds, LightVolume), ConfigError> {
        let bounds = RoomBounds::from_extent(self.room_extent)?;
        let light_volume = LightVolume::from_config(&self.light_volume)?;
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(ConfigError::InvalidSpeed(self.speed));
        }
        if !self.velocity_range.is_finite() || self.velocity_range < 0.0 {
            return Err(ConfigError::InvalidVelocityRange(self.velocity_range));
        }
        if !self.max_delta.is_finite() || self.max_delta <= 0.0 {
            return Err(ConfigError::InvalidMaxDelta(self.max_delta));
        }
        Ok((bounds, light_volume))
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shear::Shear;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let config = SimConfig::new()
            .with_particle_count(42)
            .with_speed(2.0)
            .with_seed(9)
            .with_max_delta(0.05);
        assert_eq!(config.particle_count, 42);
        assert_eq!(config.speed, 2.0);
        assert_eq!(config.seed, 9);
        assert_eq!(config.max_delta, 0.05);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_room = SimConfig::new().with_room_extent(Vec3::new(10.0, 0.0, 10.0));
        assert!(matches!(bad_room.validate(), Err(ConfigError::DegenerateRoom(_))));

        let bad_speed = SimConfig::new().with_speed(f32::NAN);
        assert!(matches!(bad_speed.validate(), Err(ConfigError::InvalidSpeed(_))));

        let bad_range = SimConfig::new().with_velocity_range(-1.0);
        assert!(matches!(
            bad_range.validate(),
            Err(ConfigError::InvalidVelocityRange(_))
        ));

        let bad_delta = SimConfig::new().with_max_delta(0.0);
        assert!(matches!(bad_delta.validate(), Err(ConfigError::InvalidMaxDelta(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = SimConfig::new()
            .with_particle_count(1234)
            .with_light_volume(LightVolumeConfig {
                center: Vec3::new(1.0, 2.0, 3.0),
                half_extent: Vec3::new(50.0, 15.0, 15.0),
                shear: Shear {
                    xy: 0.5,
                    ..Shear::IDENTITY
                },
            });
        let json = config.to_json().unwrap();
        assert_eq!(SimConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json(r#"{ "particle_count": 5, "speed": 1.5 }"#).unwrap();
        assert_eq!(config.particle_count, 5);
        assert_eq!(config.speed, 1.5);
        assert_eq!(config.room_extent, Vec3::splat(100.0));
        assert_eq!(config.light_volume, LightVolumeConfig::default());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SimConfig::from_json("{ particle_count: }"),
            Err(ConfigError::Parse(_))
        ));
    }
}
