//! The simulation a host render loop drives.

use crate::bounds::RoomBounds;
use crate::config::SimConfig;
use crate::error::SimulationError;
use crate::integrator::{StepReport, VolumeIntegrator};
use crate::light_volume::{Classification, LightVolume};
use crate::store::ParticleStore;
use crate::uniforms::LightVolumeUniforms;

/// Dust drifting through a room, classified against a light shaft.
///
/// The host calls [`Simulation::advance`] once per frame and then uploads
/// [`Simulation::position_buffer`]. Both borrow `self`, so the buffer can never
/// be read while a step is running.
///
/// ```ignore
/// let mut sim = Simulation::new(SimConfig::new().with_particle_count(100_000))?;
/// let mut time = Time::new();
/// loop {
///     let (_, dt) = time.update();
///     sim.advance(dt);
///     if sim.is_dirty() {
///         queue.write_buffer(&vertex_buffer, 0, sim.position_bytes());
///         sim.mark_clean();
///     }
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimConfig,
    store: ParticleStore,
    integrator: VolumeIntegrator,
    light_volume: LightVolume,
}

impl Simulation {
    /// Validate `config` and create the particle cloud.
    pub fn new(config: SimConfig) -> Result<Self, SimulationError> {
        let (_, light_volume) = config.validate()?;
        let store = ParticleStore::with_velocity_range(
            config.particle_count,
            config.room_extent,
            config.seed,
            config.velocity_range,
        )?;
        let integrator = VolumeIntegrator::new(config.max_delta, config.parallel_threshold)?;

        log::info!(
            "created {} particles in a {} room (seed {})",
            store.len(),
            store.bounds().extent(),
            config.seed
        );
        if !config.light_volume.shear.is_reversal_exact() {
            log::debug!("light volume shear compounds; only the true inverse maps back to world space");
        }

        Ok(Self {
            config,
            store,
            integrator,
            light_volume,
        })
    }

    /// Step the simulation by `delta_time` seconds at the configured speed.
    pub fn advance(&mut self, delta_time: f32) -> StepReport {
        self.integrator
            .step(&mut self.store, delta_time, self.config.speed)
    }

    /// Packed `[x0, y0, z0, x1, ...]` positions, `3 * particle_count()` long.
    #[inline]
    pub fn position_buffer(&self) -> &[f32] {
        self.store.positions()
    }

    #[inline]
    pub fn position_bytes(&self) -> &[u8] {
        self.store.position_bytes()
    }

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.store.len()
    }

    /// Frames advanced so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.integrator.frame()
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[inline]
    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    #[inline]
    pub fn bounds(&self) -> &RoomBounds {
        self.store.bounds()
    }

    #[inline]
    pub fn light_volume(&self) -> &LightVolume {
        &self.light_volume
    }

    /// Classification of particle `index`, or `None` if out of range.
    pub fn classify(&self, index: usize) -> Option<Classification> {
        self.store
            .position_vectors()
            .get(index)
            .map(|&p| self.light_volume.classify(p))
    }

    pub fn classifications(&self) -> Vec<Classification> {
        self.light_volume.classify_all(self.store.position_vectors())
    }

    pub fn inside_count(&self) -> usize {
        self.light_volume.count_inside(self.store.position_vectors())
    }

    /// Share of particles inside the light volume; 0 for an empty cloud.
    pub fn inside_fraction(&self) -> f32 {
        if self.store.is_empty() {
            return 0.0;
        }
        self.inside_count() as f32 / self.store.len() as f32
    }

    /// Uniform block for the render or compute classifier.
    pub fn uniforms(&self) -> LightVolumeUniforms {
        LightVolumeUniforms::new(&self.light_volume, &self.config.shading)
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    #[inline]
    pub fn mark_clean(&mut self) {
        self.store.mark_clean();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use glam::Vec3;

    #[test]
    fn test_degenerate_room_is_invalid_configuration() {
        let config = SimConfig::new().with_room_extent(Vec3::new(100.0, -1.0, 100.0));
        assert!(matches!(
            Simulation::new(config),
            Err(SimulationError::InvalidConfiguration(ConfigError::DegenerateRoom(_)))
        ));
    }

    #[test]
    fn test_buffer_length() {
        let sim = Simulation::new(SimConfig::new().with_particle_count(321)).unwrap();
        assert_eq!(sim.particle_count(), 321);
        assert_eq!(sim.position_buffer().len(), 963);
        assert_eq!(sim.position_bytes().len(), 963 * 4);
    }

    #[test]
    fn test_empty_simulation() {
        let mut sim = Simulation::new(SimConfig::new().with_particle_count(0)).unwrap();
        let report = sim.advance(0.016);
        assert_eq!(report.respawned, 0);
        assert!(sim.position_buffer().is_empty());
        assert_eq!(sim.inside_fraction(), 0.0);
        assert!(sim.classify(0).is_none());
    }

    #[test]
    fn test_classify_matches_light_volume() {
        let sim = Simulation::new(SimConfig::new().with_particle_count(500)).unwrap();
        let all = sim.classifications();
        for (i, c) in all.iter().enumerate() {
            assert_eq!(sim.classify(i), Some(*c));
        }
        assert_eq!(
            sim.inside_count(),
            all.iter().filter(|c| c.is_inside()).count()
        );
    }

    #[test]
    fn test_uniforms_follow_config() {
        let sim = Simulation::new(SimConfig::new().with_particle_count(1)).unwrap();
        let u = sim.uniforms();
        assert_eq!(u.half_extent, [5.0, 5.0, 5.0]);
        assert_eq!(u.faded_alpha, sim.config().shading.faded_alpha);
        assert_eq!(u.shear, glam::Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn test_dirty_cycle() {
        let mut sim = Simulation::new(SimConfig::new().with_particle_count(10)).unwrap();
        assert!(sim.is_dirty());
        sim.mark_clean();
        sim.advance(0.016);
        assert!(sim.is_dirty());
        assert_eq!(sim.frame(), 1);
    }
}
