//! Particle storage.
//!
//! Particles are kept as two parallel arrays. Positions are a `Vec<Vec3>`, and
//! since `glam::Vec3` is a tightly packed `#[repr(C)]` triple of `f32`, the
//! array doubles as the renderer's upload buffer `[x0, y0, z0, x1, ...]`
//! without any copy.

use crate::bounds::RoomBounds;
use crate::error::ConfigError;
use crate::particle::Particle;
use crate::spawn::SpawnContext;
use glam::Vec3;

/// Owns every particle and the room they live in.
#[derive(Clone, Debug)]
pub struct ParticleStore {
    pub(crate) positions: Vec<Vec3>,
    pub(crate) velocities: Vec<Vec3>,
    bounds: RoomBounds,
    seed: u64,
    dirty: bool,
}

impl ParticleStore {
    /// Create `count` particles uniformly inside a room of `room_extent`,
    /// with velocity components in `[-0.5, 0.5]`.
    pub fn initialize(count: u32, room_extent: Vec3, seed: u64) -> Result<Self, ConfigError> {
        Self::with_velocity_range(count, room_extent, seed, 0.5)
    }

    /// Like [`ParticleStore::initialize`] with a custom velocity range.
    pub fn with_velocity_range(
        count: u32,
        room_extent: Vec3,
        seed: u64,
        velocity_range: f32,
    ) -> Result<Self, ConfigError> {
        if !velocity_range.is_finite() || velocity_range < 0.0 {
            return Err(ConfigError::InvalidVelocityRange(velocity_range));
        }
        let bounds = RoomBounds::from_extent(room_extent)?;

        let mut positions = Vec::with_capacity(count as usize);
        let mut velocities = Vec::with_capacity(count as usize);
        for i in 0..count {
            let mut ctx = SpawnContext::for_spawn(seed, i);
            positions.push(ctx.random_in_bounds(&bounds));
            velocities.push(ctx.random_velocity(velocity_range));
        }

        Ok(Self {
            positions,
            velocities,
            bounds,
            seed,
            dirty: true,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn bounds(&self) -> &RoomBounds {
        &self.bounds
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Packed position buffer, `3 * len()` floats.
    #[inline]
    pub fn positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Position buffer as raw bytes for GPU upload.
    #[inline]
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    #[inline]
    pub fn position_vectors(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn particle(&self, index: usize) -> Option<Particle> {
        Some(Particle {
            position: *self.positions.get(index)?,
            velocity: self.velocities[index],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Particle> + '_ {
        self.positions
            .iter()
            .zip(&self.velocities)
            .map(|(&position, &velocity)| Particle { position, velocity })
    }

    /// Whether positions changed since the last [`ParticleStore::mark_clean`].
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Call once the renderer has uploaded the buffer.
    #[inline]
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_inside_room() {
        let store = ParticleStore::initialize(2_000, Vec3::new(100.0, 40.0, 10.0), 3).unwrap();
        assert_eq!(store.len(), 2_000);
        assert!(store.iter().all(|p| store.bounds().contains(p.position)));
        assert!(store
            .velocities()
            .iter()
            .all(|v| v.abs().cmple(Vec3::splat(0.5)).all()));
    }

    #[test]
    fn test_positions_are_tightly_packed() {
        let store = ParticleStore::initialize(4, Vec3::splat(10.0), 1).unwrap();
        let buf = store.positions();
        assert_eq!(buf.len(), 12);
        for (i, p) in store.position_vectors().iter().enumerate() {
            assert_eq!(&buf[i * 3..i * 3 + 3], &p.to_array());
        }
        assert_eq!(store.position_bytes().len(), 48);
    }

    #[test]
    fn test_empty_store() {
        let store = ParticleStore::initialize(0, Vec3::ONE, 0).unwrap();
        assert!(store.is_empty());
        assert!(store.positions().is_empty());
        assert!(store.particle(0).is_none());
    }

    #[test]
    fn test_degenerate_room() {
        assert!(matches!(
            ParticleStore::initialize(10, Vec3::new(1.0, 1.0, 0.0), 0),
            Err(ConfigError::DegenerateRoom(_))
        ));
    }

    #[test]
    fn test_seed_reproducible() {
        let a = ParticleStore::initialize(100, Vec3::splat(50.0), 77).unwrap();
        let b = ParticleStore::initialize(100, Vec3::splat(50.0), 77).unwrap();
        let c = ParticleStore::initialize(100, Vec3::splat(50.0), 78).unwrap();
        assert_eq!(a.position_bytes(), b.position_bytes());
        assert_ne!(a.position_bytes(), c.position_bytes());
    }

    #[test]
    fn test_dirty_flag() {
        let mut store = ParticleStore::initialize(1, Vec3::ONE, 0).unwrap();
        assert!(store.is_dirty());
        store.mark_clean();
        assert!(!store.is_dirty());
        store.mark_dirty();
        assert!(store.is_dirty());
    }

    #[test]
    fn test_particle_reads_both_arrays() {
        let store = ParticleStore::initialize(3, Vec3::splat(4.0), 5).unwrap();
        let p = store.particle(1).unwrap();
        assert_eq!(p.position, store.position_vectors()[1]);
        assert_eq!(p.velocity, store.velocities()[1]);
        assert_eq!(store.iter().nth(1), Some(p));
        assert!(store.particle(3).is_none());
    }
}
