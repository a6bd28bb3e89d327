//! Per-frame integration and respawn.
//!
//! Each step displaces every particle by `velocity * speed * dt` (explicit
//! Euler) and then respawns any particle that left the room at a uniformly
//! sampled position inside it. Respawning after displacement means the room
//! invariant holds whenever a step returns.
//!
//! Large stores are split into disjoint index chunks and stepped on the rayon
//! pool. Respawn samples depend only on `(seed, frame, index)`, so a
//! partitioned step writes exactly the same bytes as a sequential one.

use crate::bounds::RoomBounds;
use crate::config::DEFAULT_PARALLEL_THRESHOLD;
use crate::error::ConfigError;
use crate::spawn::SpawnContext;
use crate::store::ParticleStore;
use glam::Vec3;
use rayon::prelude::*;

/// Particles handed to one rayon task.
const CHUNK_SIZE: usize = 8192;

/// What happened during one step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Index of the frame that was just stepped (0 for the first).
    pub frame: u64,
    /// Delta time actually applied after sanitizing.
    pub delta_time: f32,
    /// Particles that left the room and were respawned.
    pub respawned: usize,
}

/// Advances a [`ParticleStore`] one frame at a time.
#[derive(Clone, Debug)]
pub struct VolumeIntegrator {
    max_delta: f32,
    parallel_threshold: usize,
    frame: u64,
}

impl Default for VolumeIntegrator {
    fn default() -> Self {
        Self {
            max_delta: 0.1,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            frame: 0,
        }
    }
}

impl VolumeIntegrator {
    /// `max_delta` must be finite and positive.
    pub fn new(max_delta: f32, parallel_threshold: usize) -> Result<Self, ConfigError> {
        if !max_delta.is_finite() || max_delta <= 0.0 {
            return Err(ConfigError::InvalidMaxDelta(max_delta));
        }
        Ok(Self {
            max_delta,
            parallel_threshold,
            frame: 0,
        })
    }

    #[inline]
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }

    /// Frames stepped so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Clamp a raw frame delta into `[0, max_delta]`.
    ///
    /// Negative and NaN deltas become 0; infinite or stalled-clock deltas
    /// become `max_delta`.
    pub fn sanitize_delta(&self, delta_time: f32) -> f32 {
        if delta_time.is_nan() || delta_time < 0.0 {
            log::debug!("ignoring invalid delta time {delta_time}");
            return 0.0;
        }
        if delta_time > self.max_delta {
            log::debug!(
                "clamping delta time {delta_time:.4}s to {:.4}s",
                self.max_delta
            );
            return self.max_delta;
        }
        delta_time
    }

    /// Advance every particle by one frame.
    pub fn step(&mut self, store: &mut ParticleStore, delta_time: f32, speed: f32) -> StepReport {
        let dt = self.sanitize_delta(delta_time);
        let speed = if speed.is_finite() { speed } else { 0.0 };
        let displacement = speed * dt;
        let frame = self.frame;
        let seed = store.seed();
        let bounds = *store.bounds();

        let respawned = if store.len() >= self.parallel_threshold {
            store
                .positions
                .par_chunks_mut(CHUNK_SIZE)
                .zip(store.velocities.par_chunks(CHUNK_SIZE))
                .enumerate()
                .map(|(chunk, (positions, velocities))| {
                    integrate_range(
                        chunk * CHUNK_SIZE,
                        positions,
                        velocities,
                        &bounds,
                        displacement,
                        seed,
                        frame,
                    )
                })
                .sum()
        } else {
            integrate_range(
                0,
                &mut store.positions,
                &store.velocities,
                &bounds,
                displacement,
                seed,
                frame,
            )
        };

        store.mark_dirty();
        self.frame += 1;

        if respawned > 0 {
            log::debug!("frame {frame}: respawned {respawned} particles");
        }

        StepReport {
            frame,
            delta_time: dt,
            respawned,
        }
    }
}

/// Integrate one contiguous run of particles starting at index `first`.
fn integrate_range(
    first: usize,
    positions: &mut [Vec3],
    velocities: &[Vec3],
    bounds: &RoomBounds,
    displacement: f32,
    seed: u64,
    frame: u64,
) -> usize {
    let mut respawned = 0;
    for (offset, (position, &velocity)) in positions.iter_mut().zip(velocities).enumerate() {
        *position += velocity * displacement;
        if !bounds.contains(*position) {
            let mut ctx = SpawnContext::for_respawn(seed, frame, (first + offset) as u32);
            *position = ctx.random_in_bounds(bounds);
            respawned += 1;
        }
    }
    respawned
}
