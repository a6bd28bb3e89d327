//! Seeded sampling for particle creation and respawn.
//!
//! Every draw for particle `i` comes from its own generator seeded from
//! `(seed, stream, i)`. Stream 0 is initial creation; stream `frame + 1` is a
//! respawn during that frame. Results therefore do not depend on the order in
//! which particles are visited, which keeps partitioned stepping bit-identical
//! to sequential stepping.

use crate::bounds::RoomBounds;
use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Context used to sample a single particle's state.
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Context for the initial creation of particle `index`.
    pub fn for_spawn(seed: u64, index: u32) -> Self {
        Self::with_stream(seed, 0, index)
    }

    /// Context for respawning particle `index` during `frame`.
    pub fn for_respawn(seed: u64, frame: u64, index: u32) -> Self {
        Self::with_stream(seed, frame.wrapping_add(1), index)
    }

    fn with_stream(seed: u64, stream: u64, index: u32) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(mix_seed(seed, stream, index as u64)),
        }
    }

    /// Random f32 in the closed range `[min, max]`.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        self.rng.gen_range(min..=max)
    }

    /// Uniform point inside the room (faces included).
    pub fn random_in_bounds(&mut self, bounds: &RoomBounds) -> Vec3 {
        let (min, max) = (bounds.min(), bounds.max());
        Vec3::new(
            self.random_range(min.x, max.x),
            self.random_range(min.y, max.y),
            self.random_range(min.z, max.z),
        )
    }

    /// Drift velocity with each component uniform in `[-range, range]`.
    pub fn random_velocity(&mut self, range: f32) -> Vec3 {
        Vec3::new(
            self.random_range(-range, range),
            self.random_range(-range, range),
            self.random_range(-range, range),
        )
    }
}

/// SplitMix64 finalizer.
#[inline]
fn splitmix(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

/// Fold `(seed, stream, index)` into one well-mixed seed.
#[inline]
pub(crate) fn mix_seed(seed: u64, stream: u64, index: u64) -> u64 {
    splitmix(splitmix(splitmix(seed) ^ stream) ^ index)
}
