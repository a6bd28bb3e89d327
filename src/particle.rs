//! Per-particle state.

use glam::Vec3;

/// A dust mote: where it is and the constant drift it was born with.
///
/// The store keeps positions and velocities in separate arrays; this is the
/// value handed out when reading one particle back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    /// Drawn once at creation and never changed, including on respawn.
    pub velocity: Vec3,
}
