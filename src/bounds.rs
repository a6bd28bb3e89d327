//! The room a particle cloud lives in.

use crate::error::ConfigError;
use glam::Vec3;

/// Axis-aligned box centered on the origin.
///
/// Containment uses closed intervals: a point lying exactly on a face is inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoomBounds {
    min: Vec3,
    max: Vec3,
}

impl RoomBounds {
    /// Build the room from its full width/height/depth.
    ///
    /// Every component must be positive and finite.
    pub fn from_extent(extent: Vec3) -> Result<Self, ConfigError> {
        if !extent.is_finite() || extent.cmple(Vec3::ZERO).any() {
            return Err(ConfigError::DegenerateRoom(extent));
        }
        let half = extent * 0.5;
        Ok(Self {
            min: -half,
            max: half,
        })
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Full size along each axis.
    #[inline]
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn volume(&self) -> f32 {
        let e = self.extent();
        e.x * e.y * e.z
    }

    /// Closed-interval containment on every axis.
    ///
    /// NaN components are never inside.
    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}
