//! The light shaft: a sheared box that decides how each particle is shaded.
//!
//! The containment test here is the CPU reference for the WGSL classifier in
//! [`crate::shader_utils::CLASSIFY_WGSL`]. Both compute
//!
//! ```text
//! p'    = shear * p            (translation-free)
//! delta = abs(center - p')
//! inside = all(delta <= half_extent)
//! ```
//!
//! and must agree for any position not within rounding distance of a face.

use crate::error::ConfigError;
use crate::shear::Shear;
use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Result of testing a position against the light volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Inside the shaft: drawn lit.
    Inside,
    /// Outside the shaft: drawn faded.
    Outside,
}

impl Classification {
    #[inline]
    pub fn is_inside(self) -> bool {
        self == Classification::Inside
    }

    /// Encoding written by the GPU classifier: 1 inside, 0 outside.
    #[inline]
    pub fn as_u32(self) -> u32 {
        match self {
            Classification::Inside => 1,
            Classification::Outside => 0,
        }
    }

    #[inline]
    pub fn from_u32(v: u32) -> Self {
        if v != 0 {
            Classification::Inside
        } else {
            Classification::Outside
        }
    }

    /// Opacity this classification receives under `shading`.
    #[inline]
    pub fn alpha(self, shading: &Shading) -> f32 {
        match self {
            Classification::Inside => shading.lit_alpha,
            Classification::Outside => shading.faded_alpha,
        }
    }
}

/// Default visual treatment for the two classifications.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shading {
    /// Particle color (RGB, 0.0-1.0).
    pub color: Vec3,
    /// Opacity inside the light volume.
    pub lit_alpha: f32,
    /// Opacity outside the light volume.
    pub faded_alpha: f32,
    /// Point sprite size in pixels.
    pub point_size: f32,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            lit_alpha: 1.0,
            faded_alpha: 0.01,
            point_size: 2.0,
        }
    }
}

/// Serializable description of a light volume.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightVolumeConfig {
    pub center: Vec3,
    pub half_extent: Vec3,
    pub shear: Shear,
}

impl Default for LightVolumeConfig {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            half_extent: Vec3::splat(5.0),
            shear: Shear::IDENTITY,
        }
    }
}

/// A validated, immutable light volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightVolume {
    center: Vec3,
    half_extent: Vec3,
    shear: Mat4,
    inverse_shear: Mat4,
}

impl LightVolume {
    /// Build a light volume from an explicit shear matrix.
    ///
    /// The matrix must have a unit diagonal, no translation, an affine last row
    /// and a non-zero determinant.
    pub fn new(center: Vec3, half_extent: Vec3, shear: Mat4) -> Result<Self, ConfigError> {
        if !center.is_finite() {
            return Err(ConfigError::InvalidCenter(center));
        }
        if !half_extent.is_finite() || half_extent.cmplt(Vec3::ZERO).any() {
            return Err(ConfigError::InvalidHalfExtent(half_extent));
        }
        if !shear.is_finite() {
            return Err(ConfigError::NotAShear("non-finite entries"));
        }
        if shear.x_axis.x != 1.0 || shear.y_axis.y != 1.0 || shear.z_axis.z != 1.0 {
            return Err(ConfigError::NotAShear("diagonal must be 1"));
        }
        if shear.w_axis != Vec4::W {
            return Err(ConfigError::NotAShear("translation must be zero"));
        }
        if shear.x_axis.w != 0.0 || shear.y_axis.w != 0.0 || shear.z_axis.w != 0.0 {
            return Err(ConfigError::NotAShear("last row must be (0, 0, 0, 1)"));
        }
        let det = shear.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(ConfigError::SingularShear(det));
        }

        Ok(Self {
            center,
            half_extent,
            shear,
            inverse_shear: shear.inverse(),
        })
    }

    /// Unsheared box.
    pub fn axis_aligned(center: Vec3, half_extent: Vec3) -> Result<Self, ConfigError> {
        Self::new(center, half_extent, Mat4::IDENTITY)
    }

    pub fn from_config(config: &LightVolumeConfig) -> Result<Self, ConfigError> {
        Self::new(config.center, config.half_extent, config.shear.matrix())
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    #[inline]
    pub fn half_extent(&self) -> Vec3 {
        self.half_extent
    }

    #[inline]
    pub fn shear(&self) -> Mat4 {
        self.shear
    }

    /// True inverse of the shear matrix.
    #[inline]
    pub fn inverse_shear(&self) -> Mat4 {
        self.inverse_shear
    }

    /// Position in the sheared frame the box test runs in.
    #[inline]
    pub fn to_local(&self, position: Vec3) -> Vec3 {
        self.shear.transform_vector3(position)
    }

    /// Map a sheared-frame position back to world space.
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.inverse_shear.transform_vector3(local)
    }

    /// Closed-interval containment in the sheared frame.
    #[inline]
    pub fn contains(&self, position: Vec3) -> bool {
        let delta = (self.center - self.to_local(position)).abs();
        delta.cmple(self.half_extent).all()
    }

    #[inline]
    pub fn classify(&self, position: Vec3) -> Classification {
        classify(position, self)
    }

    pub fn classify_all(&self, positions: &[Vec3]) -> Vec<Classification> {
        positions.iter().map(|&p| self.classify(p)).collect()
    }

    pub fn count_inside(&self, positions: &[Vec3]) -> usize {
        positions.iter().filter(|&&p| self.contains(p)).count()
    }

    /// World-space volume of the shaft: the box volume over `|det(shear)|`.
    pub fn volume(&self) -> f32 {
        let e = self.half_extent * 2.0;
        e.x * e.y * e.z / self.shear.determinant().abs()
    }
}

/// Decide whether `position` lies inside `volume`.
#[inline]
pub fn classify(position: Vec3, volume: &LightVolume) -> Classification {
    if volume.contains(position) {
        Classification::Inside
    } else {
        Classification::Outside
    }
}
