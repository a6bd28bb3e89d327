//! Uniform blocks shared with the WGSL in [`crate::shader_utils`].
//!
//! Both structs are `#[repr(C)]` and laid out to match WGSL uniform rules:
//! every `vec3<f32>` starts on a 16-byte boundary and is followed by a scalar
//! that fills its trailing 4 bytes.

use crate::light_volume::{LightVolume, Shading};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

/// Per-frame camera data for the point-sprite render shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Viewport size in pixels.
    pub viewport: [f32; 2],
    pub time: f32,
    pub delta_time: f32,
}

impl Uniforms {
    pub fn new(view_proj: Mat4, viewport: Vec2, time: f32, delta_time: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            viewport: viewport.to_array(),
            time,
            delta_time,
        }
    }
}

/// Light volume plus its shading, as the classifier WGSL sees it.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LightVolumeUniforms {
    pub shear: [[f32; 4]; 4],
    pub center: [f32; 3],
    pub lit_alpha: f32,
    pub half_extent: [f32; 3],
    pub faded_alpha: f32,
    pub color: [f32; 3],
    pub point_size: f32,
}

impl LightVolumeUniforms {
    pub fn new(volume: &LightVolume, shading: &Shading) -> Self {
        Self {
            shear: volume.shear().to_cols_array_2d(),
            center: volume.center().to_array(),
            lit_alpha: shading.lit_alpha,
            half_extent: volume.half_extent().to_array(),
            faded_alpha: shading.faded_alpha,
            color: shading.color.to_array(),
            point_size: shading.point_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shear::Shear;
    use glam::Vec3;
    use std::mem::{offset_of, size_of};

    #[test]
    fn test_uniform_layout() {
        assert_eq!(size_of::<Uniforms>(), 80);
        assert_eq!(offset_of!(Uniforms, viewport), 64);

        assert_eq!(size_of::<LightVolumeUniforms>(), 112);
        assert_eq!(offset_of!(LightVolumeUniforms, center), 64);
        assert_eq!(offset_of!(LightVolumeUniforms, half_extent), 80);
        assert_eq!(offset_of!(LightVolumeUniforms, color), 96);
    }

    #[test]
    fn test_light_volume_uniforms_carry_shear_columns() {
        let shear = Shear {
            xy: 0.5,
            zx: -0.25,
            ..Shear::IDENTITY
        };
        let volume = LightVolume::new(Vec3::new(1.0, 2.0, 3.0), Vec3::splat(4.0), shear.matrix()).unwrap();
        let u = LightVolumeUniforms::new(&volume, &Shading::default());

        // Column-major: column 1 holds the y input's contribution.
        assert_eq!(u.shear[1], [0.5, 1.0, 0.0, 0.0]);
        assert_eq!(u.shear[0], [1.0, 0.0, -0.25, 0.0]);
        assert_eq!(u.center, [1.0, 2.0, 3.0]);
        assert_eq!(u.half_extent, [4.0, 4.0, 4.0]);
        assert_eq!(u.lit_alpha, 1.0);
        assert_eq!(u.faded_alpha, 0.01);
    }
}
