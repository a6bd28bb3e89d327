//! Shear transforms that tilt the light volume.
//!
//! A shear here is `I + N` where `N` holds only off-diagonal coupling terms.
//! The true inverse is always available through [`Shear::inverse`]. The
//! sign-negated [`Shear::reversed`] matrix `I - N` is only the inverse when
//! `N * N == 0`; [`Shear::is_reversal_exact`] tells the two cases apart.

use glam::{Mat3, Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Off-diagonal coupling coefficients.
///
/// `xy` is how much the input `y` contributes to the output `x`, and so on:
///
/// ```text
/// x' = x + xy*y + xz*z
/// y' = yx*x + y + yz*z
/// z' = zx*x + zy*y + z
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shear {
    pub xy: f32,
    pub xz: f32,
    pub yx: f32,
    pub yz: f32,
    pub zx: f32,
    pub zy: f32,
}

impl Shear {
    /// No coupling at all.
    pub const IDENTITY: Self = Self {
        xy: 0.0,
        xz: 0.0,
        yx: 0.0,
        yz: 0.0,
        zx: 0.0,
        zy: 0.0,
    };

    /// 4x4 affine matrix with unit diagonal and no translation.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols(
            Vec4::new(1.0, self.yx, self.zx, 0.0),
            Vec4::new(self.xy, 1.0, self.zy, 0.0),
            Vec4::new(self.xz, self.yz, 1.0, 0.0),
            Vec4::W,
        )
    }

    /// Exact matrix inverse of [`Shear::matrix`].
    ///
    /// Callers must check [`Shear::determinant`] first; a singular shear has no
    /// inverse.
    pub fn inverse(&self) -> Mat4 {
        self.matrix().inverse()
    }

    /// `I - N`: every coupling term negated.
    pub fn reversed(&self) -> Mat4 {
        Self {
            xy: -self.xy,
            xz: -self.xz,
            yx: -self.yx,
            yz: -self.yz,
            zx: -self.zx,
            zy: -self.zy,
        }
        .matrix()
    }

    /// Whether [`Shear::reversed`] is the exact inverse, i.e. `N * N == 0`.
    ///
    /// Holds for shears whose terms never compound, such as coupling a single
    /// output axis to the others. Fails as soon as two terms chain, e.g. `xy`
    /// together with `yz`.
    pub fn is_reversal_exact(&self) -> bool {
        let n = self.coupling();
        n * n == Mat3::ZERO
    }

    pub fn determinant(&self) -> f32 {
        self.matrix().determinant()
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    fn coupling(&self) -> Mat3 {
        Mat3::from_cols(
            Vec3::new(0.0, self.yx, self.zx),
            Vec3::new(self.xy, 0.0, self.zy),
            Vec3::new(self.xz, self.yz, 0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_mat(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    #[test]
    fn test_matrix_layout() {
        let s = Shear {
            xy: 0.5,
            ..Shear::IDENTITY
        };
        let p = s.matrix().transform_vector3(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Vec3::new(2.0, 2.0, 3.0));
    }

    #[test]
    fn test_identity() {
        assert!(Shear::IDENTITY.is_identity());
        assert_eq!(Shear::IDENTITY.matrix(), Mat4::IDENTITY);
        assert!(Shear::IDENTITY.is_reversal_exact());
    }

    #[test]
    fn test_inverse_is_exact_for_compounding_shear() {
        let s = Shear {
            xy: 0.4,
            yz: -0.3,
            zx: 0.2,
            ..Shear::IDENTITY
        };
        assert!(approx_mat(s.matrix() * s.inverse(), Mat4::IDENTITY));
    }

    #[test]
    fn test_reversal_exact_for_single_row() {
        // x couples to y and z; nothing feeds back.
        let s = Shear {
            xy: 0.7,
            xz: -0.2,
            ..Shear::IDENTITY
        };
        assert!(s.is_reversal_exact());
        assert!(approx_mat(s.matrix() * s.reversed(), Mat4::IDENTITY));
    }

    #[test]
    fn test_reversal_inexact_for_chained_terms() {
        let s = Shear {
            xy: 0.5,
            yz: 0.5,
            ..Shear::IDENTITY
        };
        assert!(!s.is_reversal_exact());
        assert!(!approx_mat(s.matrix() * s.reversed(), Mat4::IDENTITY));
        assert!(approx_mat(s.matrix() * s.inverse(), Mat4::IDENTITY));
    }

    #[test]
    fn test_singular_shear_determinant() {
        let s = Shear {
            xy: 1.0,
            yx: 1.0,
            ..Shear::IDENTITY
        };
        assert_eq!(s.determinant(), 0.0);
    }

    #[test]
    fn test_missing_fields_deserialize_to_zero() {
        let s: Shear = serde_json::from_str(r#"{ "xz": 0.25 }"#).unwrap();
        assert_eq!(
            s,
            Shear {
                xz: 0.25,
                ..Shear::IDENTITY
            }
        );
    }
}
