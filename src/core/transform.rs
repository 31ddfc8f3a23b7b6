//! Object transforms with a shared rotate/scale pivot.

use crate::util::{euler_xyz_matrix, DMat3, DVec3};
use serde::{Deserialize, Serialize};

/// Translation, XYZ rotation (degrees), scale and pivot of an object.
///
/// An object-space point maps to world space as
/// `R * S * (p - pivot) + pivot + translation`, so the world pivot is
/// `pivot + translation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub translation: DVec3,
    pub rotation: DVec3,
    pub scale: DVec3,
    pub pivot: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: DVec3::ZERO,
        rotation: DVec3::ZERO,
        scale: DVec3::ONE,
        pivot: DVec3::ZERO,
    };

    pub fn from_translation(translation: DVec3) -> Self {
        Self { translation, ..Self::IDENTITY }
    }

    pub fn with_rotation(mut self, rotation: DVec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: DVec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_pivot(mut self, pivot: DVec3) -> Self {
        self.pivot = pivot;
        self
    }

    #[inline]
    pub fn rotation_matrix(&self) -> DMat3 {
        euler_xyz_matrix(self.rotation)
    }

    #[inline]
    pub fn world_point(&self, p: DVec3) -> DVec3 {
        self.world_point_with(p, true, true)
    }

    /// World position with rotation and/or scale switched off.
    ///
    /// Equivalent to zeroing the rotate or resetting the scale attribute
    /// before querying, without touching the transform.
    pub fn world_point_with(&self, p: DVec3, rotate: bool, scale: bool) -> DVec3 {
        let mut local = p - self.pivot;
        if scale {
            local *= self.scale;
        }
        if rotate {
            local = self.rotation_matrix() * local;
        }
        local + self.pivot + self.translation
    }

    #[inline]
    pub fn world_pivot(&self) -> DVec3 {
        self.pivot + self.translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::points_match;

    #[test]
    fn test_identity() {
        let p = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(Transform::IDENTITY.world_point(p), p);
    }

    #[test]
    fn test_pivot_is_fixed_point() {
        let t = Transform::from_translation(DVec3::new(10.0, 0.0, 0.0))
            .with_rotation(DVec3::new(0.0, 90.0, 0.0))
            .with_scale(DVec3::new(2.0, 3.0, 4.0))
            .with_pivot(DVec3::new(0.0, -1.0, 0.0));
        assert!(points_match(t.world_point(t.pivot), t.world_pivot(), 1e-12));
    }

    #[test]
    fn test_world_point_with() {
        let t = Transform::IDENTITY
            .with_rotation(DVec3::new(0.0, 0.0, 90.0))
            .with_scale(DVec3::splat(2.0));
        let p = DVec3::X;
        assert!(points_match(t.world_point(p), DVec3::new(0.0, 2.0, 0.0), 1e-12));
        assert!(points_match(t.world_point_with(p, false, true), DVec3::new(2.0, 0.0, 0.0), 1e-12));
        assert!(points_match(t.world_point_with(p, true, false), DVec3::Y, 1e-12));
    }
}
