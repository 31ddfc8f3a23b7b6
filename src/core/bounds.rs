//! Oriented bounds: center, size, rotation and scale of a box.

use super::Side;
use crate::anchor::{anchor_position, Anchor};
use crate::util::{apply_euler_xyz_rotation, BBox3d, DVec3};
use serde::{Deserialize, Serialize};

/// An oriented box in world space.
///
/// `size` is the unscaled size; the box as seen in the viewport is
/// `size * scale`. `rotation` is XYZ Euler in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub size: DVec3,
    pub position: DVec3,
    pub rotation: DVec3,
    #[serde(default = "unit_scale")]
    pub scale: DVec3,
}

fn unit_scale() -> DVec3 {
    DVec3::ONE
}

impl Bounds {
    pub fn new(size: DVec3, position: DVec3, rotation: DVec3) -> Self {
        Self {
            size,
            position,
            rotation,
            scale: DVec3::ONE,
        }
    }

    pub fn with_scale(mut self, scale: DVec3) -> Self {
        self.scale = scale;
        self
    }

    /// Axis-aligned bounds of a box.
    pub fn from_bbox(bbox: &BBox3d) -> Self {
        Self::new(bbox.size(), bbox.center(), DVec3::ZERO)
    }

    /// Alias for `position`.
    #[inline]
    pub fn center(&self) -> DVec3 {
        self.position
    }

    #[inline]
    pub fn visual_size(&self) -> DVec3 {
        self.size * self.scale
    }

    fn face(&self, local: DVec3) -> DVec3 {
        self.position + apply_euler_xyz_rotation(local * self.visual_size() * 0.5, self.rotation, None)
    }

    pub fn left(&self) -> DVec3 {
        self.face(DVec3::NEG_X)
    }

    pub fn right(&self) -> DVec3 {
        self.face(DVec3::X)
    }

    pub fn bottom(&self) -> DVec3 {
        self.face(DVec3::NEG_Y)
    }

    pub fn top(&self) -> DVec3 {
        self.face(DVec3::Y)
    }

    pub fn back(&self) -> DVec3 {
        self.face(DVec3::NEG_Z)
    }

    pub fn front(&self) -> DVec3 {
        self.face(DVec3::Z)
    }

    /// World position of the pivot at a side.
    pub fn pivot(&self, side: Side) -> DVec3 {
        match side {
            Side::Center => self.center(),
            Side::Left => self.left(),
            Side::Right => self.right(),
            Side::Bottom => self.bottom(),
            Side::Top => self.top(),
            Side::Back => self.back(),
            Side::Front => self.front(),
        }
    }

    #[inline]
    pub fn anchor_position(&self, anchor: Anchor) -> DVec3 {
        anchor_position(self, anchor)
    }

    /// World corners in `v0..v7` order.
    pub fn vertices(&self) -> [DVec3; 8] {
        Anchor::VERTICES.map(|a| self.anchor_position(a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::points_match;

    #[test]
    fn test_faces_axis_aligned() {
        let b = Bounds::new(DVec3::new(2.0, 4.0, 6.0), DVec3::new(1.0, 1.0, 1.0), DVec3::ZERO);
        assert_eq!(b.bottom(), DVec3::new(1.0, -1.0, 1.0));
        assert_eq!(b.top(), DVec3::new(1.0, 3.0, 1.0));
        assert_eq!(b.left(), DVec3::new(0.0, 1.0, 1.0));
        assert_eq!(b.front(), DVec3::new(1.0, 1.0, 4.0));
        assert_eq!(b.pivot(Side::Center), b.center());
    }

    #[test]
    fn test_faces_rotated() {
        let b = Bounds::new(DVec3::new(2.0, 4.0, 6.0), DVec3::ZERO, DVec3::new(0.0, 0.0, 90.0));
        // Local +Y maps to world -X under Z 90.
        assert!(points_match(b.top(), DVec3::new(-2.0, 0.0, 0.0), 1e-12));
        assert!(points_match(b.pivot(Side::Right), DVec3::new(0.0, 1.0, 0.0), 1e-12));
    }

    #[test]
    fn test_pivot_matches_anchor() {
        let b = Bounds::new(DVec3::new(2.0, 4.0, 6.0), DVec3::X, DVec3::new(10.0, 20.0, 30.0))
            .with_scale(DVec3::new(1.0, 2.0, 0.5));
        for side in Side::ALL {
            let anchor = Anchor::from(side);
            assert!(points_match(b.pivot(side), b.anchor_position(anchor), 1e-12));
        }
    }

    #[test]
    fn test_vertices() {
        let b = Bounds::new(DVec3::splat(2.0), DVec3::ZERO, DVec3::ZERO);
        let v = b.vertices();
        assert_eq!(v[0], DVec3::splat(-1.0));
        assert_eq!(v[7], DVec3::splat(1.0));
        assert_eq!(v[4], DVec3::new(1.0, -1.0, -1.0));
    }
}
