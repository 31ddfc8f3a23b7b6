//! Boxy placeholder boxes and pivot bookkeeping.

use crate::anchor::Anchor;
use crate::color::Color;
use crate::core::{Axis, Bounds};
use crate::util::{euler_xyz_matrix, DVec3, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

fn unit_scale() -> DVec3 {
    DVec3::ONE
}

/// A box placed by its pivot.
///
/// `translation` is the world position of the pivot anchor. The box as seen
/// in the viewport is `size * scale`, rotated by `rotation` (XYZ Euler,
/// degrees) about the pivot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxyData {
    pub size: DVec3,
    pub translation: DVec3,
    #[serde(default)]
    pub rotation: DVec3,
    #[serde(default, rename = "pivot")]
    pub pivot_anchor: Anchor,
    #[serde(default)]
    pub color: Color,
    #[serde(default = "unit_scale")]
    pub scale: DVec3,
}

/// Flat description of a boxy for logging and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxyRecord {
    pub size: [f64; 3],
    pub translation: [f64; 3],
    pub rotation: [f64; 3],
    pub pivot: Anchor,
    pub pivot_index: usize,
    pub center: [f64; 3],
    pub color: [u8; 3],
    pub scale: [f64; 3],
}

impl BoxyData {
    pub fn new(size: DVec3, translation: DVec3, pivot_anchor: Anchor) -> Self {
        Self {
            size,
            translation,
            rotation: DVec3::ZERO,
            pivot_anchor,
            color: Color::default(),
            scale: DVec3::ONE,
        }
    }

    pub fn with_rotation(mut self, rotation: DVec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_scale(mut self, scale: DVec3) -> Self {
        self.scale = scale;
        self
    }

    #[inline]
    pub fn visual_size(&self) -> DVec3 {
        self.size * self.scale
    }

    /// World offset from the pivot to a local offset on the unscaled box.
    fn world_offset(&self, local: DVec3) -> DVec3 {
        euler_xyz_matrix(self.rotation) * (local * self.scale)
    }

    /// World position of the box center.
    pub fn center(&self) -> DVec3 {
        self.translation + self.world_offset(self.pivot_anchor.pivot_to_center(self.size * 0.5))
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.size, self.center(), self.rotation).with_scale(self.scale)
    }

    pub fn record(&self) -> BoxyRecord {
        BoxyRecord {
            size: self.size.to_array(),
            translation: self.translation.to_array(),
            rotation: self.rotation.to_array(),
            pivot: self.pivot_anchor,
            pivot_index: self.pivot_anchor.index(),
            center: self.center().to_array(),
            color: self.color.values(),
            scale: self.scale.to_array(),
        }
    }

    /// Place a boxy on oriented bounds with its pivot at `anchor`.
    ///
    /// With `inherit_scale` the bounds scale is kept on the boxy; otherwise
    /// it is baked into the size.
    pub fn from_bounds(bounds: &Bounds, anchor: Anchor, color: Color, inherit_scale: bool) -> Self {
        let (size, scale) = if inherit_scale {
            (bounds.size, bounds.scale)
        } else {
            (bounds.visual_size(), DVec3::ONE)
        };
        Self {
            size,
            translation: bounds.anchor_position(anchor),
            rotation: bounds.rotation,
            pivot_anchor: anchor,
            color,
            scale,
        }
    }

    /// Move the pivot to another anchor without moving the box.
    pub fn with_pivot(mut self, anchor: Anchor) -> Self {
        let center = self.center();
        self.pivot_anchor = anchor;
        self.translation = center + self.world_offset(anchor.offset(self.size * 0.5));
        self
    }

    /// Fold the scale into the size. The box stays in place and keeps its
    /// pivot anchor.
    pub fn bake_scale(mut self) -> Self {
        if self.scale == DVec3::ONE {
            return self;
        }
        let center = self.center();
        self.size *= self.scale;
        self.scale = DVec3::ONE;
        self.translation = center + self.world_offset(self.pivot_anchor.offset(self.size * 0.5));
        self
    }

    /// Bake the scale, then optionally re-pivot and recolor.
    pub fn rebuild(self, pivot: Option<Anchor>, color: Option<Color>) -> Self {
        let pivot = pivot.unwrap_or(self.pivot_anchor);
        let mut rebuilt = self.bake_scale().with_pivot(pivot);
        if let Some(color) = color {
            rebuilt.color = color;
        }
        rebuilt
    }

    /// Turn the box frame by a multiple of 90 degrees about one axis.
    ///
    /// The sizes perpendicular to the axis swap so the box keeps its shape,
    /// and the center stays put.
    pub fn reorient(self, degrees: f64, axis: Axis) -> Result<Self> {
        let quarters = degrees / 90.0;
        if !degrees.is_finite() || (quarters - quarters.round()).abs() > 1e-9 {
            return Err(Error::InvalidRotation(degrees));
        }
        let mut boxy = self.rebuild(None, None);
        let center = boxy.center();

        let s = boxy.size;
        boxy.size = match axis {
            Axis::X => DVec3::new(s.x, s.z, s.y),
            Axis::Y => DVec3::new(s.z, s.y, s.x),
            Axis::Z => DVec3::new(s.y, s.x, s.z),
        };
        boxy.rotation[axis.index()] += degrees;
        boxy.translation = center + boxy.world_offset(boxy.pivot_anchor.offset(boxy.size * 0.5));
        debug!(%degrees, ?axis, rotation = %boxy.rotation, "reoriented boxy");
        Ok(boxy)
    }
}

/// Which of the 27 anchors of `bounds` sits at `world_pivot`.
///
/// Each local coordinate of the pivot must be within `tolerance` of `-h`,
/// `0` or `+h`; otherwise the center is returned.
pub fn detect_pivot(world_pivot: DVec3, bounds: &Bounds, tolerance: f64) -> Anchor {
    let local = euler_xyz_matrix(bounds.rotation).transpose() * (world_pivot - bounds.center());
    let half = bounds.visual_size() * 0.5;

    let mut sign = DVec3::ZERO;
    for i in 0..3 {
        let (o, h) = (local[i], half[i]);
        sign[i] = if o.abs() < tolerance {
            0.0
        } else if (o + h).abs() < tolerance {
            -1.0
        } else if (o - h).abs() < tolerance {
            1.0
        } else {
            debug!(%local, %half, "pivot is not on an anchor");
            return Anchor::C;
        };
    }
    Anchor::from_sign(sign)
}
