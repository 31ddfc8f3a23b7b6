//! Reference keypoints of a box sitting at its pivot.

use super::{Anchor, AnchorKind};
use crate::color::Color;
use crate::util::DVec3;
use serde::Serialize;

/// Keypoints of a box whose pivot sits at the origin with zero rotation and
/// unit scale.
///
/// These are the coordinates procedural builders work in: everything is
/// relative to the pivot, not the box center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorComponents {
    pub size: DVec3,
    pub pivot_anchor: Anchor,
}

/// A named keypoint, ready for annotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorLabel {
    pub anchor: Anchor,
    pub position: DVec3,
    pub color: Color,
}

impl AnchorComponents {
    pub fn new(size: DVec3, pivot_anchor: Anchor) -> Self {
        Self { size, pivot_anchor }
    }

    #[inline]
    pub fn half(&self) -> DVec3 {
        self.size * 0.5
    }

    /// Location of the pivot relative to the center.
    #[inline]
    pub fn pivot_offset(&self) -> DVec3 {
        self.pivot_anchor.offset(self.half())
    }

    pub fn minimum(&self) -> DVec3 {
        -self.half() - self.pivot_offset()
    }

    pub fn maximum(&self) -> DVec3 {
        self.half() - self.pivot_offset()
    }

    pub fn center(&self) -> DVec3 {
        (self.minimum() + self.maximum()) * 0.5
    }

    /// Position of any anchor in pivot space.
    #[inline]
    pub fn keypoint(&self, anchor: Anchor) -> DVec3 {
        self.center() + anchor.offset(self.half())
    }

    /// Face centers `f0..f5`.
    pub fn faces(&self) -> [DVec3; 6] {
        Anchor::FACES.map(|a| self.keypoint(a))
    }

    /// Edge midpoints `e0..e11`.
    pub fn edges(&self) -> [DVec3; 12] {
        Anchor::EDGES.map(|a| self.keypoint(a))
    }

    /// Vertices `v0..v7`, in `000`..`111` bit order.
    pub fn vertices(&self) -> [DVec3; 8] {
        Anchor::VERTICES.map(|a| self.keypoint(a))
    }

    /// All 27 keypoints with their display colors.
    pub fn labels(&self) -> Vec<AnchorLabel> {
        Anchor::ALL
            .into_iter()
            .map(|anchor| AnchorLabel {
                anchor,
                position: self.keypoint(anchor),
                color: AnchorKind::label_color(anchor.kind()),
            })
            .collect()
    }
}
