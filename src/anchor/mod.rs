//! Anchor points: the 27 named pivot targets of a box.
//!
//! - [`Anchor`] - center, 6 face centers, 12 edge midpoints, 8 vertices
//! - [`AnchorComponents`] - keypoints of a box relative to its pivot

mod point;
mod components;

pub use point::*;
pub use components::*;

use crate::core::Bounds;
use crate::util::{apply_euler_xyz_rotation, DVec3};

/// World position of an anchor on oriented bounds.
///
/// The local offset uses the visual (scaled) size and is rotated by the
/// bounds rotation.
pub fn anchor_position(bounds: &Bounds, anchor: Anchor) -> DVec3 {
    let offset = anchor.offset(bounds.visual_size() * 0.5);
    bounds.center() + apply_euler_xyz_rotation(offset, bounds.rotation, None)
}
