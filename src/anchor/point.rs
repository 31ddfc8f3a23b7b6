//! The 27 named anchor points of a box.

use crate::color::{self, Color};
use crate::core::Side;
use crate::util::{DVec3, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named reference point on a box: the center, a face center, an edge
/// midpoint or a vertex.
///
/// Faces are `f0`..`f5` = left, right, bottom, top, back, front. Edges and
/// vertices follow the sign tables in [`Anchor::sign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    C,
    F0,
    F1,
    F2,
    F3,
    F4,
    F5,
    E0,
    E1,
    E2,
    E3,
    E4,
    E5,
    E6,
    E7,
    E8,
    E9,
    E10,
    E11,
    V0,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
    V7,
}

/// Which kind of box feature an anchor sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    Center,
    Face,
    Edge,
    Vertex,
}

impl AnchorKind {
    /// Annotation color used when labelling keypoints.
    pub fn label_color(self) -> Color {
        match self {
            AnchorKind::Center => color::BLACK,
            AnchorKind::Face => color::DARK_GREEN,
            AnchorKind::Edge => color::DARK_BLUE,
            AnchorKind::Vertex => color::MAROON,
        }
    }
}

use Anchor::*;

/// Unit sign of each anchor relative to the center, in enum order.
const SIGNS: [[i8; 3]; 27] = [
    [0, 0, 0],
    // faces
    [-1, 0, 0],
    [1, 0, 0],
    [0, -1, 0],
    [0, 1, 0],
    [0, 0, -1],
    [0, 0, 1],
    // edges
    [0, -1, -1],
    [0, -1, 1],
    [0, 1, -1],
    [0, 1, 1],
    [-1, 0, -1],
    [-1, 0, 1],
    [1, 0, -1],
    [1, 0, 1],
    [-1, -1, 0],
    [-1, 1, 0],
    [1, -1, 0],
    [1, 1, 0],
    // vertices
    [-1, -1, -1],
    [-1, -1, 1],
    [-1, 1, -1],
    [-1, 1, 1],
    [1, -1, -1],
    [1, -1, 1],
    [1, 1, -1],
    [1, 1, 1],
];

/// Anchors ordered by pivot attribute index.
const BY_INDEX: [Anchor; 27] = [
    F2, C, F3, F0, F1, F5, F4, E0, E1, E2, E3, E4, E5, E6, E7, E8, E9, E10, E11, V0, V1, V2, V3,
    V4, V5, V6, V7,
];

impl Anchor {
    /// All anchors: center, faces, edges, vertices.
    pub const ALL: [Anchor; 27] = [
        C, F0, F1, F2, F3, F4, F5, E0, E1, E2, E3, E4, E5, E6, E7, E8, E9, E10, E11, V0, V1, V2,
        V3, V4, V5, V6, V7,
    ];

    pub const FACES: [Anchor; 6] = [F0, F1, F2, F3, F4, F5];
    pub const EDGES: [Anchor; 12] = [E0, E1, E2, E3, E4, E5, E6, E7, E8, E9, E10, E11];
    pub const VERTICES: [Anchor; 8] = [V0, V1, V2, V3, V4, V5, V6, V7];

    #[inline]
    fn ordinal(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        const NAMES: [&str; 27] = [
            "c", "f0", "f1", "f2", "f3", "f4", "f5", "e0", "e1", "e2", "e3", "e4", "e5", "e6",
            "e7", "e8", "e9", "e10", "e11", "v0", "v1", "v2", "v3", "v4", "v5", "v6", "v7",
        ];
        NAMES[self.ordinal()]
    }

    pub fn kind(self) -> AnchorKind {
        match self.ordinal() {
            0 => AnchorKind::Center,
            1..=6 => AnchorKind::Face,
            7..=18 => AnchorKind::Edge,
            _ => AnchorKind::Vertex,
        }
    }

    /// True for the center and the six face centers.
    #[inline]
    pub fn is_basic(self) -> bool {
        matches!(self.kind(), AnchorKind::Center | AnchorKind::Face)
    }

    /// Sign of the anchor along each local axis: -1, 0 or 1.
    pub fn sign(self) -> DVec3 {
        let [x, y, z] = SIGNS[self.ordinal()];
        DVec3::new(x as f64, y as f64, z as f64)
    }

    /// Anchor with the given sign triple. Components are compared by sign only.
    pub fn from_sign(sign: DVec3) -> Anchor {
        let key = sign.to_array().map(|s| {
            if s > 0.0 {
                1
            } else if s < 0.0 {
                -1
            } else {
                0
            }
        });
        Anchor::ALL
            .into_iter()
            .find(|a| SIGNS[a.ordinal()] == key)
            .unwrap_or(C)
    }

    /// Local offset from the center to this anchor for a box with the given
    /// half extents.
    #[inline]
    pub fn offset(self, half: DVec3) -> DVec3 {
        self.sign() * half
    }

    /// Local offset from this anchor, used as a pivot, back to the center.
    #[inline]
    pub fn pivot_to_center(self, half: DVec3) -> DVec3 {
        -self.offset(half)
    }

    /// The anchor mirrored through the center.
    pub fn opposite(self) -> Anchor {
        Anchor::from_sign(-self.sign())
    }

    /// Pivot attribute index used by the DCC node.
    pub fn index(self) -> usize {
        BY_INDEX.iter().position(|a| *a == self).unwrap_or(1)
    }

    pub fn from_index(index: usize) -> Result<Anchor> {
        BY_INDEX
            .get(index)
            .copied()
            .ok_or_else(|| Error::InvalidAnchor(format!("index {index}")))
    }

    pub fn to_side(self) -> Option<Side> {
        Some(match self {
            C => Side::Center,
            F0 => Side::Left,
            F1 => Side::Right,
            F2 => Side::Bottom,
            F3 => Side::Top,
            F4 => Side::Back,
            F5 => Side::Front,
            _ => return None,
        })
    }

    pub fn from_side(side: Side) -> Anchor {
        match side {
            Side::Center => C,
            Side::Left => F0,
            Side::Right => F1,
            Side::Bottom => F2,
            Side::Top => F3,
            Side::Back => F4,
            Side::Front => F5,
        }
    }
}

impl Default for Anchor {
    fn default() -> Self {
        C
    }
}

impl From<Side> for Anchor {
    fn from(side: Side) -> Self {
        Anchor::from_side(side)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Anchor {
    type Err = Error;

    /// Accepts anchor names (`c`, `f3`, `e10`, ...) and side names (`top`).
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        if let Some(anchor) = Anchor::ALL.into_iter().find(|a| a.name() == lower) {
            return Ok(anchor);
        }
        lower
            .parse::<Side>()
            .map(Anchor::from_side)
            .map_err(|_| Error::InvalidAnchor(s.to_string()))
    }
}
