//! # Boxy
//!
//! Oriented cuboid inference and pivot anchor geometry for DCC box
//! placeholders.
//!
//! Given a partial set of box vertices (5-8 points, faces, edges or a whole
//! mesh), boxy recovers the full cuboid: center, size and XYZ Euler rotation.
//! Boxies are boxes placed by one of 27 named anchors; the library keeps them
//! fixed in world space while their pivot, scale or frame changes and
//! converts them to and from polycube meshes.
//!
//! ## Modules
//!
//! - [`util`] - Math helpers, axis-aligned bounds, errors
//! - [`core`] - Sides, transforms and oriented bounds
//! - [`anchor`] - The 27 anchor points of a box
//! - [`color`] - Display colors
//! - [`geom`] - Meshes, rectangle validation and opposite face search
//! - [`cuboid`] - Cuboid recovery and bounds queries
//! - [`boxy`] - Boxy data and polycube conversion
//! - [`config`] - Persistent settings
//!
//! ## Example
//!
//! ```ignore
//! use boxy::prelude::*;
//!
//! let cube = Mesh::cube(DVec3::new(2.0, 4.0, 6.0));
//! let bounds = get_cuboid(&Geometry::Faces(&cube, &[0, 2]), false).unwrap();
//! let boxy = BoxyData::from_bounds(&bounds, Anchor::F2, Color::default(), false);
//! println!("{}", boxy.translation);
//! ```

pub mod util;
pub mod core;
pub mod anchor;
pub mod color;
pub mod geom;
pub mod cuboid;
pub mod boxy;
pub mod config;

// Python bindings (optional, enabled with "python" feature)
#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use util::{Error, Result};
pub use config::Settings;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{DVec3, Error, Result};
    pub use crate::anchor::{Anchor, AnchorComponents};
    pub use crate::boxy::{BoxyData, BoxyItem};
    pub use crate::color::Color;
    pub use crate::config::Settings;
    pub use crate::core::{Axis, Bounds, Side, Transform};
    pub use crate::cuboid::{get_bounds, get_cuboid, CuboidFinder, Geometry};
    pub use crate::geom::{get_opposite_face, Mesh, SurfaceDirection};
}
