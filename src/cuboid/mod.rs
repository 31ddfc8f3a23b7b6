//! Oriented cuboid recovery and axis-aligned bounds.
//!
//! - [`CuboidFinder`] - corner inference and size/rotation measurement
//! - [`Geometry`] - point sources (meshes, components, locators, boxies)
//! - [`get_cuboid`] / [`get_bounds`] - tool-facing entry points

mod finder;
mod geometry;

pub use finder::*;
pub use geometry::*;
