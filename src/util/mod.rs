//! Utility types and functions for boxy.
//!
//! This module contains fundamental types used throughout the library:
//! - [`Error`] / [`Result`] - Error handling
//! - [`BBox3d`] - Axis-aligned bounds
//! - Math type re-exports from glam and the Euler XYZ helpers

mod bbox;
mod error;
mod math;

pub use bbox::*;
pub use error::*;
pub use math::*;
