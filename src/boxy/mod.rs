//! Boxy placeholder boxes.
//!
//! A boxy is a box placed by one of its 27 anchors. This module keeps the
//! box fixed in world space while its pivot, scale or frame changes, and
//! converts between boxies and polycube meshes.

mod convert;
mod data;

pub use convert::*;
pub use data::*;
