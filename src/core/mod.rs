//! Core value types: sides, transforms and oriented bounds.

mod bounds;
mod side;
mod transform;

pub use bounds::*;
pub use side::*;
pub use transform::*;
