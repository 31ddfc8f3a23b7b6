//! Python bindings for boxy.
//!
//! Exposes cuboid recovery, bounds and anchor queries, and boxy pivot
//! bookkeeping to a DCC's embedded Python.

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

mod bounds;
mod data;
mod mesh;

pub use bounds::*;
pub use data::*;
pub use mesh::*;

use crate::anchor::Anchor;
use crate::util::Error;

impl From<Error> for PyErr {
    fn from(e: Error) -> Self {
        match e {
            Error::Io(_) => PyIOError::new_err(e.to_string()),
            _ => PyValueError::new_err(e.to_string()),
        }
    }
}

/// Parse an anchor or side name.
pub(crate) fn parse_anchor(name: &str) -> PyResult<Anchor> {
    Ok(name.parse::<Anchor>()?)
}

/// Boxy Python module.
#[pymodule]
fn boxy(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<bounds::PyBounds>()?;
    m.add_class::<mesh::PyMesh>()?;
    m.add_class::<data::PyBoxyData>()?;

    m.add_function(wrap_pyfunction!(bounds::get_cuboid, m)?)?;
    m.add_function(wrap_pyfunction!(bounds::get_bounds, m)?)?;
    m.add_function(wrap_pyfunction!(bounds::anchor_offset, m)?)?;
    m.add_function(wrap_pyfunction!(bounds::anchor_position, m)?)?;
    m.add_function(wrap_pyfunction!(mesh::get_mesh_cuboid, m)?)?;
    m.add_function(wrap_pyfunction!(mesh::get_mesh_bounds, m)?)?;
    m.add_function(wrap_pyfunction!(mesh::get_opposite_face, m)?)?;
    m.add_function(wrap_pyfunction!(data::toggle_polycube, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
