//! Python wrappers for oriented bounds and point-based queries.

use pyo3::prelude::*;

use super::parse_anchor;
use crate::config::Settings;
use crate::core::Bounds;
use crate::cuboid::{self, CuboidFinder, Geometry};
use crate::util::DVec3;

pub(crate) fn vec3(v: [f64; 3]) -> DVec3 {
    DVec3::from_array(v)
}

/// Python wrapper for oriented bounds.
#[pyclass(name = "Bounds")]
pub struct PyBounds {
    pub(crate) inner: Bounds,
}

impl From<Bounds> for PyBounds {
    fn from(inner: Bounds) -> Self {
        Self { inner }
    }
}

#[pymethods]
impl PyBounds {
    #[new]
    #[pyo3(signature = (size, position, rotation=[0.0; 3], scale=[1.0; 3]))]
    fn new(size: [f64; 3], position: [f64; 3], rotation: [f64; 3], scale: [f64; 3]) -> Self {
        Bounds::new(vec3(size), vec3(position), vec3(rotation))
            .with_scale(vec3(scale))
            .into()
    }

    #[getter]
    fn size(&self) -> [f64; 3] {
        self.inner.size.to_array()
    }

    #[getter]
    fn position(&self) -> [f64; 3] {
        self.inner.position.to_array()
    }

    #[getter]
    fn rotation(&self) -> [f64; 3] {
        self.inner.rotation.to_array()
    }

    #[getter]
    fn scale(&self) -> [f64; 3] {
        self.inner.scale.to_array()
    }

    /// Size as seen in the viewport (size * scale).
    #[getter]
    fn visual_size(&self) -> [f64; 3] {
        self.inner.visual_size().to_array()
    }

    /// World position of a named anchor (`c`, `f0`..`f5`, `e0`..`e11`,
    /// `v0`..`v7`, or a side name).
    fn anchor_position(&self, anchor: &str) -> PyResult<[f64; 3]> {
        Ok(self.inner.anchor_position(parse_anchor(anchor)?).to_array())
    }

    /// World corners in `v0..v7` order.
    fn vertices(&self) -> Vec<[f64; 3]> {
        self.inner.vertices().iter().map(|v| v.to_array()).collect()
    }

    fn __repr__(&self) -> String {
        let b = &self.inner;
        format!(
            "<Bounds size={} position={} rotation={} scale={}>",
            b.size, b.position, b.rotation, b.scale
        )
    }
}

/// Oriented cuboid through 5-8 world points, or None.
#[pyfunction]
#[pyo3(signature = (points, rotation=None))]
pub fn get_cuboid(points: Vec<[f64; 3]>, rotation: Option<[f64; 3]>) -> Option<PyBounds> {
    let points: Vec<DVec3> = points.into_iter().map(vec3).collect();
    CuboidFinder::new(&Settings::load())
        .find(&points, rotation.map(vec3))
        .map(|c| c.bounds().into())
        .map_err(|e| tracing::warn!("{e}"))
        .ok()
}

/// World axis-aligned bounds of points.
#[pyfunction]
pub fn get_bounds(points: Vec<[f64; 3]>) -> PyResult<PyBounds> {
    let points: Vec<DVec3> = points.into_iter().map(vec3).collect();
    Ok(cuboid::get_bounds(&Geometry::Locators(&points), false, false)?.into())
}

/// Local offset from the center of a box of `size` to a named anchor.
#[pyfunction]
pub fn anchor_offset(anchor: &str, size: [f64; 3]) -> PyResult<[f64; 3]> {
    Ok(parse_anchor(anchor)?.offset(vec3(size) * 0.5).to_array())
}

/// World position of a named anchor on bounds.
#[pyfunction]
pub fn anchor_position(bounds: &PyBounds, anchor: &str) -> PyResult<[f64; 3]> {
    bounds.anchor_position(anchor)
}
