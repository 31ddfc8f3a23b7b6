//! Python wrapper for boxy data.

use pyo3::prelude::*;

use super::bounds::{vec3, PyBounds};
use super::mesh::PyMesh;
use super::parse_anchor;
use crate::boxy::BoxyData;
use crate::color::Color;
use crate::config::Settings;
use crate::core::Axis;

/// Python wrapper for a boxy placeholder box.
#[pyclass(name = "BoxyData")]
pub struct PyBoxyData {
    pub(crate) inner: BoxyData,
}

impl From<BoxyData> for PyBoxyData {
    fn from(inner: BoxyData) -> Self {
        Self { inner }
    }
}

#[pymethods]
impl PyBoxyData {
    #[new]
    #[pyo3(signature = (size, translation, rotation=[0.0; 3], pivot="c", color=None, scale=[1.0; 3]))]
    fn new(
        size: [f64; 3],
        translation: [f64; 3],
        rotation: [f64; 3],
        pivot: &str,
        color: Option<[u8; 3]>,
        scale: [f64; 3],
    ) -> PyResult<Self> {
        let color = color.map(|[r, g, b]| Color::new(r, g, b)).unwrap_or_default();
        Ok(BoxyData::new(vec3(size), vec3(translation), parse_anchor(pivot)?)
            .with_rotation(vec3(rotation))
            .with_color(color)
            .with_scale(vec3(scale))
            .into())
    }

    /// Boxy on bounds with its pivot at `pivot`.
    #[staticmethod]
    #[pyo3(signature = (bounds, pivot="f2", inherit_scale=false))]
    fn from_bounds(bounds: &PyBounds, pivot: &str, inherit_scale: bool) -> PyResult<Self> {
        Ok(BoxyData::from_bounds(&bounds.inner, parse_anchor(pivot)?, Color::default(), inherit_scale).into())
    }

    /// Boxy occupying the same box as a polycube.
    #[staticmethod]
    #[pyo3(signature = (mesh, pivot=None, inherit_scale=false))]
    fn from_polycube(mesh: &PyMesh, pivot: Option<&str>, inherit_scale: bool) -> PyResult<Self> {
        let pivot = pivot.map(parse_anchor).transpose()?;
        let settings = Settings::load();
        Ok(BoxyData::from_polycube_with(&mesh.inner, pivot, settings.default_color, inherit_scale, &settings)?.into())
    }

    #[getter]
    fn size(&self) -> [f64; 3] {
        self.inner.size.to_array()
    }

    #[getter]
    fn translation(&self) -> [f64; 3] {
        self.inner.translation.to_array()
    }

    #[getter]
    fn rotation(&self) -> [f64; 3] {
        self.inner.rotation.to_array()
    }

    #[getter]
    fn scale(&self) -> [f64; 3] {
        self.inner.scale.to_array()
    }

    #[getter]
    fn pivot(&self) -> String {
        self.inner.pivot_anchor.to_string()
    }

    /// Pivot attribute index for the DCC node.
    #[getter]
    fn pivot_index(&self) -> usize {
        self.inner.pivot_anchor.index()
    }

    #[getter]
    fn color(&self) -> [u8; 3] {
        self.inner.color.values()
    }

    #[getter]
    fn center(&self) -> [f64; 3] {
        self.inner.center().to_array()
    }

    fn bounds(&self) -> PyBounds {
        self.inner.bounds().into()
    }

    /// JSON record including the center.
    fn record(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner.record())
            .map_err(|e| crate::util::Error::from(e).into())
    }

    fn with_pivot(&self, pivot: &str) -> PyResult<Self> {
        Ok(self.inner.with_pivot(parse_anchor(pivot)?).into())
    }

    fn bake_scale(&self) -> Self {
        self.inner.bake_scale().into()
    }

    #[pyo3(signature = (pivot=None, color=None))]
    fn rebuild(&self, pivot: Option<&str>, color: Option<[u8; 3]>) -> PyResult<Self> {
        let pivot = pivot.map(parse_anchor).transpose()?;
        let color = color.map(|[r, g, b]| Color::new(r, g, b));
        Ok(self.inner.rebuild(pivot, color).into())
    }

    /// Turn the frame by a multiple of 90 degrees about `x`, `y` or `z`.
    fn reorient(&self, degrees: f64, axis: &str) -> PyResult<Self> {
        let axis: Axis = axis.parse()?;
        Ok(self.inner.reorient(degrees, axis)?.into())
    }

    #[pyo3(signature = (inherit_scale=false))]
    fn to_polycube(&self, inherit_scale: bool) -> PyMesh {
        self.inner.to_polycube(inherit_scale).into()
    }

    fn __repr__(&self) -> String {
        let b = &self.inner;
        format!(
            "<BoxyData size={} translation={} rotation={} pivot={} color={} scale={}>",
            b.size, b.translation, b.rotation, b.pivot_anchor, b.color, b.scale
        )
    }
}

/// Convert a boxy to a polycube mesh or a polycube mesh to a boxy.
#[pyfunction]
#[pyo3(signature = (item, inherit_scale=false))]
pub fn toggle_polycube(py: Python<'_>, item: &Bound<'_, PyAny>, inherit_scale: bool) -> PyResult<Py<PyAny>> {
    if let Ok(boxy) = item.extract::<PyRef<'_, PyBoxyData>>() {
        let mesh: PyMesh = boxy.inner.to_polycube(inherit_scale).into();
        return Ok(Py::new(py, mesh)?.into_any());
    }
    let mesh = item.extract::<PyRef<'_, PyMesh>>()?;
    let settings = Settings::load();
    let boxy = BoxyData::from_polycube_with(&mesh.inner, None, settings.default_color, inherit_scale, &settings)?;
    Ok(Py::new(py, PyBoxyData::from(boxy))?.into_any())
}
