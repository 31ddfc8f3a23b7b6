//! Python wrapper for meshes and mesh-based queries.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use super::bounds::{vec3, PyBounds};
use super::parse_anchor;
use crate::config::Settings;
use crate::core::Transform;
use crate::cuboid::{self, Geometry};
use crate::geom::{self, FaceLoop, Mesh, SurfaceDirection};

/// Python wrapper for a mesh with a transform.
#[pyclass(name = "Mesh")]
pub struct PyMesh {
    pub(crate) inner: Mesh,
}

impl From<Mesh> for PyMesh {
    fn from(inner: Mesh) -> Self {
        Self { inner }
    }
}

#[pymethods]
impl PyMesh {
    #[new]
    #[pyo3(signature = (positions, faces, translation=[0.0; 3], rotation=[0.0; 3], scale=[1.0; 3], pivot=[0.0; 3], name="mesh"))]
    fn new(
        positions: Vec<[f64; 3]>,
        faces: Vec<Vec<usize>>,
        translation: [f64; 3],
        rotation: [f64; 3],
        scale: [f64; 3],
        pivot: [f64; 3],
        name: &str,
    ) -> Self {
        let positions = positions.into_iter().map(vec3).collect();
        let faces = faces.into_iter().map(FaceLoop::from_vec).collect();
        let transform = Transform::from_translation(vec3(translation))
            .with_rotation(vec3(rotation))
            .with_scale(vec3(scale))
            .with_pivot(vec3(pivot));
        Mesh::new(name, positions, faces).with_transform(transform).into()
    }

    /// A polycube of `size` with its pivot on `pivot` at the origin.
    #[staticmethod]
    #[pyo3(signature = (size, pivot="c"))]
    fn polycube(size: [f64; 3], pivot: &str) -> PyResult<Self> {
        Ok(Mesh::polycube(vec3(size), parse_anchor(pivot)?).into())
    }

    #[getter]
    fn name(&self) -> String {
        self.inner.name.clone()
    }

    #[getter]
    fn pivot_anchor(&self) -> Option<String> {
        self.inner.pivot_anchor.map(|a| a.to_string())
    }

    fn world_positions(&self) -> Vec<[f64; 3]> {
        self.inner.world_positions().iter().map(|p| p.to_array()).collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "<Mesh '{}' vertices={} faces={}>",
            self.inner.name,
            self.inner.vertex_count(),
            self.inner.face_count()
        )
    }
}

fn geometry<'a>(mesh: &'a Mesh, component: Option<&str>, indices: &'a [usize]) -> PyResult<Geometry<'a>> {
    Ok(match component {
        None | Some("object") => Geometry::Mesh(mesh),
        Some("f" | "face" | "faces") => Geometry::Faces(mesh, indices),
        Some("e" | "edge" | "edges") => Geometry::Edges(mesh, indices),
        Some("vtx" | "vertex" | "vertices") => Geometry::Vertices(mesh, indices),
        Some(other) => return Err(PyValueError::new_err(format!("Unknown component type: {other}"))),
    })
}

/// Oriented cuboid of a mesh or its components, or None.
#[pyfunction]
#[pyo3(signature = (mesh, component=None, indices=Vec::new(), inherit_scale=false))]
pub fn get_mesh_cuboid(
    mesh: &PyMesh,
    component: Option<&str>,
    indices: Vec<usize>,
    inherit_scale: bool,
) -> PyResult<Option<PyBounds>> {
    let geometry = geometry(&mesh.inner, component, &indices)?;
    Ok(cuboid::get_cuboid_with(&geometry, inherit_scale, &Settings::load()).map(PyBounds::from))
}

/// Axis-aligned bounds of a mesh or its components.
#[pyfunction]
#[pyo3(signature = (mesh, component=None, indices=Vec::new(), inherit_rotation=false, inherit_scale=false))]
pub fn get_mesh_bounds(
    mesh: &PyMesh,
    component: Option<&str>,
    indices: Vec<usize>,
    inherit_rotation: bool,
    inherit_scale: bool,
) -> PyResult<PyBounds> {
    let geometry = geometry(&mesh.inner, component, &indices)?;
    Ok(cuboid::get_bounds(&geometry, inherit_rotation, inherit_scale)?.into())
}

/// Index of the face opposite `face`, or None.
#[pyfunction]
#[pyo3(signature = (mesh, face, concave=false))]
pub fn get_opposite_face(mesh: &PyMesh, face: usize, concave: bool) -> Option<usize> {
    let direction = if concave {
        SurfaceDirection::Concave
    } else {
        SurfaceDirection::Convex
    };
    geom::get_opposite_face(&mesh.inner, face, direction)
}
