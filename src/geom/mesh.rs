//! Polygon meshes with a transform.

use crate::anchor::Anchor;
use crate::core::Transform;
use crate::util::{midpoint, normal_from_points, DVec3, Error, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Vertex loop of one face. Quads stay inline.
pub type FaceLoop = SmallVec<[usize; 4]>;

/// An undirected edge as a sorted vertex index pair.
pub type Edge = [usize; 2];

/// Vertex positions of a unit-size polyCube, in Maya's vertex order.
const CUBE_VERTICES: [[f64; 3]; 8] = [
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [-0.5, 0.5, 0.5],
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, -0.5],
    [0.5, 0.5, -0.5],
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
];

/// Face loops of a polyCube: front, top, back, bottom, right, left.
const CUBE_FACES: [[usize; 4]; 6] = [
    [0, 1, 3, 2],
    [2, 3, 5, 4],
    [4, 5, 7, 6],
    [6, 7, 1, 0],
    [1, 7, 5, 3],
    [6, 0, 2, 4],
];

/// A polygon mesh in object space plus the transform placing it in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    #[serde(default)]
    pub name: String,
    /// Object-space vertex positions.
    pub positions: Vec<DVec3>,
    pub faces: Vec<FaceLoop>,
    #[serde(default)]
    pub transform: Transform,
    /// Pivot anchor recorded when the mesh was built as a polycube.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot_anchor: Option<Anchor>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, positions: Vec<DVec3>, faces: Vec<FaceLoop>) -> Self {
        Self {
            name: name.into(),
            positions,
            faces,
            transform: Transform::IDENTITY,
            pivot_anchor: None,
        }
    }

    /// A cube centered on the object origin, laid out like Maya's polyCube.
    pub fn cube(size: DVec3) -> Self {
        let positions = CUBE_VERTICES
            .iter()
            .map(|v| DVec3::from_array(*v) * size)
            .collect();
        let faces = CUBE_FACES.iter().map(|f| FaceLoop::from_slice(f)).collect();
        Self::new("pCube", positions, faces)
    }

    /// A cube whose pivot sits on `pivot` and whose pivot is placed at the
    /// world origin.
    pub fn polycube(size: DVec3, pivot: Anchor) -> Self {
        let mut mesh = Self::cube(size);
        mesh.name = "polycube".to_string();
        let pivot_position = pivot.offset(size * 0.5);
        mesh.transform = Transform::from_translation(-pivot_position).with_pivot(pivot_position);
        mesh.pivot_anchor = Some(pivot);
        mesh
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Six faces and eight vertices.
    pub fn is_simple_cuboid(&self) -> bool {
        self.face_count() == 6 && self.vertex_count() == 8
    }

    /// Unique edges in order of first appearance around the face loops.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = Vec::new();
        for face in &self.faces {
            for (i, &a) in face.iter().enumerate() {
                let b = face[(i + 1) % face.len()];
                let edge = if a < b { [a, b] } else { [b, a] };
                if !edges.contains(&edge) {
                    edges.push(edge);
                }
            }
        }
        edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges().len()
    }

    /// Object-space position of a vertex.
    pub fn vertex(&self, index: usize) -> Result<DVec3> {
        self.positions
            .get(index)
            .copied()
            .ok_or(Error::ComponentOutOfRange {
                kind: "vertex",
                index,
                count: self.vertex_count(),
            })
    }

    #[inline]
    pub fn world_vertex(&self, index: usize) -> Result<DVec3> {
        Ok(self.transform.world_point(self.vertex(index)?))
    }

    pub fn world_positions(&self) -> Vec<DVec3> {
        self.world_positions_with(true, true)
    }

    /// World positions with rotation and/or scale switched off.
    pub fn world_positions_with(&self, rotate: bool, scale: bool) -> Vec<DVec3> {
        self.positions
            .iter()
            .map(|p| self.transform.world_point_with(*p, rotate, scale))
            .collect()
    }

    pub fn face(&self, index: usize) -> Result<&FaceLoop> {
        self.faces.get(index).ok_or(Error::ComponentOutOfRange {
            kind: "face",
            index,
            count: self.face_count(),
        })
    }

    /// World positions of a face's vertices, in winding order.
    pub fn face_vertices(&self, index: usize) -> Result<Vec<DVec3>> {
        self.face(index)?
            .iter()
            .map(|&v| self.world_vertex(v))
            .collect()
    }

    /// World positions of an edge's two vertices.
    pub fn edge_vertices(&self, index: usize) -> Result<[DVec3; 2]> {
        let edges = self.edges();
        let [a, b] = *edges.get(index).ok_or(Error::ComponentOutOfRange {
            kind: "edge",
            index,
            count: edges.len(),
        })?;
        Ok([self.world_vertex(a)?, self.world_vertex(b)?])
    }

    pub fn face_center(&self, index: usize) -> Result<DVec3> {
        let vertices = self.face_vertices(index)?;
        midpoint(&vertices).ok_or_else(|| Error::EmptyGeometry(format!("face {index}")))
    }

    /// Unit normal from the first three vertices of the face.
    pub fn face_normal(&self, index: usize) -> Result<DVec3> {
        face_normal(&self.face_vertices(index)?)
    }

    /// Lengths of the first two edges of the face, shortest first.
    pub fn face_dimensions(&self, index: usize) -> Result<[f64; 2]> {
        face_dimensions(&self.face_vertices(index)?)
    }
}

/// Unit normal of a face from its first three vertices.
pub fn face_normal(vertices: &[DVec3]) -> Result<DVec3> {
    match vertices {
        [a, b, c, ..] => normal_from_points(*a, *b, *c),
        _ => Err(Error::InvalidQuad(format!(
            "{} vertices cannot define a normal",
            vertices.len()
        ))),
    }
}

/// Lengths of the first two edges of a face, shortest first.
pub fn face_dimensions(vertices: &[DVec3]) -> Result<[f64; 2]> {
    match vertices {
        [a, b, c, ..] => {
            let first = a.distance(*b);
            let second = b.distance(*c);
            Ok([first.min(second), first.max(second)])
        }
        _ => Err(Error::InvalidQuad(format!(
            "{} vertices have no dimensions",
            vertices.len()
        ))),
    }
}
