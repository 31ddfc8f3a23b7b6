//! Polygon meshes and face queries.
//!
//! - [`Mesh`] - vertex positions, face loops and a [`Transform`](crate::core::Transform)
//! - [`validate_quadrilateral`] / [`validate_cuboid_faces`] - rectangle checks
//! - [`FaceFinder`] - opposite face search

pub mod face_finder;
pub mod mesh;
pub mod validate;

pub use face_finder::{get_opposite_face, get_opposite_faces, FaceFinder, FaceFinderOptions, FacePair};
pub use mesh::{face_dimensions, face_normal, Edge, FaceLoop, Mesh};
pub use validate::{
    check_all_right_angles, check_vertices_coplanar, validate_cuboid_faces, validate_quadrilateral,
    FaceTolerances, SurfaceDirection,
};
