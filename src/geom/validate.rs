//! Rectangle and cuboid face-pair checks.

use super::mesh::{face_dimensions, face_normal, Mesh};
use crate::util::{midpoint, DVec3, Error, Result};
use serde::{Deserialize, Serialize};

/// Which way face normals point relative to the solid.
///
/// `Convex` is a closed box with outward normals. `Concave` is the inside of a
/// room, where normals point toward the opposite wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceDirection {
    Concave,
    #[default]
    Convex,
}

/// Tolerances for face validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceTolerances {
    /// Max distance of the fourth vertex from the plane of the first three.
    pub coplanar: f64,
    /// Max deviation from 90 degrees at each corner, in degrees.
    pub angle: f64,
    /// Max difference between matching face dimensions.
    pub dimension: f64,
    /// Normals must satisfy `n1 . n2 < -normal`.
    pub normal: f64,
    /// Center-to-center direction must satisfy `|d . n1| >= parallelism`.
    pub parallelism: f64,
}

impl Default for FaceTolerances {
    fn default() -> Self {
        Self {
            coplanar: 1e-4,
            angle: 1.0,
            dimension: 1e-3,
            normal: 0.98,
            parallelism: 0.98,
        }
    }
}

/// Check that four vertices lie on one plane.
pub fn check_vertices_coplanar(vertices: &[DVec3], tolerance: f64) -> Result<()> {
    let [v0, v1, v2, v3] = four(vertices)?;
    let normal = (v1 - v0).cross(v2 - v0);
    if normal.length() < 1e-10 {
        return Err(Error::InvalidQuad(
            "first three vertices are collinear, cannot define a plane".into(),
        ));
    }
    let distance = normal.normalize().dot(v3 - v0).abs();
    if distance > tolerance {
        return Err(Error::InvalidQuad(format!(
            "fourth vertex is {distance:.6} units from plane (tolerance: {tolerance})"
        )));
    }
    Ok(())
}

/// Check that every corner of a quad is a right angle within `tolerance`
/// degrees.
pub fn check_all_right_angles(vertices: &[DVec3], tolerance: f64) -> Result<()> {
    let corners = four(vertices)?;
    for i in 0..4 {
        let current = corners[i];
        let previous = corners[(i + 3) % 4];
        let next = corners[(i + 1) % 4];
        let (Some(a), Some(b)) = (
            (previous - current).try_normalize(),
            (next - current).try_normalize(),
        ) else {
            return Err(Error::InvalidQuad(format!("corner {i} has a zero-length edge")));
        };
        let angle = a.dot(b).clamp(-1.0, 1.0).acos().to_degrees();
        if (angle - 90.0).abs() > tolerance {
            return Err(Error::InvalidQuad(format!(
                "corner {i} is {angle:.2} degrees (tolerance: {tolerance})"
            )));
        }
    }
    Ok(())
}

fn four(vertices: &[DVec3]) -> Result<[DVec3; 4]> {
    <[DVec3; 4]>::try_from(vertices)
        .map_err(|_| Error::InvalidQuad(format!("expected 4 vertices, got {}", vertices.len())))
}

/// Check that a mesh face is a planar rectangle.
pub fn validate_quadrilateral(mesh: &Mesh, face: usize, tolerances: &FaceTolerances) -> Result<()> {
    let vertices = mesh.face_vertices(face)?;
    if vertices.len() != 4 {
        return Err(Error::InvalidQuad(format!(
            "face {face} has {} vertices, expected 4",
            vertices.len()
        )));
    }
    check_vertices_coplanar(&vertices, tolerances.coplanar)
        .map_err(|e| Error::InvalidQuad(format!("face {face} is not co-planar: {e}")))?;
    check_all_right_angles(&vertices, tolerances.angle)
        .map_err(|e| Error::InvalidQuad(format!("face {face} does not have right angles: {e}")))?;
    Ok(())
}

/// Check that two faces are opposite sides of a rectangular prism.
///
/// Returns the distance between the face centers.
pub fn validate_cuboid_faces(
    mesh: &Mesh,
    face1: usize,
    face2: usize,
    direction: SurfaceDirection,
    tolerances: &FaceTolerances,
) -> Result<f64> {
    let invalid = Error::InvalidCuboidFaces;

    validate_quadrilateral(mesh, face1, tolerances)
        .map_err(|e| invalid(format!("face {face1} is not a valid rectangle: {e}")))?;
    validate_quadrilateral(mesh, face2, tolerances)
        .map_err(|e| invalid(format!("face {face2} is not a valid rectangle: {e}")))?;

    let vertices1 = mesh.face_vertices(face1)?;
    let vertices2 = mesh.face_vertices(face2)?;
    let normal1 = face_normal(&vertices1)?;
    let normal2 = face_normal(&vertices2)?;
    let center1 = midpoint(&vertices1).unwrap_or_default();
    let center2 = midpoint(&vertices2).unwrap_or_default();

    let center_vector = center2 - center1;
    let Some(direction_unit) = center_vector.try_normalize() else {
        return Err(invalid(format!("faces {face1} and {face2} share a center")));
    };

    let dot1 = normal1.dot(direction_unit);
    let dot2 = normal2.dot(direction_unit);
    match direction {
        SurfaceDirection::Concave => {
            if dot1 <= 0.0 {
                return Err(invalid(format!(
                    "face {face1} normal does not point towards face {face2} (concave, dot: {dot1:.4})"
                )));
            }
            if dot2 >= 0.0 {
                return Err(invalid(format!(
                    "face {face2} normal does not point towards face {face1} (concave, dot: {dot2:.4})"
                )));
            }
        }
        SurfaceDirection::Convex => {
            if dot1 >= 0.0 {
                return Err(invalid(format!(
                    "face {face1} normal does not point away from face {face2} (convex, dot: {dot1:.4})"
                )));
            }
            if dot2 <= 0.0 {
                return Err(invalid(format!(
                    "face {face2} normal does not point away from face {face1} (convex, dot: {dot2:.4})"
                )));
            }
        }
    }

    let dims1 = face_dimensions(&vertices1)?;
    let dims2 = face_dimensions(&vertices2)?;
    if (dims1[0] - dims2[0]).abs() >= tolerances.dimension
        || (dims1[1] - dims2[1]).abs() >= tolerances.dimension
    {
        return Err(invalid(format!("face dimensions don't match: {dims1:?} vs {dims2:?}")));
    }

    let normal_dot = normal1.dot(normal2);
    if normal_dot > -tolerances.normal {
        return Err(invalid(format!(
            "face normals not opposite (dot: {normal_dot:.4}, expected < {})",
            -tolerances.normal
        )));
    }

    let parallelism = dot1.abs();
    if parallelism < tolerances.parallelism {
        return Err(invalid(format!(
            "faces are not aligned (parallelism: {parallelism:.4}, expected > {})",
            tolerances.parallelism
        )));
    }

    Ok(center_vector.length())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::FaceLoop;
    use crate::util::euler_xyz_matrix;

    fn square() -> Vec<DVec3> {
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(2.0, 0.0, 1.0),
            DVec3::new(0.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn test_coplanar() {
        let mut quad = square();
        assert!(check_vertices_coplanar(&quad, 1e-4).is_ok());
        quad[3].y = 0.01;
        assert!(check_vertices_coplanar(&quad, 1e-4).is_err());
        let collinear = [DVec3::ZERO, DVec3::X, DVec3::X * 2.0, DVec3::Y];
        assert!(check_vertices_coplanar(&collinear, 1e-4).is_err());
        assert!(check_vertices_coplanar(&quad[..3], 1e-4).is_err());
    }

    #[test]
    fn test_right_angles() {
        let mut quad = square();
        assert!(check_all_right_angles(&quad, 1.0).is_ok());
        quad[2].x = 2.5;
        assert!(check_all_right_angles(&quad, 1.0).is_err());
    }

    #[test]
    fn test_cuboid_faces_convex() {
        let cube = Mesh::cube(DVec3::new(2.0, 4.0, 6.0));
        let tol = FaceTolerances::default();
        // front / back
        let distance = validate_cuboid_faces(&cube, 0, 2, SurfaceDirection::Convex, &tol).unwrap();
        assert!((distance - 6.0).abs() < 1e-12);
        // outward normals are not concave
        assert!(validate_cuboid_faces(&cube, 0, 2, SurfaceDirection::Concave, &tol).is_err());
        // adjacent faces are never opposite
        assert!(validate_cuboid_faces(&cube, 0, 1, SurfaceDirection::Convex, &tol).is_err());
    }

    #[test]
    fn test_cuboid_faces_concave() {
        let mut room = Mesh::cube(DVec3::splat(3.0));
        for face in room.faces.iter_mut() {
            face.reverse();
        }
        let tol = FaceTolerances::default();
        assert!(validate_cuboid_faces(&room, 1, 3, SurfaceDirection::Concave, &tol).is_ok());
        assert!(validate_cuboid_faces(&room, 1, 3, SurfaceDirection::Convex, &tol).is_err());
    }

    #[test]
    fn test_dimension_mismatch() {
        // Two parallel rectangles of different size.
        let mut positions = square();
        positions.extend(square().iter().map(|p| DVec3::new(p.x * 1.5, 3.0, p.z)));
        let mesh = Mesh::new(
            "slabs",
            positions,
            vec![FaceLoop::from_slice(&[0, 1, 2, 3]), FaceLoop::from_slice(&[4, 7, 6, 5])],
        );
        let tol = FaceTolerances::default();
        let err = validate_cuboid_faces(&mesh, 0, 1, SurfaceDirection::Convex, &tol).unwrap_err();
        assert!(err.to_string().contains("dimensions"));
    }

    #[test]
    fn test_rotated_cube_still_valid() {
        let mut cube = Mesh::cube(DVec3::new(1.0, 2.0, 3.0));
        let m = euler_xyz_matrix(DVec3::new(15.0, 40.0, -70.0));
        for p in cube.positions.iter_mut() {
            *p = m * *p;
        }
        let tol = FaceTolerances::default();
        assert!(validate_cuboid_faces(&cube, 4, 5, SurfaceDirection::Convex, &tol).is_ok());
    }
}
