//! Integration tests for opposite face search on rooms and multi-box meshes.

use boxy::geom::{FaceFinder, FaceFinderOptions, FaceLoop};
use boxy::prelude::*;

/// A box seen from the inside: every face loop reversed.
fn room(size: DVec3) -> Mesh {
    let mut mesh = Mesh::cube(size);
    mesh.name = "room".to_string();
    for face in &mut mesh.faces {
        face.reverse();
    }
    mesh
}

/// Two unit cubes in one mesh, the second shifted along +X.
fn two_cubes(gap: f64) -> Mesh {
    let cube = Mesh::cube(DVec3::ONE);
    let shift = DVec3::new(1.0 + gap, 0.0, 0.0);
    let mut positions = cube.positions.clone();
    positions.extend(cube.positions.iter().map(|p| *p + shift));
    let mut faces = cube.faces.clone();
    faces.extend(cube.faces.iter().map(|f| f.iter().map(|i| i + 8).collect::<FaceLoop>()));
    Mesh::new("pair", positions, faces)
}

#[test]
fn test_room_walls_face_each_other() {
    let mesh = room(DVec3::new(4.0, 3.0, 5.0));
    // front/back, top/bottom, right/left
    for (face, opposite) in [(0, 2), (1, 3), (4, 5)] {
        assert_eq!(get_opposite_face(&mesh, face, SurfaceDirection::Concave), Some(opposite));
        assert_eq!(get_opposite_face(&mesh, opposite, SurfaceDirection::Concave), Some(face));
        assert_eq!(get_opposite_face(&mesh, face, SurfaceDirection::Convex), None);
    }
}

#[test]
fn test_room_distances() {
    let mesh = room(DVec3::new(4.0, 3.0, 5.0)).with_transform(
        Transform::from_translation(DVec3::new(10.0, 0.0, 10.0)).with_rotation(DVec3::new(0.0, 45.0, 0.0)),
    );
    let options = FaceFinderOptions {
        direction: SurfaceDirection::Concave,
        ..Default::default()
    };
    let finder = FaceFinder::new(&mesh, options);
    for (face, distance) in [(0, 5.0), (1, 3.0), (4, 4.0)] {
        let pair = finder.find(face).expect("opposite wall");
        assert!((pair.distance - distance).abs() < 1e-9, "face {face}");
    }
}

#[test]
fn test_closest_box_wins() {
    let mesh = two_cubes(2.0);
    let finder = FaceFinder::new(&mesh, FaceFinderOptions::default());

    // Left face of the first cube: its own right face, then the far cube's.
    let candidates = finder.candidates(5);
    let opposites: Vec<usize> = candidates.iter().map(|p| p.opposite).collect();
    assert_eq!(opposites, vec![4, 10]);
    assert!((candidates[0].distance - 1.0).abs() < 1e-9);
    assert!((candidates[1].distance - 4.0).abs() < 1e-9);

    assert_eq!(get_opposite_face(&mesh, 5, SurfaceDirection::Convex), Some(4));
    assert_eq!(get_opposite_face(&mesh, 11, SurfaceDirection::Convex), Some(10));
}

#[test]
fn test_non_quad_faces() {
    let mut mesh = Mesh::cube(DVec3::ONE);
    // Collapse the front face into a triangle.
    mesh.faces[0] = FaceLoop::from_slice(&[0, 1, 3]);
    assert_eq!(get_opposite_face(&mesh, 0, SurfaceDirection::Convex), None);
    // The back face no longer has a matching partner.
    assert_eq!(get_opposite_face(&mesh, 2, SurfaceDirection::Convex), None);
    assert_eq!(get_opposite_face(&mesh, 1, SurfaceDirection::Convex), Some(3));
    assert_eq!(get_opposite_face(&mesh, 99, SurfaceDirection::Convex), None);
}

#[test]
fn test_settings_direction() {
    let mut settings = Settings::default();
    settings.surface_direction = SurfaceDirection::Concave;
    let mesh = room(DVec3::ONE);
    let pair = FaceFinder::new(&mesh, settings.face_finder_options()).find(1);
    assert_eq!(pair.map(|p| p.opposite), Some(3));
}
