//! Integration tests for recovering cuboids from partial point sets.

use boxy::cuboid::find_cuboid;
use boxy::prelude::*;

fn placed_cube(size: DVec3, translation: DVec3, rotation: DVec3) -> Mesh {
    Mesh::cube(size).with_transform(Transform::from_translation(translation).with_rotation(rotation))
}

/// Every input point lies on a corner of the recovered box.
fn assert_corners_cover(bounds: &Bounds, points: &[DVec3]) {
    let corners = bounds.vertices();
    for p in points {
        let nearest = corners
            .iter()
            .map(|c| c.distance(*p))
            .fold(f64::INFINITY, f64::min);
        assert!(nearest < 1e-3, "point {} is {} away from the recovered box", p, nearest);
    }
}

#[test]
fn test_oblique_box_from_six_corners() {
    let mesh = placed_cube(
        DVec3::new(1.5, 2.5, 4.0),
        DVec3::new(-3.0, 7.0, 12.0),
        DVec3::new(20.0, 35.0, 10.0),
    );
    let world = mesh.world_positions();
    // Corner 2 keeps its three neighbours 0, 3 and 4.
    let points: Vec<DVec3> = world[..6].to_vec();

    let bounds = CuboidFinder::default().find(&points, None).expect("cuboid").bounds();
    assert_corners_cover(&bounds, &world);
    assert!((bounds.size.x * bounds.size.y * bounds.size.z - 15.0).abs() < 1e-2);
    assert!(bounds.position.distance(DVec3::new(-3.0, 7.0, 12.0)) < 1e-3);
}

#[test]
fn test_every_corner_count() {
    let mesh = placed_cube(DVec3::new(2.0, 4.0, 6.0), DVec3::new(1.0, 2.0, 3.0), DVec3::new(0.0, 35.0, 0.0));
    let world = mesh.world_positions();
    // Corner 2 and its neighbours come first.
    let ordered: Vec<DVec3> = [2, 0, 3, 4, 1, 5, 6, 7].iter().map(|&i| world[i]).collect();

    for count in 5..=8 {
        let bounds = get_cuboid(&Geometry::Locators(&ordered[..count]), false)
            .unwrap_or_else(|| panic!("no cuboid from {count} points"));
        assert_eq!(bounds.size, DVec3::new(2.0, 4.0, 6.0), "{count} points");
        assert_eq!(bounds.rotation, DVec3::new(0.0, 35.0, 0.0), "{count} points");
        assert_eq!(bounds.position, DVec3::new(1.0, 2.0, 3.0), "{count} points");
    }
}

#[test]
fn test_reference_rotation_keeps_frame() {
    let mesh = placed_cube(DVec3::new(2.0, 4.0, 6.0), DVec3::ZERO, DVec3::new(0.0, 90.0, 0.0));
    let points = mesh.world_positions();
    let finder = CuboidFinder::default();

    let plain = finder.find(&points, None).expect("cuboid");
    assert_eq!(plain.rotation, DVec3::ZERO);
    assert_eq!(plain.size, DVec3::new(6.0, 4.0, 2.0));

    let kept = finder.find(&points, Some(DVec3::new(0.0, 90.0, 0.0))).expect("cuboid");
    assert_eq!(kept.rotation, DVec3::new(0.0, 90.0, 0.0));
    assert_eq!(kept.size, DVec3::new(2.0, 4.0, 6.0));
}

#[test]
fn test_mesh_rotation_is_the_reference() {
    let mesh = placed_cube(DVec3::new(2.0, 4.0, 6.0), DVec3::new(0.0, 0.0, 5.0), DVec3::new(0.0, 90.0, 0.0));
    let bounds = get_cuboid(&Geometry::Mesh(&mesh), false).expect("cuboid");
    assert_eq!(bounds.rotation, DVec3::new(0.0, 90.0, 0.0));
    assert_eq!(bounds.size, DVec3::new(2.0, 4.0, 6.0));
}

#[test]
fn test_rejects_bad_input() {
    let finder = CuboidFinder::default();
    let square = [
        DVec3::ZERO,
        DVec3::X,
        DVec3::Y,
        DVec3::new(1.0, 1.0, 0.0),
    ];
    assert!(matches!(
        finder.find(&square, None),
        Err(Error::InsufficientPoints { got: 4, .. })
    ));

    let nine = vec![DVec3::ZERO; 9];
    assert!(matches!(finder.find(&nine, None), Err(Error::InsufficientPoints { got: 9, .. })));

    // Coplanar points never have three orthogonal edges.
    let grid: Vec<DVec3> = (0..6).map(|i| DVec3::new((i % 3) as f64, (i / 3) as f64, 0.0)).collect();
    assert!(matches!(finder.find(&grid, None), Err(Error::NoCuboid(6))));
    assert!(get_cuboid(&Geometry::Locators(&grid), false).is_none());
}

#[test]
fn test_settings_drive_the_finder() {
    let mut settings = Settings::default();
    settings.decimal_places = 1;
    let finder = CuboidFinder::new(&settings);

    let mesh = placed_cube(DVec3::new(1.23, 1.0, 1.0), DVec3::new(0.04, 0.0, 0.0), DVec3::ZERO);
    let bounds = find_cuboid(&Geometry::Mesh(&mesh), false, &finder).expect("cuboid");
    assert_eq!(bounds.size, DVec3::new(1.2, 1.0, 1.0));
    assert_eq!(bounds.position, DVec3::ZERO);
}

#[test]
fn test_batch_inference() {
    let boxes: Vec<Vec<DVec3>> = (0..16)
        .map(|i| {
            let yaw = i as f64 * 2.5;
            placed_cube(DVec3::new(1.0, 2.0, 3.0), DVec3::new(i as f64, 0.0, 0.0), DVec3::new(0.0, yaw, 0.0))
                .world_positions()
        })
        .collect();

    let results = CuboidFinder::default().find_many(&boxes);
    assert_eq!(results.len(), 16);
    for (i, result) in results.iter().enumerate() {
        let cuboid = result.as_ref().expect("cuboid");
        assert_eq!(cuboid.center, DVec3::new(i as f64, 0.0, 0.0));
        assert_eq!(cuboid.rotation, DVec3::new(0.0, i as f64 * 2.5, 0.0));
    }
}
