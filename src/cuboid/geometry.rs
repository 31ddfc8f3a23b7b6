//! Point sources for cuboid and bounds queries.

use super::finder::{CuboidFinder, MAX_POINTS, MIN_POINTS};
use crate::boxy::BoxyData;
use crate::config::Settings;
use crate::core::{Bounds, Transform};
use crate::geom::Mesh;
use crate::util::{round_vec, BBox3d, DMat3, DVec3, Error, Result};
use tracing::{debug, warn};

/// Where the points of a query come from.
#[derive(Debug, Clone, Copy)]
pub enum Geometry<'a> {
    /// A whole object. Cuboid queries need exactly 8 vertices.
    Mesh(&'a Mesh),
    /// Face indices on one mesh.
    Faces(&'a Mesh, &'a [usize]),
    /// Edge indices on one mesh.
    Edges(&'a Mesh, &'a [usize]),
    /// Vertex indices on one mesh.
    Vertices(&'a Mesh, &'a [usize]),
    /// World positions of locators.
    Locators(&'a [DVec3]),
    /// An existing boxy.
    Boxy(&'a BoxyData),
    /// Several whole objects.
    Meshes(&'a [Mesh]),
}

impl<'a> Geometry<'a> {
    /// The single mesh the points come from, if any.
    pub fn mesh(&self) -> Option<&'a Mesh> {
        match *self {
            Geometry::Mesh(mesh)
            | Geometry::Faces(mesh, _)
            | Geometry::Edges(mesh, _)
            | Geometry::Vertices(mesh, _) => Some(mesh),
            Geometry::Meshes([mesh]) => Some(mesh),
            _ => None,
        }
    }

    /// Unique sorted vertex indices referenced by a component selection.
    ///
    /// `None` means every vertex of the mesh.
    pub fn vertex_indices(&self) -> Result<Option<Vec<usize>>> {
        let mut indices = match *self {
            Geometry::Faces(mesh, faces) => {
                let mut indices = Vec::new();
                for &face in faces {
                    indices.extend(mesh.face(face)?.iter().copied());
                }
                indices
            }
            Geometry::Edges(mesh, edges) => {
                let all = mesh.edges();
                let mut indices = Vec::with_capacity(edges.len() * 2);
                for &edge in edges {
                    let pair = all.get(edge).ok_or(Error::ComponentOutOfRange {
                        kind: "edge",
                        index: edge,
                        count: all.len(),
                    })?;
                    indices.extend_from_slice(pair);
                }
                indices
            }
            Geometry::Vertices(mesh, vertices) => {
                for &v in vertices {
                    mesh.vertex(v)?;
                }
                vertices.to_vec()
            }
            _ => return Ok(None),
        };
        indices.sort_unstable();
        indices.dedup();
        Ok(Some(indices))
    }

    /// Check selection sizes for a cuboid query.
    pub fn check_cuboid_counts(&self) -> Result<()> {
        let (kind, min, max, got) = match *self {
            Geometry::Mesh(mesh) => ("vertex", MAX_POINTS, MAX_POINTS, mesh.vertex_count()),
            Geometry::Faces(_, faces) => ("face", 1, 6, faces.len()),
            Geometry::Edges(_, edges) => ("edge", 3, 12, edges.len()),
            Geometry::Vertices(_, vertices) => ("vertex", MIN_POINTS, MAX_POINTS, vertices.len()),
            Geometry::Locators(points) => ("locator", MIN_POINTS, MAX_POINTS, points.len()),
            Geometry::Boxy(_) => return Ok(()),
            Geometry::Meshes(meshes) => ("object", 1, 1, meshes.len()),
        };
        if (min..=max).contains(&got) {
            Ok(())
        } else {
            Err(Error::count(kind, min, max, got))
        }
    }

    /// World positions with the full transform applied.
    #[inline]
    pub fn points(&self) -> Result<Vec<DVec3>> {
        self.points_with(true, true)
    }

    /// World positions with mesh rotation and/or scale switched off.
    ///
    /// Locators and boxies are unaffected by the switches.
    pub fn points_with(&self, rotate: bool, scale: bool) -> Result<Vec<DVec3>> {
        let points = match *self {
            Geometry::Locators(points) => points.to_vec(),
            Geometry::Boxy(boxy) => boxy.bounds().vertices().to_vec(),
            Geometry::Meshes(meshes) => meshes
                .iter()
                .flat_map(|m| m.world_positions_with(rotate, scale))
                .collect(),
            Geometry::Mesh(mesh) => mesh.world_positions_with(rotate, scale),
            Geometry::Faces(mesh, _) | Geometry::Edges(mesh, _) | Geometry::Vertices(mesh, _) => {
                let world = mesh.world_positions_with(rotate, scale);
                self.vertex_indices()?
                    .unwrap_or_default()
                    .into_iter()
                    .map(|i| {
                        world.get(i).copied().ok_or(Error::ComponentOutOfRange {
                            kind: "vertex",
                            index: i,
                            count: world.len(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?
            }
        };
        Ok(points)
    }
}

/// Recover an oriented cuboid from a geometry source.
///
/// Mesh sources pass their rotation to the finder as the reference rotation.
/// With `inherit_scale` the mesh scale is reported separately and the size is
/// measured on the unscaled geometry.
#[tracing::instrument(skip_all, fields(inherit_scale = inherit_scale))]
pub fn find_cuboid(geometry: &Geometry, inherit_scale: bool, finder: &CuboidFinder) -> Result<Bounds> {
    if let Geometry::Boxy(boxy) = geometry {
        return Ok(if inherit_scale {
            boxy.bounds()
        } else {
            Bounds::new(boxy.size * boxy.scale, boxy.center(), boxy.rotation)
        });
    }
    geometry.check_cuboid_counts()?;

    let mesh = geometry.mesh();
    let inherit_scale = inherit_scale && mesh.is_some();
    let points = geometry.points_with(true, !inherit_scale)?;
    let reference = mesh.map(|m| m.transform.rotation);
    debug!(points = points.len(), ?reference, "finding cuboid");

    let cuboid = finder.find(&points, reference)?;
    let mut bounds = cuboid.bounds();
    if let (true, Some(mesh)) = (inherit_scale, mesh) {
        bounds.position = round_vec(scaled_about_pivot(&mesh.transform, cuboid.center), finder.decimal_places);
        bounds.scale = mesh.transform.scale;
    }
    Ok(bounds)
}

/// Map a point measured with unit scale to its position under the full
/// transform.
fn scaled_about_pivot(transform: &Transform, point: DVec3) -> DVec3 {
    let rotation = transform.rotation_matrix();
    let pivot = transform.world_pivot();
    pivot + rotation * DMat3::from_diagonal(transform.scale) * rotation.transpose() * (point - pivot)
}

/// Oriented cuboid of a geometry source, or `None` if it is not a cuboid.
pub fn get_cuboid(geometry: &Geometry, inherit_scale: bool) -> Option<Bounds> {
    get_cuboid_with(geometry, inherit_scale, &Settings::default())
}

/// [`get_cuboid`] with tolerances and rounding taken from `settings`.
pub fn get_cuboid_with(geometry: &Geometry, inherit_scale: bool, settings: &Settings) -> Option<Bounds> {
    match find_cuboid(geometry, inherit_scale, &CuboidFinder::new(settings)) {
        Ok(bounds) => Some(bounds),
        Err(e) => {
            warn!("{e}");
            None
        }
    }
}

/// Axis-aligned bounds of a geometry source.
///
/// When the points come from a single mesh, `inherit_rotation` measures the
/// bounds in the mesh's unrotated frame and `inherit_scale` on its unscaled
/// geometry. The result then carries the mesh rotation and/or scale, and its
/// center is mapped back out about the mesh's world pivot.
#[tracing::instrument(skip_all, fields(inherit_rotation = inherit_rotation, inherit_scale = inherit_scale))]
pub fn get_bounds(geometry: &Geometry, inherit_rotation: bool, inherit_scale: bool) -> Result<Bounds> {
    let mesh = geometry.mesh().filter(|_| inherit_rotation || inherit_scale);

    let points = match mesh {
        Some(_) => geometry.points_with(!inherit_rotation, !inherit_scale)?,
        None => geometry.points()?,
    };
    let bbox = BBox3d::from_points(&points);
    if bbox.is_empty() {
        return Err(Error::EmptyGeometry("no points to bound".into()));
    }
    let mut bounds = Bounds::from_bbox(&bbox);

    if let Some(mesh) = mesh {
        let transform = &mesh.transform;
        let mut linear = DMat3::IDENTITY;
        if inherit_rotation {
            linear = transform.rotation_matrix();
            bounds.rotation = transform.rotation;
        }
        if inherit_scale {
            linear *= DMat3::from_diagonal(transform.scale);
            bounds.scale = transform.scale;
        }
        let pivot = transform.world_pivot();
        bounds.position = pivot + linear * (bounds.position - pivot);
        debug!(center = %bounds.position, "inherited mesh transform");
    }
    Ok(bounds)
}

/// World axis-aligned bounds of several meshes.
pub fn bounds_from_meshes(meshes: &[Mesh]) -> Result<Bounds> {
    get_bounds(&Geometry::Meshes(meshes), false, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::Anchor;
    use crate::util::points_match;

    fn rotated_cube() -> Mesh {
        Mesh::cube(DVec3::new(2.0, 4.0, 6.0)).with_transform(
            Transform::from_translation(DVec3::new(10.0, 0.0, -5.0)).with_rotation(DVec3::new(0.0, 35.0, 0.0)),
        )
    }

    #[test]
    fn test_cuboid_from_mesh() {
        let bounds = get_cuboid(&Geometry::Mesh(&rotated_cube()), false).unwrap();
        assert_eq!(bounds.size, DVec3::new(2.0, 4.0, 6.0));
        assert_eq!(bounds.rotation, DVec3::new(0.0, 35.0, 0.0));
        assert_eq!(bounds.position, DVec3::new(10.0, 0.0, -5.0));
    }

    #[test]
    fn test_cuboid_from_components() {
        let mesh = rotated_cube();
        let faces = get_cuboid(&Geometry::Faces(&mesh, &[0, 2]), false).unwrap();
        let edges = get_cuboid(&Geometry::Edges(&mesh, &[0, 1, 2, 3, 4, 5]), false).unwrap();
        let vertices = get_cuboid(&Geometry::Vertices(&mesh, &[0, 1, 2, 3, 4]), false).unwrap();
        for bounds in [faces, edges, vertices] {
            assert_eq!(bounds.size, DVec3::new(2.0, 4.0, 6.0));
            assert_eq!(bounds.position, DVec3::new(10.0, 0.0, -5.0));
        }
    }

    #[test]
    fn test_component_counts() {
        let mesh = rotated_cube();
        assert!(matches!(
            find_cuboid(&Geometry::Vertices(&mesh, &[0, 1, 2]), false, &CuboidFinder::default()),
            Err(Error::InvalidComponentCount { kind: "vertex", got: 3, .. })
        ));
        assert!(matches!(
            find_cuboid(&Geometry::Edges(&mesh, &[0, 1]), false, &CuboidFinder::default()),
            Err(Error::InvalidComponentCount { kind: "edge", .. })
        ));
        // A single face only has four vertices.
        assert!(matches!(
            find_cuboid(&Geometry::Faces(&mesh, &[0]), false, &CuboidFinder::default()),
            Err(Error::InsufficientPoints { got: 4, .. })
        ));
        assert!(matches!(
            find_cuboid(&Geometry::Faces(&mesh, &[9]), false, &CuboidFinder::default()),
            Err(Error::ComponentOutOfRange { kind: "face", .. })
        ));
        assert!(get_cuboid(&Geometry::Meshes(&[]), false).is_none());
    }

    #[test]
    fn test_inherit_scale() {
        let mesh = Mesh::cube(DVec3::splat(2.0)).with_transform(
            Transform::from_translation(DVec3::new(0.0, 3.0, 0.0))
                .with_rotation(DVec3::new(0.0, 0.0, 30.0))
                .with_scale(DVec3::new(1.0, 2.0, 3.0))
                .with_pivot(DVec3::new(0.0, -1.0, 0.0)),
        );
        let baked = get_cuboid(&Geometry::Mesh(&mesh), false).unwrap();
        let inherited = get_cuboid(&Geometry::Mesh(&mesh), true).unwrap();
        assert_eq!(baked.size, DVec3::new(2.0, 4.0, 6.0));
        assert_eq!(inherited.size, DVec3::splat(2.0));
        assert_eq!(inherited.scale, DVec3::new(1.0, 2.0, 3.0));
        assert!(points_match(inherited.position, baked.position, 1e-3));
    }

    #[test]
    fn test_inherit_scale_rounds_position() {
        let mesh = Mesh::cube(DVec3::ONE).with_transform(
            Transform::from_translation(DVec3::new(0.1, 0.2, 0.3))
                .with_rotation(DVec3::new(0.0, 30.0, 0.0))
                .with_scale(DVec3::new(1.0 / 3.0, 1.0, 1.0))
                .with_pivot(DVec3::new(0.7, 0.0, 0.0)),
        );
        let mut settings = Settings::default();
        settings.decimal_places = 2;
        let inherited = get_cuboid_with(&Geometry::Mesh(&mesh), true, &settings).unwrap();
        assert_eq!(inherited.scale, DVec3::new(1.0 / 3.0, 1.0, 1.0));
        assert_eq!(inherited.position, round_vec(inherited.position, 2));
        let baked = get_cuboid_with(&Geometry::Mesh(&mesh), false, &settings).unwrap();
        assert!(points_match(inherited.position, baked.position, 0.011));
    }

    #[test]
    fn test_settings_reach_get_cuboid() {
        let mesh = Mesh::cube(DVec3::new(1.23, 1.0, 1.0));
        let mut settings = Settings::default();
        settings.decimal_places = 1;
        let bounds = get_cuboid_with(&Geometry::Mesh(&mesh), false, &settings).unwrap();
        assert_eq!(bounds.size, DVec3::new(1.2, 1.0, 1.0));
        assert_eq!(get_cuboid(&Geometry::Mesh(&mesh), false).unwrap().size, DVec3::new(1.23, 1.0, 1.0));
    }

    #[test]
    fn test_face_with_missing_vertex() {
        let mut mesh = Mesh::cube(DVec3::ONE);
        mesh.faces.push(crate::geom::FaceLoop::from_slice(&[0, 1, 2, 99]));
        let geometry = Geometry::Faces(&mesh, &[6]);
        assert!(matches!(
            get_bounds(&geometry, false, false),
            Err(Error::ComponentOutOfRange { kind: "vertex", index: 99, count: 8 })
        ));
        assert!(matches!(
            geometry.points(),
            Err(Error::ComponentOutOfRange { index: 99, .. })
        ));
        let faces = [1, 6];
        assert!(get_cuboid(&Geometry::Faces(&mesh, &faces), false).is_none());
    }

    #[test]
    fn test_locators() {
        let cube = Mesh::cube(DVec3::ONE);
        let points = cube.world_positions();
        let bounds = get_cuboid(&Geometry::Locators(&points[1..]), false).unwrap();
        assert_eq!(bounds.size, DVec3::ONE);
        assert_eq!(bounds.position, DVec3::ZERO);
    }

    #[test]
    fn test_boxy_source() {
        let boxy = BoxyData::new(DVec3::new(1.0, 2.0, 3.0), DVec3::ZERO, Anchor::F2).with_scale(DVec3::splat(2.0));
        let inherited = get_cuboid(&Geometry::Boxy(&boxy), true).unwrap();
        assert_eq!(inherited.size, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(inherited.scale, DVec3::splat(2.0));
        let baked = get_cuboid(&Geometry::Boxy(&boxy), false).unwrap();
        assert_eq!(baked.size, DVec3::new(2.0, 4.0, 6.0));
        assert!(points_match(baked.position, DVec3::new(0.0, 2.0, 0.0), 1e-12));
    }

    #[test]
    fn test_world_bounds() {
        let bounds = get_bounds(&Geometry::Mesh(&rotated_cube()), false, false).unwrap();
        assert_eq!(bounds.rotation, DVec3::ZERO);
        // Yawed footprint is wider than the box.
        assert!(bounds.size.x > 2.0 && bounds.size.z > 2.0);
        assert!((bounds.size.y - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_inherited_bounds() {
        let mesh = rotated_cube();
        let bounds = get_bounds(&Geometry::Mesh(&mesh), true, false).unwrap();
        assert!(points_match(bounds.size, DVec3::new(2.0, 4.0, 6.0), 1e-12));
        assert_eq!(bounds.rotation, DVec3::new(0.0, 35.0, 0.0));
        assert!(points_match(bounds.position, DVec3::new(10.0, 0.0, -5.0), 1e-12));
    }

    #[test]
    fn test_inherited_bounds_off_center_pivot() {
        // Top face only, scaled and rotated about a pivot below the mesh.
        let mesh = Mesh::cube(DVec3::splat(2.0)).with_transform(
            Transform::IDENTITY
                .with_rotation(DVec3::new(90.0, 0.0, 0.0))
                .with_scale(DVec3::new(1.0, 3.0, 1.0))
                .with_pivot(DVec3::new(0.0, -1.0, 0.0)),
        );
        let bounds = get_bounds(&Geometry::Faces(&mesh, &[1]), true, true).unwrap();
        assert!(points_match(bounds.size, DVec3::new(2.0, 0.0, 2.0), 1e-12));
        assert_eq!(bounds.scale, DVec3::new(1.0, 3.0, 1.0));
        let expected = mesh.face_center(1).unwrap();
        assert!(points_match(bounds.position, expected, 1e-9));
    }

    #[test]
    fn test_multiple_meshes() {
        let a = Mesh::cube(DVec3::ONE);
        let b = Mesh::cube(DVec3::ONE).with_transform(Transform::from_translation(DVec3::new(4.0, 0.0, 0.0)));
        let bounds = bounds_from_meshes(&[a, b]).unwrap();
        assert_eq!(bounds.size, DVec3::new(5.0, 1.0, 1.0));
        assert_eq!(bounds.position, DVec3::new(2.0, 0.0, 0.0));
        assert!(bounds_from_meshes(&[]).is_err());
    }
}
