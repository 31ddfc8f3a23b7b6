//! Boxy creation and polycube conversion.

use super::data::{detect_pivot, BoxyData};
use crate::anchor::Anchor;
use crate::color::Color;
use crate::config::Settings;
use crate::core::Transform;
use crate::cuboid::{find_cuboid, get_bounds, CuboidFinder, Geometry};
use crate::geom::Mesh;
use crate::util::{DVec3, Error, Result};
use tracing::{debug, info, warn};

/// Options for building a boxy from a selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreateOptions {
    pub pivot: Anchor,
    pub color: Color,
    pub inherit_rotation: bool,
    pub inherit_scale: bool,
    /// Edge length of a boxy built from nothing.
    pub default_size: f64,
    pub finder: CuboidFinder,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl CreateOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            pivot: settings.default_pivot,
            color: settings.default_color,
            inherit_rotation: settings.inherit_rotation,
            inherit_scale: settings.inherit_scale,
            default_size: settings.default_size,
            finder: CuboidFinder::new(settings),
        }
    }
}

/// Build a boxy around a geometry source.
///
/// With `inherit_rotation` an oriented cuboid is tried first and the
/// rotation-inheriting bounds are the fallback. A boxy source is rebuilt
/// with the requested pivot and color. Without a source, a cube of
/// `default_size` is placed with its pivot at the origin.
pub fn create(geometry: Option<&Geometry>, options: &CreateOptions) -> Result<BoxyData> {
    let Some(geometry) = geometry else {
        return Ok(BoxyData::new(DVec3::splat(options.default_size), DVec3::ZERO, options.pivot)
            .with_color(options.color));
    };
    if let Geometry::Boxy(boxy) = geometry {
        return Ok(boxy.rebuild(Some(options.pivot), Some(options.color)));
    }

    let cuboid = if options.inherit_rotation {
        find_cuboid(geometry, options.inherit_scale, &options.finder)
            .map_err(|e| debug!("no cuboid, falling back to bounds: {e}"))
            .ok()
    } else {
        None
    };
    let bounds = match cuboid {
        Some(bounds) => bounds,
        None => get_bounds(geometry, options.inherit_rotation, options.inherit_scale)?,
    };
    Ok(BoxyData::from_bounds(&bounds, options.pivot, options.color, options.inherit_scale))
}

impl BoxyData {
    /// A polycube mesh occupying the same box.
    ///
    /// The mesh pivot sits on the boxy's pivot anchor, so the transform's
    /// world pivot equals the boxy translation. Without `inherit_scale` the
    /// scale is baked into the vertices.
    pub fn to_polycube(&self, inherit_scale: bool) -> Mesh {
        let boxy = if inherit_scale { *self } else { self.bake_scale() };
        let pivot = boxy.pivot_anchor.offset(boxy.size * 0.5);
        let mut mesh = Mesh::cube(boxy.size);
        mesh.name = "polycube".to_string();
        mesh.transform = Transform::from_translation(boxy.translation - pivot)
            .with_rotation(boxy.rotation)
            .with_scale(boxy.scale)
            .with_pivot(pivot);
        mesh.pivot_anchor = Some(boxy.pivot_anchor);
        mesh
    }

    /// A boxy occupying the same box as a polycube mesh.
    ///
    /// The pivot comes from `pivot`, else the anchor stored on the mesh, else
    /// the anchor found at the mesh's world pivot.
    pub fn from_polycube(mesh: &Mesh, pivot: Option<Anchor>, color: Color, inherit_scale: bool) -> Result<Self> {
        Self::from_polycube_with(mesh, pivot, color, inherit_scale, &Settings::default())
    }

    #[tracing::instrument(skip_all, fields(mesh = %mesh.name))]
    pub fn from_polycube_with(
        mesh: &Mesh,
        pivot: Option<Anchor>,
        color: Color,
        inherit_scale: bool,
        settings: &Settings,
    ) -> Result<Self> {
        if !mesh.is_simple_cuboid() {
            return Err(Error::other(format!(
                "{} is not a polycube ({} faces, {} vertices)",
                mesh.name,
                mesh.face_count(),
                mesh.vertex_count()
            )));
        }
        let geometry = Geometry::Mesh(mesh);
        let bounds = match find_cuboid(&geometry, inherit_scale, &CuboidFinder::new(settings)) {
            Ok(bounds) => bounds,
            Err(e) => {
                warn!("{e}, using rotated bounds");
                get_bounds(&geometry, true, inherit_scale)?
            }
        };

        let anchor = match pivot.or(mesh.pivot_anchor) {
            Some(anchor) => anchor,
            None => {
                let detected = detect_pivot(mesh.transform.world_pivot(), &bounds, settings.pivot_detection_tolerance);
                debug!(%detected, "detected pivot from geometry");
                detected
            }
        };
        Ok(Self::from_bounds(&bounds, anchor, color, inherit_scale))
    }
}

/// An item that can switch between boxy and polycube form.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxyItem {
    Boxy(BoxyData),
    Polycube(Mesh),
}

/// Convert every boxy to a polycube and every polycube to a boxy.
///
/// Items that fail to convert are returned unchanged alongside their error.
#[tracing::instrument(skip_all, fields(count = items.len()))]
pub fn toggle(
    items: Vec<BoxyItem>,
    color: Color,
    inherit_scale: bool,
    settings: &Settings,
) -> (Vec<BoxyItem>, Vec<Error>) {
    let mut converted = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    for item in items {
        match item {
            BoxyItem::Boxy(boxy) => converted.push(BoxyItem::Polycube(boxy.to_polycube(inherit_scale))),
            BoxyItem::Polycube(mesh) => match BoxyData::from_polycube_with(&mesh, None, color, inherit_scale, settings) {
                Ok(boxy) => converted.push(BoxyItem::Boxy(boxy)),
                Err(e) => {
                    warn!("{}: {e}", mesh.name);
                    errors.push(e);
                    converted.push(BoxyItem::Polycube(mesh));
                }
            },
        }
    }
    info!("toggled {} items, {} errors", converted.len() - errors.len(), errors.len());
    (converted, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;
    use crate::util::points_match;

    fn sample() -> BoxyData {
        BoxyData::new(DVec3::new(2.0, 4.0, 6.0), DVec3::new(1.0, 2.0, 3.0), Anchor::E4)
            .with_rotation(DVec3::new(0.0, 30.0, 0.0))
            .with_scale(DVec3::new(1.0, 1.5, 2.0))
            .with_color(color::ORANGE)
    }

    #[test]
    fn test_polycube_matches_boxy() {
        let boxy = sample();
        for inherit_scale in [false, true] {
            let mesh = boxy.to_polycube(inherit_scale);
            assert!(points_match(mesh.transform.world_pivot(), boxy.translation, 1e-9));
            let corners = boxy.bounds().vertices();
            for p in mesh.world_positions() {
                assert!(corners.iter().any(|c| points_match(*c, p, 1e-9)));
            }
        }
    }

    #[test]
    fn test_round_trip_stored_pivot() {
        let boxy = sample();
        let mesh = boxy.to_polycube(true);
        let back = BoxyData::from_polycube(&mesh, None, color::ORANGE, true).unwrap();
        assert_eq!(back.pivot_anchor, Anchor::E4);
        assert!(points_match(back.size, boxy.size, 1e-3));
        assert!(points_match(back.scale, boxy.scale, 1e-12));
        assert!(points_match(back.translation, boxy.translation, 1e-3));
        assert!(points_match(back.center(), boxy.center(), 1e-3));
    }

    #[test]
    fn test_detects_pivot_without_stored_anchor() {
        let boxy = sample().bake_scale().with_pivot(Anchor::V5);
        let mut mesh = boxy.to_polycube(false);
        mesh.pivot_anchor = None;
        let back = BoxyData::from_polycube(&mesh, None, color::ORANGE, false).unwrap();
        assert_eq!(back.pivot_anchor, Anchor::V5);
        assert!(points_match(back.translation, boxy.translation, 1e-3));

        let forced = BoxyData::from_polycube(&mesh, Some(Anchor::C), color::ORANGE, false).unwrap();
        assert!(points_match(forced.translation, boxy.center(), 1e-3));
    }

    #[test]
    fn test_toggle() {
        let boxy = sample();
        let not_a_cube = Mesh::new("plane", vec![DVec3::ZERO, DVec3::X, DVec3::Y], vec![]);
        let settings = Settings::default();
        let (items, errors) = toggle(
            vec![BoxyItem::Boxy(boxy), BoxyItem::Polycube(not_a_cube.clone())],
            color::ORANGE,
            false,
            &settings,
        );
        assert_eq!(items.len(), 2);
        assert_eq!(errors.len(), 1);
        assert!(matches!(&items[0], BoxyItem::Polycube(m) if m.pivot_anchor == Some(Anchor::E4)));
        assert_eq!(items[1], BoxyItem::Polycube(not_a_cube));

        let (back, errors) = toggle(vec![items[0].clone()], color::ORANGE, false, &settings);
        assert!(errors.is_empty());
        let BoxyItem::Boxy(round_trip) = &back[0] else {
            panic!("expected a boxy");
        };
        assert!(points_match(round_trip.center(), boxy.center(), 1e-3));
        assert!(points_match(round_trip.size, boxy.visual_size(), 1e-3));
    }

    #[test]
    fn test_create_from_nothing() {
        let boxy = create(None, &CreateOptions::default()).unwrap();
        assert_eq!(boxy.size, DVec3::splat(100.0));
        assert_eq!(boxy.translation, DVec3::ZERO);
        assert_eq!(boxy.pivot_anchor, Anchor::F2);
    }

    #[test]
    fn test_create_from_mesh() {
        let mesh = Mesh::cube(DVec3::new(2.0, 4.0, 6.0))
            .with_transform(Transform::from_translation(DVec3::new(5.0, 2.0, 0.0)).with_rotation(DVec3::new(0.0, 45.0, 0.0)));
        let options = CreateOptions::default();
        let boxy = create(Some(&Geometry::Mesh(&mesh)), &options).unwrap();
        assert_eq!(boxy.size, DVec3::new(2.0, 4.0, 6.0));
        assert_eq!(boxy.rotation, DVec3::new(0.0, 45.0, 0.0));
        assert!(points_match(boxy.translation, DVec3::new(5.0, 0.0, 0.0), 1e-9));

        // A tetrahedron is not a cuboid, so rotated bounds are used.
        let tetra = Mesh::new(
            "tetra",
            vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
            vec![],
        );
        let fallback = create(Some(&Geometry::Mesh(&tetra)), &options).unwrap();
        assert_eq!(fallback.size, DVec3::ONE);
        assert_eq!(fallback.rotation, DVec3::ZERO);
    }

    #[test]
    fn test_settings_reach_create_and_toggle() {
        let mut settings = Settings::default();
        settings.decimal_places = 1;
        let mesh = Mesh::cube(DVec3::new(1.23, 2.0, 3.0)).with_transform(Transform::IDENTITY.with_rotation(DVec3::new(0.0, 20.0, 0.0)));

        let options = CreateOptions::from_settings(&settings);
        let boxy = create(Some(&Geometry::Mesh(&mesh)), &options).unwrap();
        assert_eq!(boxy.size, DVec3::new(1.2, 2.0, 3.0));
        let exact = create(Some(&Geometry::Mesh(&mesh)), &CreateOptions::default()).unwrap();
        assert_eq!(exact.size, DVec3::new(1.23, 2.0, 3.0));

        let (items, errors) = toggle(vec![BoxyItem::Polycube(mesh)], color::ORANGE, false, &settings);
        assert!(errors.is_empty());
        assert!(matches!(&items[0], BoxyItem::Boxy(b) if b.size == DVec3::new(1.2, 2.0, 3.0)));
    }

    #[test]
    fn test_create_from_boxy() {
        let boxy = sample();
        let options = CreateOptions { pivot: Anchor::C, color: color::CYAN, ..CreateOptions::default() };
        let rebuilt = create(Some(&Geometry::Boxy(&boxy)), &options).unwrap();
        assert_eq!(rebuilt.color, color::CYAN);
        assert_eq!(rebuilt.scale, DVec3::ONE);
        assert!(points_match(rebuilt.translation, boxy.center(), 1e-9));
    }
}
