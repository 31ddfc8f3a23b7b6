//! Search a mesh for the face opposite a given face.

use super::mesh::Mesh;
use super::validate::{validate_cuboid_faces, validate_quadrilateral, FaceTolerances, SurfaceDirection};
use crate::util::{midpoint, DVec3};
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Max deviation of `normal . direction` from the target for faces of an
/// opposite block.
const BLOCK_SEARCH_TOLERANCE: f64 = 0.25;

/// Faces of an opposite block must satisfy `n_block . n_face <= -0.9`.
const BLOCK_NORMAL_DOT: f64 = -0.9;

/// Opposite block faces lie within `max(5, 10% of nearest)` of the nearest
/// candidate distance.
const BLOCK_DISTANCE_MIN: f64 = 5.0;
const BLOCK_DISTANCE_RATIO: f64 = 0.1;

/// A connected group of coplanar quads filling a rectangle.
#[derive(Debug, Clone, Copy)]
struct FaceBlock {
    center: DVec3,
    normal: DVec3,
    area: f64,
}

/// Two faces forming opposite sides of a cuboid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FacePair {
    pub face: usize,
    pub opposite: usize,
    /// Distance between the face centers.
    pub distance: f64,
}

/// Options for [`FaceFinder`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceFinderOptions {
    pub direction: SurfaceDirection,
    /// Max deviation of `normal . direction` from +1 (concave) or -1 (convex)
    /// for a face to be considered.
    pub search_tolerance: f64,
    pub tolerances: FaceTolerances,
}

impl Default for FaceFinderOptions {
    fn default() -> Self {
        Self {
            direction: SurfaceDirection::Convex,
            search_tolerance: 0.1,
            tolerances: FaceTolerances::default(),
        }
    }
}

/// Finds the face that closes a cuboid with a given face.
///
/// Concave search looks along the face normal, convex search against it.
/// Every face in the search direction is validated as an opposite pair and
/// the closest valid one wins.
#[derive(Debug, Clone, Copy)]
pub struct FaceFinder<'a> {
    mesh: &'a Mesh,
    options: FaceFinderOptions,
}

impl<'a> FaceFinder<'a> {
    pub fn new(mesh: &'a Mesh, options: FaceFinderOptions) -> Self {
        Self { mesh, options }
    }

    /// All faces that validate as opposite to `face`, closest first.
    #[instrument(skip(self), fields(mesh = %self.mesh.name))]
    pub fn candidates(&self, face: usize) -> Vec<FacePair> {
        let mesh = self.mesh;
        if let Err(e) = validate_quadrilateral(mesh, face, &self.options.tolerances) {
            warn!("Not quad face: {e}");
            return Vec::new();
        }
        let (Ok(source_center), Ok(source_normal)) = (mesh.face_center(face), mesh.face_normal(face))
        else {
            return Vec::new();
        };
        let target = match self.options.direction {
            SurfaceDirection::Concave => 1.0,
            SurfaceDirection::Convex => -1.0,
        };

        let mut valid = Vec::new();
        for candidate in (0..mesh.face_count()).filter(|&c| c != face) {
            let Ok(center) = mesh.face_center(candidate) else {
                continue;
            };
            let Some(direction) = (center - source_center).try_normalize() else {
                continue;
            };
            let dot = source_normal.dot(direction);
            if (dot - target).abs() > self.options.search_tolerance {
                continue;
            }
            match validate_cuboid_faces(
                mesh,
                face,
                candidate,
                self.options.direction,
                &self.options.tolerances,
            ) {
                Ok(distance) => {
                    debug!(candidate, distance, "valid opposite face");
                    valid.push(FacePair { face, opposite: candidate, distance });
                }
                Err(e) => debug!(candidate, "rejected: {e}"),
            }
        }
        valid.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        valid
    }

    /// The closest valid opposite face, if any.
    pub fn find(&self, face: usize) -> Option<FacePair> {
        self.candidates(face).into_iter().next()
    }

    /// Opposite faces for a selection of faces.
    ///
    /// The selection is split into shells of faces sharing vertices. A shell
    /// that forms a rectangular block is paired face by face with the block
    /// on the far side. Single faces, shells that are not blocks and blocks
    /// without a matching opposite block fall back to [`find`](Self::find).
    #[instrument(skip_all, fields(mesh = %self.mesh.name, faces = faces.len()))]
    pub fn find_group(&self, faces: &[usize]) -> Vec<FacePair> {
        let mut pairs = Vec::new();
        for shell in face_shells(self.mesh, faces) {
            if shell.len() > 1 {
                if let Some(block_pairs) = self.find_block(&shell) {
                    pairs.extend(block_pairs);
                    continue;
                }
            }
            pairs.extend(shell.iter().filter_map(|&face| self.find(face)));
        }
        pairs
    }

    /// Pair a rectangular block with the block of faces across from it.
    fn find_block(&self, shell: &[usize]) -> Option<Vec<FacePair>> {
        let Some(block) = self.face_block(shell) else {
            debug!(?shell, "not a rectangular block");
            return None;
        };
        let mesh = self.mesh;
        let target = match self.options.direction {
            SurfaceDirection::Concave => 1.0,
            SurfaceDirection::Convex => -1.0,
        };

        let mut candidates: Vec<(usize, f64)> = Vec::new();
        for candidate in (0..mesh.face_count()).filter(|c| !shell.contains(c)) {
            let (Ok(center), Ok(normal)) = (mesh.face_center(candidate), mesh.face_normal(candidate)) else {
                continue;
            };
            let offset = center - block.center;
            let distance = offset.length();
            if distance < 1e-10 {
                continue;
            }
            if (block.normal.dot(offset / distance) - target).abs() > BLOCK_SEARCH_TOLERANCE {
                continue;
            }
            if block.normal.dot(normal) > BLOCK_NORMAL_DOT {
                continue;
            }
            candidates.push((candidate, distance));
        }
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

        let nearest = candidates.first()?.1;
        let tolerance = BLOCK_DISTANCE_MIN.max(nearest * BLOCK_DISTANCE_RATIO);
        let opposite: Vec<usize> = candidates
            .iter()
            .filter(|(_, distance)| (distance - nearest).abs() < tolerance)
            .map(|(face, _)| *face)
            .take(shell.len())
            .collect();
        if opposite.len() != shell.len() || face_shells(mesh, &opposite).len() != 1 {
            debug!(?opposite, "no opposite block of {} faces", shell.len());
            return None;
        }
        let opposite_block = self.face_block(&opposite)?;
        if (opposite_block.area - block.area).abs() > self.options.tolerances.dimension * block.area.sqrt() * 4.0 {
            debug!(source = block.area, opposite = opposite_block.area, "block areas differ");
            return None;
        }
        Some(self.match_block_faces(shell, &opposite, block.normal))
    }

    /// Pair each face with the unused opposite face nearest to it across the
    /// block plane.
    fn match_block_faces(&self, shell: &[usize], opposite: &[usize], normal: DVec3) -> Vec<FacePair> {
        let mesh = self.mesh;
        let mut used = vec![false; opposite.len()];
        let mut pairs = Vec::with_capacity(shell.len());
        for &face in shell {
            let Ok(center) = mesh.face_center(face) else {
                continue;
            };
            let best = opposite
                .iter()
                .enumerate()
                .filter(|(i, _)| !used[*i])
                .filter_map(|(i, &o)| {
                    let offset = mesh.face_center(o).ok()? - center;
                    let lateral = offset - normal * offset.dot(normal);
                    Some((i, lateral.length(), offset.length()))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((i, _, distance)) = best {
                used[i] = true;
                pairs.push(FacePair { face, opposite: opposite[i], distance });
            }
        }
        pairs
    }

    /// Center, normal and area of faces forming one flat rectangle.
    fn face_block(&self, faces: &[usize]) -> Option<FaceBlock> {
        let mesh = self.mesh;
        let tolerances = &self.options.tolerances;
        let mut normals = Vec::with_capacity(faces.len());
        let mut vertices: Vec<usize> = Vec::new();
        let mut area = 0.0;
        for &face in faces {
            validate_quadrilateral(mesh, face, tolerances).ok()?;
            normals.push(mesh.face_normal(face).ok()?);
            let [short, long] = mesh.face_dimensions(face).ok()?;
            area += short * long;
            vertices.extend(mesh.face(face).ok()?.iter().copied());
        }
        vertices.sort_unstable();
        vertices.dedup();

        let first = *normals.first()?;
        if normals.iter().any(|n| n.dot(first) < tolerances.parallelism) {
            return None;
        }
        let normal = (normals.iter().copied().sum::<DVec3>() / normals.len() as f64).try_normalize()?;
        let points: Vec<DVec3> = vertices.iter().filter_map(|&v| mesh.world_vertex(v).ok()).collect();
        let center = midpoint(&points)?;
        if points.iter().any(|p| (*p - center).dot(normal).abs() > tolerances.coplanar) {
            return None;
        }

        // The faces fill the rectangle spanned by the first face's edges.
        let corners = mesh.face_vertices(faces[0]).ok()?;
        let u = (corners[1] - corners[0]).try_normalize()?;
        let v = normal.cross(u);
        let (mut min, mut max) = (DVec3::splat(f64::INFINITY), DVec3::splat(f64::NEG_INFINITY));
        for p in &points {
            let local = DVec3::new((*p - center).dot(u), (*p - center).dot(v), 0.0);
            min = min.min(local);
            max = max.max(local);
        }
        let extent = max - min;
        if (extent.x * extent.y - area).abs() > tolerances.dimension * (extent.x + extent.y) {
            return None;
        }
        Some(FaceBlock { center, normal, area })
    }
}

/// Split faces into groups connected through shared vertices, in order of
/// first appearance. Unknown faces form their own group.
fn face_shells(mesh: &Mesh, faces: &[usize]) -> Vec<Vec<usize>> {
    let mut shells: Vec<(Vec<usize>, Vec<usize>)> = Vec::new();
    for &face in faces {
        if shells.iter().any(|(members, _)| members.contains(&face)) {
            continue;
        }
        let vertices: Vec<usize> = mesh.face(face).map(|f| f.to_vec()).unwrap_or_default();
        let touching: Vec<usize> = shells
            .iter()
            .enumerate()
            .filter(|(_, (_, shared))| vertices.iter().any(|v| shared.contains(v)))
            .map(|(i, _)| i)
            .collect();
        match touching.split_first() {
            None => shells.push((vec![face], vertices)),
            Some((&first, rest)) => {
                for &i in rest.iter().rev() {
                    let (members, shared) = shells.remove(i);
                    shells[first].0.extend(members);
                    shells[first].1.extend(shared);
                }
                shells[first].0.push(face);
                shells[first].1.extend(vertices);
            }
        }
    }
    shells.into_iter().map(|(members, _)| members).collect()
}

/// Index of the face opposite `face`, or `None` when no face closes a cuboid.
pub fn get_opposite_face(mesh: &Mesh, face: usize, direction: SurfaceDirection) -> Option<usize> {
    let options = FaceFinderOptions { direction, ..Default::default() };
    FaceFinder::new(mesh, options).find(face).map(|pair| pair.opposite)
}

/// Opposite faces for several faces of one mesh, see
/// [`FaceFinder::find_group`]. Faces without a match are skipped.
pub fn get_opposite_faces(mesh: &Mesh, faces: &[usize], options: FaceFinderOptions) -> Vec<FacePair> {
    FaceFinder::new(mesh, options).find_group(faces)
}
