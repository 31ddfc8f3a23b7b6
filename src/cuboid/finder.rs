//! Oriented cuboid inference from partial point sets.
//!
//! A cuboid is recovered in two passes:
//!
//! 1. **Inference**: every input point is tried as a corner. Its nearest
//!    neighbours are combined three at a time; an orthogonal triple spans a
//!    candidate box whose 8 corners must explain every input point.
//! 2. **Measurement**: for each corner of the recovered box, three orthogonal
//!    edges are found and greedily assigned to the world axes. The assignment
//!    with the simplest Euler XYZ rotation wins, unless a reference rotation
//!    from the source transform matches one modulo 90 degrees. The size is
//!    then read along the reference frame's axes.

use crate::config::Settings;
use crate::core::Bounds;
use crate::util::{
    are_orthogonal, euler_xyz_from_axes, euler_xyz_matrix, normalize_angle, points_match, round_vec,
    DVec3, Error, Result,
};
use rayon::prelude::*;
use smallvec::SmallVec;
use tracing::{debug, warn};

/// Minimum number of points that can pin down a cuboid.
pub const MIN_POINTS: usize = 5;

/// A cuboid has eight corners.
pub const MAX_POINTS: usize = 8;

/// One box edge assigned to a world axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisEdge {
    /// Unit direction, flipped to point along the positive world axis.
    pub vector: DVec3,
    pub length: f64,
}

/// Box edges assigned to world X, Y and Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAssignment {
    pub x: AxisEdge,
    pub y: AxisEdge,
    pub z: AxisEdge,
}

impl AxisAssignment {
    /// Assign three orthogonal edge vectors to world axes.
    ///
    /// Axes are filled in X, Y, Z order, each taking the unused edge most
    /// aligned with it. A left-handed result has its least aligned axis
    /// negated so the basis is a proper rotation.
    pub fn from_edges(edges: &[DVec3; 3]) -> Option<Self> {
        let mut used = [false; 3];
        let mut assigned = [AxisEdge { vector: DVec3::ZERO, length: 0.0 }; 3];
        let mut alignment = [0.0f64; 3];

        for (axis_index, axis) in [DVec3::X, DVec3::Y, DVec3::Z].into_iter().enumerate() {
            let mut best: Option<(usize, f64)> = None;
            for (i, edge) in edges.iter().enumerate() {
                if used[i] {
                    continue;
                }
                let unit = edge.try_normalize()?;
                let align = unit.dot(axis).abs();
                if best.map_or(true, |(_, b)| align > b) {
                    best = Some((i, align));
                }
            }
            let (i, align) = best?;
            used[i] = true;
            let unit = edges[i].normalize();
            let vector = if unit.dot(axis) < 0.0 { -unit } else { unit };
            assigned[axis_index] = AxisEdge { vector, length: edges[i].length() };
            alignment[axis_index] = align;
        }

        let [x, y, z] = assigned;
        let mut assignment = Self { x, y, z };
        if x.vector.dot(y.vector.cross(z.vector)) < 0.0 {
            let weakest = (0..3)
                .min_by(|&a, &b| alignment[a].total_cmp(&alignment[b]))
                .unwrap_or(2);
            let edge = assignment.axis_mut(weakest);
            edge.vector = -edge.vector;
        }
        Some(assignment)
    }

    fn axis_mut(&mut self, index: usize) -> &mut AxisEdge {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => &mut self.z,
        }
    }

    /// Euler XYZ rotation (degrees) taking world axes onto the box axes.
    pub fn rotation(&self) -> DVec3 {
        euler_xyz_from_axes(self.x.vector, self.y.vector, self.z.vector)
    }

    pub fn size(&self) -> DVec3 {
        DVec3::new(self.x.length, self.y.length, self.z.length)
    }

    /// Box size measured along the local axes of `rotation`.
    ///
    /// Each local axis takes the length of the edge most aligned with it.
    /// Returns `None` when an axis has no edge within `max_angle` degrees or
    /// two axes claim the same edge.
    pub fn size_in_frame(&self, rotation: DVec3, max_angle: f64) -> Option<DVec3> {
        let frame = euler_xyz_matrix(rotation);
        let edges = [self.x, self.y, self.z];
        let min_alignment = max_angle.to_radians().cos();
        let mut used = [false; 3];
        let mut size = [0.0; 3];

        for (axis, length) in size.iter_mut().enumerate() {
            let column = frame.col(axis);
            let (i, alignment) = edges
                .iter()
                .map(|edge| edge.vector.dot(column).abs())
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(&b.1))?;
            if alignment < min_alignment || used[i] {
                return None;
            }
            used[i] = true;
            *length = edges[i].length;
        }
        Some(DVec3::from_array(size))
    }
}

/// A recovered cuboid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    /// Corners in `000, 100, 010, 001, 110, 101, 011, 111` edge-bit order.
    pub vertices: [DVec3; 8],
    pub center: DVec3,
    pub size: DVec3,
    pub rotation: DVec3,
    pub scale: DVec3,
}

impl Cuboid {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.size, self.center, self.rotation).with_scale(self.scale)
    }

    /// Corners as a flat `[x, y, z, x, y, z, ...]` slice.
    pub fn vertices_flat(&self) -> &[f64] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Candidate edge triples from a corner, as edge vectors.
type EdgeTriples = SmallVec<[[DVec3; 3]; 8]>;

/// Infers cuboids from 5-8 points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CuboidFinder {
    /// Max per-axis distance for two points to be the same vertex.
    pub tolerance: f64,
    /// Max `|cos|` between edges considered perpendicular.
    pub orthogonality: f64,
    /// Nearest neighbours considered as edge endpoints from each corner.
    pub max_candidates: usize,
    pub decimal_places: u32,
    /// Degrees within which a reference rotation is accepted modulo 90.
    pub rotation_match: f64,
}

impl Default for CuboidFinder {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl CuboidFinder {
    pub fn new(settings: &Settings) -> Self {
        Self {
            tolerance: settings.tolerance,
            orthogonality: settings.orthogonality_tolerance,
            max_candidates: settings.max_corner_candidates,
            decimal_places: settings.decimal_places,
            rotation_match: settings.rotation_match_tolerance,
        }
    }

    /// Orthogonal edge triples from `corner` to its nearest neighbours.
    ///
    /// Neighbours coinciding with the corner are ignored. With `first_only`
    /// the search stops at the first triple.
    fn edge_triples(&self, corner: DVec3, others: &[DVec3], first_only: bool) -> EdgeTriples {
        let mut neighbours: SmallVec<[(f64, DVec3); 8]> = others
            .iter()
            .filter(|p| !points_match(**p, corner, self.tolerance))
            .map(|p| (corner.distance(*p), *p - corner))
            .collect();
        neighbours.sort_by(|a, b| a.0.total_cmp(&b.0));
        neighbours.truncate(self.max_candidates);

        let mut triples = EdgeTriples::new();
        let n = neighbours.len();
        for i in 0..n {
            for j in (i + 1)..n {
                for k in (j + 1)..n {
                    let edges = [neighbours[i].1, neighbours[j].1, neighbours[k].1];
                    if are_orthogonal(&edges, self.orthogonality) {
                        triples.push(edges);
                        if first_only {
                            return triples;
                        }
                    }
                }
            }
        }
        triples
    }

    /// All 8 corners of the box spanned by `edges` from `corner`.
    pub fn generate_vertices(corner: DVec3, edges: &[DVec3; 3]) -> [DVec3; 8] {
        let [e1, e2, e3] = *edges;
        [
            corner,
            corner + e1,
            corner + e2,
            corner + e3,
            corner + e1 + e2,
            corner + e1 + e3,
            corner + e2 + e3,
            corner + e1 + e2 + e3,
        ]
    }

    /// True when every input is a corner of `generated`.
    ///
    /// A full set of 8 inputs must use each corner exactly once.
    fn all_inputs_match(&self, inputs: &[DVec3], generated: &[DVec3; 8]) -> bool {
        if inputs.len() == MAX_POINTS {
            let mut taken = [false; 8];
            for input in inputs {
                let slot = generated
                    .iter()
                    .enumerate()
                    .position(|(i, g)| !taken[i] && points_match(*input, *g, self.tolerance));
                match slot {
                    Some(i) => taken[i] = true,
                    None => return false,
                }
            }
            return taken.iter().all(|t| *t);
        }
        inputs
            .iter()
            .all(|input| generated.iter().any(|g| points_match(*input, *g, self.tolerance)))
    }

    /// Infer all 8 corners of a cuboid from 5-8 of its vertices.
    ///
    /// Returns `None` when no orthogonal corner explains every input.
    pub fn infer_cuboid_vertices(&self, points: &[DVec3]) -> Option<[DVec3; 8]> {
        if !(MIN_POINTS..=MAX_POINTS).contains(&points.len()) {
            warn!("Could not infer valid cuboid: expected {MIN_POINTS}-{MAX_POINTS} points, got {}", points.len());
            return None;
        }
        for (index, corner) in points.iter().enumerate() {
            let others: SmallVec<[DVec3; 8]> = points
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, p)| *p)
                .collect();
            for edges in self.edge_triples(*corner, &others, false) {
                let generated = Self::generate_vertices(*corner, &edges);
                if self.all_inputs_match(points, &generated) {
                    debug!(corner = index, "inferred cuboid");
                    return Some(generated);
                }
            }
        }
        warn!("Could not infer valid cuboid from input vertices.");
        None
    }

    /// Measure center, size and rotation of a complete cuboid.
    pub fn calculate(&self, vertices: &[DVec3; 8], reference_rotation: Option<DVec3>) -> Option<Cuboid> {
        let center = vertices.iter().copied().sum::<DVec3>() / 8.0;

        let candidates: Vec<(AxisAssignment, DVec3)> = vertices
            .iter()
            .filter_map(|corner| {
                let edges = self.edge_triples(*corner, vertices, true).into_iter().next()?;
                let assignment = AxisAssignment::from_edges(&edges)?;
                Some((assignment, assignment.rotation()))
            })
            .collect();
        if candidates.is_empty() {
            debug!("no corner of the cuboid has three orthogonal edges");
            return None;
        }

        // Per-axis Euler tolerances add up across the frame.
        let frame_tolerance = self.rotation_match * 3.0;
        let matched = reference_rotation.and_then(|reference| {
            candidates.iter().find_map(|(assignment, rotation)| {
                if !self.rotations_match(*rotation, reference) {
                    return None;
                }
                let size = assignment.size_in_frame(reference, frame_tolerance)?;
                Some((size, *rotation, reference))
            })
        });

        let (size, rotation) = match matched {
            Some((size, calculated, reference)) => {
                debug!(%calculated, %reference, "using reference rotation");
                (size, reference)
            }
            None => {
                let mut best = candidates[0];
                for candidate in &candidates[1..] {
                    if complexity(candidate.1) < complexity(best.1) {
                        best = *candidate;
                    }
                }
                (best.0.size(), best.1)
            }
        };

        let places = self.decimal_places;
        Some(Cuboid {
            vertices: *vertices,
            center: round_vec(center, places),
            size: round_vec(size, places),
            rotation: round_vec(rotation, places),
            scale: DVec3::ONE,
        })
    }

    /// Two rotations describe the same box if each axis differs by a multiple
    /// of 90 degrees.
    pub fn rotations_match(&self, a: DVec3, b: DVec3) -> bool {
        let axis_matches = |a: f64, b: f64| {
            let diff = normalize_angle(a - b);
            [0.0, 90.0, -90.0, 180.0, -180.0]
                .iter()
                .any(|offset| (diff - offset).abs() < self.rotation_match)
        };
        axis_matches(a.x, b.x) && axis_matches(a.y, b.y) && axis_matches(a.z, b.z)
    }

    /// Infer and measure a cuboid from 5-8 points.
    pub fn find(&self, points: &[DVec3], reference_rotation: Option<DVec3>) -> Result<Cuboid> {
        if !(MIN_POINTS..=MAX_POINTS).contains(&points.len()) {
            return Err(Error::InsufficientPoints {
                min: MIN_POINTS,
                max: MAX_POINTS,
                got: points.len(),
            });
        }
        let vertices = self
            .infer_cuboid_vertices(points)
            .ok_or(Error::NoCuboid(points.len()))?;
        self.calculate(&vertices, reference_rotation)
            .ok_or(Error::NoCuboid(points.len()))
    }

    /// Run [`find`](Self::find) over many point sets in parallel.
    #[tracing::instrument(skip_all, fields(count = inputs.len()))]
    pub fn find_many(&self, inputs: &[Vec<DVec3>]) -> Vec<Result<Cuboid>> {
        inputs.par_iter().map(|points| self.find(points, None)).collect()
    }
}

fn complexity(rotation: DVec3) -> f64 {
    rotation.x.abs() + rotation.y.abs() + rotation.z.abs()
}
