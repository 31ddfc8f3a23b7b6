//! Math type re-exports and cuboid-specific math utilities.
//!
//! Coordinates are right-handed and Y-up. Euler angles are in degrees and use
//! the XYZ rotate order: X is applied first, Z last, so for column vectors the
//! combined matrix is `Rz * Ry * Rx`.

// Re-export glam types
pub use glam::{DMat3, DVec2, DVec3};

use super::{Error, Result};

/// Tolerance used when matching vertex positions.
pub const TOLERANCE: f64 = 1e-4;

/// Number of decimal places results are rounded to.
pub const DECIMAL_PLACES: u32 = 4;

/// Below this `|cos(y)|` the XYZ decomposition is gimbal locked.
pub const GIMBAL_EPSILON: f64 = 1e-3;

/// Round a value to a number of decimal places.
///
/// Negative zero is normalized to zero so rounded output prints cleanly.
#[inline]
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor + 0.0
}

/// Round every component of a vector.
#[inline]
pub fn round_vec(v: DVec3, places: u32) -> DVec3 {
    DVec3::new(
        round_to(v.x, places),
        round_to(v.y, places),
        round_to(v.z, places),
    )
}

/// True when every component of `a` and `b` differs by at most `tol`.
#[inline]
pub fn points_match(a: DVec3, b: DVec3, tol: f64) -> bool {
    (a - b).abs().max_element() <= tol
}

/// True iff all vectors are non-zero and pairwise perpendicular within `tol`.
pub fn are_orthogonal(vectors: &[DVec3], tol: f64) -> bool {
    let mut units = Vec::with_capacity(vectors.len());
    for v in vectors {
        match v.try_normalize() {
            Some(u) => units.push(u),
            None => return false,
        }
    }
    for i in 0..units.len() {
        for j in (i + 1)..units.len() {
            if units[i].dot(units[j]).abs() > tol {
                return false;
            }
        }
    }
    true
}

/// Map an angle in degrees to `(-180, 180]`.
pub fn normalize_angle(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Rotation matrix for XYZ Euler angles in degrees.
pub fn euler_xyz_matrix(rotation: DVec3) -> DMat3 {
    let rx = DMat3::from_rotation_x(rotation.x.to_radians());
    let ry = DMat3::from_rotation_y(rotation.y.to_radians());
    let rz = DMat3::from_rotation_z(rotation.z.to_radians());
    rz * ry * rx
}

/// Rotate a point by XYZ Euler angles, optionally about a pivot.
pub fn apply_euler_xyz_rotation(point: DVec3, rotation: DVec3, pivot: Option<DVec3>) -> DVec3 {
    let pivot = pivot.unwrap_or(DVec3::ZERO);
    euler_xyz_matrix(rotation) * (point - pivot) + pivot
}

/// Undo [`apply_euler_xyz_rotation`].
///
/// Uses the transpose of the rotation matrix; negating the angles is not an
/// inverse for a composed XYZ rotation.
pub fn remove_euler_xyz_rotation(point: DVec3, rotation: DVec3, pivot: Option<DVec3>) -> DVec3 {
    let pivot = pivot.unwrap_or(DVec3::ZERO);
    euler_xyz_matrix(rotation).transpose() * (point - pivot) + pivot
}

/// Decompose a rotation, given as its three column axes, into XYZ Euler
/// angles in degrees.
///
/// At gimbal lock (`y = ±90°`) the Z angle is fixed at zero and the remaining
/// rotation is attributed to X.
pub fn euler_xyz_from_axes(x: DVec3, y: DVec3, z: DVec3) -> DVec3 {
    let sin_y = (-x.z).clamp(-1.0, 1.0);
    let angle_y = sin_y.asin();

    let (angle_x, angle_z) = if angle_y.cos().abs() > GIMBAL_EPSILON {
        (y.z.atan2(z.z), x.y.atan2(x.x))
    } else {
        ((sin_y * y.x).atan2(y.y), 0.0)
    };

    DVec3::new(angle_x.to_degrees(), angle_y.to_degrees(), angle_z.to_degrees())
}

/// Decompose a rotation matrix into XYZ Euler angles in degrees.
#[inline]
pub fn matrix_to_euler_xyz(m: &DMat3) -> DVec3 {
    euler_xyz_from_axes(m.x_axis, m.y_axis, m.z_axis)
}

/// Rotate a point about the Y axis (counter-clockwise, degrees), optionally
/// about a pivot.
pub fn rotate_point_about_y(point: DVec3, degrees: f64, pivot: Option<DVec3>) -> DVec3 {
    let pivot = pivot.unwrap_or(DVec3::ZERO);
    let (sin_t, cos_t) = degrees.to_radians().sin_cos();
    let p = point - pivot;
    DVec3::new(p.x * cos_t + p.z * sin_t, p.y, -p.x * sin_t + p.z * cos_t) + pivot
}

/// Normalize a vector, failing on zero length.
pub fn normalize_vector(v: DVec3) -> Result<DVec3> {
    v.try_normalize()
        .ok_or_else(|| Error::degenerate(format!("cannot normalize {v}")))
}

/// Angle between two vectors in radians.
///
/// With a reference axis the result is negative when `a` points away from it.
pub fn angle_between(a: DVec3, b: DVec3, reference: Option<DVec3>) -> Result<f64> {
    let magnitude = a.length() * b.length();
    if magnitude == 0.0 {
        return Err(Error::degenerate("angle with zero-length vector"));
    }
    let angle = (a.dot(b) / magnitude).clamp(-1.0, 1.0).acos();
    Ok(match reference {
        Some(axis) if a.dot(axis) < 0.0 => -angle,
        _ => angle,
    })
}

/// Euler angles (degrees) that tilt +Y onto `vector`.
///
/// X is the tilt away from +Y, Y is the signed heading of the vector's XZ
/// projection from +Z, Z is always zero.
pub fn vector_to_euler_angles(vector: DVec3) -> Result<DVec3> {
    let x = angle_between(vector, DVec3::Y, None)?;
    let flattened = DVec3::new(vector.x, 0.0, vector.z);
    let y = if flattened.length_squared() == 0.0 {
        0.0
    } else {
        angle_between(flattened, DVec3::Z, Some(DVec3::X))?
    };
    Ok(DVec3::new(x.to_degrees(), y.to_degrees(), 0.0))
}

/// Unit normal of the plane through three points.
pub fn normal_from_points(a: DVec3, b: DVec3, c: DVec3) -> Result<DVec3> {
    normalize_vector((b - a).cross(c - a))
}

/// Average of a set of points.
pub fn midpoint(points: &[DVec3]) -> Option<DVec3> {
    if points.is_empty() {
        return None;
    }
    Some(points.iter().copied().sum::<DVec3>() / points.len() as f64)
}

/// Counter-clockwise rotation matrix about an arbitrary axis (radians).
pub fn rotation_matrix_about_axis(axis: DVec3, theta: f64) -> Result<DMat3> {
    Ok(DMat3::from_axis_angle(normalize_vector(axis)?, theta))
}

/// Rotate a vector about an axis (radians).
pub fn rotate_vector(vector: DVec3, axis: DVec3, theta: f64) -> Result<DVec3> {
    Ok(rotation_matrix_about_axis(axis, theta)? * vector)
}

/// Closest point to `point` on the infinite line through `a` and `b`.
pub fn closest_point_on_line(point: DVec3, a: DVec3, b: DVec3) -> Result<DVec3> {
    let direction = normalize_vector(b - a)?;
    Ok(a + direction * (point - a).dot(direction))
}

/// Project a point onto a plane given by a position and a unit normal.
pub fn project_point_onto_plane(plane_position: DVec3, unit_normal: DVec3, point: DVec3) -> DVec3 {
    let distance = (point - plane_position).dot(unit_normal);
    point - unit_normal * distance
}

/// Map a value from an input range to an output range.
pub fn interpolate_linear(input: DVec2, output: DVec2, value: f64) -> f64 {
    let coefficient = (value - input.x) / (input.y - input.x);
    output.x + (output.y - output.x) * coefficient
}

/// Point on an axis-aligned ellipse at an angle in degrees.
pub fn point_on_ellipse(degrees: f64, radii: DVec2) -> DVec2 {
    let (sin_t, cos_t) = degrees.rem_euclid(360.0).to_radians().sin_cos();
    let r = radii.x * radii.y / ((radii.y * cos_t).powi(2) + (radii.x * sin_t).powi(2)).sqrt();
    DVec2::new(r * cos_t, r * sin_t)
}

/// Angle in degrees of the ellipse normal at a point on it.
pub fn ellipse_normal_angle(point: DVec2, radii: DVec2) -> f64 {
    (-(radii.y * radii.y) * point.x)
        .atan2(radii.x * radii.x * point.y)
        .to_degrees()
}

/// Normal of the least-squares plane through a set of points.
///
/// The normal is the eigenvector of the smallest eigenvalue of the point
/// covariance, flipped to face +Y.
pub fn average_normal(points: &[DVec3]) -> Result<DVec3> {
    if points.len() < 3 {
        return Err(Error::InsufficientPoints {
            min: 3,
            max: usize::MAX,
            got: points.len(),
        });
    }
    let centroid = midpoint(points).unwrap_or(DVec3::ZERO);
    let mut cov = [[0.0f64; 3]; 3];
    for p in points {
        let d = (*p - centroid).to_array();
        for (i, row) in cov.iter_mut().enumerate() {
            for (j, c) in row.iter_mut().enumerate() {
                *c += d[i] * d[j];
            }
        }
    }

    let (values, vectors) = symmetric_eigen(cov);
    let smallest = (0..3)
        .min_by(|&a, &b| values[a].total_cmp(&values[b]))
        .unwrap_or(0);
    let normal = normalize_vector(vectors[smallest])?;
    Ok(if normal.dot(DVec3::Y) < 0.0 { -normal } else { normal })
}

/// Cyclic Jacobi eigen solve of a symmetric 3x3 matrix.
fn symmetric_eigen(mut a: [[f64; 3]; 3]) -> ([f64; 3], [DVec3; 3]) {
    let mut v = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    for _ in 0..32 {
        let off = a[0][1].powi(2) + a[0][2].powi(2) + a[1][2].powi(2);
        if off < 1e-24 {
            break;
        }
        for (p, q) in [(0, 1), (0, 2), (1, 2)] {
            if a[p][q].abs() < 1e-300 {
                continue;
            }
            let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
            let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
            let c = 1.0 / (t * t + 1.0).sqrt();
            let s = t * c;

            for k in 0..3 {
                let akp = a[k][p];
                let akq = a[k][q];
                a[k][p] = c * akp - s * akq;
                a[k][q] = s * akp + c * akq;
            }
            for k in 0..3 {
                let apk = a[p][k];
                let aqk = a[q][k];
                a[p][k] = c * apk - s * aqk;
                a[q][k] = s * apk + c * aqk;
            }
            for row in v.iter_mut() {
                let vp = row[p];
                let vq = row[q];
                row[p] = c * vp - s * vq;
                row[q] = s * vp + c * vq;
            }
        }
    }

    let column = |j: usize| DVec3::new(v[0][j], v[1][j], v[2][j]);
    ([a[0][0], a[1][1], a[2][2]], [column(0), column(1), column(2)])
}
