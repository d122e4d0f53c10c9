pub mod plane_fit;
pub mod polygon_3d;
pub mod segment;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Tolerance for zero-length and parallel detection.
pub const TOLERANCE: f64 = 1e-10;

/// Distance below which two points are considered coincident.
///
/// Also used for on-line, planarity and plane-coefficient comparisons.
pub const POINT_TOLERANCE: f64 = 1e-6;

/// Plane coefficients closer to zero than this are snapped to exactly `0.0`.
pub const PLANE_SNAP_TOLERANCE: f64 = 1e-8;

/// Returns `true` if two points coincide within [`POINT_TOLERANCE`].
#[must_use]
pub fn points_equal(a: &Point3, b: &Point3) -> bool {
    (b - a).norm() < POINT_TOLERANCE
}

/// Returns `true` if `a` and `b` are parallel and not opposing.
///
/// Zero-length vectors have no direction and never compare equal.
#[must_use]
pub fn same_direction(a: &Vector3, b: &Vector3) -> bool {
    let a_len = a.norm();
    let b_len = b.norm();
    if a_len < TOLERANCE || b_len < TOLERANCE {
        return false;
    }
    let a = a / a_len;
    let b = b / b_len;
    a.cross(&b).norm() < POINT_TOLERANCE && a.dot(&b) > 0.0
}

/// Applies an affine 4x4 matrix to a point.
#[must_use]
pub fn transform_point(matrix: &Matrix4, point: &Point3) -> Point3 {
    let v = matrix * nalgebra::Vector4::new(point.x, point.y, point.z, 1.0);
    if (v.w - 1.0).abs() > TOLERANCE && v.w.abs() > TOLERANCE {
        Point3::new(v.x / v.w, v.y / v.w, v.z / v.w)
    } else {
        Point3::new(v.x, v.y, v.z)
    }
}
