use crate::error::{GeometryError, Result};
use crate::geometry::PlaneCoefficients;

use super::{Point3, Vector3, TOLERANCE};

/// Newell's normal of a closed point ring.
///
/// The direction follows the winding of the ring (right-hand rule) and stays
/// correct for concave rings. The length is twice the enclosed area.
#[must_use]
pub fn newell_normal(points: &[Point3]) -> Vector3 {
    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let cur = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (cur.y - next.y) * (cur.z + next.z);
        normal.y += (cur.z - next.z) * (cur.x + next.x);
        normal.z += (cur.x - next.x) * (cur.y + next.y);
    }
    normal
}

/// Fits a plane `ax + by + cz + d = 0` to a ring of points.
///
/// The normal `(a, b, c)` is unit length and oriented by the ring's winding;
/// `d` places the plane through the centroid. Near-zero coefficients are
/// snapped to exactly zero.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` if the points are empty, collinear or
/// otherwise enclose no area.
pub fn fit_plane_to_points(points: &[Point3]) -> Result<PlaneCoefficients> {
    if points.is_empty() {
        return Err(GeometryError::Degenerate("cannot fit a plane to zero points".into()).into());
    }

    let normal = newell_normal(points);
    let len = normal.norm();
    if len < TOLERANCE {
        return Err(GeometryError::Degenerate(format!(
            "cannot fit a plane to {} collinear or coincident points",
            points.len()
        ))
        .into());
    }
    let normal = normal / len;

    #[allow(clippy::cast_precision_loss)]
    let count = points.len() as f64;
    let centroid = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords)
        / count;
    let d = -normal.dot(&centroid);

    Ok(PlaneCoefficients::new(normal.x, normal.y, normal.z, d).snapped())
}
