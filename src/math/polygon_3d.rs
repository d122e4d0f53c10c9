use crate::geometry::Plane;

use super::segment::on_line_segment;
use super::{Point3, Vector3, POINT_TOLERANCE};

/// Point-in-polygon test for a point against one planar ring.
///
/// The ring is projected into the UV space of `plane` and tested with the
/// winding number algorithm. Points off the plane are outside. Points on an
/// edge of the ring count as inside only when `include_border` is set.
#[must_use]
pub fn point_in_polygon_2d(
    point: &Point3,
    ring: &[Point3],
    plane: &Plane,
    include_border: bool,
) -> bool {
    if ring.len() < 3 {
        return false;
    }
    if plane.signed_distance(point).abs() > POINT_TOLERANCE {
        return false;
    }
    if on_ring_border(point, ring) {
        return include_border;
    }

    let (px, py) = plane.project_to_uv(point);
    let uvs: Vec<(f64, f64)> = ring.iter().map(|p| plane.project_to_uv(p)).collect();

    winding_number_2d(px, py, &uvs) != 0
}

/// Returns `true` if `point` lies on any edge of the closed ring.
#[must_use]
pub fn on_ring_border(point: &Point3, ring: &[Point3]) -> bool {
    let n = ring.len();
    (0..n).any(|i| on_line_segment(point, &ring[i], &ring[(i + 1) % n]))
}

/// Winding number of point `(px, py)` with respect to polygon `verts`.
///
/// Non-zero => inside, zero => outside.
fn winding_number_2d(px: f64, py: f64, verts: &[(f64, f64)]) -> i32 {
    let n = verts.len();
    let mut winding = 0i32;
    for i in 0..n {
        let (x0, y0) = verts[i];
        let (x1, y1) = verts[(i + 1) % n];

        if y0 <= py {
            if y1 > py && cross_2d(x1 - x0, y1 - y0, px - x0, py - y0) > 0.0 {
                winding += 1;
            }
        } else if y1 <= py && cross_2d(x1 - x0, y1 - y0, px - x0, py - y0) < 0.0 {
            winding -= 1;
        }
    }
    winding
}

/// 2D cross product: `(ax * by - ay * bx)`.
#[inline]
fn cross_2d(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ax * by - ay * bx
}

/// Compute the area of a 3D polygon (coplanar points).
///
/// Uses the cross-product summation method projected along the polygon normal.
#[must_use]
pub fn polygon_area_3d(points: &[Point3], normal: &Vector3) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let mut cross_sum = Vector3::new(0.0, 0.0, 0.0);
    let o = &points[0];
    for i in 1..n {
        let a = points[i] - o;
        let b = points[(i + 1) % n] - o;
        cross_sum += a.cross(&b);
    }
    0.5 * cross_sum.dot(normal).abs()
}
