use super::{points_equal, Point3, POINT_TOLERANCE, TOLERANCE};

/// Returns `true` if `point` lies on the infinite line through `start` and `end`.
///
/// A degenerate line (coincident endpoints) only contains its own point.
#[must_use]
pub fn on_line(point: &Point3, start: &Point3, end: &Point3) -> bool {
    let dir = end - start;
    let len = dir.norm();
    if len < TOLERANCE {
        return points_equal(point, start);
    }
    let dist = (point - start).cross(&dir).norm() / len;
    dist < POINT_TOLERANCE
}

/// Returns `true` if `point` lies on the closed segment `start`-`end`.
///
/// The point must be collinear with the segment, and each coordinate must lie
/// between the endpoint coordinates on that axis, inclusive and in either order.
#[must_use]
pub fn on_line_segment(point: &Point3, start: &Point3, end: &Point3) -> bool {
    if !on_line(point, start, end) {
        return false;
    }
    (0..3).all(|axis| {
        let lo = start[axis].min(end[axis]);
        let hi = start[axis].max(end[axis]);
        point[axis] >= lo - POINT_TOLERANCE && point[axis] <= hi + POINT_TOLERANCE
    })
}

/// Midpoint of the segment `start`-`end`.
#[must_use]
pub fn midpoint(start: &Point3, end: &Point3) -> Point3 {
    nalgebra::center(start, end)
}

/// Intersects two coplanar segments `a0`-`a1` and `b0`-`b1`.
///
/// Crossing segments yield at most one point. Collinear overlapping segments
/// yield every endpoint of either segment that lies on both, so callers can
/// split at the overlap boundaries. Skew, parallel or disjoint segments yield
/// nothing.
#[must_use]
pub fn intersect_segments(a0: &Point3, a1: &Point3, b0: &Point3, b1: &Point3) -> Vec<Point3> {
    let da = a1 - a0;
    let db = b1 - b0;
    if da.norm() < TOLERANCE || db.norm() < TOLERANCE {
        return Vec::new();
    }

    let cross = da.cross(&db);
    let cross_len = cross.norm();

    if cross_len < TOLERANCE * da.norm() * db.norm() {
        // Parallel: only collinear overlap contributes points
        if !on_line(b0, a0, a1) {
            return Vec::new();
        }
        let mut points: Vec<Point3> = Vec::new();
        for candidate in [a0, a1, b0, b1] {
            if on_line_segment(candidate, a0, a1)
                && on_line_segment(candidate, b0, b1)
                && !points.iter().any(|q| points_equal(q, candidate))
            {
                points.push(*candidate);
            }
        }
        return points;
    }

    let diff = b0 - a0;
    if (diff.dot(&cross) / cross_len).abs() > POINT_TOLERANCE {
        return Vec::new();
    }

    let t = diff.cross(&db).dot(&cross) / (cross_len * cross_len);
    let point = a0 + da * t;
    if on_line_segment(&point, a0, a1) && on_line_segment(&point, b0, b1) {
        vec![point]
    } else {
        Vec::new()
    }
}
