use tracing::{debug, info, trace};

use crate::error::Result;
use crate::geometry::Polygon;
use crate::math::segment::{intersect_segments, midpoint};
use crate::math::{points_equal, same_direction, Point3};

/// A directed line segment `(start, end)`.
pub type Segment = (Point3, Point3);

/// Computes the intersection of two coplanar polygons.
pub struct IntersectPolygons<'a> {
    polygon_a: &'a Polygon,
    polygon_b: &'a Polygon,
}

impl<'a> IntersectPolygons<'a> {
    /// Creates a new `IntersectPolygons` operation.
    #[must_use]
    pub fn new(polygon_a: &'a Polygon, polygon_b: &'a Polygon) -> Self {
        Self {
            polygon_a,
            polygon_b,
        }
    }

    /// Executes the intersection.
    ///
    /// # Errors
    ///
    /// Returns an error if either polygon fails validation.
    pub fn execute(&self) -> Result<Vec<Polygon>> {
        intersect_polygon_polygon(self.polygon_a, self.polygon_b)
    }
}

/// Intersects two polygons, returning the overlapping region(s).
///
/// Both polygons are validated first. If their normals disagree, a reversed
/// copy of `polygon2` is used. Polygons in different planes do not intersect
/// and yield an empty list.
///
/// Each closed loop of the overlap becomes its own single-loop polygon; holes
/// are not reassembled into a parent polygon. Cost is quadratic in the total
/// edge count of the two inputs.
///
/// # Errors
///
/// Returns the validation error of the first invalid polygon.
pub fn intersect_polygon_polygon(polygon1: &Polygon, polygon2: &Polygon) -> Result<Vec<Polygon>> {
    polygon1.validate()?;
    polygon2.validate()?;

    let (Some(normal1), Some(normal2)) = (polygon1.normal(), polygon2.normal()) else {
        info!("polygon without an outer loop, no intersection");
        return Ok(Vec::new());
    };

    let flipped;
    let polygon2 = if same_direction(&normal1, &normal2) {
        polygon2
    } else {
        flipped = polygon2.reversed();
        &flipped
    };

    let (Some(plane1), Some(plane2)) = (polygon1.plane(), polygon2.plane()) else {
        info!("polygon without a plane, no intersection");
        return Ok(Vec::new());
    };
    if !plane1.approx_eq(&plane2) {
        info!(
            plane1 = ?plane1.to_array(),
            plane2 = ?plane2.to_array(),
            "polygons are not coplanar, no intersection"
        );
        return Ok(Vec::new());
    }

    let forward = find_shared_line_segments(polygon1, polygon2);
    let backward = find_shared_line_segments(polygon2, polygon1);
    trace!(
        forward = forward.len(),
        backward = backward.len(),
        "shared line segments"
    );

    let mut segments: Vec<Segment> = Vec::with_capacity(forward.len() + backward.len());
    for segment in forward.into_iter().chain(backward) {
        if !segments.iter().any(|s| segments_equal(s, &segment)) {
            segments.push(segment);
        }
    }

    let polygons = stitch_loops(segments)
        .into_iter()
        .filter(|points| {
            if points.len() < 3 {
                debug!(count = points.len(), "discarding degenerate loop");
                return false;
            }
            true
        })
        .map(Polygon::from_loop)
        .collect();
    Ok(polygons)
}

/// Splits every edge of `polygon_a` where it meets the edges of `polygon_b`
/// and keeps the pieces lying inside or on the border of `polygon_b`.
///
/// Pieces along one edge are ordered by distance from the edge start, ties
/// broken lexicographically by coordinates.
#[must_use]
pub fn find_shared_line_segments(polygon_a: &Polygon, polygon_b: &Polygon) -> Vec<Segment> {
    let mut result = Vec::new();

    for lp in polygon_a.loops() {
        for (start, end) in lp.edges() {
            if points_equal(start, end) {
                continue;
            }

            let mut splits: Vec<Point3> = Vec::new();
            for other in polygon_b.loops() {
                for (b0, b1) in other.edges() {
                    for point in intersect_segments(start, end, b0, b1) {
                        if points_equal(&point, start) || points_equal(&point, end) {
                            continue;
                        }
                        if !splits.iter().any(|q| points_equal(q, &point)) {
                            splits.push(point);
                        }
                    }
                }
            }

            splits.sort_by(|a, b| {
                let da = (a - start).norm();
                let db = (b - start).norm();
                da.total_cmp(&db)
                    .then(a.x.total_cmp(&b.x))
                    .then(a.y.total_cmp(&b.y))
                    .then(a.z.total_cmp(&b.z))
            });

            let mut prev = *start;
            for point in splits.into_iter().chain(std::iter::once(*end)) {
                let mid = midpoint(&prev, &point);
                if polygon_b.contains_point(&mid, true) {
                    result.push((prev, point));
                }
                prev = point;
            }
        }
    }

    result
}

/// Chains directed segments into point loops.
///
/// Each loop starts at the first remaining segment and follows segments whose
/// start matches the running end point until it returns to its first point.
/// A chain that cannot be continued is emitted as it stands.
#[must_use]
pub fn stitch_loops(mut segments: Vec<Segment>) -> Vec<Vec<Point3>> {
    let mut loops = Vec::new();

    while !segments.is_empty() {
        let (first, mut end) = segments.remove(0);
        let mut points = vec![first];

        loop {
            if points_equal(&end, &first) {
                break;
            }
            let Some(idx) = segments.iter().position(|(s, _)| points_equal(s, &end)) else {
                debug!(count = points.len(), "emitting open chain as orphan loop");
                break;
            };
            let (next_start, next_end) = segments.remove(idx);
            points.push(next_start);
            end = next_end;
        }

        loops.push(points);
    }

    loops
}

fn segments_equal(a: &Segment, b: &Segment) -> bool {
    points_equal(&a.0, &b.0) && points_equal(&a.1, &b.1)
}
