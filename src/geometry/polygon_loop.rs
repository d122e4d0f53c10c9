use tracing::debug;

use crate::error::{GeometryError, OperationError, Result};
use crate::math::plane_fit::fit_plane_to_points;
use crate::math::polygon_3d::{point_in_polygon_2d, polygon_area_3d};
use crate::math::{
    points_equal, same_direction, transform_point, Matrix4, Point3, Vector3, POINT_TOLERANCE,
};

use super::{Plane, PlaneCoefficients};

/// One closed ring of a polygon: its outer boundary or a hole.
///
/// The ring is implicitly closed; the last point connects back to the first.
/// A loop holds no reference to its polygon; ownership is containment in
/// [`Polygon::loops`](super::Polygon::loops).
#[derive(Debug, Clone, Default)]
pub struct PolygonLoop {
    points: Vec<Point3>,
    outer: bool,
}

impl PolygonLoop {
    /// Creates a loop from a point sequence.
    #[must_use]
    pub fn new(points: Vec<Point3>, outer: bool) -> Self {
        Self { points, outer }
    }

    /// Creates a loop from a flat `[x0, y0, z0, x1, y1, z1, ...]` slice.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the length is not a multiple
    /// of three or any coordinate is not finite.
    pub fn from_coordinates(coordinates: &[f64], outer: bool) -> Result<Self> {
        if coordinates.len() % 3 != 0 {
            return Err(OperationError::InvalidInput(format!(
                "expected coordinate triples, got {} values",
                coordinates.len()
            ))
            .into());
        }
        if let Some(bad) = coordinates.iter().find(|c| !c.is_finite()) {
            return Err(
                OperationError::InvalidInput(format!("non-finite coordinate {bad}")).into(),
            );
        }
        let points = coordinates
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self::new(points, outer))
    }

    /// Returns the stored points, unreduced.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Replaces the stored points.
    pub fn set_points(&mut self, points: Vec<Point3>) {
        self.points = points;
    }

    /// Returns `true` if this loop is the outer boundary of its polygon.
    #[must_use]
    pub fn is_outer(&self) -> bool {
        self.outer
    }

    /// Marks this loop as outer boundary (`true`) or hole (`false`).
    pub fn set_outer(&mut self, outer: bool) {
        self.outer = outer;
    }

    /// Number of stored points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the loop has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates the closed ring's edges as `(start, end)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&Point3, &Point3)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (&self.points[i], &self.points[(i + 1) % n]))
    }

    /// Returns the points with coincident and collinear vertices removed.
    ///
    /// First drops every point equal to its cyclic successor (collapsing to
    /// the first point if all coincide). Then, for three or more remaining
    /// points, drops every point whose incoming and outgoing edges point the
    /// same way. The incoming edge is always the raw edge from the previous
    /// input point, even when that point was itself dropped.
    #[must_use]
    pub fn reduced_points(&self) -> Vec<Point3> {
        let n = self.points.len();
        let mut distinct = Vec::with_capacity(n);
        for i in 0..n {
            let point = &self.points[i];
            let next = &self.points[(i + 1) % n];
            if points_equal(point, next) {
                debug!(x = point.x, y = point.y, z = point.z, "skipping coincident point");
            } else {
                distinct.push(*point);
            }
        }
        if distinct.is_empty() {
            return self.points.first().map(|p| vec![*p]).unwrap_or_default();
        }

        let n = distinct.len();
        if n < 3 {
            return distinct;
        }

        let mut result = Vec::with_capacity(n);
        let mut prev_vector = distinct[0] - distinct[n - 1];
        for i in 0..n {
            let this_vector = distinct[(i + 1) % n] - distinct[i];
            if !same_direction(&prev_vector, &this_vector) {
                result.push(distinct[i]);
            }
            prev_vector = this_vector;
        }
        result
    }

    /// Returns a reduced copy of this loop, keeping its `outer` flag.
    #[must_use]
    pub fn reduced(&self) -> Self {
        Self::new(self.reduced_points(), self.outer)
    }

    /// Reduces this loop in place.
    pub fn reduce(&mut self) {
        self.points = self.reduced_points();
    }

    /// Checks that the loop is a usable planar ring.
    ///
    /// Works on a reduced copy; `self` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::TooFewPoints` if fewer than three points remain
    /// after reduction, `GeometryError::Degenerate` if no plane can be fitted
    /// and `GeometryError::NonPlanar` if a reduced point is off the plane.
    pub fn validate(&self) -> Result<()> {
        let reduced = self.reduced_points();
        if reduced.len() < 3 {
            return Err(GeometryError::TooFewPoints {
                count: reduced.len(),
            }
            .into());
        }

        let plane = self.plane()?;
        for (index, point) in reduced.iter().enumerate() {
            let distance = plane.signed_distance(point).abs();
            if distance > POINT_TOLERANCE {
                return Err(GeometryError::NonPlanar { index, distance }.into());
            }
        }
        Ok(())
    }

    /// Returns `true` if [`validate`](Self::validate) succeeds.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Best-fit plane through the stored (unreduced) points.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the points enclose no area.
    pub fn plane(&self) -> Result<PlaneCoefficients> {
        fit_plane_to_points(&self.points)
    }

    /// Unit normal of the loop, taken from its plane.
    ///
    /// Follows the winding of the points, so it is correct for concave loops.
    /// Returns `None` if the loop has no points or no plane can be fitted.
    #[must_use]
    pub fn normal(&self) -> Option<Vector3> {
        if self.reduced_points().is_empty() {
            debug!("loop has no points, no normal");
            return None;
        }
        match self.plane() {
            Ok(plane) => Some(plane.normal()),
            Err(err) => {
                debug!(%err, "loop has no normal");
                None
            }
        }
    }

    /// Returns a copy with the point order reversed, keeping the `outer` flag.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self::new(points, self.outer)
    }

    /// Reverses the point order in place.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Returns a copy with every point transformed by `matrix`.
    #[must_use]
    pub fn transformed(&self, matrix: &Matrix4) -> Self {
        let points = self
            .points
            .iter()
            .map(|p| transform_point(matrix, p))
            .collect();
        Self::new(points, self.outer)
    }

    /// Transforms every point by `matrix` in place.
    pub fn transform(&mut self, matrix: &Matrix4) {
        for point in &mut self.points {
            *point = transform_point(matrix, point);
        }
    }

    /// Returns `true` if `point` lies inside this ring.
    ///
    /// Points on an edge count only when `include_border` is set. Points off
    /// the loop's plane, and any point tested against a degenerate loop, are
    /// outside.
    #[must_use]
    pub fn contains_point(&self, point: &Point3, include_border: bool) -> bool {
        let Ok(coefficients) = self.plane() else {
            return false;
        };
        let Ok(plane) = Plane::from_coefficients(&coefficients) else {
            return false;
        };
        point_in_polygon_2d(point, &self.points, &plane, include_border)
    }

    /// Enclosed area of the ring.
    #[must_use]
    pub fn area(&self) -> f64 {
        match self.plane() {
            Ok(plane) => polygon_area_3d(&self.points, &plane.normal()),
            Err(_) => 0.0,
        }
    }

    /// Compares the reduced point sequences of two loops up to cyclic rotation.
    #[must_use]
    pub fn circular_eq(&self, other: &Self) -> bool {
        let ours = self.reduced_points();
        let theirs = other.reduced_points();
        if ours.len() != theirs.len() {
            return false;
        }
        let n = ours.len();
        if n == 0 {
            return true;
        }
        (0..n).any(|offset| {
            (0..n).all(|i| points_equal(&ours[i], &theirs[(offset + i) % n]))
        })
    }
}

impl PartialEq for PolygonLoop {
    fn eq(&self, other: &Self) -> bool {
        self.outer == other.outer
            && self.points.len() == other.points.len()
            && self
                .points
                .iter()
                .zip(other.points.iter())
                .all(|(a, b)| points_equal(a, b))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::PolyloopError;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn square_with_midpoint() -> PolygonLoop {
        PolygonLoop::new(
            vec![
                p(0.0, 0.0, 0.0),
                p(5.0, 0.0, 0.0),
                p(10.0, 0.0, 0.0),
                p(10.0, 10.0, 0.0),
                p(0.0, 10.0, 0.0),
            ],
            true,
        )
    }

    fn assert_points(actual: &[Point3], expected: &[Point3]) {
        assert_eq!(actual.len(), expected.len(), "got {actual:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!(points_equal(a, e), "expected {e:?}, got {a:?}");
        }
    }

    // ── construction ──

    #[test]
    fn default_loop_is_empty_hole() {
        let lp = PolygonLoop::default();
        assert!(lp.is_empty());
        assert!(!lp.is_outer());
    }

    #[test]
    fn from_coordinates_builds_points() {
        let lp =
            PolygonLoop::from_coordinates(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0], true)
                .unwrap();
        assert_eq!(lp.len(), 3);
        assert!(lp.is_outer());
        assert!(points_equal(&lp.points()[2], &p(1.0, 1.0, 0.0)));
    }

    #[test]
    fn from_coordinates_rejects_partial_triple() {
        let err = PolygonLoop::from_coordinates(&[0.0, 0.0, 0.0, 1.0], false).unwrap_err();
        assert!(matches!(err, PolyloopError::Operation(OperationError::InvalidInput(_))));
    }

    #[test]
    fn from_coordinates_rejects_nan() {
        assert!(PolygonLoop::from_coordinates(&[0.0, f64::NAN, 0.0], false).is_err());
    }

    #[test]
    fn set_points_replaces() {
        let mut lp = PolygonLoop::default();
        lp.set_points(vec![p(1.0, 2.0, 3.0)]);
        assert_eq!(lp.len(), 1);
    }

    #[test]
    fn edges_wrap_around() {
        let lp = square_with_midpoint();
        let edges: Vec<_> = lp.edges().collect();
        assert_eq!(edges.len(), 5);
        assert!(points_equal(edges[4].0, &p(0.0, 10.0, 0.0)));
        assert!(points_equal(edges[4].1, &p(0.0, 0.0, 0.0)));
    }

    // ── reduce ──

    #[test]
    fn collinear_midpoint_dropped() {
        let reduced = square_with_midpoint().reduced_points();
        assert_points(
            &reduced,
            &[
                p(0.0, 0.0, 0.0),
                p(10.0, 0.0, 0.0),
                p(10.0, 10.0, 0.0),
                p(0.0, 10.0, 0.0),
            ],
        );
    }

    #[test]
    fn coincident_point_dropped_before_collinear_pass() {
        let lp = PolygonLoop::new(
            vec![
                p(0.0, 0.0, 0.0),
                p(5.0, 0.0, 0.0),
                p(5.0, 0.0, 0.0),
                p(5.0, 2.0, 0.0),
                p(5.0, 2.0, 1.0),
            ],
            false,
        );
        assert_points(
            &lp.reduced_points(),
            &[
                p(0.0, 0.0, 0.0),
                p(5.0, 0.0, 0.0),
                p(5.0, 2.0, 0.0),
                p(5.0, 2.0, 1.0),
            ],
        );
    }

    #[test]
    fn closing_duplicate_dropped() {
        let lp = PolygonLoop::new(
            vec![
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(1.0, 1.0, 0.0),
                p(0.0, 0.0, 0.0),
            ],
            false,
        );
        assert_eq!(lp.reduced_points().len(), 3);
    }

    #[test]
    fn all_coincident_collapses_to_first() {
        let lp = PolygonLoop::new(vec![p(1.0, 1.0, 1.0); 4], false);
        assert_points(&lp.reduced_points(), &[p(1.0, 1.0, 1.0)]);
    }

    #[test]
    fn empty_reduces_to_empty() {
        assert!(PolygonLoop::default().reduced_points().is_empty());
    }

    #[test]
    fn collinear_run_at_seam_dropped() {
        // Midpoint sits at index 0, between the last and second points
        let lp = PolygonLoop::new(
            vec![
                p(5.0, 0.0, 0.0),
                p(10.0, 0.0, 0.0),
                p(10.0, 10.0, 0.0),
                p(0.0, 10.0, 0.0),
                p(0.0, 0.0, 0.0),
            ],
            false,
        );
        assert_eq!(lp.reduced_points().len(), 4);
    }

    #[test]
    fn spike_is_kept() {
        // Reversal of direction is not collinear reduction
        let lp = PolygonLoop::new(
            vec![
                p(0.0, 0.0, 0.0),
                p(10.0, 0.0, 0.0),
                p(5.0, 0.0, 0.0),
                p(5.0, 5.0, 0.0),
            ],
            false,
        );
        assert_eq!(lp.reduced_points().len(), 4);
    }

    #[test]
    fn reduce_is_idempotent() {
        let lp = PolygonLoop::new(
            vec![
                p(0.0, 0.0, 0.0),
                p(0.0, 0.0, 0.0),
                p(2.0, 0.0, 0.0),
                p(4.0, 0.0, 0.0),
                p(4.0, 2.0, 0.0),
                p(4.0, 4.0, 0.0),
                p(4.0, 4.0, 0.0),
                p(0.0, 4.0, 0.0),
                p(0.0, 2.0, 0.0),
            ],
            true,
        );
        let once = lp.reduced();
        let twice = once.reduced();
        assert_eq!(once, twice);
        assert_eq!(once.len(), 4);
    }

    #[test]
    fn reduce_in_place_and_copy_agree() {
        let lp = square_with_midpoint();
        let copy = lp.reduced();
        let mut mutated = lp.clone();
        mutated.reduce();
        assert_eq!(copy, mutated);
        assert_eq!(lp.len(), 5);
    }

    // ── validate ──

    #[test]
    fn two_points_invalid() {
        let lp = PolygonLoop::new(vec![p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0)], false);
        let err = lp.validate().unwrap_err();
        assert!(matches!(
            err,
            PolyloopError::Geometry(GeometryError::TooFewPoints { count: 2 })
        ));
    }

    #[test]
    fn collinear_points_invalid() {
        let lp = PolygonLoop::new(
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)],
            false,
        );
        assert!(matches!(
            lp.validate().unwrap_err(),
            PolyloopError::Geometry(GeometryError::TooFewPoints { count: 2 })
        ));
    }

    #[test]
    fn non_planar_invalid() {
        let lp = PolygonLoop::new(
            vec![
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(1.0, 1.0, 1.0),
                p(0.0, 1.0, 0.0),
            ],
            false,
        );
        assert!(matches!(
            lp.validate().unwrap_err(),
            PolyloopError::Geometry(GeometryError::NonPlanar { .. })
        ));
        assert!(!lp.is_valid());
    }

    #[test]
    fn square_valid() {
        assert!(square_with_midpoint().is_valid());
    }

    #[test]
    fn validate_leaves_points_untouched() {
        let lp = square_with_midpoint();
        lp.validate().unwrap();
        assert_eq!(lp.len(), 5);
    }

    // ── plane / normal ──

    #[test]
    fn plane_of_raised_square() {
        let lp = PolygonLoop::new(
            vec![
                p(0.0, 0.0, 2.0),
                p(1.0, 0.0, 2.0),
                p(1.0, 1.0, 2.0),
                p(0.0, 1.0, 2.0),
            ],
            true,
        );
        assert_eq!(lp.plane().unwrap().to_array(), [0.0, 0.0, 1.0, -2.0]);
    }

    #[test]
    fn normal_follows_winding() {
        let lp = square_with_midpoint();
        let up = lp.normal().unwrap();
        let down = lp.reversed().normal().unwrap();
        assert_relative_eq!(up.z, 1.0);
        assert_relative_eq!(down.z, -1.0);
    }

    #[test]
    fn normal_of_empty_is_none() {
        assert!(PolygonLoop::default().normal().is_none());
    }

    // ── reverse / transform ──

    #[test]
    fn reversed_keeps_flag() {
        let lp = square_with_midpoint();
        let rev = lp.reversed();
        assert!(rev.is_outer());
        assert!(points_equal(&rev.points()[0], &p(0.0, 10.0, 0.0)));
        let mut in_place = lp.clone();
        in_place.reverse();
        assert_eq!(in_place, rev);
    }

    #[test]
    fn transformed_translates_points() {
        let lp = square_with_midpoint();
        let m = Matrix4::new_translation(&Vector3::new(0.0, 0.0, 3.0));
        let moved = lp.transformed(&m);
        assert!(moved.is_outer());
        assert!(moved.points().iter().all(|q| (q.z - 3.0).abs() < 1e-12));
        assert!(lp.points().iter().all(|q| q.z.abs() < 1e-12));
        let mut in_place = lp.clone();
        in_place.transform(&m);
        assert_eq!(in_place, moved);
    }

    // ── containment / area / equality ──

    #[test]
    fn contains_point_inside_and_border() {
        let lp = square_with_midpoint();
        assert!(lp.contains_point(&p(3.0, 3.0, 0.0), false));
        assert!(lp.contains_point(&p(10.0, 3.0, 0.0), true));
        assert!(!lp.contains_point(&p(10.0, 3.0, 0.0), false));
        assert!(!lp.contains_point(&p(11.0, 3.0, 0.0), true));
    }

    #[test]
    fn degenerate_loop_contains_nothing() {
        let lp = PolygonLoop::new(vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)], false);
        assert!(!lp.contains_point(&p(0.5, 0.0, 0.0), true));
    }

    #[test]
    fn area_of_square() {
        assert_relative_eq!(square_with_midpoint().area(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn circular_eq_accepts_rotation() {
        let a = square_with_midpoint();
        let b = PolygonLoop::new(
            vec![
                p(10.0, 10.0, 0.0),
                p(0.0, 10.0, 0.0),
                p(0.0, 0.0, 0.0),
                p(10.0, 0.0, 0.0),
            ],
            true,
        );
        assert!(a.circular_eq(&b));
        assert!(!a.circular_eq(&b.reversed()));
        assert_ne!(a, b);
    }
}
