use crate::error::Result;
use crate::math::polygon_3d::on_ring_border;
use crate::math::{points_equal, Matrix4, Point3, Vector3};
use crate::operations::intersect_polygon_polygon;

use super::{PlaneCoefficients, PolygonLoop};

/// Input accepted wherever a polygon loop is expected.
#[derive(Debug, Clone)]
pub enum LoopSource {
    /// A raw point sequence, wrapped into a new loop.
    Points(Vec<Point3>),
    /// A ready-made loop.
    Loop(PolygonLoop),
}

impl LoopSource {
    fn into_loop(self) -> PolygonLoop {
        match self {
            Self::Points(points) => PolygonLoop::new(points, false),
            Self::Loop(lp) => lp,
        }
    }
}

impl From<Vec<Point3>> for LoopSource {
    fn from(points: Vec<Point3>) -> Self {
        Self::Points(points)
    }
}

impl From<&[Point3]> for LoopSource {
    fn from(points: &[Point3]) -> Self {
        Self::Points(points.to_vec())
    }
}

impl From<PolygonLoop> for LoopSource {
    fn from(lp: PolygonLoop) -> Self {
        Self::Loop(lp)
    }
}

/// A planar polygon: one outer loop plus zero or more holes.
///
/// The first loop added is always the outer loop; every later loop is a hole.
#[derive(Debug, Clone, Default)]
pub struct Polygon {
    loops: Vec<PolygonLoop>,
}

impl Polygon {
    /// Creates an empty polygon.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a polygon whose outer loop is `outer`.
    #[must_use]
    pub fn from_loop(outer: impl Into<LoopSource>) -> Self {
        let mut polygon = Self::new();
        polygon.add_loop(outer);
        polygon
    }

    /// Appends a loop.
    ///
    /// The first loop becomes the outer loop; later loops are marked as holes
    /// whatever their own flag says. Duplicate loops are not detected.
    pub fn add_loop(&mut self, source: impl Into<LoopSource>) {
        let mut lp = source.into().into_loop();
        lp.set_outer(self.loops.is_empty());
        self.loops.push(lp);
    }

    /// The outer loop, if any loop has been added.
    #[must_use]
    pub fn outer_loop(&self) -> Option<&PolygonLoop> {
        self.loops.first()
    }

    /// All loops, outer loop first.
    #[must_use]
    pub fn loops(&self) -> &[PolygonLoop] {
        &self.loops
    }

    /// The hole loops.
    #[must_use]
    pub fn inner_loops(&self) -> &[PolygonLoop] {
        self.loops.get(1..).unwrap_or_default()
    }

    /// All points of all loops, outer loop first.
    #[must_use]
    pub fn points(&self) -> Vec<Point3> {
        self.loops
            .iter()
            .flat_map(|lp| lp.points().iter().copied())
            .collect()
    }

    /// Returns `true` if the polygon has no loops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    /// Removes every loop.
    pub fn clear(&mut self) {
        self.loops.clear();
    }

    /// Returns a copy with every loop reduced, keeping each loop's role.
    #[must_use]
    pub fn reduced(&self) -> Self {
        Self {
            loops: self.loops.iter().map(PolygonLoop::reduced).collect(),
        }
    }

    /// Reduces every loop in place.
    pub fn reduce(&mut self) {
        for lp in &mut self.loops {
            lp.reduce();
        }
    }

    /// Validates every loop independently.
    ///
    /// Holes are not checked for lying inside the outer loop; see
    /// [`holes_contained`](Self::holes_contained).
    ///
    /// # Errors
    ///
    /// Returns the first loop validation failure.
    pub fn validate(&self) -> Result<()> {
        self.loops.iter().try_for_each(PolygonLoop::validate)
    }

    /// Returns `true` if [`validate`](Self::validate) succeeds.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Returns `true` if every hole vertex lies inside or on the outer loop.
    #[must_use]
    pub fn holes_contained(&self) -> bool {
        let Some(outer) = self.outer_loop() else {
            return true;
        };
        self.inner_loops()
            .iter()
            .flat_map(|hole| hole.points().iter())
            .all(|point| outer.contains_point(point, true))
    }

    /// Normal of the outer loop.
    #[must_use]
    pub fn normal(&self) -> Option<Vector3> {
        self.outer_loop().and_then(PolygonLoop::normal)
    }

    /// Plane of the outer loop; `None` without a usable outer loop.
    #[must_use]
    pub fn plane(&self) -> Option<PlaneCoefficients> {
        self.outer_loop().and_then(|lp| lp.plane().ok())
    }

    /// Returns a copy with every loop reversed, keeping each loop's role.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            loops: self.loops.iter().map(PolygonLoop::reversed).collect(),
        }
    }

    /// Reverses every loop in place.
    pub fn reverse(&mut self) {
        for lp in &mut self.loops {
            lp.reverse();
        }
    }

    /// Returns a copy with every loop transformed by `matrix`.
    #[must_use]
    pub fn transformed(&self, matrix: &Matrix4) -> Self {
        Self {
            loops: self.loops.iter().map(|lp| lp.transformed(matrix)).collect(),
        }
    }

    /// Transforms every loop in place.
    pub fn transform(&mut self, matrix: &Matrix4) {
        for lp in &mut self.loops {
            lp.transform(matrix);
        }
    }

    /// Point containment honoring holes.
    ///
    /// A point strictly inside a hole is outside the polygon. A point on the
    /// outer boundary or on a hole boundary is a border point and counts only
    /// when `include_border` is set.
    #[must_use]
    pub fn contains_point(&self, point: &Point3, include_border: bool) -> bool {
        let Some(outer) = self.outer_loop() else {
            return false;
        };
        if !outer.contains_point(point, true) {
            return false;
        }
        if on_ring_border(point, outer.points()) {
            return include_border;
        }
        for hole in self.inner_loops() {
            if on_ring_border(point, hole.points()) {
                return include_border;
            }
            if hole.contains_point(point, false) {
                return false;
            }
        }
        true
    }

    /// Area of the outer loop minus the area of every hole.
    #[must_use]
    pub fn area(&self) -> f64 {
        let Some(outer) = self.outer_loop() else {
            return 0.0;
        };
        let holes: f64 = self.inner_loops().iter().map(PolygonLoop::area).sum();
        outer.area() - holes
    }

    /// Compares two polygons loop by loop, each loop up to cyclic rotation
    /// of its reduced points.
    #[must_use]
    pub fn circular_eq(&self, other: &Self) -> bool {
        self.loops.len() == other.loops.len()
            && self
                .loops
                .iter()
                .zip(other.loops.iter())
                .all(|(a, b)| a.circular_eq(b))
    }

    /// Intersects this polygon with `other`.
    ///
    /// # Errors
    ///
    /// Returns an error if either polygon fails validation.
    pub fn intersect(&self, other: &Self) -> Result<Vec<Polygon>> {
        intersect_polygon_polygon(self, other)
    }
}

impl PartialEq for Polygon {
    /// Positional comparison of the flattened point sequences.
    fn eq(&self, other: &Self) -> bool {
        let ours = self.points();
        let theirs = other.points();
        ours.len() == theirs.len()
            && ours
                .iter()
                .zip(theirs.iter())
                .all(|(a, b)| points_equal(a, b))
    }
}

impl From<PolygonLoop> for Polygon {
    fn from(outer: PolygonLoop) -> Self {
        Self::from_loop(outer)
    }
}
