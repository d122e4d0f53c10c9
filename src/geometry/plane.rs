use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, PLANE_SNAP_TOLERANCE, POINT_TOLERANCE, TOLERANCE};

/// Coefficients of the implicit plane `ax + by + cz + d = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl PlaneCoefficients {
    /// Creates plane coefficients as given.
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// Returns a copy with every coefficient below [`PLANE_SNAP_TOLERANCE`]
    /// in magnitude replaced by exactly `0.0`.
    #[must_use]
    pub fn snapped(self) -> Self {
        let snap = |x: f64| if x.abs() < PLANE_SNAP_TOLERANCE { 0.0 } else { x };
        Self {
            a: snap(self.a),
            b: snap(self.b),
            c: snap(self.c),
            d: snap(self.d),
        }
    }

    /// The plane normal `(a, b, c)`.
    #[must_use]
    pub fn normal(&self) -> Vector3 {
        Vector3::new(self.a, self.b, self.c)
    }

    /// Signed distance from `point` to the plane, assuming a unit normal.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        self.a * point.x + self.b * point.y + self.c * point.z + self.d
    }

    /// Coefficients as `[a, b, c, d]`.
    #[must_use]
    pub fn to_array(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// Coefficient-wise comparison within [`POINT_TOLERANCE`].
    #[must_use]
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(x, y)| (x - y).abs() < POINT_TOLERANCE)
    }
}

/// An infinite plane with an orthonormal `(u, v)` frame.
///
/// Used to project coplanar 3D points into 2D for containment tests.
/// The normal is `u_dir × v_dir`.
#[derive(Debug, Clone)]
pub struct Plane {
    origin: Point3,
    u_dir: Vector3,
    v_dir: Vector3,
    normal: Vector3,
}

impl Plane {
    /// Creates a plane from an origin and a normal vector.
    ///
    /// The U and V directions are computed automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / len;

        // Choose a reference vector not parallel to the normal
        let reference = if normal.x.abs() < 0.9 {
            Vector3::new(1.0, 0.0, 0.0)
        } else {
            Vector3::new(0.0, 1.0, 0.0)
        };

        let u_dir = normal.cross(&reference).normalize();
        let v_dir = normal.cross(&u_dir);

        Ok(Self {
            origin,
            u_dir,
            v_dir,
            normal,
        })
    }

    /// Creates a plane from implicit coefficients, with its origin at the
    /// point of the plane closest to the world origin.
    ///
    /// # Errors
    ///
    /// Returns an error if `(a, b, c)` is zero-length.
    pub fn from_coefficients(coefficients: &PlaneCoefficients) -> Result<Self> {
        let normal = coefficients.normal();
        let len_sq = normal.norm_squared();
        if len_sq < TOLERANCE * TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let origin = Point3::from(normal * (-coefficients.d / len_sq));
        Self::from_normal(origin, normal)
    }

    /// Returns the origin point of the plane.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the unit normal vector of the plane.
    #[must_use]
    pub fn plane_normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Projects a point onto the plane's `(u, v)` coordinates.
    #[must_use]
    pub fn project_to_uv(&self, point: &Point3) -> (f64, f64) {
        let diff = point - self.origin;
        (diff.dot(&self.u_dir), diff.dot(&self.v_dir))
    }

    /// Signed distance from `point` to the plane along its normal.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        (point - self.origin).dot(&self.normal)
    }
}
