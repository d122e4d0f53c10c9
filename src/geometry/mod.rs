pub mod plane;
pub mod polygon;
pub mod polygon_loop;

pub use plane::{Plane, PlaneCoefficients};
pub use polygon::{LoopSource, Polygon};
pub use polygon_loop::PolygonLoop;
