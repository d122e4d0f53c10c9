mod intersect;

pub use intersect::{
    find_shared_line_segments, intersect_polygon_polygon, stitch_loops, IntersectPolygons,
    Segment,
};
