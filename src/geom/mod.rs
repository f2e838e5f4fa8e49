mod core;
mod hermite;
mod joined;
mod periodic;
mod polygon;
mod spline;

pub use core::{Point2, Tolerance, Transform2, Vec2};
pub use hermite::{HermiteSegment, LENGTH_STEPS};
pub use joined::{JoinedSegments, SegmentLocation};
pub use periodic::{
    CubicPair, PeriodicCubicSpline, PeriodicError, PeriodicSegments, fix_cross_over,
    is_strictly_increasing,
};
pub use polygon::{Orientation, Polygon};
pub use spline::{
    MAX_KNOTS, MIN_KNOTS, OutlineSpline, SplineError, TangentStrategy, chord_tangent,
    circle_tangent, circumcenter,
};

#[cfg(test)]
mod tests;
