mod test_measurement_cache;
mod test_radius_basic;
mod test_tangent_basic;

use std::f64::consts::TAU;

use crate::geom::Point2;

/// Counter-clockwise ellipse knots.
pub(super) fn ellipse(n: usize, center: Point2, a: f64, b: f64) -> Vec<Point2> {
    (0..n)
        .map(|j| {
            let t = TAU * j as f64 / n as f64;
            Point2::new(center.x + a * t.cos(), center.y + b * t.sin())
        })
        .collect()
}

pub(super) fn circle(n: usize, center: Point2, radius: f64) -> Vec<Point2> {
    ellipse(n, center, radius, radius)
}

/// C-shaped outline whose angle about the centroid is not monotonic.
pub(super) fn crescent() -> Vec<Point2> {
    let limit = 150f64.to_radians();
    let steps = 12;
    let arc = |radius: f64, j: usize| {
        let t = -limit + 2.0 * limit * j as f64 / (steps - 1) as f64;
        Point2::new(radius * t.cos(), radius * t.sin())
    };
    let mut knots: Vec<Point2> = (0..steps).map(|j| arc(10.0, j)).collect();
    knots.extend((0..steps).rev().map(|j| arc(8.0, j)));
    knots
}
