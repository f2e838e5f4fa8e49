//! Cubic Hermite segment between two knots.

use super::core::{Point2, Vec2};

/// Parameter steps used when integrating segment length.
pub const LENGTH_STEPS: usize = 1024;

/// One cubic-Hermite piece: positions and tangents at both ends, `t ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HermiteSegment {
    pub start: Point2,
    pub end: Point2,
    pub start_tangent: Vec2,
    pub end_tangent: Vec2,
}

impl HermiteSegment {
    #[must_use]
    pub const fn new(start: Point2, end: Point2, start_tangent: Vec2, end_tangent: Vec2) -> Self {
        Self {
            start,
            end,
            start_tangent,
            end_tangent,
        }
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let t2 = t * t;
        let t3 = t2 * t;
        let a1 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let b1 = t3 - 2.0 * t2 + t;
        let a2 = -2.0 * t3 + 3.0 * t2;
        let b2 = t3 - t2;
        self.combine(a1, b1, a2, b2)
    }

    /// Derivative with respect to the local parameter.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vec2 {
        let t2 = t * t;
        let a1 = 6.0 * t2 - 6.0 * t;
        let b1 = 3.0 * t2 - 4.0 * t + 1.0;
        let a2 = -6.0 * t2 + 6.0 * t;
        let b2 = 3.0 * t2 - 2.0 * t;
        self.combine(a1, b1, a2, b2).to_vec2()
    }

    /// Polyline length over [`LENGTH_STEPS`] equal parameter steps.
    #[must_use]
    pub fn length(&self) -> f64 {
        let dt = 1.0 / LENGTH_STEPS as f64;
        let mut prev = self.start;
        let mut total = 0.0;
        for k in 1..=LENGTH_STEPS {
            let t = (k as f64 * dt).min(1.0);
            let p = self.point_at(t);
            total += prev.distance_to(p);
            prev = p;
        }
        total
    }

    fn combine(&self, a1: f64, b1: f64, a2: f64, b2: f64) -> Point2 {
        Point2::new(
            a1 * self.start.x + b1 * self.start_tangent.x + a2 * self.end.x + b2 * self.end_tangent.x,
            a1 * self.start.y + b1 * self.start_tangent.y + a2 * self.end.y + b2 * self.end_tangent.y,
        )
    }
}
