//! Closed point sequences and their area-based derived quantities.

use serde::{Deserialize, Serialize};

use super::core::{Point2, Transform2};

/// Winding direction of a closed outline with the Y axis pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
}

impl Orientation {
    /// Orientation implied by a signed shoelace area. Zero area counts as
    /// counter-clockwise.
    #[must_use]
    pub fn from_signed_area(area: f64) -> Self {
        if area < 0.0 {
            Self::Clockwise
        } else {
            Self::CounterClockwise
        }
    }

    #[must_use]
    pub const fn is_clockwise(self) -> bool {
        matches!(self, Self::Clockwise)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Clockwise => "clockwise",
            Self::CounterClockwise => "counter-clockwise",
        }
    }
}

/// Ordered sequence of points, treated as closed (last point joins the first).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Point2>,
}

impl Polygon {
    /// Minimum vertex count for area and centroid to be meaningful.
    pub const MIN_POINTS: usize = 3;

    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn into_points(self) -> Vec<Point2> {
        self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<Point2> {
        self.points.first().copied()
    }

    /// Shoelace area, positive for counter-clockwise outlines.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        if self.points.len() < Self::MIN_POINTS {
            return 0.0;
        }
        0.5 * self
            .edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>()
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area centroid. Falls back to the vertex mean when the area vanishes
    /// (collinear or coincident points). `None` for an empty polygon.
    #[must_use]
    pub fn centroid(&self) -> Option<Point2> {
        if self.points.is_empty() {
            return None;
        }

        let area = self.signed_area();
        if area == 0.0 || !area.is_finite() {
            return Some(self.vertex_mean());
        }

        let (mut cx, mut cy) = (0.0, 0.0);
        for (a, b) in self.edges() {
            let cross = a.x * b.y - b.x * a.y;
            cx += (a.x + b.x) * cross;
            cy += (a.y + b.y) * cross;
        }
        let scale = 1.0 / (6.0 * area);
        Some(Point2::new(cx * scale, cy * scale))
    }

    #[must_use]
    pub fn vertex_mean(&self) -> Point2 {
        let n = self.points.len().max(1) as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point2::new(sx / n, sy / n)
    }

    /// Length of the closed boundary, including the closing edge.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.edges().map(|(a, b)| a.distance_to(b)).sum()
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        Orientation::from_signed_area(self.signed_area())
    }

    #[must_use]
    pub fn is_clockwise(&self) -> bool {
        self.orientation().is_clockwise()
    }

    /// Same outline walked in the opposite direction, starting at the same point.
    #[must_use]
    pub fn reversed_keep_start(&self) -> Self {
        let mut points = self.points.clone();
        if points.len() > 1 {
            points[1..].reverse();
        }
        Self { points }
    }

    /// Relabels the outline so that vertex `start` becomes vertex 0.
    #[must_use]
    pub fn rotated_start(&self, start: usize) -> Self {
        let mut points = self.points.clone();
        if !points.is_empty() {
            let k = start % points.len();
            points.rotate_left(k);
        }
        Self { points }
    }

    #[must_use]
    pub fn transformed(&self, transform: Transform2) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| transform.apply_point(*p))
                .collect(),
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.is_finite())
    }

    /// Iterates `(p[i], p[i+1])` pairs including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

impl From<Vec<Point2>> for Polygon {
    fn from(points: Vec<Point2>) -> Self {
        Self::new(points)
    }
}
