//! Cubic-Hermite spline through digitized knots.
//!
//! Tangents come from a [`TangentStrategy`]; each pair of consecutive knots
//! becomes a [`HermiteSegment`] and a [`JoinedSegments`] table maps
//! normalized arc length back onto those segments.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::core::{Point2, Tolerance, Vec2};
use super::hermite::HermiteSegment;
use super::joined::{JoinedSegments, SegmentLocation};

/// Fewest knots a spline can be fitted through.
pub const MIN_KNOTS: usize = 3;

/// Most knots accepted for a single outline.
pub const MAX_KNOTS: usize = 1024;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SplineError {
    #[error("spline needs at least {MIN_KNOTS} knots, got {0}")]
    TooFewKnots(usize),
    #[error("spline accepts at most {MAX_KNOTS} knots, got {0}")]
    TooManyKnots(usize),
    #[error("knot {0} is not a finite point")]
    NonFiniteKnot(usize),
    #[error("spline has zero length")]
    ZeroLength,
}

/// How knot tangents are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TangentStrategy {
    /// Catmull-Rom style `½(P[i+1] − P[i−1])`.
    Chord,
    /// Tangent of the circle through the neighbouring knots, chord length.
    #[default]
    CirclePreserving,
}

impl TangentStrategy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Chord => "chord",
            Self::CirclePreserving => "circle-preserving",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "chord" | "catmull-rom" => Some(Self::Chord),
            "circle" | "circle-preserving" => Some(Self::CirclePreserving),
            _ => None,
        }
    }

    /// One tangent per knot.
    #[must_use]
    pub fn tangents(self, knots: &[Point2], closed: bool) -> Vec<Vec2> {
        (0..knots.len())
            .map(|j| match self {
                Self::Chord => chord_tangent(knots, j, closed),
                Self::CirclePreserving => circle_tangent(knots, j, closed),
            })
            .collect()
    }
}

/// Neighbour indices of knot `j`; open endpoints use themselves.
fn neighbours(n: usize, j: usize, closed: bool) -> (usize, usize) {
    if closed {
        ((j + n - 1) % n, (j + 1) % n)
    } else {
        (j.saturating_sub(1), (j + 1).min(n - 1))
    }
}

/// `½(P[j2] − P[j1])` with wrapped or clamped neighbours.
#[must_use]
pub fn chord_tangent(knots: &[Point2], j: usize, closed: bool) -> Vec2 {
    let n = knots.len();
    if n < 2 {
        return Vec2::ZERO;
    }
    let (j1, j2) = neighbours(n, j, closed);
    (knots[j2] - knots[j1]) * 0.5
}

/// Tangent of the circle through knots around `j`, falling back to the chord
/// tangent when no finite circle exists.
#[must_use]
pub fn circle_tangent(knots: &[Point2], j: usize, closed: bool) -> Vec2 {
    let n = knots.len();
    if n < MIN_KNOTS {
        return chord_tangent(knots, j, closed);
    }

    let middle = if closed {
        j
    } else {
        j.clamp(1, n - 2)
    };
    let (j1, j2) = neighbours(n, middle, true);
    let chord = (knots[j2] - knots[j1]) * 0.5;

    let Some(center) = circumcenter(knots[j1], knots[middle], knots[j2]) else {
        return chord_tangent(knots, j, closed);
    };

    let radial = knots[j] - center;
    let chord_len = chord.length();
    let radial_len = radial.length();
    if Tolerance::ZERO_LENGTH.is_zero_vec2(chord) || Tolerance::ZERO_LENGTH.is_zero_vec2(radial) {
        return chord_tangent(knots, j, closed);
    }

    let mut tangent = radial.perp_cw();
    if tangent.dot(chord) < 0.0 {
        tangent = -tangent;
    }
    let scaled = tangent * (chord_len / radial_len);
    if scaled.is_finite() {
        scaled
    } else {
        chord_tangent(knots, j, closed)
    }
}

/// Centre of the circle through three points, `None` when they are
/// collinear or coincident.
#[must_use]
pub fn circumcenter(a: Point2, b: Point2, c: Point2) -> Option<Point2> {
    let ab = b - a;
    let ac = c - a;
    let d = 2.0 * ab.cross(ac);
    if Tolerance::ZERO_LENGTH.approx_zero_f64(d) {
        return None;
    }
    let ab2 = ab.length_squared();
    let ac2 = ac.length_squared();
    let ux = (ac.y * ab2 - ab.y * ac2) / d;
    let uy = (ab.x * ac2 - ac.x * ab2) / d;
    let center = Point2::new(a.x + ux, a.y + uy);
    center.is_finite().then_some(center)
}

/// Fitted Hermite spline with its arc-length table.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineSpline {
    knots: Vec<Point2>,
    tangents: Vec<Vec2>,
    closed: bool,
    strategy: TangentStrategy,
    segments: Vec<HermiteSegment>,
    arc: JoinedSegments,
}

impl OutlineSpline {
    /// # Errors
    /// Fails for fewer than [`MIN_KNOTS`] or more than [`MAX_KNOTS`] knots,
    /// non-finite knots and curves of zero length.
    pub fn fit(
        knots: &[Point2],
        closed: bool,
        strategy: TangentStrategy,
    ) -> Result<Self, SplineError> {
        let n = knots.len();
        if n < MIN_KNOTS {
            return Err(SplineError::TooFewKnots(n));
        }
        if n > MAX_KNOTS {
            return Err(SplineError::TooManyKnots(n));
        }
        if let Some(index) = knots.iter().position(|p| !p.is_finite()) {
            return Err(SplineError::NonFiniteKnot(index));
        }

        let tangents = strategy.tangents(knots, closed);
        let segment_count = if closed { n } else { n - 1 };
        let segments: Vec<HermiteSegment> = (0..segment_count)
            .map(|k| {
                let k2 = (k + 1) % n;
                HermiteSegment::new(knots[k], knots[k2], tangents[k], tangents[k2])
            })
            .collect();
        let arc = JoinedSegments::new(segments.iter().map(HermiteSegment::length).collect());
        if arc.total_length() <= 0.0 {
            return Err(SplineError::ZeroLength);
        }

        log::debug!(
            "fitted {} spline through {n} knots ({} segments, length {:.4})",
            strategy.label(),
            segment_count,
            arc.total_length()
        );

        Ok(Self {
            knots: knots.to_vec(),
            tangents,
            closed,
            strategy,
            segments,
            arc,
        })
    }

    #[must_use]
    pub fn knots(&self) -> &[Point2] {
        &self.knots
    }

    #[must_use]
    pub fn tangents(&self) -> &[Vec2] {
        &self.tangents
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    #[must_use]
    pub const fn strategy(&self) -> TangentStrategy {
        self.strategy
    }

    #[must_use]
    pub fn segments(&self) -> &[HermiteSegment] {
        &self.segments
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.arc.total_length()
    }

    #[must_use]
    pub fn locate(&self, t: f64) -> Option<SegmentLocation> {
        self.arc.locate(t)
    }

    /// Point at normalized arc-length fraction `t ∈ [0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Option<Point2> {
        self.locate(t)
            .map(|loc| self.segments[loc.segment].point_at(loc.fraction))
    }

    /// Local parametric tangent at normalized arc-length fraction `t`.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Option<Vec2> {
        self.locate(t)
            .map(|loc| self.segments[loc.segment].tangent_at(loc.fraction))
    }

    /// `count` points at `t = j / count`, `j = 0..count`.
    #[must_use]
    pub fn sample_uniform(&self, count: usize) -> Vec<Point2> {
        (0..count)
            .filter_map(|j| self.point_at(j as f64 / count as f64))
            .collect()
    }
}
