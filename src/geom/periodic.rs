//! Periodic parameter lookup and a periodic cubic spline `y(x)`.
//!
//! The abscissae are strictly increasing samples inside one period
//! `[lower, upper]`. Lookups wrap the query parameter into that period and
//! the segment that crosses the period boundary joins the last sample back
//! to the first one.

use std::f64::consts::TAU;

use thiserror::Error;

use super::joined::SegmentLocation;
use crate::numeric::{ConjugateGradient, DenseMatrix, SolveError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PeriodicError {
    #[error("periodic lookup needs at least one sample")]
    Empty,
    #[error("period bounds are invalid: lower {lower} must be below upper {upper}")]
    InvalidPeriod { lower: f64, upper: f64 },
    #[error("abscissae are not strictly increasing at index {index}")]
    NotIncreasing { index: usize },
    #[error("abscissa {value} at index {index} lies outside the period")]
    OutOfPeriod { index: usize, value: f64 },
    #[error("{x} abscissae but {y} ordinates")]
    LengthMismatch { x: usize, y: usize },
    #[error("angle sequence wraps around more than once")]
    MultipleWraps,
    #[error("angle sequence is not monotonic after unwrapping")]
    NotMonotonic,
    #[error("periodic spline solve failed: {0}")]
    Solve(#[from] SolveError),
}

#[must_use]
pub fn is_strictly_increasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] < w[1])
}

/// Unwraps an angle sequence that crosses the `±π` branch cut once.
///
/// Every value from the single decrease onward gets one full turn added.
/// Returns the index of the correction, or `None` when the sequence was
/// already increasing.
///
/// # Errors
/// [`PeriodicError::MultipleWraps`] for more than one decrease and
/// [`PeriodicError::NotMonotonic`] when the corrected sequence still is not
/// strictly increasing.
pub fn fix_cross_over(values: &mut [f64]) -> Result<Option<usize>, PeriodicError> {
    let mut decreases = values
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[1] < w[0])
        .map(|(i, _)| i + 1);

    let Some(index) = decreases.next() else {
        return if is_strictly_increasing(values) {
            Ok(None)
        } else {
            Err(PeriodicError::NotMonotonic)
        };
    };
    if decreases.next().is_some() {
        return Err(PeriodicError::MultipleWraps);
    }

    for value in &mut values[index..] {
        *value += TAU;
    }
    if is_strictly_increasing(values) {
        Ok(Some(index))
    } else {
        Err(PeriodicError::NotMonotonic)
    }
}

/// Maps a parameter to the bracketing pair of samples within one period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicSegments {
    x: Vec<f64>,
    lower: f64,
    upper: f64,
}

impl PeriodicSegments {
    /// # Errors
    /// Rejects empty input, an empty period, non-increasing abscissae and
    /// abscissae outside `[lower, upper]`.
    pub fn new(x: Vec<f64>, lower: f64, upper: f64) -> Result<Self, PeriodicError> {
        if x.is_empty() {
            return Err(PeriodicError::Empty);
        }
        if !(lower < upper) {
            return Err(PeriodicError::InvalidPeriod { lower, upper });
        }
        if let Some(index) = x.windows(2).position(|w| w[0] >= w[1]) {
            return Err(PeriodicError::NotIncreasing { index: index + 1 });
        }
        if let Some((index, value)) = x
            .iter()
            .enumerate()
            .find(|(_, v)| **v < lower || **v > upper)
        {
            return Err(PeriodicError::OutOfPeriod {
                index,
                value: *value,
            });
        }
        Ok(Self { x, lower, upper })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    #[must_use]
    pub fn period(&self) -> f64 {
        self.upper - self.lower
    }

    /// Finds the segment containing `xp`.
    ///
    /// The returned `segment` is the index of the right-hand sample; segment
    /// 0 is the wrap-around piece from the last sample to the first.
    #[must_use]
    pub fn locate(&self, xp: f64) -> SegmentLocation {
        let period = self.period();
        let mut xp = (xp - self.lower) % period;
        if xp < 0.0 {
            xp += period;
        }
        xp += self.lower;

        let n = self.x.len();
        let k = (1..n)
            .find(|&k| self.x[k - 1] <= xp && xp < self.x[k])
            .unwrap_or(0);

        let (t, dx) = if k == 0 {
            let tail = self.upper - self.x[n - 1];
            let t = if xp <= self.x[0] {
                (xp - self.lower) + tail
            } else {
                xp - self.x[n - 1]
            };
            (t, (self.x[0] - self.lower) + tail)
        } else {
            (xp - self.x[k - 1], self.x[k] - self.x[k - 1])
        };

        SegmentLocation {
            segment: k,
            fraction: if dx == 0.0 { 0.0 } else { t / dx },
        }
    }

    /// Index of the left-hand sample of `segment`.
    #[must_use]
    pub fn left_of(&self, segment: usize) -> usize {
        (segment + self.x.len() - 1) % self.x.len()
    }
}

/// Cubic in local coordinates: `a + t(b + t(c + t·d))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicPair {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl CubicPair {
    /// Cubic matching values `y1, y2` and derivatives `d1, d2` at `t = 0, 1`.
    #[must_use]
    pub fn new(y1: f64, y2: f64, d1: f64, d2: f64) -> Self {
        let dy = y2 - y1;
        Self {
            a: y1,
            b: d1,
            c: 3.0 * dy - 2.0 * d1 - d2,
            d: -2.0 * dy + d1 + d2,
        }
    }

    #[must_use]
    pub fn value(&self, t: f64) -> f64 {
        self.a + t * (self.b + t * (self.c + t * self.d))
    }
}

/// Periodic interpolating cubic spline with index-spaced derivatives.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicCubicSpline {
    segments: PeriodicSegments,
    y: Vec<f64>,
    derivatives: Vec<f64>,
    solver_iterations: usize,
}

impl PeriodicCubicSpline {
    /// Fits the spline through `(x[j], y[j])`, periodic over `[lower, upper]`.
    ///
    /// # Errors
    /// Propagates the lookup validation errors and solver breakdowns.
    pub fn fit(x: Vec<f64>, y: Vec<f64>, lower: f64, upper: f64) -> Result<Self, PeriodicError> {
        Self::fit_with(x, y, lower, upper, &ConjugateGradient::default())
    }

    /// # Errors
    /// See [`PeriodicCubicSpline::fit`].
    pub fn fit_with(
        x: Vec<f64>,
        y: Vec<f64>,
        lower: f64,
        upper: f64,
        solver: &ConjugateGradient,
    ) -> Result<Self, PeriodicError> {
        if x.len() != y.len() {
            return Err(PeriodicError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        let segments = PeriodicSegments::new(x, lower, upper)?;

        let n = y.len();
        let matrix = DenseMatrix::cyclic_tridiagonal(n, 1.0, 4.0, 1.0);
        let rhs: Vec<f64> = (0..n)
            .map(|j| 3.0 * (y[(j + 1) % n] - y[(j + n - 1) % n]))
            .collect();
        let solution = solver.solve(&matrix, &rhs)?;
        if !solution.converged {
            log::debug!(
                "periodic spline derivatives not converged, residual {:e}",
                solution.relative_residual
            );
        }

        Ok(Self {
            segments,
            y,
            derivatives: solution.x,
            solver_iterations: solution.iterations,
        })
    }

    #[must_use]
    pub fn solver_iterations(&self) -> usize {
        self.solver_iterations
    }

    #[must_use]
    pub fn derivatives(&self) -> &[f64] {
        &self.derivatives
    }

    #[must_use]
    pub fn evaluate(&self, xp: f64) -> f64 {
        let loc = self.segments.locate(xp);
        let k2 = loc.segment;
        let k1 = self.segments.left_of(k2);
        CubicPair::new(
            self.y[k1],
            self.y[k2],
            self.derivatives[k1],
            self.derivatives[k2],
        )
        .value(loc.fraction)
    }
}
