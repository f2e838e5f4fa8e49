//! Fixed-resolution samplings of a fitted outline.

use super::error::{OutlineError, OutlineResult};
use super::settings::INTERPOLATION_POWER;
use crate::geom::{OutlineSpline, Point2, Polygon};

/// Points in the interpolated outline, `2^8`.
pub const INTERPOLATED_POINTS: usize = 1 << INTERPOLATION_POWER;

/// Polar samples carried by a radius-vs-angle resampling.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarSamples {
    pub centroid: Point2,
    pub angles: Vec<f64>,
    pub radii: Vec<f64>,
    /// Conjugate-gradient iterations of the radius spline fit.
    pub solver_iterations: usize,
}

/// `2^p`-point counter-clockwise outline used as descriptor input.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledOutline {
    outline: Polygon,
    polar: Option<PolarSamples>,
}

impl ResampledOutline {
    #[must_use]
    pub fn new(outline: Polygon, polar: Option<PolarSamples>) -> Self {
        Self { outline, polar }
    }

    #[must_use]
    pub fn outline(&self) -> &Polygon {
        &self.outline
    }

    #[must_use]
    pub fn polar(&self) -> Option<&PolarSamples> {
        self.polar.as_ref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outline.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }
}

/// Samples a closed spline at `t = j / 256`.
///
/// # Errors
/// [`OutlineError::OpenOutline`] for open splines.
pub fn interpolate_outline(spline: &OutlineSpline) -> OutlineResult<Polygon> {
    if !spline.is_closed() {
        return Err(OutlineError::OpenOutline);
    }
    Ok(Polygon::new(spline.sample_uniform(INTERPOLATED_POINTS)))
}

/// Takes every `2^(8−p)`-th interpolated point, walking backwards through a
/// clockwise outline so the result is counter-clockwise.
///
/// # Errors
/// The interpolated outline must have exactly [`INTERPOLATED_POINTS`] points
/// and `p` must not exceed [`INTERPOLATION_POWER`].
pub fn resample_by_arclength(interpolated: &Polygon, power: u32) -> OutlineResult<ResampledOutline> {
    if interpolated.len() != INTERPOLATED_POINTS || power > INTERPOLATION_POWER {
        return Err(OutlineError::NonSimple(format!(
            "cannot take 2^{power} samples from {} interpolated points",
            interpolated.len()
        )));
    }

    let count = 1usize << power;
    let stride = 1usize << (INTERPOLATION_POWER - power);
    let points = interpolated.points();
    let clockwise = interpolated.is_clockwise();

    let resampled: Vec<Point2> = (0..count)
        .map(|j| {
            let k = if clockwise && j > 0 { count - j } else { j };
            points[k * stride]
        })
        .collect();

    Ok(ResampledOutline::new(
        ensure_counter_clockwise(Polygon::new(resampled)),
        None,
    ))
}

/// Reverses a clockwise outline, keeping its first point.
#[must_use]
pub fn ensure_counter_clockwise(outline: Polygon) -> Polygon {
    if outline.is_clockwise() {
        log::debug!("resampled outline was clockwise, reversing");
        outline.reversed_keep_start()
    } else {
        outline
    }
}
