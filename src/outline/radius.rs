//! Radius-vs-angle Fourier descriptors.
//!
//! The interpolated outline is expressed in polar form about its centroid,
//! unwrapped into a monotonic angle sequence and fitted with a periodic
//! cubic spline. Sampling that spline at `2^p` equal angles gives the radius
//! signal whose FFT is the descriptor.

use std::f64::consts::TAU;

use num_complex::Complex64;

use super::descriptor::FourierDescriptor;
use super::error::{OutlineError, OutlineResult};
use super::resample::{PolarSamples, ResampledOutline, ensure_counter_clockwise};
use crate::geom::{PeriodicCubicSpline, Point2, Polygon, Vec2, fix_cross_over};
use crate::numeric::{fft_real, ifft};

/// Resamples `interpolated` at `2^power` equally spaced angles.
///
/// # Errors
/// [`OutlineError::RadiusAngle`] when the angle sequence wraps more than
/// once, stays non-monotonic, or the periodic spline cannot be solved.
pub fn resample_radius_vs_angle(
    interpolated: &Polygon,
    power: u32,
) -> OutlineResult<ResampledOutline> {
    let centroid = interpolated
        .centroid()
        .ok_or_else(|| OutlineError::NonSimple("outline has no points".to_owned()))?;

    let mut angles = Vec::with_capacity(interpolated.len());
    let mut radii = Vec::with_capacity(interpolated.len());
    for p in interpolated.points() {
        let offset = *p - centroid;
        angles.push(offset.angle());
        radii.push(offset.length());
    }
    if interpolated.is_clockwise() {
        angles.reverse();
        radii.reverse();
    }

    fix_cross_over(&mut angles)?;
    let start = angles[0];
    let spline = PeriodicCubicSpline::fit(angles, radii, start, start + TAU)?;
    let solver_iterations = spline.solver_iterations();
    log::debug!("radius spline derivatives solved in {solver_iterations} iterations");

    let count = 1usize << power;
    let step = TAU / count as f64;
    let mut sample_angles = Vec::with_capacity(count);
    let mut sample_radii = Vec::with_capacity(count);
    let mut points = Vec::with_capacity(count);
    for j in 0..count {
        let angle = start + j as f64 * step;
        let radius = spline.evaluate(angle);
        sample_angles.push(angle);
        sample_radii.push(radius);
        points.push(polar_point(centroid, angle, radius));
    }

    let outline = Polygon::new(points);
    if outline.is_clockwise() {
        return Ok(ResampledOutline::new(
            ensure_counter_clockwise(outline),
            Some(reversed_polar(
                centroid,
                sample_angles,
                sample_radii,
                solver_iterations,
            )),
        ));
    }

    Ok(ResampledOutline::new(
        outline,
        Some(PolarSamples {
            centroid,
            angles: sample_angles,
            radii: sample_radii,
            solver_iterations,
        }),
    ))
}

/// FFT of the resampled radii.
///
/// # Errors
/// [`OutlineError::NonSimple`] when the resampling carries no polar samples.
pub fn radius_descriptor(resampled: &ResampledOutline) -> OutlineResult<FourierDescriptor> {
    let polar = polar_of(resampled)?;
    Ok(FourierDescriptor::radius_vs_angle(fft_real(&polar.radii)))
}

/// Inverse transform keeping harmonics `0..=highest` and their mirrors.
///
/// # Errors
/// [`OutlineError::NonSimple`] when the resampling carries no polar samples
/// or does not match the descriptor length.
pub fn reconstruct_radius(
    descriptor: &FourierDescriptor,
    resampled: &ResampledOutline,
    highest: usize,
) -> OutlineResult<Polygon> {
    let polar = polar_of(resampled)?;
    let n = descriptor.len();
    if n != polar.angles.len() {
        return Err(OutlineError::NonSimple(format!(
            "descriptor has {n} coefficients for {} samples",
            polar.angles.len()
        )));
    }

    let mut spectrum: Vec<Complex64> = descriptor.coefficients().to_vec();
    for j in (highest + 1)..=(n / 2) {
        spectrum[j] = Complex64::new(0.0, 0.0);
        spectrum[n - j] = Complex64::new(0.0, 0.0);
    }
    let radii = ifft(&spectrum);

    Ok(Polygon::new(
        polar
            .angles
            .iter()
            .zip(&radii)
            .map(|(angle, radius)| polar_point(polar.centroid, *angle, radius.re))
            .collect(),
    ))
}

fn polar_of(resampled: &ResampledOutline) -> OutlineResult<&PolarSamples> {
    resampled.polar().ok_or_else(|| {
        OutlineError::NonSimple("resampled outline carries no radius samples".to_owned())
    })
}

fn polar_point(centroid: Point2, angle: f64, radius: f64) -> Point2 {
    let (s, c) = angle.sin_cos();
    centroid + Vec2::new(radius * c, radius * s)
}

fn reversed_polar(
    centroid: Point2,
    mut angles: Vec<f64>,
    mut radii: Vec<f64>,
    solver_iterations: usize,
) -> PolarSamples {
    if angles.len() > 1 {
        angles[1..].reverse();
        radii[1..].reverse();
    }
    PolarSamples {
        centroid,
        angles,
        radii,
        solver_iterations,
    }
}
