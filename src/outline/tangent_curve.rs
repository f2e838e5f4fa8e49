//! Closed curve reconstruction from tangent-vs-arclength coefficients.
//!
//! The truncated spectrum gives the tangent angle along a curve of
//! circumference `2π`. Integrating it rarely closes the curve, so the first
//! harmonic (which the descriptor drops) is re-solved with Newton updates of
//! its cosine and sine amplitudes until the end point returns to the start.

use std::f64::consts::{PI, TAU};

use num_complex::Complex64;

use super::descriptor::FourierDescriptor;
use super::error::{OutlineError, OutlineResult};
use super::tangent::{MAX_NEWTON_ITERATIONS, TANGENT_SAMPLES};
use crate::geom::{Point2, Polygon, Transform2};
use crate::numeric::fft;

/// Reconstructed curve before placement: `TANGENT_SAMPLES + 1` points with
/// zero mean and circumference `2π`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitCurve {
    pub points: Vec<Point2>,
    pub newton_iterations: usize,
}

/// Conjugate-symmetric spectrum with harmonics `2..=highest` (all stored
/// harmonics when `highest < 2`).
#[must_use]
pub fn truncated_spectrum(descriptor: &FourierDescriptor, highest: usize) -> Vec<Complex64> {
    let n = TANGENT_SAMPLES;
    let mut spectrum = vec![Complex64::new(0.0, 0.0); n];
    for (harmonic, coefficient) in descriptor.kept(highest) {
        if harmonic < 2 || harmonic >= n / 2 {
            continue;
        }
        spectrum[harmonic] = coefficient;
        spectrum[n - harmonic] = coefficient.conj();
    }
    spectrum
}

/// Integrates the truncated tangent angle into a closed curve.
///
/// # Errors
/// [`OutlineError::ZeroJacobian`] when the closure Jacobian vanishes and
/// [`OutlineError::NonConvergent`] after [`MAX_NEWTON_ITERATIONS`] updates.
pub fn reconstruct_unit_curve(
    descriptor: &FourierDescriptor,
    highest: usize,
) -> OutlineResult<UnitCurve> {
    let n = TANGENT_SAMPLES;
    let spectrum: Vec<Complex64> = truncated_spectrum(descriptor, highest)
        .iter()
        .map(Complex64::conj)
        .collect();
    let deviation: Vec<f64> = fft(&spectrum).iter().map(|c| c.re).collect();

    let da = TAU / n as f64;
    let mut a = vec![0.0; n + 1];
    let mut cadj = vec![0.0; n + 1];
    let mut sadj = vec![0.0; n + 1];
    for i in 0..n {
        let arg = da * i as f64;
        a[i] = deviation[i] + arg;
        cadj[i] = arg.cos();
        sadj[i] = arg.sin();
    }
    a[n] = a[0] + TAU;
    cadj[n] = cadj[0];
    sadj[n] = sadj[0];

    let i_unit = Complex64::new(0.0, 1.0);
    let mut z = vec![Complex64::new(0.0, 0.0); n + 1];
    let mut iterations = 0;
    loop {
        let mut dzdc = Complex64::new(0.0, 0.0);
        let mut dzds = Complex64::new(0.0, 0.0);
        for i in 1..=n {
            let im = i - 1;
            let expa = Complex64::from_polar(1.0, 0.5 * (a[im] + a[i]));
            let iexpa = i_unit * expa;
            let (sinc, dsinc) = if a[i] == a[im] {
                (1.0, 0.0)
            } else {
                let h = 0.5 * (a[i] - a[im]);
                let sinc = h.sin() / h;
                (sinc, (h.cos() - sinc) / h)
            };
            z[i] = z[im] + expa * (da * sinc);
            dzdc += (expa * ((cadj[i] - cadj[im]) * dsinc)
                + iexpa * ((cadj[im] + cadj[i]) * sinc))
                * (0.5 * da);
            dzds += (expa * ((sadj[i] - sadj[im]) * dsinc)
                + iexpa * ((sadj[im] + sadj[i]) * sinc))
                * (0.5 * da);
        }

        let end = z[n];
        if 1.0 + end.re * end.re + end.im * end.im == 1.0 {
            break;
        }
        if iterations == MAX_NEWTON_ITERATIONS {
            return Err(OutlineError::NonConvergent {
                stage: "tangent reconstruction",
                iterations,
            });
        }

        let jacobian = (dzdc.conj() * dzds).im;
        if jacobian == 0.0 {
            return Err(OutlineError::ZeroJacobian {
                stage: "tangent reconstruction",
            });
        }
        let mut dc = -(end.conj() * dzds).im / jacobian;
        let mut ds = -(dzdc.conj() * end).im / jacobian;
        let ddz = PI * (dc * dc + ds * ds) + 2.0 * (dc * ds).abs();
        let damping = (end.norm() / ddz).min(1.0);
        dc *= damping;
        ds *= damping;
        for i in 0..=n {
            a[i] += dc * cadj[i] + ds * sadj[i];
        }
        iterations += 1;
    }

    let mean = z[..n].iter().sum::<Complex64>() / n as f64;
    for value in &mut z[..n] {
        *value -= mean;
    }
    z[n] = z[0];

    Ok(UnitCurve {
        points: z.iter().map(|c| Point2::new(c.re, c.im)).collect(),
        newton_iterations: iterations,
    })
}

/// Scales a unit curve to the descriptor's outline length and moves it onto
/// `source`: same centroid, and when `align_start` is set the same polar
/// angle of the first point about that centroid.
///
/// # Errors
/// [`OutlineError::NonSimple`] when the descriptor carries no outline length
/// or the source outline is empty.
pub fn place_unit_curve(
    curve: &UnitCurve,
    descriptor: &FourierDescriptor,
    source: &Polygon,
    align_start: bool,
) -> OutlineResult<Polygon> {
    let length = descriptor.outline_length().ok_or_else(|| {
        OutlineError::NonSimple("descriptor carries no outline length".to_owned())
    })?;
    let (Some(source_centroid), Some(source_start)) = (source.centroid(), source.first()) else {
        return Err(OutlineError::NonSimple("source outline is empty".to_owned()));
    };

    let scaled =
        Polygon::new(curve.points.clone()).transformed(Transform2::uniform_scale(length / TAU));
    let centroid = ring_centroid(&scaled);
    let shift = source_centroid - centroid;
    let placed = scaled.transformed(Transform2::translate(shift));

    if !align_start {
        return Ok(placed);
    }
    let Some(start) = placed.first() else {
        return Ok(placed);
    };
    let angle = source_start.angle_about(source_centroid) - start.angle_about(source_centroid);
    Ok(placed.transformed(Transform2::rotate_about(source_centroid, angle)))
}

/// Full reconstruction: unit curve, scaled, centred and optionally aligned.
///
/// # Errors
/// See [`reconstruct_unit_curve`] and [`place_unit_curve`].
pub fn reconstruct_tangent(
    descriptor: &FourierDescriptor,
    highest: usize,
    source: &Polygon,
) -> OutlineResult<Polygon> {
    let curve = reconstruct_unit_curve(descriptor, highest)?;
    log::debug!(
        "tangent reconstruction closed after {} Newton iterations",
        curve.newton_iterations
    );
    place_unit_curve(&curve, descriptor, source, descriptor.normalization_index() == 0)
}

/// Centroid of a ring whose last point repeats the first.
fn ring_centroid(ring: &Polygon) -> Point2 {
    let points = ring.points();
    let open = match points.split_last() {
        Some((last, rest)) if rest.first() == Some(last) => rest,
        _ => points,
    };
    Polygon::new(open.to_vec())
        .centroid()
        .unwrap_or(Point2::ORIGIN)
}
