//! Tangent-vs-arclength Fourier descriptors.
//!
//! The tangent angle of a closed polygon is modelled per edge as a smooth
//! function of arc length. Each edge gets a local slope correction solved
//! with Newton's method on a five-point Gauss-Lobatto residual; the edge
//! lengths are then rescaled so the fitted curve has consistent arc length.
//! The fitted angle is sampled at [`TANGENT_SAMPLES`] equal arc-length
//! steps, detrended by the `2π·s/L` ramp and transformed.

use std::f64::consts::{FRAC_PI_2, TAU};

use num_complex::Complex64;

use super::descriptor::FourierDescriptor;
use super::error::{OutlineError, OutlineResult};
use crate::geom::{Point2, Polygon, Tolerance};
use crate::numeric::fft;

/// Internal sampling resolution, independent of the resampling power.
pub const TANGENT_SAMPLES: usize = 1024;

/// Coefficients kept are harmonics `FIRST_HARMONIC..TANGENT_SAMPLES / 2`.
pub const FIRST_HARMONIC: usize = 2;

/// Newton iteration cap per edge.
pub const MAX_NEWTON_ITERATIONS: usize = 100;

pub const ZERO_COEFFICIENT_WARNING: &str =
    "have kept initial starting point because coefficient to be used is zero";

/// Gauss-Lobatto abscissae on `[0, 1]`.
const POSITIONS: [f64; 5] = [
    0.0,
    0.5 * (1.0 - 0.654_653_670_707_977_1),
    0.5,
    0.5 * (1.0 + 0.654_653_670_707_977_1),
    1.0,
];

/// Gauss-Lobatto weights on `[0, 1]`.
const WEIGHTS: [f64; 5] = [
    1.0 / 20.0,
    49.0 / 180.0,
    16.0 / 45.0,
    49.0 / 180.0,
    1.0 / 20.0,
];

/// Fitted tangent-angle function of a closed polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct TangentFit {
    /// Tangent angle at `TANGENT_SAMPLES` equal arc-length steps.
    pub angles: Vec<f64>,
    /// Arc length of the fitted curve.
    pub length: f64,
    /// Newton iterations summed over all edges.
    pub newton_iterations: usize,
}

/// Per-edge quadrature of the fitted angle deviation.
struct EdgeQuadrature {
    sin_sum: f64,
    cos_sum: f64,
    derivative: f64,
    last_deviation: f64,
}

fn quadrature(da0: f64, da1: f64, dd: f64, extent: f64) -> EdgeQuadrature {
    let mut q = EdgeQuadrature {
        sin_sum: 0.0,
        cos_sum: 0.0,
        derivative: 0.0,
        last_deviation: 0.0,
    };
    for (position, weight) in POSITIONS.iter().zip(WEIGHTS) {
        let t1 = extent * position;
        let t0 = 1.0 - t1;
        let hprod = 0.5 * t1 * t0;
        let da = da0 * t0 + da1 * t1 - dd * hprod;
        let (s, c) = da.sin_cos();
        q.sin_sum += weight * s;
        q.cos_sum += weight * c;
        q.derivative -= weight * hprod * c;
        q.last_deviation = da;
    }
    q
}

/// Fits the tangent-angle function of a closed polygon.
///
/// # Errors
/// [`OutlineError::NonSimple`] for fewer than three points, zero-length
/// edges or a net turning other than one full turn;
/// [`OutlineError::NonConvergent`] / [`OutlineError::ZeroJacobian`] when an
/// edge solve breaks down.
pub fn fit_tangent_angle(outline: &Polygon) -> OutlineResult<TangentFit> {
    let m = outline.len();
    if m < Polygon::MIN_POINTS {
        return Err(OutlineError::NonSimple(format!(
            "tangent fit needs at least {} points, got {m}",
            Polygon::MIN_POINTS
        )));
    }

    let mut x: Vec<Point2> = outline.points().to_vec();
    x.push(x[0]);

    let mut ds = vec![0.0; m + 1];
    let mut amean = vec![0.0; m + 1];
    let mut aval = vec![0.0; m + 1];

    let closing = x[0] - x[m - 1];
    ds[0] = closing.length();
    let mut zm = unit_direction(closing.x, closing.y, ds[0], m - 1)?;
    amean[0] = closing.angle();

    for ip in 1..=m {
        let i = ip - 1;
        let edge = x[ip] - x[i];
        ds[ip] = edge.length();
        let zp = unit_direction(edge.x, edge.y, ds[ip], i)?;
        let turn = zp / zm;
        let da = turn.im.atan2(turn.re);
        amean[ip] = amean[i] + da;

        let weighted = (0.5 * da).tan() * (ds[i] - ds[ip]) / (ds[i] + ds[ip]);
        let estimate = amean[i] + 0.5 * da + weighted.atan();
        let lower = amean[i].max(amean[ip]) - FRAC_PI_2;
        let upper = amean[i].min(amean[ip]) + FRAC_PI_2;
        aval[i] = estimate.max(lower).min(upper);
        zm = zp;
    }
    aval[m] = aval[0] + (amean[m] - amean[0]);

    let mut sval = vec![0.0; m + 1];
    let mut dda = vec![0.0; m + 1];
    let mut newton_iterations = 0;
    for ip in 1..=m {
        let i = ip - 1;
        let da0 = aval[i] - amean[ip];
        let da1 = aval[ip] - amean[ip];
        let mut dd = 6.0 * (da0 + da1);

        let mut iterations = 0;
        let q = loop {
            let q = quadrature(da0, da1, dd, 1.0);
            if 1.0 + q.sin_sum * q.sin_sum == 1.0 {
                break q;
            }
            if iterations == MAX_NEWTON_ITERATIONS {
                return Err(OutlineError::NonConvergent {
                    stage: "tangent fit",
                    iterations,
                });
            }
            if q.derivative == 0.0 {
                return Err(OutlineError::ZeroJacobian {
                    stage: "tangent fit",
                });
            }
            let damping = (124.0 * q.derivative * q.derivative / q.sin_sum.abs()).min(1.0);
            dd -= (q.sin_sum / q.derivative) * damping;
            iterations += 1;
        };
        newton_iterations += iterations;

        dda[i] = dd;
        ds[ip] /= q.cos_sum;
        sval[ip] = sval[i] + ds[ip];
    }

    let length = sval[m];
    let step = length / TANGENT_SAMPLES as f64;
    let mut angles = vec![0.0; TANGENT_SAMPLES];
    let (mut i0, mut i1) = (0usize, 1usize);
    for (k, angle) in angles.iter_mut().enumerate() {
        let s = step * k as f64;
        while i1 < m && s >= sval[i1] {
            i0 = i1;
            i1 += 1;
        }
        let t = (s - sval[i0]) / ds[i1];
        let da0 = aval[i0] - amean[i1];
        let da1 = aval[i1] - amean[i1];
        let q = quadrature(da0, da1, dda[i0], t);
        *angle = amean[i1] + q.last_deviation;
    }

    let turns = ((aval[m] - aval[0]) / TAU).round();
    if turns == -1.0 {
        for angle in &mut angles {
            *angle = -*angle;
        }
    } else if turns != 1.0 {
        return Err(OutlineError::NonSimple(format!(
            "net turning is {turns} turns, expected one"
        )));
    }

    Ok(TangentFit {
        angles,
        length,
        newton_iterations,
    })
}

/// Detrended spectrum of a fitted tangent-angle function, `FFT / N`.
#[must_use]
pub fn tangent_spectrum(fit: &TangentFit) -> Vec<Complex64> {
    let n = fit.angles.len();
    let residual: Vec<Complex64> = fit
        .angles
        .iter()
        .enumerate()
        .map(|(k, a)| Complex64::new(a - TAU * k as f64 / n as f64, 0.0))
        .collect();
    fft(&residual)
        .into_iter()
        .map(|c| c / n as f64)
        .collect()
}

/// Unit rotation making harmonic `index` equal to `−i·|c|`.
///
/// The rotated coefficient is `spectrum[index]` itself, never its successor,
/// so `index` means the same harmonic here as in the reported descriptor.
/// Returns the identity rotation and a warning when that coefficient is zero.
#[must_use]
pub fn normalization_rotation(spectrum: &[Complex64], index: usize) -> (Complex64, Option<String>) {
    let identity = Complex64::new(1.0, 0.0);
    if index == 0 {
        return (identity, None);
    }
    let Some(coefficient) = spectrum.get(index).copied() else {
        return (identity, None);
    };
    let amplitude = coefficient.norm();
    if amplitude == 0.0 {
        log::warn!("{ZERO_COEFFICIENT_WARNING} (harmonic {index})");
        return (identity, Some(ZERO_COEFFICIENT_WARNING.to_owned()));
    }

    let target = Complex64::new(0.0, -amplitude) / coefficient;
    let root = target.arg() / index as f64;
    (Complex64::from_polar(1.0, root), None)
}

/// Tangent-vs-arclength descriptor of a counter-clockwise outline.
///
/// # Errors
/// See [`fit_tangent_angle`].
pub fn tangent_descriptor(
    outline: &Polygon,
    normalization_index: usize,
) -> OutlineResult<FourierDescriptor> {
    let fit = fit_tangent_angle(outline)?;
    log::debug!(
        "tangent fit: length {:.4}, {} Newton iterations",
        fit.length,
        fit.newton_iterations
    );

    let spectrum = tangent_spectrum(&fit);
    let (rotation, warning) = normalization_rotation(&spectrum, normalization_index);
    let rotation_arg = rotation.arg();

    let coefficients = (FIRST_HARMONIC..TANGENT_SAMPLES / 2)
        .map(|h| spectrum[h] * Complex64::from_polar(1.0, rotation_arg * h as f64))
        .collect();

    Ok(FourierDescriptor::tangent_vs_arclength(
        coefficients,
        normalization_index,
        fit.length,
        warning,
    ))
}

fn unit_direction(dx: f64, dy: f64, length: f64, edge: usize) -> OutlineResult<Complex64> {
    if Tolerance::ZERO_LENGTH.approx_zero_f64(length) {
        return Err(OutlineError::NonSimple(format!(
            "edge {edge} has zero length"
        )));
    }
    Ok(Complex64::new(dx / length, dy / length))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lobatto_weights_sum_to_one() {
        let sum: f64 = WEIGHTS.iter().sum();
        assert!((sum - 1.0).abs() < 1e-15);
        assert!((POSITIONS[1] - 0.5 * (1.0 - (3.0f64 / 7.0).sqrt())).abs() < 1e-15);
    }

    #[test]
    fn quadrature_of_zero_deviation_is_trivial() {
        let q = quadrature(0.0, 0.0, 0.0, 1.0);
        assert_eq!(q.sin_sum, 0.0);
        assert!((q.cos_sum - 1.0).abs() < 1e-15);
    }

    #[test]
    fn zero_index_keeps_identity_rotation() {
        let spectrum = vec![Complex64::new(1.0, 1.0); 8];
        let (rotation, warning) = normalization_rotation(&spectrum, 0);
        assert_eq!(rotation, Complex64::new(1.0, 0.0));
        assert!(warning.is_none());
    }

    #[test]
    fn rotation_aligns_chosen_harmonic() {
        let mut spectrum = vec![Complex64::new(0.0, 0.0); 8];
        spectrum[3] = Complex64::new(0.3, 0.4);
        let (rotation, warning) = normalization_rotation(&spectrum, 3);
        assert!(warning.is_none());
        let aligned = spectrum[3] * rotation.powi(3);
        assert!(aligned.re.abs() < 1e-12);
        assert!((aligned.im + 0.5).abs() < 1e-12);
    }

    #[test]
    fn rotation_uses_index_not_next_harmonic() {
        let mut spectrum = vec![Complex64::new(0.0, 0.0); 8];
        spectrum[3] = Complex64::new(0.3, 0.4);
        spectrum[4] = Complex64::new(1.0, 0.0);

        let (rotation, _) = normalization_rotation(&spectrum, 3);
        let third = spectrum[3] * rotation.powi(3);
        let fourth = spectrum[4] * rotation.powi(4);
        assert!(third.re.abs() < 1e-12 && third.im < 0.0);
        assert!(fourth.re.abs() > 0.5);

        let (rotation, _) = normalization_rotation(&spectrum, 4);
        let fourth = spectrum[4] * rotation.powi(4);
        assert!(fourth.re.abs() < 1e-12);
        assert!((fourth.im + 1.0).abs() < 1e-12);
    }

    #[test]
    fn index_beyond_spectrum_keeps_identity() {
        let spectrum = vec![Complex64::new(1.0, 1.0); 8];
        let (rotation, warning) = normalization_rotation(&spectrum, 8);
        assert_eq!(rotation, Complex64::new(1.0, 0.0));
        assert!(warning.is_none());
    }

    #[test]
    fn negligible_edge_has_no_direction() {
        assert!(unit_direction(1e-13, 0.0, 1e-13, 4).is_err());
        assert!(unit_direction(0.0, f64::NAN, f64::NAN, 4).is_err());
        let d = unit_direction(3.0, 4.0, 5.0, 0).unwrap();
        assert!((d - Complex64::new(0.6, 0.8)).norm() < 1e-15);
    }

    #[test]
    fn zero_coefficient_warns_and_keeps_identity() {
        let spectrum = vec![Complex64::new(0.0, 0.0); 8];
        let (rotation, warning) = normalization_rotation(&spectrum, 2);
        assert_eq!(rotation, Complex64::new(1.0, 0.0));
        assert_eq!(warning.as_deref(), Some(ZERO_COEFFICIENT_WARNING));
    }
}
