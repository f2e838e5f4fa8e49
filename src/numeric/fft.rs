//! Recursive radix-2 FFT over [`Complex64`] values.
//!
//! Only power-of-two lengths are supported. Passing any other length is a
//! programming error and panics; callers in this crate always size their
//! buffers from a resampling power.

use std::f64::consts::PI;

use num_complex::Complex64;

/// Returns `true` when `n` is a usable transform length (a power of two, at least 1).
#[must_use]
pub const fn is_transform_length(n: usize) -> bool {
    n.is_power_of_two()
}

/// Forward discrete Fourier transform, `X[k] = Σ x[j]·e^(−2πijk/N)`.
///
/// # Panics
/// Panics when `input.len()` is not a power of two.
#[must_use]
pub fn fft(input: &[Complex64]) -> Vec<Complex64> {
    assert!(
        is_transform_length(input.len()),
        "fft length {} is not a power of two",
        input.len()
    );
    transform(input)
}

/// Inverse transform, `conj(fft(conj(x))) / N`.
///
/// # Panics
/// Panics when `input.len()` is not a power of two.
#[must_use]
pub fn ifft(input: &[Complex64]) -> Vec<Complex64> {
    let conjugated: Vec<Complex64> = input.iter().map(Complex64::conj).collect();
    let n = input.len() as f64;
    fft(&conjugated)
        .into_iter()
        .map(|value| value.conj() / n)
        .collect()
}

/// Forward transform of a real sequence.
#[must_use]
pub fn fft_real(input: &[f64]) -> Vec<Complex64> {
    let complex: Vec<Complex64> = input.iter().map(|&re| Complex64::new(re, 0.0)).collect();
    fft(&complex)
}

fn transform(input: &[Complex64]) -> Vec<Complex64> {
    let n = input.len();
    if n == 1 {
        return vec![input[0]];
    }

    let half = n / 2;
    let even: Vec<Complex64> = input.iter().step_by(2).copied().collect();
    let odd: Vec<Complex64> = input.iter().skip(1).step_by(2).copied().collect();
    let even = transform(&even);
    let odd = transform(&odd);

    let mut output = vec![Complex64::new(0.0, 0.0); n];
    for k in 0..half {
        let angle = -2.0 * PI * k as f64 / n as f64;
        let twiddle = Complex64::new(angle.cos(), angle.sin()) * odd[k];
        output[k] = even[k] + twiddle;
        output[k + half] = even[k] - twiddle;
    }
    output
}
