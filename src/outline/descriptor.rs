use num_complex::Complex64;

use super::settings::DescriptorMethod;

/// Complex Fourier shape descriptor.
///
/// `coefficients[j]` belongs to harmonic `first_harmonic + j`.
#[derive(Debug, Clone, PartialEq)]
pub struct FourierDescriptor {
    method: DescriptorMethod,
    coefficients: Vec<Complex64>,
    first_harmonic: usize,
    normalization_index: usize,
    outline_length: Option<f64>,
    warning: Option<String>,
}

impl FourierDescriptor {
    /// Radius-vs-angle spectrum, harmonics `0..N`.
    #[must_use]
    pub fn radius_vs_angle(coefficients: Vec<Complex64>) -> Self {
        Self {
            method: DescriptorMethod::RadiusVsAngle,
            coefficients,
            first_harmonic: 0,
            normalization_index: 0,
            outline_length: None,
            warning: None,
        }
    }

    /// Tangent-vs-arclength spectrum starting at harmonic 2.
    #[must_use]
    pub fn tangent_vs_arclength(
        coefficients: Vec<Complex64>,
        normalization_index: usize,
        outline_length: f64,
        warning: Option<String>,
    ) -> Self {
        Self {
            method: DescriptorMethod::TangentVsArclength,
            coefficients,
            first_harmonic: DescriptorMethod::TangentVsArclength.first_harmonic(),
            normalization_index,
            outline_length: Some(outline_length),
            warning,
        }
    }

    #[must_use]
    pub const fn method(&self) -> DescriptorMethod {
        self.method
    }

    #[must_use]
    pub fn coefficients(&self) -> &[Complex64] {
        &self.coefficients
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    #[must_use]
    pub const fn first_harmonic(&self) -> usize {
        self.first_harmonic
    }

    #[must_use]
    pub const fn normalization_index(&self) -> usize {
        self.normalization_index
    }

    /// True arc length of the analysed outline (tangent method only).
    #[must_use]
    pub const fn outline_length(&self) -> Option<f64> {
        self.outline_length
    }

    #[must_use]
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// Coefficient of `harmonic`, if stored.
    #[must_use]
    pub fn harmonic(&self, harmonic: usize) -> Option<Complex64> {
        harmonic
            .checked_sub(self.first_harmonic)
            .and_then(|j| self.coefficients.get(j).copied())
    }

    #[must_use]
    pub fn amplitude(&self, harmonic: usize) -> Option<f64> {
        self.harmonic(harmonic).map(|c| c.norm())
    }

    /// `(harmonic, coefficient)` pairs kept by a reconstruction of order `highest`.
    ///
    /// Radius method: harmonics `0..=highest`. Tangent method: harmonics
    /// `2..=highest`, or all of them when `highest < 2`.
    #[must_use]
    pub fn kept(&self, highest: usize) -> Vec<(usize, Complex64)> {
        let last = match self.method {
            DescriptorMethod::TangentVsArclength if highest < self.first_harmonic => usize::MAX,
            _ => highest,
        };
        self.coefficients
            .iter()
            .enumerate()
            .map(|(j, c)| (j + self.first_harmonic, *c))
            .take_while(|(h, _)| *h <= last)
            .collect()
    }

    /// Amplitudes of the kept harmonics normalized by harmonic 2.
    ///
    /// The radius method reports `2|c_j| / 2|c_2|`, the tangent method
    /// `|c_h| / |c_2|`. A zero reference leaves the amplitudes unscaled.
    #[must_use]
    pub fn normalized_amplitudes(&self, highest: usize) -> Vec<(usize, f64)> {
        let scale = match self.method {
            DescriptorMethod::RadiusVsAngle => 2.0,
            DescriptorMethod::None | DescriptorMethod::TangentVsArclength => 1.0,
        };
        let reference = self.amplitude(2).map_or(0.0, |a| scale * a);
        let divisor = if reference > 0.0 { reference } else { 1.0 };
        self.kept(highest)
            .into_iter()
            .map(|(h, c)| (h, scale * c.norm() / divisor))
            .collect()
    }
}
