//! Measurement configuration with validated setters.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::geom::{Point2, TangentStrategy, Transform2};

/// Exponent of the fixed interpolated outline, `2^8 = 256` points.
pub const INTERPOLATION_POWER: u32 = 8;

/// Smallest accepted resampling power.
pub const MIN_RESAMPLING_POWER: u32 = 4;

/// Largest accepted resampling power; must stay below [`INTERPOLATION_POWER`].
pub const MAX_RESAMPLING_POWER: u32 = INTERPOLATION_POWER - 1;

pub const DEFAULT_RESAMPLING_POWER: u32 = 6;
pub const DEFAULT_HIGHEST_COEFFICIENT: usize = 10;

/// Harmonics produced by the tangent-vs-arclength method run to `TANGENT_SAMPLES / 2`.
pub const MAX_NORMALIZATION_INDEX: usize = super::tangent::TANGENT_SAMPLES / 2 - 1;

/// Fourier descriptor algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DescriptorMethod {
    #[default]
    None,
    RadiusVsAngle,
    TangentVsArclength,
}

impl DescriptorMethod {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::RadiusVsAngle => "radius-vs-angle",
            Self::TangentVsArclength => "tangent-vs-arclength",
        }
    }

    /// # Errors
    /// Unknown labels are rejected.
    pub fn parse(label: &str) -> Result<Self, ConfigError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "radius" | "radius-vs-angle" => Ok(Self::RadiusVsAngle),
            "tangent" | "tangent-vs-arclength" => Ok(Self::TangentVsArclength),
            other => Err(ConfigError::UnknownMethod(other.to_owned())),
        }
    }

    /// Harmonic index of the first stored coefficient.
    #[must_use]
    pub const fn first_harmonic(self) -> usize {
        match self {
            Self::TangentVsArclength => 2,
            Self::None | Self::RadiusVsAngle => 0,
        }
    }
}

/// Scalar configuration of one outline measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineSettings {
    resampling_power: u32,
    highest_coefficient: usize,
    normalization_index: usize,
    method: DescriptorMethod,
    strategy: TangentStrategy,
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            resampling_power: DEFAULT_RESAMPLING_POWER,
            highest_coefficient: DEFAULT_HIGHEST_COEFFICIENT,
            normalization_index: 0,
            method: DescriptorMethod::None,
            strategy: TangentStrategy::CirclePreserving,
        }
    }
}

impl OutlineSettings {
    /// Validated settings from raw values.
    ///
    /// # Errors
    /// The first value outside its range, checked in the order of the arguments.
    pub fn new(
        resampling_power: u32,
        highest_coefficient: usize,
        normalization_index: usize,
        method: DescriptorMethod,
        strategy: TangentStrategy,
    ) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        settings.set_resampling_power(resampling_power)?;
        settings.set_highest_coefficient(highest_coefficient)?;
        settings.set_normalization_index(normalization_index)?;
        settings.method = method;
        settings.strategy = strategy;
        Ok(settings)
    }

    #[must_use]
    pub const fn resampling_power(&self) -> u32 {
        self.resampling_power
    }

    /// Number of resampled points, `2^p`.
    #[must_use]
    pub const fn resample_count(&self) -> usize {
        1 << self.resampling_power
    }

    #[must_use]
    pub const fn highest_coefficient(&self) -> usize {
        self.highest_coefficient
    }

    #[must_use]
    pub const fn normalization_index(&self) -> usize {
        self.normalization_index
    }

    #[must_use]
    pub const fn method(&self) -> DescriptorMethod {
        self.method
    }

    #[must_use]
    pub const fn strategy(&self) -> TangentStrategy {
        self.strategy
    }

    /// Largest accepted highest coefficient for power `p`, `2^(p−1)`.
    #[must_use]
    pub const fn max_highest_coefficient(power: u32) -> usize {
        1 << (power - 1)
    }

    /// Sets the resampling power and clamps the highest coefficient to
    /// `2^(p−1)`. Returns `true` when the highest coefficient was lowered.
    ///
    /// # Errors
    /// Powers outside `[4, 7]`.
    pub fn set_resampling_power(&mut self, power: u32) -> Result<bool, ConfigError> {
        if !(MIN_RESAMPLING_POWER..=MAX_RESAMPLING_POWER).contains(&power) {
            return Err(ConfigError::ResamplingPower {
                value: power,
                min: MIN_RESAMPLING_POWER,
                max: MAX_RESAMPLING_POWER,
            });
        }
        self.resampling_power = power;
        let max = Self::max_highest_coefficient(power);
        if self.highest_coefficient > max {
            self.highest_coefficient = max;
            return Ok(true);
        }
        Ok(false)
    }

    /// # Errors
    /// Values above `2^(p−1)`.
    pub fn set_highest_coefficient(&mut self, value: usize) -> Result<(), ConfigError> {
        let max = Self::max_highest_coefficient(self.resampling_power);
        if value > max {
            return Err(ConfigError::HighestCoefficient {
                value,
                max,
                power: self.resampling_power,
            });
        }
        self.highest_coefficient = value;
        Ok(())
    }

    /// # Errors
    /// Values above [`MAX_NORMALIZATION_INDEX`].
    pub fn set_normalization_index(&mut self, value: usize) -> Result<(), ConfigError> {
        if value > MAX_NORMALIZATION_INDEX {
            return Err(ConfigError::NormalizationIndex {
                value,
                max: MAX_NORMALIZATION_INDEX,
            });
        }
        self.normalization_index = value;
        Ok(())
    }

    pub fn set_method(&mut self, method: DescriptorMethod) {
        self.method = method;
    }

    pub fn set_strategy(&mut self, strategy: TangentStrategy) {
        self.strategy = strategy;
    }
}

/// Pixel-to-sample calibration applied to reported figures.
///
/// Area and length only need the factor. Centroids additionally need the
/// sample origin: `sample = factor · (pixel − origin)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Calibration {
    factor: Option<f64>,
    origin: Option<Point2>,
}

impl Calibration {
    /// Identity calibration, figures reported in pixels.
    #[must_use]
    pub const fn pixels() -> Self {
        Self {
            factor: Some(1.0),
            origin: Some(Point2::new(0.0, 0.0)),
        }
    }

    /// Uniform `units / pixel` factor without an origin.
    ///
    /// # Errors
    /// Non-positive or non-finite factors.
    pub fn with_factor(factor: f64) -> Result<Self, ConfigError> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(ConfigError::CalibrationFactor);
        }
        Ok(Self {
            factor: Some(factor),
            origin: None,
        })
    }

    /// Sets the sample origin, in pixel coordinates.
    ///
    /// # Errors
    /// Non-finite coordinates.
    pub fn with_origin(mut self, origin: Point2) -> Result<Self, ConfigError> {
        if !origin.is_finite() {
            return Err(ConfigError::CalibrationOrigin);
        }
        self.origin = Some(origin);
        Ok(self)
    }

    #[must_use]
    pub const fn without_origin(mut self) -> Self {
        self.origin = None;
        self
    }

    #[must_use]
    pub const fn factor(&self) -> Option<f64> {
        self.factor
    }

    #[must_use]
    pub const fn origin(&self) -> Option<Point2> {
        self.origin
    }

    /// Map from pixel to sample coordinates; needs both factor and origin.
    #[must_use]
    pub fn transform(&self) -> Option<Transform2> {
        let (factor, origin) = (self.factor?, self.origin?);
        Some(Transform2::uniform_scale(factor).compose(Transform2::translate(-origin.to_vec2())))
    }

    #[must_use]
    pub fn area(&self, pixel_area: f64) -> Option<f64> {
        self.factor.map(|f| pixel_area * f * f)
    }

    #[must_use]
    pub fn length(&self, pixel_length: f64) -> Option<f64> {
        self.factor.map(|f| pixel_length * f)
    }

    #[must_use]
    pub fn point(&self, pixel: Point2) -> Option<Point2> {
        self.transform().map(|t| t.apply_point(pixel))
    }
}
