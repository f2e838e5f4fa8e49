use thiserror::Error;

use crate::geom::{PeriodicError, SplineError};
use crate::numeric::SolveError;

/// Rejected configuration values. The stored setting is left unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("resampling power {value} is outside [{min}, {max}]")]
    ResamplingPower { value: u32, min: u32, max: u32 },
    #[error("highest coefficient {value} exceeds {max} for resampling power {power}")]
    HighestCoefficient { value: usize, max: usize, power: u32 },
    #[error("normalization index {value} exceeds {max}")]
    NormalizationIndex { value: usize, max: usize },
    #[error("unknown descriptor method `{0}`")]
    UnknownMethod(String),
    #[error("unknown spline strategy `{0}`")]
    UnknownStrategy(String),
    #[error("calibration factor must be a positive finite number")]
    CalibrationFactor,
    #[error("calibration origin must have finite coordinates")]
    CalibrationOrigin,
}

/// Failures of the measurement pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OutlineError {
    #[error("not measured: {0}")]
    NotMeasured(#[from] SplineError),
    #[error("outline is open")]
    OpenOutline,
    #[error("no descriptor method selected")]
    NoMethod,
    #[error("outline is not simple: {0}")]
    NonSimple(String),
    #[error("angle-vs-theta not possible: {0}")]
    RadiusAngle(#[from] PeriodicError),
    #[error("linear solve failed: {0}")]
    Solve(#[from] SolveError),
    #[error("{stage} did not converge within {iterations} iterations")]
    NonConvergent { stage: &'static str, iterations: usize },
    #[error("closure Jacobian is zero in {stage}")]
    ZeroJacobian { stage: &'static str },
}

impl OutlineError {
    /// `true` for the "too few knots" family surfaced as "not measured".
    #[must_use]
    pub const fn is_not_measured(&self) -> bool {
        matches!(self, Self::NotMeasured(_) | Self::OpenOutline)
    }
}

pub type OutlineResult<T> = Result<T, OutlineError>;
