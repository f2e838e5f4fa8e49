mod cache;
mod descriptor;
mod diagnostics;
mod error;
mod measurement;
mod radius;
mod report;
mod resample;
mod settings;
mod tangent;
mod tangent_curve;

pub use cache::{CacheSlot, Input, InvalidationClock, OutlineCacheStats, Stage};
pub use descriptor::FourierDescriptor;
pub use diagnostics::AnalysisDiagnostics;
pub use error::{ConfigError, OutlineError, OutlineResult};
pub use measurement::OutlineMeasurement;
pub use radius::{radius_descriptor, reconstruct_radius, resample_radius_vs_angle};
pub use report::{
    MeasurementFigures, MeasurementSummary, NOT_CALIBRATED, NOT_MEASURED, OutlineSet, csv_header,
    csv_row, reported_harmonics,
};
pub use resample::{
    INTERPOLATED_POINTS, PolarSamples, ResampledOutline, ensure_counter_clockwise,
    interpolate_outline, resample_by_arclength,
};
pub use settings::{
    Calibration, DEFAULT_HIGHEST_COEFFICIENT, DEFAULT_RESAMPLING_POWER, DescriptorMethod,
    INTERPOLATION_POWER, MAX_NORMALIZATION_INDEX, MAX_RESAMPLING_POWER, MIN_RESAMPLING_POWER,
    OutlineSettings,
};
pub use tangent::{
    FIRST_HARMONIC, MAX_NEWTON_ITERATIONS, TANGENT_SAMPLES, TangentFit, ZERO_COEFFICIENT_WARNING,
    fit_tangent_angle, normalization_rotation, tangent_descriptor, tangent_spectrum,
};
pub use tangent_curve::{
    UnitCurve, place_unit_curve, reconstruct_tangent, reconstruct_unit_curve, truncated_spectrum,
};

#[cfg(test)]
mod tests;
