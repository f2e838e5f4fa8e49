//! Text and CSV renderings of a measurement.
//!
//! The display bundle and the CSV row share the same rules: fewer than three
//! knots read as "not measured", a missing calibration factor as "sample not
//! calibrated", and an analysis failure carries its message instead of the
//! figures.

use std::fmt;

use serde::Serialize;

use super::error::OutlineError;
use super::measurement::OutlineMeasurement;
use super::settings::{Calibration, DescriptorMethod, OutlineSettings};
use super::tangent::{FIRST_HARMONIC, TANGENT_SAMPLES};
use crate::geom::{Orientation, Point2, Polygon};

pub const NOT_MEASURED: &str = "not measured";
pub const NOT_CALIBRATED: &str = "sample not calibrated";

/// Harmonic indices reported for `settings`, in column order.
#[must_use]
pub fn reported_harmonics(settings: &OutlineSettings) -> Vec<usize> {
    let highest = settings.highest_coefficient();
    match settings.method() {
        DescriptorMethod::None => Vec::new(),
        DescriptorMethod::RadiusVsAngle => (0..=highest).collect(),
        DescriptorMethod::TangentVsArclength if highest < FIRST_HARMONIC => {
            (FIRST_HARMONIC..TANGENT_SAMPLES / 2).collect()
        }
        DescriptorMethod::TangentVsArclength => (FIRST_HARMONIC..=highest).collect(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display bundle
// ─────────────────────────────────────────────────────────────────────────────

/// Calibrated figures of a measured outline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementFigures {
    pub area: f64,
    /// `None` when the calibration has no origin transform.
    pub centroid: Option<Point2>,
    pub perimeter: f64,
    pub orientation: Orientation,
    /// `(harmonic, normalized amplitude)` pairs, when a method is selected.
    pub amplitudes: Option<Vec<(usize, f64)>>,
    /// Why the descriptor is missing although a method is selected.
    pub analysis_failure: Option<String>,
}

/// Display bundle of one measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum MeasurementSummary {
    NotMeasured,
    NotCalibrated,
    Measured(MeasurementFigures),
}

impl MeasurementSummary {
    /// Builds the display bundle, computing every stage it needs.
    pub fn build(measurement: &mut OutlineMeasurement, calibration: &Calibration) -> Self {
        let (area, perimeter, centroid) = match pixel_figures(measurement) {
            Ok(figures) => figures,
            Err(_) => return Self::NotMeasured,
        };
        let Ok(orientation) = measurement.orientation() else {
            return Self::NotMeasured;
        };
        let (Some(area), Some(perimeter)) = (calibration.area(area), calibration.length(perimeter))
        else {
            return Self::NotCalibrated;
        };

        let highest = measurement.settings().highest_coefficient();
        let (amplitudes, analysis_failure) = match measurement.settings().method() {
            DescriptorMethod::None => (None, None),
            _ => match analysed(measurement) {
                Ok(()) => (
                    measurement
                        .descriptor()
                        .ok()
                        .map(|descriptor| descriptor.normalized_amplitudes(highest)),
                    None,
                ),
                Err(err) => (None, Some(err.to_string())),
            },
        };

        Self::Measured(MeasurementFigures {
            area,
            centroid: calibration.point(centroid),
            perimeter,
            orientation,
            amplitudes,
            analysis_failure,
        })
    }

    #[must_use]
    pub const fn is_measured(&self) -> bool {
        matches!(self, Self::Measured(_))
    }
}

impl fmt::Display for MeasurementSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let figures = match self {
            Self::NotMeasured => return write!(f, "{NOT_MEASURED}"),
            Self::NotCalibrated => return write!(f, "{NOT_CALIBRATED}"),
            Self::Measured(figures) => figures,
        };

        if figures.centroid.is_none() {
            writeln!(f, "   (not everything can be displayed")?;
            writeln!(f, "   because {NOT_CALIBRATED})")?;
        }
        writeln!(f, "   {} (area)", figures.area)?;
        if let Some(c) = figures.centroid {
            writeln!(f, "   ({},{}) (centroid)", c.x, c.y)?;
        }
        writeln!(f, "   {} (outline length)", figures.perimeter)?;
        write!(f, "   Measured {}", figures.orientation.label())?;

        if let Some(message) = &figures.analysis_failure {
            write!(f, "\n   (Fourier analysis not performed: {message})")?;
        }
        if let Some(amplitudes) = &figures.amplitudes {
            write!(f, "\n   Fourier coefficient amplitudes (normalized by 2nd):")?;
            for (harmonic, amplitude) in amplitudes {
                write!(f, "\n      {harmonic}: {amplitude}")?;
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CSV
// ─────────────────────────────────────────────────────────────────────────────

/// Header cells for a measurement called `name`.
#[must_use]
pub fn csv_header(name: &str, settings: &OutlineSettings) -> String {
    let mut header = format!("{} (area),(length),(clockwise)", csv_cell(name));
    for harmonic in reported_harmonics(settings) {
        header.push_str(&format!(",(Real{harmonic}),(Imag{harmonic})"));
    }
    header
}

/// Data cells matching [`csv_header`] for the measurement's current settings.
pub fn csv_row(measurement: &mut OutlineMeasurement, calibration: &Calibration) -> String {
    let harmonics = reported_harmonics(measurement.settings());
    let mut row = match csv_figures(measurement, calibration) {
        Some(figures) => figures,
        None => format!("{NOT_MEASURED},,"),
    };

    let coefficients = if harmonics.is_empty() {
        None
    } else {
        measurement.descriptor().ok()
    };
    for harmonic in harmonics {
        match coefficients.and_then(|d| d.harmonic(harmonic)) {
            Some(c) => row.push_str(&format!(",{},{}", c.re, c.im)),
            None => row.push_str(",,"),
        }
    }
    row
}

/// `area,length,clockwise`, or `None` when the outline is not measured.
fn csv_figures(measurement: &mut OutlineMeasurement, calibration: &Calibration) -> Option<String> {
    let orientation = measurement.orientation().ok()?;
    let (area, perimeter) = match pixel_figures(measurement) {
        Ok((area, perimeter, _)) => (area, perimeter),
        Err(err) if err.is_not_measured() => return None,
        Err(err) => {
            return Some(format!(
                "{},,{}",
                csv_cell(&err.to_string()),
                orientation.is_clockwise()
            ));
        }
    };

    if measurement.settings().method() != DescriptorMethod::None {
        if let Err(err) = analysed(measurement) {
            return Some(format!(
                "{},,{}",
                csv_cell(&err.to_string()),
                orientation.is_clockwise()
            ));
        }
    }

    let area = calibration
        .area(area)
        .map_or_else(|| NOT_CALIBRATED.to_owned(), |a| a.to_string());
    let perimeter = calibration
        .length(perimeter)
        .map_or_else(|| NOT_CALIBRATED.to_owned(), |l| l.to_string());
    Some(format!("{area},{perimeter},{}", orientation.is_clockwise()))
}

fn csv_cell(text: &str) -> String {
    text.replace([',', '\n', '\r'], ";")
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Pixel area, spline length and centroid.
fn pixel_figures(measurement: &mut OutlineMeasurement) -> Result<(f64, f64, Point2), OutlineError> {
    let area = measurement.area()?;
    let perimeter = measurement.perimeter()?;
    let centroid = measurement.centroid()?;
    Ok((area, perimeter, centroid))
}

/// Runs the selected analysis through reconstruction.
fn analysed(measurement: &mut OutlineMeasurement) -> Result<(), OutlineError> {
    measurement.reconstruction().map(|_| ())
}

/// Outlines of a measurement for plotting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutlineSet {
    pub knots: Vec<Point2>,
    pub interpolated: Option<Polygon>,
    pub resampled: Option<Polygon>,
    pub reconstruction: Option<Polygon>,
}

impl OutlineSet {
    /// Collects every stage that can currently be computed.
    pub fn collect(measurement: &mut OutlineMeasurement) -> Self {
        Self {
            knots: measurement.knots().to_vec(),
            interpolated: measurement.interpolated().ok().cloned(),
            resampled: measurement
                .resampled()
                .ok()
                .map(|resampled| resampled.outline().clone()),
            reconstruction: measurement.reconstruction().ok().cloned(),
        }
    }
}
