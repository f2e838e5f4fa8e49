//! Diagnostics collected while a measurement recomputes its stages.
//!
//! # Example
//!
//! ```ignore
//! let mut measurement = OutlineMeasurement::new();
//! measurement.set_knots(points, true);
//! let _ = measurement.descriptor();
//!
//! for warning in &measurement.diagnostics().warnings {
//!     eprintln!("Warning: {}", warning);
//! }
//! ```

use std::fmt;

use super::cache::Stage;

/// Solver statistics and messages of the most recent computations.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AnalysisDiagnostics {
    /// Conjugate-gradient iterations of the last radius spline fit.
    pub spline_solver_iterations: Option<usize>,

    /// Newton updates of the last tangent reconstruction closure solve.
    pub closure_iterations: Option<usize>,

    /// Soft failures that were recovered, e.g. an identity normalization.
    pub warnings: Vec<String>,

    /// Hard failures by stage; the cached values were left untouched.
    pub failures: Vec<(Stage, String)>,
}

impl AnalysisDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Adds a warning unless the same message is already recorded.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    /// Drops the warnings of a previous descriptor computation.
    pub fn clear_warnings(&mut self) {
        self.warnings.clear();
    }

    pub fn record_failure(&mut self, stage: Stage, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{} failed: {message}", stage.label());
        self.failures.retain(|(s, _)| *s != stage);
        self.failures.push((stage, message));
    }

    /// Forgets failures of `stage` after a successful recomputation.
    pub fn clear_failure(&mut self, stage: Stage) {
        self.failures.retain(|(s, _)| *s != stage);
    }

    #[must_use]
    pub fn failure(&self, stage: Stage) -> Option<&str> {
        self.failures
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, message)| message.as_str())
    }
}

impl fmt::Display for AnalysisDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis Diagnostics:")?;
        if let Some(iterations) = self.spline_solver_iterations {
            writeln!(f, "  Spline solver iterations: {iterations}")?;
        }
        if let Some(iterations) = self.closure_iterations {
            writeln!(f, "  Closure iterations: {iterations}")?;
        }
        for warning in &self.warnings {
            writeln!(f, "  Warning: {warning}")?;
        }
        for (stage, message) in &self.failures {
            writeln!(f, "  Failure ({}): {message}", stage.label())?;
        }
        Ok(())
    }
}
