//! One outline measurement: digitized knots, configuration and the lazily
//! computed stages derived from them.

use super::cache::{CacheSlot, Input, InvalidationClock, OutlineCacheStats, Stage};
use super::descriptor::FourierDescriptor;
use super::diagnostics::AnalysisDiagnostics;
use super::error::{ConfigError, OutlineError, OutlineResult};
use super::radius::{radius_descriptor, reconstruct_radius, resample_radius_vs_angle};
use super::resample::{ResampledOutline, interpolate_outline, resample_by_arclength};
use super::settings::{DescriptorMethod, OutlineSettings};
use super::tangent::tangent_descriptor;
use super::tangent_curve::{place_unit_curve, reconstruct_unit_curve};
use crate::geom::{Orientation, OutlineSpline, Point2, Polygon, TangentStrategy};

/// Owns the inputs of one outline analysis and its cache graph.
#[derive(Debug, Clone, Default)]
pub struct OutlineMeasurement {
    knots: Vec<Point2>,
    closed: bool,
    settings: OutlineSettings,
    clock: InvalidationClock,
    spline: CacheSlot<OutlineSpline>,
    interpolated: CacheSlot<Polygon>,
    resampled: CacheSlot<ResampledOutline>,
    descriptor: CacheSlot<FourierDescriptor>,
    reconstruction: CacheSlot<Polygon>,
    stats: OutlineCacheStats,
    diagnostics: AnalysisDiagnostics,
}

impl OutlineMeasurement {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_settings(settings: OutlineSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    // ── inputs ──────────────────────────────────────────────────────────────

    /// Replaces the digitized points. Invalidates every stage.
    pub fn set_knots(&mut self, knots: Vec<Point2>, closed: bool) {
        self.knots = knots;
        self.closed = closed;
        self.clock.touch(Input::Knots);
    }

    #[must_use]
    pub fn knots(&self) -> &[Point2] {
        &self.knots
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    #[must_use]
    pub const fn settings(&self) -> &OutlineSettings {
        &self.settings
    }

    /// # Errors
    /// See [`OutlineSettings::set_resampling_power`].
    pub fn set_resampling_power(&mut self, power: u32) -> Result<(), ConfigError> {
        if power == self.settings.resampling_power() {
            return Ok(());
        }
        let clamped = self.settings.set_resampling_power(power)?;
        self.clock.touch(Input::ResamplingPower);
        if clamped {
            log::debug!(
                "highest coefficient clamped to {} for power {power}",
                self.settings.highest_coefficient()
            );
            self.clock.touch(Input::HighestCoefficient);
        }
        Ok(())
    }

    /// # Errors
    /// See [`OutlineSettings::set_highest_coefficient`].
    pub fn set_highest_coefficient(&mut self, value: usize) -> Result<(), ConfigError> {
        if value == self.settings.highest_coefficient() {
            return Ok(());
        }
        self.settings.set_highest_coefficient(value)?;
        self.clock.touch(Input::HighestCoefficient);
        Ok(())
    }

    /// # Errors
    /// See [`OutlineSettings::set_normalization_index`].
    pub fn set_normalization_index(&mut self, value: usize) -> Result<(), ConfigError> {
        if value == self.settings.normalization_index() {
            return Ok(());
        }
        self.settings.set_normalization_index(value)?;
        self.clock.touch(Input::NormalizationIndex);
        Ok(())
    }

    pub fn set_method(&mut self, method: DescriptorMethod) {
        if method != self.settings.method() {
            self.settings.set_method(method);
            self.clock.touch(Input::Method);
        }
    }

    pub fn set_strategy(&mut self, strategy: TangentStrategy) {
        if strategy != self.settings.strategy() {
            self.settings.set_strategy(strategy);
            self.clock.touch(Input::Strategy);
        }
    }

    /// Applies every value of `settings`, touching only the inputs that changed.
    ///
    /// # Errors
    /// The first rejected value; settings applied before it stay applied.
    pub fn apply_settings(&mut self, settings: &OutlineSettings) -> Result<(), ConfigError> {
        self.set_method(settings.method());
        self.set_strategy(settings.strategy());
        self.set_normalization_index(settings.normalization_index())?;
        self.set_resampling_power(settings.resampling_power())?;
        self.set_highest_coefficient(settings.highest_coefficient())
    }

    // ── bookkeeping ─────────────────────────────────────────────────────────

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.clock.generation()
    }

    #[must_use]
    pub const fn cache_stats(&self) -> OutlineCacheStats {
        self.stats
    }

    #[must_use]
    pub const fn diagnostics(&self) -> &AnalysisDiagnostics {
        &self.diagnostics
    }

    /// `true` when `stage` holds a value computed after its latest input change.
    #[must_use]
    pub fn is_fresh(&self, stage: Stage) -> bool {
        match stage {
            Stage::Spline => self.spline.is_fresh(&self.clock, stage),
            Stage::Interpolated => self.interpolated.is_fresh(&self.clock, stage),
            Stage::Resampled => self.resampled.is_fresh(&self.clock, stage),
            Stage::Descriptor => self.descriptor.is_fresh(&self.clock, stage),
            Stage::Reconstruction => self.reconstruction.is_fresh(&self.clock, stage),
        }
    }

    // ── derived stages ──────────────────────────────────────────────────────

    /// # Errors
    /// [`OutlineError::NotMeasured`] when the knots cannot carry a spline.
    pub fn spline(&mut self) -> OutlineResult<&OutlineSpline> {
        self.ensure_spline()?;
        Self::cached(&self.spline, &self.clock, Stage::Spline)
    }

    /// The closed 256-point outline.
    ///
    /// # Errors
    /// Spline failures, or [`OutlineError::OpenOutline`].
    pub fn interpolated(&mut self) -> OutlineResult<&Polygon> {
        self.ensure_interpolated()?;
        Self::cached(&self.interpolated, &self.clock, Stage::Interpolated)
    }

    /// # Errors
    /// Upstream failures, [`OutlineError::NoMethod`], or the selected
    /// method's resampling failure.
    pub fn resampled(&mut self) -> OutlineResult<&ResampledOutline> {
        self.ensure_resampled()?;
        Self::cached(&self.resampled, &self.clock, Stage::Resampled)
    }

    /// # Errors
    /// Upstream failures or the selected method's descriptor failure.
    pub fn descriptor(&mut self) -> OutlineResult<&FourierDescriptor> {
        self.ensure_descriptor()?;
        Self::cached(&self.descriptor, &self.clock, Stage::Descriptor)
    }

    /// Outline rebuilt from harmonics up to the highest kept coefficient.
    ///
    /// # Errors
    /// Upstream failures or a reconstruction failure.
    pub fn reconstruction(&mut self) -> OutlineResult<&Polygon> {
        self.ensure_reconstruction()?;
        Self::cached(&self.reconstruction, &self.clock, Stage::Reconstruction)
    }

    /// # Errors
    /// See [`OutlineMeasurement::interpolated`].
    pub fn area(&mut self) -> OutlineResult<f64> {
        Ok(self.interpolated()?.area())
    }

    /// # Errors
    /// See [`OutlineMeasurement::interpolated`].
    pub fn centroid(&mut self) -> OutlineResult<Point2> {
        let interpolated = self.interpolated()?;
        interpolated
            .centroid()
            .ok_or_else(|| OutlineError::NonSimple("outline has no points".to_owned()))
    }

    /// Spline arc length.
    ///
    /// # Errors
    /// See [`OutlineMeasurement::interpolated`].
    pub fn perimeter(&mut self) -> OutlineResult<f64> {
        self.ensure_interpolated()?;
        Ok(Self::cached(&self.spline, &self.clock, Stage::Spline)?.length())
    }

    /// Orientation of the digitized knots.
    ///
    /// # Errors
    /// [`OutlineError::NotMeasured`] below three knots.
    pub fn orientation(&self) -> OutlineResult<Orientation> {
        if self.knots.len() < Polygon::MIN_POINTS {
            return Err(OutlineError::NotMeasured(crate::geom::SplineError::TooFewKnots(
                self.knots.len(),
            )));
        }
        Ok(Polygon::new(self.knots.clone()).orientation())
    }

    fn cached<'a, T>(
        slot: &'a CacheSlot<T>,
        clock: &InvalidationClock,
        stage: Stage,
    ) -> OutlineResult<&'a T> {
        slot.get(clock, stage).ok_or_else(|| {
            OutlineError::NonSimple(format!("{} is not available", stage.label()))
        })
    }

    fn ensure_spline(&mut self) -> OutlineResult<()> {
        if self.spline.is_fresh(&self.clock, Stage::Spline) {
            self.stats.record_hit(Stage::Spline);
            return Ok(());
        }
        self.stats.record_miss(Stage::Spline);
        let generation = self.clock.generation();
        let spline = OutlineSpline::fit(&self.knots, self.closed, self.settings.strategy())
            .map_err(|err| self.fail(Stage::Spline, err.into()))?;
        self.spline.store(generation, spline);
        self.diagnostics.clear_failure(Stage::Spline);
        Ok(())
    }

    fn ensure_interpolated(&mut self) -> OutlineResult<()> {
        if self.interpolated.is_fresh(&self.clock, Stage::Interpolated) {
            self.stats.record_hit(Stage::Interpolated);
            return Ok(());
        }
        self.ensure_spline()?;
        self.stats.record_miss(Stage::Interpolated);
        let generation = self.clock.generation();
        let spline = Self::cached(&self.spline, &self.clock, Stage::Spline)?;
        let interpolated =
            interpolate_outline(spline).map_err(|err| self.fail(Stage::Interpolated, err))?;
        self.interpolated.store(generation, interpolated);
        self.diagnostics.clear_failure(Stage::Interpolated);
        Ok(())
    }

    fn ensure_resampled(&mut self) -> OutlineResult<()> {
        if self.resampled.is_fresh(&self.clock, Stage::Resampled) {
            self.stats.record_hit(Stage::Resampled);
            return Ok(());
        }
        let method = self.settings.method();
        if method == DescriptorMethod::None {
            return Err(OutlineError::NoMethod);
        }
        self.ensure_interpolated()?;
        self.stats.record_miss(Stage::Resampled);
        let generation = self.clock.generation();
        let power = self.settings.resampling_power();
        let interpolated = Self::cached(&self.interpolated, &self.clock, Stage::Interpolated)?;
        let result = match method {
            DescriptorMethod::RadiusVsAngle => resample_radius_vs_angle(interpolated, power),
            DescriptorMethod::TangentVsArclength | DescriptorMethod::None => {
                resample_by_arclength(interpolated, power)
            }
        };
        let resampled = result.map_err(|err| self.fail(Stage::Resampled, err))?;
        self.diagnostics.spline_solver_iterations =
            resampled.polar().map(|polar| polar.solver_iterations);
        self.resampled.store(generation, resampled);
        self.diagnostics.clear_failure(Stage::Resampled);
        Ok(())
    }

    fn ensure_descriptor(&mut self) -> OutlineResult<()> {
        if self.descriptor.is_fresh(&self.clock, Stage::Descriptor) {
            self.stats.record_hit(Stage::Descriptor);
            return Ok(());
        }
        self.ensure_resampled()?;
        self.stats.record_miss(Stage::Descriptor);
        self.diagnostics.clear_warnings();
        let generation = self.clock.generation();
        let index = self.settings.normalization_index();
        let resampled = Self::cached(&self.resampled, &self.clock, Stage::Resampled)?;
        let result = match self.settings.method() {
            DescriptorMethod::RadiusVsAngle => radius_descriptor(resampled),
            DescriptorMethod::TangentVsArclength => tangent_descriptor(resampled.outline(), index),
            DescriptorMethod::None => Err(OutlineError::NoMethod),
        };
        let descriptor = result.map_err(|err| self.fail(Stage::Descriptor, err))?;
        if let Some(warning) = descriptor.warning() {
            self.diagnostics.add_warning(warning);
        }
        self.descriptor.store(generation, descriptor);
        self.diagnostics.clear_failure(Stage::Descriptor);
        Ok(())
    }

    fn ensure_reconstruction(&mut self) -> OutlineResult<()> {
        if self.reconstruction.is_fresh(&self.clock, Stage::Reconstruction) {
            self.stats.record_hit(Stage::Reconstruction);
            return Ok(());
        }
        self.ensure_descriptor()?;
        self.stats.record_miss(Stage::Reconstruction);
        let generation = self.clock.generation();
        let highest = self.settings.highest_coefficient();
        let descriptor = Self::cached(&self.descriptor, &self.clock, Stage::Descriptor)?;

        let (result, closure_iterations) = match descriptor.method() {
            DescriptorMethod::RadiusVsAngle => {
                let resampled = Self::cached(&self.resampled, &self.clock, Stage::Resampled)?;
                (reconstruct_radius(descriptor, resampled, highest), None)
            }
            DescriptorMethod::TangentVsArclength => {
                let interpolated =
                    Self::cached(&self.interpolated, &self.clock, Stage::Interpolated)?;
                match reconstruct_unit_curve(descriptor, highest) {
                    Ok(curve) => {
                        let iterations = curve.newton_iterations;
                        let align = descriptor.normalization_index() == 0;
                        (
                            place_unit_curve(&curve, descriptor, interpolated, align),
                            Some(iterations),
                        )
                    }
                    Err(err) => (Err(err), None),
                }
            }
            DescriptorMethod::None => (Err(OutlineError::NoMethod), None),
        };
        let reconstruction = result.map_err(|err| self.fail(Stage::Reconstruction, err))?;
        self.diagnostics.closure_iterations = closure_iterations;
        self.reconstruction.store(generation, reconstruction);
        self.diagnostics.clear_failure(Stage::Reconstruction);
        Ok(())
    }

    fn fail(&mut self, stage: Stage, err: OutlineError) -> OutlineError {
        if !err.is_not_measured() {
            self.diagnostics.record_failure(stage, err.to_string());
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::tests::ellipse;

    #[test]
    fn descriptor_recompute_replaces_warnings() {
        let mut m = OutlineMeasurement::new();
        m.set_knots(ellipse(24, Point2::new(50.0, 40.0), 30.0, 15.0), true);
        m.set_method(DescriptorMethod::TangentVsArclength);
        m.descriptor().unwrap();
        m.diagnostics.add_warning("stale");

        // A cache hit keeps what the last computation reported.
        m.descriptor().unwrap();
        assert!(m.diagnostics().has_warnings());

        m.set_normalization_index(2).unwrap();
        m.descriptor().unwrap();
        assert!(!m.diagnostics().has_warnings());
        assert_eq!(m.cache_stats().misses(Stage::Descriptor), 2);
    }
}
