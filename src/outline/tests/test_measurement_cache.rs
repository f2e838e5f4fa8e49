use crate::geom::{Point2, TangentStrategy};
use crate::outline::tests::ellipse;
use crate::outline::{
    ConfigError, DescriptorMethod, OutlineError, OutlineMeasurement, OutlineSettings, Stage,
};

fn measured() -> OutlineMeasurement {
    let mut m = OutlineMeasurement::new();
    m.set_knots(ellipse(20, Point2::new(10.0, 10.0), 8.0, 5.0), true);
    m.set_method(DescriptorMethod::RadiusVsAngle);
    m
}

#[test]
fn repeated_queries_hit_the_cache() {
    let mut m = measured();
    let first = m.descriptor().unwrap().clone();
    let second = m.descriptor().unwrap().clone();
    assert_eq!(first, second);

    let stats = m.cache_stats();
    assert_eq!(stats.misses(Stage::Descriptor), 1);
    assert_eq!(stats.hits(Stage::Descriptor), 1);
    assert_eq!(stats.misses(Stage::Spline), 1);
    assert!(stats.hit_rate() > 0.0);
}

#[test]
fn highest_coefficient_only_invalidates_reconstruction() {
    let mut m = measured();
    m.reconstruction().unwrap();
    assert!(m.is_fresh(Stage::Descriptor));
    assert!(m.is_fresh(Stage::Reconstruction));

    m.set_highest_coefficient(4).unwrap();
    assert!(m.is_fresh(Stage::Spline));
    assert!(m.is_fresh(Stage::Descriptor));
    assert!(!m.is_fresh(Stage::Reconstruction));

    m.reconstruction().unwrap();
    assert_eq!(m.cache_stats().misses(Stage::Descriptor), 1);
    assert_eq!(m.cache_stats().misses(Stage::Reconstruction), 2);
}

#[test]
fn knots_and_strategy_invalidate_everything() {
    let mut m = measured();
    m.reconstruction().unwrap();

    m.set_strategy(TangentStrategy::Chord);
    for stage in Stage::ALL {
        assert!(!m.is_fresh(stage), "{}", stage.label());
    }
    m.reconstruction().unwrap();

    m.set_knots(ellipse(20, Point2::new(0.0, 0.0), 8.0, 5.0), true);
    for stage in Stage::ALL {
        assert!(!m.is_fresh(stage), "{}", stage.label());
    }
}

#[test]
fn unchanged_values_keep_the_generation() {
    let mut m = measured();
    let generation = m.generation();
    m.set_method(DescriptorMethod::RadiusVsAngle);
    m.set_strategy(TangentStrategy::CirclePreserving);
    m.set_resampling_power(6).unwrap();
    m.set_highest_coefficient(10).unwrap();
    assert_eq!(m.generation(), generation);
}

#[test]
fn resampling_power_eight_is_rejected() {
    let mut m = measured();
    let generation = m.generation();
    assert_eq!(
        m.set_resampling_power(8),
        Err(ConfigError::ResamplingPower {
            value: 8,
            min: 4,
            max: 7
        })
    );
    assert_eq!(m.settings().resampling_power(), 6);
    assert_eq!(m.generation(), generation);
    assert_eq!(m.resampled().unwrap().len(), 64);
}

#[test]
fn coefficient_limits_follow_the_power() {
    let mut m = measured();
    assert!(matches!(
        m.set_highest_coefficient(33),
        Err(ConfigError::HighestCoefficient { max: 32, .. })
    ));

    m.set_resampling_power(7).unwrap();
    m.set_highest_coefficient(40).unwrap();
    m.reconstruction().unwrap();
    m.set_resampling_power(5).unwrap();
    assert_eq!(m.settings().resampling_power(), 5);
    assert_eq!(m.settings().highest_coefficient(), 16);
    assert!(!m.is_fresh(Stage::Resampled));
    assert!(!m.is_fresh(Stage::Reconstruction));
    assert_eq!(m.reconstruction().unwrap().len(), 32);

    assert!(matches!(
        m.set_normalization_index(512),
        Err(ConfigError::NormalizationIndex { max: 511, .. })
    ));
    m.set_normalization_index(511).unwrap();
}

#[test]
fn lower_power_clamps_default_highest_coefficient() {
    let mut m = OutlineMeasurement::new();
    m.set_knots(ellipse(12, Point2::new(0.0, 0.0), 6.0, 4.0), true);
    m.set_method(DescriptorMethod::TangentVsArclength);
    assert_eq!(m.settings().highest_coefficient(), 10);

    m.set_resampling_power(4).unwrap();
    assert_eq!(m.settings().resampling_power(), 4);
    assert_eq!(m.settings().highest_coefficient(), 8);
    assert_eq!(m.resampled().unwrap().len(), 16);
    assert!(m.reconstruction().is_ok());

    // Raising the power again keeps the clamped value.
    m.set_resampling_power(6).unwrap();
    assert_eq!(m.settings().highest_coefficient(), 8);
}

#[test]
fn apply_settings_orders_dependent_values() {
    let mut m = measured();
    m.set_resampling_power(7).unwrap();
    m.set_highest_coefficient(60).unwrap();

    let mut target = OutlineSettings::default();
    target.set_resampling_power(5).unwrap();
    target.set_highest_coefficient(12).unwrap();
    target.set_method(DescriptorMethod::TangentVsArclength);
    m.apply_settings(&target).unwrap();
    assert_eq!(m.settings(), &target);
}

#[test]
fn no_method_and_too_few_knots() {
    let mut m = OutlineMeasurement::new();
    m.set_knots(ellipse(20, Point2::new(0.0, 0.0), 3.0, 2.0), true);
    assert_eq!(m.resampled().unwrap_err(), OutlineError::NoMethod);
    assert!(m.area().unwrap() > 0.0);

    m.set_knots(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)], true);
    let err = m.spline().unwrap_err();
    assert!(err.is_not_measured());
    assert!(m.orientation().unwrap_err().is_not_measured());
    assert!(!m.diagnostics().has_failures());
}

#[test]
fn open_outline_has_spline_but_no_interpolation() {
    let mut m = OutlineMeasurement::new();
    m.set_knots(ellipse(20, Point2::new(0.0, 0.0), 3.0, 2.0), false);
    assert_eq!(m.spline().unwrap().segments().len(), 19);
    assert_eq!(m.interpolated().unwrap_err(), OutlineError::OpenOutline);
}

#[test]
fn collinear_knots_measure_zero_area() {
    let mut m = OutlineMeasurement::new();
    m.set_knots(
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
        ],
        true,
    );
    assert_eq!(m.area().unwrap(), 0.0);
    assert!(m.perimeter().unwrap() > 0.0);
    assert!(m.centroid().unwrap().is_finite());
}

#[test]
fn consecutive_duplicates_stay_finite() {
    let mut knots = ellipse(12, Point2::new(0.0, 0.0), 6.0, 4.0);
    knots.insert(4, knots[4]);
    let mut m = OutlineMeasurement::new();
    m.set_knots(knots, true);
    assert!(m.interpolated().unwrap().is_finite());
    assert!(m.area().unwrap().is_finite());
    assert!(m.perimeter().unwrap().is_finite());
}

#[test]
fn radius_pipeline_reports_solver_iterations() {
    let mut m = measured();
    m.descriptor().unwrap();
    assert!(m.diagnostics().spline_solver_iterations.is_some());
    assert!(m.diagnostics().to_string().contains("Spline solver iterations"));
}
