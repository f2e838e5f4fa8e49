use crate::geom::{Point2, Polygon, TangentStrategy};
use crate::outline::tests::{circle, crescent, ellipse};
use crate::outline::{DescriptorMethod, OutlineError, OutlineMeasurement, Stage};

fn radius_measurement(knots: Vec<Point2>, power: u32, highest: usize) -> OutlineMeasurement {
    let mut m = OutlineMeasurement::new();
    m.set_knots(knots, true);
    m.set_method(DescriptorMethod::RadiusVsAngle);
    m.set_resampling_power(power).unwrap();
    m.set_highest_coefficient(highest).unwrap();
    m
}

fn rms_distance(a: &Polygon, b: &Polygon) -> f64 {
    assert_eq!(a.len(), b.len());
    let sum: f64 = a
        .points()
        .iter()
        .zip(b.points())
        .map(|(p, q)| p.distance_squared_to(*q))
        .sum();
    (sum / a.len() as f64).sqrt()
}

#[test]
fn full_order_reconstruction_reproduces_circle() {
    let center = Point2::new(50.0, 40.0);
    let mut m = radius_measurement(circle(32, center, 10.0), 6, 32);

    let resampled = m.resampled().unwrap().outline().clone();
    assert_eq!(resampled.len(), 64);
    let reconstruction = m.reconstruction().unwrap().clone();
    assert_eq!(reconstruction.len(), 64);
    assert!(rms_distance(&resampled, &reconstruction) < 1e-9 * 10.0);

    for p in reconstruction.points() {
        assert!((p.distance_to(center) - 10.0).abs() < 0.05);
    }
}

#[test]
fn reconstruction_error_never_grows_with_order() {
    let mut m = radius_measurement(ellipse(24, Point2::new(0.0, 0.0), 30.0, 15.0), 6, 0);
    let resampled = m.resampled().unwrap().outline().clone();

    let mut previous = f64::INFINITY;
    for highest in 0..=32 {
        m.set_highest_coefficient(highest).unwrap();
        let error = rms_distance(&resampled, m.reconstruction().unwrap());
        assert!(error <= previous + 1e-9, "order {highest}: {error} > {previous}");
        previous = error;
    }
    assert!(previous < 1e-9);
}

#[test]
fn resampled_outline_is_counter_clockwise_for_both_windings() {
    let ccw = ellipse(24, Point2::new(5.0, -3.0), 20.0, 12.0);
    let mut cw = ccw.clone();
    cw.reverse();

    for method in [
        DescriptorMethod::RadiusVsAngle,
        DescriptorMethod::TangentVsArclength,
    ] {
        for knots in [ccw.clone(), cw.clone()] {
            let mut m = OutlineMeasurement::new();
            m.set_knots(knots, true);
            m.set_method(method);
            let resampled = m.resampled().unwrap();
            assert!(!resampled.outline().is_clockwise(), "{}", method.label());
            assert_eq!(resampled.len(), 64);
        }
    }
}

#[test]
fn square_has_four_fold_radius_spectrum() {
    let square = vec![
        Point2::new(-1.0, -1.0),
        Point2::new(1.0, -1.0),
        Point2::new(1.0, 1.0),
        Point2::new(-1.0, 1.0),
    ];
    let mut m = radius_measurement(square, 6, 16);
    m.set_strategy(TangentStrategy::CirclePreserving);

    let radii = m.resampled().unwrap().polar().unwrap().radii.clone();
    let mean_radius = radii.iter().sum::<f64>() / radii.len() as f64;
    assert!(mean_radius > 1.0 && mean_radius < 2f64.sqrt());

    let descriptor = m.descriptor().unwrap();
    let n = descriptor.len() as f64;
    let dc = descriptor.amplitude(0).unwrap();
    assert!((dc / n - mean_radius).abs() < 1e-9);

    for h in 1..=16 {
        let amplitude = descriptor.amplitude(h).unwrap();
        if h % 4 == 0 {
            assert!(amplitude > 1e-6 * dc, "harmonic {h} should peak");
        } else {
            assert!(amplitude < 1e-8 * dc, "harmonic {h} should vanish");
        }
    }
}

#[test]
fn non_star_shaped_outline_fails_without_caching() {
    let mut m = OutlineMeasurement::new();
    m.set_knots(crescent(), true);
    m.set_method(DescriptorMethod::RadiusVsAngle);

    let err = m.resampled().unwrap_err();
    assert!(matches!(err, OutlineError::RadiusAngle(_)), "{err}");
    assert!(err.to_string().starts_with("angle-vs-theta not possible"));
    assert!(!m.is_fresh(Stage::Resampled));
    assert!(m.diagnostics().failure(Stage::Resampled).is_some());

    // Area and perimeter stay available.
    assert!(m.area().unwrap() > 0.0);
}
