use std::f64::consts::TAU;

use crate::geom::{PeriodicCubicSpline, PeriodicError, PeriodicSegments, fix_cross_over};

#[test]
fn fix_cross_over_adds_one_turn() {
    let mut values = vec![3.0, -3.0, -2.0];
    assert_eq!(fix_cross_over(&mut values), Ok(Some(1)));
    assert_eq!(values[0], 3.0);
    assert!((values[1] - (TAU - 3.0)).abs() < 1e-12);

    let mut increasing = vec![0.0, 1.0, 2.0];
    assert_eq!(fix_cross_over(&mut increasing), Ok(None));
}

#[test]
fn fix_cross_over_rejects_bad_sequences() {
    let mut twice = vec![1.0, 0.0, 2.0, 1.0];
    assert_eq!(fix_cross_over(&mut twice), Err(PeriodicError::MultipleWraps));

    let mut still_low = vec![0.0, 1.0, -6.0];
    assert_eq!(fix_cross_over(&mut still_low), Err(PeriodicError::NotMonotonic));

    let mut flat = vec![0.0, 0.0, 1.0];
    assert_eq!(fix_cross_over(&mut flat), Err(PeriodicError::NotMonotonic));
}

#[test]
fn segments_validate_input() {
    assert_eq!(
        PeriodicSegments::new(vec![], 0.0, 1.0),
        Err(PeriodicError::Empty)
    );
    assert!(matches!(
        PeriodicSegments::new(vec![0.5], 1.0, 1.0),
        Err(PeriodicError::InvalidPeriod { .. })
    ));
    assert_eq!(
        PeriodicSegments::new(vec![0.1, 0.1], 0.0, 1.0),
        Err(PeriodicError::NotIncreasing { index: 1 })
    );
    assert!(matches!(
        PeriodicSegments::new(vec![0.1, 1.5], 0.0, 1.0),
        Err(PeriodicError::OutOfPeriod { index: 1, .. })
    ));
}

#[test]
fn wrap_segment_joins_last_to_first() {
    let segments = PeriodicSegments::new(vec![1.0, 2.0, 3.0], 0.0, 4.0).unwrap();

    let inner = segments.locate(1.5);
    assert_eq!(inner.segment, 1);
    assert!((inner.fraction - 0.5).abs() < 1e-12);

    let tail = segments.locate(3.5);
    assert_eq!(tail.segment, 0);
    assert!((tail.fraction - 0.25).abs() < 1e-12);

    let head = segments.locate(0.5);
    assert_eq!(head.segment, 0);
    assert!((head.fraction - 0.75).abs() < 1e-12);

    let wrapped = segments.locate(-0.5);
    assert_eq!(wrapped.segment, 0);
    assert!((wrapped.fraction - 0.25).abs() < 1e-12);
    assert_eq!(segments.left_of(0), 2);
}

#[test]
fn periodic_spline_interpolates_cosine() {
    let n = 32;
    let x: Vec<f64> = (0..n).map(|j| TAU * j as f64 / n as f64).collect();
    let y: Vec<f64> = x.iter().map(|v| 2.0 + v.cos()).collect();
    let spline = PeriodicCubicSpline::fit(x.clone(), y.clone(), 0.0, TAU).unwrap();

    for (xj, yj) in x.iter().zip(&y) {
        assert!((spline.evaluate(*xj) - yj).abs() < 1e-12);
    }
    for k in 0..100 {
        let xp = TAU * (k as f64 + 0.37) / 100.0;
        assert!((spline.evaluate(xp) - (2.0 + xp.cos())).abs() < 1e-3);
        assert!((spline.evaluate(xp + TAU) - spline.evaluate(xp)).abs() < 1e-9);
    }
    assert!(spline.solver_iterations() > 0);
}

#[test]
fn periodic_spline_rejects_length_mismatch() {
    assert_eq!(
        PeriodicCubicSpline::fit(vec![0.0, 1.0], vec![1.0], 0.0, TAU),
        Err(PeriodicError::LengthMismatch { x: 2, y: 1 })
    );
}
