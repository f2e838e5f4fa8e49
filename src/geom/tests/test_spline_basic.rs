use std::f64::consts::TAU;

use crate::geom::{
    HermiteSegment, OutlineSpline, Point2, SplineError, TangentStrategy, Vec2, circumcenter,
};

fn circle(n: usize, radius: f64) -> Vec<Point2> {
    (0..n)
        .map(|j| {
            let a = TAU * j as f64 / n as f64;
            Point2::new(radius * a.cos(), radius * a.sin())
        })
        .collect()
}

#[test]
fn straight_segment_is_linear() {
    let seg = HermiteSegment::new(
        Point2::new(0.0, 0.0),
        Point2::new(3.0, 0.0),
        Vec2::new(3.0, 0.0),
        Vec2::new(3.0, 0.0),
    );
    assert!(seg.point_at(0.5).distance_to(Point2::new(1.5, 0.0)) < 1e-9);
    assert!((seg.length() - 3.0).abs() < 1e-6);
    assert_eq!(seg.point_at(1.0), Point2::new(3.0, 0.0));
}

#[test]
fn circumcenter_of_right_triangle() {
    let c = circumcenter(
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(0.0, 2.0),
    )
    .unwrap();
    assert!(c.distance_to(Point2::new(1.0, 1.0)) < 1e-9);
    assert!(
        circumcenter(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0)
        )
        .is_none()
    );
    // Cross product below the zero-length threshold.
    assert!(
        circumcenter(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1e-13),
            Point2::new(2.0, 0.0)
        )
        .is_none()
    );
}

#[test]
fn circle_tangents_are_perpendicular_to_radius() {
    let knots = circle(16, 10.0);
    let tangents = TangentStrategy::CirclePreserving.tangents(&knots, true);
    for (p, t) in knots.iter().zip(&tangents) {
        let radial = p.to_vec2();
        assert!(radial.dot(*t).abs() < 1e-9);
        assert!(radial.cross(*t) > 0.0);
    }
}

#[test]
fn closed_circle_spline_stays_on_circle() {
    for strategy in [TangentStrategy::Chord, TangentStrategy::CirclePreserving] {
        let spline = OutlineSpline::fit(&circle(16, 10.0), true, strategy).unwrap();
        assert_eq!(spline.segments().len(), 16);
        assert!((spline.length() - TAU * 10.0).abs() < 0.05 * TAU);
        for p in spline.sample_uniform(256) {
            assert!((p.to_vec2().length() - 10.0).abs() < 0.05);
        }
    }
}

#[test]
fn open_spline_spans_first_to_last_knot() {
    let knots = vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(2.0, 0.0),
    ];
    let spline = OutlineSpline::fit(&knots, false, TangentStrategy::CirclePreserving).unwrap();
    assert_eq!(spline.segments().len(), 2);
    assert!(!spline.is_closed());
    let start = spline.point_at(0.0).unwrap();
    let end = spline.point_at(1.0).unwrap();
    assert!(start.distance_to(knots[0]) < 1e-9);
    assert!(end.distance_to(knots[2]) < 1e-9);
    assert!(spline.point_at(1.5).is_none());
}

#[test]
fn fit_rejects_degenerate_input() {
    let two = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
    assert_eq!(
        OutlineSpline::fit(&two, true, TangentStrategy::default()),
        Err(SplineError::TooFewKnots(2))
    );

    let same = vec![Point2::new(1.0, 1.0); 3];
    assert_eq!(
        OutlineSpline::fit(&same, true, TangentStrategy::default()),
        Err(SplineError::ZeroLength)
    );

    let nan = vec![
        Point2::new(0.0, 0.0),
        Point2::new(f64::NAN, 0.0),
        Point2::new(1.0, 1.0),
    ];
    assert_eq!(
        OutlineSpline::fit(&nan, true, TangentStrategy::default()),
        Err(SplineError::NonFiniteKnot(1))
    );
}

#[test]
fn duplicate_knots_do_not_produce_nan() {
    let knots = vec![
        Point2::new(0.0, 0.0),
        Point2::new(0.0, 0.0),
        Point2::new(4.0, 0.0),
        Point2::new(4.0, 3.0),
        Point2::new(0.0, 3.0),
    ];
    let spline = OutlineSpline::fit(&knots, true, TangentStrategy::CirclePreserving).unwrap();
    assert!(spline.tangents().iter().all(|t| t.is_finite()));
    assert!(spline.sample_uniform(256).iter().all(|p| p.is_finite()));
}

#[test]
fn strategy_labels_round_trip() {
    for strategy in [TangentStrategy::Chord, TangentStrategy::CirclePreserving] {
        assert_eq!(TangentStrategy::from_label(strategy.label()), Some(strategy));
    }
    assert_eq!(TangentStrategy::from_label("bezier"), None);
}
