use crate::geom::{Point2, Polygon, Transform2, Vec2};
use crate::outline::tests::ellipse;
use crate::outline::{
    DescriptorMethod, FourierDescriptor, OutlineError, OutlineMeasurement, TANGENT_SAMPLES,
    tangent_descriptor,
};

fn ellipse_polygon() -> Polygon {
    Polygon::new(ellipse(64, Point2::new(0.0, 0.0), 30.0, 15.0))
}

fn assert_same_amplitudes(a: &FourierDescriptor, b: &FourierDescriptor, tolerance: f64) {
    let reference = a.amplitude(2).unwrap();
    assert!(reference > 0.0);
    for h in 2..=16 {
        let (x, y) = (a.amplitude(h).unwrap(), b.amplitude(h).unwrap());
        assert!(
            (x - y).abs() <= tolerance * reference,
            "harmonic {h}: {x} vs {y}"
        );
    }
}

#[test]
fn descriptor_covers_harmonics_two_to_half_samples() {
    let descriptor = tangent_descriptor(&ellipse_polygon(), 0).unwrap();
    assert_eq!(descriptor.first_harmonic(), 2);
    assert_eq!(descriptor.len(), TANGENT_SAMPLES / 2 - 2);
    assert!(descriptor.harmonic(1).is_none());
    assert!(descriptor.outline_length().unwrap() > 0.0);
    assert!(descriptor.warning().is_none());
}

#[test]
fn amplitudes_ignore_rotation_and_translation() {
    let polygon = ellipse_polygon();
    let moved = polygon.transformed(
        Transform2::translate(Vec2::new(250.0, -75.0)).compose(Transform2::rotate(0.7)),
    );
    let a = tangent_descriptor(&polygon, 0).unwrap();
    let b = tangent_descriptor(&moved, 0).unwrap();
    assert_same_amplitudes(&a, &b, 1e-9);
    assert!((a.outline_length().unwrap() - b.outline_length().unwrap()).abs() < 1e-9);
}

#[test]
fn amplitudes_ignore_cyclic_relabeling() {
    let polygon = ellipse_polygon();
    let a = tangent_descriptor(&polygon, 0).unwrap();
    let b = tangent_descriptor(&polygon.rotated_start(5), 0).unwrap();
    assert_same_amplitudes(&a, &b, 1e-3);
}

#[test]
fn measurement_amplitudes_ignore_rotation() {
    let knots = ellipse(24, Point2::new(100.0, 80.0), 30.0, 15.0);
    let transform = Transform2::rotate_about(Point2::new(100.0, 80.0), 0.7)
        .compose(Transform2::translate(Vec2::new(12.0, 3.0)));
    let moved: Vec<Point2> = knots.iter().map(|p| transform.apply_point(*p)).collect();

    let mut results = Vec::new();
    for knots in [knots, moved] {
        let mut m = OutlineMeasurement::new();
        m.set_knots(knots, true);
        m.set_method(DescriptorMethod::TangentVsArclength);
        results.push(m.descriptor().unwrap().clone());
    }
    assert_same_amplitudes(&results[0], &results[1], 1e-6);
}

#[test]
fn normalization_index_aligns_chosen_harmonic() {
    let descriptor = tangent_descriptor(&ellipse_polygon(), 2).unwrap();
    let c2 = descriptor.harmonic(2).unwrap();
    assert!(c2.re.abs() < 1e-9 * c2.norm());
    assert!(c2.im < 0.0);
    assert_eq!(descriptor.normalization_index(), 2);
}

#[test]
fn normalization_index_names_the_reported_harmonic() {
    let points: Vec<Point2> = (0..96)
        .map(|j| {
            let t = std::f64::consts::TAU * j as f64 / 96.0;
            let r = 25.0 + 2.0 * (3.0 * t).cos() + 1.5 * (4.0 * t + 0.5).cos();
            Point2::new(r * t.cos(), r * t.sin())
        })
        .collect();
    let polygon = Polygon::new(points);
    for index in [3, 4] {
        let descriptor = tangent_descriptor(&polygon, index).unwrap();
        let c = descriptor.harmonic(index).unwrap();
        assert!(c.norm() > 1e-3, "harmonic {index} vanished");
        assert!(c.re.abs() < 1e-9 * c.norm(), "harmonic {index}: {c}");
        assert!(c.im < 0.0);
    }
}

#[test]
fn zero_length_edge_is_rejected() {
    let mut points = ellipse(16, Point2::new(0.0, 0.0), 5.0, 5.0);
    points.insert(3, points[3]);
    let err = tangent_descriptor(&Polygon::new(points), 0).unwrap_err();
    assert!(matches!(err, OutlineError::NonSimple(_)), "{err}");
}

#[test]
fn figure_eight_is_rejected() {
    let points: Vec<Point2> = (0..64)
        .map(|j| {
            let t = std::f64::consts::TAU * j as f64 / 64.0;
            Point2::new(10.0 * t.cos(), 10.0 * t.sin() * t.cos())
        })
        .collect();
    let err = tangent_descriptor(&Polygon::new(points), 0).unwrap_err();
    assert!(matches!(err, OutlineError::NonSimple(_)), "{err}");
}

#[test]
fn reconstruction_closes_around_source_centroid() {
    let center = Point2::new(100.0, 80.0);
    let mut m = OutlineMeasurement::new();
    m.set_knots(ellipse(24, center, 30.0, 15.0), true);
    m.set_method(DescriptorMethod::TangentVsArclength);
    m.set_highest_coefficient(10).unwrap();

    let source_centroid = m.centroid().unwrap();
    let length = m.descriptor().unwrap().outline_length().unwrap();
    let reconstruction = m.reconstruction().unwrap().clone();

    assert_eq!(reconstruction.len(), TANGENT_SAMPLES + 1);
    let points = reconstruction.points();
    assert_eq!(points.first(), points.last());

    let ring = Polygon::new(points[..TANGENT_SAMPLES].to_vec());
    let centroid = ring.centroid().unwrap();
    assert!(centroid.distance_to(source_centroid) < 1e-6);
    assert!((ring.perimeter() - length).abs() < 0.01 * length);

    let ellipse_area = std::f64::consts::PI * 30.0 * 15.0;
    assert!((ring.area() - ellipse_area).abs() < 0.05 * ellipse_area);
    assert!(m.diagnostics().closure_iterations.is_some());
}

#[test]
fn reconstruction_with_normalization_keeps_centroid() {
    let mut m = OutlineMeasurement::new();
    m.set_knots(ellipse(24, Point2::new(-20.0, 40.0), 25.0, 10.0), true);
    m.set_method(DescriptorMethod::TangentVsArclength);
    m.set_normalization_index(2).unwrap();

    let source_centroid = m.centroid().unwrap();
    let reconstruction = m.reconstruction().unwrap();
    let ring = Polygon::new(reconstruction.points()[..TANGENT_SAMPLES].to_vec());
    assert!(ring.centroid().unwrap().distance_to(source_centroid) < 1e-6);
}
