use crate::geom::{Orientation, Point2, Polygon, Transform2, Vec2};

fn unit_square() -> Polygon {
    Polygon::new(vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
    ])
}

#[test]
fn square_area_and_orientation() {
    let square = unit_square();
    assert_eq!(square.signed_area(), 1.0);
    assert_eq!(square.orientation(), Orientation::CounterClockwise);
    assert_eq!(square.perimeter(), 4.0);

    let reversed = square.reversed_keep_start();
    assert_eq!(reversed.signed_area(), -1.0);
    assert!(reversed.is_clockwise());
    assert_eq!(reversed.first(), square.first());
    assert_eq!(reversed.points()[1], Point2::new(0.0, 1.0));
}

#[test]
fn centroid_of_square() {
    let c = unit_square().centroid().unwrap();
    assert!(c.distance_to(Point2::new(0.5, 0.5)) < 1e-9);
}

#[test]
fn collinear_points_have_zero_area_and_mean_centroid() {
    let line = Polygon::new(vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(2.0, 2.0),
    ]);
    assert_eq!(line.area(), 0.0);
    assert_eq!(line.orientation(), Orientation::CounterClockwise);
    assert_eq!(line.centroid(), Some(Point2::new(1.0, 1.0)));
}

#[test]
fn empty_polygon_has_no_centroid() {
    assert!(Polygon::default().centroid().is_none());
    assert_eq!(Polygon::default().signed_area(), 0.0);
}

#[test]
fn transform_preserves_area_under_rotation() {
    let square = unit_square();
    let moved = square.transformed(
        Transform2::translate(Vec2::new(5.0, -3.0)).compose(Transform2::rotate(0.7)),
    );
    assert!((moved.area() - 1.0).abs() < 1e-6);
    assert_eq!(moved.orientation(), Orientation::CounterClockwise);
}

#[test]
fn rotated_start_relabels_points() {
    let square = unit_square();
    let rotated = square.rotated_start(2);
    assert_eq!(rotated.first(), Some(Point2::new(1.0, 1.0)));
    assert_eq!(rotated.signed_area(), square.signed_area());
}
