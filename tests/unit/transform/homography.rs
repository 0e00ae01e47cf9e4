use kurbo::Point;

use super::*;
use crate::foundation::core::Dimensions;

fn quad(pts: [(f64, f64); 4]) -> Quad {
    Quad {
        tl: Point::new(pts[0].0, pts[0].1),
        tr: Point::new(pts[1].0, pts[1].1),
        br: Point::new(pts[2].0, pts[2].1),
        bl: Point::new(pts[3].0, pts[3].1),
    }
}

fn assert_close(a: (f64, f64), b: (f64, f64), tol: f64) {
    assert!(
        (a.0 - b.0).abs() < tol && (a.1 - b.1).abs() < tol,
        "{a:?} != {b:?} (tol {tol})"
    );
}

#[test]
fn unit_square_to_itself_is_identity() {
    let sq = quad([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    let h = Homography::solve(&sq, &sq).unwrap();

    for (got, want) in h
        .coefficients()
        .iter()
        .zip(Homography::IDENTITY.coefficients())
    {
        assert!((got - want).abs() < 1e-6);
    }
    for x in [0.0, 0.25, 0.5, 1.0, 3.0, -2.0] {
        for y in [0.0, 0.1, 0.75, 1.0, 10.0] {
            assert_close(h.transform_point(x, y), (x, y), 1e-6);
        }
    }
}

#[test]
fn ninth_coefficient_is_always_one() {
    let src = Quad::identity(Dimensions {
        width: 200,
        height: 100,
    });
    let dst = quad([(30.0, 7.5), (170.0, 7.5), (200.0, 100.0), (0.0, 100.0)]);
    let h = Homography::solve(&src, &dst).unwrap();
    assert_eq!(h.coefficients()[8], 1.0);
}

#[test]
fn destination_corners_map_back_to_source_corners() {
    let src = Quad::identity(Dimensions {
        width: 200,
        height: 100,
    });
    let dst = quad([(30.0, 7.5), (170.0, 7.5), (200.0, 100.0), (0.0, 100.0)]);
    let h = Homography::solve(&src, &dst).unwrap();

    for (d, s) in dst.points().iter().zip(src.points()) {
        assert_close(h.transform_point(d.x, d.y), (s.x, s.y), 1e-6);
    }
    // Perspective, not affine: the midpoint of the trapezoid is not the source midpoint.
    let (_, v) = h.transform_point(100.0, 53.75);
    assert!((v - 50.0).abs() > 1.0);
}

#[test]
fn collinear_destination_points_are_singular() {
    let src = quad([(0.0, 0.0), (400.0, 0.0), (400.0, 400.0), (0.0, 400.0)]);
    let dst = quad([(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
    let err = Homography::solve(&src, &dst).unwrap_err();
    assert!(matches!(err, CardError::SingularTransform(_)));
}

#[test]
fn three_collinear_or_repeated_corners_are_singular() {
    let src = quad([(0.0, 0.0), (400.0, 0.0), (400.0, 400.0), (0.0, 400.0)]);
    let three_on_a_line = quad([(0.0, 0.0), (100.0, 0.0), (200.0, 0.0), (50.0, 100.0)]);
    assert!(matches!(
        Homography::solve(&src, &three_on_a_line),
        Err(CardError::SingularTransform(_))
    ));

    let repeated = quad([(0.0, 0.0), (400.0, 0.0), (400.0, 400.0), (400.0, 400.0)]);
    assert!(matches!(
        Homography::solve(&src, &repeated),
        Err(CardError::SingularTransform(_))
    ));
}

#[test]
fn non_finite_corners_are_rejected() {
    let src = quad([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    let dst = quad([(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    assert!(Homography::solve(&src, &dst).is_err());
}
