use super::*;

const SIZE: Dimensions = Dimensions {
    width: 200,
    height: 100,
};

#[test]
fn default_tilt_moves_only_top_corners() {
    let q = Distortion::DefaultTilt.target_quad(SIZE).unwrap();
    assert_eq!(q.tl, Point::new(30.0, 7.5));
    assert_eq!(q.tr, Point::new(170.0, 7.5));
    assert_eq!(q.br, Point::new(200.0, 100.0));
    assert_eq!(q.bl, Point::new(0.0, 100.0));
    assert_eq!(q.bounds(), Rect::new(0.0, 7.5, 200.0, 100.0));
}

#[test]
fn custom_offsets_default_missing_corners_to_zero() {
    let offsets = CornerOffsets {
        br: CornerOffset { x: 12.0, y: -4.0 },
        ..CornerOffsets::default()
    };
    let q = Distortion::Custom(offsets).target_quad(SIZE).unwrap();
    assert_eq!(q.tl, Point::new(0.0, 0.0));
    assert_eq!(q.br, Point::new(212.0, 96.0));
    assert!(!offsets.is_zero());
    assert!(CornerOffsets::default().is_zero());
}

#[test]
fn no_distortion_has_no_target() {
    assert_eq!(Distortion::None.target_quad(SIZE), None);
}
