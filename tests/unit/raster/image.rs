use super::*;

#[test]
fn new_validates_length_and_channels() {
    assert!(RasterImage::new(2, 1, 4, vec![0; 8]).is_ok());
    assert!(matches!(
        RasterImage::new(2, 1, 4, vec![0; 7]),
        Err(CardError::InvalidGeometry(_))
    ));
    assert!(matches!(
        RasterImage::new(2, 1, 2, vec![0; 4]),
        Err(CardError::UnsupportedChannelLayout { channels: 2 })
    ));
    assert!(RasterImage::new(0, 1, 4, vec![]).is_err());
}

#[test]
fn with_alpha_expands_rgb() {
    let img = RasterImage::new(2, 1, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
    let rgba = img.with_alpha().unwrap();
    assert_eq!(rgba.channels, 4);
    assert_eq!(rgba.data, vec![1, 2, 3, 255, 4, 5, 6, 255]);
}

#[test]
fn premul_then_straight_restores_opaque_pixels() {
    let img = RasterImage::from_rgba8(1, 2, vec![10, 20, 30, 255, 255, 255, 255, 0]).unwrap();
    let premul = img.into_premultiplied().unwrap();
    assert!(premul.premultiplied);
    assert_eq!(premul.pixel(1, 0), None);
    assert_eq!(premul.pixel(0, 1), Some(&[0u8, 0, 0, 0][..]));

    let straight = premul.into_straight();
    assert!(!straight.premultiplied);
    assert_eq!(straight.pixel(0, 0), Some(&[10u8, 20, 30, 255][..]));
}

#[test]
fn expect_premul_rgba_rejects_straight_input() {
    let img = RasterImage::filled(Dimensions { width: 1, height: 1 }, [0, 0, 0, 255]);
    assert!(img.expect_premul_rgba("test").is_err());
    let canvas = RasterImage::transparent(Dimensions { width: 1, height: 1 });
    assert!(canvas.expect_premul_rgba("test").is_ok());
}
