use super::*;
use crate::foundation::core::Dimensions;

fn card() -> RasterImage {
    let mut img = RasterImage::filled(Dimensions::new(4, 2).unwrap(), [10, 20, 30, 255]);
    img.data[3] = 0;
    img
}

#[test]
fn png_keeps_alpha() {
    let bytes = encode_card(&card(), OutputFormat::Png).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (4, 2));
    assert_eq!(decoded.get_pixel(0, 0).0[3], 0);
    assert_eq!(decoded.get_pixel(1, 0).0, [10, 20, 30, 255]);
}

#[test]
fn jpg_drops_alpha() {
    let bytes = encode_card(&card(), OutputFormat::Jpg).unwrap();
    assert_eq!(
        image::guess_format(&bytes).unwrap(),
        image::ImageFormat::Jpeg
    );
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert!(!decoded.color().has_alpha());
}

#[test]
fn premultiplied_cards_are_unpremultiplied_before_encoding() {
    let premul = RasterImage::filled(Dimensions::new(1, 1).unwrap(), [100, 0, 0, 128])
        .into_premultiplied()
        .unwrap();
    let bytes = encode_card(&premul, OutputFormat::Png).unwrap();
    let px = image::load_from_memory(&bytes).unwrap().to_rgba8().get_pixel(0, 0).0;
    assert!(px[0].abs_diff(100) <= 1 && px[3] == 128, "{px:?}");
}

#[test]
fn file_sink_writes_uuid_named_card() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FileSink::new(dir.path().join("nested"));
    let location = sink.store(&card(), OutputFormat::Webp).unwrap();

    let path = std::path::Path::new(&location);
    assert!(path.exists());
    assert_eq!(path.parent(), Some(sink.dir()));
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("card-") && name.ends_with(".webp"), "{name}");

    let other = sink.store(&card(), OutputFormat::Webp).unwrap();
    assert_ne!(location, other);
}

#[test]
fn memory_sink_keeps_encoded_bytes() {
    let mut sink = MemorySink::new();
    assert_eq!(
        sink.store(&card(), OutputFormat::Png).unwrap(),
        "memory://card-0.png"
    );
    assert_eq!(
        sink.store(&card(), OutputFormat::Jpg).unwrap(),
        "memory://card-1.jpg"
    );
    assert_eq!(sink.cards().len(), 2);
    assert_eq!(
        image::guess_format(&sink.cards()[0].bytes).unwrap(),
        image::ImageFormat::Png
    );
}
