use super::*;

#[test]
fn parses_all_hex_lengths() {
    assert_eq!(CardColor::parse("#3B82F6").unwrap().rgba8(), Rgba8::opaque(59, 130, 246));
    assert_eq!(CardColor::parse("#ccc").unwrap().rgba8(), Rgba8::opaque(204, 204, 204));
    assert_eq!(
        CardColor::parse(" #00000080 ").unwrap().rgba8(),
        Rgba8::new(0, 0, 0, 128)
    );
}

#[test]
fn rejects_malformed_hex() {
    for bad in ["3B82F6", "#12345", "#zzzzzz", "#", "#ééé"] {
        assert!(
            matches!(CardColor::parse(bad), Err(CardError::InvalidConfiguration(_))),
            "{bad}"
        );
    }
}

#[test]
fn deserializes_object_and_array_forms() {
    let c: CardColor = serde_json::from_str(r#"{"r":1,"g":2,"b":3}"#).unwrap();
    assert_eq!(c.rgba8(), Rgba8::opaque(1, 2, 3));

    let c: CardColor = serde_json::from_str("[1,2,3,4]").unwrap();
    assert_eq!(c.rgba8(), Rgba8::new(1, 2, 3, 4));

    assert!(serde_json::from_str::<CardColor>("[1,2]").is_err());
    assert!(serde_json::from_str::<CardColor>(r#""blue""#).is_err());
}

#[test]
fn serializes_back_to_hex() {
    let json = serde_json::to_string(&CardColor(Rgba8::opaque(59, 130, 246))).unwrap();
    assert_eq!(json, r##""#3b82f6""##);
    assert_eq!(CardColor(Rgba8::new(0, 0, 0, 128)).to_hex(), "#00000080");
}
