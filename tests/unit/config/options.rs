use super::*;
use crate::geometry::quad::CornerOffset;

#[test]
fn empty_request_uses_service_defaults() {
    let req = CardRequest::from_json_str("{}").unwrap();
    assert_eq!(req, CardRequest::default());
    assert_eq!(req.output_format, OutputFormat::Png);

    let spec = req.options.resolve(&PipelineSettings::default()).unwrap();
    assert_eq!(spec.border.style, BorderStyle::Solid);
    assert_eq!(spec.border.color, Rgba8::opaque(59, 130, 246));
    assert_eq!(spec.border.stroke_width, 4.0);
    assert_eq!(spec.border.radii, CornerRadii::uniform(20.0));
    assert_eq!(spec.footer.color, Rgba8::new(0, 0, 0, 179));
    assert_eq!(spec.footer.height, 60);
    assert_eq!(spec.caption.text, DEFAULT_SUBTITLE);
    assert_eq!(spec.caption.color, Rgba8::opaque(204, 204, 204));
    assert_eq!(spec.caption.font_size, 16.0);
    assert_eq!(spec.distortion, Distortion::None);
}

#[test]
fn camel_case_fields_override_defaults() {
    let req = CardRequest::from_json_str(
        r##"{
            "options": {
                "subtitle": "a <b> & c",
                "themeColor": "#ff0000",
                "strokeWidth": 30,
                "borderStyle": "double",
                "borderRadius": { "tl": 5, "br": 0 },
                "footerOpacity": 2.0
            },
            "outputFormat": "webp"
        }"##,
    )
    .unwrap();
    assert_eq!(req.output_format, OutputFormat::Webp);

    let spec = req.options.resolve(&PipelineSettings::default()).unwrap();
    assert_eq!(spec.caption.text, "a b  c");
    assert_eq!(spec.border.style, BorderStyle::Double);
    assert_eq!(spec.border.color, Rgba8::opaque(255, 0, 0));
    assert_eq!(
        spec.border.radii,
        CornerRadii {
            tl: 5.0,
            tr: 20.0,
            bl: 20.0,
            br: 0.0
        }
    );
    assert_eq!(spec.footer.color.a, 255);
}

#[test]
fn distortion_flag_and_offsets() {
    let settings = PipelineSettings::default();
    let resolve = |json: &str| {
        CardRequest::from_json_str(json)
            .unwrap()
            .options
            .resolve(&settings)
            .unwrap()
            .distortion
    };

    assert_eq!(resolve(r#"{"options":{"distortion":true}}"#), Distortion::DefaultTilt);
    assert_eq!(resolve(r#"{"options":{"distortion":false}}"#), Distortion::None);
    assert_eq!(resolve(r#"{"options":{"distortion":null}}"#), Distortion::None);
    assert_eq!(resolve(r#"{"options":{"distortion":{}}}"#), Distortion::None);
    assert_eq!(
        resolve(r#"{"options":{"distortion":{"tr":{"x":-10,"y":4}}}}"#),
        Distortion::Custom(CornerOffsets {
            tr: CornerOffset { x: -10.0, y: 4.0 },
            ..CornerOffsets::default()
        })
    );
}

#[test]
fn invalid_options_are_configuration_errors() {
    let settings = PipelineSettings::default();
    let check = |opts: CardOptions| {
        let err = opts.resolve(&settings).unwrap_err();
        assert!(matches!(err, CardError::InvalidConfiguration(_)), "{err}");
    };

    check(CardOptions {
        border_style: "groove".to_owned(),
        ..CardOptions::default()
    });
    check(CardOptions {
        stroke_width: -1.0,
        ..CardOptions::default()
    });
    check(CardOptions {
        stroke_width: f64::INFINITY,
        ..CardOptions::default()
    });
    check(CardOptions {
        border_radius: CornerRadii::uniform(-3.0),
        ..CardOptions::default()
    });
    check(CardOptions {
        footer_opacity: f64::NAN,
        ..CardOptions::default()
    });
}

#[test]
fn malformed_json_is_serde_error() {
    assert!(matches!(
        CardRequest::from_json_str(r#"{"options":{"themeColor":"blue"}}"#),
        Err(CardError::Serde(_))
    ));
    assert!(matches!(
        CardRequest::from_json_str(r#"{"outputFormat":"gif"}"#),
        Err(CardError::Serde(_))
    ));
    assert!(matches!(
        CardRequest::from_reader("not json".as_bytes()),
        Err(CardError::Serde(_))
    ));
}

#[test]
fn request_round_trips_through_pretty_json() {
    let req = CardRequest {
        output_format: OutputFormat::Jpg,
        ..CardRequest::default()
    };
    let json = req.to_json_pretty().unwrap();
    assert!(json.contains("\"outputFormat\": \"jpg\""));
    assert_eq!(CardRequest::from_json_str(&json).unwrap(), req);
}

#[test]
fn output_format_parses_case_insensitively() {
    assert_eq!("JPEG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpg);
    assert_eq!(OutputFormat::Webp.extension(), "webp");
    assert!("bmp".parse::<OutputFormat>().is_err());
}

#[test]
fn settings_lookup_overrides_and_ignores_garbage() {
    let s = PipelineSettings::from_lookup(|key| match key {
        "PHOTOCARD_MAX_WIDTH" => Some("800".to_owned()),
        "PHOTOCARD_FOOTER_HEIGHT" => Some("tall".to_owned()),
        _ => None,
    });
    assert_eq!(s.max_width, 800);
    assert_eq!(s.footer_height, 60);
    assert_eq!(s.caption_margin, 20.0);

    let zero = PipelineSettings::from_lookup(|_| Some("0".to_owned()));
    assert_eq!(zero, PipelineSettings::default());
}
