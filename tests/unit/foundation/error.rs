use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CardError::invalid_geometry("x")
            .to_string()
            .contains("invalid geometry:")
    );
    assert!(
        CardError::invalid_configuration("x")
            .to_string()
            .contains("invalid configuration:")
    );
    assert!(
        CardError::singular_transform("x")
            .to_string()
            .contains("singular transform:")
    );
    assert_eq!(
        CardError::unsupported_channels(2).to_string(),
        "unsupported channel layout: 2 channels"
    );
    assert!(
        CardError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn kind_separates_configuration_from_numeric() {
    assert_eq!(
        CardError::invalid_configuration("bad style").kind(),
        ErrorKind::Configuration
    );
    assert_eq!(
        CardError::invalid_geometry("inset").kind(),
        ErrorKind::Configuration
    );
    assert_eq!(
        CardError::unsupported_channels(1).kind(),
        ErrorKind::Configuration
    );
    assert_eq!(
        CardError::singular_transform("pivot").kind(),
        ErrorKind::Numeric
    );
    assert_eq!(
        CardError::Other(anyhow::anyhow!("disk full")).kind(),
        ErrorKind::External
    );
}
