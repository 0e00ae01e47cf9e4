/// Convenience result type used across photocard.
pub type CardResult<T> = Result<T, CardError>;

/// Top-level error taxonomy used by the card pipeline.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// Non-positive dimensions, insets beyond half the shorter side, malformed radii.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Unrecognized or out-of-range request options.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The homography system could not be solved numerically.
    #[error("singular transform: {0}")]
    SingularTransform(String),

    /// A raster carries a channel count the pipeline cannot process.
    #[error("unsupported channel layout: {channels} channels")]
    UnsupportedChannelLayout {
        /// Channel count found on the raster.
        channels: u8,
    },

    /// Errors when serializing or deserializing request data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from codecs or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of a [`CardError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied something that can never succeed as given.
    Configuration,
    /// Numeric failure while solving or applying a transform.
    Numeric,
    /// Codec, IO or other collaborator failure.
    External,
}

impl CardError {
    /// Build a [`CardError::InvalidGeometry`] value.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Build a [`CardError::InvalidConfiguration`] value.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Build a [`CardError::SingularTransform`] value.
    pub fn singular_transform(msg: impl Into<String>) -> Self {
        Self::SingularTransform(msg.into())
    }

    /// Build a [`CardError::UnsupportedChannelLayout`] value.
    pub fn unsupported_channels(channels: u8) -> Self {
        Self::UnsupportedChannelLayout { channels }
    }

    /// Build a [`CardError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Classify the error so callers can tell configuration mistakes from numeric failures.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidGeometry(_)
            | Self::InvalidConfiguration(_)
            | Self::UnsupportedChannelLayout { .. }
            | Self::Serde(_) => ErrorKind::Configuration,
            Self::SingularTransform(_) => ErrorKind::Numeric,
            Self::Other(_) => ErrorKind::External,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
