//! Request options, their resolution into a card spec, and pipeline settings.

use std::{io::Read, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    compose::caption::{Caption, sanitize_caption},
    config::color::CardColor,
    foundation::{
        core::{CornerRadii, Rgba8},
        error::{CardError, CardResult},
    },
    geometry::{
        border::{BorderSpec, BorderStyle},
        quad::{CornerOffsets, Distortion},
    },
};

/// Caption used when a request does not set `subtitle`.
pub const DEFAULT_SUBTITLE: &str = "STEP 01 接收用户指令";

/// Encoded output format of a finished card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless with alpha.
    #[default]
    Png,
    /// Lossy, alpha flattened away. Accepts `"jpeg"` too.
    #[serde(alias = "jpeg")]
    Jpg,
    /// Lossless WebP with alpha.
    Webp,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Webp => "webp",
        }
    }

    /// Matching `image` crate format.
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpg => image::ImageFormat::Jpeg,
            Self::Webp => image::ImageFormat::WebP,
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = CardError;

    fn from_str(s: &str) -> CardResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "webp" => Ok(Self::Webp),
            other => Err(CardError::invalid_configuration(format!(
                "unknown output format \"{other}\" (expected png, jpg or webp)"
            ))),
        }
    }
}

/// `distortion` as it appears in JSON: a flag for the default tilt, or explicit offsets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DistortionOption {
    /// `true` for the default tilt, `false` for none.
    Flag(bool),
    /// Explicit per-corner offsets.
    Offsets(CornerOffsets),
}

/// Styling options for one card, with the service defaults for every missing field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardOptions {
    /// Caption text; `<`, `>` and `&` are stripped.
    pub subtitle: String,
    /// Border color.
    pub theme_color: CardColor,
    /// Total border thickness in pixels; 0 disables the border.
    pub stroke_width: f64,
    /// `solid`, `dashed` or `double`.
    pub border_style: String,
    /// Outer corner radii.
    pub border_radius: CornerRadii,
    /// Caption color.
    pub text_color: CardColor,
    /// Footer band color before opacity.
    pub footer_color: CardColor,
    /// Footer opacity, clamped to `[0, 1]`.
    pub footer_opacity: f64,
    /// Preferred caption font family.
    pub font_family: String,
    /// Optional perspective distortion.
    pub distortion: Option<DistortionOption>,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            subtitle: DEFAULT_SUBTITLE.to_owned(),
            theme_color: CardColor(Rgba8::opaque(0x3B, 0x82, 0xF6)),
            stroke_width: 4.0,
            border_style: "solid".to_owned(),
            border_radius: CornerRadii::uniform(20.0),
            text_color: CardColor(Rgba8::opaque(0xCC, 0xCC, 0xCC)),
            footer_color: CardColor(Rgba8::opaque(0, 0, 0)),
            footer_opacity: 0.7,
            font_family: "sans-serif".to_owned(),
            distortion: None,
        }
    }
}

/// Footer band drawn across the bottom of the card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FooterSpec {
    /// Band color with the footer opacity already folded into alpha.
    pub color: Rgba8,
    /// Band height in pixels, capped at the card height when drawn.
    pub height: u32,
}

/// Fully validated, typed form of [`CardOptions`].
#[derive(Clone, Debug, PartialEq)]
pub struct CardSpec {
    /// Border strokes to draw.
    pub border: BorderSpec,
    /// Footer band.
    pub footer: FooterSpec,
    /// Caption text and placement.
    pub caption: Caption,
    /// Warp applied after compositing.
    pub distortion: Distortion,
}

impl CardOptions {
    /// Validate every option and resolve it into the typed values the pipeline consumes.
    pub fn resolve(&self, settings: &PipelineSettings) -> CardResult<CardSpec> {
        let style: BorderStyle = self.border_style.parse()?;

        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(CardError::invalid_configuration(format!(
                "strokeWidth must be finite and >= 0, got {}",
                self.stroke_width
            )));
        }
        self.border_radius
            .validate()
            .map_err(|e| CardError::invalid_configuration(format!("borderRadius: {e}")))?;
        if !self.footer_opacity.is_finite() {
            return Err(CardError::invalid_configuration(
                "footerOpacity must be finite",
            ));
        }

        let distortion = match self.distortion {
            None | Some(DistortionOption::Flag(false)) => Distortion::None,
            Some(DistortionOption::Flag(true)) => Distortion::DefaultTilt,
            Some(DistortionOption::Offsets(offsets)) => {
                let all_finite = [offsets.tl, offsets.tr, offsets.bl, offsets.br]
                    .iter()
                    .all(|o| o.x.is_finite() && o.y.is_finite());
                if !all_finite {
                    return Err(CardError::invalid_configuration(
                        "distortion offsets must be finite",
                    ));
                }
                if offsets.is_zero() {
                    Distortion::None
                } else {
                    Distortion::Custom(offsets)
                }
            }
        };

        Ok(CardSpec {
            border: BorderSpec {
                style,
                color: self.theme_color.rgba8(),
                stroke_width: self.stroke_width,
                radii: self.border_radius,
            },
            footer: FooterSpec {
                color: self.footer_color.rgba8().with_opacity(self.footer_opacity),
                height: settings.footer_height,
            },
            caption: Caption {
                text: sanitize_caption(&self.subtitle),
                color: self.text_color.rgba8(),
                font_family: self.font_family.clone(),
                font_size: settings.caption_font_size,
                x: settings.caption_margin,
                baseline_offset: settings.caption_baseline_offset,
            },
            distortion,
        })
    }
}

/// One card request: styling options plus the encoding of the result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardRequest {
    /// Card styling.
    pub options: CardOptions,
    /// Encoding of the stored card.
    pub output_format: OutputFormat,
}

impl CardRequest {
    /// Parse a request from JSON text.
    pub fn from_json_str(s: &str) -> CardResult<Self> {
        serde_json::from_str(s).map_err(|e| CardError::serde(e.to_string()))
    }

    /// Parse a request from a JSON reader.
    pub fn from_reader(reader: impl Read) -> CardResult<Self> {
        serde_json::from_reader(reader).map_err(|e| CardError::serde(e.to_string()))
    }

    /// Parse a request from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> CardResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("open card request {}", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Pretty-printed JSON, colors as hex strings.
    pub fn to_json_pretty(&self) -> CardResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CardError::serde(e.to_string()))
    }
}

/// Fixed layout constants of the card pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineSettings {
    /// Cards wider than this are scaled down.
    pub max_width: u32,
    /// Height of the footer band.
    pub footer_height: u32,
    /// Caption font size in pixels.
    pub caption_font_size: f32,
    /// Left edge of the caption.
    pub caption_margin: f64,
    /// Distance from the bottom edge to the caption baseline.
    pub caption_baseline_offset: f64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_width: 1200,
            footer_height: 60,
            caption_font_size: 16.0,
            caption_margin: 20.0,
            caption_baseline_offset: 25.0,
        }
    }
}

impl PipelineSettings {
    /// Defaults overridden by `PHOTOCARD_MAX_WIDTH` and `PHOTOCARD_FOOTER_HEIGHT`.
    ///
    /// Unparseable or zero values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PipelineSettings::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|&n| n > 0)
        };
        let defaults = Self::default();
        Self {
            max_width: read("PHOTOCARD_MAX_WIDTH").unwrap_or(defaults.max_width),
            footer_height: read("PHOTOCARD_FOOTER_HEIGHT").unwrap_or(defaults.footer_height),
            ..defaults
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/options.rs"]
mod tests;
