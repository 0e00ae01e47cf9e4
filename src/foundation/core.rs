//! Small value types shared by every stage.

use crate::foundation::error::{CardError, CardResult};

pub use kurbo::{BezPath, Point, Rect, Vec2};

/// Card dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Validated dimensions; zero on either side is `InvalidGeometry`.
    pub fn new(width: u32, height: u32) -> CardResult<Self> {
        if width == 0 || height == 0 {
            return Err(CardError::invalid_geometry(format!(
                "dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Scale `width x height` down to at most `max_width` (aspect preserved, height rounded),
    /// then round both sides down to the nearest even number.
    pub fn fit(width: u32, height: u32, max_width: u32) -> CardResult<Self> {
        if width == 0 || height == 0 {
            return Err(CardError::invalid_geometry(format!(
                "source dimensions must be positive, got {width}x{height}"
            )));
        }
        if max_width < 2 {
            return Err(CardError::invalid_configuration(
                "max width must be >= 2",
            ));
        }

        let (mut w, mut h) = (width, height);
        if w > max_width {
            let ratio = f64::from(max_width) / f64::from(w);
            w = max_width;
            h = (f64::from(height) * ratio).round() as u32;
        }

        Self::new(w / 2 * 2, h / 2 * 2)
    }

    /// `width * height`.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Per-corner radii of a rounded rectangle.
///
/// Corners missing from a serialized value fall back to the default radius.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CornerRadii {
    /// Top-left.
    pub tl: f64,
    /// Top-right.
    pub tr: f64,
    /// Bottom-left.
    pub bl: f64,
    /// Bottom-right.
    pub br: f64,
}

impl CornerRadii {
    /// The same radius on every corner.
    pub const fn uniform(r: f64) -> Self {
        Self {
            tl: r,
            tr: r,
            bl: r,
            br: r,
        }
    }

    /// Apply `f` to each corner.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            tl: f(self.tl),
            tr: f(self.tr),
            bl: f(self.bl),
            br: f(self.br),
        }
    }

    /// Largest of the four radii.
    pub fn max(self) -> f64 {
        self.tl.max(self.tr).max(self.bl).max(self.br)
    }

    /// Every radius must be finite and non-negative.
    pub fn validate(self) -> CardResult<()> {
        for (name, r) in [
            ("tl", self.tl),
            ("tr", self.tr),
            ("bl", self.bl),
            ("br", self.br),
        ] {
            if !r.is_finite() || r < 0.0 {
                return Err(CardError::invalid_geometry(format!(
                    "corner radius {name} must be finite and >= 0, got {r}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for CornerRadii {
    fn default() -> Self {
        Self::uniform(20.0)
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Color from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Color with alpha 255.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Scale alpha by `opacity` (clamped to `[0, 1]`).
    pub fn with_opacity(self, opacity: f64) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        let a = (f64::from(self.a) * opacity).round().clamp(0.0, 255.0) as u8;
        Self { a, ..self }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
