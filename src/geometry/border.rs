//! Border stroke descriptions for the three card border styles.

use std::str::FromStr;

use crate::{
    foundation::{
        core::{CornerRadii, Dimensions, Rgba8},
        error::{CardError, CardResult},
    },
    geometry::rounded_rect::{CardPath, rounded_rect_path},
};

/// Supported border styles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BorderStyle {
    /// One continuous stroke.
    #[default]
    Solid,
    /// One stroke with a fixed dash pattern.
    Dashed,
    /// Two thin strokes with a gap of the same width between them.
    Double,
}

impl FromStr for BorderStyle {
    type Err = CardError;

    fn from_str(s: &str) -> CardResult<Self> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "double" => Ok(Self::Double),
            other => Err(CardError::invalid_configuration(format!(
                "unknown border style \"{other}\" (expected solid, dashed or double)"
            ))),
        }
    }
}

/// On/off dash lengths in card pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DashPattern {
    /// Length of each dash.
    pub on: f64,
    /// Length of each gap.
    pub off: f64,
}

impl DashPattern {
    /// Pattern used by the dashed style, independent of stroke width.
    pub const CARD: Self = Self { on: 10.0, off: 8.0 };

    /// `[on, off]`, the form stroke dash arrays take.
    pub fn as_array(self) -> [f64; 2] {
        [self.on, self.off]
    }
}

/// Full description of a card border.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderSpec {
    /// Stroke style.
    pub style: BorderStyle,
    /// Ink color.
    pub color: Rgba8,
    /// Total border thickness measured inward from the card edge.
    pub stroke_width: f64,
    /// Outer card radii; each sub-stroke reduces them for its own inset.
    pub radii: CornerRadii,
}

/// One stroke to draw: an outline, the pen width, and an optional dash.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeDesc {
    /// Centerline of the stroke.
    pub path: CardPath,
    /// Pen width.
    pub width: f64,
    /// Dash pattern, `None` for a continuous stroke.
    pub dash: Option<DashPattern>,
}

/// Expand a border into the strokes that realize it on a `size` card.
///
/// Every stroke is centered on an outline inset by half its own width, so the ink stays
/// within the card. A non-positive width yields no strokes.
pub fn render_border(size: Dimensions, spec: &BorderSpec) -> CardResult<Vec<StrokeDesc>> {
    let w = spec.stroke_width;
    if !w.is_finite() {
        return Err(CardError::invalid_configuration(format!(
            "stroke width must be finite, got {w}"
        )));
    }
    if w <= 0.0 {
        return Ok(Vec::new());
    }

    let stroke = |inset: f64, width: f64, dash: Option<DashPattern>| -> CardResult<StrokeDesc> {
        Ok(StrokeDesc {
            path: rounded_rect_path(size, spec.radii, inset)?,
            width,
            dash,
        })
    };

    match spec.style {
        BorderStyle::Solid => Ok(vec![stroke(w / 2.0, w, None)?]),
        BorderStyle::Dashed => Ok(vec![stroke(w / 2.0, w, Some(DashPattern::CARD))?]),
        BorderStyle::Double => {
            let line = w / 3.0;
            let outer = w / 6.0;
            Ok(vec![
                stroke(outer, line, None)?,
                stroke(w - outer, line, None)?,
            ])
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/border.rs"]
mod tests;
