//! Quadrilaterals and the distortion variants that produce them.

use kurbo::{Point, Rect, Vec2};

use crate::foundation::core::Dimensions;

/// Horizontal inward shift of the top corners for the default tilt, as a fraction of width.
pub const TILT_FACTOR: f64 = 0.15;

/// Four corner points in `tl, tr, br, bl` order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    /// Top-left.
    pub tl: Point,
    /// Top-right.
    pub tr: Point,
    /// Bottom-right.
    pub br: Point,
    /// Bottom-left.
    pub bl: Point,
}

impl Quad {
    /// Corners of a `size` raster: `(0,0) (w,0) (w,h) (0,h)`.
    pub fn identity(size: Dimensions) -> Self {
        let (w, h) = (f64::from(size.width), f64::from(size.height));
        Self {
            tl: Point::new(0.0, 0.0),
            tr: Point::new(w, 0.0),
            br: Point::new(w, h),
            bl: Point::new(0.0, h),
        }
    }

    /// Corners in correspondence order.
    pub fn points(&self) -> [Point; 4] {
        [self.tl, self.tr, self.br, self.bl]
    }

    /// Move every corner by `delta`.
    pub fn translate(self, delta: Vec2) -> Self {
        Self {
            tl: self.tl + delta,
            tr: self.tr + delta,
            br: self.br + delta,
            bl: self.bl + delta,
        }
    }

    /// Exact axis-aligned bounds of the four corners.
    pub fn bounds(&self) -> Rect {
        let [first, rest @ ..] = self.points();
        rest.iter()
            .fold(Rect::from_points(first, first), |r, p| r.union_pt(*p))
    }

    /// No corner has a NaN or infinite coordinate.
    pub fn is_finite(&self) -> bool {
        self.points().iter().all(|p| p.is_finite())
    }
}

/// Displacement of one corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CornerOffset {
    /// Horizontal shift in pixels.
    #[serde(default)]
    pub x: f64,
    /// Vertical shift in pixels, positive downwards.
    #[serde(default)]
    pub y: f64,
}

impl CornerOffset {
    /// The offset as a kurbo vector.
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Per-corner displacements; missing corners stay put.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CornerOffsets {
    /// Top-left.
    pub tl: CornerOffset,
    /// Top-right.
    pub tr: CornerOffset,
    /// Bottom-left.
    pub bl: CornerOffset,
    /// Bottom-right.
    pub br: CornerOffset,
}

impl CornerOffsets {
    /// Every corner stays where it is.
    pub fn is_zero(&self) -> bool {
        [self.tl, self.tr, self.bl, self.br]
            .iter()
            .all(|o| o.x == 0.0 && o.y == 0.0)
    }

    /// Displace the corners of `quad`.
    pub fn apply(&self, quad: Quad) -> Quad {
        Quad {
            tl: quad.tl + self.tl.to_vec2(),
            tr: quad.tr + self.tr.to_vec2(),
            br: quad.br + self.br.to_vec2(),
            bl: quad.bl + self.bl.to_vec2(),
        }
    }
}

/// Requested perspective distortion, resolved once from the request options.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Distortion {
    /// Leave the card flat.
    #[default]
    None,
    /// Lean the card back: top corners move inward and down, bottom corners stay.
    DefaultTilt,
    /// Move each corner by its own offset.
    Custom(CornerOffsets),
}

impl Distortion {
    /// Where the corners of a `size` raster should land, or `None` for a flat card.
    pub fn target_quad(&self, size: Dimensions) -> Option<Quad> {
        let identity = Quad::identity(size);
        match self {
            Self::None => None,
            Self::DefaultTilt => {
                let (w, h) = (f64::from(size.width), f64::from(size.height));
                let dx = w * TILT_FACTOR;
                let dy = h * TILT_FACTOR / 2.0;
                Some(Quad {
                    tl: identity.tl + Vec2::new(dx, dy),
                    tr: identity.tr + Vec2::new(-dx, dy),
                    ..identity
                })
            }
            Self::Custom(offsets) => Some(offsets.apply(identity)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/quad.rs"]
mod tests;
