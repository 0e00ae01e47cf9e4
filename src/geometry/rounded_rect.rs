//! Rounded-rectangle outlines with independent corner radii.

use std::f64::consts::{FRAC_PI_2, PI};

use kurbo::{Arc, BezPath, Point, Rect, Vec2};

use crate::foundation::{
    core::{CornerRadii, Dimensions},
    error::{CardError, CardResult},
};

/// Flattening tolerance used when approximating corner arcs with cubics.
const ARC_TOLERANCE: f64 = 0.1;

/// Closed outline of a (possibly inset) rounded rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct CardPath {
    /// Rectangle the outline traces, already inset.
    pub bounds: Rect,
    /// Radii actually used for each corner arc.
    pub radii: CornerRadii,
    /// Distance of the outline from the outer card edge.
    pub inset: f64,
    /// Clockwise path: top edge, TR arc, right edge, BR arc, bottom edge, BL arc, left edge, TL arc.
    pub path: BezPath,
}

impl CardPath {
    /// SVG path data, handy for debugging and snapshots.
    pub fn to_svg(&self) -> String {
        self.path.to_svg()
    }
}

/// Build the outline of a `size` card with `radii`, pulled in by `inset` on every side.
///
/// Each radius is clamped to half the shorter inset side, then shrunk by `inset` so that a
/// stroke centered on the outline keeps a consistent curvature with the outer edge.
pub fn rounded_rect_path(
    size: Dimensions,
    radii: CornerRadii,
    inset: f64,
) -> CardResult<CardPath> {
    radii.validate()?;
    if !inset.is_finite() || inset < 0.0 {
        return Err(CardError::invalid_geometry(format!(
            "inset must be finite and >= 0, got {inset}"
        )));
    }

    let (w, h) = (f64::from(size.width), f64::from(size.height));
    let usable_w = w - 2.0 * inset;
    let usable_h = h - 2.0 * inset;
    if w <= 0.0 || h <= 0.0 || usable_w <= 0.0 || usable_h <= 0.0 {
        return Err(CardError::invalid_geometry(format!(
            "inset {inset} leaves no area inside a {}x{} card",
            size.width, size.height
        )));
    }

    let max_r = usable_w.min(usable_h) / 2.0;
    let effective = radii.map(|r| (r.min(max_r) - inset).max(0.0));

    let bounds = Rect::new(inset, inset, inset + usable_w, inset + usable_h);
    let path = trace_outline(bounds, effective);

    Ok(CardPath {
        bounds,
        radii: effective,
        inset,
        path,
    })
}

fn trace_outline(b: Rect, r: CornerRadii) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((b.x0 + r.tl, b.y0));

    path.line_to((b.x1 - r.tr, b.y0));
    corner(&mut path, Point::new(b.x1 - r.tr, b.y0 + r.tr), r.tr, -FRAC_PI_2);

    path.line_to((b.x1, b.y1 - r.br));
    corner(&mut path, Point::new(b.x1 - r.br, b.y1 - r.br), r.br, 0.0);

    path.line_to((b.x0 + r.bl, b.y1));
    corner(&mut path, Point::new(b.x0 + r.bl, b.y1 - r.bl), r.bl, FRAC_PI_2);

    path.line_to((b.x0, b.y0 + r.tl));
    corner(&mut path, Point::new(b.x0 + r.tl, b.y0 + r.tl), r.tl, PI);

    path.close_path();
    path
}

// Quarter turn, clockwise in y-down space.
fn corner(path: &mut BezPath, center: Point, radius: f64, start_angle: f64) {
    if radius <= 0.0 {
        return;
    }
    let arc = Arc::new(
        center,
        Vec2::new(radius, radius),
        start_angle,
        FRAC_PI_2,
        0.0,
    );
    path.extend(arc.append_iter(ARC_TOLERANCE));
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/rounded_rect.rs"]
mod tests;
