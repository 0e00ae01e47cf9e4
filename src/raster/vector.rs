use crate::{
    foundation::{
        core::{BezPath, Dimensions, Point, Rect, Rgba8},
        error::{CardError, CardResult},
    },
    geometry::border::DashPattern,
    raster::image::RasterImage,
};

/// One vello_cpu render target sized to the card.
///
/// Draw calls accumulate in the context; [`VectorCanvas::finish`] flushes them into a
/// premultiplied RGBA8 raster.
pub struct VectorCanvas {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl VectorCanvas {
    /// Transparent canvas; either side above `u16::MAX` is `InvalidGeometry`.
    pub fn new(dims: Dimensions) -> CardResult<Self> {
        let width: u16 = dims
            .width
            .try_into()
            .map_err(|_| CardError::invalid_geometry("canvas width exceeds u16"))?;
        let height: u16 = dims
            .height
            .try_into()
            .map_err(|_| CardError::invalid_geometry("canvas height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(CardError::invalid_geometry("canvas must be at least 1x1"));
        }
        Ok(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
        })
    }

    /// Fill `path` (non-zero winding) with a solid color.
    pub fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint(color));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint(color));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            rect.x0, rect.y0, rect.x1, rect.y1,
        ));
    }

    /// Stroke `path` centered on the outline, optionally dashed from offset 0.
    pub fn stroke_path(
        &mut self,
        path: &BezPath,
        width: f64,
        dash: Option<DashPattern>,
        color: Rgba8,
    ) {
        let mut stroke = vello_cpu::kurbo::Stroke::new(width);
        if let Some(dash) = dash {
            stroke = stroke.with_dashes(0.0, dash.as_array());
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_stroke(stroke);
        self.ctx.set_paint(paint(color));
        self.ctx.stroke_path(&bezpath_to_cpu(path));
    }

    /// Direct access for callers that draw glyph runs.
    pub fn context_mut(&mut self) -> &mut vello_cpu::RenderContext {
        &mut self.ctx
    }

    /// Flush pending draws and read the pixels back.
    pub fn finish(mut self) -> RasterImage {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        RasterImage {
            width: u32::from(self.width),
            height: u32::from(self.height),
            channels: 4,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

fn paint(color: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

pub(crate) fn affine_to_cpu(a: kurbo::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/raster/vector.rs"]
mod tests;
