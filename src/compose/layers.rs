//! Ordered card layers and the compositor that flattens them.

use crate::{
    compose::caption::{Caption, CaptionRenderer},
    config::options::CardSpec,
    foundation::{
        core::{BezPath, Dimensions, Rect, Rgba8},
        error::{CardError, CardResult},
    },
    geometry::{
        border::{StrokeDesc, render_border},
        rounded_rect::rounded_rect_path,
    },
    raster::{
        blend::{BlendOp, blend_in_place},
        image::RasterImage,
        vector::VectorCanvas,
    },
};

/// Stacking slot of a layer. Layers draw in this order regardless of insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerKind {
    /// The cover-fitted photo.
    Base,
    /// Translucent band along the bottom edge.
    Footer,
    /// Caption text over the footer.
    Caption,
    /// Border strokes.
    Border,
    /// Rounded-corner clip.
    Mask,
}

/// What a layer draws.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerPaint {
    /// Full-card raster, straight or premultiplied, RGB or RGBA.
    Raster(RasterImage),
    /// Solid axis-aligned rectangle.
    Rect {
        /// Area to fill.
        rect: Rect,
        /// Fill color.
        color: Rgba8,
    },
    /// Solid path fill.
    Fill {
        /// Outline to fill.
        path: BezPath,
        /// Fill color.
        color: Rgba8,
    },
    /// One border stroke.
    Stroke {
        /// Outline, width and dash.
        stroke: StrokeDesc,
        /// Ink color.
        color: Rgba8,
    },
    /// Text drawn through the caller's [`CaptionRenderer`].
    Caption(Caption),
}

/// One entry of a [`LayerStack`].
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Stacking slot.
    pub kind: LayerKind,
    /// How the layer combines with what is below it.
    pub blend: BlendOp,
    /// What the layer draws.
    pub paint: LayerPaint,
}

impl Layer {
    /// Layer blended source-over.
    pub fn over(kind: LayerKind, paint: LayerPaint) -> Self {
        Self {
            kind,
            blend: BlendOp::Over,
            paint,
        }
    }
}

/// Layers kept sorted by [`LayerKind`]; equal kinds keep insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `layer` after every layer of the same or a lower kind.
    pub fn push(&mut self, layer: Layer) {
        let at = self.layers.partition_point(|l| l.kind <= layer.kind);
        self.layers.insert(at, layer);
    }

    /// Layers in draw order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Kind of each layer, in draw order.
    pub fn kinds(&self) -> Vec<LayerKind> {
        self.layers.iter().map(|l| l.kind).collect()
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// No layers yet.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Build the full card stack for `base`: photo, footer band, caption, border strokes and
    /// the rounded-corner mask.
    ///
    /// All geometry is validated here, before any pixel work.
    pub fn for_card(base: RasterImage, spec: &CardSpec) -> CardResult<Self> {
        let size = base.dimensions();
        let (w, h) = (f64::from(size.width), f64::from(size.height));
        let strokes = render_border(size, &spec.border)?;
        let mask = rounded_rect_path(size, spec.border.radii, 0.0)?;

        let mut stack = Self::new();
        stack.push(Layer::over(LayerKind::Base, LayerPaint::Raster(base)));

        let footer_h = f64::from(spec.footer.height.min(size.height));
        if footer_h > 0.0 && spec.footer.color.a > 0 {
            stack.push(Layer::over(
                LayerKind::Footer,
                LayerPaint::Rect {
                    rect: Rect::new(0.0, h - footer_h, w, h),
                    color: spec.footer.color,
                },
            ));
        }

        stack.push(Layer::over(
            LayerKind::Caption,
            LayerPaint::Caption(spec.caption.clone()),
        ));

        for stroke in strokes {
            stack.push(Layer::over(
                LayerKind::Border,
                LayerPaint::Stroke {
                    stroke,
                    color: spec.border.color,
                },
            ));
        }

        stack.push(Layer {
            kind: LayerKind::Mask,
            blend: BlendOp::DestinationIn,
            paint: LayerPaint::Fill {
                path: mask.path,
                color: Rgba8::opaque(255, 255, 255),
            },
        });

        Ok(stack)
    }
}

/// Flatten `stack` onto a transparent `size` canvas.
///
/// Returns premultiplied RGBA8.
#[tracing::instrument(level = "debug", skip(stack, captions), fields(layers = stack.len()))]
pub fn composite(
    size: Dimensions,
    stack: &LayerStack,
    captions: &mut dyn CaptionRenderer,
) -> CardResult<RasterImage> {
    let mut card = RasterImage::transparent(size);

    for layer in stack.layers() {
        let Some(overlay) = rasterize(size, &layer.paint, captions)? else {
            tracing::debug!(kind = ?layer.kind, "layer drew nothing");
            continue;
        };
        blend_in_place(&mut card.data, &overlay.data, layer.blend)?;
    }

    Ok(card)
}

fn rasterize(
    size: Dimensions,
    paint: &LayerPaint,
    captions: &mut dyn CaptionRenderer,
) -> CardResult<Option<RasterImage>> {
    let overlay = match paint {
        LayerPaint::Raster(img) => {
            if img.dimensions() != size {
                return Err(CardError::invalid_geometry(format!(
                    "raster layer is {}x{}, card is {}x{}",
                    img.width, img.height, size.width, size.height
                )));
            }
            img.clone().into_premultiplied()?
        }
        LayerPaint::Rect { rect, color } => {
            let mut canvas = VectorCanvas::new(size)?;
            canvas.fill_rect(*rect, *color);
            canvas.finish()
        }
        LayerPaint::Fill { path, color } => {
            let mut canvas = VectorCanvas::new(size)?;
            canvas.fill_path(path, *color);
            canvas.finish()
        }
        LayerPaint::Stroke { stroke, color } => {
            let mut canvas = VectorCanvas::new(size)?;
            canvas.stroke_path(&stroke.path.path, stroke.width, stroke.dash, *color);
            canvas.finish()
        }
        LayerPaint::Caption(caption) => match captions.render(caption, size)? {
            Some(img) => {
                img.expect_premul_rgba("caption overlay")?;
                if img.dimensions() != size {
                    return Err(CardError::invalid_geometry(
                        "caption overlay does not match card size",
                    ));
                }
                img
            }
            None => return Ok(None),
        },
    };
    Ok(Some(overlay))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/layers.rs"]
mod tests;
