//! Caption text for the footer band.

use std::{borrow::Cow, path::Path};

use anyhow::Context;

use crate::{
    foundation::{
        core::{Dimensions, Rgba8, Vec2},
        error::{CardError, CardResult},
    },
    raster::{
        image::RasterImage,
        vector::{VectorCanvas, affine_to_cpu},
    },
};

/// Strip the characters that would break markup-based consumers of the caption.
pub fn sanitize_caption(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '<' | '>' | '&'))
        .collect()
}

/// Caption placement and styling, resolved from the request.
#[derive(Clone, Debug, PartialEq)]
pub struct Caption {
    /// Already sanitized text.
    pub text: String,
    /// Text color.
    pub color: Rgba8,
    /// Requested family; renderers may substitute the font they were built with.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Left edge of the first glyph.
    pub x: f64,
    /// Distance from the bottom card edge to the baseline.
    pub baseline_offset: f64,
}

impl Caption {
    /// Baseline position on a card `card_height` pixels tall.
    pub fn baseline_y(&self, card_height: u32) -> f64 {
        f64::from(card_height) - self.baseline_offset
    }
}

/// Turns a [`Caption`] into a premultiplied RGBA8 overlay the size of the card.
///
/// `Ok(None)` means nothing to draw.
pub trait CaptionRenderer {
    /// Draw `caption` onto a transparent `size` overlay.
    fn render(&mut self, caption: &Caption, size: Dimensions) -> CardResult<Option<RasterImage>>;
}

/// Renderer used when no font is available; always draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCaption;

impl CaptionRenderer for NoCaption {
    fn render(&mut self, caption: &Caption, _size: Dimensions) -> CardResult<Option<RasterImage>> {
        if !caption.text.trim().is_empty() {
            tracing::warn!("no caption font configured, skipping caption");
        }
        Ok(None)
    }
}

impl<R: CaptionRenderer> CaptionRenderer for Option<R> {
    fn render(&mut self, caption: &Caption, size: Dimensions) -> CardResult<Option<RasterImage>> {
        match self {
            Some(r) => r.render(caption, size),
            None => NoCaption.render(caption, size),
        }
    }
}

/// Lays out captions with parley and fills the glyph runs with vello_cpu.
pub struct ParleyCaptionRenderer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl ParleyCaptionRenderer {
    /// Register `font_bytes` (TTF/OTF) as the caption font.
    pub fn new(font_bytes: Vec<u8>) -> CardResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            CardError::invalid_configuration("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardError::invalid_configuration("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    /// Read the caption font from a file.
    pub fn from_path(path: impl AsRef<Path>) -> CardResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read caption font {}", path.display()))?;
        Self::new(bytes)
    }

    /// Family name read from the registered font.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }
}

impl CaptionRenderer for ParleyCaptionRenderer {
    fn render(&mut self, caption: &Caption, size: Dimensions) -> CardResult<Option<RasterImage>> {
        if !caption.font_size.is_finite() || caption.font_size <= 0.0 {
            return Err(CardError::invalid_configuration(format!(
                "caption font size must be finite and > 0, got {}",
                caption.font_size
            )));
        }
        if caption.text.trim().is_empty() {
            return Ok(None);
        }
        if !caption.font_family.eq_ignore_ascii_case(&self.family_name) {
            tracing::debug!(
                requested = %caption.font_family,
                using = %self.family_name,
                "caption family substituted"
            );
        }

        let mut builder =
            self.layout_ctx
                .ranged_builder(&mut self.font_ctx, &caption.text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Borrowed(&self.family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(caption.font_size));
        builder.push_default(parley::style::StyleProperty::Brush(caption.color));
        let mut layout: parley::Layout<Rgba8> = builder.build(&caption.text);
        layout.break_all_lines(None);

        let Some(first_line) = layout.lines().next() else {
            return Ok(None);
        };
        let first_baseline = f64::from(first_line.metrics().baseline);
        let origin = Vec2::new(caption.x, caption.baseline_y(size.height) - first_baseline);

        let mut canvas = VectorCanvas::new(size)?;
        let ctx = canvas.context_mut();
        ctx.set_transform(affine_to_cpu(kurbo::Affine::translate(origin)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        Ok(Some(canvas.finish()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/caption.rs"]
mod tests;
