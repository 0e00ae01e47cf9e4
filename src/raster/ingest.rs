//! Decoding and normalizing the source photo before composition.

use anyhow::Context;

use crate::{
    foundation::{
        core::Dimensions,
        error::{CardError, CardResult},
    },
    raster::image::RasterImage,
};

/// Decode an encoded image (PNG, JPEG, WebP, ...) into a straight RGBA8 raster.
pub fn decode_image(bytes: &[u8]) -> CardResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    RasterImage::from_rgba8(width, height, rgba.into_raw())
}

/// Fit `src` into the card size for `max_width` and return it as straight RGBA8.
#[tracing::instrument(level = "debug", skip(src), fields(width = src.width, height = src.height))]
pub fn normalize_source(src: RasterImage, max_width: u32) -> CardResult<RasterImage> {
    let target = Dimensions::fit(src.width, src.height, max_width)?;
    let out = cover_fit(src, target)?;
    tracing::debug!(
        card_width = target.width,
        card_height = target.height,
        "source normalized"
    );
    Ok(out)
}

/// Scale `src` until it covers `target`, then crop the overflow evenly from both sides.
///
/// Always yields straight RGBA8 of exactly `target` size.
pub fn cover_fit(src: RasterImage, target: Dimensions) -> CardResult<RasterImage> {
    let src = src.into_straight().with_alpha()?;
    if src.dimensions() == target {
        return Ok(src);
    }

    let (w, h) = (src.width, src.height);
    let buf = image::RgbaImage::from_raw(w, h, src.data).ok_or_else(|| {
        CardError::invalid_geometry(format!("raster buffer does not match {w}x{h}"))
    })?;

    let scale = (f64::from(target.width) / f64::from(w)).max(f64::from(target.height) / f64::from(h));
    let scaled_w = ((f64::from(w) * scale).round() as u32).max(target.width);
    let scaled_h = ((f64::from(h) * scale).round() as u32).max(target.height);

    let resized = image::imageops::resize(
        &buf,
        scaled_w,
        scaled_h,
        image::imageops::FilterType::Lanczos3,
    );
    let x = (scaled_w - target.width) / 2;
    let y = (scaled_h - target.height) / 2;
    let cropped = image::imageops::crop_imm(&resized, x, y, target.width, target.height).to_image();

    RasterImage::from_rgba8(target.width, target.height, cropped.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/ingest.rs"]
mod tests;
