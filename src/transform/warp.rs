//! Perspective warp of a raster into an arbitrary quadrilateral.

use kurbo::Vec2;

use crate::{
    foundation::{
        core::Dimensions,
        error::{CardError, CardResult},
    },
    geometry::quad::{Distortion, Quad},
    raster::image::RasterImage,
    transform::homography::Homography,
};

/// Largest side a warped canvas may have.
pub const MAX_WARP_SIDE: u32 = 32_768;

/// A warped canvas may hold at most this many times the source pixel count.
pub const MAX_WARP_GROWTH: usize = 4;

/// Absolute pixel ceiling for a warped canvas, unless the source itself is larger.
pub const MAX_WARP_PIXELS: usize = 1 << 26;

/// Result of a perspective warp.
#[derive(Clone, Debug)]
pub struct Warped {
    /// Warped pixels; same channel layout and premultiplication as the input.
    pub image: RasterImage,
    /// Destination-canvas to source mapping used for sampling.
    pub homography: Homography,
    /// Canvas origin in unshifted target coordinates (`floor` of the quad bounds).
    pub origin: Vec2,
}

/// Warp `src` according to `distortion`; `Ok(None)` when no warp was requested.
pub fn warp_with_distortion(
    src: &RasterImage,
    distortion: &Distortion,
) -> CardResult<Option<Warped>> {
    match distortion.target_quad(src.dimensions()) {
        Some(target) => warp(src, &target).map(Some),
        None => Ok(None),
    }
}

/// Warp `src` so its corners land on `target` (`tl, tr, br, bl`).
///
/// The output canvas is the integer bounding box of `target`, shifted to the origin. Pixels
/// whose preimage falls outside the sampleable source area are left zeroed.
#[tracing::instrument(level = "debug", skip(src), fields(width = src.width, height = src.height))]
pub fn warp(src: &RasterImage, target: &Quad) -> CardResult<Warped> {
    if !matches!(src.channels, 3 | 4) {
        return Err(CardError::unsupported_channels(src.channels));
    }
    let channels = usize::from(src.channels);
    let expected = src.dimensions().pixel_count() * channels;
    if src.data.len() != expected {
        return Err(CardError::invalid_geometry(format!(
            "source raster has {} bytes, expected {expected}",
            src.data.len()
        )));
    }

    let (canvas, origin) = canvas_for(target, src.dimensions())?;
    let shifted = target.translate(-origin);
    let homography = Homography::solve(&Quad::identity(src.dimensions()), &shifted)?;

    let row_len = canvas.width as usize * channels;
    let mut data = vec![0u8; canvas.pixel_count() * channels];
    for (y, row) in data.chunks_exact_mut(row_len).enumerate() {
        for (x, px) in row.chunks_exact_mut(channels).enumerate() {
            let (u, v) = homography.transform_point(x as f64, y as f64);
            sample_bilinear(src, u, v, px);
        }
    }

    tracing::debug!(
        out_width = canvas.width,
        out_height = canvas.height,
        "perspective warp done"
    );

    Ok(Warped {
        image: RasterImage {
            width: canvas.width,
            height: canvas.height,
            channels: src.channels,
            data,
            premultiplied: src.premultiplied,
        },
        homography,
        origin,
    })
}

/// Canvas size and origin for the integer bounding box of `target`.
///
/// The canvas is limited to [`MAX_WARP_GROWTH`] times the `source` area and to
/// [`MAX_WARP_PIXELS`] overall (a canvas no larger than `source` is always allowed).
pub fn canvas_for(target: &Quad, source: Dimensions) -> CardResult<(Dimensions, Vec2)> {
    if !target.is_finite() {
        return Err(CardError::invalid_geometry("target quad must be finite"));
    }
    let b = target.bounds();
    let (x0, y0) = (b.x0.floor(), b.y0.floor());
    let (x1, y1) = (b.x1.ceil(), b.y1.ceil());

    let side = |lo: f64, hi: f64| -> CardResult<u32> {
        let len = (hi - lo).max(1.0);
        if len > f64::from(MAX_WARP_SIDE) {
            return Err(CardError::invalid_geometry(format!(
                "warped canvas side {len} exceeds {MAX_WARP_SIDE}"
            )));
        }
        Ok(len as u32)
    };

    let dims = Dimensions {
        width: side(x0, x1)?,
        height: side(y0, y1)?,
    };

    let source_px = source.pixel_count();
    let limit = source_px
        .saturating_mul(MAX_WARP_GROWTH)
        .min(MAX_WARP_PIXELS.max(source_px));
    if dims.pixel_count() > limit {
        return Err(CardError::invalid_geometry(format!(
            "warped canvas {}x{} exceeds {limit} pixels for a {}x{} source",
            dims.width, dims.height, source.width, source.height
        )));
    }
    Ok((dims, Vec2::new(x0, y0)))
}

/// Bilinearly sample `src` at `(u, v)` into `out`.
///
/// Only `0 <= u < width - 1` and `0 <= v < height - 1` are sampled so all four neighbours
/// exist; anything else (including non-finite coordinates) zeroes `out` and returns `false`.
#[inline]
pub(crate) fn sample_bilinear(src: &RasterImage, u: f64, v: f64, out: &mut [u8]) -> bool {
    let max_u = f64::from(src.width) - 1.0;
    let max_v = f64::from(src.height) - 1.0;
    if !(u >= 0.0 && u < max_u && v >= 0.0 && v < max_v) {
        out.fill(0);
        return false;
    }

    let channels = usize::from(src.channels);
    let stride = src.width as usize * channels;
    let (x0, y0) = (u.floor(), v.floor());
    let (fx, fy) = (u - x0, v - y0);
    let off00 = y0 as usize * stride + x0 as usize * channels;
    let off10 = off00 + channels;
    let off01 = off00 + stride;
    let off11 = off01 + channels;

    let w00 = (1.0 - fx) * (1.0 - fy);
    let w10 = fx * (1.0 - fy);
    let w01 = (1.0 - fx) * fy;
    let w11 = fx * fy;

    let d = &src.data;
    for (c, o) in out.iter_mut().enumerate().take(channels) {
        let value = f64::from(d[off00 + c]) * w00
            + f64::from(d[off10 + c]) * w10
            + f64::from(d[off01 + c]) * w01
            + f64::from(d[off11 + c]) * w11;
        *o = value.round().clamp(0.0, 255.0) as u8;
    }
    true
}

#[cfg(test)]
#[path = "../../tests/unit/transform/warp.rs"]
mod tests;
