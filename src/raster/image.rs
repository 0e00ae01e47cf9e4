use crate::foundation::{
    core::Dimensions,
    error::{CardError, CardResult},
    math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
};

/// Row-major interleaved 8-bit raster.
///
/// This is the boundary type of the crate: callers hand in decoded pixels and receive the
/// finished card the same way. Working buffers inside the compositor are premultiplied RGBA8
/// (`premultiplied == true`); everything crossing the public pipeline boundary is straight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Interleaved channels per pixel (3 = RGB, 4 = RGBA).
    pub channels: u8,
    /// Pixel bytes, `width * height * channels` long.
    pub data: Vec<u8>,
    /// Whether color channels are already multiplied by alpha.
    pub premultiplied: bool,
}

impl RasterImage {
    /// Wrap an interleaved straight-alpha buffer, validating its length and channel layout.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> CardResult<Self> {
        if !matches!(channels, 3 | 4) {
            return Err(CardError::unsupported_channels(channels));
        }
        if width == 0 || height == 0 {
            return Err(CardError::invalid_geometry(format!(
                "raster dimensions must be positive, got {width}x{height}"
            )));
        }
        let expected = width as usize * height as usize * usize::from(channels);
        if data.len() != expected {
            return Err(CardError::invalid_geometry(format!(
                "raster byte length {} does not match {width}x{height}x{channels} ({expected})",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
            premultiplied: false,
        })
    }

    /// Straight RGBA8 raster.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> CardResult<Self> {
        Self::new(width, height, 4, data)
    }

    /// Fully transparent premultiplied RGBA8 canvas.
    pub fn transparent(dims: Dimensions) -> Self {
        Self {
            width: dims.width,
            height: dims.height,
            channels: 4,
            data: vec![0; dims.pixel_count() * 4],
            premultiplied: true,
        }
    }

    /// Straight RGBA8 raster filled with one color.
    pub fn filled(dims: Dimensions, rgba: [u8; 4]) -> Self {
        Self {
            width: dims.width,
            height: dims.height,
            channels: 4,
            data: rgba.repeat(dims.pixel_count()),
            premultiplied: false,
        }
    }

    /// Width and height as [`Dimensions`].
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// Bytes of the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let c = usize::from(self.channels);
        let off = (y as usize * self.width as usize + x as usize) * c;
        self.data.get(off..off + c)
    }

    /// Return an RGBA copy, adding an opaque alpha channel to RGB input.
    pub fn with_alpha(self) -> CardResult<Self> {
        match self.channels {
            4 => Ok(self),
            3 => {
                let mut data = Vec::with_capacity(self.data.len() / 3 * 4);
                for px in self.data.chunks_exact(3) {
                    data.extend_from_slice(&[px[0], px[1], px[2], 255]);
                }
                Ok(Self {
                    channels: 4,
                    data,
                    ..self
                })
            }
            other => Err(CardError::unsupported_channels(other)),
        }
    }

    /// Convert to premultiplied RGBA8 (adds alpha first when needed).
    pub fn into_premultiplied(self) -> CardResult<Self> {
        let mut out = self.with_alpha()?;
        if !out.premultiplied {
            premultiply_rgba8_in_place(&mut out.data);
            out.premultiplied = true;
        }
        Ok(out)
    }

    /// Convert to straight RGBA8.
    pub fn into_straight(mut self) -> Self {
        if self.premultiplied && self.channels == 4 {
            unpremultiply_rgba8_in_place(&mut self.data);
        }
        self.premultiplied = false;
        self
    }

    pub(crate) fn expect_premul_rgba(&self, what: &str) -> CardResult<()> {
        if self.channels != 4 {
            return Err(CardError::unsupported_channels(self.channels));
        }
        if !self.premultiplied {
            return Err(CardError::invalid_configuration(format!(
                "{what} expects a premultiplied rgba8 raster"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/image.rs"]
mod tests;
