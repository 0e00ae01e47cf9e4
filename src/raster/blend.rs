use crate::foundation::{
    error::{CardError, CardResult},
    math::mul_div255_u8,
};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// How a layer combines with the accumulated card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendOp {
    /// Source-over.
    Over,
    /// Keep the destination only where the source is opaque.
    DestinationIn,
}

/// Porter-Duff source-over.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Porter-Duff destination-in: `dst` scaled by the mask's alpha.
pub fn destination_in(dst: PremulRgba8, mask: PremulRgba8) -> PremulRgba8 {
    match mask[3] {
        0 => [0, 0, 0, 0],
        255 => dst,
        ma => {
            let ma = u16::from(ma);
            [
                mul_div255_u8(u16::from(dst[0]), ma),
                mul_div255_u8(u16::from(dst[1]), ma),
                mul_div255_u8(u16::from(dst[2]), ma),
                mul_div255_u8(u16::from(dst[3]), ma),
            ]
        }
    }
}

/// Blend `src` onto `dst` pixel by pixel; both are premultiplied RGBA8 of equal length.
pub fn blend_in_place(dst: &mut [u8], src: &[u8], op: BlendOp) -> CardResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(CardError::invalid_geometry(
            "blend_in_place expects equal-length rgba8 buffers",
        ));
    }
    let f = match op {
        BlendOp::Over => over,
        BlendOp::DestinationIn => destination_in,
    };
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = f([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/blend.rs"]
mod tests;
