//! photocard turns a photograph into a styled card.
//!
//! A card is the source image cover-fitted to an even size, clipped to a rounded rectangle,
//! with a translucent footer band, a caption and a solid, dashed or double border. It can
//! optionally be warped into any quadrilateral through a four-point homography.
//!
//! - Parse a [`CardRequest`] (JSON, camelCase, every field optional)
//! - Run it through a [`CardPipeline`] with a [`CaptionRenderer`] and a [`CardSink`]
//! - Or fan many jobs out with [`render_batch`]
//!
//! Everything runs on the CPU. Work buffers are premultiplied RGBA8; rasters crossing the
//! public pipeline boundary are straight alpha.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod compose;
mod config;
mod foundation;
mod geometry;
mod pipeline;
mod raster;
mod transform;

pub use crate::compose::caption::{Caption, CaptionRenderer, NoCaption, ParleyCaptionRenderer};
pub use crate::compose::layers::{Layer, LayerKind, LayerPaint, LayerStack, composite};
pub use crate::config::color::CardColor;
pub use crate::config::options::{
    CardOptions, CardRequest, CardSpec, DEFAULT_SUBTITLE, DistortionOption, FooterSpec,
    OutputFormat, PipelineSettings,
};
pub use crate::foundation::core::{CornerRadii, Dimensions, Rgba8};
pub use crate::foundation::error::{CardError, CardResult, ErrorKind};
pub use crate::geometry::border::{BorderSpec, BorderStyle, DashPattern, StrokeDesc, render_border};
pub use crate::geometry::quad::{CornerOffset, CornerOffsets, Distortion, Quad};
pub use crate::geometry::rounded_rect::{CardPath, rounded_rect_path};
pub use crate::pipeline::batch::{BatchJob, BatchThreading, EncodedCard, render_batch};
pub use crate::pipeline::driver::{
    CardOutput, CardPipeline, CardReceipt, PipelineState, Stage, render_card,
};
pub use crate::pipeline::sink::{CardSink, FileSink, MemorySink, StoredCard, encode_card};
pub use crate::raster::blend::BlendOp;
pub use crate::raster::image::RasterImage;
pub use crate::raster::ingest::{cover_fit, decode_image, normalize_source};
pub use crate::transform::homography::Homography;
pub use crate::transform::warp::{Warped, warp, warp_with_distortion};
