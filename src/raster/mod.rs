//! Pixel buffers and the primitives that fill and blend them.

/// Porter-Duff blending of premultiplied RGBA8.
pub mod blend;
/// The raster buffer type.
pub mod image;
/// Source decoding and cover-fit resizing.
pub mod ingest;
/// Vector fills and strokes through `vello_cpu`.
pub mod vector;
