//! Card outlines, border strokes and distortion quads.

/// Per-style border stroke expansion.
pub mod border;
/// Quadrilaterals and distortion requests.
pub mod quad;
/// Inset-aware rounded-rectangle outlines.
pub mod rounded_rect;
