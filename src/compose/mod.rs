//! Layer stacking and compositing.

/// Caption sanitizing, layout and rendering.
pub mod caption;
/// Ordered layers and the compositor.
pub mod layers;
