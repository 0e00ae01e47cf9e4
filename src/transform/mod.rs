//! Projective transforms and the resampler that applies them.

/// Four-point homography solver.
pub mod homography;
/// Bilinear perspective warp.
pub mod warp;
