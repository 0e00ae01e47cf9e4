//! Request parsing and option resolution.

/// Color values accepted in requests.
pub mod color;
/// Card options, request wrapper and pipeline settings.
pub mod options;
