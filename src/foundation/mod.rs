//! Shared value types, error taxonomy and pixel arithmetic.

pub mod core;
pub mod error;
pub(crate) mod math;
