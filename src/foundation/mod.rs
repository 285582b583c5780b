//! Shared primitives: canvas and frame-rate types, colors, errors and pixel math.

/// Colors as written in project files (`#rrggbb`).
pub mod color;
/// Canvas, frame-rate and pixel primitives.
pub mod core;
/// Crate error type.
pub mod error;
pub(crate) mod math;
