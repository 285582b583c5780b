//! Frame rendering.
//!
//! [`plan::compile_frame`] turns a layout plus block poses into backend-agnostic draw ops;
//! [`cpu::CpuBackend`] rasterizes them.

/// Backend trait and frame buffer.
pub mod backend;
/// CPU backend (`vello_cpu`).
pub mod cpu;
/// Draw-op plan for a single frame.
pub mod plan;
