//! Encoding sinks.
//!
//! Sinks consume rendered frames in timeline order and are fed by
//! [`crate::export::session::export_video`].

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
