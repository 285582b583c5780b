//! Project files and PNG/MP4 export.

/// Project file (template state + animation + export settings).
pub mod project;
/// Render session and export entry points.
pub mod session;
