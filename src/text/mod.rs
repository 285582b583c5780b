//! Text measurement, main-title line breaking and font autosizing.

/// Font size search against the side margins.
pub mod autosize;
/// Main-title line breaker.
pub mod line_break;
/// Width measurement trait and fallback measurers.
pub mod measure;
/// Parley-backed shaping over the template's font family.
pub mod shaper;
