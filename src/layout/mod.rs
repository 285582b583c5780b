//! Vertical layout of the template.
//!
//! One layout pass ([`pass::compute_layout`]) solves font sizes, builds the ordered block catalog,
//! stacks it around the canvas center and spreads the icon row.

/// Ordered block catalog.
pub mod catalog;
/// Icon row distribution.
pub mod icons;
/// Full layout pass.
pub mod pass;
/// Vertical stacking.
pub mod solver;
