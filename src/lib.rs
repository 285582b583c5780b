//! Titlecard is the layout and text-fitting engine behind a title-card video template.
//!
//! A [`TemplateState`] describes what the card says; the engine turns it into pixels:
//!
//! - autosize each text block against the side margins ([`solve`])
//! - split the main title onto at most two lines ([`break_lines`])
//! - stack the active blocks around the canvas center ([`compute_layout`])
//! - animate them in with a staggered entrance ([`build_entrance`])
//! - rasterize frames on the CPU and export PNG stills or MP4 video ([`RenderSession`])
#![forbid(unsafe_code)]

/// Staggered entrance animation.
pub mod animation;
/// Custom icon decoding.
pub mod assets;
/// Encoding sinks.
pub mod encode;
/// Project files and export.
pub mod export;
/// Shared primitives.
pub mod foundation;
/// Block catalog, vertical solver and icon row.
pub mod layout;
/// Frame plans and the CPU backend.
pub mod render;
/// Template state.
pub mod state;
/// Measurement, line breaking and autosizing.
pub mod text;

pub use crate::foundation::color::Color;
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Rect};
pub use crate::foundation::error::{TitlecardError, TitlecardResult};

pub use crate::state::template::{CustomIcon, CustomIconKind, IconStyle, TemplateState};

pub use crate::text::autosize::{AutosizeParams, FontFit, max_text_width, solve};
pub use crate::text::line_break::{TitleLines, break_lines};
pub use crate::text::measure::{CachedMeasurer, FontWeight, HeuristicMeasurer, TextMeasurer};
pub use crate::text::shaper::{FontSet, TextShaper};

pub use crate::layout::catalog::{Block, BlockKind, build_catalog};
pub use crate::layout::icons::distribute_icons;
pub use crate::layout::pass::{TemplateLayout, TextBlockLayout, compute_layout, text_fits_margins};
pub use crate::layout::solver::{PositionedBlock, layout_blocks};

pub use crate::animation::ease::Ease;
pub use crate::animation::entrance::{
    BlockPose, EntranceSettings, EntranceTimeline, TravelPolicy, build_entrance,
};

pub use crate::render::backend::{FrameRGBA, RenderBackend};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::plan::{DrawOp, FramePlan, compile_frame};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};

pub use crate::export::project::Project;
pub use crate::export::session::{
    ExportSettings, ExportStats, RenderSession, export_still, export_video,
};
