//! Full layout pass: `(state, canvas, measurer) -> TemplateLayout`.

use crate::{
    foundation::core::Canvas,
    foundation::error::TitlecardResult,
    layout::{
        catalog::{BlockKind, build_catalog, is_active},
        icons::{distribute_icons, icon_rendered_width},
        solver::{PositionedBlock, layout_blocks},
    },
    state::template::{IconStyle, TemplateState},
    text::{
        autosize::{AutosizeParams, FontFit, fits_at_minimum, max_text_width, solve},
        line_break::{TitleLines, break_lines},
        measure::TextMeasurer,
    },
};

/// Icon row width used when there is no main title to span.
pub const FALLBACK_REFERENCE_WIDTH_PX: f64 = 400.0;

/// Solved text for one active text block.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlockLayout {
    pub kind: BlockKind,
    /// Lines as drawn (the main title is upper-cased and broken).
    pub lines: Vec<String>,
    pub fit: FontFit,
}

/// Everything a render backend needs for one state snapshot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateLayout {
    pub canvas: Canvas,
    pub blocks: Vec<PositionedBlock>,
    pub title_lines: TitleLines,
    pub main_fit: FontFit,
    pub texts: Vec<TextBlockLayout>,
    pub reference_width_px: f64,
    pub icon_style: IconStyle,
    pub icon_width_px: f64,
    pub icon_centers_x: Vec<f64>,
}

impl TemplateLayout {
    pub fn block(&self, kind: BlockKind) -> Option<&PositionedBlock> {
        self.blocks.iter().find(|b| b.block.kind == kind)
    }

    pub fn text(&self, kind: BlockKind) -> Option<&TextBlockLayout> {
        self.texts.iter().find(|t| t.kind == kind)
    }

    /// Total stack height including inner margins.
    pub fn stack_height(&self) -> f64 {
        self.blocks
            .iter()
            .map(|b| b.block.height + b.block.margin_bottom)
            .sum()
    }
}

/// Run the whole layout pipeline for `state` on `canvas`.
///
/// Measurement errors propagate unchanged so a caller can defer on
/// [`crate::TitlecardError::MeasurementUnavailable`].
#[tracing::instrument(skip(state, measurer), fields(width = canvas.width, height = canvas.height))]
pub fn compute_layout<M: TextMeasurer + ?Sized>(
    state: &TemplateState,
    canvas: Canvas,
    measurer: &mut M,
) -> TitlecardResult<TemplateLayout> {
    let icon_count = state.icon_count()?;
    let max_width = max_text_width(canvas);

    let title_lines = break_lines(&state.main_title);
    let main_fit = if is_active(BlockKind::MainTitle, state)? {
        let lines = title_lines.lines();
        solve(measurer, &lines, max_width, AutosizeParams::MAIN_TITLE)?
    } else {
        FontFit::EMPTY
    };

    let mut texts = Vec::new();
    for kind in BlockKind::ORDER {
        let (Some(params), Some(text)) = (kind.autosize_params(), kind.text(state)) else {
            continue;
        };
        if !is_active(kind, state)? {
            continue;
        }
        let (lines, fit) = if kind == BlockKind::MainTitle {
            let lines = title_lines.lines().into_iter().map(str::to_owned).collect();
            (lines, main_fit)
        } else {
            (vec![text.to_owned()], solve(measurer, &[text], max_width, params)?)
        };
        tracing::debug!(%kind, font_size_px = fit.font_size_px, "text block fit");
        texts.push(TextBlockLayout { kind, lines, fit });
    }

    let catalog = build_catalog(state, &main_fit)?;
    let blocks = layout_blocks(&catalog, canvas);

    let reference_width_px = if main_fit.is_empty() {
        FALLBACK_REFERENCE_WIDTH_PX
    } else {
        main_fit.widest_line_px
    };
    let icon_width_px = icon_rendered_width(state);
    let icon_centers_x = distribute_icons(
        icon_count,
        icon_width_px,
        reference_width_px,
        canvas.center_x(),
    );

    tracing::debug!(
        blocks = blocks.len(),
        reference_width_px,
        icons = icon_centers_x.len(),
        "layout pass complete"
    );

    Ok(TemplateLayout {
        canvas,
        blocks,
        title_lines,
        main_fit,
        texts,
        reference_width_px,
        icon_style: state.effective_icon_style(),
        icon_width_px,
        icon_centers_x,
    })
}

/// Whether `text` stays inside the side insets at `kind`'s minimum font size.
///
/// Blank text and non-text blocks always pass. The main title is line-broken first.
pub fn text_fits_margins<M: TextMeasurer + ?Sized>(
    text: &str,
    kind: BlockKind,
    canvas: Canvas,
    measurer: &mut M,
) -> TitlecardResult<bool> {
    let Some(params) = kind.autosize_params() else {
        return Ok(true);
    };
    if text.trim().is_empty() {
        return Ok(true);
    }
    let max_width = max_text_width(canvas);
    if kind == BlockKind::MainTitle {
        let lines = break_lines(text);
        fits_at_minimum(measurer, &lines.lines(), max_width, params)
    } else {
        fits_at_minimum(measurer, &[text], max_width, params)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/pass.rs"]
mod tests;
