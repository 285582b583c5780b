use crate::{
    foundation::core::Canvas,
    foundation::error::{TitlecardError, TitlecardResult},
    text::measure::{FontWeight, TextMeasurer},
};

/// Line height as a fraction of font size for autosized runs.
pub const LINE_HEIGHT_RATIO: f64 = 0.88;

/// Fixed left and right inset text must stay inside.
pub const SIDE_INSET_PX: f64 = 230.0;

/// Width budget for text on `canvas`: `width - 2 * 230`.
pub fn max_text_width(canvas: Canvas) -> f64 {
    (canvas.width_f64() - 2.0 * SIDE_INSET_PX).max(0.0)
}

/// Search bounds for one text block.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AutosizeParams {
    pub max_font_size_px: f64,
    pub min_font_size_px: f64,
    pub weight: FontWeight,
    pub step_px: f64,
}

impl AutosizeParams {
    pub const TOP_TITLE: AutosizeParams = AutosizeParams {
        max_font_size_px: 64.0,
        min_font_size_px: 30.0,
        weight: FontWeight::Bold,
        step_px: 3.0,
    };
    pub const MAIN_TITLE: AutosizeParams = AutosizeParams {
        max_font_size_px: 240.0,
        min_font_size_px: 120.0,
        weight: FontWeight::ExtraBold,
        step_px: 5.0,
    };
    pub const SUBTITLE1: AutosizeParams = AutosizeParams {
        max_font_size_px: 75.0,
        min_font_size_px: 30.0,
        weight: FontWeight::Bold,
        step_px: 5.0,
    };
    pub const SUBTITLE2: AutosizeParams = AutosizeParams {
        max_font_size_px: 40.0,
        min_font_size_px: 20.0,
        weight: FontWeight::Regular,
        step_px: 2.0,
    };

    fn validate(&self) -> TitlecardResult<()> {
        let finite = [self.max_font_size_px, self.min_font_size_px, self.step_px]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(TitlecardError::invalid_argument(
                "autosize params must be finite",
            ));
        }
        if self.min_font_size_px <= 0.0 || self.min_font_size_px > self.max_font_size_px {
            return Err(TitlecardError::invalid_argument(
                "autosize requires 0 < min_font_size_px <= max_font_size_px",
            ));
        }
        if self.step_px <= 0.0 {
            return Err(TitlecardError::invalid_argument(
                "autosize step_px must be > 0",
            ));
        }
        Ok(())
    }
}

/// Result of an autosize search.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontFit {
    pub font_size_px: f64,
    pub line_height_px: f64,
    pub total_height_px: f64,
    /// 0 (blank input), 1 or 2.
    pub line_count: u8,
    /// Widest measured line at `font_size_px`.
    pub widest_line_px: f64,
    /// True when even the minimum size overflows the budget.
    pub overflows: bool,
}

impl FontFit {
    /// Fit for blank text; the caller omits the block instead of drawing it.
    pub const EMPTY: FontFit = FontFit {
        font_size_px: 0.0,
        line_height_px: 0.0,
        total_height_px: 0.0,
        line_count: 0,
        widest_line_px: 0.0,
        overflows: false,
    };

    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }
}

/// Largest size in `[min, max]` (stepping down from `max`) whose widest line fits `max_width_px`.
///
/// The minimum is always accepted, even when it overflows. Blank lines are ignored; all-blank
/// input yields [`FontFit::EMPTY`].
pub fn solve<M: TextMeasurer + ?Sized>(
    measurer: &mut M,
    lines: &[&str],
    max_width_px: f64,
    params: AutosizeParams,
) -> TitlecardResult<FontFit> {
    if lines.is_empty() || lines.len() > 2 {
        return Err(TitlecardError::invalid_argument(format!(
            "autosize expects 1 or 2 lines (got {})",
            lines.len()
        )));
    }
    params.validate()?;

    let lines: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|l| !l.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return Ok(FontFit::EMPTY);
    }

    let mut size = params.max_font_size_px;
    let (font_size_px, widest_line_px, overflows) = loop {
        let widest = widest_line(measurer, &lines, params.weight, size)?;
        if widest <= max_width_px {
            break (size, widest, false);
        }
        size -= params.step_px;
        if size < params.min_font_size_px {
            let size = params.min_font_size_px;
            let widest = widest_line(measurer, &lines, params.weight, size)?;
            break (size, widest, widest > max_width_px);
        }
    };

    if overflows {
        tracing::warn!(
            font_size_px,
            widest_line_px,
            max_width_px,
            "text overflows margins at minimum font size"
        );
    }

    let line_height_px = font_size_px * LINE_HEIGHT_RATIO;
    let line_count = lines.len() as u8;
    Ok(FontFit {
        font_size_px,
        line_height_px,
        total_height_px: line_height_px * f64::from(line_count),
        line_count,
        widest_line_px,
        overflows,
    })
}

/// Whether every non-blank line fits `max_width_px` at the minimum size.
pub fn fits_at_minimum<M: TextMeasurer + ?Sized>(
    measurer: &mut M,
    lines: &[&str],
    max_width_px: f64,
    params: AutosizeParams,
) -> TitlecardResult<bool> {
    params.validate()?;
    let lines: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|l| !l.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return Ok(true);
    }
    let widest = widest_line(measurer, &lines, params.weight, params.min_font_size_px)?;
    Ok(widest <= max_width_px)
}

fn widest_line<M: TextMeasurer + ?Sized>(
    measurer: &mut M,
    lines: &[&str],
    weight: FontWeight,
    size_px: f64,
) -> TitlecardResult<f64> {
    let mut widest = 0.0f64;
    for line in lines {
        widest = widest.max(measurer.measure_width(line, weight, size_px)?);
    }
    Ok(widest)
}

#[cfg(test)]
#[path = "../../tests/unit/text/autosize.rs"]
mod tests;
