//! Block catalog: which blocks are active and how tall their boxes are.

use crate::{
    foundation::error::TitlecardResult,
    state::template::TemplateState,
    text::autosize::{AutosizeParams, FontFit},
};

/// Gap below every block except the last.
pub const BLOCK_MARGIN_PX: f64 = 26.0;

/// Box height of a text block relative to its max font size.
pub const TEXT_BOX_RATIO: f64 = 0.82;

pub const LOGO_HEIGHT_PX: f64 = 58.0;

/// Nominal icon size (built-ins are square).
pub const ICON_SIZE_PX: f64 = 57.0;

/// Layout regions, in the fixed order they stack.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    Logo,
    TopTitle,
    MainTitle,
    Subtitle1,
    Subtitle2,
    Icons,
}

impl BlockKind {
    pub const ORDER: [BlockKind; 6] = [
        Self::Logo,
        Self::TopTitle,
        Self::MainTitle,
        Self::Subtitle1,
        Self::Subtitle2,
        Self::Icons,
    ];

    /// Autosize bounds for text blocks, `None` for logo and icons.
    pub fn autosize_params(self) -> Option<AutosizeParams> {
        match self {
            Self::TopTitle => Some(AutosizeParams::TOP_TITLE),
            Self::MainTitle => Some(AutosizeParams::MAIN_TITLE),
            Self::Subtitle1 => Some(AutosizeParams::SUBTITLE1),
            Self::Subtitle2 => Some(AutosizeParams::SUBTITLE2),
            Self::Logo | Self::Icons => None,
        }
    }

    /// Fixed box height. The main title has none; its height comes from its fit.
    pub fn nominal_height(self) -> Option<f64> {
        match self {
            Self::Logo => Some(LOGO_HEIGHT_PX),
            Self::Icons => Some(ICON_SIZE_PX),
            Self::MainTitle => None,
            Self::TopTitle | Self::Subtitle1 | Self::Subtitle2 => self
                .autosize_params()
                .map(|p| p.max_font_size_px * TEXT_BOX_RATIO),
        }
    }

    pub fn is_text(self) -> bool {
        self.autosize_params().is_some()
    }

    /// Source text for text blocks, ignoring visibility toggles.
    pub fn text(self, state: &TemplateState) -> Option<&str> {
        match self {
            Self::TopTitle => Some(&state.top_title),
            Self::MainTitle => Some(&state.main_title),
            Self::Subtitle1 => Some(&state.subtitle1),
            Self::Subtitle2 => Some(&state.subtitle2),
            Self::Logo | Self::Icons => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Logo => "logo",
            Self::TopTitle => "topTitle",
            Self::MainTitle => "mainTitle",
            Self::Subtitle1 => "subtitle1",
            Self::Subtitle2 => "subtitle2",
            Self::Icons => "icons",
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub kind: BlockKind,
    pub height: f64,
    pub margin_bottom: f64,
}

fn has_text(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Whether `kind` takes part in the layout for `state`.
pub fn is_active(kind: BlockKind, state: &TemplateState) -> TitlecardResult<bool> {
    Ok(match kind {
        BlockKind::Logo => state.show_logo,
        BlockKind::TopTitle => has_text(&state.top_title),
        BlockKind::MainTitle => has_text(&state.main_title),
        BlockKind::Subtitle1 => state.show_subtitle1 && has_text(&state.subtitle1),
        BlockKind::Subtitle2 => state.show_subtitle2 && has_text(&state.subtitle2),
        BlockKind::Icons => state.icon_count()? > 0,
    })
}

/// Active blocks in stacking order. The last block has no bottom margin.
///
/// Fails with `InvalidArgument` for a negative icon count.
pub fn build_catalog(state: &TemplateState, main_fit: &FontFit) -> TitlecardResult<Vec<Block>> {
    let mut blocks = Vec::with_capacity(BlockKind::ORDER.len());
    for kind in BlockKind::ORDER {
        if !is_active(kind, state)? {
            continue;
        }
        let height = match kind.nominal_height() {
            Some(h) => h,
            None => main_fit.total_height_px,
        };
        if kind == BlockKind::MainTitle && main_fit.is_empty() {
            tracing::warn!("main title has text but an empty fit; skipping block");
            continue;
        }
        blocks.push(Block {
            kind,
            height,
            margin_bottom: BLOCK_MARGIN_PX,
        });
    }
    if let Some(last) = blocks.last_mut() {
        last.margin_bottom = 0.0;
    }
    Ok(blocks)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/catalog.rs"]
mod tests;
