use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    foundation::error::{TitlecardError, TitlecardResult},
    text::measure::{FontWeight, TextMeasurer},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Font bytes for each weight of the template family.
#[derive(Clone, Debug, Default)]
pub struct FontSet {
    faces: BTreeMap<FontWeight, Arc<Vec<u8>>>,
    sources: BTreeMap<FontWeight, PathBuf>,
}

impl FontSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, weight: FontWeight, bytes: Vec<u8>) {
        self.faces.insert(weight, Arc::new(bytes));
    }

    pub fn get(&self, weight: FontWeight) -> Option<&Arc<Vec<u8>>> {
        self.faces.get(&weight)
    }

    pub fn source(&self, weight: FontWeight) -> Option<&Path> {
        self.sources.get(&weight).map(PathBuf::as_path)
    }

    pub fn is_complete(&self) -> bool {
        FontWeight::ALL.iter().all(|w| self.faces.contains_key(w))
    }

    pub fn missing(&self) -> Vec<FontWeight> {
        FontWeight::ALL
            .into_iter()
            .filter(|w| !self.faces.contains_key(w))
            .collect()
    }

    /// Load `*-Regular`, `*-Bold` and `*-ExtraBold` `.ttf`/`.otf` files from `dir`.
    ///
    /// Files are visited in name order so the pick is stable when several families match.
    pub fn from_dir(dir: impl AsRef<Path>) -> TitlecardResult<Self> {
        let dir = dir.as_ref();
        let mut entries = std::fs::read_dir(dir)
            .with_context(|| format!("read font dir '{}'", dir.display()))?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect::<Vec<_>>();
        entries.sort();

        let mut out = Self::new();
        for path in entries {
            let is_font = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"));
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if !is_font {
                continue;
            }
            for weight in FontWeight::ALL {
                if out.faces.contains_key(&weight)
                    || !stem.ends_with(&format!("-{}", weight.file_suffix()))
                {
                    continue;
                }
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("read font '{}'", path.display()))?;
                tracing::debug!(weight = weight.value(), path = %path.display(), "loaded font face");
                out.faces.insert(weight, Arc::new(bytes));
                out.sources.insert(weight, path.clone());
            }
        }

        if out.faces.is_empty() {
            return Err(TitlecardError::validation(format!(
                "no *-Regular/*-Bold/*-ExtraBold fonts found in '{}'",
                dir.display()
            )));
        }
        Ok(out)
    }
}

struct FaceSlot {
    font_ctx: parley::FontContext,
    family_name: String,
}

/// Parley-backed shaper: one font context per weight so each context holds exactly one face.
pub struct TextShaper {
    slots: BTreeMap<FontWeight, FaceSlot>,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl std::fmt::Debug for TextShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextShaper")
            .field(
                "families",
                &self
                    .slots
                    .iter()
                    .map(|(w, s)| (w.value(), s.family_name.as_str()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl TextShaper {
    /// Register every face in `fonts`. Weights missing from the set stay unavailable and
    /// measuring them reports [`TitlecardError::MeasurementUnavailable`].
    pub fn new(fonts: &FontSet) -> TitlecardResult<Self> {
        let mut slots = BTreeMap::new();
        for (&weight, bytes) in &fonts.faces {
            let mut font_ctx = parley::FontContext::default();
            let families = font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
            let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
                TitlecardError::validation(format!(
                    "no font families registered for weight {}",
                    weight.value()
                ))
            })?;
            let family_name = font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| TitlecardError::validation("registered font family has no name"))?
                .to_string();
            slots.insert(
                weight,
                FaceSlot {
                    font_ctx,
                    family_name,
                },
            );
        }
        Ok(Self {
            slots,
            layout_ctx: parley::LayoutContext::new(),
        })
    }

    pub fn has_weight(&self, weight: FontWeight) -> bool {
        self.slots.contains_key(&weight)
    }

    pub fn family_name(&self, weight: FontWeight) -> Option<&str> {
        self.slots.get(&weight).map(|s| s.family_name.as_str())
    }

    /// Shape a single unwrapped line.
    pub fn layout_line(
        &mut self,
        text: &str,
        weight: FontWeight,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> TitlecardResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(TitlecardError::invalid_argument(
                "text size_px must be finite and > 0",
            ));
        }
        let slot = self.slots.get_mut(&weight).ok_or_else(|| {
            TitlecardError::measurement_unavailable(format!(
                "no font loaded for weight {}",
                weight.value()
            ))
        })?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut slot.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(slot.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

impl TextMeasurer for TextShaper {
    fn measure_width(
        &mut self,
        text: &str,
        weight: FontWeight,
        size_px: f64,
    ) -> TitlecardResult<f64> {
        if !self.has_weight(weight) {
            return Err(TitlecardError::measurement_unavailable(format!(
                "no font loaded for weight {}",
                weight.value()
            )));
        }
        if text.is_empty() {
            return Ok(0.0);
        }
        let layout = self.layout_line(text, weight, size_px as f32, TextBrushRgba8::default())?;
        let width = layout
            .lines()
            .map(|line| f64::from(line.metrics().advance))
            .fold(0.0f64, f64::max);
        Ok(width)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/shaper.rs"]
mod tests;
