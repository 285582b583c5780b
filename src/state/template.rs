use std::sync::{Arc, OnceLock};

use crate::{
    assets::decode::{IconBitmap, decode_icon, sniff_icon_size},
    foundation::color::Color,
    foundation::error::{TitlecardError, TitlecardResult},
};

/// Largest icon row the layout accepts.
pub const MAX_ICON_COUNT: usize = 100;

/// Editable template content. The single mutable source of truth; everything the engine derives
/// from it is recomputed per layout pass.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct TemplateState {
    pub top_title: String,
    pub main_title: String,
    pub subtitle1: String,
    pub subtitle2: String,
    pub show_logo: bool,
    pub show_subtitle1: bool,
    pub show_subtitle2: bool,
    /// Signed at the JSON boundary; out-of-range values are rejected by
    /// [`TemplateState::icon_count`].
    pub icon_count: i64,
    pub icon_style: IconStyle,
    pub custom_icon: CustomIcon,
    pub background_color: Color,
    pub text_color: Color,
    pub debug_mode: bool,
}

impl Default for TemplateState {
    fn default() -> Self {
        Self {
            top_title: "Top Title".to_owned(),
            main_title: "THIS IS MAIN TITLE".to_owned(),
            subtitle1: "Subtitle 1".to_owned(),
            subtitle2: "Subtitle 2".to_owned(),
            show_logo: true,
            show_subtitle1: true,
            show_subtitle2: true,
            icon_count: 4,
            icon_style: IconStyle::Arrow,
            custom_icon: CustomIcon::default(),
            background_color: Color::BLACK,
            text_color: Color::WHITE,
            debug_mode: false,
        }
    }
}

impl TemplateState {
    /// Validated icon count, in `0..=MAX_ICON_COUNT`.
    pub fn icon_count(&self) -> TitlecardResult<usize> {
        match usize::try_from(self.icon_count) {
            Ok(n) if n <= MAX_ICON_COUNT => Ok(n),
            _ => Err(TitlecardError::invalid_argument(format!(
                "iconCount must be in 0..={MAX_ICON_COUNT} (got {})",
                self.icon_count
            ))),
        }
    }

    /// Icon style actually drawn: `custom` without data falls back to the arrow.
    pub fn effective_icon_style(&self) -> IconStyle {
        match self.icon_style {
            IconStyle::Custom if !self.custom_icon.has_data() => IconStyle::Arrow,
            style => style,
        }
    }

    pub fn validate(&self) -> TitlecardResult<()> {
        self.icon_count()?;
        self.custom_icon.validate()?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconStyle {
    #[default]
    Arrow,
    Dot,
    Star,
    Custom,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomIconKind {
    Png,
    Gif,
    Svg,
    #[default]
    Other,
}

impl CustomIconKind {
    pub fn from_filename(name: &str) -> Self {
        let ext = std::path::Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png") => Self::Png,
            Some("gif") => Self::Gif,
            Some("svg") => Self::Svg,
            _ => Self::Other,
        }
    }
}

/// User-supplied icon. Raw bytes are owned here; the decoded bitmap is filled on first use and
/// dropped whenever the data changes.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct CustomIcon {
    /// Project-relative file the data was loaded from.
    pub source: Option<String>,
    pub kind: CustomIconKind,
    /// Intrinsic width; `0` means unknown.
    pub original_width: f64,
    /// Intrinsic height; `0` means unknown.
    pub original_height: f64,
    #[serde(skip)]
    data: Option<Arc<Vec<u8>>>,
    #[serde(skip)]
    bitmap: OnceLock<Option<Arc<IconBitmap>>>,
}

impl CustomIcon {
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref().map(Vec::as_slice)
    }

    /// Replace the icon with freshly uploaded bytes.
    ///
    /// Intrinsic dimensions are read from the data; when that fails they are left unknown
    /// and the icon is laid out as a square.
    pub fn set(&mut self, filename: &str, bytes: Vec<u8>) {
        let kind = CustomIconKind::from_filename(filename);
        let (w, h) = match sniff_icon_size(kind, &bytes) {
            Ok(size) => size,
            Err(err) => {
                tracing::warn!(%filename, %err, "custom icon size unknown, assuming square");
                (0.0, 0.0)
            }
        };
        self.source = Some(filename.to_owned());
        self.kind = kind;
        self.original_width = w;
        self.original_height = h;
        self.data = Some(Arc::new(bytes));
        self.bitmap = OnceLock::new();
    }

    /// Attach bytes for an icon whose metadata came from a project file.
    ///
    /// Dimensions already present are kept; unknown ones are read from the data.
    pub fn attach_data(&mut self, bytes: Vec<u8>) {
        if self.kind == CustomIconKind::Other
            && let Some(source) = self.source.as_deref()
        {
            self.kind = CustomIconKind::from_filename(source);
        }
        if (self.original_width <= 0.0 || self.original_height <= 0.0)
            && let Ok((w, h)) = sniff_icon_size(self.kind, &bytes)
        {
            self.original_width = w;
            self.original_height = h;
        }
        self.data = Some(Arc::new(bytes));
        self.bitmap = OnceLock::new();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Aspect ratio (width / height), square when intrinsic dimensions are missing.
    pub fn aspect_ratio(&self) -> f64 {
        let (w, h) = (self.original_width, self.original_height);
        if w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite() {
            w / h
        } else {
            1.0
        }
    }

    /// Decoded bitmap, decoding on first call. `None` when there is no data or decoding failed.
    pub fn bitmap(&self) -> Option<Arc<IconBitmap>> {
        self.bitmap
            .get_or_init(|| {
                let data = self.data.as_ref()?;
                match decode_icon(self.kind, data) {
                    Ok(bitmap) => Some(Arc::new(bitmap)),
                    Err(err) => {
                        tracing::warn!(%err, "custom icon failed to decode, using placeholder");
                        None
                    }
                }
            })
            .clone()
    }

    /// Whether the bitmap cache has been populated (successfully or not).
    pub fn is_bitmap_cached(&self) -> bool {
        self.bitmap.get().is_some()
    }

    fn validate(&self) -> TitlecardResult<()> {
        for (name, v) in [
            ("originalWidth", self.original_width),
            ("originalHeight", self.original_height),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(TitlecardError::validation(format!(
                    "customIcon.{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/template.rs"]
mod tests;
