//! JSON project file: template state plus animation and export settings.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    animation::entrance::EntranceSettings,
    export::session::ExportSettings,
    foundation::error::{TitlecardError, TitlecardResult},
    state::template::TemplateState,
};

/// Everything needed to lay out, animate and export one title card.
///
/// Every section is optional in JSON and defaults to the editor's defaults. Unknown keys are
/// rejected.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Project {
    pub state: TemplateState,
    pub animation: EntranceSettings,
    pub export: ExportSettings,
}

impl Project {
    /// Parse a project from a JSON reader. Custom icon bytes are not loaded.
    pub fn from_reader<R: std::io::Read>(r: R) -> TitlecardResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| TitlecardError::serde(format!("parse project JSON: {e}")))
    }

    /// Parse a project file and load its custom icon, resolved against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> TitlecardResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TitlecardError::validation(format!("open project JSON '{}': {e}", path.display()))
        })?;
        let mut project = Self::from_reader(BufReader::new(f))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        project.load_custom_icon(base)?;
        Ok(project)
    }

    /// Read the custom icon named by `state.customIcon.source`, if any.
    pub fn load_custom_icon(&mut self, base_dir: &Path) -> TitlecardResult<()> {
        let Some(source) = self.state.custom_icon.source.as_deref() else {
            return Ok(());
        };
        let icon_path = resolve(base_dir, source);
        let bytes = std::fs::read(&icon_path)
            .with_context(|| format!("read custom icon '{}'", icon_path.display()))?;
        tracing::debug!(path = %icon_path.display(), bytes = bytes.len(), "loaded custom icon");
        self.state.custom_icon.attach_data(bytes);
        Ok(())
    }

    pub fn validate(&self) -> TitlecardResult<()> {
        self.state.validate()?;
        self.animation.validate()?;
        self.export.validate()?;
        Ok(())
    }

    pub fn to_json_pretty(&self) -> TitlecardResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TitlecardError::serde(format!("serialize project JSON: {e}")))
    }
}

fn resolve(base_dir: &Path, source: &str) -> PathBuf {
    let p = Path::new(source);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/project.rs"]
mod tests;
