/// Convenience result type used across titlecard.
pub type TitlecardResult<T> = Result<T, TitlecardError>;

/// Top-level error taxonomy used by engine APIs.
///
/// None of these are fatal: layout callers either fix their input or defer the pass.
#[derive(thiserror::Error, Debug)]
pub enum TitlecardError {
    /// Invalid project or template data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Caller handed the core a value outside its domain (for example a negative icon count).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The text measurement provider cannot answer yet (font not loaded for the weight).
    #[error("measurement unavailable: {0}")]
    MeasurementUnavailable(String),

    /// Errors while building or sampling the entrance timeline.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors while rasterizing a frame plan.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while writing stills or streaming video frames.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TitlecardError {
    /// Build a [`TitlecardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TitlecardError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`TitlecardError::MeasurementUnavailable`] value.
    pub fn measurement_unavailable(msg: impl Into<String>) -> Self {
        Self::MeasurementUnavailable(msg.into())
    }

    /// Build a [`TitlecardError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`TitlecardError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TitlecardError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`TitlecardError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether the caller should retry the layout pass later instead of giving up.
    pub fn is_deferrable(&self) -> bool {
        matches!(self, Self::MeasurementUnavailable(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
