use crate::foundation::error::{TitlecardError, TitlecardResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> TitlecardResult<Self> {
        if den == 0 {
            return Err(TitlecardError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(TitlecardError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Frame count that covers `secs` completely (ceiling).
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        (secs * self.as_f64()).ceil().max(0.0) as u64
    }
}

/// Logical drawing surface. Every pixel constant in the layout engine is defined against
/// [`Canvas::REFERENCE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub const REFERENCE: Canvas = Canvas {
        width: 1920,
        height: 1080,
    };

    pub fn new(width: u32, height: u32) -> TitlecardResult<Self> {
        if width == 0 || height == 0 {
            return Err(TitlecardError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }

    pub fn center_x(self) -> f64 {
        self.width_f64() / 2.0
    }

    pub fn center_y(self) -> f64 {
        self.height_f64() / 2.0
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::REFERENCE
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
