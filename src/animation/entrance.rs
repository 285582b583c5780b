//! Staggered entrance: each block fades in while rising to its final position.
//!
//! The layout pass only supplies final positions. This module turns them into a flat list of
//! [`EntranceDescriptor`]s (delay, durations, eases, endpoints) and samples that list at a time
//! in seconds. Nothing here depends on frames beyond the stagger interval.

use crate::{
    animation::ease::Ease,
    foundation::core::{Canvas, Fps},
    foundation::error::{TitlecardError, TitlecardResult},
    layout::{catalog::BlockKind, solver::PositionedBlock},
};

/// Travel fraction for the main title.
pub const MAIN_TITLE_TRAVEL_FRACTION: f64 = 0.1;
/// Travel fraction for every other block.
pub const DEFAULT_TRAVEL_FRACTION: f64 = 0.3;

/// One animated property: how long and along which curve.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Track {
    #[serde(rename = "duration")]
    pub duration_s: f64,
    pub ease: Ease,
}

impl Track {
    /// Eased progress at `local_s` seconds after the track starts.
    fn progress(&self, local_s: f64) -> f64 {
        if local_s <= 0.0 {
            return 0.0;
        }
        if self.duration_s <= 0.0 {
            return 1.0;
        }
        self.ease.apply(local_s / self.duration_s)
    }
}

/// What the vertical travel distance is measured against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TravelPolicy {
    /// Fraction of canvas height.
    #[default]
    CanvasFraction,
    /// Fraction of the block's own box height.
    BlockHeightFraction,
}

impl TravelPolicy {
    pub fn travel_px(self, kind: BlockKind, block_height: f64, canvas: Canvas) -> f64 {
        let fraction = match kind {
            BlockKind::MainTitle => MAIN_TITLE_TRAVEL_FRACTION,
            _ => DEFAULT_TRAVEL_FRACTION,
        };
        match self {
            Self::CanvasFraction => canvas.height_f64() * fraction,
            Self::BlockHeightFraction => block_height * fraction,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Timing {
    /// Stagger between consecutive blocks, in frames of `fps`.
    pub frame_interval: u32,
    pub fps: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct EntranceSettings {
    pub opacity: Track,
    pub y_movement: Track,
    pub timing: Timing,
    pub travel: TravelPolicy,
}

impl Default for EntranceSettings {
    fn default() -> Self {
        Self {
            opacity: Track {
                duration_s: 3.0,
                ease: Ease::OutQuad,
            },
            y_movement: Track {
                duration_s: 3.0,
                ease: Ease::OutCirc,
            },
            timing: Timing {
                frame_interval: 10,
                fps: 30,
            },
            travel: TravelPolicy::CanvasFraction,
        }
    }
}

impl EntranceSettings {
    /// Shorter 60fps variant: 2s tracks, cubic rise, travel relative to block height.
    pub fn dom_preset() -> Self {
        Self {
            opacity: Track {
                duration_s: 2.0,
                ease: Ease::OutQuad,
            },
            y_movement: Track {
                duration_s: 2.0,
                ease: Ease::OutCubic,
            },
            timing: Timing {
                frame_interval: 10,
                fps: 60,
            },
            travel: TravelPolicy::BlockHeightFraction,
        }
    }

    /// Seconds between the starts of consecutive blocks.
    pub fn stagger_s(&self) -> TitlecardResult<f64> {
        let fps = Fps::new(self.timing.fps, 1)?;
        Ok(f64::from(self.timing.frame_interval) * fps.frame_duration_secs())
    }

    pub fn validate(&self) -> TitlecardResult<()> {
        for (name, track) in [("opacity", self.opacity), ("yMovement", self.y_movement)] {
            if !track.duration_s.is_finite() || track.duration_s < 0.0 {
                return Err(TitlecardError::animation(format!(
                    "{name}.duration must be finite and >= 0"
                )));
            }
        }
        if self.timing.fps == 0 {
            return Err(TitlecardError::animation("timing.fps must be > 0"));
        }
        Ok(())
    }
}

/// Everything a timeline scheduler needs to animate one block.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntranceDescriptor {
    pub kind: BlockKind,
    pub index: usize,
    pub delay_s: f64,
    pub opacity: Track,
    pub y_movement: Track,
    pub from_opacity: f32,
    pub to_opacity: f32,
    /// Offset below the final position at the start of the rise.
    pub from_y_offset: f64,
    pub to_y_offset: f64,
    pub final_center_y: f64,
}

impl EntranceDescriptor {
    pub fn end_s(&self) -> f64 {
        self.delay_s + self.opacity.duration_s.max(self.y_movement.duration_s)
    }

    pub fn pose_at(&self, t: f64) -> BlockPose {
        let local = t - self.delay_s;
        let op = self.opacity.progress(local) as f32;
        let y = self.y_movement.progress(local);
        BlockPose {
            kind: self.kind,
            index: self.index,
            opacity: self.from_opacity + (self.to_opacity - self.from_opacity) * op,
            y_offset: self.from_y_offset + (self.to_y_offset - self.from_y_offset) * y,
        }
    }
}

/// Animated state of one block at one instant.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPose {
    pub kind: BlockKind,
    pub index: usize,
    pub opacity: f32,
    /// Added to the block's final center y.
    pub y_offset: f64,
}

impl BlockPose {
    pub fn settled(kind: BlockKind, index: usize) -> Self {
        Self {
            kind,
            index,
            opacity: 1.0,
            y_offset: 0.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EntranceTimeline {
    pub descriptors: Vec<EntranceDescriptor>,
}

impl EntranceTimeline {
    /// Poses for every block at `t` seconds, in catalog order.
    pub fn sample(&self, t: f64) -> Vec<BlockPose> {
        self.descriptors.iter().map(|d| d.pose_at(t)).collect()
    }

    /// Time at which the last block settles.
    pub fn duration(&self) -> f64 {
        self.descriptors
            .iter()
            .map(EntranceDescriptor::end_s)
            .fold(0.0, f64::max)
    }

    /// Editing pose: everything visible at its final position.
    pub fn final_poses(&self) -> Vec<BlockPose> {
        self.descriptors
            .iter()
            .map(|d| BlockPose::settled(d.kind, d.index))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Build one descriptor per positioned block, staggered by the configured frame interval.
pub fn build_entrance(
    blocks: &[PositionedBlock],
    canvas: Canvas,
    settings: &EntranceSettings,
) -> TitlecardResult<EntranceTimeline> {
    settings.validate()?;
    let stagger = settings.stagger_s()?;

    let descriptors = blocks
        .iter()
        .map(|b| {
            let travel = settings
                .travel
                .travel_px(b.block.kind, b.block.height, canvas);
            EntranceDescriptor {
                kind: b.block.kind,
                index: b.index,
                delay_s: b.index as f64 * stagger,
                opacity: settings.opacity,
                y_movement: settings.y_movement,
                from_opacity: 0.0,
                to_opacity: 1.0,
                from_y_offset: travel,
                to_y_offset: 0.0,
                final_center_y: b.final_center_y,
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        blocks = descriptors.len(),
        stagger_s = stagger,
        "built entrance timeline"
    );
    Ok(EntranceTimeline { descriptors })
}

#[cfg(test)]
#[path = "../../tests/unit/animation/entrance.rs"]
mod tests;
