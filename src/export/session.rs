//! Still and video export.
//!
//! A [`RenderSession`] computes the layout and entrance timeline once; every frame after that only
//! resamples block poses and re-rasterizes.

use std::path::Path;

use anyhow::Context;

use crate::{
    animation::entrance::{EntranceTimeline, build_entrance},
    encode::{
        ffmpeg::{FfmpegSink, FfmpegSinkOpts},
        sink::{FrameSink, SinkConfig},
    },
    export::project::Project,
    foundation::core::{Canvas, Fps, FrameIndex},
    foundation::error::{TitlecardError, TitlecardResult},
    layout::pass::{TemplateLayout, compute_layout},
    render::{
        backend::{FrameRGBA, RenderBackend},
        plan::{FramePlan, compile_frame},
    },
    state::template::TemplateState,
    text::measure::TextMeasurer,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ExportSettings {
    pub fps: u32,
    #[serde(rename = "duration")]
    pub duration_s: f64,
    pub width: u32,
    pub height: u32,
    pub overwrite: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            fps: 60,
            duration_s: 5.0,
            width: 1920,
            height: 1080,
            overwrite: true,
        }
    }
}

impl ExportSettings {
    pub fn validate(&self) -> TitlecardResult<()> {
        if !self.duration_s.is_finite() || self.duration_s <= 0.0 {
            return Err(TitlecardError::validation(
                "export.duration must be finite and > 0",
            ));
        }
        self.fps()?;
        self.canvas()?;
        Ok(())
    }

    pub fn fps(&self) -> TitlecardResult<Fps> {
        Fps::new(self.fps, 1)
    }

    pub fn canvas(&self) -> TitlecardResult<Canvas> {
        Canvas::new(self.width, self.height)
    }

    /// Frames covering the whole duration.
    pub fn frame_count(&self) -> TitlecardResult<u64> {
        Ok(self.fps()?.secs_to_frames_ceil(self.duration_s))
    }
}

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub frames_total: u64,
    pub frames_rendered: u64,
}

/// Layout and timeline for one project, rendered through backend `B`.
pub struct RenderSession<'p, B> {
    state: &'p TemplateState,
    settings: ExportSettings,
    layout: TemplateLayout,
    timeline: EntranceTimeline,
    backend: B,
}

impl<'p, B: RenderBackend + TextMeasurer> RenderSession<'p, B> {
    /// Validate `project` and run the layout pass, measuring with `backend`.
    #[tracing::instrument(skip_all)]
    pub fn new(project: &'p Project, mut backend: B) -> TitlecardResult<Self> {
        project.validate()?;
        let canvas = project.export.canvas()?;
        let layout = compute_layout(&project.state, canvas, &mut backend)?;
        let timeline = build_entrance(&layout.blocks, canvas, &project.animation)?;
        tracing::debug!(
            blocks = layout.blocks.len(),
            entrance_s = timeline.duration(),
            "render session ready"
        );
        Ok(Self {
            state: &project.state,
            settings: project.export,
            layout,
            timeline,
            backend,
        })
    }

    pub fn layout(&self) -> &TemplateLayout {
        &self.layout
    }

    pub fn timeline(&self) -> &EntranceTimeline {
        &self.timeline
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Draw list at `t` seconds into the entrance.
    pub fn plan_at(&self, t: f64) -> FramePlan {
        compile_frame(self.state, &self.layout, &self.timeline.sample(t))
    }

    /// Draw list for the settled editing pose.
    pub fn final_plan(&self) -> FramePlan {
        compile_frame(self.state, &self.layout, &self.timeline.final_poses())
    }

    pub fn render_at(&mut self, t: f64) -> TitlecardResult<FrameRGBA> {
        if !t.is_finite() {
            return Err(TitlecardError::invalid_argument("time must be finite"));
        }
        let plan = self.plan_at(t);
        self.backend.render_plan(&plan)
    }

    /// Render every frame of the export duration into `sink`.
    #[tracing::instrument(skip_all, fields(fps = self.settings.fps, duration_s = self.settings.duration_s))]
    pub fn render_to_sink(&mut self, sink: &mut dyn FrameSink) -> TitlecardResult<ExportStats> {
        let fps = self.settings.fps()?;
        let frames_total = self.settings.frame_count()?;
        sink.begin(SinkConfig {
            width: self.layout.canvas.width,
            height: self.layout.canvas.height,
            fps,
            frame_count: frames_total,
        })?;

        let mut stats = ExportStats {
            frames_total,
            frames_rendered: 0,
        };
        for f in 0..frames_total {
            let frame = self.render_at(fps.frames_to_secs(f))?;
            sink.push_frame(FrameIndex(f), &frame)?;
            stats.frames_rendered += 1;
        }
        sink.end()?;
        tracing::debug!(frames = stats.frames_rendered, "export finished");
        Ok(stats)
    }
}

/// Render the frame at `t` seconds and write it as a PNG.
pub fn export_still<B: RenderBackend + TextMeasurer>(
    project: &Project,
    backend: B,
    t: f64,
    out: &Path,
) -> TitlecardResult<()> {
    prepare_output(out, project.export.overwrite)?;
    let mut session = RenderSession::new(project, backend)?;
    let frame = session.render_at(t)?;
    write_png(&frame, out)
}

/// Render the full export duration and encode it to MP4 with the system `ffmpeg`.
pub fn export_video<B: RenderBackend + TextMeasurer>(
    project: &Project,
    backend: B,
    out: &Path,
) -> TitlecardResult<ExportStats> {
    prepare_output(out, project.export.overwrite)?;
    let mut session = RenderSession::new(project, backend)?;
    let opts = FfmpegSinkOpts::new(out)
        .with_overwrite(project.export.overwrite)
        .with_background(project.state.background_color);
    let mut sink = FfmpegSink::new(opts);
    session.render_to_sink(&mut sink)
}

/// Refuse an existing `out` unless `overwrite`, then create its parent directory.
fn prepare_output(out: &Path, overwrite: bool) -> TitlecardResult<()> {
    if !overwrite && out.exists() {
        return Err(TitlecardError::export(format!(
            "output file '{}' already exists",
            out.display()
        )));
    }
    create_parent_dir(out)
}

fn create_parent_dir(out: &Path) -> TitlecardResult<()> {
    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output directory '{}'", dir.display()))?;
    }
    Ok(())
}

/// Write a frame as straight-alpha PNG.
pub fn write_png(frame: &FrameRGBA, out: &Path) -> TitlecardResult<()> {
    create_parent_dir(out)?;
    let rgba = frame.to_straight_rgba8();
    image::save_buffer_with_format(
        out,
        &rgba,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/session.rs"]
mod tests;
