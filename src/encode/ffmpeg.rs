//! MP4 export through the system `ffmpeg`.
//!
//! Each title-card frame is composited onto the card background and piped as opaque RGBA.
//! The sink accepts exactly the frames announced in [`SinkConfig`], numbered from zero without
//! gaps. A render that stops early fails instead of leaving a short video behind.

use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::color::Color;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{TitlecardError, TitlecardResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;

/// Output settings for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    pub out_path: PathBuf,
    /// Pass `-y` to ffmpeg; with `false` ffmpeg refuses an existing file.
    pub overwrite: bool,
    /// Card background the frames are flattened over.
    pub background: Color,
    /// libx264 constant rate factor (`0..=51`, lower is higher quality).
    pub crf: u8,
}

impl FfmpegSinkOpts {
    pub const DEFAULT_CRF: u8 = 18;

    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Color::BLACK,
            crf: Self::DEFAULT_CRF,
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Streams frames into an `ffmpeg` child process (H.264, yuv420p, no audio).
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    state: State,
}

enum State {
    Idle,
    Encoding(Encoder),
    Finished,
}

struct Encoder {
    child: Child,
    stdin: ChildStdin,
    stderr: JoinHandle<std::io::Result<Vec<u8>>>,
    cfg: SinkConfig,
    next: u64,
    opaque: Vec<u8>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            state: State::Idle,
        }
    }

    pub fn options(&self) -> &FfmpegSinkOpts {
        &self.opts
    }

    /// Frames written since `begin`.
    pub fn frames_written(&self) -> u64 {
        match &self.state {
            State::Encoding(enc) => enc.next,
            State::Idle | State::Finished => 0,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> TitlecardResult<()> {
        if matches!(self.state, State::Encoding(_)) {
            return Err(TitlecardError::export("ffmpeg sink already started"));
        }
        check_config(&cfg, &self.opts)?;

        let args = encoder_args(&cfg, &self.opts);
        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            frames = cfg.frame_count,
            "spawning ffmpeg"
        );
        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => TitlecardError::export(
                    "MP4 export needs ffmpeg, but it was not found on PATH",
                ),
                _ => TitlecardError::export(format!("failed to spawn ffmpeg: {e}")),
            })?;

        let (Some(stdin), Some(mut stderr)) = (child.stdin.take(), child.stderr.take()) else {
            kill_quietly(&mut child);
            return Err(TitlecardError::export("ffmpeg pipes were not opened"));
        };
        let stderr = std::thread::spawn(move || {
            let mut log = Vec::new();
            stderr.read_to_end(&mut log)?;
            Ok(log)
        });

        let opaque = vec![0u8; cfg.width as usize * cfg.height as usize * 4];
        self.state = State::Encoding(Encoder {
            child,
            stdin,
            stderr,
            cfg,
            next: 0,
            opaque,
        });
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TitlecardResult<()> {
        let State::Encoding(enc) = &mut self.state else {
            return Err(TitlecardError::export("ffmpeg sink is not encoding"));
        };
        check_frame_index(idx, enc.next, enc.cfg.frame_count)?;
        if frame.width != enc.cfg.width || frame.height != enc.cfg.height {
            return Err(TitlecardError::validation(format!(
                "frame is {}x{}, video is {}x{}",
                frame.width, frame.height, enc.cfg.width, enc.cfg.height
            )));
        }

        flatten_onto(&mut enc.opaque, frame, self.opts.background)?;
        enc.stdin.write_all(&enc.opaque).map_err(|e| {
            TitlecardError::export(format!("failed to write frame {} to ffmpeg: {e}", idx.0))
        })?;
        enc.next += 1;
        Ok(())
    }

    fn end(&mut self) -> TitlecardResult<()> {
        let enc = match std::mem::replace(&mut self.state, State::Finished) {
            State::Encoding(enc) => enc,
            other => {
                self.state = other;
                return Err(TitlecardError::export("ffmpeg sink is not encoding"));
            }
        };
        let Encoder {
            mut child,
            stdin,
            stderr,
            cfg,
            next,
            ..
        } = enc;

        drop(stdin);
        let status = child
            .wait()
            .map_err(|e| TitlecardError::export(format!("failed to wait for ffmpeg: {e}")))?;
        let log = stderr
            .join()
            .map_err(|_| TitlecardError::export("ffmpeg stderr reader panicked"))?
            .map_err(|e| TitlecardError::export(format!("failed to read ffmpeg stderr: {e}")))?;

        if !status.success() {
            return Err(TitlecardError::export(format!(
                "ffmpeg exited with {status}: {}",
                String::from_utf8_lossy(&log).trim()
            )));
        }
        if let Err(e) = check_frame_total(next, cfg.frame_count) {
            if let Err(rm) = std::fs::remove_file(&self.opts.out_path) {
                tracing::warn!(error = %rm, "could not remove incomplete video");
            }
            return Err(e);
        }
        tracing::debug!(frames = next, "ffmpeg finished");
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if let State::Encoding(enc) = &mut self.state {
            tracing::warn!(frames = enc.next, "ffmpeg sink dropped mid-export");
            kill_quietly(&mut enc.child);
        }
    }
}

fn kill_quietly(child: &mut Child) {
    if let Err(e) = child.kill() {
        tracing::debug!(error = %e, "ffmpeg already exited");
    }
    if let Err(e) = child.wait() {
        tracing::debug!(error = %e, "failed to reap ffmpeg");
    }
}

fn check_config(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> TitlecardResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(TitlecardError::validation("video fps must be non-zero"));
    }
    if cfg.width == 0 || cfg.height == 0 {
        return Err(TitlecardError::validation("video size must be non-zero"));
    }
    // yuv420p subsamples chroma 2x2.
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(TitlecardError::validation(format!(
            "video size must be even for yuv420p (got {}x{})",
            cfg.width, cfg.height
        )));
    }
    if cfg.frame_count == 0 {
        return Err(TitlecardError::validation("video needs at least one frame"));
    }
    if opts.crf > 51 {
        return Err(TitlecardError::validation(format!(
            "crf must be in 0..=51 (got {})",
            opts.crf
        )));
    }
    Ok(())
}

/// Frames must arrive as `0, 1, 2, ..` and stay below the configured count.
fn check_frame_index(idx: FrameIndex, next: u64, frame_count: u64) -> TitlecardResult<()> {
    if idx.0 != next {
        return Err(TitlecardError::export(format!(
            "ffmpeg sink expected frame {next}, got {}",
            idx.0
        )));
    }
    if idx.0 >= frame_count {
        return Err(TitlecardError::export(format!(
            "ffmpeg sink was configured for {frame_count} frames"
        )));
    }
    Ok(())
}

fn check_frame_total(written: u64, frame_count: u64) -> TitlecardResult<()> {
    if written == frame_count {
        return Ok(());
    }
    Err(TitlecardError::export(format!(
        "video ended after {written} of {frame_count} frames"
    )))
}

/// Command line for one export. Input options precede `-i`.
fn encoder_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(32);
    let mut push = |items: &[&str]| args.extend(items.iter().map(OsString::from));

    push(&[if opts.overwrite { "-y" } else { "-n" }]);
    push(&["-hide_banner", "-loglevel", "error"]);
    push(&["-f", "rawvideo", "-pix_fmt", "rgba"]);
    push(&["-s", &format!("{}x{}", cfg.width, cfg.height)]);
    push(&["-framerate", &format!("{}/{}", cfg.fps.num, cfg.fps.den)]);
    push(&["-i", "pipe:0"]);
    push(&["-frames:v", &cfg.frame_count.to_string()]);
    push(&["-an", "-c:v", "libx264", "-crf", &opts.crf.to_string()]);
    push(&["-pix_fmt", "yuv420p", "-movflags", "+faststart"]);
    args.push(opts.out_path.clone().into_os_string());
    args
}

/// Composite `frame` onto an opaque `background`, writing RGBA8 with alpha 255.
fn flatten_onto(dst: &mut [u8], frame: &FrameRGBA, background: Color) -> TitlecardResult<()> {
    if frame.data.len() != dst.len() {
        return Err(TitlecardError::validation(format!(
            "frame has {} bytes, expected {}",
            frame.data.len(),
            dst.len()
        )));
    }
    let bg = [background.r, background.g, background.b].map(u16::from);

    for (out, px) in dst.chunks_exact_mut(4).zip(frame.data.chunks_exact(4)) {
        let a = u16::from(px[3]);
        let keep_bg = 255 - a;
        for c in 0..3 {
            let fg = if frame.premultiplied {
                u16::from(px[c])
            } else {
                mul_div255_u16(u16::from(px[c]), a)
            };
            out[c] = (fg + mul_div255_u16(bg[c], keep_bg)).min(255) as u8;
        }
        out[3] = 255;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
