use std::{collections::BTreeMap, sync::Arc};

use crate::{
    assets::decode::IconBitmap,
    foundation::color::Color,
    foundation::core::{Affine, BezPath, Point},
    foundation::error::{TitlecardError, TitlecardResult},
    render::{
        backend::{FrameRGBA, RenderBackend},
        plan::{DrawOp, FramePlan},
    },
    text::{
        measure::{FontWeight, TextMeasurer},
        shaper::{FontSet, TextBrushRgba8, TextShaper},
    },
};

/// CPU raster backend powered by `vello_cpu`.
///
/// Owns the [`TextShaper`] used for glyph layout so measurement and drawing see the same faces.
pub struct CpuBackend {
    shaper: TextShaper,
    fonts: BTreeMap<FontWeight, vello_cpu::peniko::FontData>,
    icon_cache: Option<(Arc<Vec<u8>>, vello_cpu::Image)>,
}

impl std::fmt::Debug for CpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBackend")
            .field("shaper", &self.shaper)
            .finish_non_exhaustive()
    }
}

impl CpuBackend {
    pub fn new(fonts: &FontSet) -> TitlecardResult<Self> {
        let missing = fonts.missing();
        if !missing.is_empty() {
            tracing::warn!(
                missing = ?missing.iter().map(|w| w.value()).collect::<Vec<_>>(),
                "font set is incomplete; text in those weights cannot be drawn"
            );
        }
        let shaper = TextShaper::new(fonts)?;
        let fonts = FontWeight::ALL
            .into_iter()
            .filter_map(|w| {
                let bytes = fonts.get(w)?.as_ref().clone();
                Some((
                    w,
                    vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0),
                ))
            })
            .collect();
        Ok(Self {
            shaper,
            fonts,
            icon_cache: None,
        })
    }
}

/// Measures with the same faces the backend draws with.
impl TextMeasurer for CpuBackend {
    fn measure_width(
        &mut self,
        text: &str,
        weight: FontWeight,
        size_px: f64,
    ) -> TitlecardResult<f64> {
        self.shaper.measure_width(text, weight, size_px)
    }
}

impl RenderBackend for CpuBackend {
    #[tracing::instrument(skip_all, fields(ops = plan.ops.len()))]
    fn render_plan(&mut self, plan: &FramePlan) -> TitlecardResult<FrameRGBA> {
        let width: u16 = plan
            .canvas
            .width
            .try_into()
            .map_err(|_| TitlecardError::render("canvas width exceeds u16"))?;
        let height: u16 = plan
            .canvas
            .height
            .try_into()
            .map_err(|_| TitlecardError::render("canvas height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        for op in &plan.ops {
            self.draw_op(&mut ctx, op)?;
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: plan.canvas.width,
            height: plan.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

impl CpuBackend {
    fn draw_op(&mut self, ctx: &mut vello_cpu::RenderContext, op: &DrawOp) -> TitlecardResult<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let opacity = op.opacity();
        if opacity <= 0.0 {
            return Ok(());
        }
        let layered = opacity < 1.0;
        if layered {
            ctx.push_opacity_layer(opacity);
        }

        match op {
            DrawOp::FillRect { rect, color, .. } => {
                ctx.set_paint(paint(*color));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    rect.x0, rect.y0, rect.x1, rect.y1,
                ));
            }
            DrawOp::FillPath { path, color, .. } => {
                ctx.set_paint(paint(*color));
                ctx.fill_path(&bezpath_to_cpu(path));
            }
            DrawOp::StrokePath {
                path,
                color,
                width,
                dash,
                ..
            } => {
                let mut stroke = vello_cpu::kurbo::Stroke::new(*width);
                if let Some(pattern) = dash {
                    stroke = stroke.with_dashes(0.0, *pattern);
                }
                ctx.set_stroke(stroke);
                ctx.set_paint(paint(*color));
                ctx.stroke_path(&bezpath_to_cpu(path));
            }
            DrawOp::Text {
                text,
                weight,
                size_px,
                center_x,
                baseline_y,
                color,
                ..
            } => {
                self.draw_text(ctx, text, *weight, *size_px, *center_x, *baseline_y, *color)?;
            }
            DrawOp::Image { bitmap, dest, .. } => {
                let image = self.icon_paint_for(bitmap)?;
                let (bw, bh) = (f64::from(bitmap.width), f64::from(bitmap.height));
                let transform = Affine::translate((dest.x0, dest.y0))
                    * Affine::scale_non_uniform(dest.width() / bw, dest.height() / bh);
                ctx.set_transform(affine_to_cpu(transform));
                ctx.set_paint(image);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, bw, bh));
            }
        }

        if layered {
            ctx.pop_layer();
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        weight: FontWeight,
        size_px: f64,
        center_x: f64,
        baseline_y: f64,
        color: Color,
    ) -> TitlecardResult<()> {
        let font = self.fonts.get(&weight).cloned().ok_or_else(|| {
            TitlecardError::measurement_unavailable(format!(
                "no font loaded for weight {}",
                weight.value()
            ))
        })?;
        let brush = TextBrushRgba8 {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        };
        let layout = self
            .shaper
            .layout_line(text, weight, size_px as f32, brush)?;

        let width = layout
            .lines()
            .map(|line| f64::from(line.metrics().advance))
            .fold(0.0f64, f64::max);
        let first_baseline = layout
            .lines()
            .next()
            .map(|line| f64::from(line.metrics().baseline))
            .unwrap_or(0.0);
        ctx.set_transform(affine_to_cpu(Affine::translate((
            center_x - width / 2.0,
            baseline_y - first_baseline,
        ))));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }

    fn icon_paint_for(&mut self, bitmap: &IconBitmap) -> TitlecardResult<vello_cpu::Image> {
        if let Some((bytes, image)) = &self.icon_cache
            && Arc::ptr_eq(bytes, &bitmap.rgba8_premul)
        {
            return Ok(image.clone());
        }
        let pixmap =
            image_premul_bytes_to_pixmap(&bitmap.rgba8_premul, bitmap.width, bitmap.height)?;
        let image = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.icon_cache = Some((Arc::clone(&bitmap.rgba8_premul), image.clone()));
        Ok(image)
    }
}

fn paint(color: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> TitlecardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| TitlecardError::render("icon width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| TitlecardError::render("icon height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(TitlecardError::render("icon bitmap byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
