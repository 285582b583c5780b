//! Backend-agnostic draw list for one frame.
//!
//! [`compile_frame`] turns a [`TemplateLayout`] and the current [`BlockPose`]s into ordered
//! [`DrawOp`]s in canvas pixel space. Backends only rasterize; they never re-derive layout.

use std::sync::Arc;

use crate::{
    animation::entrance::BlockPose,
    assets::decode::IconBitmap,
    foundation::color::Color,
    foundation::core::{BezPath, Canvas, Point, Rect},
    layout::{
        catalog::{BlockKind, ICON_SIZE_PX},
        pass::TemplateLayout,
        solver::PositionedBlock,
    },
    state::template::{IconStyle, TemplateState},
    text::{autosize::SIDE_INSET_PX, measure::FontWeight},
};

/// Wordmark drawn in the logo slot.
pub const LOGO_TEXT: &str = "WIX";
pub const LOGO_FONT_SIZE_PX: f64 = 28.0;
pub const ICON_STROKE_WIDTH_PX: f64 = 2.0;

/// Distance from a box's vertical center to the alphabetic baseline of text centered in it.
///
/// Assumes ascent `0.75em` and descent `0.25em`, nudged down by `0.05em`.
pub fn baseline_offset(size_px: f64) -> f64 {
    (0.75 - 0.25) / 2.0 * size_px - 0.05 * size_px
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        color: Color,
        opacity: f32,
    },
    FillPath {
        path: BezPath,
        color: Color,
        opacity: f32,
    },
    StrokePath {
        path: BezPath,
        color: Color,
        width: f64,
        /// `[on, off]` dash lengths.
        dash: Option<[f64; 2]>,
        opacity: f32,
    },
    /// One line of text horizontally centered on `center_x`.
    Text {
        text: String,
        weight: FontWeight,
        size_px: f64,
        center_x: f64,
        baseline_y: f64,
        color: Color,
        opacity: f32,
    },
    /// Bitmap scaled into `dest`.
    Image {
        bitmap: Arc<IconBitmap>,
        dest: Rect,
        opacity: f32,
    },
}

impl DrawOp {
    pub fn opacity(&self) -> f32 {
        match self {
            Self::FillRect { opacity, .. }
            | Self::FillPath { opacity, .. }
            | Self::StrokePath { opacity, .. }
            | Self::Text { opacity, .. }
            | Self::Image { opacity, .. } => *opacity,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    pub canvas: Canvas,
    pub background: Color,
    pub ops: Vec<DrawOp>,
}

impl FramePlan {
    /// Text ops in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Text { .. }))
    }
}

/// Compile the draw list for `layout` with per-block `poses`.
///
/// A block without a matching pose is drawn settled. Fully transparent blocks emit nothing.
pub fn compile_frame(
    state: &TemplateState,
    layout: &TemplateLayout,
    poses: &[BlockPose],
) -> FramePlan {
    let canvas = layout.canvas;
    let mut ops = vec![DrawOp::FillRect {
        rect: Rect::new(0.0, 0.0, canvas.width_f64(), canvas.height_f64()),
        color: state.background_color,
        opacity: 1.0,
    }];

    for block in &layout.blocks {
        let pose = poses
            .iter()
            .find(|p| p.index == block.index && p.kind == block.block.kind)
            .copied()
            .unwrap_or_else(|| BlockPose::settled(block.block.kind, block.index));
        if pose.opacity <= 0.0 {
            continue;
        }
        let center_y = block.final_center_y + pose.y_offset;
        let opacity = pose.opacity.min(1.0);
        emit_block(state, layout, block, center_y, opacity, &mut ops);
    }

    if state.debug_mode {
        emit_debug_overlay(layout, &mut ops);
    }

    FramePlan {
        canvas,
        background: state.background_color,
        ops,
    }
}

fn emit_block(
    state: &TemplateState,
    layout: &TemplateLayout,
    block: &PositionedBlock,
    center_y: f64,
    opacity: f32,
    ops: &mut Vec<DrawOp>,
) {
    let color = state.text_color;
    let center_x = block.center_x;
    match block.block.kind {
        BlockKind::Logo => ops.push(DrawOp::Text {
            text: LOGO_TEXT.to_owned(),
            weight: FontWeight::Bold,
            size_px: LOGO_FONT_SIZE_PX,
            center_x,
            baseline_y: center_y + baseline_offset(LOGO_FONT_SIZE_PX),
            color,
            opacity,
        }),
        kind @ (BlockKind::TopTitle
        | BlockKind::MainTitle
        | BlockKind::Subtitle1
        | BlockKind::Subtitle2) => {
            let Some(text) = layout.text(kind) else {
                return;
            };
            let Some(params) = kind.autosize_params() else {
                return;
            };
            let size = text.fit.font_size_px;
            let line_height = text.fit.line_height_px;
            let line_ys: Vec<f64> = if text.lines.len() == 2 {
                vec![center_y - line_height / 2.0, center_y + line_height / 2.0]
            } else {
                vec![center_y]
            };
            for (line, y) in text.lines.iter().zip(line_ys) {
                ops.push(DrawOp::Text {
                    text: line.clone(),
                    weight: params.weight,
                    size_px: size,
                    center_x,
                    baseline_y: y + baseline_offset(size),
                    color,
                    opacity,
                });
            }
        }
        BlockKind::Icons => {
            for &x in &layout.icon_centers_x {
                emit_icon(state, layout, Point::new(x, center_y), opacity, ops);
            }
        }
    }
}

fn emit_icon(
    state: &TemplateState,
    layout: &TemplateLayout,
    center: Point,
    opacity: f32,
    ops: &mut Vec<DrawOp>,
) {
    let color = state.text_color;
    let size = ICON_SIZE_PX;
    let stroke = |path: BezPath| DrawOp::StrokePath {
        path,
        color,
        width: ICON_STROKE_WIDTH_PX,
        dash: None,
        opacity,
    };
    match layout.icon_style {
        IconStyle::Arrow => {
            ops.push(stroke(circle_path(center, size / 2.0)));
            ops.push(stroke(polyline(&[
                (center.x + 10.0, center.y - 8.0),
                (center.x - 5.0, center.y),
                (center.x + 10.0, center.y + 8.0),
            ])));
            ops.push(stroke(polyline(&[
                (center.x - 5.0, center.y),
                (center.x + 15.0, center.y),
            ])));
        }
        IconStyle::Dot => ops.push(DrawOp::FillPath {
            path: circle_path(center, size / 4.0),
            color,
            opacity,
        }),
        IconStyle::Star => ops.push(DrawOp::FillPath {
            path: star_path(center, size / 4.0),
            color,
            opacity,
        }),
        IconStyle::Custom => {
            let w = layout.icon_width_px;
            let dest = Rect::new(
                center.x - w / 2.0,
                center.y - size / 2.0,
                center.x + w / 2.0,
                center.y + size / 2.0,
            );
            match state.custom_icon.bitmap() {
                Some(bitmap) => ops.push(DrawOp::Image {
                    bitmap,
                    dest,
                    opacity,
                }),
                None => {
                    let half = size / 2.0;
                    let square = Rect::new(
                        center.x - half,
                        center.y - half,
                        center.x + half,
                        center.y + half,
                    );
                    ops.push(stroke(rect_path(square)));
                    let d = half * 0.6;
                    let mut cross = BezPath::new();
                    cross.move_to((center.x - d, center.y - d));
                    cross.line_to((center.x + d, center.y + d));
                    cross.move_to((center.x + d, center.y - d));
                    cross.line_to((center.x - d, center.y + d));
                    ops.push(stroke(cross));
                }
            }
        }
    }
}

/// Overlay colors per block kind (straight RGB, drawn at 20% fill / 80% outline).
fn debug_color(kind: BlockKind) -> Color {
    match kind {
        BlockKind::Logo => Color::rgb(0, 100, 255),
        BlockKind::TopTitle => Color::rgb(0, 255, 0),
        BlockKind::MainTitle => Color::rgb(128, 0, 255),
        BlockKind::Subtitle1 => Color::rgb(255, 165, 0),
        BlockKind::Subtitle2 => Color::rgb(255, 255, 0),
        BlockKind::Icons => Color::rgb(128, 128, 128),
    }
}

fn emit_debug_overlay(layout: &TemplateLayout, ops: &mut Vec<DrawOp>) {
    let canvas = layout.canvas;
    let (w, h) = (canvas.width_f64(), canvas.height_f64());
    let (cx, cy) = (canvas.center_x(), canvas.center_y());
    let left = SIDE_INSET_PX;
    let right = w - SIDE_INSET_PX;

    for x in [left, right] {
        ops.push(DrawOp::StrokePath {
            path: polyline(&[(x, 0.0), (x, h)]),
            color: Color::rgb(255, 0, 0),
            width: 2.0,
            dash: Some([5.0, 5.0]),
            opacity: 1.0,
        });
    }
    for line in [[(cx, 0.0), (cx, h)], [(0.0, cy), (w, cy)]] {
        ops.push(DrawOp::StrokePath {
            path: polyline(&line),
            color: Color::rgb(0x88, 0x88, 0x88),
            width: 1.0,
            dash: Some([2.0, 2.0]),
            opacity: 1.0,
        });
    }

    for block in &layout.blocks {
        let rect = Rect::new(left, block.top(), right, block.bottom());
        let color = debug_color(block.block.kind);
        ops.push(DrawOp::FillRect {
            rect,
            color,
            opacity: 0.2,
        });
        ops.push(DrawOp::StrokePath {
            path: rect_path(rect),
            color,
            width: 1.0,
            dash: None,
            opacity: 0.8,
        });
        if block.block.margin_bottom > 0.0 {
            let y = block.bottom() + block.block.margin_bottom / 2.0;
            ops.push(DrawOp::StrokePath {
                path: polyline(&[(left, y), (right, y)]),
                color: Color::rgb(0, 255, 255),
                width: 2.0,
                dash: Some([3.0, 3.0]),
                opacity: 1.0,
            });
        }
    }
}

fn polyline(points: &[(f64, f64)]) -> BezPath {
    let mut path = BezPath::new();
    for (i, &p) in points.iter().enumerate() {
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path
}

fn rect_path(rect: Rect) -> BezPath {
    let mut path = polyline(&[
        (rect.x0, rect.y0),
        (rect.x1, rect.y0),
        (rect.x1, rect.y1),
        (rect.x0, rect.y1),
    ]);
    path.close_path();
    path
}

fn circle_path(center: Point, radius: f64) -> BezPath {
    use kurbo::Shape;
    kurbo::Circle::new(center, radius).to_path(0.1)
}

/// Five-pointed star, first point straight up, inner radius `0.4 * outer`.
fn star_path(center: Point, outer: f64) -> BezPath {
    let inner = outer * 0.4;
    let at = |deg: f64, r: f64| {
        let a = deg.to_radians();
        (center.x + a.cos() * r, center.y + a.sin() * r)
    };
    let mut path = BezPath::new();
    for j in 0..5 {
        let j = f64::from(j);
        let outer_pt = at(j * 72.0 - 90.0, outer);
        if j == 0.0 {
            path.move_to(outer_pt);
        } else {
            path.line_to(outer_pt);
        }
        path.line_to(at(j * 72.0 - 54.0, inner));
    }
    path.close_path();
    path
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
