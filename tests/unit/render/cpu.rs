use super::*;
use crate::{
    foundation::core::{Canvas, Rect},
    render::plan::compile_frame,
    state::template::{IconStyle, TemplateState},
};

fn small_plan(ops: Vec<DrawOp>) -> FramePlan {
    FramePlan {
        canvas: Canvas::new(32, 16).unwrap(),
        background: Color::BLACK,
        ops,
    }
}

fn fill(color: Color, opacity: f32) -> DrawOp {
    DrawOp::FillRect {
        rect: Rect::new(0.0, 0.0, 32.0, 16.0),
        color,
        opacity,
    }
}

#[test]
fn fills_background() {
    let mut backend = CpuBackend::new(&FontSet::new()).unwrap();
    let frame = backend
        .render_plan(&small_plan(vec![fill(Color::rgb(255, 0, 0), 1.0)]))
        .unwrap();
    assert_eq!((frame.width, frame.height), (32, 16));
    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 32 * 16 * 4);
    assert_eq!(frame.pixel(5, 5), Some([255, 0, 0, 255]));
}

#[test]
fn opacity_layers_blend_over_background() {
    let mut backend = CpuBackend::new(&FontSet::new()).unwrap();
    let frame = backend
        .render_plan(&small_plan(vec![
            fill(Color::BLACK, 1.0),
            fill(Color::WHITE, 0.5),
        ]))
        .unwrap();
    let [r, g, b, a] = frame.pixel(10, 10).unwrap();
    assert_eq!(a, 255);
    assert!((120..=135).contains(&r) && r == g && g == b, "{r}");
}

#[test]
fn zero_opacity_ops_are_skipped() {
    let mut backend = CpuBackend::new(&FontSet::new()).unwrap();
    let frame = backend
        .render_plan(&small_plan(vec![fill(Color::WHITE, 0.0)]))
        .unwrap();
    assert_eq!(frame.pixel(1, 1), Some([0, 0, 0, 0]));
}

#[test]
fn text_without_fonts_is_unavailable() {
    let mut backend = CpuBackend::new(&FontSet::new()).unwrap();
    let err = backend
        .render_plan(&small_plan(vec![DrawOp::Text {
            text: "A".to_owned(),
            weight: FontWeight::Bold,
            size_px: 12.0,
            center_x: 16.0,
            baseline_y: 12.0,
            color: Color::WHITE,
            opacity: 1.0,
        }]))
        .unwrap_err();
    assert!(err.is_deferrable());
}

#[test]
fn icon_only_template_renders_dots() {
    let state = TemplateState {
        top_title: String::new(),
        main_title: String::new(),
        show_logo: false,
        show_subtitle1: false,
        show_subtitle2: false,
        icon_count: 1,
        icon_style: IconStyle::Dot,
        ..TemplateState::default()
    };
    let canvas = Canvas::new(320, 180).unwrap();
    let layout = crate::layout::pass::compute_layout(
        &state,
        canvas,
        &mut crate::text::measure::HeuristicMeasurer::default(),
    )
    .unwrap();
    let plan = compile_frame(&state, &layout, &[]);
    let mut backend = CpuBackend::new(&FontSet::new()).unwrap();
    let frame = backend.render_plan(&plan).unwrap();

    assert_eq!(frame.pixel(160, 90), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(2, 2), Some([0, 0, 0, 255]));
}

#[test]
fn custom_bitmap_is_scaled_into_dest() {
    let bitmap = Arc::new(IconBitmap {
        width: 2,
        height: 2,
        rgba8_premul: Arc::new(vec![0, 255, 0, 255].repeat(4)),
    });
    let mut backend = CpuBackend::new(&FontSet::new()).unwrap();
    let plan = small_plan(vec![
        fill(Color::BLACK, 1.0),
        DrawOp::Image {
            bitmap: Arc::clone(&bitmap),
            dest: Rect::new(8.0, 4.0, 24.0, 12.0),
            opacity: 1.0,
        },
    ]);
    let frame = backend.render_plan(&plan).unwrap();
    assert_eq!(frame.pixel(16, 8), Some([0, 255, 0, 255]));
    assert_eq!(frame.pixel(2, 8), Some([0, 0, 0, 255]));

    // Second render reuses the cached paint.
    let again = backend.render_plan(&plan).unwrap();
    assert_eq!(again.data, frame.data);
}
