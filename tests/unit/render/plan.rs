use super::*;
use crate::{
    animation::entrance::{EntranceSettings, build_entrance},
    layout::pass::compute_layout,
    text::measure::HeuristicMeasurer,
};

fn layout_for(state: &TemplateState) -> TemplateLayout {
    compute_layout(state, Canvas::REFERENCE, &mut HeuristicMeasurer::default()).unwrap()
}

fn text_ops(plan: &FramePlan) -> Vec<(String, f64, f64)> {
    plan.texts()
        .filter_map(|op| match op {
            DrawOp::Text {
                text,
                size_px,
                baseline_y,
                ..
            } => Some((text.clone(), *size_px, *baseline_y)),
            _ => None,
        })
        .collect()
}

#[test]
fn baseline_offset_is_a_fifth_of_size() {
    assert!((baseline_offset(100.0) - 20.0).abs() < 1e-9);
}

#[test]
fn settled_frame_draws_every_block() {
    let state = TemplateState::default();
    let layout = layout_for(&state);
    let plan = compile_frame(&state, &layout, &[]);

    assert!(matches!(
        plan.ops[0],
        DrawOp::FillRect { color, opacity, .. } if color == Color::BLACK && opacity == 1.0
    ));
    let texts: Vec<String> = text_ops(&plan).into_iter().map(|t| t.0).collect();
    assert_eq!(
        texts,
        vec!["WIX", "Top Title", "THIS IS", "MAIN TITLE", "Subtitle 1", "Subtitle 2"]
    );
    // Four arrows: circle, chevron and tail each.
    let strokes = plan
        .ops
        .iter()
        .filter(|op| matches!(op, DrawOp::StrokePath { .. }))
        .count();
    assert_eq!(strokes, 12);
}

#[test]
fn two_line_title_straddles_block_center() {
    let state = TemplateState::default();
    let layout = layout_for(&state);
    let plan = compile_frame(&state, &layout, &[]);
    let main = layout.block(BlockKind::MainTitle).unwrap();
    let fit = layout.main_fit;

    let texts = text_ops(&plan);
    let l1 = texts.iter().find(|t| t.0 == "THIS IS").unwrap();
    let l2 = texts.iter().find(|t| t.0 == "MAIN TITLE").unwrap();
    let off = baseline_offset(fit.font_size_px);
    assert!((l1.2 - (main.final_center_y - fit.line_height_px / 2.0 + off)).abs() < 1e-9);
    assert!((l2.2 - (main.final_center_y + fit.line_height_px / 2.0 + off)).abs() < 1e-9);
    assert_eq!(l1.1, fit.font_size_px);
}

#[test]
fn poses_shift_and_fade_blocks() {
    let state = TemplateState::default();
    let layout = layout_for(&state);
    let tl = build_entrance(&layout.blocks, layout.canvas, &EntranceSettings::default()).unwrap();

    let plan = compile_frame(&state, &layout, &tl.sample(0.0));
    assert_eq!(plan.ops.len(), 1, "only the background before anything starts");

    let plan = compile_frame(&state, &layout, &tl.sample(0.2));
    let texts = text_ops(&plan);
    assert_eq!(texts.len(), 1);
    let logo = layout.block(BlockKind::Logo).unwrap();
    let settled = logo.final_center_y + baseline_offset(LOGO_FONT_SIZE_PX);
    assert!(texts[0].2 > settled);
    assert!(plan.ops[1].opacity() > 0.0 && plan.ops[1].opacity() < 1.0);
}

#[test]
fn dot_and_star_are_filled() {
    for (style, expect) in [(IconStyle::Dot, 2), (IconStyle::Star, 2)] {
        let state = TemplateState {
            icon_style: style,
            icon_count: 2,
            ..TemplateState::default()
        };
        let layout = layout_for(&state);
        let plan = compile_frame(&state, &layout, &[]);
        let fills = plan
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::FillPath { .. }))
            .count();
        assert_eq!(fills, expect);
    }
}

#[test]
fn undecodable_custom_icon_draws_placeholder() {
    let mut state = TemplateState {
        icon_style: IconStyle::Custom,
        icon_count: 1,
        ..TemplateState::default()
    };
    state.custom_icon.set("bad.png", b"garbage".to_vec());
    let layout = layout_for(&state);
    assert_eq!(layout.icon_style, IconStyle::Custom);
    let plan = compile_frame(&state, &layout, &[]);
    let strokes = plan
        .ops
        .iter()
        .filter(|op| matches!(op, DrawOp::StrokePath { .. }))
        .count();
    assert_eq!(strokes, 2, "square and cross");
    assert!(!plan.ops.iter().any(|op| matches!(op, DrawOp::Image { .. })));
}

#[test]
fn custom_svg_icon_is_drawn_as_image() {
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="#fff"/></svg>"##;
    let mut state = TemplateState {
        icon_style: IconStyle::Custom,
        icon_count: 1,
        ..TemplateState::default()
    };
    state.custom_icon.set("wide.svg", svg.as_bytes().to_vec());
    let layout = layout_for(&state);
    let plan = compile_frame(&state, &layout, &[]);
    let dest = plan
        .ops
        .iter()
        .find_map(|op| match op {
            DrawOp::Image { dest, .. } => Some(*dest),
            _ => None,
        })
        .unwrap();
    assert!((dest.width() - 114.0).abs() < 1e-9);
    assert!((dest.height() - 57.0).abs() < 1e-9);
    assert!((dest.center().x - 960.0).abs() < 1e-9);
}

#[test]
fn debug_overlay_adds_guides_and_boxes() {
    let state = TemplateState {
        debug_mode: true,
        ..TemplateState::default()
    };
    let layout = layout_for(&state);
    let plain = compile_frame(
        &TemplateState {
            debug_mode: false,
            ..state.clone()
        },
        &layout,
        &[],
    );
    let debug = compile_frame(&state, &layout, &[]);
    // 2 margin guides + 2 center lines + 6 boxes * 2 + 5 spacing markers.
    assert_eq!(debug.ops.len() - plain.ops.len(), 2 + 2 + 12 + 5);
}
