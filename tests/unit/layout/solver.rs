use super::*;
use crate::layout::catalog::{BLOCK_MARGIN_PX, BlockKind};

fn block(kind: BlockKind, height: f64, margin_bottom: f64) -> Block {
    Block {
        kind,
        height,
        margin_bottom,
    }
}

fn sample() -> Vec<Block> {
    vec![
        block(BlockKind::Logo, 58.0, BLOCK_MARGIN_PX),
        block(BlockKind::TopTitle, 52.48, BLOCK_MARGIN_PX),
        block(BlockKind::MainTitle, 316.8, BLOCK_MARGIN_PX),
        block(BlockKind::Icons, 57.0, 0.0),
    ]
}

#[test]
fn empty_catalog_lays_out_nothing() {
    assert!(layout_blocks(&[], Canvas::REFERENCE).is_empty());
}

#[test]
fn adjacent_blocks_touch_at_margin() {
    let out = layout_blocks(&sample(), Canvas::REFERENCE);
    for pair in out.windows(2) {
        let a = &pair[0];
        let b = &pair[1];
        let gap_end = a.bottom() + a.block.margin_bottom;
        assert!((gap_end - b.top()).abs() < 1e-9);
    }
}

#[test]
fn stack_is_vertically_centered() {
    let blocks = sample();
    let canvas = Canvas::REFERENCE;
    let out = layout_blocks(&blocks, canvas);
    let total: f64 = blocks.iter().map(|b| b.height + b.margin_bottom).sum();
    let last = out.last().unwrap();
    let reconstructed = 2.0 * (last.bottom() - canvas.height_f64() / 2.0);
    assert!((total - reconstructed).abs() < 1e-9);
    assert!((out[0].top() - (540.0 - total / 2.0)).abs() < 1e-9);
}

#[test]
fn start_offset_and_center_x_are_uniform() {
    let canvas = Canvas::new(1280, 720).unwrap();
    let out = layout_blocks(&sample(), canvas);
    for (i, p) in out.iter().enumerate() {
        assert_eq!(p.index, i);
        assert_eq!(p.center_x, 640.0);
        assert!((p.start_center_y - p.final_center_y - 72.0).abs() < 1e-9);
    }
}

#[test]
fn single_block_sits_on_canvas_center() {
    let out = layout_blocks(&[block(BlockKind::Logo, 58.0, 0.0)], Canvas::REFERENCE);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].final_center_y, 540.0);
    assert_eq!(out[0].start_center_y, 648.0);
}

#[test]
fn logo_and_main_title_scenario() {
    let out = layout_blocks(
        &[
            block(BlockKind::Logo, 58.0, 26.0),
            block(BlockKind::MainTitle, 300.0, 0.0),
        ],
        Canvas::REFERENCE,
    );
    // total = 384, top = 348.
    assert_eq!(out[0].final_center_y, 377.0);
    assert_eq!(out[1].final_center_y, 348.0 + 84.0 + 150.0);
}
