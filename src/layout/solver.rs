use crate::{foundation::core::Canvas, layout::catalog::Block};

/// Pre-entrance drop below the final position, as a fraction of canvas height.
pub const ENTRANCE_OFFSET_FRACTION: f64 = 0.10;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedBlock {
    #[serde(flatten)]
    pub block: Block,
    pub center_x: f64,
    pub final_center_y: f64,
    pub start_center_y: f64,
    pub index: usize,
}

impl PositionedBlock {
    pub fn top(&self) -> f64 {
        self.final_center_y - self.block.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.final_center_y + self.block.height / 2.0
    }
}

/// Stacks `blocks` top to bottom, centered as a whole on `canvas`.
pub fn layout_blocks(blocks: &[Block], canvas: Canvas) -> Vec<PositionedBlock> {
    let total: f64 = blocks.iter().map(|b| b.height + b.margin_bottom).sum();
    let center_x = canvas.center_x();
    let offset = ENTRANCE_OFFSET_FRACTION * canvas.height_f64();

    let mut y = canvas.center_y() - total / 2.0;
    let mut out = Vec::with_capacity(blocks.len());
    for (index, block) in blocks.iter().enumerate() {
        let final_center_y = y + block.height / 2.0;
        out.push(PositionedBlock {
            block: *block,
            center_x,
            final_center_y,
            start_center_y: final_center_y + offset,
            index,
        });
        y += block.height + block.margin_bottom;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
