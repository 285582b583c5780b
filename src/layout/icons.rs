use crate::{
    layout::catalog::ICON_SIZE_PX,
    state::template::{IconStyle, TemplateState},
};

/// Horizontal centers of `count` icons spread across `reference_width_px` around `center_x`.
///
/// The outermost icons sit flush with the reference edges. One icon sits on `center_x`.
pub fn distribute_icons(
    count: usize,
    icon_width_px: f64,
    reference_width_px: f64,
    center_x: f64,
) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![center_x],
        n => {
            let spacing = (reference_width_px - icon_width_px) / (n - 1) as f64;
            let start_x = center_x - reference_width_px / 2.0 + icon_width_px / 2.0;
            (0..n).map(|i| start_x + i as f64 * spacing).collect()
        }
    }
}

/// Rendered icon width for the drawn style. Custom icons keep their aspect ratio at the nominal
/// height.
pub fn icon_rendered_width(state: &TemplateState) -> f64 {
    match state.effective_icon_style() {
        IconStyle::Custom => ICON_SIZE_PX * state.custom_icon.aspect_ratio(),
        IconStyle::Arrow | IconStyle::Dot | IconStyle::Star => ICON_SIZE_PX,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/icons.rs"]
mod tests;
