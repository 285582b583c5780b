use std::{io::Cursor, sync::Arc};

use anyhow::Context;

use crate::{
    foundation::error::{TitlecardError, TitlecardResult},
    foundation::math::premultiply_rgba8_in_place,
    state::template::CustomIconKind,
};

/// Vector icons are rasterized at this height so that the 57px icon row stays crisp when the
/// export canvas is scaled up.
pub const SVG_RASTER_HEIGHT_PX: f32 = 228.0;

const MAX_DIM: u32 = 8_192;

/// Decoded custom icon in premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq)]
pub struct IconBitmap {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Read intrinsic `(width, height)` without decoding pixels.
pub fn sniff_icon_size(kind: CustomIconKind, bytes: &[u8]) -> TitlecardResult<(f64, f64)> {
    match kind {
        CustomIconKind::Svg => {
            let tree = parse_svg(bytes)?;
            let size = tree.size();
            Ok((f64::from(size.width()), f64::from(size.height())))
        }
        CustomIconKind::Png | CustomIconKind::Gif | CustomIconKind::Other => {
            let (w, h) = image::ImageReader::new(Cursor::new(bytes))
                .with_guessed_format()
                .context("guess icon image format")?
                .into_dimensions()
                .context("read icon image dimensions")?;
            Ok((f64::from(w), f64::from(h)))
        }
    }
}

/// Decode icon bytes to a premultiplied bitmap.
pub fn decode_icon(kind: CustomIconKind, bytes: &[u8]) -> TitlecardResult<IconBitmap> {
    match kind {
        CustomIconKind::Svg => rasterize_svg(&parse_svg(bytes)?),
        CustomIconKind::Png | CustomIconKind::Gif | CustomIconKind::Other => decode_image(bytes),
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> TitlecardResult<IconBitmap> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(IconBitmap {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn parse_svg(bytes: &[u8]) -> TitlecardResult<usvg::Tree> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

fn rasterize_svg(tree: &usvg::Tree) -> TitlecardResult<IconBitmap> {
    let size = tree.size();
    if !size.width().is_finite() || !size.height().is_finite() || size.height() <= 0.0 {
        return Err(TitlecardError::validation("svg has invalid width/height"));
    }

    let scale = SVG_RASTER_HEIGHT_PX / size.height();
    let width = ((size.width() * scale).ceil() as u32).max(1);
    let height = ((size.height() * scale).ceil() as u32).max(1);
    if width > MAX_DIM || height > MAX_DIM {
        return Err(TitlecardError::validation(format!(
            "svg raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| TitlecardError::render("failed to allocate svg pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(tree, xform, &mut pixmap.as_mut());

    Ok(IconBitmap {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.data().to_vec()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
