//! SVG to PNG conversion.

use crate::error::RenderError;
use std::sync::Arc;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use resvg::tiny_skia;
use resvg::usvg::{self, fontdb::Database};

/// Rasterizes `svg` at its own size over an opaque `background` and encodes it as PNG.
pub fn svg_to_png_bytes(
    svg: &str,
    fontdb: Arc<Database>,
    background: [u8; 3],
) -> Result<Vec<u8>, RenderError> {
    let options = usvg::Options {
        fontdb,
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(svg, &options)?;
    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or(RenderError::Canvas(width, height))?;
    let [r, g, b] = background;

    pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, 255));
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let mut png = Vec::new();

    PngEncoder::new(&mut png).write_image(
        pixmap.data(),
        width,
        height,
        image::ExtendedColorType::Rgba8,
    )?;

    Ok(png)
}
