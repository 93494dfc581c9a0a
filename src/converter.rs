use resvg::usvg::{self, Tree};
use tiny_skia::{Pixmap, Transform};

use crate::error::ExportError;
use crate::font_utils::FontBook;

/// Rasterize an SVG document at its own pixel size onto a transparent pixmap.
///
/// Used to cross-check the vector exporter against the raster compositor and
/// as the alternate PNG path of the CLI.
pub fn rasterize_svg(svg_content: &str, fonts: &FontBook) -> Result<Pixmap, ExportError> {
    let options = usvg::Options {
        fontdb: fonts.database(),
        ..usvg::Options::default()
    };
    let tree = Tree::from_str(svg_content, &options)?;

    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;
    let mut pixmap =
        Pixmap::new(width, height).ok_or(ExportError::SvgSurface { width, height })?;

    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
    Ok(pixmap)
}
