//! Export helpers: PNG encoding, file naming and multi-size bundles.
use std::fmt;
use std::path::{Path, PathBuf};

use tiny_skia::Pixmap;

use crate::error::ExportError;
use crate::models::CustomIconConfig;
use crate::renderer::render_to_vector_document;
use crate::renderer_skia::IconRenderer;

pub const MIN_EXPORT_SIZE: u32 = 1;
pub const MAX_EXPORT_SIZE: u32 = 2048;

/// Sizes offered as quick previews and in the batch download.
pub const PREVIEW_SIZES: [u32; 4] = [32, 64, 96, 128];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Svg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One rendered size, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedIcon {
    pub size: u32,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportedIcon {
    pub fn file_name(&self, basename: &str) -> String {
        export_file_name(basename, self.size, self.format)
    }

    pub fn write_to_dir(&self, dir: &Path, basename: &str) -> Result<PathBuf, ExportError> {
        let path = dir.join(self.file_name(basename));
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

pub fn validate_export_size(size: u32) -> Result<u32, ExportError> {
    if (MIN_EXPORT_SIZE..=MAX_EXPORT_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(ExportError::InvalidSize {
            size,
            min: MIN_EXPORT_SIZE,
            max: MAX_EXPORT_SIZE,
        })
    }
}

/// `<basename>-<size>px.<ext>`
pub fn export_file_name(basename: &str, size: u32, format: ExportFormat) -> String {
    format!("{basename}-{size}px.{}", format.extension())
}

/// Encode a pixmap as PNG with compression quality control (0-100).
/// Maps 0-100 to PNG compression types:
/// - 0-25: Fast (fastest encoding, larger files)
/// - 26-75: Default (balanced)
/// - 76-100: Best (slowest encoding, smallest files)
pub fn encode_png_with_quality(pixmap: &Pixmap, quality: u8) -> Result<Vec<u8>, ExportError> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_filter(png::FilterType::Paeth);
        encoder.set_compression(match quality {
            0..=25 => png::Compression::Fast,
            26..=75 => png::Compression::Default,
            _ => png::Compression::Best,
        });

        // Pixmaps are premultiplied; PNG wants straight alpha.
        let data: Vec<u8> = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&data)?;
    }
    Ok(out)
}

/// Render one size in one format.
pub fn export_icon(
    renderer: &IconRenderer,
    config: &CustomIconConfig,
    size: u32,
    format: ExportFormat,
    quality: u8,
) -> Result<ExportedIcon, ExportError> {
    let size = validate_export_size(size)?;
    let bytes = match format {
        ExportFormat::Png => {
            let pixmap = renderer.render_to_surface(config, size)?;
            encode_png_with_quality(&pixmap, quality)?
        }
        ExportFormat::Svg => render_to_vector_document(config, size)?.into_bytes(),
    };
    Ok(ExportedIcon {
        size,
        format,
        bytes,
    })
}

/// Render every size independently, one scoped thread per size.
///
/// Results come back in the order of `sizes`. A failure at one size does not
/// affect the others.
pub fn render_bundle(
    renderer: &IconRenderer,
    config: &CustomIconConfig,
    sizes: &[u32],
    format: ExportFormat,
    quality: u8,
) -> Vec<Result<ExportedIcon, ExportError>> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = sizes
            .iter()
            .map(|&size| {
                (
                    size,
                    scope.spawn(move || export_icon(renderer, config, size, format, quality)),
                )
            })
            .collect();

        handles
            .into_iter()
            .map(|(size, handle)| handle.join().unwrap_or(Err(ExportError::Worker(size))))
            .collect()
    })
}
