//! Raster compositor.
//!
//! Renders a [`CustomIconConfig`] into a tiny-skia [`Pixmap`] at any pixel
//! size. Layers paint in a fixed order, gradient, shape, text, border, all
//! clipped to the rounded-square mask. Size dependent parameters (font size,
//! border width, shape stroke width) are multiplied by `size / iconSize`.
use tiny_skia::*;

use crate::color_utils::skia_color;
use crate::error::{ConfigError, RenderError};
use crate::font_utils::FontBook;
use crate::models::{BorderConfig, CustomIconConfig, GradientHandle, ShapeConfig, TextConfig};
use crate::rect_utils::RoundedSquare;
use crate::shape_utils::ShapeOutline;
use crate::stroke_utils::{plain_stroke, round_stroke};
use crate::text_utils::{locate_caret, prefix_utf16, TextLayout};

/// Width of the text caret at the reference icon size.
const CARET_WIDTH: f32 = 2.0;

/// Opt-in extras for a render. The default renders exactly what gets exported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Draw a text caret before this character offset (live preview only).
    pub caret: Option<usize>,
}

/// Raster renderer holding the fonts used by the text layer.
///
/// Rendering only reads `self`, so one renderer can serve many threads.
#[derive(Clone, Default)]
pub struct IconRenderer {
    fonts: FontBook,
}

impl IconRenderer {
    pub fn new(fonts: FontBook) -> Self {
        Self { fonts }
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Render for export: no preview decorations.
    pub fn render_to_surface(
        &self,
        config: &CustomIconConfig,
        size: u32,
    ) -> Result<Pixmap, RenderError> {
        self.render(config, size, RenderOptions::default())
    }

    /// Render for the live editor, optionally with a text caret.
    pub fn render_preview(
        &self,
        config: &CustomIconConfig,
        size: u32,
        caret: Option<usize>,
    ) -> Result<Pixmap, RenderError> {
        self.render(config, size, RenderOptions { caret })
    }

    pub fn render(
        &self,
        config: &CustomIconConfig,
        size: u32,
        options: RenderOptions,
    ) -> Result<Pixmap, RenderError> {
        config.validate()?;
        if size == 0 {
            return Err(RenderError::InvalidTargetSize);
        }

        let scale = config.scale_for(size);
        tracing::debug!(size, scale, caret = ?options.caret, "rendering icon");

        let mut pixmap = Pixmap::new(size, size).ok_or(RenderError::SurfaceAllocation(size))?;
        let mask = clip_mask(size)?;
        let extent = size as f32;

        render_gradient(&mut pixmap, &mask, extent, &config.gradient_handles)?;
        render_shape(&mut pixmap, &mask, extent, &config.shape, scale)?;
        render_text(
            &mut pixmap,
            &mask,
            extent,
            &config.text,
            scale,
            &self.fonts,
            options.caret,
        )?;
        render_border(&mut pixmap, &mask, extent, &config.border, scale)?;

        Ok(pixmap)
    }
}

/// Convenience wrapper around [`IconRenderer::render_to_surface`].
pub fn render_to_surface(
    config: &CustomIconConfig,
    size: u32,
    fonts: &FontBook,
) -> Result<Pixmap, RenderError> {
    IconRenderer::new(fonts.clone()).render_to_surface(config, size)
}

/// Anti-aliased coverage mask of the rounded square at `size`.
fn clip_mask(size: u32) -> Result<Mask, RenderError> {
    let clip = RoundedSquare::outline(size as f32)
        .to_skia_path()
        .ok_or(RenderError::Path("clip"))?;
    let mut mask = Mask::new(size, size).ok_or(RenderError::SurfaceAllocation(size))?;
    mask.fill_path(&clip, FillRule::Winding, true, Transform::identity());
    Ok(mask)
}

fn color(field: &'static str, value: &str) -> Result<Color, RenderError> {
    skia_color(value).map_err(|_| {
        RenderError::Config(ConfigError::InvalidColor {
            field,
            value: value.to_string(),
        })
    })
}

fn solid_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

fn render_gradient(
    pixmap: &mut Pixmap,
    mask: &Mask,
    size: f32,
    handles: &[GradientHandle; 2],
) -> Result<(), RenderError> {
    let [start, end] = handles;
    let stops = vec![
        GradientStop::new(0.0, color("gradient start color", &start.color)?),
        GradientStop::new(1.0, color("gradient end color", &end.color)?),
    ];
    // Coincident handles degrade to the end color.
    let shader = LinearGradient::new(
        tiny_skia::Point::from_xy(start.x * size, start.y * size),
        tiny_skia::Point::from_xy(end.x * size, end.y * size),
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    )
    .ok_or(RenderError::Shader)?;

    let paint = Paint {
        shader,
        anti_alias: true,
        ..Paint::default()
    };
    let rect = Rect::from_xywh(0.0, 0.0, size, size).ok_or(RenderError::Path("canvas"))?;
    pixmap.fill_rect(rect, &paint, Transform::identity(), Some(mask));
    Ok(())
}

fn render_shape(
    pixmap: &mut Pixmap,
    mask: &Mask,
    size: f32,
    shape: &ShapeConfig,
    scale: f32,
) -> Result<(), RenderError> {
    if !shape.enabled {
        return Ok(());
    }

    let path = ShapeOutline::new(shape.shape_type, size, shape.size)
        .to_skia_path()
        .ok_or(RenderError::Path("shape"))?;
    let center = ShapeOutline::center(size);
    let transform = if shape.rotation != 0.0 {
        Transform::from_rotate_at(shape.rotation, center.x, center.y)
    } else {
        Transform::identity()
    };

    let paint = solid_paint(color("shape.color", &shape.color)?);
    let stroke = round_stroke(shape.stroke_width * scale);
    pixmap.stroke_path(&path, &paint, &stroke, transform, Some(mask));
    Ok(())
}

fn render_text(
    pixmap: &mut Pixmap,
    mask: &Mask,
    size: f32,
    text: &TextConfig,
    scale: f32,
    fonts: &FontBook,
    caret: Option<usize>,
) -> Result<(), RenderError> {
    let font_size = text.font_size * scale;
    let Some(layout) = TextLayout::new(&text.content, font_size, size) else {
        return Ok(());
    };
    let paint = solid_paint(color("text.color", &text.color)?);

    let font = fonts.text_font(&text.font_family, text.font_weight, font_size)?;
    let shift = font.middle_to_baseline();
    let mut pb = PathBuilder::new();
    let mut shaped = Vec::with_capacity(layout.lines.len());
    for (line, y) in layout.positioned_lines() {
        let run = font.shape(line);
        font.outline_into(&run, layout.center_x - run.width() / 2.0, y + shift, &mut pb);
        shaped.push(run);
    }
    let glyphs = pb.finish();

    let caret_x = caret.map(|offset| {
        let at = locate_caret(&layout.lines, offset);
        let line = layout.lines[at.line];
        let run = &shaped[at.line];
        let prefix = prefix_utf16(line, at.column);
        let x = layout.center_x - run.width() / 2.0 + run.prefix_width(prefix.len());
        (x, layout.line_y(at.line))
    });

    // Whitespace-only content produces no outline.
    if let Some(glyphs) = glyphs {
        pixmap.fill_path(&glyphs, &paint, FillRule::Winding, Transform::identity(), Some(mask));
    }

    if let Some((x, y)) = caret_x {
        let mut pb = PathBuilder::new();
        pb.move_to(x, y - font_size / 2.0);
        pb.line_to(x, y + font_size / 2.0);
        if let Some(path) = pb.finish() {
            let stroke = plain_stroke(CARET_WIDTH * scale);
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), Some(mask));
        }
    }
    Ok(())
}

fn render_border(
    pixmap: &mut Pixmap,
    mask: &Mask,
    size: f32,
    border: &BorderConfig,
    scale: f32,
) -> Result<(), RenderError> {
    if !border.enabled {
        return Ok(());
    }

    let width = border.width * scale;
    let path = RoundedSquare::inset_for_stroke(size, width)
        .to_skia_path()
        .ok_or(RenderError::Path("border"))?;
    let paint = solid_paint(color("border.color", &border.color)?);
    pixmap.stroke_path(&path, &paint, &plain_stroke(width), Transform::identity(), Some(mask));
    Ok(())
}
