//! Vector exporter: the same layer model as the raster compositor, written
//! as a standalone SVG document.
use std::fmt::Write;

use crate::error::RenderError;
use crate::models::{BorderConfig, CustomIconConfig, GradientHandle, ShapeConfig, TextConfig};
use crate::rect_utils::RoundedSquare;
use crate::shape_utils::ShapeOutline;
use crate::stroke_utils::ROUND_STROKE_ATTRS;
use crate::text_utils::TextLayout;

const CLIP_ID: &str = "icon-clip";
const GRADIENT_ID: &str = "icon-gradient";

/// Build an SVG document of `size`×`size` pixels for `config`.
///
/// Elements are emitted in paint order (gradient, shape, text, border) and
/// every layer references the rounded-square clip path. Output is
/// deterministic for a given input.
pub fn render_to_vector_document(
    config: &CustomIconConfig,
    size: u32,
) -> Result<String, RenderError> {
    config.validate()?;
    if size == 0 {
        return Err(RenderError::InvalidTargetSize);
    }

    let scale = config.scale_for(size);
    let extent = size as f32;
    tracing::debug!(size, scale, "exporting SVG");

    let mut elements = vec![
        render_defs(extent, &config.gradient_handles),
        format!(
            r#"<rect width="{extent}" height="{extent}" fill="url(#{GRADIENT_ID})" clip-path="url(#{CLIP_ID})"/>"#
        ),
    ];
    elements.extend(render_shape(extent, &config.shape, scale));
    elements.extend(render_text(extent, &config.text, scale));
    elements.extend(render_border(extent, &config.border, scale));

    Ok(format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{extent}\" height=\"{extent}\" viewBox=\"0 0 {extent} {extent}\">\n{}\n</svg>\n",
        elements.join("\n")
    ))
}

fn render_defs(size: f32, handles: &[GradientHandle; 2]) -> String {
    let [start, end] = handles;
    format!(
        concat!(
            "<defs>\n",
            "  <clipPath id=\"{clip}\">\n",
            "    <path d=\"{d}\"/>\n",
            "  </clipPath>\n",
            "  <linearGradient id=\"{grad}\" x1=\"{x1}%\" y1=\"{y1}%\" x2=\"{x2}%\" y2=\"{y2}%\">\n",
            "    <stop offset=\"0%\" stop-color=\"{c1}\"/>\n",
            "    <stop offset=\"100%\" stop-color=\"{c2}\"/>\n",
            "  </linearGradient>\n",
            "</defs>"
        ),
        clip = CLIP_ID,
        d = RoundedSquare::outline(size).to_svg_path_data(),
        grad = GRADIENT_ID,
        x1 = start.x * 100.0,
        y1 = start.y * 100.0,
        x2 = end.x * 100.0,
        y2 = end.y * 100.0,
        c1 = escape_xml(&start.color),
        c2 = escape_xml(&end.color),
    )
}

fn render_shape(size: f32, shape: &ShapeConfig, scale: f32) -> Option<String> {
    if !shape.enabled {
        return None;
    }

    let paint = format!(
        r#"fill="none" stroke="{}" stroke-width="{}" {}"#,
        escape_xml(&shape.color),
        shape.stroke_width * scale,
        ROUND_STROKE_ATTRS
    );
    let element = match ShapeOutline::new(shape.shape_type, size, shape.size) {
        ShapeOutline::Square { origin, side } => format!(
            r#"<rect x="{}" y="{}" width="{side}" height="{side}" {paint}/>"#,
            origin.x, origin.y
        ),
        ShapeOutline::Triangle(vertices) => {
            let points = vertices
                .iter()
                .map(|p| format!("{},{}", p.x, p.y))
                .collect::<Vec<_>>()
                .join(" ");
            format!(r#"<polygon points="{points}" {paint}/>"#)
        }
        ShapeOutline::Circle { center, radius } => format!(
            r#"<circle cx="{}" cy="{}" r="{radius}" {paint}/>"#,
            center.x, center.y
        ),
    };

    let center = ShapeOutline::center(size);
    let transform = if shape.rotation != 0.0 {
        format!(
            r#" transform="rotate({} {} {})""#,
            shape.rotation, center.x, center.y
        )
    } else {
        String::new()
    };
    Some(format!(
        r#"<g clip-path="url(#{CLIP_ID})"><g{transform}>{element}</g></g>"#
    ))
}

fn render_text(size: f32, text: &TextConfig, scale: f32) -> Option<String> {
    let font_size = text.font_size * scale;
    let layout = TextLayout::new(&text.content, font_size, size)?;

    let mut group = format!(r#"<g clip-path="url(#{CLIP_ID})">"#);
    for (line, y) in layout.positioned_lines() {
        let _ = write!(
            group,
            "\n  <text x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" fill=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\" xml:space=\"preserve\">{}</text>",
            layout.center_x,
            y,
            escape_xml(&text.font_family),
            font_size,
            text.font_weight,
            escape_xml(&text.color),
            escape_xml(line)
        );
    }
    group.push_str("\n</g>");
    Some(group)
}

fn render_border(size: f32, border: &BorderConfig, scale: f32) -> Option<String> {
    if !border.enabled {
        return None;
    }

    let width = border.width * scale;
    Some(format!(
        r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}" clip-path="url(#{CLIP_ID})"/>"#,
        RoundedSquare::inset_for_stroke(size, width).to_svg_path_data(),
        escape_xml(&border.color),
        width
    ))
}

/// Escape the five XML reserved characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
