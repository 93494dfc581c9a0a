use tiny_skia::{LineCap, LineJoin, Stroke};

/// Stroke with round caps and joins, used for shape outlines.
pub fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

/// Plain stroke (butt caps, miter joins), used for the border and the caret.
pub fn plain_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        ..Default::default()
    }
}

/// SVG attribute fragment matching [`round_stroke`].
pub const ROUND_STROKE_ATTRS: &str = r#"stroke-linecap="round" stroke-linejoin="round""#;
