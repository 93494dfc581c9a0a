//! Font resolution, shaping and glyph outlining for the text layer.
//!
//! Fonts come from a [`fontdb::Database`] shared with the SVG rasterizer.
//! CSS style family lists are resolved against it, lines are shaped with
//! rustybuzz (kerning, ligatures, per-character fallback to other faces)
//! and glyph outlines are read with skrifa.
use std::path::Path;
use std::sync::Arc;

use fontdb::{Database, Family, Query, Stretch, Style, Weight, ID};
use rustybuzz::ttf_parser::Tag;
use rustybuzz::{UnicodeBuffer, Variation};
use skrifa::instance::{Location, LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::raw::FontRef as ReadFontsRef;
use skrifa::{GlyphId, MetadataProvider};
use tiny_skia::PathBuilder;

use crate::error::RenderError;

/// One entry of a CSS `font-family` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FamilyName {
    Named(String),
    Serif,
    SansSerif,
    Monospace,
    Cursive,
    Fantasy,
}

impl FamilyName {
    fn as_fontdb(&self) -> Family<'_> {
        match self {
            FamilyName::Named(name) => Family::Name(name),
            FamilyName::Serif => Family::Serif,
            FamilyName::SansSerif => Family::SansSerif,
            FamilyName::Monospace => Family::Monospace,
            FamilyName::Cursive => Family::Cursive,
            FamilyName::Fantasy => Family::Fantasy,
        }
    }
}

/// Split a CSS family list such as `"Times New Roman", serif` into entries.
///
/// Quoted names keep their inner commas; unquoted generic keywords map to
/// generic families and `system-ui` is treated as sans-serif.
pub fn parse_font_family_list(list: &str) -> Vec<FamilyName> {
    let mut names = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in list.chars() {
        match (quote, ch) {
            (None, '"' | '\'') => {
                quote = Some(ch);
                current.push(ch);
            }
            (Some(q), c) if c == q => {
                quote = None;
                current.push(ch);
            }
            (None, ',') => {
                push_family(&current, &mut names);
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    push_family(&current, &mut names);
    names
}

fn push_family(raw: &str, names: &mut Vec<FamilyName>) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let quoted = trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')));
    if quoted {
        names.push(FamilyName::Named(trimmed[1..trimmed.len() - 1].to_string()));
        return;
    }
    let family = match trimmed.to_ascii_lowercase().as_str() {
        "serif" => FamilyName::Serif,
        "sans-serif" | "system-ui" | "ui-sans-serif" => FamilyName::SansSerif,
        "monospace" | "ui-monospace" => FamilyName::Monospace,
        "cursive" => FamilyName::Cursive,
        "fantasy" => FamilyName::Fantasy,
        _ => FamilyName::Named(trimmed.to_string()),
    };
    names.push(family);
}

/// Shared, read-only font database used by every render.
#[derive(Clone, Default)]
pub struct FontBook {
    db: Arc<Database>,
}

impl FontBook {
    pub fn empty() -> Self {
        Self::default()
    }

    /// All fonts installed on the host.
    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self { db: Arc::new(db) }
    }

    pub fn load_font_file(&mut self, path: &Path) -> std::io::Result<()> {
        let data = std::fs::read(path)?;
        self.load_font_data(data);
        Ok(())
    }

    pub fn load_font_data(&mut self, data: Vec<u8>) {
        Arc::make_mut(&mut self.db).load_font_data(data);
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn has_family(&self, name: &str) -> bool {
        self.db
            .faces()
            .any(|face| face.families.iter().any(|(family, _)| family == name))
    }

    /// The underlying database, for handing to usvg.
    pub fn database(&self) -> Arc<Database> {
        Arc::clone(&self.db)
    }

    /// Pick a face for a family list and weight.
    ///
    /// Falls back to sans-serif, then to any face at all, so text renders
    /// whenever at least one font is installed.
    pub fn resolve(&self, family_list: &str, weight: u16) -> Option<ID> {
        let names = parse_font_family_list(family_list);
        let families: Vec<Family<'_>> = names.iter().map(FamilyName::as_fontdb).collect();
        if let Some(id) = self.query(&families, weight) {
            return Some(id);
        }
        tracing::warn!(family = family_list, weight, "no matching font, falling back");
        self.query(&[Family::SansSerif], weight)
            .or_else(|| self.db.faces().next().map(|face| face.id))
    }

    fn query(&self, families: &[Family<'_>], weight: u16) -> Option<ID> {
        self.db.query(&Query {
            families,
            weight: Weight(weight),
            stretch: Stretch::Normal,
            style: Style::Normal,
        })
    }

    /// Resolve the primary face for a text layer at `font_size` pixels.
    pub fn text_font(
        &self,
        family_list: &str,
        weight: u16,
        font_size: f32,
    ) -> Result<TextFont<'_>, RenderError> {
        let primary = self
            .resolve(family_list, weight)
            .ok_or_else(|| RenderError::FontUnavailable {
                family: family_list.to_string(),
                weight,
            })?;

        let half_x_height = self
            .db
            .with_face_data(primary, |data, index| {
                let font = ReadFontsRef::from_index(data, index).ok()?;
                let location = weight_location(&font, weight);
                let metrics = font.metrics(Size::new(font_size), LocationRef::new(location.coords()));
                // Same estimate the SVG rasterizer uses for fonts without an x-height.
                let x_height = metrics
                    .x_height
                    .unwrap_or((metrics.ascent - metrics.descent) * 0.45);
                Some(x_height / 2.0)
            })
            .flatten()
            .ok_or_else(|| RenderError::FontData {
                family: family_list.to_string(),
            })?;

        Ok(TextFont {
            book: self,
            primary,
            weight,
            font_size,
            half_x_height,
        })
    }

    fn has_char(&self, id: ID, ch: char) -> bool {
        self.db
            .with_face_data(id, |data, index| {
                ReadFontsRef::from_index(data, index)
                    .ok()
                    .and_then(|font| font.charmap().map(ch))
                    .is_some()
            })
            .unwrap_or(false)
    }

    /// A face covering `ch`, preferring the weight and style of the first
    /// face in `exclude`.
    fn fallback_for(&self, ch: char, exclude: &[ID]) -> Option<ID> {
        let base = exclude.first().and_then(|id| self.db.face(*id))?;
        let mut any = None;
        for face in self.db.faces() {
            if exclude.contains(&face.id) || !self.has_char(face.id, ch) {
                continue;
            }
            if face.weight == base.weight && face.style == base.style {
                return Some(face.id);
            }
            any.get_or_insert(face.id);
        }
        any
    }

    fn shape_with_face(
        &self,
        text: &str,
        face_id: ID,
        weight: u16,
        font_size: f32,
    ) -> Option<Vec<ShapedGlyph>> {
        self.db
            .with_face_data(face_id, |data, index| {
                let mut face = rustybuzz::Face::from_slice(data, index)?;
                face.set_variations(&[Variation {
                    tag: Tag::from_bytes(b"wght"),
                    value: f32::from(weight),
                }]);
                let scale = font_size / face.units_per_em() as f32;

                let mut buffer = UnicodeBuffer::new();
                buffer.push_str(text);
                buffer.guess_segment_properties();
                let output = rustybuzz::shape(&face, &[], buffer);

                let glyphs = output
                    .glyph_infos()
                    .iter()
                    .zip(output.glyph_positions())
                    .map(|(info, pos)| ShapedGlyph {
                        face: face_id,
                        id: info.glyph_id,
                        cluster: info.cluster as usize,
                        x_offset: pos.x_offset as f32 * scale,
                        y_offset: pos.y_offset as f32 * scale,
                        advance: pos.x_advance as f32 * scale,
                    })
                    .collect();
                Some(glyphs)
            })
            .flatten()
    }
}

fn weight_location(font: &ReadFontsRef<'_>, weight: u16) -> Location {
    font.axes().location([("wght", f32::from(weight))])
}

/// One positioned glyph, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    pub face: ID,
    /// Glyph index in `face`; 0 is `.notdef`.
    pub id: u32,
    /// Byte offset of the glyph's cluster in the shaped line.
    pub cluster: usize,
    pub x_offset: f32,
    pub y_offset: f32,
    pub advance: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapedLine {
    pub glyphs: Vec<ShapedGlyph>,
}

impl ShapedLine {
    /// Total advance of the line.
    pub fn width(&self) -> f32 {
        self.glyphs.iter().map(|g| g.advance).sum()
    }

    /// Advance of every glyph whose cluster starts before `byte_end`.
    pub fn prefix_width(&self, byte_end: usize) -> f32 {
        self.glyphs
            .iter()
            .filter(|g| g.cluster < byte_end)
            .map(|g| g.advance)
            .sum()
    }

    pub fn has_missing_glyphs(&self) -> bool {
        self.glyphs.iter().any(|g| g.id == 0)
    }
}

/// The resolved primary face of a text layer, at a pixel size and weight.
pub struct TextFont<'a> {
    book: &'a FontBook,
    primary: ID,
    weight: u16,
    font_size: f32,
    half_x_height: f32,
}

impl TextFont<'_> {
    /// Distance from a line's vertical middle down to its alphabetic baseline.
    ///
    /// Half the x-height, the SVG `dominant-baseline="middle"` convention.
    pub fn middle_to_baseline(&self) -> f32 {
        self.half_x_height
    }

    /// Shape one line, falling back to other faces for characters the
    /// primary face lacks.
    pub fn shape(&self, text: &str) -> ShapedLine {
        let shape = |face| {
            self.book
                .shape_with_face(text, face, self.weight, self.font_size)
                .unwrap_or_default()
        };

        let mut glyphs = shape(self.primary);
        let mut used = vec![self.primary];
        while let Some(cluster) = glyphs.iter().find(|g| g.id == 0).map(|g| g.cluster) {
            let Some(ch) = text.get(cluster..).and_then(|rest| rest.chars().next()) else {
                break;
            };
            let Some(fallback) = self.book.fallback_for(ch, &used) else {
                tracing::warn!(%ch, "no installed font covers character");
                break;
            };
            used.push(fallback);

            let retry = shape(fallback);
            if !retry.is_empty() && retry.iter().all(|g| g.id != 0) {
                glyphs = retry;
                break;
            }
            // Glyph-by-glyph merge only works when both faces produced the same run.
            if retry.len() != glyphs.len() {
                continue;
            }
            for (glyph, candidate) in glyphs.iter_mut().zip(retry) {
                if glyph.id == 0 && candidate.id != 0 {
                    *glyph = candidate;
                }
            }
        }

        ShapedLine { glyphs }
    }

    /// Append the outlines of `line` starting at (`x`, `baseline`) to `builder`.
    pub fn outline_into(&self, line: &ShapedLine, x: f32, baseline: f32, builder: &mut PathBuilder) {
        let mut origins = Vec::with_capacity(line.glyphs.len());
        let mut pen_x = x;
        for glyph in &line.glyphs {
            origins.push((pen_x + glyph.x_offset, baseline - glyph.y_offset));
            pen_x += glyph.advance;
        }

        let mut faces: Vec<ID> = Vec::new();
        for glyph in &line.glyphs {
            if !faces.contains(&glyph.face) {
                faces.push(glyph.face);
            }
        }

        for face_id in faces {
            let drawn = self.book.db.with_face_data(face_id, |data, index| {
                let Ok(font) = ReadFontsRef::from_index(data, index) else {
                    return;
                };
                let outlines = font.outline_glyphs();
                let location = weight_location(&font, self.weight);
                let size = Size::new(self.font_size);

                for (glyph, &(gx, gy)) in line.glyphs.iter().zip(&origins) {
                    if glyph.face != face_id {
                        continue;
                    }
                    let Some(outline) = outlines.get(GlyphId::new(glyph.id)) else {
                        continue;
                    };
                    let mut pen = PathPen {
                        builder: &mut *builder,
                        x: gx,
                        y: gy,
                    };
                    let settings = DrawSettings::unhinted(size, LocationRef::new(location.coords()));
                    if let Err(err) = outline.draw(settings, &mut pen) {
                        tracing::debug!(glyph = glyph.id, ?err, "skipping glyph outline");
                    }
                }
            });
            if drawn.is_none() {
                tracing::debug!(?face_id, "font data unavailable, glyphs skipped");
            }
        }
    }
}

/// Collects glyph outlines into a tiny-skia path, flipping font y-up to screen y-down.
struct PathPen<'a> {
    builder: &'a mut PathBuilder,
    x: f32,
    y: f32,
}

impl OutlinePen for PathPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.x + x, self.y - y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.x + x, self.y - y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.builder
            .quad_to(self.x + cx0, self.y - cy0, self.x + x, self.y - y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.x + cx0,
            self.y - cy0,
            self.x + cx1,
            self.y - cy1,
            self.x + x,
            self.y - y,
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
