//! Font independent layout of the multi-line centered text block.

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_RATIO: f32 = 1.2;

/// Vertical placement of every line of a text block on a square canvas.
///
/// `line_y` values are the vertical middle of each line, the reference both
/// the canvas `middle` baseline and SVG `dominant-baseline="middle"` use.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout<'a> {
    pub lines: Vec<&'a str>,
    pub font_size: f32,
    pub line_height: f32,
    pub center_x: f32,
    pub start_y: f32,
}

impl<'a> TextLayout<'a> {
    /// Returns `None` for empty content, the "no text" case.
    pub fn new(content: &'a str, font_size: f32, canvas_size: f32) -> Option<Self> {
        if content.is_empty() {
            return None;
        }
        let lines: Vec<&str> = content.split('\n').collect();
        let line_height = font_size * LINE_HEIGHT_RATIO;
        let total_height = lines.len() as f32 * line_height;
        Some(Self {
            lines,
            font_size,
            line_height,
            center_x: canvas_size / 2.0,
            start_y: canvas_size / 2.0 - total_height / 2.0 + line_height / 2.0,
        })
    }

    pub fn total_height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }

    pub fn line_y(&self, index: usize) -> f32 {
        self.start_y + index as f32 * self.line_height
    }

    /// Lines paired with their vertical center.
    pub fn positioned_lines(&self) -> impl Iterator<Item = (&'a str, f32)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| (*line, self.line_y(i)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretLocation {
    pub line: usize,
    /// UTF-16 code units before the caret on `line`.
    pub column: usize,
}

/// Map a caret offset onto a line and column.
///
/// Offsets count UTF-16 code units with newlines included, the unit text
/// inputs report selections in. Walks the lines, consuming each line's length
/// plus one for its newline. An offset past the end lands at the end of the
/// last line.
pub fn locate_caret(lines: &[&str], caret: usize) -> CaretLocation {
    let mut consumed = 0;
    for (line, text) in lines.iter().enumerate() {
        let len = utf16_len(text);
        if consumed + len >= caret {
            return CaretLocation {
                line,
                column: caret - consumed,
            };
        }
        consumed += len + 1;
    }
    let last = lines.len().saturating_sub(1);
    CaretLocation {
        line: last,
        column: lines.get(last).map_or(0, |l| utf16_len(l)),
    }
}

fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// The part of `line` covered by its first `units` UTF-16 code units.
///
/// A column inside a surrogate pair rounds down to the start of that character.
pub fn prefix_utf16(line: &str, units: usize) -> &str {
    let mut seen = 0;
    for (byte, ch) in line.char_indices() {
        seen += ch.len_utf16();
        if seen > units {
            return &line[..byte];
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_walks_lines() {
        let lines = ["ab", "cde", ""];
        assert_eq!(locate_caret(&lines, 0), CaretLocation { line: 0, column: 0 });
        assert_eq!(locate_caret(&lines, 2), CaretLocation { line: 0, column: 2 });
        assert_eq!(locate_caret(&lines, 3), CaretLocation { line: 1, column: 0 });
        assert_eq!(locate_caret(&lines, 6), CaretLocation { line: 1, column: 3 });
        assert_eq!(locate_caret(&lines, 7), CaretLocation { line: 2, column: 0 });
        assert_eq!(locate_caret(&lines, 99), CaretLocation { line: 2, column: 0 });
    }

    #[test]
    fn caret_counts_utf16_units() {
        let lines = ["😀a", "b"];
        assert_eq!(locate_caret(&lines, 2), CaretLocation { line: 0, column: 2 });
        assert_eq!(locate_caret(&lines, 3), CaretLocation { line: 0, column: 3 });
        assert_eq!(locate_caret(&lines, 4), CaretLocation { line: 1, column: 0 });
        assert_eq!(prefix_utf16(lines[0], 3), "😀a");
        assert_eq!(prefix_utf16(lines[0], 2), "😀");
        assert_eq!(prefix_utf16(lines[0], 1), "");
    }

    #[test]
    fn prefix_respects_char_boundaries() {
        assert_eq!(prefix_utf16("あいう", 2), "あい");
        assert_eq!(prefix_utf16("abc", 0), "");
        assert_eq!(prefix_utf16("abc", 10), "abc");
    }
}
