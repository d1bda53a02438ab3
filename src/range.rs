//! Byte offset ↔ line/column conversion
//!
//! Scanning works in byte offsets over the document text. Editors address text by
//! line and column, where LSP columns count UTF-16 code units, so [`SourceLocation`]
//! converts in both directions with a binary search over line starts.

use std::ops::Range as ByteRange;

/// A line:column position. Columns are UTF-16 code units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Start and end positions of a span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Line start table for one text.
pub struct SourceLocation<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> SourceLocation<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Convert a byte offset to a position. Offsets past the end clamp to the end.
    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let offset = byte_offset.min(self.source.len());
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i - 1);
        let line_start = self.line_starts[line];
        let column = self.source[line_start..offset].encode_utf16().count();
        Position::new(line, column)
    }

    pub fn byte_range_to_range(&self, span: &ByteRange<usize>) -> Range {
        Range::new(
            self.byte_to_position(span.start),
            self.byte_to_position(span.end),
        )
    }

    /// Convert a position back to a byte offset, clamping to the line's end.
    pub fn position_to_byte(&self, position: Position) -> usize {
        let Some(line_start) = self.line_start(position.line) else {
            return self.source.len();
        };
        let line = self.line_text(position.line).unwrap_or_default();
        let mut units = 0;
        for (idx, ch) in line.char_indices() {
            if units >= position.column {
                return line_start + idx;
            }
            units += ch.len_utf16();
        }
        line_start + line.len()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Text of `line` without its trailing newline.
    pub fn line_text(&self, line: usize) -> Option<&'a str> {
        let start = self.line_start(line)?;
        let end = self
            .line_start(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());
        Some(&self.source[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_map_to_lines_and_columns() {
        let source = "a {\n  color: red;\n}";
        let locator = SourceLocation::new(source);
        assert_eq!(locator.line_count(), 3);
        assert_eq!(locator.byte_to_position(0), Position::new(0, 0));
        assert_eq!(locator.byte_to_position(6), Position::new(1, 2));
        assert_eq!(locator.byte_to_position(source.len()), Position::new(2, 1));
        assert_eq!(locator.line_text(1), Some("  color: red;"));
    }

    #[test]
    fn columns_count_utf16_units() {
        let source = "/* 😀 */ color: #fff;";
        let locator = SourceLocation::new(source);
        let offset = source.find('#').unwrap();
        let position = locator.byte_to_position(offset);
        assert_eq!(position, Position::new(0, 16));
        assert_eq!(locator.position_to_byte(position), offset);
    }

    #[test]
    fn position_past_line_end_clamps() {
        let locator = SourceLocation::new("ab\ncd");
        assert_eq!(locator.position_to_byte(Position::new(0, 10)), 2);
        assert_eq!(locator.position_to_byte(Position::new(9, 0)), 5);
    }
}
