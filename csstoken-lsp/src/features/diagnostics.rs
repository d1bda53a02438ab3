//! Duplicated-literal diagnostics and byte-edit conversion.

use csstoken::range::{Position as SourcePosition, SourceLocation};
use csstoken::{ScanReport, TextEditSpan};
use std::ops::Range as ByteRange;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range, TextEdit};

pub const DIAGNOSTIC_SOURCE: &str = "csstoken";

pub fn to_lsp_position(position: SourcePosition) -> Position {
    Position::new(position.line as u32, position.column as u32)
}

pub fn from_lsp_position(position: Position) -> SourcePosition {
    SourcePosition::new(position.line as usize, position.character as usize)
}

pub fn to_lsp_range(locator: &SourceLocation<'_>, span: &ByteRange<usize>) -> Range {
    let range = locator.byte_range_to_range(span);
    Range::new(to_lsp_position(range.start), to_lsp_position(range.end))
}

/// Byte range covered by an LSP range, clamped to the text.
pub fn to_byte_range(locator: &SourceLocation<'_>, range: Range) -> ByteRange<usize> {
    let start = locator.position_to_byte(from_lsp_position(range.start));
    let end = locator.position_to_byte(from_lsp_position(range.end));
    start..end.max(start)
}

/// One error diagnostic per duplicated literal.
pub fn literal_diagnostics(text: &str, report: &ScanReport) -> Vec<Diagnostic> {
    let locator = SourceLocation::new(text);
    report
        .matches
        .iter()
        .map(|found| Diagnostic {
            range: to_lsp_range(&locator, &found.span),
            severity: Some(DiagnosticSeverity::ERROR),
            source: Some(DIAGNOSTIC_SOURCE.to_string()),
            message: found.message(),
            ..Diagnostic::default()
        })
        .collect()
}

pub fn to_text_edits(text: &str, edits: &[TextEditSpan]) -> Vec<TextEdit> {
    let locator = SourceLocation::new(text);
    edits
        .iter()
        .map(|edit| TextEdit {
            range: to_lsp_range(&locator, &(edit.start..edit.end)),
            new_text: edit.new_text.clone(),
        })
        .collect()
}
