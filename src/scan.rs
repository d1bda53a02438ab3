//! Literal scanning
//!
//!     Walks a document line by line and reports hard-coded colors whose normalized
//!     value already has a token. The same walk drives diagnostics and auto-replace.
//!
//!     Line filter, in order:
//!
//!         1. lines mentioning `@`, `--`, `$` or `//` are declarations or comments
//!         2. lines strictly inside a declaration scope (see `scope`) are skipped
//!         3. the text after the first colon is the value; no value, no match
//!         4. the value must mention `#`, `rgb` or `hsl` to be considered a color
//!
//!     A value that passes the filter but does not parse as a color halts the scan for
//!     the rest of the document. Matches found before that point are kept and the halt
//!     is reported in [`ScanReport::halted`], so callers can log why later lines were
//!     not checked.
//!
//!     Component files (`.vue`, `.svelte`, `.html`) are scanned only between the first
//!     `<style` and the last `</style>`; offsets and line numbers are translated back to
//!     the full document.

use std::ops::Range;

use crate::edit::TextEditSpan;
use crate::mapping::VariableMapping;
use crate::normalize::normalize_color;
use crate::scope::{classify_scopes, within_any};

const SKIP_MARKERS: [&str; 4] = ["@", "--", "$", "//"];
const COLOR_MARKERS: [&str; 3] = ["#", "rgb", "hsl"];
const STYLE_OPEN: &str = "<style";
const STYLE_CLOSE: &str = "</style>";

/// How a document carries its styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// The whole text is style code.
    Stylesheet,
    /// Styles live in a `<style>` block inside markup.
    EmbeddedStyle,
}

impl DocumentKind {
    /// Map an editor language id to a document kind. Unsupported languages yield `None`.
    pub fn from_language_id(language_id: &str) -> Option<Self> {
        match language_id {
            "css" | "scss" | "less" | "jsx" | "tsx" | "javascriptreact" | "typescriptreact" => {
                Some(DocumentKind::Stylesheet)
            }
            "vue" | "svelte" | "html" => Some(DocumentKind::EmbeddedStyle),
            _ => None,
        }
    }

    /// Guess the kind from a file extension, for callers without a language id.
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::from_language_id(&extension.to_ascii_lowercase())
    }
}

/// A color literal duplicating a token value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralMatch {
    pub normalized: String,
    pub raw: String,
    /// Byte range of `raw` in the full document.
    pub span: Range<usize>,
}

impl LiteralMatch {
    pub fn message(&self) -> String {
        format!("Color value {} is already mapped to a variable.", self.raw)
    }
}

/// Where and why a scan stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHalt {
    /// Zero-based line in the full document.
    pub line: usize,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub matches: Vec<LiteralMatch>,
    pub halted: Option<ScanHalt>,
}

/// Byte range scanned for `kind`: everything, or the embedded style region.
pub fn scan_region(text: &str, kind: DocumentKind) -> Option<Range<usize>> {
    match kind {
        DocumentKind::Stylesheet => Some(0..text.len()),
        DocumentKind::EmbeddedStyle => {
            let start = text.find(STYLE_OPEN)?;
            let end = text.rfind(STYLE_CLOSE)?;
            (start <= end).then_some(start..end)
        }
    }
}

/// Find color literals in `text` that duplicate a value of `mapping`.
pub fn scan_literals(text: &str, kind: DocumentKind, mapping: &VariableMapping) -> ScanReport {
    let mut report = ScanReport::default();
    let Some(region) = scan_region(text, kind) else {
        return report;
    };
    let line_offset = text[..region.start].matches('\n').count();
    let region_text = &text[region.clone()];
    let scopes = classify_scopes(region_text, line_offset);

    let mut line_start = region.start;
    for (index, line) in region_text.split('\n').enumerate() {
        let start = line_start;
        line_start += line.len() + 1;
        let line_number = index + line_offset;
        let trimmed = line.trim();

        if SKIP_MARKERS.iter().any(|marker| trimmed.contains(marker)) {
            continue;
        }
        if within_any(&scopes, line_number) {
            continue;
        }

        let value = match trimmed.split(':').nth(1).map(str::trim) {
            Some(value) if !value.is_empty() => value,
            _ => continue,
        };
        if !COLOR_MARKERS.iter().any(|marker| value.contains(marker)) {
            continue;
        }
        let value = value.strip_suffix(';').unwrap_or(value);

        let Some(normalized) = normalize_color(value) else {
            report.halted = Some(ScanHalt {
                line: line_number,
                value: value.to_string(),
            });
            break;
        };
        if !mapping.contains(&normalized) {
            continue;
        }
        let Some(column) = line.find(value) else {
            continue;
        };
        let begin = start + column;
        report.matches.push(LiteralMatch {
            normalized,
            raw: value.to_string(),
            span: begin..begin + value.len(),
        });
    }

    report
}

/// Replace every duplicated literal with the first token name of its value.
pub fn auto_replace_edits(
    text: &str,
    kind: DocumentKind,
    mapping: &VariableMapping,
) -> Vec<TextEditSpan> {
    scan_literals(text, kind, mapping)
        .matches
        .into_iter()
        .filter_map(|found| {
            let name = mapping.first_name(&found.normalized)?;
            Some(TextEditSpan::new(found.span.start, found.span.end, name))
        })
        .collect()
}
