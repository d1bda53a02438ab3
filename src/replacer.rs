//! Quick-fix providers
//!
//! A [`Replacer`] finds literals of one kind on a line and renders replacement
//! suggestions for them. [`SizeReplacer`] handles `px`/`rem`/`em` runs and is always
//! active; [`ColorReplacer`] handles hex, `rgb()`/`hsl()` and named colors and only
//! runs when declaration sources are configured.

use std::collections::BTreeSet;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::mapping::VariableMapping;
use crate::named_colors::NAMED_COLORS;
use crate::normalize::{normalize_color, normalize_size};
use crate::range::SourceLocation;
use crate::render::{px_to_rem, render_options, TemplateContext, MATCHED_TEXT, REM_RESULT};

static SIZE_RUN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:-?\d+(?:px|rem|em)\s*)+").unwrap());

static COLOR_LITERAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"(?i)(?:#[0-9a-f]{{3,8}}\b)|(?:(?:rgb|hsl)a?[^)]*\))|(?:\b(?:{})\b)",
        NAMED_COLORS.join("|")
    );
    Regex::new(&pattern).unwrap()
});

/// Templates and numbers the replacers render with.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionOptions {
    pub px_templates: Vec<String>,
    pub color_templates: Vec<String>,
    pub root_font_size: f64,
    /// Color fixes need a token index; off when no declaration source is configured.
    pub colors_enabled: bool,
}

impl Default for SuggestionOptions {
    fn default() -> Self {
        Self {
            px_templates: Vec::new(),
            color_templates: Vec::new(),
            root_font_size: 16.0,
            colors_enabled: false,
        }
    }
}

/// A literal found on one line. `span` is a byte range within that line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    pub span: Range<usize>,
    pub text: String,
}

pub trait Replacer {
    /// Every literal this replacer recognizes on `line`, left to right.
    fn find(&self, line: &str) -> Vec<Found>;

    /// Rendered replacements for `text`; the first one is the preferred fix.
    fn suggest(
        &self,
        text: &str,
        mapping: &VariableMapping,
        options: &SuggestionOptions,
    ) -> Vec<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SizeReplacer;

impl Replacer for SizeReplacer {
    fn find(&self, line: &str) -> Vec<Found> {
        SIZE_RUN_REGEX
            .find_iter(line)
            .filter(|found| !closes_call_before_opening(&line[found.end()..]))
            .map(|found| {
                let text = found.as_str().trim_end();
                Found {
                    span: found.start()..found.start() + text.len(),
                    text: text.to_string(),
                }
            })
            .collect()
    }

    fn suggest(
        &self,
        text: &str,
        mapping: &VariableMapping,
        options: &SuggestionOptions,
    ) -> Vec<String> {
        let normalized = normalize_size(text).unwrap_or_default();
        let context = TemplateContext::new()
            .with(MATCHED_TEXT, text)
            .with(REM_RESULT, px_to_rem(&normalized, options.root_font_size));
        let empty = BTreeSet::new();
        let names = mapping.get(&normalized).unwrap_or(&empty);
        render_options(&options.px_templates, names, &context)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ColorReplacer;

impl Replacer for ColorReplacer {
    fn find(&self, line: &str) -> Vec<Found> {
        COLOR_LITERAL_REGEX
            .find_iter(line)
            .map(|found| {
                let text = found.as_str().trim_end();
                Found {
                    span: found.start()..found.start() + text.len(),
                    text: text.to_string(),
                }
            })
            .collect()
    }

    fn suggest(
        &self,
        text: &str,
        mapping: &VariableMapping,
        options: &SuggestionOptions,
    ) -> Vec<String> {
        let context = TemplateContext::new().with(MATCHED_TEXT, text);
        let empty = BTreeSet::new();
        let names = normalize_color(text)
            .and_then(|normalized| mapping.get(&normalized))
            .unwrap_or(&empty);
        render_options(&options.color_templates, names, &context)
    }
}

/// Sizes inside a function call such as `calc(10px + 2px)` are not offered: the rest of
/// the line reaches a `)` before any `(`.
fn closes_call_before_opening(rest: &str) -> bool {
    rest.chars()
        .find(|ch| *ch == '(' || *ch == ')')
        .is_some_and(|ch| ch == ')')
}

/// One replacement offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickFix {
    pub title: String,
    /// Byte range in the full document.
    pub span: Range<usize>,
    pub replacement: String,
    pub preferred: bool,
}

/// Quick fixes for the literal under `selection` (a byte range in `text`).
///
/// Only the selection's first line is inspected. Each active replacer contributes the
/// fixes for its first literal touching the selection, its first fix marked preferred.
pub fn quick_fixes(
    text: &str,
    selection: Range<usize>,
    mapping: &VariableMapping,
    options: &SuggestionOptions,
) -> Vec<QuickFix> {
    let locator = SourceLocation::new(text);
    let selection = selection.start.min(text.len())..selection.end.min(text.len());
    let line_number = locator.byte_to_position(selection.start).line;
    let (Some(line_start), Some(line)) = (
        locator.line_start(line_number),
        locator.line_text(line_number),
    ) else {
        return Vec::new();
    };
    let selected_start = selection.start.saturating_sub(line_start).min(line.len());
    let selected_end = selection
        .end
        .saturating_sub(line_start)
        .clamp(selected_start, line.len());

    let mut replacers: Vec<&dyn Replacer> = vec![&SizeReplacer];
    if options.colors_enabled {
        replacers.push(&ColorReplacer);
    }

    let mut fixes = Vec::new();
    for replacer in replacers {
        let Some(found) = replacer
            .find(line)
            .into_iter()
            .find(|found| found.span.start <= selected_end && selected_start <= found.span.end)
        else {
            continue;
        };
        let span = line_start + found.span.start..line_start + found.span.end;
        let suggestions = replacer.suggest(&found.text, mapping, options);
        fixes.extend(
            suggestions
                .into_iter()
                .enumerate()
                .map(|(index, target)| QuickFix {
                    title: format!("Replace [ {} ] with {}", found.text, target),
                    span: span.clone(),
                    replacement: target,
                    preferred: index == 0,
                }),
        );
    }
    fixes
}
