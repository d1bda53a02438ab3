//! Line-scope classification
//!
//!     Finds the line ranges of token declaration blocks so that scanning can skip them
//!     and so that commented declarations can be attributed to their enclosing object.
//!
//!     Two kinds of opening lines are recognized (after trimming):
//!
//!         @theme: {        named scope "@theme" (also `$name:` and `--name:`)
//!         :root {          root scope ":root"
//!
//!     The first later line containing `}` closes whichever scope is currently open.
//!     Tracking is single level: an opening line while a scope is open replaces the
//!     tracker, so nested blocks are only approximately attributed. Treat the ranges as
//!     containment hints, not as a syntax tree.

use std::collections::BTreeMap;

/// Prefixes that introduce a token declaration.
pub const TOKEN_PREFIXES: [&str; 3] = ["@", "$", "--"];

/// Leading marker of a root/global selector such as `:root`.
pub const ROOT_SELECTOR_MARKER: &str = ":";

/// Line range of one declaration block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationScope {
    pub start: usize,
    /// `None` until the closing line is seen.
    pub end: Option<usize>,
    /// `:root`-style block whose members are custom properties.
    pub root: bool,
}

impl DeclarationScope {
    /// Strictly between the opening and closing lines.
    pub fn contains(&self, line: usize) -> bool {
        match self.end {
            Some(end) => self.start < line && line < end,
            None => false,
        }
    }
}

/// Scope identifier → range. Identifiers seen twice keep the most recent block.
pub type ScopeMap = BTreeMap<String, DeclarationScope>;

/// Classify `text` into declaration scopes, numbering lines from `line_offset`.
pub fn classify_scopes(text: &str, line_offset: usize) -> ScopeMap {
    let mut scopes = ScopeMap::new();
    let mut current: Option<String> = None;

    for (index, line) in text.split('\n').enumerate() {
        let line_number = index + line_offset;
        let trimmed = line.trim();

        if let Some((identifier, root)) = opening_identifier(trimmed) {
            let scope = scopes.entry(identifier.clone()).or_insert(DeclarationScope {
                start: line_number,
                end: None,
                root,
            });
            scope.start = line_number;
            current = Some(identifier);
        }

        if trimmed.contains('}') {
            if let Some(identifier) = current.take() {
                if let Some(scope) = scopes.get_mut(&identifier) {
                    scope.end = Some(line_number);
                }
            }
        }
    }

    scopes
}

/// Whether `line` lies inside any recorded scope.
pub fn within_any(scopes: &ScopeMap, line: usize) -> bool {
    scopes.values().any(|scope| scope.contains(line))
}

fn opening_identifier(trimmed: &str) -> Option<(String, bool)> {
    if !trimmed.ends_with('{') {
        return None;
    }
    if trimmed.starts_with(ROOT_SELECTOR_MARKER) {
        let selector = trimmed[..trimmed.len() - 1].trim();
        return Some((selector.to_string(), true));
    }
    if TOKEN_PREFIXES
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
    {
        let name = trimmed.split(':').next().unwrap_or(trimmed).trim();
        return Some((name.to_string(), false));
    }
    None
}
