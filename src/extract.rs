//! Token extraction
//!
//!     Builds the [`VariableMapping`] from declaration files. Three shapes are read:
//!
//!         @primary: #1890ff;              flat        → @primary
//!         --accent: #ff0000;              flat        → var(--accent)
//!         @bg: { light: #fff; }           object      → @bg[light]
//!
//!     After insertion, `//` commented declarations are removed again. The comment pass
//!     uses [`classify_scopes`] to decide whether a commented member belongs to an
//!     object (`@bg[light]`), to a `:root` block (`var(--accent)`), or stands alone.
//!     One-line objects open no scope; a commented member on any later line removes
//!     theirs.
//!
//!     Files are processed in order and share one mapping, so a later file can remove a
//!     name an earlier one inserted.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::mapping::VariableMapping;
use crate::normalize::normalize_value;
use crate::scope::classify_scopes;

/// File extensions collected from the variables directory.
pub const DECLARATION_EXTENSIONS: [&str; 3] = ["css", "scss", "less"];

const COMMENT_MARKER: &str = "//";
const CUSTOM_PROPERTY_PREFIX: &str = "--";

static OBJECT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"((?:\$|@|--)[\w-]+)\s*:\s*\{([^}]+)\}").unwrap());
static OBJECT_MEMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\w-]+)\s*:\s*([^;\n]+);?").unwrap());
static FLAT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"((?:\$|@|--)[\w-]+)\s*:[ \t]*([^;\n]+)").unwrap());

/// Build the mapping from `paths`, failing on the first unreadable file.
pub fn build_mapping<P: AsRef<Path>>(paths: &[P]) -> Result<VariableMapping, ExtractError> {
    let mut mapping = VariableMapping::new();
    for path in paths {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ExtractError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        extract_declarations(&mut mapping, &text);
        debug!(path = %path.display(), values = mapping.len(), "indexed declaration file");
    }
    Ok(mapping)
}

/// Like [`build_mapping`] but never fails: any error yields an empty mapping.
///
/// A partially built index would offer inconsistent suggestions, so nothing from the
/// failed run is kept.
pub fn load_variables<P: AsRef<Path>>(paths: &[P]) -> VariableMapping {
    match build_mapping(paths) {
        Ok(mapping) => mapping,
        Err(err) => {
            warn!(error = %err, "token extraction failed; continuing with an empty index");
            VariableMapping::new()
        }
    }
}

/// Add every declaration in `text` to `mapping`, then drop commented ones.
pub fn extract_declarations(mapping: &mut VariableMapping, text: &str) {
    for captures in OBJECT_REGEX.captures_iter(text) {
        let object = &captures[1];
        for member in OBJECT_MEMBER_REGEX.captures_iter(&captures[2]) {
            let name = object_token_name(object, &member[1]);
            mapping.insert(normalize_value(&member[2]), name);
        }
    }

    for captures in FLAT_REGEX.captures_iter(text) {
        let value = &captures[2];
        if value.trim_start().starts_with('{') {
            continue;
        }
        mapping.insert(normalize_value(value), flat_token_name(&captures[1]));
    }

    remove_commented_declarations(mapping, text);
}

fn remove_commented_declarations(mapping: &mut VariableMapping, text: &str) {
    let scopes = classify_scopes(text, 0);
    let inline_objects = single_line_objects(text);

    for (line_number, line) in text.split('\n').enumerate() {
        let Some(commented) = line.trim().strip_prefix(COMMENT_MARKER) else {
            continue;
        };
        let mut parts = commented.trim_start().split(':');
        let key = parts.next().unwrap_or_default().trim();
        let value = match parts.next() {
            Some(value) if !value.is_empty() => value.replacen(';', "", 1),
            _ => continue,
        };
        let normalized = normalize_value(&value);

        for (identifier, scope) in &scopes {
            if !scope.contains(line_number) {
                continue;
            }
            let name = if scope.root {
                format!("var({key})")
            } else {
                object_token_name(identifier, key)
            };
            mapping.remove(&normalized, &name);
        }

        // a one-line object opens no scope, so match it by position instead
        for (object_line, object) in &inline_objects {
            if *object_line < line_number {
                mapping.remove(&normalized, &object_token_name(object, key));
            }
        }

        mapping.remove(&normalized, key);
        if key.starts_with(CUSTOM_PROPERTY_PREFIX) {
            mapping.remove(&normalized, &format!("var({key})"));
        }
    }
}

/// Objects written entirely on one line, with the line they sit on.
fn single_line_objects(text: &str) -> Vec<(usize, String)> {
    OBJECT_REGEX
        .captures_iter(text)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            if whole.as_str().contains('\n') {
                return None;
            }
            let line = text[..whole.start()].matches('\n').count();
            Some((line, captures[1].to_string()))
        })
        .collect()
}

/// `@bg` + `light` → `@bg[light]`; `$bg` is referenced the same way.
fn object_token_name(object: &str, key: &str) -> String {
    let bare = object
        .strip_prefix('@')
        .or_else(|| object.strip_prefix('$'))
        .unwrap_or(object);
    format!("@{bare}[{key}]")
}

/// Custom properties are referenced as `var(--name)` in consuming code.
fn flat_token_name(name: &str) -> String {
    if name.starts_with(CUSTOM_PROPERTY_PREFIX) {
        format!("var({name})")
    } else {
        name.to_string()
    }
}

/// Where declaration files come from: a directory walked recursively plus an explicit
/// list, both relative to the workspace root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationSources {
    pub root: Option<PathBuf>,
    pub directory: Option<String>,
    pub files: Vec<String>,
}

impl DeclarationSources {
    pub fn new(root: Option<PathBuf>, directory: Option<String>, files: Vec<String>) -> Self {
        Self {
            root,
            directory,
            files,
        }
    }

    /// Nothing configured means the token features stay off.
    pub fn is_configured(&self) -> bool {
        self.directory
            .as_deref()
            .is_some_and(|dir| !dir.trim().is_empty())
            || !self.files.is_empty()
    }

    /// Directory files first (sorted by name), then the explicit files in order.
    pub fn resolve(&self) -> Vec<PathBuf> {
        let mut resolved = Vec::new();
        if let Some(directory) = self.directory_path() {
            resolved.extend(walk_declaration_directory(&directory));
        }
        resolved.extend(self.files.iter().filter_map(|file| self.join(file)));
        resolved
    }

    /// Whether saving `path` should trigger a reload of the index.
    pub fn covers(&self, path: &Path) -> bool {
        if self
            .files
            .iter()
            .filter_map(|file| self.join(file))
            .any(|file| file == path)
        {
            return true;
        }
        match self.directory_path() {
            Some(directory) => path.starts_with(&directory) && has_declaration_extension(path),
            None => false,
        }
    }

    fn directory_path(&self) -> Option<PathBuf> {
        let directory = self.directory.as_deref()?.trim();
        if directory.is_empty() {
            return None;
        }
        // a directory is only meaningful inside a workspace
        self.root.as_ref().map(|root| root.join(directory))
    }

    fn join(&self, file: &str) -> Option<PathBuf> {
        let path = Path::new(file);
        if path.is_absolute() {
            return Some(path.to_path_buf());
        }
        self.root.as_ref().map(|root| root.join(path))
    }
}

fn walk_declaration_directory(directory: &Path) -> Vec<PathBuf> {
    if !directory.is_dir() {
        warn!(directory = %directory.display(), "variables directory not found");
        return Vec::new();
    }
    let mut files = Vec::new();
    let walker = WalkBuilder::new(directory)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();
    for entry in walker {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() && has_declaration_extension(path) {
                    files.push(path.to_path_buf());
                }
            }
            Err(err) => warn!(error = %err, "skipping unreadable entry in variables directory"),
        }
    }
    files
}

fn has_declaration_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DECLARATION_EXTENSIONS.contains(&ext))
}
