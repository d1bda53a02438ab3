//! Shared configuration loader for csstoken.
//!
//! `defaults/csstoken.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer a project `.csstoken.toml`,
//! explicit files and editor settings on top of those defaults via [`Loader`] before
//! deserializing into [`Settings`].
//!
//! Editors send settings with camelCase keys (`variablesFiles`, `rootFontSize`);
//! [`Loader::with_client_settings`] converts them to the snake_case keys used here.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use csstoken::{DeclarationSources, SuggestionOptions};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/csstoken.default.toml");

/// Name of the optional per-project settings file at the workspace root.
pub const PROJECT_FILE: &str = ".csstoken.toml";

/// Key editors nest csstoken settings under.
pub const SETTINGS_SECTION: &str = "csstoken";

/// Everything csstoken can be configured with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Declaration files relative to the workspace root, read in order.
    #[serde(default)]
    pub variables_files: Vec<String>,
    /// Directory walked for `.css`/`.scss`/`.less` declaration files.
    #[serde(default)]
    pub variables_directory: Option<String>,
    pub root_font_size: f64,
    pub px_replace_options: Vec<String>,
    pub color_replace_options: Vec<String>,
    pub auto_replace: bool,
}

impl Settings {
    /// Declaration sources resolved against `root`.
    pub fn sources(&self, root: Option<PathBuf>) -> DeclarationSources {
        DeclarationSources::new(
            root,
            self.variables_directory.clone(),
            self.variables_files.clone(),
        )
    }

    /// Token features (diagnostics, color fixes) are off until a source is configured.
    pub fn is_enabled(&self) -> bool {
        self.sources(None).is_configured()
    }

    pub fn suggestion_options(&self) -> SuggestionOptions {
        SuggestionOptions {
            px_templates: self.px_replace_options.clone(),
            color_templates: self.color_replace_options.clone(),
            root_font_size: self.root_font_size,
            colors_enabled: self.is_enabled(),
        }
    }
}

impl Default for Settings {
    /// Mirrors `defaults/csstoken.default.toml`.
    fn default() -> Self {
        Self {
            variables_files: Vec::new(),
            variables_directory: None,
            root_font_size: 16.0,
            px_replace_options: vec![
                "<%= _VAR_NAME_ %>".to_string(),
                "<%= _REM_RESULT_ %>".to_string(),
            ],
            color_replace_options: vec!["<%= _VAR_NAME_ %>".to_string()],
            auto_replace: false,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer the project file found at `root`, if there is one.
    pub fn with_project_file(self, root: impl AsRef<Path>) -> Self {
        self.with_optional_file(root.as_ref().join(PROJECT_FILE))
    }

    /// Layer settings sent by an editor.
    ///
    /// Accepts either the csstoken section itself or an object containing it under
    /// `"csstoken"`. Keys may be camelCase; `null` values are ignored.
    pub fn with_client_settings(mut self, settings: &Value) -> Self {
        let section = settings.get(SETTINGS_SECTION).unwrap_or(settings);
        let Value::Object(entries) = section else {
            return self;
        };
        let converted: Map<String, Value> = entries
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (snake_case(key), value.clone()))
            .collect();
        if converted.is_empty() {
            return self;
        }
        let json = Value::Object(converted).to_string();
        self.builder = self
            .builder
            .add_source(File::from_str(&json, FileFormat::Json));
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<Settings, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<Settings, ConfigError> {
    Loader::new().build()
}

fn snake_case(key: &str) -> String {
    let mut converted = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            converted.push('_');
            converted.push(ch.to_ascii_lowercase());
        } else {
            converted.push(ch);
        }
    }
    converted
}
