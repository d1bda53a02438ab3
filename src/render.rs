//! Suggestion rendering
//!
//! Replacement options are small templates with EJS-style output tags:
//!
//!     <%= _VAR_NAME_ %>       one suggestion per candidate token name
//!     <%= _MATCHED_TEXT_ %>   the literal as written in the document
//!     <%= _REM_RESULT_ %>     size literals only: the px components converted to rem
//!
//! A template that mentions `_VAR_NAME_` expands once per candidate name (and to
//! nothing when there are none); any other template renders exactly once.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub const VAR_NAME: &str = "_VAR_NAME_";
pub const MATCHED_TEXT: &str = "_MATCHED_TEXT_";
pub const REM_RESULT: &str = "_REM_RESULT_";

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<%[=-]\s*(\w+)\s*%>").unwrap());

/// Built-in values substituted into templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    values: HashMap<&'static str, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Substitute known tags in `template`. Unknown tags are kept as written.
pub fn render_template(template: &str, context: &TemplateContext) -> String {
    TAG_REGEX
        .replace_all(template, |captures: &Captures<'_>| {
            context
                .get(&captures[1])
                .map(str::to_string)
                .unwrap_or_else(|| captures[0].to_string())
        })
        .into_owned()
}

/// Render every template against the candidate `names`, in template order.
pub fn render_options<'a, I>(
    templates: &[String],
    names: I,
    context: &TemplateContext,
) -> Vec<String>
where
    I: IntoIterator<Item = &'a String> + Clone,
{
    let mut rendered = Vec::new();
    for template in templates {
        if template.contains(VAR_NAME) {
            for name in names.clone() {
                let scoped = context.clone().with(VAR_NAME, name.as_str());
                rendered.push(render_template(template, &scoped));
            }
        } else {
            rendered.push(render_template(template, context));
        }
    }
    rendered
}

/// Convert each `px` component of a normalized size to `rem`.
///
/// `10px 1em` with a root of 16 becomes `0.625rem 1em`. Non-positive roots leave the
/// text unchanged.
pub fn px_to_rem(size: &str, root_font_size: f64) -> String {
    size.split_whitespace()
        .map(|component| {
            let Some(magnitude) = component.strip_suffix("px") else {
                return component.to_string();
            };
            match magnitude.parse::<f64>() {
                Ok(px) if root_font_size > 0.0 => {
                    format!("{}rem", trim_decimal(px / root_font_size))
                }
                _ => component.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Four decimals, ties rounded away from zero, trailing zeros dropped.
fn trim_decimal(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    let fixed = format!("{rounded:.4}");
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
