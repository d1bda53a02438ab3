//! Value normalization
//!
//!     Literals and token values are compared through a canonical string key so that
//!     `red`, `#f00` and `rgb(255, 0, 0)` all land on the same mapping entry.
//!
//!     Sizes keep only their `<integer><unit>` components: `margin: 10PX 2rem;` becomes
//!     `10px 2rem`. Colors become lowercase eight digit hex (`#rrggbbaa`).
//!
//!     Dispatch for an arbitrary value is size first, then color, then the trimmed raw
//!     text. A value recognized as a size is never looked at as a color.

use once_cell::sync::Lazy;
use regex::Regex;

static SIZE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+(?:px|rem|em)\b").unwrap());

/// Extract every size component from `raw`, lowercased and joined by a single space.
///
/// Everything that is not a size component is discarded, so `10px 20px` and
/// `margin: 10px 20px;` normalize identically. Returns `None` when nothing matches.
pub fn normalize_size(raw: &str) -> Option<String> {
    let lowered = raw.to_lowercase();
    let sizes: Vec<&str> = SIZE_REGEX
        .find_iter(&lowered)
        .map(|found| found.as_str())
        .collect();
    if sizes.is_empty() {
        None
    } else {
        Some(sizes.join(" "))
    }
}

/// Parse any CSS color syntax into `#rrggbbaa`.
///
/// Percentage components are accepted in every slot (`rgba(100%, 0%, 0%, 1)` is red).
pub fn normalize_color(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let color = csscolorparser::parse(trimmed).ok()?;
    Some(format!(
        "#{:02x}{:02x}{:02x}{:02x}",
        channel(color.r as f64),
        channel(color.g as f64),
        channel(color.b as f64),
        channel(color.a as f64),
    ))
}

/// Canonical key for a declared value: size, else color, else the trimmed text.
pub fn normalize_value(raw: &str) -> String {
    normalize_size(raw)
        .or_else(|| normalize_color(raw))
        .unwrap_or_else(|| raw.trim().to_string())
}

fn channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
