//! # csstoken
//!
//! Core engine for replacing hard-coded CSS sizes and colors with design tokens.
//!
//! Pipeline
//!
//!     declaration files ──extract──▶ VariableMapping (normalized value → token names)
//!                                          │
//!     document text ──scan──▶ LiteralMatch ┤──▶ diagnostics / auto-replace edits
//!                                          │
//!     line + selection ──replacer──▶ QuickFix (rendered from templates)
//!
//! Modules
//!
//!     - [`normalize`]: canonical keys for sizes (`10px 2rem`) and colors (`#rrggbbaa`)
//!     - [`extract`]: builds the mapping from flat, object and custom-property declarations
//!     - [`scope`]: approximate line ranges of declaration blocks
//!     - [`scan`]: finds literals duplicating a token value
//!     - [`render`]: template rendering and px → rem conversion
//!     - [`replacer`]: size and color quick-fix providers
//!     - [`mapping`]: the index and its atomically swapped snapshot store
//!     - [`logging`]: the stderr `tracing` subscriber shared by the binaries
//!
//! Nothing here parses a stylesheet grammar. Everything is line oriented and regex
//! driven, so results are heuristics over well-formatted source.

pub mod edit;
pub mod error;
pub mod extract;
pub mod logging;
pub mod mapping;
pub mod named_colors;
pub mod normalize;
pub mod range;
pub mod render;
pub mod replacer;
pub mod scan;
pub mod scope;

pub use edit::{apply_edits, TextEditSpan};
pub use error::ExtractError;
pub use extract::{build_mapping, load_variables, DeclarationSources};
pub use mapping::{MappingStore, TokenEntry, VariableMapping};
pub use normalize::{normalize_color, normalize_size, normalize_value};
pub use replacer::{quick_fixes, QuickFix, SuggestionOptions};
pub use scan::{auto_replace_edits, scan_literals, DocumentKind, LiteralMatch, ScanReport};
