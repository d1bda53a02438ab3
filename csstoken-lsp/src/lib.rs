//! Language Server Protocol (LSP) implementation for csstoken
//!
//!     Surfaces the token engine in any LSP-capable editor: hard-coded colors that
//!     duplicate a design token are reported as diagnostics, sizes and colors under the
//!     cursor get quick fixes, and a few workspace commands drive a variable picker.
//!
//! Feature Set
//!
//!     1. Diagnostics (textDocument/publishDiagnostics):
//!         - Published on open, change and save for css, scss, less, vue, svelte, html
//!           and the JSX/TSX language ids
//!         - One error per color literal whose value already has a token
//!         - Empty until `variablesFiles` or `variablesDirectory` is configured
//!
//!     2. Code Actions (textDocument/codeAction, quickfix only):
//!         - Size literals: rem conversion and same-valued tokens, per `pxReplaceOptions`
//!         - Color literals: same-valued tokens, per `colorReplaceOptions`
//!         - The first action of each kind is marked preferred
//!
//!     3. Commands (workspace/executeCommand):
//!         - csstoken.searchVariables: token name/value pairs matching a query
//!         - csstoken.insertVariable: write a chosen token over the given ranges
//!         - csstoken.reloadVariables: rebuild the index from the declaration files
//!
//!     4. Save hooks (textDocument/didSave):
//!         - Saving a declaration file rebuilds the index and re-diagnoses open documents
//!         - With `autoReplace`, duplicated colors are rewritten to their first token
//!
//! Architecture
//!
//!     LSP Layer (tower-lsp):
//!         - JSON-RPC transport, capability negotiation, request routing
//!
//!     Server Layer (this crate):
//!         - Implements LanguageServer, holds open documents, settings and the index
//!         - The index lives in a `MappingStore`; reloads swap it atomically
//!         - Thin tests asserting the feature layer is called with the right inputs
//!
//!     Feature Layer (`features` + the `csstoken` core):
//!         - Conversion between engine results and LSP types
//!         - All matching logic and dense unit tests live in the core crate
//!
//! Configuration
//!
//!     Settings come from `initializationOptions` and `workspace/didChangeConfiguration`
//!     (camelCase keys, optionally nested under `csstoken`), layered over a project
//!     `.csstoken.toml` and the built-in defaults by `csstoken-config`.
//!
//! Usage
//!
//!     $ csstoken-lsp
//!     Starts the language server on stdin/stdout. Logs go to stderr, filtered by
//!     `CSSTOKEN_LOG` (default `warn`).

pub mod features;
pub mod server;

pub use server::{CssTokenLanguageServer, DefaultFeatureProvider, FeatureProvider, LspClient};
