//! Workspace commands exposed through `workspace/executeCommand`.
//!
//!     csstoken.searchVariables [query]             → [{ label, description, name, value }]
//!     csstoken.insertVariable  { uri, name, ranges } → applies one workspace edit
//!     csstoken.reloadVariables                      → rebuilds the index, returns its size

use std::collections::HashMap;

use csstoken::VariableMapping;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::{Range, TextEdit, Url, WorkspaceEdit};

pub const COMMAND_SEARCH: &str = "csstoken.searchVariables";
pub const COMMAND_INSERT: &str = "csstoken.insertVariable";
pub const COMMAND_RELOAD: &str = "csstoken.reloadVariables";

pub const COMMANDS: [&str; 3] = [COMMAND_SEARCH, COMMAND_INSERT, COMMAND_RELOAD];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InsertVariable {
    pub uri: Url,
    pub name: String,
    pub ranges: Vec<Range>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRequest {
    Search { query: String },
    Insert(InsertVariable),
    Reload,
}

/// One entry of the variable picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchItem {
    pub label: String,
    pub description: String,
    pub name: String,
    pub value: String,
}

pub fn parse_command(command: &str, arguments: &[Value]) -> Result<CommandRequest> {
    match command {
        COMMAND_SEARCH => {
            let query = arguments
                .first()
                .and_then(|value| value.as_str())
                .unwrap_or_default();
            Ok(CommandRequest::Search {
                query: query.to_string(),
            })
        }
        COMMAND_INSERT => {
            let argument = arguments
                .first()
                .cloned()
                .ok_or_else(|| Error::invalid_params("insertVariable needs an argument"))?;
            let insert: InsertVariable = serde_json::from_value(argument)
                .map_err(|err| Error::invalid_params(err.to_string()))?;
            Ok(CommandRequest::Insert(insert))
        }
        COMMAND_RELOAD => Ok(CommandRequest::Reload),
        _ => Err(Error::invalid_request()),
    }
}

pub fn search_items(mapping: &VariableMapping, query: &str) -> Vec<SearchItem> {
    mapping
        .search(query)
        .into_iter()
        .map(|entry| SearchItem {
            label: entry.name.clone(),
            description: entry.value.clone(),
            name: entry.name,
            value: entry.value,
        })
        .collect()
}

/// Replace every range with the chosen token name.
pub fn insert_edit(insert: &InsertVariable) -> WorkspaceEdit {
    let edits = insert
        .ranges
        .iter()
        .map(|range| TextEdit {
            range: *range,
            new_text: insert.name.clone(),
        })
        .collect();
    WorkspaceEdit {
        changes: Some(HashMap::from([(insert.uri.clone(), edits)])),
        ..WorkspaceEdit::default()
    }
}
