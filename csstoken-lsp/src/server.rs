//! Main language server implementation

use std::collections::HashMap;
use std::ops::Range as ByteRange;
use std::path::PathBuf;
use std::sync::Arc;

use crate::features::code_actions::to_code_actions;
use crate::features::commands::{
    insert_edit, parse_command, search_items, CommandRequest, COMMANDS,
};
use crate::features::diagnostics::{literal_diagnostics, to_byte_range, to_text_edits};
use csstoken::range::SourceLocation;
use csstoken::{
    apply_edits, auto_replace_edits, load_variables, quick_fixes, scan_literals,
    DeclarationSources, DocumentKind, MappingStore, QuickFix, ScanReport, SuggestionOptions,
    TextEditSpan, VariableMapping,
};
use csstoken_config::{Loader, Settings};
use serde_json::Value;
use tokio::sync::RwLock;
use tower_lsp::async_trait;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::{
    CodeActionKind, CodeActionOptions, CodeActionParams, CodeActionProviderCapability,
    CodeActionResponse, Diagnostic, DidChangeConfigurationParams, DidChangeTextDocumentParams,
    DidCloseTextDocumentParams, DidOpenTextDocumentParams, DidSaveTextDocumentParams,
    ExecuteCommandOptions, ExecuteCommandParams, InitializeParams, InitializeResult,
    InitializedParams, SaveOptions, ServerCapabilities, ServerInfo, TextDocumentItem,
    TextDocumentSyncCapability, TextDocumentSyncKind, TextDocumentSyncOptions,
    TextDocumentSyncSaveOptions, Url, WorkspaceEdit,
};
use tower_lsp::Client;
use tracing::{debug, info, warn};

/// The slice of the client connection the server needs.
#[async_trait]
pub trait LspClient: Send + Sync + Clone + 'static {
    async fn publish_diagnostics(
        &self,
        uri: Url,
        diagnostics: Vec<Diagnostic>,
        version: Option<i32>,
    );

    /// Returns whether the client applied the edit.
    async fn apply_edit(&self, edit: WorkspaceEdit) -> bool;
}

#[async_trait]
impl LspClient for Client {
    async fn publish_diagnostics(
        &self,
        uri: Url,
        diagnostics: Vec<Diagnostic>,
        version: Option<i32>,
    ) {
        Client::publish_diagnostics(self, uri, diagnostics, version).await;
    }

    async fn apply_edit(&self, edit: WorkspaceEdit) -> bool {
        match Client::apply_edit(self, edit).await {
            Ok(response) => response.applied,
            Err(err) => {
                warn!(%err, "client rejected workspace edit");
                false
            }
        }
    }
}

pub trait FeatureProvider: Send + Sync + 'static {
    fn load_mapping(&self, sources: &DeclarationSources) -> VariableMapping;
    fn scan(&self, text: &str, kind: DocumentKind, mapping: &VariableMapping) -> ScanReport;
    fn auto_replace(
        &self,
        text: &str,
        kind: DocumentKind,
        mapping: &VariableMapping,
    ) -> Vec<TextEditSpan>;
    fn quick_fixes(
        &self,
        text: &str,
        selection: ByteRange<usize>,
        mapping: &VariableMapping,
        options: &SuggestionOptions,
    ) -> Vec<QuickFix>;
}

#[derive(Default)]
pub struct DefaultFeatureProvider;

impl DefaultFeatureProvider {
    pub fn new() -> Self {
        Self
    }
}

impl FeatureProvider for DefaultFeatureProvider {
    fn load_mapping(&self, sources: &DeclarationSources) -> VariableMapping {
        load_variables(&sources.resolve())
    }

    fn scan(&self, text: &str, kind: DocumentKind, mapping: &VariableMapping) -> ScanReport {
        scan_literals(text, kind, mapping)
    }

    fn auto_replace(
        &self,
        text: &str,
        kind: DocumentKind,
        mapping: &VariableMapping,
    ) -> Vec<TextEditSpan> {
        auto_replace_edits(text, kind, mapping)
    }

    fn quick_fixes(
        &self,
        text: &str,
        selection: ByteRange<usize>,
        mapping: &VariableMapping,
        options: &SuggestionOptions,
    ) -> Vec<QuickFix> {
        quick_fixes(text, selection, mapping, options)
    }
}

#[derive(Clone)]
struct DocumentEntry {
    text: Arc<String>,
    kind: DocumentKind,
    version: Option<i32>,
}

#[derive(Default)]
struct DocumentStore {
    entries: RwLock<HashMap<Url, DocumentEntry>>,
}

impl DocumentStore {
    async fn upsert(&self, uri: Url, entry: DocumentEntry) -> DocumentEntry {
        self.entries.write().await.insert(uri, entry.clone());
        entry
    }

    /// Replace the text of a tracked document, keeping its kind.
    async fn update_text(
        &self,
        uri: &Url,
        text: String,
        version: Option<i32>,
    ) -> Option<DocumentEntry> {
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(uri)?;
        entry.text = Arc::new(text);
        if version.is_some() {
            entry.version = version;
        }
        Some(entry.clone())
    }

    async fn get(&self, uri: &Url) -> Option<DocumentEntry> {
        self.entries.read().await.get(uri).cloned()
    }

    async fn all(&self) -> Vec<(Url, DocumentEntry)> {
        self.entries
            .read()
            .await
            .iter()
            .map(|(uri, entry)| (uri.clone(), entry.clone()))
            .collect()
    }

    async fn remove(&self, uri: &Url) -> bool {
        self.entries.write().await.remove(uri).is_some()
    }
}

struct Workspace {
    root: Option<PathBuf>,
    client_settings: Value,
    settings: Settings,
    sources: DeclarationSources,
}

impl Default for Workspace {
    fn default() -> Self {
        Self {
            root: None,
            client_settings: Value::Null,
            settings: Settings::default(),
            sources: DeclarationSources::default(),
        }
    }
}

pub struct CssTokenLanguageServer<C = Client, P = DefaultFeatureProvider> {
    client: C,
    documents: DocumentStore,
    features: Arc<P>,
    mapping: MappingStore,
    workspace: RwLock<Workspace>,
}

impl CssTokenLanguageServer<Client, DefaultFeatureProvider> {
    pub fn new(client: Client) -> Self {
        Self::with_features(client, Arc::new(DefaultFeatureProvider::new()))
    }
}

impl<C, P> CssTokenLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    pub fn with_features(client: C, features: Arc<P>) -> Self {
        Self {
            client,
            documents: DocumentStore::default(),
            features,
            mapping: MappingStore::default(),
            workspace: RwLock::new(Workspace::default()),
        }
    }

    /// Re-layer defaults, the project file and the client's settings.
    async fn reload_settings(&self) {
        let mut workspace = self.workspace.write().await;
        let mut loader = Loader::new();
        if let Some(root) = &workspace.root {
            loader = loader.with_project_file(root);
        }
        match loader
            .with_client_settings(&workspace.client_settings)
            .build()
        {
            Ok(settings) => {
                workspace.sources = settings.sources(workspace.root.clone());
                workspace.settings = settings;
            }
            Err(err) => warn!(%err, "invalid csstoken settings, keeping previous values"),
        }
    }

    async fn reload_mapping(&self) {
        let sources = self.workspace.read().await.sources.clone();
        let mapping = self.features.load_mapping(&sources);
        info!(values = mapping.len(), "token index rebuilt");
        self.mapping.replace(mapping);
    }

    async fn publish(&self, uri: Url, entry: &DocumentEntry) {
        let diagnostics = if self.workspace.read().await.sources.is_configured() {
            let mapping = self.mapping.snapshot();
            let report = self.features.scan(&entry.text, entry.kind, &mapping);
            if let Some(halt) = &report.halted {
                debug!(%uri, line = halt.line, value = %halt.value, "scan halted");
            }
            literal_diagnostics(&entry.text, &report)
        } else {
            Vec::new()
        };
        self.client
            .publish_diagnostics(uri, diagnostics, entry.version)
            .await;
    }

    async fn refresh_open_documents(&self) {
        for (uri, entry) in self.documents.all().await {
            self.publish(uri, &entry).await;
        }
    }

    /// Apply auto-replace edits, then diagnose the edited text.
    async fn auto_replace(&self, uri: Url, entry: DocumentEntry) {
        let mapping = self.mapping.snapshot();
        let edits = self
            .features
            .auto_replace(&entry.text, entry.kind, &mapping);
        if edits.is_empty() {
            self.publish(uri, &entry).await;
            return;
        }
        let changes = HashMap::from([(uri.clone(), to_text_edits(&entry.text, &edits))]);
        let edit = WorkspaceEdit {
            changes: Some(changes),
            ..WorkspaceEdit::default()
        };
        if !self.client.apply_edit(edit).await {
            self.publish(uri, &entry).await;
            return;
        }
        debug!(%uri, edits = edits.len(), "auto-replaced literals");
        let edited = apply_edits(&entry.text, &edits);
        let entry = self
            .documents
            .update_text(&uri, edited, None)
            .await
            .unwrap_or(entry);
        self.publish(uri, &entry).await;
    }
}

#[allow(deprecated)]
fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .and_then(|folder| folder.uri.to_file_path().ok())
        .or_else(|| {
            params
                .root_uri
                .as_ref()
                .and_then(|uri| uri.to_file_path().ok())
        })
}

#[async_trait]
impl<C, P> tower_lsp::LanguageServer for CssTokenLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        {
            let mut workspace = self.workspace.write().await;
            workspace.root = workspace_root(&params);
            workspace.client_settings = params.initialization_options.clone().unwrap_or_default();
        }
        self.reload_settings().await;

        let capabilities = ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                        include_text: Some(true),
                    })),
                    ..TextDocumentSyncOptions::default()
                },
            )),
            code_action_provider: Some(CodeActionProviderCapability::Options(CodeActionOptions {
                code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
                ..CodeActionOptions::default()
            })),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: COMMANDS.iter().map(|command| command.to_string()).collect(),
                ..ExecuteCommandOptions::default()
            }),
            ..ServerCapabilities::default()
        };

        Ok(InitializeResult {
            capabilities,
            server_info: Some(ServerInfo {
                name: "csstoken-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.reload_mapping().await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let TextDocumentItem {
            uri,
            language_id,
            version,
            text,
        } = params.text_document;
        let Some(kind) = DocumentKind::from_language_id(&language_id) else {
            debug!(%uri, %language_id, "ignoring unsupported language");
            return;
        };
        let entry = DocumentEntry {
            text: Arc::new(text),
            kind,
            version: Some(version),
        };
        let entry = self.documents.upsert(uri.clone(), entry).await;
        self.publish(uri, &entry).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };
        if let Some(entry) = self
            .documents
            .update_text(&uri, change.text, Some(params.text_document.version))
            .await
        {
            self.publish(uri, &entry).await;
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        let (covers, auto_replace) = {
            let workspace = self.workspace.read().await;
            let covers = uri
                .to_file_path()
                .is_ok_and(|path| workspace.sources.covers(&path));
            (covers, workspace.settings.auto_replace)
        };
        if covers {
            debug!(%uri, "declaration source saved");
            self.reload_mapping().await;
        }

        let entry = match params.text {
            Some(text) => self.documents.update_text(&uri, text, None).await,
            None => self.documents.get(&uri).await,
        };
        if covers {
            self.refresh_open_documents().await;
        }
        let Some(entry) = entry else {
            return;
        };
        if auto_replace && self.workspace.read().await.sources.is_configured() {
            self.auto_replace(uri, entry).await;
        } else if !covers {
            self.publish(uri, &entry).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        if self.documents.remove(&uri).await {
            self.client.publish_diagnostics(uri, Vec::new(), None).await;
        }
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.workspace.write().await.client_settings = params.settings;
        self.reload_settings().await;
        self.reload_mapping().await;
        self.refresh_open_documents().await;
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let uri = params.text_document.uri;
        let Some(entry) = self.documents.get(&uri).await else {
            return Ok(None);
        };
        let options = self.workspace.read().await.settings.suggestion_options();
        let mapping = self.mapping.snapshot();
        let locator = SourceLocation::new(&entry.text);
        let selection = to_byte_range(&locator, params.range);
        let fixes = self
            .features
            .quick_fixes(&entry.text, selection, &mapping, &options);
        Ok(Some(to_code_actions(&uri, &entry.text, fixes)))
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        match parse_command(&params.command, &params.arguments)? {
            CommandRequest::Search { query } => {
                let mapping = self.mapping.snapshot();
                let items = search_items(&mapping, &query);
                let value = serde_json::to_value(items).map_err(|_| Error::internal_error())?;
                Ok(Some(value))
            }
            CommandRequest::Insert(insert) => {
                let applied = self.client.apply_edit(insert_edit(&insert)).await;
                Ok(Some(Value::Bool(applied)))
            }
            CommandRequest::Reload => {
                self.reload_mapping().await;
                self.refresh_open_documents().await;
                Ok(Some(Value::from(self.mapping.snapshot().len())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::commands::{COMMAND_INSERT, COMMAND_RELOAD, COMMAND_SEARCH};
    use crate::features::test_support::{red_mapping, SAMPLE_STYLESHEET};
    use csstoken::LiteralMatch;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tower_lsp::lsp_types::{
        Position, Range, TextDocumentContentChangeEvent, TextDocumentIdentifier,
        VersionedTextDocumentIdentifier,
    };
    use tower_lsp::LanguageServer;

    #[derive(Clone, Default)]
    struct RecordingClient {
        published: Arc<Mutex<Vec<(Url, Vec<Diagnostic>)>>>,
        edits: Arc<Mutex<Vec<WorkspaceEdit>>>,
    }

    impl RecordingClient {
        fn published(&self) -> Vec<(Url, Vec<Diagnostic>)> {
            self.published.lock().unwrap().clone()
        }

        fn edits(&self) -> Vec<WorkspaceEdit> {
            self.edits.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LspClient for RecordingClient {
        async fn publish_diagnostics(
            &self,
            uri: Url,
            diagnostics: Vec<Diagnostic>,
            _: Option<i32>,
        ) {
            self.published.lock().unwrap().push((uri, diagnostics));
        }

        async fn apply_edit(&self, edit: WorkspaceEdit) -> bool {
            self.edits.lock().unwrap().push(edit);
            true
        }
    }

    #[derive(Default)]
    struct MockFeatureProvider {
        load_called: AtomicUsize,
        scan_called: AtomicUsize,
        auto_replace_called: AtomicUsize,
        last_scanned: Mutex<Option<String>>,
        last_selection: Mutex<Option<ByteRange<usize>>>,
        last_options: Mutex<Option<SuggestionOptions>>,
    }

    impl FeatureProvider for MockFeatureProvider {
        fn load_mapping(&self, _: &DeclarationSources) -> VariableMapping {
            self.load_called.fetch_add(1, Ordering::SeqCst);
            red_mapping()
        }

        fn scan(&self, text: &str, _: DocumentKind, _: &VariableMapping) -> ScanReport {
            self.scan_called.fetch_add(1, Ordering::SeqCst);
            *self.last_scanned.lock().unwrap() = Some(text.to_string());
            ScanReport {
                matches: vec![LiteralMatch {
                    normalized: "#ff0000ff".into(),
                    raw: "#ff0000".into(),
                    span: 0..7,
                }],
                halted: None,
            }
        }

        fn auto_replace(&self, _: &str, _: DocumentKind, _: &VariableMapping) -> Vec<TextEditSpan> {
            self.auto_replace_called.fetch_add(1, Ordering::SeqCst);
            vec![TextEditSpan::new(0, 7, "@red")]
        }

        fn quick_fixes(
            &self,
            _: &str,
            selection: ByteRange<usize>,
            _: &VariableMapping,
            options: &SuggestionOptions,
        ) -> Vec<QuickFix> {
            *self.last_selection.lock().unwrap() = Some(selection.clone());
            *self.last_options.lock().unwrap() = Some(options.clone());
            vec![QuickFix {
                title: "Replace [ #ff0000 ] with @red".into(),
                span: selection,
                replacement: "@red".into(),
                preferred: true,
            }]
        }
    }

    type TestServer = CssTokenLanguageServer<RecordingClient, MockFeatureProvider>;

    fn sample_uri() -> Url {
        Url::parse("file:///workspace/button.css").unwrap()
    }

    fn test_server() -> (TestServer, RecordingClient, Arc<MockFeatureProvider>) {
        let client = RecordingClient::default();
        let provider = Arc::new(MockFeatureProvider::default());
        let server = CssTokenLanguageServer::with_features(client.clone(), provider.clone());
        (server, client, provider)
    }

    #[allow(deprecated)]
    async fn start(server: &TestServer, options: Option<Value>) -> InitializeResult {
        let result = server
            .initialize(InitializeParams {
                root_uri: Some(Url::parse("file:///workspace").unwrap()),
                initialization_options: options,
                ..InitializeParams::default()
            })
            .await
            .unwrap();
        server.initialized(InitializedParams {}).await;
        result
    }

    fn configured() -> Option<Value> {
        Some(json!({ "variablesFiles": ["tokens.less"] }))
    }

    async fn open(server: &TestServer, language_id: &str) {
        server
            .did_open(DidOpenTextDocumentParams {
                text_document: TextDocumentItem {
                    uri: sample_uri(),
                    language_id: language_id.into(),
                    version: 1,
                    text: SAMPLE_STYLESHEET.to_string(),
                },
            })
            .await;
    }

    #[tokio::test]
    async fn initialize_advertises_actions_and_commands() {
        let (server, _, provider) = test_server();
        let result = start(&server, None).await;
        let commands = result
            .capabilities
            .execute_command_provider
            .expect("commands advertised")
            .commands;
        assert_eq!(commands, vec![COMMAND_SEARCH, COMMAND_INSERT, COMMAND_RELOAD]);
        assert!(result.capabilities.code_action_provider.is_some());
        assert_eq!(provider.load_called.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn open_publishes_diagnostics_from_feature_layer() {
        let (server, client, provider) = test_server();
        start(&server, configured()).await;
        open(&server, "css").await;

        assert_eq!(provider.scan_called.load(Ordering::SeqCst), 1);
        let published = client.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, sample_uri());
        assert_eq!(published[0].1.len(), 1);
        assert_eq!(
            published[0].1[0].range,
            Range::new(Position::new(0, 0), Position::new(0, 7))
        );
    }

    #[tokio::test]
    async fn diagnostics_stay_empty_without_sources() {
        let (server, client, provider) = test_server();
        start(&server, None).await;
        open(&server, "scss").await;

        assert_eq!(provider.scan_called.load(Ordering::SeqCst), 0);
        let published = client.published();
        assert_eq!(published.len(), 1);
        assert!(published[0].1.is_empty());
    }

    #[tokio::test]
    async fn unsupported_languages_are_ignored() {
        let (server, client, _) = test_server();
        start(&server, configured()).await;
        open(&server, "rust").await;
        assert!(client.published().is_empty());
    }

    #[tokio::test]
    async fn change_rescans_latest_text() {
        let (server, _, provider) = test_server();
        start(&server, configured()).await;
        open(&server, "css").await;
        server
            .did_change(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier {
                    uri: sample_uri(),
                    version: 2,
                },
                content_changes: vec![TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text: ".b { color: red; }".into(),
                }],
            })
            .await;
        assert_eq!(provider.scan_called.load(Ordering::SeqCst), 2);
        assert_eq!(
            provider.last_scanned.lock().unwrap().as_deref(),
            Some(".b { color: red; }")
        );
    }

    #[tokio::test]
    async fn saving_a_declaration_file_reloads_the_index() {
        let (server, _, provider) = test_server();
        start(&server, configured()).await;
        server
            .did_save(DidSaveTextDocumentParams {
                text_document: TextDocumentIdentifier {
                    uri: Url::parse("file:///workspace/tokens.less").unwrap(),
                },
                text: None,
            })
            .await;
        assert_eq!(provider.load_called.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn save_with_auto_replace_applies_edits_then_rediagnoses() {
        let (server, client, provider) = test_server();
        start(
            &server,
            Some(json!({ "csstoken": { "variablesFiles": ["tokens.less"], "autoReplace": true } })),
        )
        .await;
        open(&server, "css").await;
        server
            .did_save(DidSaveTextDocumentParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
                text: Some("#ff0000 {}".into()),
            })
            .await;

        assert_eq!(provider.auto_replace_called.load(Ordering::SeqCst), 1);
        let edits = client.edits();
        assert_eq!(edits.len(), 1);
        let changes = edits[0].changes.as_ref().unwrap();
        assert_eq!(changes[&sample_uri()][0].new_text, "@red");
        assert_eq!(
            provider.last_scanned.lock().unwrap().as_deref(),
            Some("@red {}")
        );
        assert_eq!(client.published().len(), 2);
    }

    #[tokio::test]
    async fn code_action_passes_selection_bytes_and_settings() {
        let (server, _, provider) = test_server();
        start(&server, configured()).await;
        open(&server, "css").await;

        let response = server
            .code_action(CodeActionParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
                range: Range::new(Position::new(1, 9), Position::new(1, 16)),
                context: Default::default(),
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(response.len(), 1);
        let start = SAMPLE_STYLESHEET.find("#ff0000").unwrap();
        assert_eq!(
            provider.last_selection.lock().unwrap().clone(),
            Some(start..start + 7)
        );
        let options = provider.last_options.lock().unwrap().clone().unwrap();
        assert!(options.colors_enabled);
        assert_eq!(options.root_font_size, 16.0);
    }

    #[tokio::test]
    async fn code_action_without_document_is_none() {
        let (server, _, _) = test_server();
        start(&server, None).await;
        let response = server
            .code_action(CodeActionParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
                range: Range::default(),
                context: Default::default(),
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
            .unwrap();
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn search_command_lists_matching_tokens() {
        let (server, _, _) = test_server();
        start(&server, configured()).await;
        let value = server
            .execute_command(ExecuteCommandParams {
                command: COMMAND_SEARCH.into(),
                arguments: vec![json!("space")],
                work_done_progress_params: Default::default(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(value[0]["name"], "@space-md");
        assert_eq!(value.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn insert_command_applies_workspace_edit() {
        let (server, client, _) = test_server();
        start(&server, configured()).await;
        let value = server
            .execute_command(ExecuteCommandParams {
                command: COMMAND_INSERT.into(),
                arguments: vec![json!({
                    "uri": "file:///workspace/button.css",
                    "name": "@red",
                    "ranges": [{
                        "start": { "line": 1, "character": 9 },
                        "end": { "line": 1, "character": 16 }
                    }]
                })],
                work_done_progress_params: Default::default(),
            })
            .await
            .unwrap();
        assert_eq!(value, Some(Value::Bool(true)));
        assert_eq!(client.edits().len(), 1);
    }

    #[tokio::test]
    async fn unknown_command_is_an_error() {
        let (server, _, _) = test_server();
        let result = server
            .execute_command(ExecuteCommandParams {
                command: "csstoken.unknown".into(),
                arguments: Vec::new(),
                work_done_progress_params: Default::default(),
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn configuration_change_reloads_and_rediagnoses() {
        let (server, client, provider) = test_server();
        start(&server, None).await;
        open(&server, "css").await;
        server
            .did_change_configuration(DidChangeConfigurationParams {
                settings: json!({ "csstoken": { "variablesDirectory": "tokens" } }),
            })
            .await;

        assert_eq!(provider.load_called.load(Ordering::SeqCst), 2);
        let published = client.published();
        assert_eq!(published.len(), 2);
        assert!(published[0].1.is_empty());
        assert_eq!(published[1].1.len(), 1);
    }

    #[tokio::test]
    async fn close_clears_diagnostics() {
        let (server, client, _) = test_server();
        start(&server, configured()).await;
        open(&server, "css").await;
        server
            .did_close(DidCloseTextDocumentParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
            })
            .await;
        let published = client.published();
        assert_eq!(published.len(), 2);
        assert!(published[1].1.is_empty());
    }
}
