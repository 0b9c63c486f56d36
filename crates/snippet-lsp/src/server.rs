use crate::documents::DocumentStore;
use crate::host::{ClientResolver, LspHost};
use crate::progress::LoadingProgress;
use crate::protocol::{CommandArgs, outcome_to_json};
use snippet_core::{Command, MemoryStore, Session, SnippetConfig};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tower_lsp_server::jsonrpc::{Error, Result};
use tower_lsp_server::ls_types::{
    DidChangeConfigurationParams, DidChangeTextDocumentParams, DidCloseTextDocumentParams,
    DidOpenTextDocumentParams, ExecuteCommandOptions, ExecuteCommandParams, InitializeParams,
    InitializeResult, InitializedParams, MessageType, ServerCapabilities, ServerInfo,
    TextDocumentSyncCapability, TextDocumentSyncKind,
};
use tower_lsp_server::{Client, LanguageServer};

/// Settings section read from `workspace/didChangeConfiguration`.
const CONFIG_SECTION: &str = "snippet";

pub struct Backend {
    pub(crate) client: Client,
    documents: Arc<DocumentStore>,
    session: OnceCell<Arc<Session>>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(DocumentStore::new()),
            session: OnceCell::new(),
        }
    }

    /// Session created during `initialize`, or a default one if the client
    /// skipped it.
    async fn session(&self) -> &Arc<Session> {
        self.session
            .get_or_init(|| self.open_session(SnippetConfig::default()))
            .await
    }

    async fn open_session(&self, config: SnippetConfig) -> Arc<Session> {
        let resolver = Arc::new(ClientResolver::new(self.client.clone()));
        let indicator = Arc::new(LoadingProgress::new(self.client.clone()));

        match Session::open(config.clone(), resolver.clone(), indicator.clone()).await {
            Ok(session) => Arc::new(session),
            Err(e) => {
                tracing::error!("failed to open answer cache, using memory: {}", e);
                Arc::new(Session::new(
                    config,
                    resolver,
                    Arc::new(MemoryStore::new()),
                    indicator,
                ))
            }
        }
    }

    fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: Command::ALL.iter().map(|c| c.id().to_string()).collect(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

/// Accepts both `{"snippet": {...}}` and a bare settings object.
fn parse_settings(settings: serde_json::Value) -> serde_json::Result<SnippetConfig> {
    let settings = match settings {
        serde_json::Value::Object(mut map) if map.contains_key(CONFIG_SECTION) => map
            .remove(CONFIG_SECTION)
            .unwrap_or(serde_json::Value::Null),
        other => other,
    };
    serde_json::from_value(settings)
}

impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        tracing::info!("initializing snippet-lsp server");

        let config = match params.initialization_options {
            Some(options) => parse_settings(options).unwrap_or_else(|e| {
                tracing::warn!("invalid initialization options, using defaults: {}", e);
                SnippetConfig::default()
            }),
            None => SnippetConfig::default(),
        };
        tracing::debug!("loaded configuration: {:?}", config);

        let session = self.open_session(config).await;
        if self.session.set(session).is_err() {
            tracing::warn!("initialize received twice, keeping the first session");
        }

        Ok(InitializeResult {
            capabilities: Self::server_capabilities(),
            server_info: Some(ServerInfo {
                name: "snippet-lsp".into(),
                version: Some(env!("CARGO_PKG_VERSION").into()),
            }),
            offset_encoding: None,
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        tracing::info!("snippet-lsp server initialized");
        self.client
            .log_message(MessageType::INFO, "snippet-lsp ready")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("shutting down snippet-lsp server");
        if let Some(session) = self.session.get()
            && let Err(e) = session.shutdown().await
        {
            tracing::error!("failed to flush answer cache: {}", e);
        }
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        tracing::debug!("document opened: {:?}", doc.uri);
        self.documents.open(doc.uri, doc.language_id, doc.text);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        if let Some(change) = params.content_changes.into_iter().last() {
            self.documents.change(&params.text_document.uri, change.text);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        tracing::debug!("document closed: {:?}", params.text_document.uri);
        self.documents.close(&params.text_document.uri);
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        match parse_settings(params.settings) {
            Ok(config) => self.session().await.update_config(config).await,
            Err(e) => {
                tracing::warn!("ignoring invalid configuration: {}", e);
            }
        }
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        tracing::info!("execute_command: {:?}", params.command);

        let Some(command) = Command::from_id(&params.command) else {
            return Err(Error::invalid_params(format!(
                "unknown command: {}",
                params.command
            )));
        };

        let args = match params.arguments.into_iter().next() {
            Some(serde_json::Value::Null) | None => CommandArgs::default(),
            Some(value) => serde_json::from_value::<CommandArgs>(value)
                .map_err(|e| Error::invalid_params(format!("invalid arguments: {e}")))?,
        };

        let session = self.session().await;
        let host = LspHost::new(
            self.client.clone(),
            Arc::clone(&self.documents),
            args,
            session.config().await,
        );

        match session.execute(command, &host).await {
            Ok(outcome) => Ok(Some(outcome_to_json(&outcome))),
            Err(e) => {
                tracing::error!("{} failed: {}", command, e);
                let mut error = Error::internal_error();
                error.message = e.to_string().into();
                Err(error)
            }
        }
    }
}
