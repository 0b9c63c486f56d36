//! Host trait implementations over an LSP client connection.

use crate::documents::DocumentStore;
use crate::protocol::{
    CommandArgs, ResolveSnippet, ResolveSnippetParams, SetSnippetLanguage,
    SetSnippetLanguageParams,
};
use async_trait::async_trait;
use snippet_core::{
    ActiveEditor, AnswerLocator, ContentResolver, NoticeLevel, Prompter, ResolvedDocument,
    SnippetConfig, SnippetError, SnippetTemplate, ViewOptions, Workbench,
};
use std::collections::HashMap;
use std::sync::Arc;
use tower_lsp_server::Client;
use tower_lsp_server::ls_types::{
    MessageActionItem, MessageType, ShowDocumentParams, TextEdit, Uri, WorkspaceEdit,
};

const PICK_LANGUAGE_MESSAGE: &str = "Select snippet language";

/// The editor host for one `workspace/executeCommand` invocation.
///
/// Prompt answers come from the command arguments and the open documents;
/// only the language picker round-trips to the client.
pub struct LspHost {
    client: Client,
    documents: Arc<DocumentStore>,
    args: CommandArgs,
    config: SnippetConfig,
}

impl LspHost {
    pub fn new(
        client: Client,
        documents: Arc<DocumentStore>,
        args: CommandArgs,
        config: SnippetConfig,
    ) -> Self {
        Self {
            client,
            documents,
            args,
            config,
        }
    }

    fn argument_language(&self) -> Option<String> {
        non_blank(self.args.language.as_deref())
    }

    fn editor_language(&self) -> Option<String> {
        let editor = self.args.editor.as_ref()?;
        non_blank(self.documents.language_id(&editor.uri).as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl Prompter for LspHost {
    async fn pick_language(&self) -> Option<String> {
        if let Some(language) = self.argument_language() {
            return Some(language);
        }

        let actions = self
            .config
            .languages
            .iter()
            .map(|title| MessageActionItem {
                title: title.clone(),
                properties: HashMap::new(),
            })
            .collect();

        match self
            .client
            .show_message_request(MessageType::INFO, PICK_LANGUAGE_MESSAGE, Some(actions))
            .await
        {
            Ok(choice) => choice.map(|item| item.title),
            Err(e) => {
                tracing::warn!("language picker failed: {:?}", e);
                None
            }
        }
    }

    async fn language(&self) -> Option<String> {
        if let Some(language) = self
            .argument_language()
            .or_else(|| self.config.default_language.clone())
            .or_else(|| self.editor_language())
        {
            return Some(language);
        }
        self.pick_language().await
    }

    async fn query(&self, _language: &str) -> Option<String> {
        self.args.query.clone()
    }
}

#[async_trait]
impl Workbench for LspHost {
    fn active_editor(&self) -> Option<ActiveEditor> {
        let editor = self.args.editor.as_ref()?;
        let selection_text = self
            .documents
            .text_in(&editor.uri, editor.selection)
            .unwrap_or_default();
        Some(ActiveEditor {
            uri: editor.uri.to_string(),
            selection_text,
        })
    }

    async fn set_document_language(
        &self,
        document: &ResolvedDocument,
        language: &str,
    ) -> snippet_core::Result<()> {
        self.client
            .send_notification::<SetSnippetLanguage>(SetSnippetLanguageParams {
                uri: document.uri.clone(),
                language_id: language.to_string(),
            })
            .await;
        Ok(())
    }

    async fn show_document(
        &self,
        document: &ResolvedDocument,
        options: ViewOptions,
    ) -> snippet_core::Result<()> {
        let uri = parse_uri(&document.uri)?;
        // ShowDocumentParams has no preview or column placement; only focus
        // is carried over from `options`.
        let shown = self
            .client
            .show_document(ShowDocumentParams {
                uri,
                external: Some(false),
                take_focus: Some(!options.preserve_focus),
                selection: None,
            })
            .await
            .map_err(|e| SnippetError::HostError(format!("window/showDocument: {e}")))?;

        if shown {
            Ok(())
        } else {
            Err(SnippetError::HostError(format!(
                "client could not show {}",
                document.uri
            )))
        }
    }

    async fn insert_snippet(&self, editor: &ActiveEditor, template: &SnippetTemplate) -> bool {
        let Some(args) = self.args.editor.as_ref() else {
            return false;
        };
        if args.uri.to_string() != editor.uri {
            tracing::warn!("insert target {} is not the active editor", editor.uri);
            return false;
        }

        let mut changes = HashMap::new();
        changes.insert(
            args.uri.clone(),
            vec![TextEdit {
                range: args.selection,
                new_text: template.text().to_string(),
            }],
        );
        let edit = WorkspaceEdit {
            changes: Some(changes),
            ..Default::default()
        };

        match self.client.apply_edit(edit).await {
            Ok(response) => {
                if !response.applied {
                    tracing::debug!("client refused edit: {:?}", response.failure_reason);
                }
                response.applied
            }
            Err(e) => {
                tracing::error!("failed to apply edit: {:?}", e);
                false
            }
        }
    }

    async fn notify(&self, level: NoticeLevel, message: &str) {
        let typ = match level {
            NoticeLevel::Info => MessageType::INFO,
            NoticeLevel::Error => MessageType::ERROR,
        };
        self.client.show_message(typ, message).await;
    }
}

fn parse_uri(uri: &str) -> snippet_core::Result<Uri> {
    uri.parse::<Uri>()
        .map_err(|_| SnippetError::InvalidLocator(uri.to_string()))
}

/// Resolves answers through the client's content provider.
pub struct ClientResolver {
    client: Client,
}

impl ClientResolver {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentResolver for ClientResolver {
    async fn resolve(&self, locator: &AnswerLocator) -> snippet_core::Result<String> {
        let uri = locator.to_uri();
        tracing::debug!("resolving {}", uri);

        self.client
            .send_request::<ResolveSnippet>(ResolveSnippetParams {
                uri: uri.clone(),
                locator: locator.clone(),
            })
            .await
            .map(|result| result.text)
            .map_err(|e| SnippetError::ResolveError {
                locator: uri,
                source: Box::new(e),
            })
    }
}
