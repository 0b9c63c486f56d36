//! Custom protocol extensions and command arguments.
//!
//! The server does not fetch answers itself. Content for a `snippet:` URI is
//! requested from the client with [`ResolveSnippet`], and the language of a
//! displayed answer is announced with [`SetSnippetLanguage`].

use serde::{Deserialize, Serialize};
use snippet_core::{AnswerLocator, Outcome, Routed};
use tower_lsp_server::ls_types::notification::Notification;
use tower_lsp_server::ls_types::request::Request;
use tower_lsp_server::ls_types::{Range, Uri};

/// `snippet/resolve`: server → client request for answer text.
pub enum ResolveSnippet {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveSnippetParams {
    pub uri: String,
    #[serde(flatten)]
    pub locator: AnswerLocator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveSnippetResult {
    pub text: String,
}

impl Request for ResolveSnippet {
    type Params = ResolveSnippetParams;
    type Result = ResolveSnippetResult;
    const METHOD: &'static str = "snippet/resolve";
}

/// `snippet/setLanguage`: tags a displayed answer for highlighting.
pub enum SetSnippetLanguage {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSnippetLanguageParams {
    pub uri: String,
    pub language_id: String,
}

impl Notification for SetSnippetLanguage {
    type Params = SetSnippetLanguageParams;
    const METHOD: &'static str = "snippet/setLanguage";
}

/// Optional first argument of every `snippet.*` command.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandArgs {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    /// The editor that had focus when the command was triggered.
    #[serde(default)]
    pub editor: Option<EditorArgs>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditorArgs {
    pub uri: Uri,
    /// Collapsed ranges mark the cursor.
    #[serde(default)]
    pub selection: Range,
}

/// JSON result of `workspace/executeCommand`.
pub fn outcome_to_json(outcome: &Outcome) -> serde_json::Value {
    match outcome {
        Outcome::Routed { locator, routed } => {
            let status = match routed {
                Routed::SideView => "sideView",
                Routed::Spliced => "spliced",
                Routed::InsertFailed => "insertFailed",
            };
            serde_json::json!({
                "status": status,
                "uri": locator.to_uri(),
                "answer": locator.answer,
                "verbose": locator.verbose,
            })
        }
        Outcome::Cancelled => serde_json::json!({ "status": "cancelled" }),
        Outcome::AtFirstAnswer => serde_json::json!({ "status": "atFirstAnswer" }),
        Outcome::NoActiveEditor => serde_json::json!({ "status": "noActiveEditor" }),
    }
}
