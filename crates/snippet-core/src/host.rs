//! Boundary traits implemented by the editor host.
//!
//! The core never talks to an editor directly. Prompts, the active editor,
//! document display, content resolution and the loading indicator are all
//! reached through the traits below, so the same routing and paging logic
//! runs against the LSP adapter and against the recording fakes used in
//! tests.

use crate::error::Result;
use crate::locator::AnswerLocator;
use async_trait::async_trait;

/// Interactive prompts. `None` means the user dismissed the prompt.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Lets the user pick a language from a list.
    async fn pick_language(&self) -> Option<String>;

    /// Returns the language for the current context, prompting if needed.
    async fn language(&self) -> Option<String>;

    /// Asks for the free-text query.
    async fn query(&self, language: &str) -> Option<String>;
}

/// The editor the user is currently typing in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEditor {
    pub uri: String,
    /// Selected text, empty when the selection is collapsed.
    pub selection_text: String,
}

/// A resolved answer ready to be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDocument {
    pub uri: String,
    pub text: String,
    /// Set once the host accepted the language tag.
    pub language: Option<String>,
}

/// How a side view is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    /// Replaceable by the next preview instead of pinned.
    pub preview: bool,
    /// Keep input focus in the editor the user was typing in.
    pub preserve_focus: bool,
    /// Open next to the current column.
    pub beside: bool,
}

impl ViewOptions {
    /// Non-destructive preview next to the current editor.
    pub const SIDE_PREVIEW: Self = Self {
        preview: true,
        preserve_focus: true,
        beside: true,
    };
}

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Document text to be inserted at the cursor verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetTemplate {
    text: String,
}

impl SnippetTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Display surface of the editor host.
#[async_trait]
pub trait Workbench: Send + Sync {
    fn active_editor(&self) -> Option<ActiveEditor>;

    /// Tags a document for syntax highlighting.
    async fn set_document_language(&self, document: &ResolvedDocument, language: &str)
    -> Result<()>;

    async fn show_document(&self, document: &ResolvedDocument, options: ViewOptions) -> Result<()>;

    /// Returns `false` when the host refused the insertion.
    async fn insert_snippet(&self, editor: &ActiveEditor, template: &SnippetTemplate) -> bool;

    async fn notify(&self, level: NoticeLevel, message: &str);
}

/// Everything an endpoint needs from the host for one invocation.
pub trait EditorHost: Prompter + Workbench {}

impl<T: Prompter + Workbench + ?Sized> EditorHost for T {}

/// Produces the document text for a locator.
///
/// Equal locators must produce equal content.
#[async_trait]
pub trait ContentResolver: Send + Sync {
    async fn resolve(&self, locator: &AnswerLocator) -> Result<String>;
}

/// Global busy indicator (status bar item, progress notification, ...).
pub trait LoadingIndicator: Send + Sync {
    fn show(&self);
    fn hide(&self);
}
