//! Core abstractions for snippet-lsp.
//!
//! This crate holds everything that does not depend on a particular editor
//! protocol: answer navigation, display routing, the answer cache and the
//! traits the editor host implements.
//!
//! # Architecture
//!
//! snippet-core defines:
//! - **Data model**: [`QueryRequest`], [`AnswerLocator`], [`AnswerState`]
//! - **Host traits**: [`Prompter`], [`Workbench`], [`ContentResolver`], [`LoadingIndicator`]
//! - **Router**: [`DisplayRouter`] decides between a side view and a splice
//! - **Endpoints**: methods on [`Session`], one per [`Command`]
//! - **Cache**: [`KeyValueStore`] handles and the [`CachingResolver`]
//!
//! # Examples
//!
//! Running an endpoint against a custom host:
//!
//! ```no_run
//! use async_trait::async_trait;
//! use snippet_core::{
//!     ActiveEditor, AnswerLocator, Command, ContentResolver, LoadingIndicator, MemoryStore,
//!     NoticeLevel, Prompter, ResolvedDocument, Session, SnippetConfig, SnippetTemplate,
//!     ViewOptions, Workbench,
//! };
//! use std::sync::Arc;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl ContentResolver for Echo {
//!     async fn resolve(&self, locator: &AnswerLocator) -> snippet_core::Result<String> {
//!         Ok(format!("// {}", locator.query))
//!     }
//! }
//!
//! struct Quiet;
//!
//! impl LoadingIndicator for Quiet {
//!     fn show(&self) {}
//!     fn hide(&self) {}
//! }
//!
//! struct Terminal;
//!
//! #[async_trait]
//! impl Prompter for Terminal {
//!     async fn pick_language(&self) -> Option<String> { Some("rust".into()) }
//!     async fn language(&self) -> Option<String> { Some("rust".into()) }
//!     async fn query(&self, _language: &str) -> Option<String> { Some("read a file".into()) }
//! }
//!
//! #[async_trait]
//! impl Workbench for Terminal {
//!     fn active_editor(&self) -> Option<ActiveEditor> { None }
//!     async fn set_document_language(&self, _: &ResolvedDocument, _: &str) -> snippet_core::Result<()> { Ok(()) }
//!     async fn show_document(&self, doc: &ResolvedDocument, _: ViewOptions) -> snippet_core::Result<()> {
//!         println!("{}", doc.text);
//!         Ok(())
//!     }
//!     async fn insert_snippet(&self, _: &ActiveEditor, _: &SnippetTemplate) -> bool { false }
//!     async fn notify(&self, _: NoticeLevel, message: &str) { eprintln!("{message}") }
//! }
//!
//! # async fn example() -> snippet_core::Result<()> {
//! let session = Session::new(
//!     SnippetConfig::default(),
//!     Arc::new(Echo),
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(Quiet),
//! );
//! session.execute(Command::Find, &Terminal).await?;
//! session.execute(Command::ShowNextAnswer, &Terminal).await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod command;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod host;
pub mod loading;
pub mod locator;
pub mod router;
pub mod session;
pub mod state;

mod test_utils;

// Re-export commonly used types
pub use cache::{CachingResolver, FileStore, KeyValueStore, MemoryStore};
pub use command::Command;
pub use config::{CacheConfig, SnippetConfig};
pub use endpoints::{AT_FIRST_ANSWER_MESSAGE, NO_EDITOR_MESSAGE, Outcome};
pub use error::{Result, SnippetError};
pub use host::{
    ActiveEditor, ContentResolver, EditorHost, LoadingIndicator, NoticeLevel, Prompter,
    ResolvedDocument, SnippetTemplate, ViewOptions, Workbench,
};
pub use loading::{LoadingGuard, LoadingTracker};
pub use locator::{AnswerLocator, QueryRequest, SCHEME, is_snippet_uri};
pub use router::{DisplayRouter, INSERT_FAILED_MESSAGE, RouteRequest, Routed};
pub use session::Session;
pub use state::AnswerState;
