pub mod documents;
pub mod host;
pub mod progress;
pub mod protocol;
pub mod server;

mod test_utils;

// Re-export commonly used types
pub use protocol::{CommandArgs, ResolveSnippet, SetSnippetLanguage};
pub use server::Backend;
