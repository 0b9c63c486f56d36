//! Text of the documents the client has open.

use dashmap::DashMap;
use tower_lsp_server::ls_types::{Position, Range, Uri};

/// A text document the client currently has open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDocument {
    pub language_id: String,
    pub text: String,
}

/// Open documents by URI.
///
/// Used to read the selected text and the language of the editor a command
/// was triggered from.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<Uri, OpenDocument>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, uri: Uri, language_id: String, text: String) {
        self.documents
            .insert(uri, OpenDocument { language_id, text });
    }

    /// Replaces the full text of an open document.
    pub fn change(&self, uri: &Uri, text: String) {
        if let Some(mut doc) = self.documents.get_mut(uri) {
            doc.text = text;
        } else {
            tracing::debug!("change for unknown document: {:?}", uri);
        }
    }

    pub fn close(&self, uri: &Uri) {
        self.documents.remove(uri);
    }

    pub fn language_id(&self, uri: &Uri) -> Option<String> {
        self.documents.get(uri).map(|doc| doc.language_id.clone())
    }

    /// Text covered by `range`, or `None` if the document is not open.
    pub fn text_in(&self, uri: &Uri, range: Range) -> Option<String> {
        let doc = self.documents.get(uri)?;
        let start = offset_at(&doc.text, range.start);
        let end = offset_at(&doc.text, range.end);
        let (start, end) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        Some(doc.text[start..end].to_string())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Byte offset of an LSP position (UTF-16 columns), clamped to the text.
fn offset_at(text: &str, position: Position) -> usize {
    let mut line_start = 0;
    for _ in 0..position.line {
        match text[line_start..].find('\n') {
            Some(i) => line_start += i + 1,
            None => return text.len(),
        }
    }

    let line_end = text[line_start..]
        .find('\n')
        .map_or(text.len(), |i| line_start + i);
    let line = &text[line_start..line_end];

    let mut units = 0;
    for (i, c) in line.char_indices() {
        if units >= position.character as usize {
            return line_start + i;
        }
        units += c.len_utf16();
    }
    line_end
}
