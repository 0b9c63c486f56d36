//! Command identifiers exposed to the editor.

/// User-invocable endpoints and their command identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Find,
    FindForLanguage,
    FindInplace,
    FindInNewEditor,
    FindSelectedText,
    ShowPreviousAnswer,
    ShowNextAnswer,
    ToggleComments,
}

impl Command {
    pub const ALL: [Self; 8] = [
        Self::Find,
        Self::FindForLanguage,
        Self::FindInplace,
        Self::FindInNewEditor,
        Self::FindSelectedText,
        Self::ShowPreviousAnswer,
        Self::ShowNextAnswer,
        Self::ToggleComments,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Find => "snippet.find",
            Self::FindForLanguage => "snippet.findForLanguage",
            Self::FindInplace => "snippet.findInplace",
            Self::FindInNewEditor => "snippet.findInNewEditor",
            Self::FindSelectedText => "snippet.findSelectedText",
            Self::ShowPreviousAnswer => "snippet.showPreviousAnswer",
            Self::ShowNextAnswer => "snippet.showNextAnswer",
            Self::ToggleComments => "snippet.toggleComments",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
