//! Client-supplied settings.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration for the snippet server.
///
/// Provided by the client via initialization options or
/// `workspace/didChangeConfiguration`. All fields fall back to defaults.
///
/// # Examples
///
/// ```
/// use snippet_core::config::SnippetConfig;
///
/// let json = r#"{
///     "open_in_new_editor": false,
///     "default_language": "python"
/// }"#;
///
/// let config: SnippetConfig = serde_json::from_str(json).unwrap();
/// assert!(!config.open_in_new_editor);
/// assert_eq!(config.default_language.as_deref(), Some("python"));
/// assert_eq!(config.resolve_timeout_secs, 30);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SnippetConfig {
    /// Default destination for endpoints that do not force one.
    #[serde(default = "default_true", alias = "openInNewEditor")]
    pub open_in_new_editor: bool,

    /// Language used without prompting, if set.
    #[serde(default, deserialize_with = "deserialize_language")]
    pub default_language: Option<String>,

    /// Choices offered by the language picker.
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Upper bound for one resolution; `0` waits forever.
    #[serde(default = "default_resolve_timeout")]
    pub resolve_timeout_secs: u64,

    #[serde(default)]
    pub cache: CacheConfig,
}

impl SnippetConfig {
    pub fn resolve_timeout(&self) -> Option<Duration> {
        (self.resolve_timeout_secs > 0).then(|| Duration::from_secs(self.resolve_timeout_secs))
    }
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            open_in_new_editor: true,
            default_language: None,
            languages: default_languages(),
            resolve_timeout_secs: default_resolve_timeout(),
            cache: CacheConfig::default(),
        }
    }
}

/// Configuration for the answer cache.
///
/// # Defaults
///
/// - `enabled`: `true`
/// - `path`: `None` (answers are kept in memory for the session only)
///
/// Read once when the session is created; later changes are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_resolve_timeout() -> u64 {
    30
}

const DEFAULT_LANGUAGES: &[&str] = &[
    "bash",
    "c",
    "cpp",
    "csharp",
    "go",
    "java",
    "javascript",
    "kotlin",
    "php",
    "python",
    "ruby",
    "rust",
    "scala",
    "swift",
    "typescript",
];

fn default_languages() -> Vec<String> {
    DEFAULT_LANGUAGES.iter().map(|l| (*l).to_string()).collect()
}

/// Treats a blank default language as unset.
fn deserialize_language<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let language = Option::<String>::deserialize(deserializer)?;
    Ok(language
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty()))
}
