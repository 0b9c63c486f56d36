//! Query requests and answer locators.
//!
//! An [`AnswerLocator`] identifies one `(query, language, verbosity, answer)`
//! combination. Its URI form lives in the reserved [`SCHEME`] namespace, which
//! is also how the router recognizes an editor that already shows a result.
//!
//! # URI Layout
//!
//! ```text
//! snippet:/<language>/<query>?answer=<n>&verbose=<bool>
//! ```
//!
//! Language and query are percent-encoded, so the query may contain `/`,
//! `?` or be empty.

use crate::error::{Result, SnippetError};
use serde::{Deserialize, Serialize};

/// URI scheme reserved for documents produced by this server.
pub const SCHEME: &str = "snippet";

/// A language plus free-text query collected from the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryRequest {
    pub language: String,
    pub query: String,
}

impl QueryRequest {
    pub fn new(language: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            query: query.into(),
        }
    }
}

/// Identifies exactly one answer document.
///
/// Equal locators always resolve to the same document, which is what makes
/// caching by [`AnswerLocator::to_uri`] sound.
///
/// # Examples
///
/// ```
/// use snippet_core::AnswerLocator;
///
/// let locator = AnswerLocator::new("reverse a string", "python", false, 1);
/// let uri = locator.to_uri();
/// assert_eq!(uri, "snippet:/python/reverse%20a%20string?answer=1&verbose=false");
/// assert_eq!(AnswerLocator::from_uri(&uri).unwrap(), locator);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnswerLocator {
    pub query: String,
    pub language: String,
    pub verbose: bool,
    pub answer: u32,
}

impl AnswerLocator {
    pub fn new(
        query: impl Into<String>,
        language: impl Into<String>,
        verbose: bool,
        answer: u32,
    ) -> Self {
        Self {
            query: query.into(),
            language: language.into(),
            verbose,
            answer,
        }
    }

    /// Builds a locator for the first answer of a request.
    pub fn first(request: QueryRequest, verbose: bool) -> Self {
        Self::new(request.query, request.language, verbose, 0)
    }

    /// Encodes the locator as a `snippet:` URI.
    pub fn to_uri(&self) -> String {
        format!(
            "{SCHEME}:/{}/{}?answer={}&verbose={}",
            urlencoding::encode(&self.language),
            urlencoding::encode(&self.query),
            self.answer,
            self.verbose
        )
    }

    /// Decodes a `snippet:` URI produced by [`AnswerLocator::to_uri`].
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::InvalidLocator`] when the scheme is wrong, the
    /// language is empty, or the answer/verbosity parameters are malformed.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let invalid = |reason: &str| SnippetError::InvalidLocator(format!("{uri}: {reason}"));

        let rest = uri
            .strip_prefix(SCHEME)
            .and_then(|r| r.strip_prefix(':'))
            .ok_or_else(|| invalid("not a snippet URI"))?;
        let rest = rest.strip_prefix('/').unwrap_or(rest);

        let (path, params) = rest.split_once('?').unwrap_or((rest, ""));
        let (language, query) = path
            .split_once('/')
            .ok_or_else(|| invalid("missing query segment"))?;

        let language = decode(language).ok_or_else(|| invalid("language is not UTF-8"))?;
        if language.is_empty() {
            return Err(invalid("empty language"));
        }
        let query = decode(query).ok_or_else(|| invalid("query is not UTF-8"))?;

        let mut answer = 0;
        let mut verbose = false;
        for pair in params.split('&').filter(|p| !p.is_empty()) {
            match pair.split_once('=') {
                Some(("answer", value)) => {
                    answer = value.parse().map_err(|_| invalid("bad answer number"))?;
                }
                Some(("verbose", value)) => {
                    verbose = value.parse().map_err(|_| invalid("bad verbose flag"))?;
                }
                _ => tracing::debug!("ignoring locator parameter {:?}", pair),
            }
        }

        Ok(Self {
            query,
            language,
            verbose,
            answer,
        })
    }
}

fn decode(segment: &str) -> Option<String> {
    urlencoding::decode(segment).ok().map(|s| s.into_owned())
}

/// Returns true if `uri` belongs to the snippet document namespace.
pub fn is_snippet_uri(uri: &str) -> bool {
    uri.split_once(':')
        .is_some_and(|(scheme, _)| scheme.eq_ignore_ascii_case(SCHEME))
}
