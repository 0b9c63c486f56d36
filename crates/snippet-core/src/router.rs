//! Display routing for resolved answers.
//!
//! [`DisplayRouter::route`] resolves one locator and decides where the
//! document goes:
//!
//! - a side view (preview, focus preserved) when a new view is forced, no
//!   editor is active, or the active editor already shows a snippet result;
//! - otherwise the active editor, as a snippet template at the cursor.
//!
//! The returned [`Routed`] tells the caller whether anything was displayed,
//! which is the only signal it may use to update answer state.

use crate::error::{Result, SnippetError};
use crate::host::{
    ContentResolver, NoticeLevel, ResolvedDocument, SnippetTemplate, ViewOptions, Workbench,
};
use crate::loading::LoadingTracker;
use crate::locator::{AnswerLocator, is_snippet_uri};
use std::sync::Arc;
use std::time::Duration;

/// Notice shown when the host refuses to splice a snippet.
pub const INSERT_FAILED_MESSAGE: &str = "Error while opening snippet.";

/// One routing job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub locator: AnswerLocator,
    pub force_new_view: bool,
    /// `None` waits for the resolver indefinitely.
    pub timeout: Option<Duration>,
}

/// Where a resolved document ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    SideView,
    Spliced,
    /// The host refused the insertion; a notice was shown.
    InsertFailed,
}

impl Routed {
    pub fn is_displayed(self) -> bool {
        matches!(self, Self::SideView | Self::Spliced)
    }
}

pub struct DisplayRouter {
    resolver: Arc<dyn ContentResolver>,
    loading: LoadingTracker,
}

impl DisplayRouter {
    pub fn new(resolver: Arc<dyn ContentResolver>, loading: LoadingTracker) -> Self {
        Self { resolver, loading }
    }

    /// Resolves and displays one answer.
    ///
    /// # Errors
    ///
    /// Resolution failures, timeouts and host failures while opening a side
    /// view are returned unchanged. A failed language tag is logged and
    /// ignored; a refused insertion yields [`Routed::InsertFailed`].
    pub async fn route<W>(&self, workbench: &W, request: &RouteRequest) -> Result<Routed>
    where
        W: Workbench + ?Sized,
    {
        let locator = &request.locator;
        let uri = locator.to_uri();

        let text = self.resolve(&uri, request).await?;
        let mut document = ResolvedDocument {
            uri,
            text,
            language: None,
        };

        match workbench
            .set_document_language(&document, &locator.language)
            .await
        {
            Ok(()) => document.language = Some(locator.language.clone()),
            Err(e) => {
                tracing::warn!(
                    "cannot set document language to {}: {}",
                    locator.language,
                    e
                );
            }
        }

        let target = workbench
            .active_editor()
            .filter(|editor| !request.force_new_view && !is_snippet_uri(&editor.uri));

        let Some(editor) = target else {
            tracing::debug!("opening {} in side view", document.uri);
            workbench
                .show_document(&document, ViewOptions::SIDE_PREVIEW)
                .await?;
            return Ok(Routed::SideView);
        };

        tracing::debug!("splicing {} into {}", document.uri, editor.uri);
        let template = SnippetTemplate::new(document.text);
        if workbench.insert_snippet(&editor, &template).await {
            Ok(Routed::Spliced)
        } else {
            tracing::warn!("host refused snippet insertion into {}", editor.uri);
            workbench
                .notify(NoticeLevel::Info, INSERT_FAILED_MESSAGE)
                .await;
            Ok(Routed::InsertFailed)
        }
    }

    async fn resolve(&self, uri: &str, request: &RouteRequest) -> Result<String> {
        let _loading = self.loading.begin();
        let pending = self.resolver.resolve(&request.locator);

        let resolved = match request.timeout {
            Some(limit) => tokio::time::timeout(limit, pending).await.map_err(|_| {
                SnippetError::Timeout {
                    locator: uri.to_string(),
                    seconds: limit.as_secs(),
                }
            })?,
            None => pending.await,
        };

        if let Err(e) = &resolved {
            tracing::error!("failed to resolve {}: {}", uri, e);
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ActiveEditor;
    use crate::test_utils::test_helpers::{FakeHost, FakeResolver, HostEvent, RecordingIndicator};

    fn router(resolver: Arc<FakeResolver>) -> (DisplayRouter, Arc<RecordingIndicator>) {
        let indicator = Arc::new(RecordingIndicator::default());
        let loading = LoadingTracker::new(indicator.clone());
        (DisplayRouter::new(resolver, loading), indicator)
    }

    fn request(force_new_view: bool) -> RouteRequest {
        RouteRequest {
            locator: AnswerLocator::new("reverse a string", "python", false, 0),
            force_new_view,
            timeout: None,
        }
    }

    fn user_editor() -> ActiveEditor {
        ActiveEditor {
            uri: "file:///project/main.py".into(),
            selection_text: String::new(),
        }
    }

    #[tokio::test]
    async fn test_no_active_editor_opens_side_view() {
        let (router, indicator) = router(Arc::new(FakeResolver::default()));
        let host = FakeHost::new();

        let routed = router.route(&host, &request(false)).await.unwrap();

        assert_eq!(routed, Routed::SideView);
        let shown = host.shown_documents();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].0.text, "python|reverse a string|0|false");
        assert_eq!(shown[0].1, ViewOptions::SIDE_PREVIEW);
        assert_eq!(indicator.show_count(), 1);
        assert!(!indicator.is_visible());
    }

    #[tokio::test]
    async fn test_active_editor_receives_splice() {
        let (router, _) = router(Arc::new(FakeResolver::default()));
        let host = FakeHost::new().with_editor(user_editor());

        let routed = router.route(&host, &request(false)).await.unwrap();

        assert_eq!(routed, Routed::Spliced);
        assert!(host.shown_documents().is_empty());
        let inserted = host.inserted();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].0.uri, "file:///project/main.py");
        assert_eq!(inserted[0].1.text(), "python|reverse a string|0|false");
    }

    #[tokio::test]
    async fn test_force_new_view_overrides_active_editor() {
        let (router, _) = router(Arc::new(FakeResolver::default()));
        let host = FakeHost::new().with_editor(user_editor());

        let routed = router.route(&host, &request(true)).await.unwrap();

        assert_eq!(routed, Routed::SideView);
        assert!(host.inserted().is_empty());
    }

    #[tokio::test]
    async fn test_snippet_editor_is_never_spliced() {
        let (router, _) = router(Arc::new(FakeResolver::default()));
        let host = FakeHost::new().with_editor(ActiveEditor {
            uri: "snippet:/python/other?answer=0&verbose=false".into(),
            selection_text: String::new(),
        });

        let routed = router.route(&host, &request(false)).await.unwrap();

        assert_eq!(routed, Routed::SideView);
        assert!(host.inserted().is_empty());
    }

    #[tokio::test]
    async fn test_refused_insert_shows_notice() {
        let (router, _) = router(Arc::new(FakeResolver::default()));
        let host = FakeHost::new()
            .with_editor(user_editor())
            .refusing_inserts();

        let routed = router.route(&host, &request(false)).await.unwrap();

        assert_eq!(routed, Routed::InsertFailed);
        assert!(!routed.is_displayed());
        assert_eq!(
            host.notices(),
            vec![(NoticeLevel::Info, INSERT_FAILED_MESSAGE.to_string())]
        );
    }

    #[tokio::test]
    async fn test_language_tag_failure_is_cosmetic() {
        let (router, _) = router(Arc::new(FakeResolver::default()));
        let host = FakeHost::new().failing_language_tag();

        let routed = router.route(&host, &request(false)).await.unwrap();

        assert_eq!(routed, Routed::SideView);
        assert_eq!(host.shown_documents()[0].0.language, None);
        assert!(host.notices().is_empty());
    }

    #[tokio::test]
    async fn test_language_tag_recorded_on_document() {
        let (router, _) = router(Arc::new(FakeResolver::default()));
        let host = FakeHost::new();

        router.route(&host, &request(false)).await.unwrap();

        assert!(host.events().contains(&HostEvent::LanguageTagged("python".into())));
        assert_eq!(
            host.shown_documents()[0].0.language.as_deref(),
            Some("python")
        );
    }

    #[tokio::test]
    async fn test_resolver_failure_propagates_and_hides_indicator() {
        let (router, indicator) = router(Arc::new(FakeResolver::failing()));
        let host = FakeHost::new();

        let err = router.route(&host, &request(false)).await.unwrap_err();

        assert!(matches!(err, SnippetError::ResolveError { .. }));
        assert!(!indicator.is_visible());
        assert_eq!(indicator.hide_count(), 1);
        assert!(host.shown_documents().is_empty());
    }

    #[tokio::test]
    async fn test_identical_requests_resolve_identically() {
        let (router, _) = router(Arc::new(FakeResolver::default()));
        let host = FakeHost::new();

        router.route(&host, &request(false)).await.unwrap();
        router.route(&host, &request(false)).await.unwrap();

        let shown = host.shown_documents();
        assert_eq!(shown[0].0, shown[1].0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_resolution_times_out() {
        let (router, indicator) = router(Arc::new(FakeResolver::hanging()));
        let host = FakeHost::new();
        let mut req = request(false);
        req.timeout = Some(Duration::from_secs(5));

        let err = router.route(&host, &req).await.unwrap_err();

        assert!(matches!(err, SnippetError::Timeout { seconds: 5, .. }));
        assert!(!indicator.is_visible());
    }
}
