//! Command endpoints.
//!
//! Each endpoint collects a query (from prompts, the selection, or the
//! current answer state), routes it through the [`DisplayRouter`], and
//! records the answer in [`AnswerState`] only when something was displayed.
//!
//! [`DisplayRouter`]: crate::router::DisplayRouter

use crate::command::Command;
use crate::error::Result;
use crate::host::{EditorHost, NoticeLevel};
use crate::locator::{AnswerLocator, QueryRequest};
use crate::router::{RouteRequest, Routed};
use crate::session::Session;
use crate::state::AnswerState;

pub const AT_FIRST_ANSWER_MESSAGE: &str = "already at first snippet";
pub const NO_EDITOR_MESSAGE: &str = "There is no open editor window";

/// Result of one endpoint invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A locator was resolved and routed.
    Routed {
        locator: AnswerLocator,
        routed: Routed,
    },
    /// A prompt was dismissed.
    Cancelled,
    /// Paging back from the first answer.
    AtFirstAnswer,
    /// `findSelectedText` without an active editor.
    NoActiveEditor,
}

impl Outcome {
    /// True if an answer is now on screen.
    pub fn is_displayed(&self) -> bool {
        matches!(self, Self::Routed { routed, .. } if routed.is_displayed())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LanguagePrompt {
    /// Context language, prompting only if unknown.
    Current,
    /// Explicit pick from the configured list.
    Pick,
}

impl Session {
    /// Runs the endpoint behind `command`.
    pub async fn execute(&self, command: Command, host: &dyn EditorHost) -> Result<Outcome> {
        tracing::info!("executing {}", command);
        match command {
            Command::Find => self.find_default(host).await,
            Command::FindForLanguage => self.find_for_language(host).await,
            Command::FindInplace => self.find_inplace(host).await,
            Command::FindInNewEditor => self.find_in_new_editor(host).await,
            Command::FindSelectedText => self.find_selected_text(host).await,
            Command::ShowPreviousAnswer => self.show_previous_answer(host).await,
            Command::ShowNextAnswer => self.show_next_answer(host).await,
            Command::ToggleComments => self.toggle_comments(host).await,
        }
    }

    pub async fn find_default(&self, host: &dyn EditorHost) -> Result<Outcome> {
        let mut state = self.state.lock().await;
        let force_new_view = self.open_in_new_editor().await;
        let verbose = state.verbose();
        self.find(&mut state, host, LanguagePrompt::Current, verbose, force_new_view)
            .await
    }

    pub async fn find_for_language(&self, host: &dyn EditorHost) -> Result<Outcome> {
        let mut state = self.state.lock().await;
        let force_new_view = self.open_in_new_editor().await;
        let verbose = state.verbose();
        self.find(&mut state, host, LanguagePrompt::Pick, verbose, force_new_view)
            .await
    }

    /// Always splices into the active editor when there is one.
    pub async fn find_inplace(&self, host: &dyn EditorHost) -> Result<Outcome> {
        let mut state = self.state.lock().await;
        let verbose = state.verbose();
        self.find(&mut state, host, LanguagePrompt::Current, verbose, false)
            .await
    }

    /// Always opens a side view.
    pub async fn find_in_new_editor(&self, host: &dyn EditorHost) -> Result<Outcome> {
        let mut state = self.state.lock().await;
        let verbose = state.verbose();
        self.find(&mut state, host, LanguagePrompt::Current, verbose, true)
            .await
    }

    pub async fn find_selected_text(&self, host: &dyn EditorHost) -> Result<Outcome> {
        let mut state = self.state.lock().await;

        let Some(editor) = host.active_editor() else {
            host.notify(NoticeLevel::Error, NO_EDITOR_MESSAGE).await;
            return Ok(Outcome::NoActiveEditor);
        };
        let Some(language) = prompt_language(host, LanguagePrompt::Current).await else {
            return Ok(Outcome::Cancelled);
        };

        let force_new_view = self.open_in_new_editor().await;
        let request = QueryRequest::new(language, editor.selection_text);
        let locator = AnswerLocator::first(request, state.verbose());
        self.display(&mut state, host, locator, force_new_view).await
    }

    /// Pages forward, or behaves like [`Session::find_default`] without a query.
    pub async fn show_next_answer(&self, host: &dyn EditorHost) -> Result<Outcome> {
        let mut state = self.state.lock().await;
        let force_new_view = self.open_in_new_editor().await;
        let verbose = state.verbose();

        let Some((query, language)) = current_request(&state, host).await else {
            return self
                .find(&mut state, host, LanguagePrompt::Current, verbose, force_new_view)
                .await;
        };

        let locator = AnswerLocator::new(query, language, verbose, state.next_answer_number());
        self.display(&mut state, host, locator, force_new_view).await
    }

    /// Pages back; at the first answer only a notice is shown.
    pub async fn show_previous_answer(&self, host: &dyn EditorHost) -> Result<Outcome> {
        let mut state = self.state.lock().await;
        let force_new_view = self.open_in_new_editor().await;
        let verbose = state.verbose();

        if state.current_query().is_none() {
            return self
                .find(&mut state, host, LanguagePrompt::Current, verbose, force_new_view)
                .await;
        }

        let Some(answer) = state.previous_answer_number() else {
            host.notify(NoticeLevel::Info, AT_FIRST_ANSWER_MESSAGE).await;
            return Ok(Outcome::AtFirstAnswer);
        };
        let Some((query, language)) = current_request(&state, host).await else {
            return Ok(Outcome::Cancelled);
        };

        let locator = AnswerLocator::new(query, language, verbose, answer);
        self.display(&mut state, host, locator, force_new_view).await
    }

    /// Flips verbosity and re-displays the current answer with it.
    ///
    /// Without a current query this starts a fresh default search with the
    /// flipped verbosity. The flag is committed only once an answer shows.
    pub async fn toggle_comments(&self, host: &dyn EditorHost) -> Result<Outcome> {
        let mut state = self.state.lock().await;
        let force_new_view = self.open_in_new_editor().await;
        let verbose = !state.verbose();

        let outcome = match current_request(&state, host).await {
            Some((query, language)) => {
                let answer = state.current_answer_number();
                let locator = AnswerLocator::new(query, language, verbose, answer);
                self.display(&mut state, host, locator, force_new_view)
                    .await?
            }
            None => {
                self.find(&mut state, host, LanguagePrompt::Current, verbose, force_new_view)
                    .await?
            }
        };

        if outcome.is_displayed() {
            state.toggle_verbose();
        }
        Ok(outcome)
    }

    async fn find(
        &self,
        state: &mut AnswerState,
        host: &dyn EditorHost,
        prompt: LanguagePrompt,
        verbose: bool,
        force_new_view: bool,
    ) -> Result<Outcome> {
        let Some(language) = prompt_language(host, prompt).await else {
            tracing::debug!("language prompt dismissed");
            return Ok(Outcome::Cancelled);
        };
        let Some(query) = host.query(&language).await else {
            tracing::debug!("query prompt dismissed");
            return Ok(Outcome::Cancelled);
        };

        let locator = AnswerLocator::first(QueryRequest::new(language, query), verbose);
        self.display(state, host, locator, force_new_view).await
    }

    async fn display(
        &self,
        state: &mut AnswerState,
        host: &dyn EditorHost,
        locator: AnswerLocator,
        force_new_view: bool,
    ) -> Result<Outcome> {
        let request = RouteRequest {
            locator,
            force_new_view,
            timeout: self.config.read().await.resolve_timeout(),
        };

        let routed = self.router.route(host, &request).await?;
        if routed.is_displayed() {
            state.record(&request.locator);
        }

        Ok(Outcome::Routed {
            locator: request.locator,
            routed,
        })
    }

    async fn open_in_new_editor(&self) -> bool {
        self.config.read().await.open_in_new_editor
    }
}

async fn prompt_language(host: &dyn EditorHost, prompt: LanguagePrompt) -> Option<String> {
    let language = match prompt {
        LanguagePrompt::Current => host.language().await,
        LanguagePrompt::Pick => host.pick_language().await,
    }?;
    let language = language.trim();
    (!language.is_empty()).then(|| language.to_string())
}

/// Query and language of the displayed answer, if there is one.
async fn current_request(state: &AnswerState, host: &dyn EditorHost) -> Option<(String, String)> {
    let query = state.current_query()?.to_string();
    let language = match state.current_language() {
        Some(language) => language.to_string(),
        None => prompt_language(host, LanguagePrompt::Current).await?,
    };
    Some((query, language))
}
