//! Which answer is currently displayed.

use crate::locator::AnswerLocator;

/// What the user is currently looking at.
///
/// One instance lives in each [`crate::Session`]. Paging operations only
/// compute the next locator; the state itself changes through
/// [`AnswerState::record`] once a document has actually been displayed, so
/// the stored query and answer index never drift from what is on screen.
///
/// # Examples
///
/// ```
/// use snippet_core::{AnswerLocator, AnswerState};
///
/// let mut state = AnswerState::new();
/// assert_eq!(state.current_query(), None);
///
/// state.record(&AnswerLocator::new("reverse a string", "python", false, 0));
/// assert_eq!(state.current_query(), Some("reverse a string"));
/// assert_eq!(state.next_answer_number(), 1);
/// assert_eq!(state.previous_answer_number(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerState {
    current_query: Option<String>,
    current_language: Option<String>,
    current_answer: Option<u32>,
    verbose: bool,
}

impl AnswerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current query, or `None` if nothing (or only an empty query) was shown.
    pub fn current_query(&self) -> Option<&str> {
        self.current_query.as_deref().filter(|q| !q.is_empty())
    }

    /// Language of the currently displayed answer.
    pub fn current_language(&self) -> Option<&str> {
        self.current_language.as_deref()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Flips the verbosity flag and returns the new value.
    pub fn toggle_verbose(&mut self) -> bool {
        self.verbose = !self.verbose;
        self.verbose
    }

    pub fn current_answer_number(&self) -> u32 {
        self.current_answer.unwrap_or(0)
    }

    pub fn next_answer_number(&self) -> u32 {
        self.current_answer.map_or(0, |n| n.saturating_add(1))
    }

    /// `None` means the first answer is already displayed.
    pub fn previous_answer_number(&self) -> Option<u32> {
        self.current_answer?.checked_sub(1)
    }

    /// Commits a displayed answer.
    ///
    /// Verbosity is left alone: it is a user preference changed only by
    /// [`AnswerState::toggle_verbose`].
    pub fn record(&mut self, locator: &AnswerLocator) {
        self.current_query = Some(locator.query.clone());
        self.current_language = Some(locator.language.clone());
        self.current_answer = Some(locator.answer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_empty() {
        let state = AnswerState::new();
        assert_eq!(state.current_query(), None);
        assert_eq!(state.current_language(), None);
        assert_eq!(state.current_answer_number(), 0);
        assert_eq!(state.previous_answer_number(), None);
        assert!(!state.verbose());
    }

    #[test]
    fn test_record_then_page() {
        let mut state = AnswerState::new();
        state.record(&AnswerLocator::new("sort", "rust", false, 0));
        assert_eq!(state.next_answer_number(), 1);

        state.record(&AnswerLocator::new("sort", "rust", false, 1));
        assert_eq!(state.current_answer_number(), 1);
        assert_eq!(state.previous_answer_number(), Some(0));
        assert_eq!(state.next_answer_number(), 2);
    }

    #[test]
    fn test_paging_does_not_mutate() {
        let mut state = AnswerState::new();
        state.record(&AnswerLocator::new("sort", "rust", false, 3));
        let before = state.clone();

        let _ = state.next_answer_number();
        let _ = state.previous_answer_number();
        assert_eq!(state, before);
    }

    #[test]
    fn test_empty_query_counts_as_no_query() {
        let mut state = AnswerState::new();
        state.record(&AnswerLocator::new("", "rust", false, 0));
        assert_eq!(state.current_query(), None);
        assert_eq!(state.current_language(), Some("rust"));
    }

    #[test]
    fn test_toggle_verbose_pairs_restore() {
        let mut state = AnswerState::new();
        assert!(state.toggle_verbose());
        assert!(!state.toggle_verbose());
        assert!(!state.verbose());
    }

    #[test]
    fn test_record_keeps_verbosity() {
        let mut state = AnswerState::new();
        state.toggle_verbose();
        state.record(&AnswerLocator::new("sort", "rust", false, 0));
        assert!(state.verbose());
    }

    #[test]
    fn test_next_answer_saturates() {
        let mut state = AnswerState::new();
        state.record(&AnswerLocator::new("q", "c", false, u32::MAX));
        assert_eq!(state.next_answer_number(), u32::MAX);
    }
}
