//! Debounced user search.
//!
//! [`SearchDebouncer`] is the bare state machine; it never reads a clock and
//! is driven with explicit instants. [`SearchBox`] wraps it with a tokio timer
//! and a [`UserSearch`] backend.
//!
//! ```text
//!   keystroke (len < 2)          keystroke (len >= 2)
//!  Idle <------------------ * ------------------> Pending(deadline)
//!   ^                                                  | deadline passes
//!   | dismiss / select / len < 2                       v
//!  ResultsShown <------------------------------- request fired
//! ```

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::time::{self, Instant};

use crate::{
    error::{Error, Result},
    models::UserSummary,
};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const MIN_QUERY_LEN: usize = 2;

#[async_trait]
pub trait UserSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<UserSummary>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Pending { deadline: Instant },
    ResultsShown,
}

#[derive(Debug, Default)]
pub struct SearchDebouncer {
    query: String,
    deadline: Option<Instant>,
    results: Vec<UserSummary>,
    shown: bool,
    /// Query sent to the backend whose answer has not been applied yet
    in_flight: Option<String>,
}

impl SearchDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> SearchPhase {
        match (self.deadline, self.is_visible()) {
            (Some(deadline), _) => SearchPhase::Pending { deadline },
            (None, true) => SearchPhase::ResultsShown,
            (None, false) => SearchPhase::Idle,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Results as they would be displayed; empty when hidden
    pub fn visible_results(&self) -> &[UserSummary] {
        if self.is_visible() {
            &self.results
        } else {
            &[]
        }
    }

    fn is_visible(&self) -> bool {
        self.shown && !self.results.is_empty()
    }

    /// A keystroke. Replaces any pending timer.
    pub fn input(&mut self, query: impl Into<String>, now: Instant) {
        self.query = query.into();
        self.deadline = None;
        if self.query.chars().count() >= MIN_QUERY_LEN {
            self.deadline = Some(now + SEARCH_DEBOUNCE);
        } else {
            self.shown = false;
        }
    }

    /// Hands out the query to send once its timer has run out
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.in_flight = Some(self.query.clone());
                Some(self.query.clone())
            }
            _ => None,
        }
    }

    /// Applies the answer for `query`. Answers for anything other than the
    /// latest fired query, or fired before the input changed again, are dropped.
    pub fn complete(&mut self, query: &str, results: Vec<UserSummary>) -> bool {
        if self.in_flight.as_deref() != Some(query) {
            debug!("Dropping results for stale query {:?}", query);
            return false;
        }
        self.in_flight = None;
        if self.query != query {
            debug!("Dropping results for {:?}, input is now {:?}", query, self.query);
            return false;
        }
        self.results = results;
        self.shown = true;
        true
    }

    /// The request for `query` failed; nothing is shown
    pub fn fail(&mut self, query: &str) {
        if self.in_flight.as_deref() == Some(query) {
            self.in_flight = None;
        }
    }

    /// A click landed outside the search region
    pub fn dismiss(&mut self) {
        self.shown = false;
    }

    /// Re-shows the previous list when the input regains focus
    pub fn focus(&mut self) {
        if !self.results.is_empty() {
            self.shown = true;
        }
    }

    /// Picks a visible result; hides the list and clears the query
    pub fn select(&mut self, index: usize) -> Option<UserSummary> {
        let user = self.visible_results().get(index).cloned()?;
        self.shown = false;
        self.query.clear();
        self.deadline = None;
        Some(user)
    }
}

/// The search region: a debouncer plus the backend it fires at
pub struct SearchBox<S> {
    backend: S,
    debouncer: SearchDebouncer,
    last_error: Option<Error>,
}

impl<S: UserSearch> SearchBox<S> {
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            debouncer: SearchDebouncer::new(),
            last_error: None,
        }
    }

    pub fn state(&self) -> &SearchDebouncer {
        &self.debouncer
    }

    pub fn state_mut(&mut self) -> &mut SearchDebouncer {
        &mut self.debouncer
    }

    pub fn input(&mut self, query: impl Into<String>) {
        self.debouncer.input(query, Instant::now());
    }

    /// Failure of the most recent search, kept for diagnostics only
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// Waits out the pending timer, if any, and runs the search.
    ///
    /// Returns `true` when a request was sent.
    pub async fn settle(&mut self) -> bool {
        let Some(deadline) = self.debouncer.deadline() else {
            return false;
        };
        time::sleep_until(deadline).await;

        let Some(query) = self.debouncer.poll(Instant::now()) else {
            return false;
        };
        debug!("Searching users for {:?}", query);
        match self.backend.search(&query).await {
            Ok(results) => {
                self.last_error = None;
                self.debouncer.complete(&query, results);
            }
            Err(e) => {
                warn!("User search for {:?} failed: {}", query, e);
                self.debouncer.fail(&query);
                self.last_error = Some(e);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn user(id: i64, name: &str) -> UserSummary {
        UserSummary {
            user_id: id,
            username: name.to_string(),
            first_name: None,
            last_name: None,
            photo: None,
            email: None,
        }
    }

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl Recorder {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UserSearch for Recorder {
        async fn search(&self, query: &str) -> Result<Vec<UserSummary>> {
            self.calls.lock().unwrap().push(query.to_string());
            if self.fail {
                return Err(Error::Validation("backend down".to_string()));
            }
            Ok(vec![user(1, query)])
        }
    }

    #[test]
    fn short_query_never_schedules() {
        let now = Instant::now();
        let mut search = SearchDebouncer::new();
        search.input("a", now);
        assert_eq!(search.phase(), SearchPhase::Idle);
        assert_eq!(search.poll(now + Duration::from_secs(5)), None);
    }

    #[test]
    fn keystroke_restarts_the_timer() {
        let start = Instant::now();
        let mut search = SearchDebouncer::new();
        search.input("ab", start);
        search.input("abc", start + Duration::from_millis(200));

        assert_eq!(search.poll(start + Duration::from_millis(350)), None);
        assert_eq!(
            search.poll(start + Duration::from_millis(500)),
            Some("abc".to_string())
        );
        assert_eq!(search.poll(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn short_query_hides_results_immediately() {
        let start = Instant::now();
        let mut search = SearchDebouncer::new();
        search.input("ab", start);
        let query = search.poll(start + SEARCH_DEBOUNCE).unwrap();
        assert!(search.complete(&query, vec![user(1, "abby")]));
        assert_eq!(search.phase(), SearchPhase::ResultsShown);

        search.input("a", start + Duration::from_secs(1));
        assert_eq!(search.phase(), SearchPhase::Idle);
        assert!(search.visible_results().is_empty());

        search.focus();
        assert_eq!(search.visible_results().len(), 1);
    }

    #[test]
    fn stale_results_are_dropped() {
        let start = Instant::now();
        let mut search = SearchDebouncer::new();
        search.input("ab", start);
        let query = search.poll(start + SEARCH_DEBOUNCE).unwrap();
        search.input("abc", start + Duration::from_millis(400));

        assert!(!search.complete(&query, vec![user(1, "abby")]));
        assert!(search.visible_results().is_empty());
    }

    #[test]
    fn select_clears_query_and_hides() {
        let start = Instant::now();
        let mut search = SearchDebouncer::new();
        search.input("bo", start);
        let query = search.poll(start + SEARCH_DEBOUNCE).unwrap();
        search.complete(&query, vec![user(1, "bob"), user(2, "bort")]);

        let picked = search.select(1).unwrap();
        assert_eq!(picked.user_id, 2);
        assert_eq!(search.query(), "");
        assert_eq!(search.phase(), SearchPhase::Idle);
        assert!(search.select(0).is_none());
    }

    #[test]
    fn dismiss_hides_results() {
        let start = Instant::now();
        let mut search = SearchDebouncer::new();
        search.input("bo", start);
        let query = search.poll(start + SEARCH_DEBOUNCE).unwrap();
        search.complete(&query, vec![user(1, "bob")]);
        search.dismiss();
        assert_eq!(search.phase(), SearchPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn one_character_never_calls_backend() {
        let backend = Recorder::default();
        let mut search = SearchBox::new(backend.clone());
        search.input("a");
        assert!(!search.settle().await);
        time::advance(Duration::from_secs(1)).await;
        assert!(!search.settle().await);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn quick_typing_fires_once() {
        let backend = Recorder::default();
        let mut search = SearchBox::new(backend.clone());
        search.input("ab");
        time::advance(Duration::from_millis(200)).await;
        search.input("abc");

        assert!(search.settle().await);
        assert!(!search.settle().await);
        assert_eq!(backend.calls(), vec!["abc"]);
        assert_eq!(search.state().visible_results()[0].username, "abc");
    }

    #[tokio::test(start_paused = true)]
    async fn paused_typing_fires_twice() {
        let backend = Recorder::default();
        let mut search = SearchBox::new(backend.clone());
        search.input("ab");
        time::advance(Duration::from_millis(350)).await;
        assert!(search.settle().await);
        search.input("abc");
        assert!(search.settle().await);
        assert_eq!(backend.calls(), vec!["ab", "abc"]);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_show_nothing() {
        let backend = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let mut search = SearchBox::new(backend.clone());
        search.input("ab");
        assert!(search.settle().await);
        assert_eq!(search.state().phase(), SearchPhase::Idle);
        assert!(search.last_error().is_some());
    }
}
