//! Uniform loading/error/data lifecycle for one independent query.
//!
//! A [`Query`] remembers the key it was last asked for and a generation
//! counter. Every fetch is issued against a [`Ticket`] carrying both; a result
//! whose ticket is no longer current is dropped on arrival, so a slow response
//! for a superseded key can never overwrite newer state.

use tracing::{debug, warn};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub status: FetchStatus,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            status: FetchStatus::Idle,
            data: None,
            error: None,
        }
    }
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    pub fn is_ready(&self) -> bool {
        self.status == FetchStatus::Ready
    }

    pub fn is_failed(&self) -> bool {
        self.status == FetchStatus::Failed
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Proof that a fetch was issued for `key` at `generation`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    generation: u64,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What [`Query::apply`] did with a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Ready,
    Failed,
    Stale,
}

#[derive(Debug, Clone)]
pub struct Query<K, T> {
    key: Option<K>,
    generation: u64,
    state: FetchState<T>,
    failure_message: &'static str,
}

impl<K, T> Query<K, T>
where
    K: Clone + PartialEq + std::fmt::Debug,
{
    /// `failure_message` is what the view shows when a fetch fails; the
    /// underlying error only goes to the log.
    pub fn new(failure_message: &'static str) -> Self {
        Self {
            key: None,
            generation: 0,
            state: FetchState::default(),
            failure_message,
        }
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn data(&self) -> Option<&T> {
        self.state.data.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a fetch for `key` unconditionally, superseding any in-flight one.
    pub fn begin(&mut self, key: K) -> Ticket<K> {
        self.generation += 1;
        self.key = Some(key.clone());
        self.state = FetchState {
            status: FetchStatus::Loading,
            data: None,
            error: None,
        };
        debug!(?key, generation = self.generation, "query issued");
        Ticket {
            key,
            generation: self.generation,
        }
    }

    /// Start a fetch only when `key` differs (by value) from the current one.
    pub fn begin_if_changed(&mut self, key: K) -> Option<Ticket<K>> {
        if self.key.as_ref() == Some(&key) {
            return None;
        }
        Some(self.begin(key))
    }

    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        ticket.generation == self.generation && self.key.as_ref() == Some(&ticket.key)
    }

    /// Single update entry point for a finished fetch.
    pub fn apply(&mut self, ticket: &Ticket<K>, result: Result<T, ApiError>) -> Applied {
        self.apply_with(ticket, result.map(Some))
    }

    /// Like [`Query::apply`] but `Ok(None)` means the service answered with
    /// nothing for this key: ready, without data.
    pub fn apply_with(&mut self, ticket: &Ticket<K>, result: Result<Option<T>, ApiError>) -> Applied {
        if !self.is_current(ticket) {
            debug!(
                key = ?ticket.key,
                generation = ticket.generation,
                current = self.generation,
                "dropping stale response"
            );
            return Applied::Stale;
        }

        match result {
            Ok(data) => {
                self.state = FetchState {
                    status: FetchStatus::Ready,
                    data,
                    error: None,
                };
                Applied::Ready
            }
            Err(e) => {
                warn!(key = ?ticket.key, error = %e, "query failed");
                self.state = FetchState {
                    status: FetchStatus::Failed,
                    data: None,
                    error: Some(self.failure_message.to_string()),
                };
                Applied::Failed
            }
        }
    }

    /// Forget the key and invalidate any in-flight fetch.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.key = None;
        self.state = FetchState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_marks_loading_and_apply_marks_ready() {
        let mut query: Query<String, u32> = Query::new("No data available");
        let ticket = query.begin("a".to_string());
        assert!(query.state().is_loading());

        assert_eq!(query.apply(&ticket, Ok(7)), Applied::Ready);
        assert!(query.state().is_ready());
        assert_eq!(query.data(), Some(&7));
    }

    #[test]
    fn test_failure_surfaces_generic_message() {
        let mut query: Query<String, u32> = Query::new("No data available");
        let ticket = query.begin("a".to_string());

        let applied = query.apply(&ticket, Err(ApiError::Transport("connection refused".into())));
        assert_eq!(applied, Applied::Failed);
        assert_eq!(query.state().error(), Some("No data available"));
        assert!(query.data().is_none());
    }

    #[test]
    fn test_superseded_ticket_is_dropped() {
        let mut query: Query<String, u32> = Query::new("No data available");
        let first = query.begin("a".to_string());
        let second = query.begin("b".to_string());

        assert_eq!(query.apply(&first, Ok(1)), Applied::Stale);
        assert!(query.state().is_loading());
        assert_eq!(query.apply(&second, Ok(2)), Applied::Ready);
        assert_eq!(query.data(), Some(&2));
    }

    #[test]
    fn test_same_key_refetch_also_supersedes() {
        let mut query: Query<String, u32> = Query::new("No data available");
        let first = query.begin("a".to_string());
        let second = query.begin("a".to_string());

        assert_eq!(query.apply(&first, Ok(1)), Applied::Stale);
        assert_eq!(query.apply(&second, Ok(2)), Applied::Ready);
    }

    #[test]
    fn test_begin_if_changed_uses_value_equality() {
        let mut query: Query<Vec<String>, u32> = Query::new("No data available");
        assert!(query.begin_if_changed(vec!["10:05".into()]).is_some());
        assert!(query.begin_if_changed(vec!["10:05".into()]).is_none());
        assert!(query.begin_if_changed(vec!["10:10".into()]).is_some());
    }

    #[test]
    fn test_reset_invalidates_in_flight() {
        let mut query: Query<String, u32> = Query::new("No data available");
        let ticket = query.begin("a".to_string());
        query.reset();

        assert_eq!(query.apply(&ticket, Ok(1)), Applied::Stale);
        assert_eq!(query.state().status, FetchStatus::Idle);
    }

    #[test]
    fn test_empty_answer_is_ready_without_data() {
        let mut query: Query<String, u32> = Query::new("No data available");
        let ticket = query.begin("a".to_string());
        assert_eq!(query.apply_with(&ticket, Ok(None)), Applied::Ready);
        assert!(query.state().is_ready());
        assert!(query.data().is_none());
    }
}
