//! Incremental retrieval of stack traces for one thread state.
//!
//! ```text
//! Idle --select--> Loading(1) --blocks--> Ready --viewport--> Loading(n+1)
//!                                  ^                            |
//!                                  +---------blocks / error-----+
//!                                  Loading(n) --no blocks--> Exhausted
//! ```
//!
//! Pages are appended as they arrive; nothing is deduplicated across pages.
//! `Exhausted` only ends when the key changes.

use shared_types::Timestamp;
use tracing::{debug, warn};

use crate::client::{AnalyticsClient, Transport};
use crate::error::ApiError;

/// Split a `get-state-traces` body into trace blocks. Blocks are separated
/// by a blank line; whitespace-only blocks are dropped.
pub fn parse_trace_blocks(body: &str) -> Vec<String> {
    body.replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceKey {
    pub file_name: String,
    pub minutes: Vec<Timestamp>,
    pub state: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorPhase {
    Idle,
    Loading { page: u32 },
    Ready,
    Exhausted,
}

/// One page fetch, tagged with the key and generation it was issued under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub key: TraceKey,
    pub page: u32,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Appended(usize),
    Exhausted,
    Failed,
    Stale,
}

#[derive(Debug, Clone)]
pub struct Paginator {
    key: Option<TraceKey>,
    generation: u64,
    loaded_pages: u32,
    traces: Vec<String>,
    phase: PaginatorPhase,
    last_error: Option<String>,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new()
    }
}

impl Paginator {
    pub fn new() -> Self {
        Self {
            key: None,
            generation: 0,
            loaded_pages: 0,
            traces: Vec::new(),
            phase: PaginatorPhase::Idle,
            last_error: None,
        }
    }

    pub fn key(&self) -> Option<&TraceKey> {
        self.key.as_ref()
    }

    pub fn phase(&self) -> PaginatorPhase {
        self.phase
    }

    pub fn traces(&self) -> &[String] {
        &self.traces
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, PaginatorPhase::Loading { .. })
    }

    pub fn has_more(&self) -> bool {
        !matches!(self.phase, PaginatorPhase::Exhausted)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn issue(&mut self, key: TraceKey, page: u32) -> PageRequest {
        self.phase = PaginatorPhase::Loading { page };
        debug!(state = %key.state, page, generation = self.generation, "requesting trace page");
        PageRequest {
            key,
            page,
            generation: self.generation,
        }
    }

    /// Switch to `key`, dropping everything accumulated so far, and request
    /// page 1. Re-selecting the current key does nothing.
    pub fn select(&mut self, key: TraceKey) -> Option<PageRequest> {
        if self.key.as_ref() == Some(&key) {
            return None;
        }
        self.generation += 1;
        self.key = Some(key.clone());
        self.loaded_pages = 0;
        self.traces.clear();
        self.last_error = None;
        Some(self.issue(key, 1))
    }

    /// The last rendered trace scrolled into view. Ignored while loading,
    /// once exhausted, or with nothing selected.
    pub fn on_viewport_signal(&mut self) -> Option<PageRequest> {
        if self.phase != PaginatorPhase::Ready {
            return None;
        }
        let key = self.key.clone()?;
        Some(self.issue(key, self.loaded_pages + 1))
    }

    /// Re-request the page that last failed. Unlike a viewport signal this
    /// works with zero traces loaded, where there is no sentinel to scroll to.
    pub fn retry(&mut self) -> Option<PageRequest> {
        self.last_error.as_ref()?;
        self.on_viewport_signal()
    }

    pub fn is_current(&self, request: &PageRequest) -> bool {
        request.generation == self.generation && self.key.as_ref() == Some(&request.key)
    }

    /// Single update entry point for a finished page fetch.
    pub fn apply(&mut self, request: &PageRequest, result: Result<String, ApiError>) -> PageOutcome {
        if !self.is_current(request) {
            debug!(
                state = %request.key.state,
                page = request.page,
                "dropping trace page for superseded selection"
            );
            return PageOutcome::Stale;
        }

        match result {
            Ok(body) => {
                let blocks = parse_trace_blocks(&body);
                if blocks.is_empty() {
                    self.phase = PaginatorPhase::Exhausted;
                    return PageOutcome::Exhausted;
                }
                let count = blocks.len();
                self.traces.extend(blocks);
                self.loaded_pages = request.page;
                self.last_error = None;
                self.phase = PaginatorPhase::Ready;
                PageOutcome::Appended(count)
            }
            Err(e) => {
                warn!(state = %request.key.state, page = request.page, error = %e, "trace page failed");
                self.last_error = Some("Failed to load stack traces".to_string());
                self.phase = PaginatorPhase::Ready;
                PageOutcome::Failed
            }
        }
    }

    /// Back to `Idle`; anything in flight becomes stale.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.key = None;
        self.loaded_pages = 0;
        self.traces.clear();
        self.last_error = None;
        self.phase = PaginatorPhase::Idle;
    }

    pub async fn fetch<T: Transport>(
        client: &AnalyticsClient<T>,
        request: &PageRequest,
    ) -> Result<String, ApiError> {
        let key = &request.key;
        client
            .state_traces(&key.file_name, &key.minutes, &key.state, request.page)
            .await
    }

    /// Fetch `request` and apply the result.
    pub async fn run<T: Transport>(
        &mut self,
        client: &AnalyticsClient<T>,
        request: PageRequest,
    ) -> PageOutcome {
        let result = Self::fetch(client, &request).await;
        self.apply(&request, result)
    }
}
