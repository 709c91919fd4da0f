//! Three independent comparative queries for up to three timestamps.
//!
//! Each query keeps its own lifecycle so a failure degrades only its own
//! panel. The merged view (comparison table, pool ranking, state timeline)
//! is derived on demand from whatever has arrived.

use shared_types::{ThreadPoolMatrix, ThreadStateMatrix, ThreadSummaryByMinute, Timestamp};
use tracing::debug;

use crate::client::{AnalyticsClient, Transport};
use crate::comparison::{
    rank_pools, state_timeline, ComparisonTable, RankedPool, ThreadStateRow, DEFAULT_TOP_POOLS,
};
use crate::error::ApiError;
use crate::fetch::{Applied, FetchState, Query, Ticket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonKey {
    pub file_name: String,
    pub minutes: Vec<Timestamp>,
}

/// Tickets for one round of the three queries
#[derive(Debug, Clone)]
pub struct AggregatorTickets {
    pub summary: Ticket<ComparisonKey>,
    pub states: Ticket<ComparisonKey>,
    pub pools: Ticket<ComparisonKey>,
}

#[derive(Debug, Clone)]
pub struct Aggregator {
    summary: Query<ComparisonKey, ThreadSummaryByMinute>,
    states: Query<ComparisonKey, ThreadStateMatrix>,
    pools: Query<ComparisonKey, ThreadPoolMatrix>,
    first_error: Option<String>,
    top_pools: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    pub fn new() -> Self {
        Self::with_top_pools(DEFAULT_TOP_POOLS)
    }

    pub fn with_top_pools(top_pools: usize) -> Self {
        Self {
            summary: Query::new("Failed to load thread count comparison"),
            states: Query::new("Failed to load thread state comparison"),
            pools: Query::new("Failed to load thread pool comparison"),
            first_error: None,
            top_pools,
        }
    }

    /// Issue all three queries when `(file_name, minutes)` changed.
    pub fn sync(&mut self, file_name: &str, minutes: &[Timestamp]) -> Option<AggregatorTickets> {
        let key = ComparisonKey {
            file_name: file_name.to_string(),
            minutes: minutes.to_vec(),
        };
        if self.summary.key() == Some(&key) {
            return None;
        }

        self.first_error = None;
        Some(AggregatorTickets {
            summary: self.summary.begin(key.clone()),
            states: self.states.begin(key.clone()),
            pools: self.pools.begin(key),
        })
    }

    fn note(&mut self, applied: Applied, message: Option<&str>) -> Applied {
        if applied == Applied::Failed && self.first_error.is_none() {
            self.first_error = message.map(ToString::to_string);
        }
        applied
    }

    pub fn apply_summary(
        &mut self,
        ticket: &Ticket<ComparisonKey>,
        result: Result<ThreadSummaryByMinute, ApiError>,
    ) -> Applied {
        let applied = self.summary.apply(ticket, result);
        let message = self.summary.state().error.clone();
        self.note(applied, message.as_deref())
    }

    pub fn apply_states(
        &mut self,
        ticket: &Ticket<ComparisonKey>,
        result: Result<ThreadStateMatrix, ApiError>,
    ) -> Applied {
        let applied = self.states.apply(ticket, result);
        let message = self.states.state().error.clone();
        self.note(applied, message.as_deref())
    }

    pub fn apply_pools(
        &mut self,
        ticket: &Ticket<ComparisonKey>,
        result: Result<ThreadPoolMatrix, ApiError>,
    ) -> Applied {
        let applied = self.pools.apply(ticket, result);
        let message = self.pools.state().error.clone();
        self.note(applied, message.as_deref())
    }

    pub fn summary(&self) -> &FetchState<ThreadSummaryByMinute> {
        self.summary.state()
    }

    pub fn states(&self) -> &FetchState<ThreadStateMatrix> {
        self.states.state()
    }

    pub fn pools(&self) -> &FetchState<ThreadPoolMatrix> {
        self.pools.state()
    }

    pub fn key(&self) -> Option<&ComparisonKey> {
        self.summary.key()
    }

    pub fn loading(&self) -> bool {
        self.summary.state().is_loading()
            || self.states.state().is_loading()
            || self.pools.state().is_loading()
    }

    /// The first failure reported for the current key, if any.
    pub fn error(&self) -> Option<&str> {
        self.first_error.as_deref()
    }

    fn columns(&self) -> &[Timestamp] {
        self.summary
            .key()
            .map(|k| k.minutes.as_slice())
            .unwrap_or(&[])
    }

    pub fn comparison_table(&self) -> Option<ComparisonTable> {
        let summaries = self.summary.data()?;
        Some(ComparisonTable::build(self.columns(), summaries))
    }

    pub fn top_pools(&self) -> Option<Vec<RankedPool>> {
        let matrix = self.pools.data()?;
        Some(rank_pools(matrix, self.columns(), self.top_pools))
    }

    pub fn state_timeline(&self) -> Option<Vec<ThreadStateRow>> {
        let matrix = self.states.data()?;
        Some(state_timeline(matrix, self.columns()))
    }

    /// Run the three fetches interleaved and apply each result.
    pub async fn refresh<T: Transport>(
        &mut self,
        client: &AnalyticsClient<T>,
        file_name: &str,
        minutes: &[Timestamp],
    ) -> bool {
        let Some(tickets) = self.sync(file_name, minutes) else {
            return false;
        };
        let key = tickets.summary.key().clone();
        debug!(file_name, minutes = ?key.minutes, "loading comparative analysis");

        let (summary, states, pools) = futures_util::join!(
            client.thread_summary(&key.file_name, &key.minutes),
            client.comparative_thread_state(&key.file_name, &key.minutes),
            client.comparative_thread_pool(&key.file_name, &key.minutes),
        );

        self.apply_summary(&tickets.summary, summary);
        self.apply_states(&tickets.states, states);
        self.apply_pools(&tickets.pools, pools);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(values: &[&str]) -> Vec<Timestamp> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_loading_until_all_three_settle() {
        let mut aggregator = Aggregator::new();
        let tickets = aggregator.sync("dump.zip", &minutes(&["a", "b"])).unwrap();
        assert!(aggregator.loading());

        aggregator.apply_summary(&tickets.summary, Ok(ThreadSummaryByMinute::new()));
        aggregator.apply_states(&tickets.states, Ok(ThreadStateMatrix::default()));
        assert!(aggregator.loading());

        aggregator.apply_pools(&tickets.pools, Ok(ThreadPoolMatrix::default()));
        assert!(!aggregator.loading());
        assert!(aggregator.error().is_none());
    }

    #[test]
    fn test_first_error_wins_and_other_panels_survive() {
        let mut aggregator = Aggregator::new();
        let tickets = aggregator.sync("dump.zip", &minutes(&["a", "b"])).unwrap();

        aggregator.apply_pools(&tickets.pools, Err(ApiError::Transport("reset".into())));
        aggregator.apply_states(&tickets.states, Err(ApiError::Decode("bad".into())));
        aggregator.apply_summary(&tickets.summary, Ok(ThreadSummaryByMinute::new()));

        assert_eq!(aggregator.error(), Some("Failed to load thread pool comparison"));
        assert!(aggregator.summary().is_ready());
        assert!(aggregator.comparison_table().is_some());
        assert!(aggregator.top_pools().is_none());
    }

    #[test]
    fn test_new_key_clears_error_and_drops_old_results() {
        let mut aggregator = Aggregator::new();
        let old = aggregator.sync("dump.zip", &minutes(&["a", "b"])).unwrap();
        aggregator.apply_summary(&old.summary, Err(ApiError::Transport("x".into())));
        assert!(aggregator.error().is_some());

        let new = aggregator.sync("dump.zip", &minutes(&["a", "c"])).unwrap();
        assert!(aggregator.error().is_none());
        assert_eq!(
            aggregator.apply_pools(&old.pools, Ok(ThreadPoolMatrix::default())),
            Applied::Stale
        );
        assert!(aggregator.pools().is_loading());
        assert_eq!(
            aggregator.apply_pools(&new.pools, Ok(ThreadPoolMatrix::default())),
            Applied::Ready
        );
    }

    #[test]
    fn test_same_key_is_not_reissued() {
        let mut aggregator = Aggregator::new();
        assert!(aggregator.sync("dump.zip", &minutes(&["a", "b"])).is_some());
        assert!(aggregator.sync("dump.zip", &minutes(&["a", "b"])).is_none());
    }
}
