use shared_types::{ThreadSummary, ThreadSummaryByMinute, Timestamp};

use crate::client::{AnalyticsClient, Transport};
use crate::error::ApiError;
use crate::fetch::{Applied, FetchState, Query, Ticket};

pub const NO_DATA_MESSAGE: &str = "No data available";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryKey {
    pub file_name: String,
    pub timestamps: Vec<Timestamp>,
}

/// Thread counts for the one timestamp a single-view panel shows.
#[derive(Debug, Clone)]
pub struct SummaryLoader {
    query: Query<SummaryKey, ThreadSummary>,
}

impl Default for SummaryLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryLoader {
    pub fn new() -> Self {
        Self {
            query: Query::new(NO_DATA_MESSAGE),
        }
    }

    pub fn state(&self) -> &FetchState<ThreadSummary> {
        self.query.state()
    }

    pub fn key(&self) -> Option<&SummaryKey> {
        self.query.key()
    }

    /// Issue a fetch when `(file_name, timestamps)` differs from the last one.
    pub fn sync(&mut self, file_name: &str, timestamps: &[Timestamp]) -> Option<Ticket<SummaryKey>> {
        self.query.begin_if_changed(SummaryKey {
            file_name: file_name.to_string(),
            timestamps: timestamps.to_vec(),
        })
    }

    pub fn apply(
        &mut self,
        ticket: &Ticket<SummaryKey>,
        result: Result<ThreadSummaryByMinute, ApiError>,
    ) -> Applied {
        let wanted = ticket.key().timestamps.first().cloned();
        let result = result.map(|mut by_minute| wanted.and_then(|t| by_minute.shift_remove(&t)));
        self.query.apply_with(ticket, result)
    }

    pub async fn fetch<T: Transport>(
        client: &AnalyticsClient<T>,
        ticket: &Ticket<SummaryKey>,
    ) -> Result<ThreadSummaryByMinute, ApiError> {
        let key = ticket.key();
        client.thread_summary(&key.file_name, &key.timestamps).await
    }

    /// Sync and, if the key changed, fetch and apply in one go.
    pub async fn refresh<T: Transport>(
        &mut self,
        client: &AnalyticsClient<T>,
        file_name: &str,
        timestamps: &[Timestamp],
    ) -> Option<Applied> {
        let ticket = self.sync(file_name, timestamps)?;
        let result = Self::fetch(client, &ticket).await;
        Some(self.apply(&ticket, result))
    }
}
