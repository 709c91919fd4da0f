//! Panels that each show one timestamp of the selection.
//!
//! Every panel is a [`MinutePanel`] keyed by `(file, minute)`; the two
//! panels with a clickable breakdown also own a [`DrillDown`].

use async_trait::async_trait;
use shared_types::{
    GcThreadCount, IdenticalStackTrace, LastExecutedMethods, StackLengthStats,
    ThreadPoolStatistic,
};

use crate::client::{AnalyticsClient, Transport};
use crate::error::ApiError;
use crate::fetch::{Applied, FetchState, Query, Ticket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinuteKey {
    pub file_name: String,
    pub minute: String,
}

/// Response type of a single-minute panel and how to fetch it.
#[async_trait(?Send)]
pub trait PanelSource: Sized {
    /// Shown in place of the panel when its fetch fails.
    const FAILURE: &'static str;

    async fn load<T: Transport>(client: &AnalyticsClient<T>, key: &MinuteKey) -> Result<Self, ApiError>;
}

#[async_trait(?Send)]
impl PanelSource for Vec<ThreadPoolStatistic> {
    const FAILURE: &'static str = "Failed to load thread pool statistics";

    async fn load<T: Transport>(client: &AnalyticsClient<T>, key: &MinuteKey) -> Result<Self, ApiError> {
        client.thread_pool_statistics(&key.file_name, &key.minute).await
    }
}

#[async_trait(?Send)]
impl PanelSource for Vec<IdenticalStackTrace> {
    const FAILURE: &'static str = "Failed to load identical stack traces";

    async fn load<T: Transport>(client: &AnalyticsClient<T>, key: &MinuteKey) -> Result<Self, ApiError> {
        client.identical_stack_traces(&key.file_name, &key.minute).await
    }
}

#[async_trait(?Send)]
impl PanelSource for StackLengthStats {
    const FAILURE: &'static str = "Failed to load stack length statistics";

    async fn load<T: Transport>(client: &AnalyticsClient<T>, key: &MinuteKey) -> Result<Self, ApiError> {
        client.stack_length_stats(&key.file_name, &key.minute).await
    }
}

#[async_trait(?Send)]
impl PanelSource for LastExecutedMethods {
    const FAILURE: &'static str = "No data available";

    async fn load<T: Transport>(client: &AnalyticsClient<T>, key: &MinuteKey) -> Result<Self, ApiError> {
        client.last_executed_methods(&key.file_name, &key.minute).await
    }
}

#[async_trait(?Send)]
impl PanelSource for GcThreadCount {
    const FAILURE: &'static str = "Failed to load GC thread count";

    async fn load<T: Transport>(client: &AnalyticsClient<T>, key: &MinuteKey) -> Result<Self, ApiError> {
        client.gc_thread_count(&key.file_name, &key.minute).await
    }
}

#[derive(Debug, Clone)]
pub struct MinutePanel<D> {
    query: Query<MinuteKey, D>,
}

impl<D: PanelSource> Default for MinutePanel<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: PanelSource> MinutePanel<D> {
    pub fn new() -> Self {
        Self {
            query: Query::new(D::FAILURE),
        }
    }

    pub fn state(&self) -> &FetchState<D> {
        self.query.state()
    }

    pub fn key(&self) -> Option<&MinuteKey> {
        self.query.key()
    }

    pub fn sync(&mut self, file_name: &str, minute: &str) -> Option<Ticket<MinuteKey>> {
        self.query.begin_if_changed(MinuteKey {
            file_name: file_name.to_string(),
            minute: minute.to_string(),
        })
    }

    pub fn apply(&mut self, ticket: &Ticket<MinuteKey>, result: Result<D, ApiError>) -> Applied {
        self.query.apply(ticket, result)
    }

    pub async fn fetch<T: Transport>(
        client: &AnalyticsClient<T>,
        ticket: &Ticket<MinuteKey>,
    ) -> Result<D, ApiError> {
        D::load(client, ticket.key()).await
    }

    pub async fn refresh<T: Transport>(
        &mut self,
        client: &AnalyticsClient<T>,
        file_name: &str,
        minute: &str,
    ) -> Option<Applied> {
        let ticket = self.sync(file_name, minute)?;
        let result = Self::fetch(client, &ticket).await;
        Some(self.apply(&ticket, result))
    }
}

/// Which breakdown a [`DrillDown`] expands into raw traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillKind {
    /// `get-stacks-by-length`, selector is the length category
    StackLength,
    /// `get-method-traces`, selector is the method name
    Method,
}

impl DrillKind {
    pub async fn fetch<T: Transport>(
        self,
        client: &AnalyticsClient<T>,
        ticket: &Ticket<DetailKey>,
    ) -> Result<Vec<String>, ApiError> {
        let key = ticket.key();
        match self {
            DrillKind::StackLength => {
                client
                    .stacks_by_length(&key.file_name, &key.minute, &key.selector)
                    .await
            }
            DrillKind::Method => {
                client
                    .method_traces(&key.file_name, &key.minute, &key.selector)
                    .await
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailKey {
    pub file_name: String,
    pub minute: String,
    pub selector: String,
}

/// Raw traces behind one clicked row. Every click refetches.
#[derive(Debug, Clone)]
pub struct DrillDown {
    kind: DrillKind,
    query: Query<DetailKey, Vec<String>>,
}

impl DrillDown {
    pub fn new(kind: DrillKind) -> Self {
        let message = match kind {
            DrillKind::StackLength => "Failed to load stack traces for this category",
            DrillKind::Method => "Failed to load stack traces for this method",
        };
        Self {
            kind,
            query: Query::new(message),
        }
    }

    pub fn kind(&self) -> DrillKind {
        self.kind
    }

    pub fn state(&self) -> &FetchState<Vec<String>> {
        self.query.state()
    }

    /// The row currently expanded, for highlighting.
    pub fn selected(&self) -> Option<&str> {
        self.query.key().map(|k| k.selector.as_str())
    }

    pub fn open(&mut self, file_name: &str, minute: &str, selector: &str) -> Ticket<DetailKey> {
        self.query.begin(DetailKey {
            file_name: file_name.to_string(),
            minute: minute.to_string(),
            selector: selector.to_string(),
        })
    }

    /// Collapse, e.g. when the panel's minute changes.
    pub fn close(&mut self) {
        self.query.reset();
    }

    pub fn apply(&mut self, ticket: &Ticket<DetailKey>, result: Result<Vec<String>, ApiError>) -> Applied {
        self.query.apply(ticket, result)
    }

    pub async fn run<T: Transport>(
        &mut self,
        client: &AnalyticsClient<T>,
        ticket: Ticket<DetailKey>,
    ) -> Applied {
        let result = self.kind.fetch(client, &ticket).await;
        self.apply(&ticket, result)
    }
}

/// Chart labels for identical stack traces: `StackTrace 1`, `StackTrace 2`, ...
pub fn identical_trace_labels(traces: &[IdenticalStackTrace]) -> Vec<String> {
    (1..=traces.len()).map(|n| format!("StackTrace {n}")).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolShare {
    pub name: String,
    pub count: u64,
    pub percentage: f64,
}

/// Each pool's share of all pooled threads, for the pie chart.
pub fn pool_shares(stats: &[ThreadPoolStatistic]) -> Vec<PoolShare> {
    let total: u64 = stats.iter().map(|s| s.count).sum();
    stats
        .iter()
        .map(|s| PoolShare {
            name: s.thread_pool.clone(),
            count: s.count,
            percentage: if total == 0 {
                0.0
            } else {
                s.count as f64 * 100.0 / total as f64
            },
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthSeverity {
    Normal,
    Elevated,
    Critical,
}

/// Colour band of a stack length category.
pub fn length_severity(category: &str) -> LengthSeverity {
    match category {
        "<10" => LengthSeverity::Normal,
        "10-100" => LengthSeverity::Elevated,
        _ => LengthSeverity::Critical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Endpoint;
    use crate::testing::ScriptedTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_panel_refetches_only_when_minute_changes() {
        let transport = ScriptedTransport::new();
        transport.respond_json(Endpoint::GcThreadCount, json!({"gcThreadCount": 12}));
        transport.respond_json(Endpoint::GcThreadCount, json!({"gcThreadCount": 3}));
        let client = AnalyticsClient::new(&transport);

        let mut panel: MinutePanel<GcThreadCount> = MinutePanel::new();
        assert_eq!(panel.refresh(&client, "dump.zip", "10:05").await, Some(Applied::Ready));
        assert!(panel.state().data().is_some_and(|gc| gc.is_high()));
        assert_eq!(panel.refresh(&client, "dump.zip", "10:05").await, None);

        panel.refresh(&client, "dump.zip", "10:10").await;
        assert_eq!(panel.state().data().map(|gc| gc.gc_thread_count), Some(3));

        let requests = transport.requests_to(Endpoint::GcThreadCount);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].params("minutes"), vec!["10:10"]);
    }

    #[tokio::test]
    async fn test_drill_down_refetches_same_row() {
        let transport = ScriptedTransport::new();
        transport.respond_json(Endpoint::MethodTraces, json!(["trace 1"]));
        transport.respond_json(Endpoint::MethodTraces, json!(["trace 1", "trace 2"]));
        let client = AnalyticsClient::new(&transport);

        let mut drill = DrillDown::new(DrillKind::Method);
        let ticket = drill.open("dump.zip", "10:05", "java.lang.Thread.sleep");
        drill.run(&client, ticket).await;
        let ticket = drill.open("dump.zip", "10:05", "java.lang.Thread.sleep");
        drill.run(&client, ticket).await;

        assert_eq!(drill.selected(), Some("java.lang.Thread.sleep"));
        assert_eq!(drill.state().data().map(Vec::len), Some(2));
        let requests = transport.requests_to(Endpoint::MethodTraces);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].params("method"), vec!["java.lang.Thread.sleep"]);
    }

    #[test]
    fn test_stale_drill_down_is_dropped_after_close() {
        let mut drill = DrillDown::new(DrillKind::StackLength);
        let ticket = drill.open("dump.zip", "10:05", ">100");
        drill.close();
        assert_eq!(drill.apply(&ticket, Ok(vec!["late".into()])), Applied::Stale);
        assert!(drill.selected().is_none());
    }

    #[test]
    fn test_chart_helpers() {
        let traces: Vec<IdenticalStackTrace> = serde_json::from_value(json!([
            {"count": 4, "stackTrace": "a"},
            {"count": 2, "stackTrace": "b"}
        ]))
        .unwrap();
        assert_eq!(identical_trace_labels(&traces), vec!["StackTrace 1", "StackTrace 2"]);

        let stats: Vec<ThreadPoolStatistic> = serde_json::from_value(json!([
            {"threadPool": "http", "count": 3},
            {"threadPool": "db", "count": 1}
        ]))
        .unwrap();
        let shares = pool_shares(&stats);
        assert_eq!(shares[0].percentage, 75.0);
        assert_eq!(shares[1].percentage, 25.0);
        assert!(pool_shares(&[]).is_empty());

        assert_eq!(length_severity("<10"), LengthSeverity::Normal);
        assert_eq!(length_severity(">100"), LengthSeverity::Critical);
    }
}
