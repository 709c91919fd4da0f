//! Shared types between the analytics client and the web front end
//!
//! These types are used by both:
//! - the native client and report binary
//! - Dioxus components (WASM)
//!
//! Field names follow the analytics service's camelCase JSON.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Label the analytics service uses for one captured snapshot (e.g. `"10:05"`).
pub type Timestamp = String;

/// Shown for a thread that does not appear in a given snapshot.
pub const UNKNOWN_STATE: &str = "UNKNOWN";

/// Label of the synthetic row appended to every comparison table.
pub const TOTAL_THREADS_ROW: &str = "Total Threads";

/// GC thread counts above this are flagged in the GC panel.
pub const GC_THREAD_WARNING_THRESHOLD: u64 = 10;

// ============================================================================
// Thread Summary
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThreadStateCount {
    pub state: String,
    pub count: u64,
    #[serde(default)]
    pub percentage: f64,
}

/// Aggregate counts for one snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    pub total_threads: u64,
    #[serde(default)]
    pub daemon_thread_count: u64,
    #[serde(default)]
    pub non_daemon_thread_count: u64,
    #[serde(default)]
    pub daemon_thread_percentage: f64,
    #[serde(default)]
    pub non_daemon_thread_percentage: f64,
    #[serde(default)]
    pub thread_states: Vec<ThreadStateCount>,
}

impl ThreadSummary {
    pub fn count_for(&self, state: &str) -> Option<u64> {
        self.thread_states
            .iter()
            .find(|s| s.state == state)
            .map(|s| s.count)
    }

    pub fn state_count_total(&self) -> u64 {
        self.thread_states.iter().map(|s| s.count).sum()
    }
}

/// `get-thread-summary` response, keyed by timestamp in server order
pub type ThreadSummaryByMinute = IndexMap<Timestamp, ThreadSummary>;

// ============================================================================
// Comparative matrices
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ThreadStateMatrix {
    #[serde(default)]
    pub timestamps: Vec<Timestamp>,
    #[serde(default)]
    pub thread_infos: Vec<ThreadStateInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThreadStateInfo {
    pub thread_name: String,
    #[serde(default)]
    pub states: HashMap<Timestamp, String>,
}

impl ThreadStateInfo {
    /// State at `timestamp`, or [`UNKNOWN_STATE`] when the thread was absent.
    pub fn state_at(&self, timestamp: &str) -> &str {
        self.states
            .get(timestamp)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_STATE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ThreadPoolMatrix {
    #[serde(default)]
    pub timestamps: Vec<Timestamp>,
    #[serde(default)]
    pub thread_pools: Vec<ThreadPoolSeries>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThreadPoolSeries {
    pub name: String,
    #[serde(default)]
    pub pool_data_by_minute: HashMap<Timestamp, PoolMinuteData>,
}

impl ThreadPoolSeries {
    pub fn thread_count_at(&self, timestamp: &str) -> u64 {
        self.pool_data_by_minute
            .get(timestamp)
            .map(|data| data.thread_count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PoolMinuteData {
    pub thread_count: u64,
    #[serde(default)]
    pub state_counts: IndexMap<String, u64>,
}

// ============================================================================
// Single-minute panels
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThreadPoolStatistic {
    pub thread_pool: String,
    pub count: u64,
    #[serde(default)]
    pub state_counts: IndexMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdenticalStackTrace {
    pub count: u64,
    pub stack_trace: String,
    #[serde(default)]
    pub stack_trace_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StackLengthStats {
    /// Category label (e.g. `"<10"`, `"10-100"`, `">100"`) to thread count, server order
    #[serde(default)]
    pub length_groups: IndexMap<String, u64>,
    #[serde(default)]
    pub has_critical_stacks: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LastExecutedMethods {
    #[serde(default)]
    pub methods: Vec<MethodStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MethodStat {
    pub method: String,
    pub count: u64,
    #[serde(default)]
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GcThreadCount {
    pub gc_thread_count: u64,
}

impl GcThreadCount {
    pub fn is_high(&self) -> bool {
        self.gc_thread_count > GC_THREAD_WARNING_THRESHOLD
    }
}

// ============================================================================
// Upload
// ============================================================================

/// Body of both the `200` and the `409` upload responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_summary_deserializes_camel_case() {
        let json = r#"{
            "totalThreads": 7,
            "daemonThreadCount": 3,
            "nonDaemonThreadCount": 4,
            "daemonThreadPercentage": 42.85,
            "nonDaemonThreadPercentage": 57.14,
            "threadStates": [
                {"state": "RUNNABLE", "count": 5, "percentage": 71.4},
                {"state": "BLOCKED", "count": 2, "percentage": 28.6}
            ]
        }"#;

        let summary: ThreadSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.total_threads, 7);
        assert_eq!(summary.non_daemon_thread_count, 4);
        assert_eq!(summary.count_for("BLOCKED"), Some(2));
        assert_eq!(summary.count_for("WAITING"), None);
        assert_eq!(summary.state_count_total(), summary.total_threads);
    }

    #[test]
    fn test_summary_map_keeps_server_order() {
        let json = r#"{
            "10:10": {"totalThreads": 1, "threadStates": []},
            "10:05": {"totalThreads": 2, "threadStates": []}
        }"#;

        let by_minute: ThreadSummaryByMinute = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = by_minute.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["10:10", "10:05"]);
    }

    #[test]
    fn test_missing_thread_state_reads_unknown() {
        let json = r#"{
            "timestamps": ["10:05", "10:10"],
            "threadInfos": [
                {"threadName": "worker-1", "states": {"10:05": "RUNNABLE"}}
            ]
        }"#;

        let matrix: ThreadStateMatrix = serde_json::from_str(json).unwrap();
        let info = &matrix.thread_infos[0];
        assert_eq!(info.state_at("10:05"), "RUNNABLE");
        assert_eq!(info.state_at("10:10"), UNKNOWN_STATE);
    }

    #[test]
    fn test_missing_pool_minute_counts_zero() {
        let json = r#"{
            "timestamps": ["10:05", "10:10"],
            "threadPools": [
                {"name": "http-nio", "poolDataByMinute": {
                    "10:10": {"threadCount": 12, "stateCounts": {"RUNNABLE": 12}}
                }}
            ]
        }"#;

        let matrix: ThreadPoolMatrix = serde_json::from_str(json).unwrap();
        let pool = &matrix.thread_pools[0];
        assert_eq!(pool.thread_count_at("10:05"), 0);
        assert_eq!(pool.thread_count_at("10:10"), 12);
    }

    #[test]
    fn test_stack_length_groups_keep_order() {
        let json = r#"{"lengthGroups": {"<10": 4, "10-100": 2, ">100": 1}, "hasCriticalStacks": true}"#;
        let stats: StackLengthStats = serde_json::from_str(json).unwrap();
        let labels: Vec<&str> = stats.length_groups.keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["<10", "10-100", ">100"]);
        assert!(stats.has_critical_stacks);
    }

    #[test]
    fn test_gc_thread_warning_threshold() {
        assert!(!GcThreadCount { gc_thread_count: 10 }.is_high());
        assert!(GcThreadCount { gc_thread_count: 11 }.is_high());
    }
}
