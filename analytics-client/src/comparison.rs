//! Merging per-timestamp responses into tables aligned on the selected timestamps.

use shared_types::{
    ThreadPoolMatrix, ThreadStateMatrix, ThreadSummaryByMinute, Timestamp, TOTAL_THREADS_ROW,
};
use tracing::debug;

/// How many pools a bounded chart shows.
pub const DEFAULT_TOP_POOLS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRow {
    pub state: String,
    /// One count per column, in column order
    pub counts: Vec<u64>,
}

/// State counts per timestamp plus a trailing total row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonTable {
    timestamps: Vec<Timestamp>,
    states: Vec<ComparisonRow>,
    total: ComparisonRow,
}

impl ComparisonTable {
    /// Columns follow `columns`; rows are the union of states in first-seen
    /// order walking the columns left to right. Absent cells are 0.
    pub fn build(columns: &[Timestamp], summaries: &ThreadSummaryByMinute) -> Self {
        let mut states: Vec<ComparisonRow> = Vec::new();
        for (col, timestamp) in columns.iter().enumerate() {
            let Some(summary) = summaries.get(timestamp) else {
                continue;
            };
            for entry in &summary.thread_states {
                let row = match states.iter().position(|r| r.state == entry.state) {
                    Some(i) => &mut states[i],
                    None => {
                        states.push(ComparisonRow {
                            state: entry.state.clone(),
                            counts: vec![0; columns.len()],
                        });
                        let last = states.len() - 1;
                        &mut states[last]
                    }
                };
                row.counts[col] += entry.count;
            }
        }

        let counts = columns
            .iter()
            .map(|timestamp| {
                let Some(summary) = summaries.get(timestamp) else {
                    return 0;
                };
                if summary.state_count_total() != summary.total_threads {
                    debug!(
                        %timestamp,
                        total = summary.total_threads,
                        by_state = summary.state_count_total(),
                        "thread state counts do not add up to total"
                    );
                }
                summary.total_threads
            })
            .collect();

        Self {
            timestamps: columns.to_vec(),
            states,
            total: ComparisonRow {
                state: TOTAL_THREADS_ROW.to_string(),
                counts,
            },
        }
    }

    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    pub fn column_count(&self) -> usize {
        self.timestamps.len()
    }

    /// Every distinct state, in row order. Drives colour assignment.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|r| r.state.as_str())
    }

    pub fn state_rows(&self) -> &[ComparisonRow] {
        &self.states
    }

    pub fn total_row(&self) -> &ComparisonRow {
        &self.total
    }

    /// State rows followed by the total row.
    pub fn rows(&self) -> impl Iterator<Item = &ComparisonRow> {
        self.states.iter().chain(std::iter::once(&self.total))
    }

    pub fn row(&self, state: &str) -> Option<&ComparisonRow> {
        self.rows().find(|r| r.state == state)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPool {
    pub name: String,
    pub peak: u64,
    pub counts: Vec<u64>,
}

/// Pools ordered by their peak thread count across `columns`, descending.
/// Ties keep the server's order.
pub fn rank_pools(matrix: &ThreadPoolMatrix, columns: &[Timestamp], limit: usize) -> Vec<RankedPool> {
    let mut ranked: Vec<RankedPool> = matrix
        .thread_pools
        .iter()
        .map(|pool| {
            let counts: Vec<u64> = columns.iter().map(|t| pool.thread_count_at(t)).collect();
            RankedPool {
                name: pool.name.clone(),
                peak: counts.iter().copied().max().unwrap_or(0),
                counts,
            }
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.peak.cmp(&a.peak));
    ranked.truncate(limit);
    ranked
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadStateRow {
    pub thread_name: String,
    /// One state per column; `UNKNOWN` where the thread was absent
    pub states: Vec<String>,
}

pub fn state_timeline(matrix: &ThreadStateMatrix, columns: &[Timestamp]) -> Vec<ThreadStateRow> {
    matrix
        .thread_infos
        .iter()
        .map(|info| ThreadStateRow {
            thread_name: info.thread_name.clone(),
            states: columns
                .iter()
                .map(|t| info.state_at(t).to_string())
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns(values: &[&str]) -> Vec<Timestamp> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn summaries(value: serde_json::Value) -> ThreadSummaryByMinute {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_two_minute_table_matches_expected_rows() {
        let data = summaries(json!({
            "10:05": {"totalThreads": 7, "threadStates": [
                {"state": "RUNNABLE", "count": 5}, {"state": "BLOCKED", "count": 2}
            ]},
            "10:10": {"totalThreads": 7, "threadStates": [
                {"state": "RUNNABLE", "count": 6}, {"state": "WAITING", "count": 1}
            ]}
        }));

        let table = ComparisonTable::build(&columns(&["10:05", "10:10"]), &data);
        let rows: Vec<(&str, Vec<u64>)> = table
            .rows()
            .map(|r| (r.state.as_str(), r.counts.clone()))
            .collect();

        assert_eq!(
            rows,
            vec![
                ("RUNNABLE", vec![5, 6]),
                ("BLOCKED", vec![2, 0]),
                ("WAITING", vec![0, 1]),
                ("Total Threads", vec![7, 7]),
            ]
        );
    }

    #[test]
    fn test_columns_follow_selection_not_response_order() {
        let data = summaries(json!({
            "10:05": {"totalThreads": 1, "threadStates": [{"state": "BLOCKED", "count": 1}]},
            "10:10": {"totalThreads": 2, "threadStates": [{"state": "RUNNABLE", "count": 2}]}
        }));

        let table = ComparisonTable::build(&columns(&["10:10", "10:05"]), &data);
        assert_eq!(table.timestamps(), columns(&["10:10", "10:05"]).as_slice());
        assert_eq!(table.states().collect::<Vec<_>>(), vec!["RUNNABLE", "BLOCKED"]);
        assert_eq!(table.total_row().counts, vec![2, 1]);
    }

    #[test]
    fn test_state_rows_sum_to_total_per_column() {
        let data = summaries(json!({
            "a": {"totalThreads": 10, "threadStates": [
                {"state": "RUNNABLE", "count": 4}, {"state": "WAITING", "count": 3},
                {"state": "TIMED_WAITING", "count": 3}
            ]},
            "b": {"totalThreads": 5, "threadStates": [
                {"state": "BLOCKED", "count": 5}
            ]},
            "c": {"totalThreads": 0, "threadStates": []}
        }));
        let cols = columns(&["a", "b", "c"]);
        let table = ComparisonTable::build(&cols, &data);

        assert_eq!(table.column_count(), 3);
        assert_eq!(table.rows().filter(|r| r.state == TOTAL_THREADS_ROW).count(), 1);
        for col in 0..cols.len() {
            let sum: u64 = table.state_rows().iter().map(|r| r.counts[col]).sum();
            assert_eq!(sum, table.total_row().counts[col]);
        }
    }

    #[test]
    fn test_missing_timestamp_yields_zero_column() {
        let data = summaries(json!({
            "10:05": {"totalThreads": 3, "threadStates": [{"state": "RUNNABLE", "count": 3}]}
        }));
        let table = ComparisonTable::build(&columns(&["10:05", "10:10"]), &data);
        assert_eq!(table.row("RUNNABLE").unwrap().counts, vec![3, 0]);
        assert_eq!(table.total_row().counts, vec![3, 0]);
    }

    #[test]
    fn test_pool_ranking_is_stable_and_bounded() {
        let matrix: ThreadPoolMatrix = serde_json::from_value(json!({
            "timestamps": ["t1", "t2"],
            "threadPools": [
                {"name": "a", "poolDataByMinute": {"t1": {"threadCount": 3}}},
                {"name": "b", "poolDataByMinute": {"t2": {"threadCount": 9}}},
                {"name": "c", "poolDataByMinute": {"t1": {"threadCount": 3}, "t2": {"threadCount": 1}}},
                {"name": "d", "poolDataByMinute": {}},
                {"name": "e", "poolDataByMinute": {"t1": {"threadCount": 4}}},
                {"name": "f", "poolDataByMinute": {"t2": {"threadCount": 2}}}
            ]
        }))
        .unwrap();

        let ranked = rank_pools(&matrix, &columns(&["t1", "t2"]), DEFAULT_TOP_POOLS);
        let names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "e", "a", "c", "f"]);
        assert_eq!(ranked[0].counts, vec![0, 9]);
        assert_eq!(ranked[0].peak, 9);
    }

    #[test]
    fn test_state_timeline_fills_unknown() {
        let matrix: ThreadStateMatrix = serde_json::from_value(json!({
            "timestamps": ["t1", "t2"],
            "threadInfos": [
                {"threadName": "main", "states": {"t1": "RUNNABLE", "t2": "WAITING"}},
                {"threadName": "late", "states": {"t2": "BLOCKED"}}
            ]
        }))
        .unwrap();

        let rows = state_timeline(&matrix, &columns(&["t1", "t2"]));
        assert_eq!(rows[1].thread_name, "late");
        assert_eq!(rows[1].states, vec!["UNKNOWN", "BLOCKED"]);
    }

    #[test]
    fn test_state_timeline_keeps_threads_sharing_a_name() {
        let matrix: ThreadStateMatrix = serde_json::from_value(json!({
            "timestamps": ["t1"],
            "threadInfos": [
                {"threadName": "pool-1-thread-1", "states": {"t1": "RUNNABLE"}},
                {"threadName": "pool-1-thread-1", "states": {"t1": "WAITING"}}
            ]
        }))
        .unwrap();

        let rows = state_timeline(&matrix, &columns(&["t1"]));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].states, vec!["RUNNABLE"]);
        assert_eq!(rows[1].states, vec!["WAITING"]);
    }
}
