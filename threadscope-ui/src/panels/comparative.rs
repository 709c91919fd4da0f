use analytics_client::Aggregator;
use dioxus::prelude::*;
use shared_types::{Timestamp, TOTAL_THREADS_ROW};

use crate::api;
use crate::components::{Bar, ErrorState, LoadingState};
use crate::palette::{series_color, state_color};

#[component]
pub fn ComparativePanel(file_name: String, minutes: Vec<Timestamp>, top_pools: usize) -> Element {
    let mut aggregator = use_signal(move || Aggregator::with_top_pools(top_pools));

    use_effect(use_reactive!(|file_name, minutes| {
        let Some(tickets) = aggregator.write().sync(&file_name, &minutes) else {
            return;
        };
        let key = tickets.summary.key().clone();

        let summary_ticket = tickets.summary.clone();
        let summary_key = key.clone();
        spawn(async move {
            let client = api::client();
            let result = client
                .thread_summary(&summary_key.file_name, &summary_key.minutes)
                .await;
            aggregator.write().apply_summary(&summary_ticket, result);
        });

        let states_ticket = tickets.states.clone();
        let states_key = key.clone();
        spawn(async move {
            let client = api::client();
            let result = client
                .comparative_thread_state(&states_key.file_name, &states_key.minutes)
                .await;
            aggregator.write().apply_states(&states_ticket, result);
        });

        let pools_ticket = tickets.pools;
        spawn(async move {
            let client = api::client();
            let result = client
                .comparative_thread_pool(&key.file_name, &key.minutes)
                .await;
            aggregator.write().apply_pools(&pools_ticket, result);
        });
    }));

    let agg = aggregator.read();
    let comparison = agg.comparison_table();
    let timeline = agg.state_timeline();
    let pools = agg.top_pools();
    let peak = pools
        .as_ref()
        .and_then(|p| p.iter().map(|pool| pool.peak).max())
        .unwrap_or(0)
        .max(1) as f64;

    rsx! {
        div {
            class: "panel",
            h2 { class: "panel-title", "Comparative Analysis" }

            if let Some(error) = agg.error() {
                ErrorState { error: error.to_string() }
            }
            if agg.loading() {
                LoadingState { label: "Loading comparison...".to_string() }
            }

            if let Some(comparison) = comparison {
                h3 { "Thread count by state" }
                table {
                    class: "data-table",
                    thead {
                        tr {
                            th { "State" }
                            for timestamp in comparison.timestamps().iter() {
                                th { key: "{timestamp}", "{timestamp}" }
                            }
                        }
                    }
                    tbody {
                        for row in comparison.rows() {
                            tr {
                                key: "{row.state}",
                                class: if row.state == TOTAL_THREADS_ROW { "total-row" } else { "" },
                                td {
                                    if row.state == TOTAL_THREADS_ROW {
                                        "{row.state}"
                                    } else {
                                        span {
                                            style: "display: inline-flex; align-items: center; gap: 0.35rem;",
                                            span { class: "swatch", style: "background: {state_color(&row.state)};" }
                                            "{row.state}"
                                        }
                                    }
                                }
                                for (i, count) in row.counts.iter().enumerate() {
                                    td { key: "{i}", "{count}" }
                                }
                            }
                        }
                    }
                }
            }

            if let Some(pools) = pools {
                h3 { "Top {pools.len()} thread pools" }
                for (i, pool) in pools.iter().enumerate() {
                    div {
                        key: "{pool.name}",
                        Bar {
                            label: pool.name.clone(),
                            value: pool.peak.to_string(),
                            fraction: pool.peak as f64 / peak,
                            color: series_color(i).to_string(),
                        }
                        div {
                            style: "font-size: 0.75rem; color: var(--text-muted, #6b7280); margin: 0 0 0.5rem 14.5rem;",
                            for (timestamp, count) in minutes.iter().zip(pool.counts.iter()) {
                                span { key: "{timestamp}", style: "margin-right: 1rem;", "{timestamp}: {count}" }
                            }
                        }
                    }
                }
            }

            if let Some(rows) = timeline {
                h3 { "Thread state over time" }
                table {
                    class: "data-table",
                    thead {
                        tr {
                            th { "Thread" }
                            for timestamp in minutes.iter() {
                                th { key: "{timestamp}", "{timestamp}" }
                            }
                        }
                    }
                    tbody {
                        for (row_index, row) in rows.iter().enumerate() {
                            tr {
                                key: "{row_index}",
                                td { "{row.thread_name}" }
                                for (i, state) in row.states.iter().enumerate() {
                                    td {
                                        key: "{i}",
                                        style: "background: {state_color(state)}; color: #111827;",
                                        "{state}"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
