use analytics_client::panels::pool_shares;
use dioxus::prelude::*;
use shared_types::ThreadPoolStatistic;

use super::use_minute_panel;
use crate::components::{percent, Bar, ErrorState, LoadingState, StateBadge};
use crate::palette::series_color;

#[component]
pub fn ThreadPoolPanel(file_name: String, minute: String) -> Element {
    let panel = use_minute_panel::<Vec<ThreadPoolStatistic>>(file_name, minute);

    let loaded = panel.read();
    let fetch = loaded.state();
    if let Some(error) = fetch.error() {
        return rsx! { ErrorState { error: error.to_string() } };
    }
    let Some(stats) = fetch.data() else {
        return rsx! { LoadingState { label: "Loading thread pool statistics...".to_string() } };
    };
    let shares = pool_shares(stats);

    rsx! {
        div {
            class: "panel",
            h2 { class: "panel-title", "Thread Pool Statistics" }

            div {
                class: "chart",
                for (i, share) in shares.iter().enumerate() {
                    Bar {
                        key: "{share.name}",
                        label: share.name.clone(),
                        value: percent(share.percentage),
                        fraction: share.percentage / 100.0,
                        color: series_color(i).to_string(),
                    }
                }
            }

            table {
                class: "data-table",
                thead {
                    tr {
                        th { "" }
                        th { "Thread Pool" }
                        th { "Count" }
                        th { "States" }
                    }
                }
                tbody {
                    for (i, pool) in stats.iter().enumerate() {
                        tr {
                            key: "{pool.thread_pool}",
                            td { span { class: "swatch", style: "background: {series_color(i)};" } }
                            td { "{pool.thread_pool}" }
                            td { "{pool.count}" }
                            td {
                                for (state, count) in pool.state_counts.iter() {
                                    span {
                                        key: "{state}",
                                        style: "margin-right: 0.75rem;",
                                        StateBadge { state: state.clone() }
                                        " {count}"
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
