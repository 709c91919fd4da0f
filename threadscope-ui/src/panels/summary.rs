use analytics_client::summary::NO_DATA_MESSAGE;
use analytics_client::{FetchState, SummaryLoader};
use dioxus::prelude::*;
use shared_types::ThreadSummary;

use crate::api;
use crate::components::{percent, ErrorState, LoadingState, Notice};
use crate::palette::state_color;
use crate::traces::TraceList;

#[derive(Debug, PartialEq)]
enum SummaryView<'a> {
    Loading,
    Failed(&'a str),
    /// Ready, but the response had no entry for the minute.
    Empty,
    Loaded(&'a ThreadSummary),
}

fn summary_view(fetch: &FetchState<ThreadSummary>) -> SummaryView<'_> {
    if let Some(error) = fetch.error() {
        return SummaryView::Failed(error);
    }
    match fetch.data() {
        Some(summary) => SummaryView::Loaded(summary),
        None if fetch.is_ready() => SummaryView::Empty,
        None => SummaryView::Loading,
    }
}

#[component]
pub fn ThreadSummaryPanel(file_name: String, minute: String) -> Element {
    let mut loader = use_signal(SummaryLoader::new);
    let mut trace_state = use_signal(|| None::<String>);

    use_effect(use_reactive!(|file_name, minute| {
        let Some(ticket) = loader.write().sync(&file_name, &[minute]) else {
            return;
        };
        spawn(async move {
            let client = api::client();
            let result = SummaryLoader::fetch(&client, &ticket).await;
            loader.write().apply(&ticket, result);
        });
    }));

    let loaded = loader.read();
    let fetch = loaded.state();
    let summary = match summary_view(fetch) {
        SummaryView::Loading => {
            return rsx! { LoadingState { label: "Loading thread summary...".to_string() } };
        }
        SummaryView::Failed(error) => {
            return rsx! { ErrorState { error: error.to_string() } };
        }
        SummaryView::Empty => {
            return rsx! {
                Notice {
                    title: "Thread Summary Count".to_string(),
                    body: NO_DATA_MESSAGE.to_string(),
                }
            };
        }
        SummaryView::Loaded(summary) => summary,
    };

    rsx! {
        div {
            class: "panel",
            h2 { class: "panel-title", "Thread Summary Count" }
            p { class: "panel-subtitle", "Snapshot {minute}" }

            div {
                class: "tile-grid",
                div {
                    class: "tile",
                    span { class: "tile-label", "Total Threads" }
                    span { class: "tile-value", "{summary.total_threads}" }
                }
                div {
                    class: "tile",
                    span { class: "tile-label", "Daemon" }
                    span { class: "tile-value", "{summary.daemon_thread_count}" }
                    span { class: "tile-note", "{percent(summary.daemon_thread_percentage)}" }
                }
                div {
                    class: "tile",
                    span { class: "tile-label", "Non-daemon" }
                    span { class: "tile-value", "{summary.non_daemon_thread_count}" }
                    span { class: "tile-note", "{percent(summary.non_daemon_thread_percentage)}" }
                }
            }

            div {
                class: "tile-grid",
                for entry in summary.thread_states.iter() {
                    div {
                        key: "{entry.state}",
                        class: "tile",
                        style: "border-top: 3px solid {state_color(&entry.state)};",
                        span { class: "tile-label", "{entry.state}" }
                        span { class: "tile-value", "{entry.count}" }
                        span { class: "tile-note", "{percent(entry.percentage)}" }
                        button {
                            class: "link-button",
                            disabled: entry.count == 0,
                            onclick: {
                                let state = entry.state.clone();
                                move |_| trace_state.set(Some(state.clone()))
                            },
                            "View Traces"
                        }
                    }
                }
            }

            if let Some(state) = trace_state() {
                TraceList {
                    file_name: file_name.clone(),
                    minutes: vec![minute.clone()],
                    state,
                }
            }
        }
    }
}
