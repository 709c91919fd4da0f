use analytics_client::panels::identical_trace_labels;
use dioxus::prelude::*;
use shared_types::IdenticalStackTrace;

use super::use_minute_panel;
use crate::components::{Bar, ErrorState, LoadingState};
use crate::palette::series_color;

#[component]
pub fn IdenticalTracesPanel(file_name: String, minute: String) -> Element {
    let panel = use_minute_panel::<Vec<IdenticalStackTrace>>(file_name, minute);
    let mut expanded = use_signal(|| None::<usize>);

    let loaded = panel.read();
    let fetch = loaded.state();
    if let Some(error) = fetch.error() {
        return rsx! { ErrorState { error: error.to_string() } };
    }
    let Some(traces) = fetch.data() else {
        return rsx! { LoadingState { label: "Loading identical stack traces...".to_string() } };
    };
    let labels = identical_trace_labels(traces);
    let max = traces.iter().map(|t| t.count).max().unwrap_or(0).max(1) as f64;

    rsx! {
        div {
            class: "panel",
            h2 { class: "panel-title", "Identical Stack Trace" }
            p { class: "panel-subtitle", "Threads sharing exactly the same stack, most frequent first." }

            if traces.is_empty() {
                p { "No identical stack traces in this snapshot." }
            }

            for (i, (trace, label)) in traces.iter().zip(labels.iter()).enumerate() {
                div {
                    key: "{i}",
                    onclick: move |_| {
                        let next = if expanded() == Some(i) { None } else { Some(i) };
                        expanded.set(next);
                    },
                    style: "cursor: pointer;",
                    Bar {
                        label: label.clone(),
                        value: trace.count.to_string(),
                        fraction: trace.count as f64 / max,
                        color: series_color(i).to_string(),
                    }
                }
                if expanded() == Some(i) {
                    pre { key: "{i}-trace", class: "trace-block", "{trace.stack_trace}" }
                }
            }
        }
    }
}
