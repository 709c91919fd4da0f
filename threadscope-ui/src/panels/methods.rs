use analytics_client::{DrillDown, DrillKind};
use dioxus::prelude::*;
use shared_types::LastExecutedMethods;

use super::{open_drill_down, use_minute_panel};
use crate::components::{percent, ErrorState, LoadingState, TraceBlocks};

#[component]
pub fn LastExecutedMethodsPanel(file_name: String, minute: String) -> Element {
    let panel = use_minute_panel::<LastExecutedMethods>(file_name.clone(), minute.clone());
    let mut drill = use_signal(|| DrillDown::new(DrillKind::Method));

    use_effect(use_reactive!(|file_name, minute| {
        let _ = (file_name, minute);
        drill.write().close();
    }));

    let loaded = panel.read();
    let fetch = loaded.state();
    if let Some(error) = fetch.error() {
        return rsx! { ErrorState { error: error.to_string() } };
    }
    let Some(stats) = fetch.data() else {
        return rsx! { LoadingState { label: "Loading last executed methods...".to_string() } };
    };

    let detail = drill.read();
    let selected = detail.selected().map(ToString::to_string);

    rsx! {
        div {
            class: "panel",
            h2 { class: "panel-title", "Last Executed Methods" }
            p { class: "panel-subtitle", "Methods threads were executing when the dump was captured. Click a method to see its traces." }

            table {
                class: "data-table",
                thead {
                    tr {
                        th { "Method" }
                        th { "Threads" }
                        th { "Share" }
                    }
                }
                tbody {
                    for stat in stats.methods.iter() {
                        tr {
                            key: "{stat.method}",
                            class: if selected.as_deref() == Some(stat.method.as_str()) { "selected-row" } else { "" },
                            td {
                                button {
                                    class: "link-button",
                                    onclick: {
                                        let file_name = file_name.clone();
                                        let minute = minute.clone();
                                        let method = stat.method.clone();
                                        move |_| open_drill_down(drill, &file_name, &minute, &method)
                                    },
                                    "{stat.method}"
                                }
                            }
                            td { "{stat.count}" }
                            td { "{percent(stat.percentage)}" }
                        }
                    }
                }
            }

            if let Some(method) = selected {
                div {
                    class: "drill-down",
                    h3 { "Stack traces for {method}" }
                    if detail.state().is_loading() {
                        LoadingState { label: "Loading stack traces...".to_string() }
                    } else if let Some(error) = detail.state().error() {
                        ErrorState { error: error.to_string() }
                    } else {
                        TraceBlocks {
                            traces: detail.state().data().cloned().unwrap_or_default(),
                            empty: "No stack traces found for this method.".to_string(),
                        }
                    }
                }
            }
        }
    }
}
