use analytics_client::panels::{length_severity, LengthSeverity};
use analytics_client::{DrillDown, DrillKind};
use dioxus::prelude::*;
use shared_types::StackLengthStats;

use super::{open_drill_down, use_minute_panel};
use crate::components::{Bar, ErrorState, LoadingState, TraceBlocks};

fn severity_color(category: &str) -> &'static str {
    match length_severity(category) {
        LengthSeverity::Normal => "#4caf50",
        LengthSeverity::Elevated => "#ffc107",
        LengthSeverity::Critical => "#f44336",
    }
}

#[component]
pub fn StackLengthPanel(file_name: String, minute: String) -> Element {
    let panel = use_minute_panel::<StackLengthStats>(file_name.clone(), minute.clone());
    let mut drill = use_signal(|| DrillDown::new(DrillKind::StackLength));

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
        return rsx! { LoadingState { label: "Loading stack length statistics...".to_string() } };
    };
    let total: u64 = stats.length_groups.values().sum();

    let detail = drill.read();
    let selected = detail.selected().map(ToString::to_string);

    rsx! {
        div {
            class: "panel",
            h2 { class: "panel-title", "Stack Length" }

            if stats.has_critical_stacks {
                div {
                    class: "banner",
                    style: "background: rgba(234, 179, 8, 0.12); color: #eab308;",
                    "Stack length greater than 100 can lead to StackOverflowError. Analyze its cause to avoid outages."
                }
            }

            for (category, count) in stats.length_groups.iter() {
                div {
                    key: "{category}",
                    class: if selected.as_deref() == Some(category.as_str()) { "selected-row" } else { "" },
                    style: "cursor: pointer;",
                    onclick: {
                        let file_name = file_name.clone();
                        let minute = minute.clone();
                        let category = category.clone();
                        move |_| open_drill_down(drill, &file_name, &minute, &category)
                    },
                    Bar {
                        label: category.clone(),
                        value: count.to_string(),
                        fraction: if total == 0 { 0.0 } else { *count as f64 / total as f64 },
                        color: severity_color(category).to_string(),
                    }
                }
            }

            if let Some(category) = selected {
                div {
                    class: "drill-down",
                    h3 { "Stack traces with length {category}" }
                    if detail.state().is_loading() {
                        LoadingState { label: "Loading stack traces...".to_string() }
                    } else if let Some(error) = detail.state().error() {
                        ErrorState { error: error.to_string() }
                    } else {
                        TraceBlocks {
                            traces: detail.state().data().cloned().unwrap_or_default(),
                            empty: "No stack traces found in this category.".to_string(),
                        }
                    }
                }
            }
        }
    }
}
