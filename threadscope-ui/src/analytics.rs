use analytics_client::comparison::DEFAULT_TOP_POOLS;
use analytics_client::{Panel, Selection, ViewController};
use dioxus::prelude::*;

use crate::components::{hour_label, ErrorState};
use crate::panels::{
    BlockingThreadsPanel, ComparativePanel, DeadlockPanel, GcThreadsPanel, IdenticalTracesPanel,
    LastExecutedMethodsPanel, StackLengthPanel, ThreadPoolPanel, ThreadSummaryPanel,
};

#[component]
pub fn AnalyticsPage(
    selection: Selection,
    top_pools: Option<usize>,
    on_back: EventHandler<()>,
) -> Element {
    let mut controller = use_signal(move || ViewController::new(selection.clone()));
    let mut picker_error = use_signal(|| None::<String>);

    let view = controller.read();
    let file_name = view.selection().file_name().to_string();
    let minutes = view.selection().minutes().to_vec();
    let hour = view.selection().hour();
    let active_panel = view.active_panel();
    let active_minute = view.active_timestamp().to_string();
    let panels = view.panels();
    let show_picker = view.shows_timestamp_picker();
    drop(view);

    rsx! {
        div {
            class: "analytics-page",
            div {
                class: "page-header",
                button { class: "secondary-button", onclick: move |_| on_back.call(()), "Back to Dashboard" }
                h1 { "Analytics" }
                span { class: "file-chip", "{file_name} · {hour_label(hour)}" }
            }

            div {
                class: "analytics-layout",
                nav {
                    class: "panel-nav",
                    for panel in panels {
                        button {
                            key: "{panel.title()}",
                            class: if panel == active_panel { "nav-item active" } else { "nav-item" },
                            onclick: move |_| {
                                controller.write().select_panel(panel);
                            },
                            "{panel.title()}"
                        }
                    }
                }

                main {
                    class: "panel-host",
                    if show_picker {
                        div {
                            class: "timestamp-picker",
                            span { class: "muted", "Timestamp" }
                            for minute in minutes.iter() {
                                button {
                                    key: "{minute}",
                                    class: if *minute == active_minute { "minute-button selected" } else { "minute-button" },
                                    onclick: {
                                        let minute = minute.clone();
                                        move |_| match controller.write().set_active_timestamp(&minute) {
                                            Ok(_) => picker_error.set(None),
                                            Err(e) => picker_error.set(Some(e.to_string())),
                                        }
                                    },
                                    "{minute}"
                                }
                            }
                        }
                    }
                    if let Some(error) = picker_error() {
                        ErrorState { error }
                    }

                    match active_panel {
                        Panel::ComparativeAnalysis => rsx! {
                            ComparativePanel {
                                file_name: file_name.clone(),
                                minutes: minutes.clone(),
                                top_pools: top_pools.unwrap_or(DEFAULT_TOP_POOLS),
                            }
                        },
                        Panel::ThreadSummaryCount => rsx! {
                            ThreadSummaryPanel { file_name: file_name.clone(), minute: active_minute.clone() }
                        },
                        Panel::ThreadPoolStatistics => rsx! {
                            ThreadPoolPanel { file_name: file_name.clone(), minute: active_minute.clone() }
                        },
                        Panel::IdenticalStackTraces => rsx! {
                            IdenticalTracesPanel { file_name: file_name.clone(), minute: active_minute.clone() }
                        },
                        Panel::LastExecutedMethods => rsx! {
                            LastExecutedMethodsPanel { file_name: file_name.clone(), minute: active_minute.clone() }
                        },
                        Panel::BlockingThreads => rsx! { BlockingThreadsPanel {} },
                        Panel::GcThreads => rsx! {
                            GcThreadsPanel { file_name: file_name.clone(), minute: active_minute.clone() }
                        },
                        Panel::StackLength => rsx! {
                            StackLengthPanel { file_name: file_name.clone(), minute: active_minute.clone() }
                        },
                        Panel::Deadlock => rsx! { DeadlockPanel {} },
                    }
                }
            }
        }
    }
}
