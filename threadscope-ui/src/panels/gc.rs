use dioxus::prelude::*;
use shared_types::{GcThreadCount, GC_THREAD_WARNING_THRESHOLD};

use super::use_minute_panel;
use crate::components::{ErrorState, LoadingState};

#[component]
pub fn GcThreadsPanel(file_name: String, minute: String) -> Element {
    let panel = use_minute_panel::<GcThreadCount>(file_name, minute);

    let loaded = panel.read();
    let fetch = loaded.state();
    if let Some(error) = fetch.error() {
        return rsx! { ErrorState { error: error.to_string() } };
    }
    let Some(gc) = fetch.data().copied() else {
        return rsx! { LoadingState { label: "Loading GC threads...".to_string() } };
    };

    let (banner_style, banner) = if gc.is_high() {
        (
            "background: rgba(234, 179, 8, 0.12); color: #eab308;",
            format!(
                "High GC thread count ({}), above {GC_THREAD_WARNING_THRESHOLD}; consider investigating",
                gc.gc_thread_count
            ),
        )
    } else {
        (
            "background: rgba(16, 185, 129, 0.12); color: #10b981;",
            "GC thread count is normal".to_string(),
        )
    };

    rsx! {
        div {
            class: "panel",
            h2 { class: "panel-title", "GC Threads" }
            p { class: "panel-subtitle", "Garbage collection threads reported in this snapshot." }
            div { class: "banner", style: "{banner_style}", "{banner}" }
            div {
                class: "tile",
                style: "max-width: 12rem; text-align: center;",
                span { class: "tile-label", "GC Threads" }
                span { class: "tile-value", "{gc.gc_thread_count}" }
            }
        }
    }
}
