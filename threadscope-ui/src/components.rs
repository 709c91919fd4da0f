use dioxus::prelude::*;

use crate::palette::state_color;

pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn hour_label(hour: u32) -> String {
    format!("{hour:02}:00")
}

#[component]
pub fn LoadingState(label: String) -> Element {
    rsx! {
        div {
            style: "display: flex; align-items: center; justify-content: center; padding: 2rem; color: var(--text-muted, #6b7280);",
            "{label}"
        }
    }
}

#[component]
pub fn ErrorState(error: String) -> Element {
    rsx! {
        div {
            style: "padding: 1rem; border-radius: 0.5rem; background: rgba(239, 68, 68, 0.1); color: var(--danger-text, #ef4444);",
            "{error}"
        }
    }
}

#[component]
pub fn Notice(title: String, body: String) -> Element {
    rsx! {
        div {
            class: "panel",
            h2 { class: "panel-title", "{title}" }
            p { style: "color: var(--text-secondary, #9ca3af); line-height: 1.5;", "{body}" }
        }
    }
}

#[component]
pub fn StateBadge(state: String) -> Element {
    let color = state_color(&state);
    rsx! {
        span {
            style: "display: inline-flex; align-items: center; gap: 0.35rem; font-size: 0.8rem;",
            span { style: "width: 0.6rem; height: 0.6rem; border-radius: 9999px; background: {color};" }
            "{state}"
        }
    }
}

/// Horizontal bar for simple charts; `fraction` is clamped to `0.0..=1.0`.
#[component]
pub fn Bar(label: String, value: String, fraction: f64, color: String) -> Element {
    let width = (fraction.clamp(0.0, 1.0) * 100.0).round();
    rsx! {
        div {
            style: "display: grid; grid-template-columns: 14rem 1fr 4rem; align-items: center; gap: 0.5rem; margin: 0.2rem 0;",
            span { style: "overflow: hidden; text-overflow: ellipsis; white-space: nowrap;", title: "{label}", "{label}" }
            div {
                style: "background: var(--bg-secondary, #1e293b); border-radius: 0.25rem; height: 0.9rem;",
                div { style: "width: {width}%; height: 100%; border-radius: 0.25rem; background: {color};" }
            }
            span { style: "text-align: right; font-variant-numeric: tabular-nums;", "{value}" }
        }
    }
}

/// Raw stack traces, one `<pre>` per trace.
#[component]
pub fn TraceBlocks(traces: Vec<String>, empty: String) -> Element {
    if traces.is_empty() {
        return rsx! {
            p { style: "color: var(--text-muted, #6b7280);", "{empty}" }
        };
    }
    rsx! {
        div {
            for (i, trace) in traces.iter().enumerate() {
                pre { key: "{i}", class: "trace-block", "{trace}" }
            }
        }
    }
}
