//! Infinite-scrolling list of raw traces for one thread state.

use analytics_client::{PageRequest, Paginator, PaginatorPhase, TraceKey};
use dioxus::prelude::*;
use shared_types::Timestamp;

use crate::api;
use crate::components::{ErrorState, StateBadge};
use crate::interop::ViewportObserver;

/// Element id of the last rendered trace; the viewport observer watches it.
pub const SENTINEL_ID: &str = "trace-sentinel";

fn load_page(mut paginator: Signal<Paginator>, request: PageRequest) {
    spawn(async move {
        let client = api::client();
        let result = Paginator::fetch(&client, &request).await;
        paginator.write().apply(&request, result);
    });
}

#[component]
pub fn TraceList(file_name: String, minutes: Vec<Timestamp>, state: String) -> Element {
    let mut paginator = use_signal(Paginator::new);
    let mut observer = use_signal(|| None::<ViewportObserver>);
    let visible = use_signal(|| 0u64);
    let mut attached_at = use_signal(|| 0usize);

    use_effect(use_reactive!(|file_name, minutes, state| {
        observer.set(None);
        let key = TraceKey {
            file_name,
            minutes,
            state,
        };
        let request = paginator.write().select(key);
        if let Some(request) = request {
            load_page(paginator, request);
        }
    }));

    // Each time the sentinel comes into view, ask for the next page.
    use_effect(move || {
        if visible() == 0 {
            return;
        }
        let request = paginator.write().on_viewport_signal();
        if let Some(request) = request {
            load_page(paginator, request);
        }
    });

    // Follow the sentinel as pages are appended; stop once exhausted. A failed
    // page keeps the current observer, so only a fresh intersection retries it.
    use_effect(move || {
        let (count, phase) = {
            let pager = paginator.read();
            (pager.traces().len(), pager.phase())
        };
        if count == 0 || matches!(phase, PaginatorPhase::Idle | PaginatorPhase::Exhausted) {
            observer.set(None);
            attached_at.set(0);
            return;
        }
        if count == *attached_at.peek() {
            return;
        }
        let mut visible = visible;
        observer.set(ViewportObserver::observe(SENTINEL_ID, move || {
            *visible.write() += 1;
        }));
        attached_at.set(count);
    });

    let pager = paginator.read();
    let last = pager.traces().len().saturating_sub(1);

    rsx! {
        div {
            class: "trace-list",
            div {
                style: "display: flex; align-items: center; gap: 0.75rem; margin-bottom: 0.75rem;",
                h3 { style: "margin: 0;", "Stack traces" }
                StateBadge { state: state.clone() }
                span { style: "color: var(--text-muted, #6b7280); font-size: 0.8rem;", "{pager.traces().len()} loaded" }
            }

            for (i, trace) in pager.traces().iter().enumerate() {
                pre {
                    key: "{i}",
                    id: if i == last { SENTINEL_ID } else { "" },
                    class: "trace-block",
                    "{trace}"
                }
            }

            if let Some(error) = pager.last_error() {
                ErrorState { error: error.to_string() }
                if !pager.is_loading() {
                    button {
                        class: "secondary-button",
                        onclick: move |_| {
                            let request = paginator.write().retry();
                            if let Some(request) = request {
                                load_page(paginator, request);
                            }
                        },
                        "Retry"
                    }
                }
            }
            match pager.phase() {
                PaginatorPhase::Loading { .. } => rsx! {
                    p { class: "trace-status", "Loading more traces..." }
                },
                PaginatorPhase::Exhausted if pager.traces().is_empty() => rsx! {
                    p { class: "trace-status", "No stack traces in this state." }
                },
                PaginatorPhase::Exhausted => rsx! {
                    p { class: "trace-status", "End of traces." }
                },
                _ => rsx! {},
            }
        }
    }
}
