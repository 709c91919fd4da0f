use analytics_client::dashboard::{DashboardState, HOURS_IN_DAY};
use analytics_client::selection::MAX_SELECTED_MINUTES;
use analytics_client::Selection;
use dioxus::prelude::*;

use crate::api;
use crate::components::{hour_label, ErrorState, LoadingState};

fn select_hour(mut dashboard: Signal<DashboardState>, hour: u32) {
    let ticket = dashboard.write().select_hour(hour);
    spawn(async move {
        let client = api::client();
        let result = DashboardState::fetch_minutes(&client, &ticket).await;
        dashboard.write().apply_minutes(&ticket, result);
    });
}

#[component]
pub fn DashboardPage(
    file_name: String,
    restore: Option<Selection>,
    on_visualize: EventHandler<Selection>,
    on_back: EventHandler<()>,
) -> Element {
    let mut dashboard = use_signal(move || match &restore {
        Some(selection) => DashboardState::restore(selection),
        None => DashboardState::new(file_name.clone()),
    });
    let mut visualize_error = use_signal(|| None::<String>);

    // Hours for the file, plus the minutes of a restored hour.
    use_effect(move || {
        let hours_ticket = dashboard.write().load_hours();
        if let Some(ticket) = hours_ticket {
            spawn(async move {
                let client = api::client();
                let result = DashboardState::fetch_hours(&client, &ticket).await;
                dashboard.write().apply_hours(&ticket, result);
            });
        }

        let minutes_ticket = dashboard.write().resume_minutes();
        if let Some(ticket) = minutes_ticket {
            spawn(async move {
                let client = api::client();
                let result = DashboardState::fetch_minutes(&client, &ticket).await;
                dashboard.write().apply_minutes(&ticket, result);
            });
        }
    });

    let visualize = move |_: MouseEvent| match dashboard.read().visualize() {
        Ok(selection) => {
            visualize_error.set(None);
            on_visualize.call(selection);
        }
        Err(e) => visualize_error.set(Some(e.to_string())),
    };

    let state = dashboard.read();
    let hours_state = state.hours();
    let minutes_state = state.minutes();
    let selected_hour = state.selected_hour();
    let picked = state.picker().picked().len();

    rsx! {
        div {
            class: "dashboard-page",
            div {
                class: "page-header",
                button { class: "secondary-button", onclick: move |_| on_back.call(()), "Back" }
                h1 { "Dashboard" }
                span { class: "file-chip", "{state.file_name()}" }
            }

            section {
                class: "panel",
                h2 { class: "panel-title", "Select an hour" }
                if hours_state.is_loading() {
                    LoadingState { label: "Loading hours...".to_string() }
                }
                if let Some(error) = hours_state.error() {
                    ErrorState { error: error.to_string() }
                }
                div {
                    class: "hour-grid",
                    for hour in 0..HOURS_IN_DAY {
                        button {
                            key: "{hour}",
                            class: if selected_hour == Some(hour) { "hour-button selected" } else { "hour-button" },
                            disabled: !state.hour_available(hour),
                            onclick: move |_| select_hour(dashboard, hour),
                            "{hour_label(hour)}"
                        }
                    }
                }
            }

            if selected_hour.is_some() {
                section {
                    class: "panel",
                    h2 { class: "panel-title", "Select up to {MAX_SELECTED_MINUTES} timestamps" }
                    if minutes_state.is_loading() {
                        LoadingState { label: "Loading timestamps...".to_string() }
                    }
                    if let Some(error) = minutes_state.error() {
                        ErrorState { error: error.to_string() }
                    }
                    if let Some(minutes) = minutes_state.data() {
                        if minutes.is_empty() {
                            p { "No snapshots were captured in this hour." }
                        }
                        div {
                            class: "minute-grid",
                            for minute in minutes.iter() {
                                button {
                                    key: "{minute}",
                                    class: if state.picker().is_picked(minute) { "minute-button selected" } else { "minute-button" },
                                    onclick: {
                                        let minute = minute.clone();
                                        move |_| {
                                            dashboard.write().toggle_minute(&minute);
                                        }
                                    },
                                    "{minute}"
                                }
                            }
                        }
                    }
                }
            }

            if let Some(error) = visualize_error() {
                ErrorState { error }
            }

            div {
                class: "page-actions",
                span { class: "muted", "{picked} of {MAX_SELECTED_MINUTES} selected" }
                button {
                    class: "primary-button",
                    disabled: !state.can_visualize(),
                    onclick: visualize,
                    "Visualize"
                }
            }
        }
    }
}
