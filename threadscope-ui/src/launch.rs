use analytics_client::{ConflictDecision, UploadAttempt, UploadFlow, UploadPhase};
use dioxus::prelude::*;

use crate::api;
use crate::components::ErrorState;
use crate::interop::{clear_file_input, read_selected_file};

const FILE_INPUT_ID: &str = "dump-file-input";

fn run_attempt(mut flow: Signal<UploadFlow>, attempt: UploadAttempt, on_uploaded: EventHandler<String>) {
    spawn(async move {
        let client = api::client();
        let result = UploadFlow::send(&client, &attempt).await;
        let stored = {
            let mut flow = flow.write();
            flow.apply(&attempt, result);
            flow.file_name().map(ToString::to_string)
        };
        if let Some(file_name) = stored {
            on_uploaded.call(file_name);
        }
    });
}

#[component]
pub fn LaunchPage(on_uploaded: EventHandler<String>) -> Element {
    let mut flow = use_signal(UploadFlow::new);
    let mut read_error = use_signal(|| None::<String>);

    let on_file_change = move |_: FormEvent| {
        spawn(async move {
            match read_selected_file(FILE_INPUT_ID).await {
                Ok((name, bytes)) => {
                    read_error.set(None);
                    let attempt = flow.write().start(name, bytes);
                    if let Some(attempt) = attempt {
                        run_attempt(flow, attempt, on_uploaded);
                    }
                }
                Err(e) => {
                    dioxus_logger::tracing::warn!("Failed to read selected file: {}", e);
                    read_error.set(Some(e));
                }
            }
            clear_file_input(FILE_INPUT_ID);
        });
    };

    let mut decide = move |decision: ConflictDecision| {
        let attempt = flow.write().decide(decision);
        if let Some(attempt) = attempt {
            run_attempt(flow, attempt, on_uploaded);
        }
    };

    let phase = flow.read().phase().clone();
    let busy = phase == UploadPhase::Uploading;

    rsx! {
        div {
            class: "launch-page",
            h1 { class: "hero-title", "Thread Dump Analyzer" }
            p { class: "hero-subtitle", "Upload a thread dump archive to explore thread states, pools and stack traces over time." }

            label {
                class: if busy { "upload-button disabled" } else { "upload-button" },
                r#for: FILE_INPUT_ID,
                if busy { "Uploading..." } else { "Upload Thread Dump" }
            }
            input {
                id: FILE_INPUT_ID,
                r#type: "file",
                style: "display: none;",
                disabled: busy,
                onchange: on_file_change,
            }

            if let Some(error) = read_error() {
                ErrorState { error }
            }
            if let UploadPhase::Failed { message } = &phase {
                ErrorState { error: message.clone() }
            }

            if let UploadPhase::AwaitingDecision { existing } = &phase {
                div {
                    class: "modal-backdrop",
                    div {
                        class: "modal",
                        h2 { "File already exists" }
                        p { "A dump named \"{existing}\" has already been uploaded. Use the stored copy or replace it?" }
                        div {
                            class: "modal-actions",
                            button {
                                class: "secondary-button",
                                onclick: move |_| flow.write().cancel(),
                                "Cancel"
                            }
                            button {
                                class: "secondary-button",
                                onclick: move |_| decide(ConflictDecision::Overwrite),
                                "Overwrite"
                            }
                            button {
                                class: "primary-button",
                                onclick: move |_| decide(ConflictDecision::ReuseExisting),
                                "Use Existing"
                            }
                        }
                    }
                }
            }
        }
    }
}
