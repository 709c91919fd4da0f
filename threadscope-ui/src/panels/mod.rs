//! One component per analytics panel.

mod comparative;
mod gc;
mod identical;
mod methods;
mod pools;
mod stack_length;
mod summary;

pub use comparative::ComparativePanel;
pub use gc::GcThreadsPanel;
pub use identical::IdenticalTracesPanel;
pub use methods::LastExecutedMethodsPanel;
pub use pools::ThreadPoolPanel;
pub use stack_length::StackLengthPanel;
pub use summary::ThreadSummaryPanel;

use analytics_client::panels::{DetailKey, DrillDown, MinutePanel, PanelSource};
use analytics_client::Ticket;
use dioxus::prelude::*;

use crate::api;
use crate::components::Notice;

/// A [`MinutePanel`] that refetches whenever `(file_name, minute)` changes.
pub fn use_minute_panel<D: PanelSource + 'static>(
    file_name: String,
    minute: String,
) -> Signal<MinutePanel<D>> {
    let mut panel = use_signal(MinutePanel::<D>::new);

    use_effect(use_reactive!(|(file_name, minute)| {
        let Some(ticket) = panel.write().sync(&file_name, &minute) else {
            return;
        };
        spawn(async move {
            let client = api::client();
            let result = MinutePanel::<D>::fetch(&client, &ticket).await;
            panel.write().apply(&ticket, result);
        });
    }));

    panel
}

/// Fetch the traces behind a clicked row.
pub fn open_drill_down(mut drill: Signal<DrillDown>, file_name: &str, minute: &str, selector: &str) {
    let ticket: Ticket<DetailKey> = drill.write().open(file_name, minute, selector);
    let kind = drill.read().kind();
    spawn(async move {
        let client = api::client();
        let result = kind.fetch(&client, &ticket).await;
        drill.write().apply(&ticket, result);
    });
}

#[component]
pub fn BlockingThreadsPanel() -> Element {
    rsx! {
        Notice {
            title: "Blocking Threads".to_string(),
            body: "Threads which block other threads' execution are shown here; they make an application unresponsive. The blocking graph cannot be computed for this dump format because thread ids are not recorded.".to_string(),
        }
    }
}

#[component]
pub fn DeadlockPanel() -> Element {
    rsx! {
        Notice {
            title: "Deadlock".to_string(),
            body: "A deadlock occurs when two or more threads wait on each other indefinitely for resources. Deadlocks cannot be identified for this dump format because thread ids are not recorded.".to_string(),
        }
    }
}
