use analytics_client::Selection;
use dioxus::launch;
use dioxus::prelude::*;
use dioxus_logger::tracing::Level;

use threadscope_ui::{AnalyticsPage, DashboardPage, LaunchPage};

fn main() {
    // Initialize logging for WASM
    wasm_logger::init(wasm_logger::Config::default());
    dioxus_logger::init(Level::INFO).ok();

    launch(App);
}

#[derive(Debug, Clone, PartialEq)]
enum Page {
    Launch,
    Dashboard {
        file_name: String,
        restore: Option<Selection>,
    },
    Analytics(Selection),
}

#[component]
fn App() -> Element {
    let mut page = use_signal(|| Page::Launch);

    let body = match page() {
        Page::Launch => rsx! {
            LaunchPage {
                on_uploaded: move |file_name: String| {
                    page.set(Page::Dashboard { file_name, restore: None });
                }
            }
        },
        Page::Dashboard { file_name, restore } => rsx! {
            DashboardPage {
                key: "{file_name}",
                file_name: file_name.clone(),
                restore,
                on_visualize: move |selection: Selection| page.set(Page::Analytics(selection)),
                on_back: move |_| page.set(Page::Launch),
            }
        },
        Page::Analytics(selection) => {
            let back_to = selection.clone();
            rsx! {
                AnalyticsPage {
                    selection,
                    on_back: move |_| {
                        page.set(Page::Dashboard {
                            file_name: back_to.file_name().to_string(),
                            restore: Some(back_to.clone()),
                        });
                    },
                }
            }
        }
    };

    rsx! {
        style { {APP_STYLES} }
        div {
            class: "app-shell",
            header {
                class: "app-header",
                span { class: "brand", "ThreadScope" }
                span { class: "muted", "Thread dump analytics" }
            }
            div { class: "app-body", {body} }
            footer { class: "app-footer", "Snapshots are analysed server-side; this view only renders results." }
        }
    }
}

const APP_STYLES: &str = r#"
:root {
    --bg-primary: #0f172a;
    --bg-secondary: #1e293b;
    --text-primary: #f8fafc;
    --text-secondary: #94a3b8;
    --text-muted: #64748b;
    --accent-bg: #3b82f6;
    --accent-bg-hover: #2563eb;
    --accent-text: #ffffff;
    --border-color: #334155;
    --hover-bg: rgba(255, 255, 255, 0.1);
    --danger-bg: #ef4444;
    --warning-bg: #f59e0b;
    --success-bg: #10b981;
    --radius-sm: 4px;
    --radius-md: 8px;
    --radius-lg: 12px;
    --shadow-lg: 0 10px 40px rgba(0, 0, 0, 0.5);
}

body {
    margin: 0;
    background: var(--bg-primary);
    color: var(--text-primary);
    font-family: system-ui, -apple-system, sans-serif;
}

.app-shell { min-height: 100vh; display: flex; flex-direction: column; }
.app-header {
    display: flex; align-items: baseline; gap: 1rem;
    padding: 0.75rem 1.5rem;
    border-bottom: 1px solid var(--border-color);
    background: var(--bg-secondary);
}
.brand { font-weight: 700; font-size: 1.1rem; }
.app-body { flex: 1; padding: 1.5rem; }
.app-footer {
    padding: 0.75rem 1.5rem;
    font-size: 0.75rem;
    color: var(--text-muted);
    border-top: 1px solid var(--border-color);
}
.muted { color: var(--text-muted); font-size: 0.85rem; }

.launch-page { max-width: 40rem; margin: 4rem auto; text-align: center; }
.hero-title { font-size: 2.25rem; margin-bottom: 0.5rem; }
.hero-subtitle { color: var(--text-secondary); margin-bottom: 2rem; }

.page-header { display: flex; align-items: center; gap: 1rem; margin-bottom: 1rem; }
.page-header h1 { margin: 0; font-size: 1.5rem; }
.file-chip {
    padding: 0.2rem 0.6rem;
    border-radius: var(--radius-sm);
    background: var(--bg-secondary);
    color: var(--text-secondary);
    font-family: monospace;
}
.page-actions { display: flex; justify-content: flex-end; align-items: center; gap: 1rem; margin-top: 1rem; }

.primary-button, .secondary-button, .upload-button, .link-button, .hour-button, .minute-button, .nav-item {
    border: none;
    border-radius: var(--radius-md);
    cursor: pointer;
    font: inherit;
}
.primary-button, .upload-button {
    background: var(--accent-bg);
    color: var(--accent-text);
    padding: 0.6rem 1.2rem;
}
.primary-button:hover, .upload-button:hover { background: var(--accent-bg-hover); }
.primary-button:disabled, .upload-button.disabled { opacity: 0.5; cursor: not-allowed; }
.upload-button { display: inline-block; }
.secondary-button {
    background: transparent;
    color: var(--text-primary);
    border: 1px solid var(--border-color);
    padding: 0.5rem 1rem;
}
.secondary-button:hover { background: var(--hover-bg); }
.link-button { background: none; color: var(--accent-bg); padding: 0; text-decoration: underline; }

.hour-grid, .minute-grid { display: flex; flex-wrap: wrap; gap: 0.5rem; }
.hour-button, .minute-button {
    background: var(--bg-primary);
    color: var(--text-primary);
    border: 1px solid var(--border-color);
    padding: 0.4rem 0.7rem;
    font-family: monospace;
}
.hour-button:disabled { opacity: 0.3; cursor: not-allowed; }
.hour-button.selected, .minute-button.selected { background: var(--accent-bg); border-color: var(--accent-bg); }

.analytics-layout { display: flex; gap: 1.5rem; align-items: flex-start; }
.panel-nav { display: flex; flex-direction: column; gap: 0.25rem; min-width: 14rem; }
.nav-item { background: transparent; color: var(--text-secondary); text-align: left; padding: 0.5rem 0.75rem; }
.nav-item:hover { background: var(--hover-bg); }
.nav-item.active { background: var(--bg-secondary); color: var(--text-primary); }
.panel-host { flex: 1; min-width: 0; }
.timestamp-picker { display: flex; align-items: center; gap: 0.5rem; margin-bottom: 1rem; }

.panel {
    background: var(--bg-secondary);
    border: 1px solid var(--border-color);
    border-radius: var(--radius-lg);
    padding: 1.25rem;
    margin-bottom: 1rem;
}
.panel-title { margin: 0 0 0.75rem 0; font-size: 1.15rem; }
.panel-subtitle { margin: -0.5rem 0 1rem 0; color: var(--text-secondary); font-size: 0.85rem; }

.tile-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(10rem, 1fr)); gap: 0.75rem; }
.tile { background: var(--bg-primary); border-radius: var(--radius-md); padding: 0.75rem; }
.tile-label { color: var(--text-secondary); font-size: 0.8rem; }
.tile-value { font-size: 1.5rem; font-weight: 600; }
.tile-note { color: var(--text-muted); font-size: 0.75rem; }

.data-table { width: 100%; border-collapse: collapse; font-size: 0.85rem; margin-bottom: 1rem; }
.data-table th, .data-table td { padding: 0.4rem 0.6rem; border-bottom: 1px solid var(--border-color); text-align: left; }
.data-table th { color: var(--text-secondary); font-weight: 500; }
.total-row td { font-weight: 700; border-top: 2px solid var(--border-color); }
.selected-row td, div.selected-row { background: rgba(59, 130, 246, 0.15); }
.swatch { display: inline-block; width: 0.75rem; height: 0.75rem; border-radius: 2px; }

.banner {
    padding: 0.6rem 0.9rem;
    border-radius: var(--radius-md);
    background: rgba(239, 68, 68, 0.15);
    border: 1px solid var(--danger-bg);
    margin-bottom: 1rem;
}
.chart { margin: 0.5rem 0 1rem 0; }

.trace-list { display: flex; flex-direction: column; gap: 0.5rem; margin-top: 0.75rem; }
.trace-block {
    margin: 0;
    padding: 0.75rem;
    background: var(--bg-primary);
    border-radius: var(--radius-md);
    font-size: 0.75rem;
    white-space: pre-wrap;
    overflow-x: auto;
}
.trace-status { color: var(--text-muted); font-size: 0.8rem; padding: 0.5rem 0; text-align: center; }
.drill-down { margin-top: 1rem; border-top: 1px solid var(--border-color); padding-top: 0.75rem; }

.modal-backdrop {
    position: fixed; inset: 0;
    background: rgba(0, 0, 0, 0.6);
    display: flex; align-items: center; justify-content: center;
}
.modal {
    background: var(--bg-secondary);
    border-radius: var(--radius-lg);
    padding: 1.5rem;
    max-width: 28rem;
    box-shadow: var(--shadow-lg);
    text-align: left;
}
.modal-actions { display: flex; justify-content: flex-end; gap: 0.5rem; margin-top: 1rem; }
"#;
