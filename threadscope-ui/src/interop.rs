use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlInputElement, IntersectionObserver, IntersectionObserverEntry};

/// Watches one element and calls back whenever it scrolls into view.
/// Disconnects when dropped.
pub struct ViewportObserver {
    observer: IntersectionObserver,
    _on_intersect: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl ViewportObserver {
    /// `None` when the element is not in the document (yet).
    pub fn observe(element_id: &str, mut on_visible: impl FnMut() + 'static) -> Option<Self> {
        let element = web_sys::window()?
            .document()?
            .get_element_by_id(element_id)?;

        let on_intersect = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                let visible = entries.iter().any(|entry| {
                    entry
                        .dyn_into::<IntersectionObserverEntry>()
                        .map(|e| e.is_intersecting())
                        .unwrap_or(false)
                });
                if visible {
                    on_visible();
                }
            },
        )
            as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let observer = match IntersectionObserver::new(on_intersect.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(e) => {
                dioxus_logger::tracing::error!("Failed to create IntersectionObserver: {:?}", e);
                return None;
            }
        };
        observer.observe(&element);

        Some(Self {
            observer,
            _on_intersect: on_intersect,
        })
    }
}

impl Drop for ViewportObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Name and contents of the first file picked in `<input type="file" id=...>`.
pub async fn read_selected_file(input_id: &str) -> Result<(String, Vec<u8>), String> {
    let input = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(input_id))
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        .ok_or_else(|| "file input unavailable".to_string())?;

    let file = input
        .files()
        .and_then(|files| files.get(0))
        .ok_or_else(|| "no file selected".to_string())?;

    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read file: {e:?}"))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok((file.name(), bytes))
}

/// Reset a file input so picking the same file again fires `change`.
pub fn clear_file_input(input_id: &str) {
    if let Some(input) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(input_id))
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_value("");
    }
}
