use std::sync::OnceLock;

use analytics_client::client::{HttpRequest, HttpResponse, RequestBody};
use analytics_client::{AnalyticsClient, ApiError, Transport};
use async_trait::async_trait;
use gloo_net::http::Request;
use wasm_bindgen::JsValue;
use web_sys::{Blob, FormData};

/// Get the API base URL based on current environment
/// - In development (localhost): use http://localhost:8080
/// - In production: use same origin (API serves static files)
fn get_api_base() -> String {
    let hostname = web_sys::window()
        .and_then(|w| w.location().hostname().ok())
        .unwrap_or_default();

    if hostname == "localhost" || hostname == "127.0.0.1" {
        "http://localhost:8080".to_string()
    } else {
        "".to_string()
    }
}

static API_BASE_CACHE: OnceLock<String> = OnceLock::new();

pub fn api_base() -> &'static str {
    API_BASE_CACHE.get_or_init(get_api_base).as_str()
}

pub type Client = AnalyticsClient<GlooTransport>;

/// A client against [`api_base`]. Cheap; build one per task.
pub fn client() -> Client {
    AnalyticsClient::new(GlooTransport {
        base_url: api_base().to_string(),
    })
}

/// Browser `fetch` via gloo-net
#[derive(Debug, Clone)]
pub struct GlooTransport {
    base_url: String,
}

fn js_error(e: JsValue) -> ApiError {
    ApiError::Transport(format!("{e:?}"))
}

fn multipart_form(body: &analytics_client::client::MultipartBody) -> Result<FormData, ApiError> {
    let form = FormData::new().map_err(js_error)?;
    for (name, value) in &body.fields {
        form.append_with_str(name, value).map_err(js_error)?;
    }

    let bytes = js_sys::Uint8Array::from(body.file.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let blob = Blob::new_with_u8_array_sequence(&parts).map_err(js_error)?;
    form.append_with_blob_and_filename(body.file.field, &blob, &body.file.file_name)
        .map_err(js_error)?;
    Ok(form)
}

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = format!("{}{}", self.base_url, request.path());
        let query = request.query.iter().map(|(k, v)| (k.as_str(), v.as_str()));

        let response = match &request.body {
            RequestBody::Empty => Request::get(&url).query(query).send().await,
            RequestBody::Multipart(body) => {
                let form = multipart_form(body)?;
                Request::post(&url)
                    .query(query)
                    .body(form)
                    .map_err(|e| ApiError::Transport(format!("Failed to build request: {e}")))?
                    .send()
                    .await
            }
        }
        .map_err(|e| ApiError::Transport(format!("Request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read response: {e}")))?;
        Ok(HttpResponse { status, body })
    }
}
