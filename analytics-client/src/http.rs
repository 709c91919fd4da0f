//! `reqwest`-backed [`Transport`] for native callers.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::client::{HttpRequest, HttpResponse, RequestBody, Transport};
use crate::config::ClientConfig;
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self::with_client(http, &config.base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, request: &HttpRequest) -> String {
        format!("{}{}", self.base_url, request.path())
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = self.url_for(&request);
        let builder = match request.body {
            RequestBody::Empty => self.http.get(&url).query(&request.query),
            RequestBody::Multipart(body) => {
                let mut form = Form::new();
                for (name, value) in body.fields {
                    form = form.text(name, value);
                }
                let part = Part::bytes(body.file.bytes).file_name(body.file.file_name);
                form = form.part(body.file.field, part);
                self.http.post(&url).query(&request.query).multipart(form)
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}
