//! In-memory [`Transport`] that replays scripted responses and records requests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;

use crate::client::{Endpoint, HttpRequest, HttpResponse, Transport};
use crate::error::ApiError;

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: RefCell<HashMap<&'static str, VecDeque<Result<HttpResponse, ApiError>>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, endpoint: Endpoint, response: Result<HttpResponse, ApiError>) {
        self.responses
            .borrow_mut()
            .entry(endpoint.path())
            .or_default()
            .push_back(response);
    }

    pub fn respond_json(&self, endpoint: Endpoint, value: serde_json::Value) {
        self.respond_status(endpoint, 200, &value.to_string());
    }

    pub fn respond_text(&self, endpoint: Endpoint, text: &str) {
        self.respond_status(endpoint, 200, text);
    }

    pub fn respond_status(&self, endpoint: Endpoint, status: u16, body: &str) {
        self.push(
            endpoint,
            Ok(HttpResponse {
                status,
                body: body.to_string(),
            }),
        );
    }

    pub fn fail(&self, endpoint: Endpoint, message: &str) {
        self.push(endpoint, Err(ApiError::Transport(message.to_string())));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn requests_to(&self, endpoint: Endpoint) -> Vec<HttpRequest> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.endpoint == endpoint)
            .cloned()
            .collect()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let path = request.path();
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .get_mut(path)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(ApiError::Transport(format!("no scripted response for {path}"))))
    }
}
