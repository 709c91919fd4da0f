//! Typed calls to the analytics service over a pluggable [`Transport`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shared_types::{
    GcThreadCount, IdenticalStackTrace, LastExecutedMethods, StackLengthStats,
    ThreadPoolMatrix, ThreadPoolStatistic, ThreadStateMatrix, ThreadSummaryByMinute, Timestamp,
    UploadResponse,
};
use tracing::debug;

use crate::error::ApiError;

/// Every endpoint the service exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Hours,
    Minutes,
    Upload,
    ThreadSummary,
    ComparativeThreadState,
    ComparativeThreadPool,
    ThreadPoolStatistics,
    IdenticalStackTraces,
    StackLengthStats,
    StacksByLength,
    LastExecutedMethods,
    MethodTraces,
    GcThreadCount,
    StateTraces,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Hours => "/api/get-hours",
            Endpoint::Minutes => "/api/get-minutes",
            Endpoint::Upload => "/api/upload",
            Endpoint::ThreadSummary => "/api/get-thread-summary",
            Endpoint::ComparativeThreadState => "/api/get-comparative-thread-state",
            Endpoint::ComparativeThreadPool => "/api/get-comparative-thread-pool",
            Endpoint::ThreadPoolStatistics => "/api/get-thread-pool-statistics",
            Endpoint::IdenticalStackTraces => "/api/get-identical-stack-traces",
            Endpoint::StackLengthStats => "/api/get-stack-length-stats",
            Endpoint::StacksByLength => "/api/get-stacks-by-length",
            Endpoint::LastExecutedMethods => "/api/last-executed-methods",
            Endpoint::MethodTraces => "/api/get-method-traces",
            Endpoint::GcThreadCount => "/api/get-gc-thread-count",
            Endpoint::StateTraces => "/api/get-state-traces",
        }
    }

    /// The comparative endpoints spell the file parameter in lower case.
    pub fn file_param(self) -> &'static str {
        match self {
            Endpoint::ComparativeThreadState | Endpoint::ComparativeThreadPool => "filename",
            _ => "fileName",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: &'static str,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub file: FilePart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Multipart(MultipartBody),
}

/// One request, before the transport encodes it. `query` keeps repeated keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub endpoint: Endpoint,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn get(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_string(), value.into()));
        self
    }

    pub fn file(self, file_name: &str) -> Self {
        let name = self.endpoint.file_param();
        self.param(name, file_name)
    }

    pub fn minutes(mut self, minutes: &[Timestamp]) -> Self {
        for minute in minutes {
            self.query.push(("minutes".to_string(), minute.clone()));
        }
        self
    }

    pub fn path(&self) -> &'static str {
        self.endpoint.path()
    }

    /// Values of every `name` parameter, in order.
    pub fn params(&self, name: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and hands back status and body. Transport failures are
/// `Err`; non-2xx statuses are still `Ok` so callers can inspect them.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[async_trait(?Send)]
impl<T: Transport + ?Sized> Transport for &T {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).send(request).await
    }
}

/// Outcome of an upload attempt; `Conflict` is the service's `409`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Stored { file_name: String },
    Conflict { file_name: String },
}

#[derive(Debug, Clone)]
pub struct AnalyticsClient<T> {
    transport: T,
}

impl<T: Transport> AnalyticsClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn send_ok(&self, request: HttpRequest) -> Result<String, ApiError> {
        debug!(path = request.path(), "analytics request");
        let response = self.transport.send(request).await?;
        if !response.ok() {
            return Err(ApiError::Status {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response.body)
    }

    async fn get_json<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ApiError> {
        let body = self.send_ok(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn hours(&self, file_name: &str) -> Result<Vec<u32>, ApiError> {
        self.get_json(HttpRequest::get(Endpoint::Hours).file(file_name))
            .await
    }

    pub async fn minutes(&self, file_name: &str, hour: u32) -> Result<Vec<Timestamp>, ApiError> {
        self.get_json(
            HttpRequest::get(Endpoint::Minutes)
                .file(file_name)
                .param("selectedHour", hour.to_string()),
        )
        .await
    }

    pub async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        reuse: bool,
        overwrite: bool,
    ) -> Result<UploadOutcome, ApiError> {
        let request = HttpRequest {
            endpoint: Endpoint::Upload,
            query: Vec::new(),
            body: RequestBody::Multipart(MultipartBody {
                fields: vec![
                    ("reuse".to_string(), reuse.to_string()),
                    ("overwrite".to_string(), overwrite.to_string()),
                ],
                file: FilePart {
                    field: "file",
                    file_name: file_name.to_string(),
                    bytes,
                },
            }),
        };

        debug!(file_name, reuse, overwrite, "uploading dump");
        let response = self.transport.send(request).await?;
        match response.status {
            409 => {
                let data: UploadResponse = serde_json::from_str(&response.body)?;
                Ok(UploadOutcome::Conflict {
                    file_name: data.file_name,
                })
            }
            status if (200..300).contains(&status) => {
                let data: UploadResponse = serde_json::from_str(&response.body)?;
                Ok(UploadOutcome::Stored {
                    file_name: data.file_name,
                })
            }
            status => Err(ApiError::Status {
                status,
                body: response.body,
            }),
        }
    }

    pub async fn thread_summary(
        &self,
        file_name: &str,
        minutes: &[Timestamp],
    ) -> Result<ThreadSummaryByMinute, ApiError> {
        self.get_json(
            HttpRequest::get(Endpoint::ThreadSummary)
                .file(file_name)
                .minutes(minutes),
        )
        .await
    }

    pub async fn comparative_thread_state(
        &self,
        file_name: &str,
        minutes: &[Timestamp],
    ) -> Result<ThreadStateMatrix, ApiError> {
        self.get_json(
            HttpRequest::get(Endpoint::ComparativeThreadState)
                .file(file_name)
                .minutes(minutes),
        )
        .await
    }

    pub async fn comparative_thread_pool(
        &self,
        file_name: &str,
        minutes: &[Timestamp],
    ) -> Result<ThreadPoolMatrix, ApiError> {
        self.get_json(
            HttpRequest::get(Endpoint::ComparativeThreadPool)
                .file(file_name)
                .minutes(minutes),
        )
        .await
    }

    pub async fn thread_pool_statistics(
        &self,
        file_name: &str,
        minute: &str,
    ) -> Result<Vec<ThreadPoolStatistic>, ApiError> {
        self.get_json(single_minute(Endpoint::ThreadPoolStatistics, file_name, minute))
            .await
    }

    pub async fn identical_stack_traces(
        &self,
        file_name: &str,
        minute: &str,
    ) -> Result<Vec<IdenticalStackTrace>, ApiError> {
        self.get_json(single_minute(Endpoint::IdenticalStackTraces, file_name, minute))
            .await
    }

    pub async fn stack_length_stats(
        &self,
        file_name: &str,
        minute: &str,
    ) -> Result<StackLengthStats, ApiError> {
        self.get_json(single_minute(Endpoint::StackLengthStats, file_name, minute))
            .await
    }

    pub async fn stacks_by_length(
        &self,
        file_name: &str,
        minute: &str,
        category: &str,
    ) -> Result<Vec<String>, ApiError> {
        self.get_json(
            single_minute(Endpoint::StacksByLength, file_name, minute).param("category", category),
        )
        .await
    }

    pub async fn last_executed_methods(
        &self,
        file_name: &str,
        minute: &str,
    ) -> Result<LastExecutedMethods, ApiError> {
        self.get_json(single_minute(Endpoint::LastExecutedMethods, file_name, minute))
            .await
    }

    pub async fn method_traces(
        &self,
        file_name: &str,
        minute: &str,
        method: &str,
    ) -> Result<Vec<String>, ApiError> {
        self.get_json(
            single_minute(Endpoint::MethodTraces, file_name, minute).param("method", method),
        )
        .await
    }

    pub async fn gc_thread_count(
        &self,
        file_name: &str,
        minute: &str,
    ) -> Result<GcThreadCount, ApiError> {
        self.get_json(single_minute(Endpoint::GcThreadCount, file_name, minute))
            .await
    }

    /// Raw text of one page of traces; an empty body means no more pages.
    pub async fn state_traces(
        &self,
        file_name: &str,
        minutes: &[Timestamp],
        state: &str,
        page: u32,
    ) -> Result<String, ApiError> {
        self.send_ok(
            HttpRequest::get(Endpoint::StateTraces)
                .file(file_name)
                .minutes(minutes)
                .param("state", state)
                .param("page", page.to_string()),
        )
        .await
    }
}

fn single_minute(endpoint: Endpoint, file_name: &str, minute: &str) -> HttpRequest {
    HttpRequest::get(endpoint)
        .file(file_name)
        .param("minutes", minute)
}
