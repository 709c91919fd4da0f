//! The reqwest transport against a real HTTP server on an ephemeral port.

use analytics_client::config::ClientConfig;
use analytics_client::http::ReqwestTransport;
use analytics_client::{AnalyticsClient, ApiError, UploadOutcome};
use axum::extract::RawQuery;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

async fn state_traces(RawQuery(query): RawQuery) -> String {
    let query = query.unwrap_or_default();
    if query.contains("page=1") {
        format!("echo {query}\n\nsecond trace\n")
    } else {
        String::new()
    }
}

async fn upload(headers: HeaderMap) -> (StatusCode, Json<serde_json::Value>) {
    let multipart = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));
    if !multipart {
        return (StatusCode::BAD_REQUEST, Json(json!({})));
    }
    (StatusCode::CONFLICT, Json(json!({"fileName": "dump.zip"})))
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/api/get-hours", get(|| async { Json(json!([0, 13])) }))
        .route("/api/get-state-traces", get(state_traces))
        .route("/api/get-gc-thread-count", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/api/upload", post(upload));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}/")
}

async fn client() -> AnalyticsClient<ReqwestTransport> {
    let config = ClientConfig {
        base_url: spawn_server().await,
        ..ClientConfig::default()
    };
    AnalyticsClient::new(ReqwestTransport::new(&config).expect("build transport"))
}

#[tokio::test]
async fn test_json_endpoint_round_trip() {
    let client = client().await;
    assert_eq!(client.hours("dump.zip").await, Ok(vec![0, 13]));
}

#[tokio::test]
async fn test_repeated_minutes_reach_the_server() {
    let client = client().await;
    let minutes = vec!["10:05".to_string(), "10:10".to_string()];

    let body = client
        .state_traces("dump.zip", &minutes, "BLOCKED", 1)
        .await
        .expect("page 1");
    assert!(body.contains("fileName=dump.zip"));
    assert!(body.contains("minutes=10%3A05&minutes=10%3A10"));
    assert!(body.contains("state=BLOCKED"));

    let empty = client
        .state_traces("dump.zip", &minutes, "BLOCKED", 2)
        .await
        .expect("page 2");
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let client = client().await;
    let err = client.gc_thread_count("dump.zip", "10:05").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_multipart_upload_conflict() {
    let client = client().await;
    let outcome = client
        .upload("dump.zip", b"PK\x03\x04".to_vec(), false, false)
        .await;
    assert_eq!(
        outcome,
        Ok(UploadOutcome::Conflict {
            file_name: "dump.zip".into()
        })
    );
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let config = ClientConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        ..ClientConfig::default()
    };
    let client = AnalyticsClient::new(ReqwestTransport::new(&config).expect("build transport"));
    assert!(matches!(client.hours("dump.zip").await, Err(ApiError::Transport(_))));
}
