//! Request shapes and end-to-end flows against a scripted transport.

use analytics_client::testing::ScriptedTransport;
use analytics_client::{
    Aggregator, AnalyticsClient, ApiError, ConflictDecision, DashboardState, Endpoint,
    PageOutcome, Paginator, PaginatorPhase, TraceKey, UploadOutcome, UploadFlow, UploadPhase,
};
use analytics_client::client::RequestBody;
use serde_json::json;

fn minutes(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_comparative_endpoints_use_lowercase_filename() {
    let transport = ScriptedTransport::new();
    transport.respond_json(Endpoint::ThreadSummary, json!({}));
    transport.respond_json(Endpoint::ComparativeThreadState, json!({}));
    transport.respond_json(Endpoint::ComparativeThreadPool, json!({}));
    let client = AnalyticsClient::new(&transport);

    let mut aggregator = Aggregator::new();
    assert!(
        aggregator
            .refresh(&client, "dump.zip", &minutes(&["10:10", "10:05"]))
            .await
    );

    let summary = &transport.requests_to(Endpoint::ThreadSummary)[0];
    assert_eq!(summary.params("fileName"), vec!["dump.zip"]);
    assert_eq!(summary.params("minutes"), vec!["10:10", "10:05"]);

    for endpoint in [Endpoint::ComparativeThreadState, Endpoint::ComparativeThreadPool] {
        let request = &transport.requests_to(endpoint)[0];
        assert_eq!(request.params("filename"), vec!["dump.zip"]);
        assert!(request.params("fileName").is_empty());
        assert_eq!(request.params("minutes"), vec!["10:10", "10:05"]);
    }
}

#[tokio::test]
async fn test_aggregator_end_to_end() {
    let transport = ScriptedTransport::new();
    transport.respond_json(
        Endpoint::ThreadSummary,
        json!({
            "10:05": {"totalThreads": 3, "threadStates": [{"state": "RUNNABLE", "count": 3}]},
            "10:10": {"totalThreads": 4, "threadStates": [
                {"state": "RUNNABLE", "count": 2}, {"state": "BLOCKED", "count": 2}
            ]}
        }),
    );
    transport.respond_json(
        Endpoint::ComparativeThreadState,
        json!({"timestamps": ["10:05", "10:10"], "threadInfos": [
            {"threadName": "main", "states": {"10:05": "RUNNABLE", "10:10": "BLOCKED"}}
        ]}),
    );
    transport.respond_status(Endpoint::ComparativeThreadPool, 500, "pool index missing");
    let client = AnalyticsClient::new(&transport);

    let mut aggregator = Aggregator::new();
    aggregator
        .refresh(&client, "dump.zip", &minutes(&["10:05", "10:10"]))
        .await;

    assert!(!aggregator.loading());
    assert_eq!(aggregator.error(), Some("Failed to load thread pool comparison"));

    let table = aggregator.comparison_table().unwrap();
    assert_eq!(table.row("BLOCKED").unwrap().counts, vec![0, 2]);
    assert_eq!(table.total_row().counts, vec![3, 4]);

    let timeline = aggregator.state_timeline().unwrap();
    assert_eq!(timeline[0].states, vec!["RUNNABLE", "BLOCKED"]);
    assert!(aggregator.top_pools().is_none());
}

#[tokio::test]
async fn test_paginator_drains_pages_in_order() {
    let transport = ScriptedTransport::new();
    transport.respond_text(Endpoint::StateTraces, "t1\n\nt2\n\n");
    transport.respond_text(Endpoint::StateTraces, "t3");
    transport.respond_text(Endpoint::StateTraces, "\n\n");
    let client = AnalyticsClient::new(&transport);

    let mut paginator = Paginator::new();
    let mut next = paginator.select(TraceKey {
        file_name: "dump.zip".into(),
        minutes: minutes(&["10:05", "10:10"]),
        state: "BLOCKED".into(),
    });
    let mut outcomes = Vec::new();
    while let Some(request) = next.take() {
        let outcome = paginator.run(&client, request).await;
        outcomes.push(outcome);
        next = paginator.on_viewport_signal();
    }

    assert_eq!(
        outcomes,
        vec![PageOutcome::Appended(2), PageOutcome::Appended(1), PageOutcome::Exhausted]
    );
    assert_eq!(paginator.traces(), ["t1", "t2", "t3"]);
    assert_eq!(paginator.phase(), PaginatorPhase::Exhausted);

    let requests = transport.requests_to(Endpoint::StateTraces);
    let pages: Vec<&str> = requests.iter().flat_map(|r| r.params("page")).collect();
    assert_eq!(pages, vec!["1", "2", "3"]);
    assert_eq!(requests[0].params("state"), vec!["BLOCKED"]);
    assert_eq!(requests[0].params("minutes"), vec!["10:05", "10:10"]);
}

#[tokio::test]
async fn test_upload_conflict_then_reuse() {
    let transport = ScriptedTransport::new();
    transport.respond_status(Endpoint::Upload, 409, r#"{"fileName":"dump.zip"}"#);
    transport.respond_json(Endpoint::Upload, json!({"fileName": "dump.zip"}));
    let client = AnalyticsClient::new(&transport);

    let mut flow = UploadFlow::new();
    let attempt = flow.start("dump.zip", b"PK".to_vec()).unwrap();
    assert_eq!(
        flow.run(&client, attempt).await,
        &UploadPhase::AwaitingDecision {
            existing: "dump.zip".into()
        }
    );

    let retry = flow.decide(ConflictDecision::ReuseExisting).unwrap();
    flow.run(&client, retry).await;
    assert_eq!(flow.file_name(), Some("dump.zip"));

    let requests = transport.requests_to(Endpoint::Upload);
    let RequestBody::Multipart(body) = &requests[1].body else {
        panic!("upload must be multipart");
    };
    assert!(body.fields.contains(&("reuse".to_string(), "true".to_string())));
    assert!(body.fields.contains(&("overwrite".to_string(), "false".to_string())));
    assert_eq!(body.file.field, "file");
    assert_eq!(body.file.bytes, b"PK".to_vec());
}

#[tokio::test]
async fn test_upload_server_error_is_status() {
    let transport = ScriptedTransport::new();
    transport.respond_status(Endpoint::Upload, 500, "disk full");
    let client = AnalyticsClient::new(&transport);

    let result = client.upload("dump.zip", vec![], false, false).await;
    assert_eq!(result.unwrap_err().status(), Some(500));

    transport.respond_json(Endpoint::Upload, json!({"fileName": "stored.zip"}));
    assert_eq!(
        client.upload("dump.zip", vec![], false, false).await,
        Ok(UploadOutcome::Stored {
            file_name: "stored.zip".into()
        })
    );
}

#[tokio::test]
async fn test_dashboard_hours_and_minutes() {
    let transport = ScriptedTransport::new();
    transport.respond_json(Endpoint::Hours, json!([9, 10]));
    transport.respond_json(Endpoint::Minutes, json!(["10:05", "10:10"]));
    let client = AnalyticsClient::new(&transport);

    let mut dashboard = DashboardState::new("dump.zip");
    let ticket = dashboard.load_hours().unwrap();
    let hours = DashboardState::fetch_hours(&client, &ticket).await;
    dashboard.apply_hours(&ticket, hours);
    assert!(dashboard.hour_available(10));

    let ticket = dashboard.select_hour(10);
    let minutes = DashboardState::fetch_minutes(&client, &ticket).await;
    dashboard.apply_minutes(&ticket, minutes);
    assert_eq!(dashboard.minutes().data().map(Vec::len), Some(2));

    let request = &transport.requests_to(Endpoint::Minutes)[0];
    assert_eq!(request.params("fileName"), vec!["dump.zip"]);
    assert_eq!(request.params("selectedHour"), vec!["10"]);
}

#[tokio::test]
async fn test_malformed_json_is_decode_error() {
    let transport = ScriptedTransport::new();
    transport.respond_text(Endpoint::Hours, "<html>");
    let client = AnalyticsClient::new(&transport);

    assert!(matches!(client.hours("dump.zip").await, Err(ApiError::Decode(_))));
}
