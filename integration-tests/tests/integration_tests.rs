// Integration tests for the Spark log dashboard core
// These tests drive the list and detail views against a mock log service
// over real HTTP.

use chrono::{TimeZone, Utc};
use common::client::{HttpLogClient, LogSource};
use common::config::ApiConfig;
use common::fetcher::{FetchOutcome, FetchPhase};
use common::filters::{DateRange, StatusFilter};
use common::job_detail::JobDetailView;
use common::job_list::JobListView;
use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DEBOUNCE: Duration = Duration::from_millis(1000);

/// Helper function to build a client for the mock service
fn source_for(server: &MockServer) -> Arc<dyn LogSource> {
    let client = HttpLogClient::new(&ApiConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    })
    .expect("Failed to create log client");
    Arc::new(client)
}

/// Helper function to build a list view with a fixed page size
fn list_view(server: &MockServer, page_size: u16) -> JobListView {
    let mut view = JobListView::with_debounce(source_for(server), DEBOUNCE, 1, 0);
    view.resize(page_size);
    view
}

fn job_json(id: &str) -> serde_json::Value {
    json!({
        "jobId": id,
        "startTime": "2024-03-01T10:00:00Z",
        "endTime": "2024-03-01T10:02:05Z",
        "duration": 125,
        "numExecutors": 2,
        "status": "success",
        "errors": [],
        "operators": []
    })
}

fn page_json(ids: &[&str], total: u64) -> serde_json::Value {
    json!({
        "logs": ids.iter().map(|id| job_json(id)).collect::<Vec<_>>(),
        "totalFiles": total
    })
}

/// Mount, page forward and back, with the list state following each response
#[tokio::test]
async fn test_list_paging_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs"))
        .and(query_param("page", "1"))
        .and(query_param("pageSize", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&["a", "b"], 5)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logs"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&["c", "d"], 5)))
        .mount(&server)
        .await;

    let mut view = list_view(&server, 2);

    let ticket = view.mount();
    let completion = view.request(ticket).await;
    assert_eq!(view.complete(completion), FetchOutcome::Applied);
    assert_eq!(view.pagination().label(), "1–2 of 5");
    assert!(!view.pagination().can_go_newer());

    let ticket = view.older().expect("second page exists");
    let completion = view.request(ticket).await;
    view.complete(completion);
    assert_eq!(view.jobs()[0].job_id, "c");
    assert_eq!(view.pagination().label(), "3–4 of 5");

    let ticket = view.newer().expect("first page exists");
    let completion = view.request(ticket).await;
    view.complete(completion);
    assert_eq!(view.jobs()[0].job_id, "a");
    assert_eq!(view.phase(), FetchPhase::Loaded);
}

/// Settled filters go out as query parameters and restart at page 1
#[tokio::test]
async fn test_debounced_filters_reach_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs"))
        .and(query_param("search", "etl"))
        .and(query_param("status", "error"))
        .and(query_param("startDate", "2024-02-01T00:00:00.000Z"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&["etl-9"], 1)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&["a", "b"], 4)))
        .mount(&server)
        .await;

    let mut view = list_view(&server, 2);
    let ticket = view.mount();
    let completion = view.request(ticket).await;
    view.complete(completion);

    let now = Instant::now();
    view.set_search("e", now);
    view.set_search("etl", now + Duration::from_millis(300));
    view.set_status(StatusFilter::Error, now + Duration::from_millis(600));
    view.set_date_range(
        DateRange::new(Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()), None),
        now + Duration::from_millis(700),
    );

    assert!(view.poll(now + Duration::from_millis(1500)).is_none());
    let ticket = view
        .poll(now + Duration::from_millis(1700))
        .expect("filters settled");
    let completion = view.request(ticket).await;
    view.complete(completion);

    assert_eq!(view.jobs().len(), 1);
    assert_eq!(view.jobs()[0].job_id, "etl-9");
    assert_eq!(view.pagination().label(), "1–1 of 1");
}

/// A slow earlier response arriving last never replaces a newer one
#[tokio::test]
async fn test_last_issued_request_wins() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs"))
        .and(query_param("search", "slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(&["slow-1"], 1))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logs"))
        .and(query_param("search", "fast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&["fast-1"], 1)))
        .mount(&server)
        .await;

    let mut view = list_view(&server, 10);
    let _mount = view.mount();

    let now = Instant::now();
    view.set_search("slow", now);
    let slow = view.poll(now + DEBOUNCE).expect("slow query issued");
    view.set_search("fast", now + DEBOUNCE);
    let fast = view.poll(now + DEBOUNCE * 2).expect("fast query issued");

    let mut in_flight = FuturesUnordered::new();
    in_flight.push(view.request(slow));
    in_flight.push(view.request(fast));

    let mut outcomes = Vec::new();
    while let Some(completion) = in_flight.next().await {
        let search = completion.ticket.query().filters.search.clone();
        outcomes.push((search, view.complete(completion)));
    }

    assert_eq!(
        outcomes,
        vec![
            ("fast".to_string(), FetchOutcome::Applied),
            ("slow".to_string(), FetchOutcome::Discarded),
        ]
    );
    assert_eq!(view.jobs()[0].job_id, "fast-1");
    assert!(!view.is_loading());
}

/// A failed page keeps the previous jobs; the next success clears the error
#[tokio::test]
async fn test_failure_keeps_jobs_until_next_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logs"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(&["a", "b"], 4)))
        .mount(&server)
        .await;

    let mut view = list_view(&server, 2);
    let ticket = view.mount();
    let completion = view.request(ticket).await;
    view.complete(completion);

    let ticket = view.older().expect("second page exists");
    let completion = view.request(ticket).await;
    assert_eq!(view.complete(completion), FetchOutcome::Failed);
    assert_eq!(view.error(), Some("Failed to fetch logs"));
    assert_eq!(view.jobs().len(), 2);
    assert!(!view.is_loading());

    let ticket = view.refresh();
    assert_eq!(ticket.query().page, 1);
    let completion = view.request(ticket).await;
    assert_eq!(view.complete(completion), FetchOutcome::Applied);
    assert_eq!(view.error(), None);
}

/// The detail view loads one job with its operators
#[tokio::test]
async fn test_job_detail_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs/app-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "app-42",
            "startTime": "2024-03-01T10:00:00Z",
            "endTime": "2024-03-01T10:10:00Z",
            "duration": 600,
            "numExecutors": 8,
            "status": "error",
            "errors": ["Stage 2 failed"],
            "operators": [
                { "operatorId": "scan", "operatorType": "Read", "duration": 3.5,
                  "dependencies": [], "errors": [] },
                { "operatorId": "join", "operatorType": "Join", "duration": 9.25,
                  "dependencies": ["scan", "missing"], "errors": ["Skewed partition"] }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logs/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut detail = JobDetailView::new(source_for(&server), "app-42");
    assert_eq!(detail.load().await, FetchOutcome::Applied);

    let job = detail.job().expect("job loaded");
    assert_eq!(job.job_id, "app-42");
    assert_eq!(job.operators.len(), 2);
    assert_eq!(job.dangling_dependencies(), vec![("join", "missing")]);
    assert!(detail.toggle_operator("join"));

    let mut missing = JobDetailView::new(source_for(&server), "ghost");
    assert_eq!(missing.load().await, FetchOutcome::Failed);
    assert_eq!(missing.error(), Some("Job not found"));
}
