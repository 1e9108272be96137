use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use sweep_server::{AppState, CALLER_HEADER, create_router};
use sweep_social::twitter::{Credential, SearchFilter, TwitterApi, TwitterApiSettings};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH: &str = "/2/tweets/search/recent";

fn state_for(base_url: String, shutdown: CancellationToken) -> AppState {
    let api = TwitterApi::new(TwitterApiSettings {
        base_url,
        timeout: Duration::from_secs(5),
        ..Default::default()
    })
    .unwrap();
    AppState::new(
        Arc::new(api),
        SearchFilter::new("API", ["to:TwitterDev"]),
        Credential::new("bearer-123"),
        shutdown,
    )
}

async fn call(state: AppState) -> (StatusCode, Value) {
    let resp = create_router(state)
        .oneshot(
            Request::get("/Twitter/GetTweets")
                .header(CALLER_HEADER, "ICM-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn two_pages_merge_into_one_array() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH))
        .and(query_param("query", "API (to:TwitterDev)"))
        .and(query_param_is_missing("next_token"))
        .and(header("authorization", "Bearer bearer-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"created_at": "t1", "text": "x"}],
            "meta": {"next_token": "AB", "result_count": 1}
        })))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path(SEARCH))
        .and(query_param("next_token", "AB"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"created_at": "t2", "text": "y"}],
            "meta": {"result_count": 1}
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let (status, body) = call(state_for(upstream.uri(), CancellationToken::new())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"created_at": "t1", "text": "x"},
            {"created_at": "t2", "text": "y"}
        ])
    );
}

#[tokio::test]
async fn no_results_reports_placeholder_with_bad_request() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"meta": {"result_count": 0}})),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let (status, body) = call(state_for(upstream.uri(), CancellationToken::new())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!([{"created_at": "no tweet available", "text": "no tweet available"}])
    );
}

#[tokio::test]
async fn upstream_error_body_is_treated_as_no_data() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "title": "Too Many Requests",
            "detail": "Too Many Requests",
            "type": "about:blank",
            "status": 429
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let (status, body) = call(state_for(upstream.uri(), CancellationToken::new())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body[0]["text"], "no tweet available");
}

#[tokio::test]
async fn malformed_marked_page_fails_the_whole_request() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param_is_missing("next_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"created_at": "t1", "text": "x"}],
            "meta": {"next_token": "AB"}
        })))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(query_param("next_token", "AB"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"oops": 1}, "meta": {}})),
        )
        .mount(&upstream)
        .await;

    let (status, body) = call(state_for(upstream.uri(), CancellationToken::new())).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("data"));
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (status, body) = call(state_for(format!("http://{addr}"), CancellationToken::new())).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("transport"));
}

#[tokio::test]
async fn slow_upstream_hits_the_deadline_and_is_bad_gateway() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [{"created_at": "t1", "text": "x"}], "meta": {}}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&upstream)
        .await;

    let api = TwitterApi::new(TwitterApiSettings {
        base_url: upstream.uri(),
        timeout: Duration::from_millis(200),
        ..Default::default()
    })
    .unwrap();
    let state = AppState::new(
        Arc::new(api),
        SearchFilter::new("API", ["to:TwitterDev"]),
        Credential::new("bearer-123"),
        CancellationToken::new(),
    );

    let started = std::time::Instant::now();
    let (status, body) = call(state).await;

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("transport"));
}

#[tokio::test]
async fn shutdown_in_progress_is_service_unavailable() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let shutdown = CancellationToken::new();
    shutdown.cancel();
    let (status, body) = call(state_for(upstream.uri(), shutdown)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("cancelled"));
}

#[tokio::test]
async fn health_is_ok() {
    let resp = create_router(state_for(
        "http://127.0.0.1:9".to_string(),
        CancellationToken::new(),
    ))
    .oneshot(Request::get("/health").body(Body::empty()).unwrap())
    .await
    .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}
