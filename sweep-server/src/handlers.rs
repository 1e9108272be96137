//! HTTP request handlers

use super::state::AppState;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use sweep_social::twitter::{SearchOutcome, fetch_all};
use tracing::Instrument;

/// Caller identifier header. Logged, otherwise unused.
pub const CALLER_HEADER: &str = "icm";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Run the full search and report it.
///
/// `200` with every tweet, `400` with the single placeholder when nothing was
/// found, `502` when the upstream could not be reached or decoded, `503` when
/// the server is shutting down.
pub async fn get_tweets(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let caller = headers
        .get(CALLER_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let span = tracing::info_span!("get_tweets", icm = %caller);
    let cancel = state.shutdown.child_token();

    let result = fetch_all(
        state.source.as_ref(),
        &state.filter,
        &state.credential,
        &cancel,
    )
    .instrument(span)
    .await;

    match result {
        Ok(SearchOutcome::Found(tweets)) => {
            tracing::info!(icm = %caller, tweets = tweets.len(), "get_tweets.ok");
            (StatusCode::OK, Json(tweets)).into_response()
        }
        Ok(outcome @ SearchOutcome::Unavailable(_)) => {
            tracing::info!(icm = %caller, "get_tweets.unavailable");
            (StatusCode::BAD_REQUEST, Json(outcome.into_tweets())).into_response()
        }
        Err(e) if e.is_cancelled() => {
            tracing::info!(icm = %caller, error = %e, "get_tweets.cancelled");
            error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
        Err(e) => {
            tracing::error!(icm = %caller, error = %e, "get_tweets.failed");
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(HealthBody { status: "ok" })
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}
