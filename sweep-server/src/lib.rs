//! Inbound HTTP API for tweet-sweep.
//!
//! One real endpoint, `GET /Twitter/GetTweets`, which runs a full paginated search
//! for the configured accounts and keyword, plus `GET /health`.

mod handlers;
mod routes;
mod state;

pub use handlers::{CALLER_HEADER, ErrorBody};
pub use routes::create_router;
pub use state::AppState;

use std::future::Future;
use tokio::net::TcpListener;

/// Serve `state` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "server.listening");
    }
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
