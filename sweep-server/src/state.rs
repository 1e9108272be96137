//! Application state shared across handlers

use std::sync::Arc;
use std::time::Duration;
use sweep_config::TwitterConfig;
use sweep_social::twitter::query::{DEFAULT_HANDLES, DEFAULT_KEYWORD};
use sweep_social::twitter::{
    Credential, PageSource, SearchError, SearchFilter, TwitterApi, TwitterApiSettings,
};
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    /// Page fetcher used for every search
    pub source: Arc<dyn PageSource>,
    /// Keyword and account filter; fixed for the life of the process
    pub filter: Arc<SearchFilter>,
    pub credential: Credential,
    /// Root token; each request searches under a child of it
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        source: Arc<dyn PageSource>,
        filter: SearchFilter,
        credential: Credential,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            source,
            filter: Arc::new(filter),
            credential,
            shutdown,
        }
    }

    /// Wire the production Twitter client from configuration.
    pub fn from_config(
        cfg: &TwitterConfig,
        shutdown: CancellationToken,
    ) -> Result<Self, SearchError> {
        let api = TwitterApi::new(TwitterApiSettings {
            base_url: cfg.base_url.clone(),
            timeout: Duration::from_secs(cfg.timeout_secs),
            max_retries: cfg.max_retries,
            max_results: cfg.max_results,
        })?;

        let keyword = cfg.keyword.as_deref().unwrap_or(DEFAULT_KEYWORD);
        let filter = match &cfg.handles {
            Some(handles) => SearchFilter::new(keyword, handles.iter().cloned()),
            None => SearchFilter::new(keyword, DEFAULT_HANDLES.iter().copied()),
        };

        Ok(Self::new(
            Arc::new(api),
            filter,
            Credential::new(cfg.access_token.clone()),
            shutdown,
        ))
    }
}
