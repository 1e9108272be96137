//! Recent-search page fetcher.
//!
//! One call, one page: build the query string, attach the bearer, read the body as
//! text and hand it to [`extract::parse_page`]. No retries unless configured, and no
//! pagination state beyond the single token it is given.
use async_trait::async_trait;
use std::borrow::Cow;
use std::time::Duration;
use sweep_http::{Auth, HttpClient, RequestOpts};

use crate::twitter::error::SearchError;
use crate::twitter::extract;
use crate::twitter::query::SearchFilter;
use crate::twitter::types::{Credential, SearchPage};

pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com";
const SEARCH_PATH: &str = "2/tweets/search/recent";
const TWEET_FIELDS: &str = "created_at";

/// Fetches a single page for a filter. The driver only ever talks to this.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(
        &self,
        filter: &SearchFilter,
        credential: &Credential,
        token: Option<&str>,
    ) -> Result<SearchPage, SearchError>;
}

#[derive(Debug, Clone)]
pub struct TwitterApiSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: usize,
    pub max_results: Option<u32>,
}

impl Default for TwitterApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
            max_retries: 0,
            max_results: None,
        }
    }
}

#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    max_results: Option<u32>,
}

impl TwitterApi {
    pub fn new(settings: TwitterApiSettings) -> Result<Self, SearchError> {
        let http = HttpClient::new(&settings.base_url)?
            .with_timeout(settings.timeout)
            .with_retries(settings.max_retries);
        Ok(Self {
            http,
            max_results: settings.max_results.map(|n| n.clamp(10, 100)),
        })
    }

    fn params<'a>(
        &self,
        filter: &SearchFilter,
        token: Option<&'a str>,
    ) -> Vec<(&'static str, Cow<'a, str>)> {
        let mut params: Vec<(&'static str, Cow<'a, str>)> = vec![
            ("query", filter.to_query().into()),
            ("tweet.fields", TWEET_FIELDS.into()),
        ];
        if let Some(n) = self.max_results {
            params.push(("max_results", n.to_string().into()));
        }
        if let Some(token) = token {
            params.push(("next_token", token.into()));
        }
        params
    }
}

#[async_trait]
impl PageSource for TwitterApi {
    async fn fetch_page(
        &self,
        filter: &SearchFilter,
        credential: &Credential,
        token: Option<&str>,
    ) -> Result<SearchPage, SearchError> {
        let resp = self
            .http
            .get_text(
                SEARCH_PATH,
                RequestOpts {
                    auth: Some(Auth::Bearer(credential.expose())),
                    query: Some(self.params(filter, token)),
                    ..Default::default()
                },
            )
            .await?;

        if !resp.is_success() {
            tracing::debug!(
                status=%resp.status,
                x_request_id=%resp.request_id,
                "twitter.search.non_success"
            );
        }

        let page = extract::parse_page(&resp.body)?;
        tracing::debug!(
            has_token = token.is_some(),
            tweets = page.tweets.len(),
            next = page.next_token.is_some(),
            "twitter.search.page"
        );
        Ok(page)
    }
}
