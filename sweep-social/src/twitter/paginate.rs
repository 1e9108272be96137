//! Follow `next_token` across pages and merge the results.
//!
//! The walk is a two-state machine: `Fetching(token)` issues one request and moves
//! to `Fetching(next)` or `Done`. The first state is `Fetching(None)`, so the first
//! request always happens even though no token exists yet. A missing token on any
//! page, whether the endpoint ran out of results or the body failed the marker
//! pre-check, moves to `Done`.
use futures::{Stream, TryStreamExt};
use tokio_util::sync::CancellationToken;

use crate::twitter::client::PageSource;
use crate::twitter::error::SearchError;
use crate::twitter::query::SearchFilter;
use crate::twitter::types::{Credential, SearchPage, Tweet};

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageState {
    Fetching(Option<String>),
    Done,
}

impl PageState {
    fn after(page: &SearchPage) -> Self {
        match &page.next_token {
            Some(token) => PageState::Fetching(Some(token.clone())),
            None => PageState::Done,
        }
    }
}

/// Result of a complete search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Every tweet from every page, in fetch order.
    Found(Vec<Tweet>),
    /// No page yielded a tweet; carries the placeholder.
    Unavailable(Tweet),
}

impl SearchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    /// Collection handed to callers: the tweets, or just the placeholder.
    pub fn into_tweets(self) -> Vec<Tweet> {
        match self {
            SearchOutcome::Found(tweets) => tweets,
            SearchOutcome::Unavailable(placeholder) => vec![placeholder],
        }
    }
}

/// Stream of pages in fetch order. Ends after the first page without a token.
///
/// The cancellation token is checked while each request is in flight; once it
/// fires the stream yields [`SearchError::Cancelled`] and stops.
pub fn pages<'a, S>(
    source: &'a S,
    filter: &'a SearchFilter,
    credential: &'a Credential,
    cancel: &'a CancellationToken,
) -> impl Stream<Item = Result<SearchPage, SearchError>> + Send + 'a
where
    S: PageSource + ?Sized,
{
    async_stream::try_stream! {
        let mut state = PageState::Fetching(None);
        let mut fetched = 0usize;

        loop {
            let token = match state {
                PageState::Fetching(token) => token,
                PageState::Done => break,
            };

            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(SearchError::Cancelled { pages: fetched }),
                page = source.fetch_page(filter, credential, token.as_deref()) => page,
            };
            let page = next?;
            fetched += 1;

            if token.is_some() && page.next_token == token {
                tracing::warn!(
                    pages = fetched,
                    token = token.as_deref().unwrap_or_default(),
                    "twitter.search.token_repeated"
                );
            }
            state = PageState::after(&page);
            yield page;
        }
    }
}

/// Fetch every page for `filter` and merge them.
///
/// Tweets are appended in the order pages arrive; nothing is reordered or
/// deduplicated. An error from any page discards everything gathered so far.
pub async fn fetch_all<S>(
    source: &S,
    filter: &SearchFilter,
    credential: &Credential,
    cancel: &CancellationToken,
) -> Result<SearchOutcome, SearchError>
where
    S: PageSource + ?Sized,
{
    let (tweets, page_count) = pages(source, filter, credential, cancel)
        .try_fold((Vec::new(), 0usize), |(mut tweets, count), page| async move {
            tweets.extend(page.tweets);
            Ok((tweets, count + 1))
        })
        .await?;

    tracing::info!(
        keyword = filter.keyword(),
        handles = ?filter.handles(),
        pages = page_count,
        tweets = tweets.len(),
        "twitter.search.complete"
    );

    if tweets.is_empty() {
        return Ok(SearchOutcome::Unavailable(Tweet::unavailable()));
    }
    Ok(SearchOutcome::Found(tweets))
}
