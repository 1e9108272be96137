use sweep_http::HttpError;
use thiserror::Error;

/// Anything that aborts a search. No partial results survive one of these.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("transport failure: {0}")]
    Transport(#[from] HttpError),

    #[error("response carried data/meta markers but is not valid JSON: {0}")]
    MalformedBody(#[source] serde_json::Error),

    #[error("response carried data/meta markers but has no `{0}` member")]
    MissingSection(&'static str),

    #[error("could not decode `{section}` section: {source}")]
    Decode {
        section: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("search cancelled after {pages} page(s)")]
    Cancelled { pages: usize },
}

impl SearchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchError::Cancelled { .. })
    }
}
