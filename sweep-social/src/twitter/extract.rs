//! Turn a raw recent-search body into a [`SearchPage`].
//!
//! Two stages. A cheap case-insensitive substring check for `data` and `meta`
//! decides whether the body is worth parsing at all; if either is missing the
//! body yields an empty, final page. Only bodies that pass are decoded, and
//! decoding failures there are errors.
use serde::Deserialize;
use serde_json::Value;

use crate::twitter::error::SearchError;
use crate::twitter::types::{Meta, SearchPage, Tweet};

pub fn has_page_markers(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    lower.contains("data") && lower.contains("meta")
}

pub fn parse_page(body: &str) -> Result<SearchPage, SearchError> {
    if !has_page_markers(body) {
        return Ok(SearchPage::end());
    }

    let value: Value = serde_json::from_str(body).map_err(SearchError::MalformedBody)?;

    let data = value
        .get("data")
        .ok_or(SearchError::MissingSection("data"))?;
    let meta = value
        .get("meta")
        .ok_or(SearchError::MissingSection("meta"))?;

    let tweets = Vec::<Tweet>::deserialize(data).map_err(|source| SearchError::Decode {
        section: "data",
        source,
    })?;
    let meta = Meta::deserialize(meta).map_err(|source| SearchError::Decode {
        section: "meta",
        source,
    })?;

    Ok(SearchPage {
        tweets,
        next_token: meta.next_token,
    })
}
