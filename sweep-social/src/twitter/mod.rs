//! Twitter/X recent-search integration.
//!
//! [`TwitterApi`] fetches one page per call; [`paginate::fetch_all`] follows
//! `next_token` until the endpoint stops returning one and merges the pages.
//!
//! Bodies that lack both a `data` and a `meta` marker end pagination silently,
//! exactly like a final page would. Upstream error bodies therefore look like a
//! clean finish. Bodies that carry both markers but fail to decode abort the
//! whole fetch.
pub mod client;
pub mod error;
pub mod extract;
pub mod paginate;
pub mod query;
pub mod types;

pub use client::{PageSource, TwitterApi, TwitterApiSettings};
pub use error::SearchError;
pub use paginate::{SearchOutcome, fetch_all};
pub use query::SearchFilter;
pub use types::{Credential, SearchPage, Tweet};
