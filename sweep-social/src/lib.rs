//! Social network search clients used by tweet-sweep.
//!
//! Only the Twitter/X recent-search pipeline exists today. See [`twitter`] for the
//! page fetcher, the pagination driver, and how malformed bodies are treated.
pub mod twitter;
