use serde::{Deserialize, Serialize};
use std::fmt;

/// Text shown in both fields of the placeholder tweet.
pub const UNAVAILABLE: &str = "no tweet available";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub created_at: String,
    pub text: String,
}

impl Tweet {
    pub fn new(created_at: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: None,
            created_at: created_at.into(),
            text: text.into(),
        }
    }

    /// Placeholder returned when a search produced nothing.
    pub fn unavailable() -> Self {
        Self::new(UNAVAILABLE, UNAVAILABLE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Meta {
    #[serde(default)]
    pub next_token: Option<String>,
}

/// One fetched page. `next_token == None` ends pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub tweets: Vec<Tweet>,
    pub next_token: Option<String>,
}

impl SearchPage {
    /// The page produced when a body fails the marker pre-check.
    pub fn end() -> Self {
        Self::default()
    }
}

/// Bearer token attached to every request of one search. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_debug_is_redacted() {
        let cred = Credential::new("very-secret");
        assert_eq!(format!("{cred:?}"), "Credential(<redacted>)");
        assert_eq!(cred.expose(), "very-secret");
    }

    #[test]
    fn unavailable_tweet_serializes_without_id() {
        let json = serde_json::to_value(Tweet::unavailable()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "created_at": "no tweet available",
                "text": "no tweet available"
            })
        );
    }

    #[test]
    fn tweet_accepts_upstream_extras() {
        let tw: Tweet = serde_json::from_value(serde_json::json!({
            "id": "1",
            "created_at": "2025-09-01T12:00:00.000Z",
            "text": "hi",
            "edit_history_tweet_ids": ["1"]
        }))
        .unwrap();
        assert_eq!(tw.id.as_deref(), Some("1"));
        assert_ne!(tw, Tweet::unavailable());
    }
}
