/// Keyword used when configuration does not name one.
pub const DEFAULT_KEYWORD: &str = "API";

/// Accounts watched when configuration does not name any.
pub const DEFAULT_HANDLES: &[&str] = &["to:TwitterDev", "to:TwitterAPI", "to:prgaut"];

const OR: &str = " OR ";

/// Keyword plus the account terms it is restricted to. Built once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    keyword: String,
    handles: Vec<String>,
}

impl SearchFilter {
    pub fn new<I, S>(keyword: impl Into<String>, handles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keyword: keyword.into(),
            handles: handles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn handles(&self) -> &[String] {
        &self.handles
    }

    /// Account terms joined with the endpoint's OR operator.
    pub fn handles_clause(&self) -> String {
        self.handles.join(OR)
    }

    /// The `query` parameter value, unencoded.
    ///
    /// ```
    /// use sweep_social::twitter::SearchFilter;
    ///
    /// let filter = SearchFilter::new("API", ["to:TwitterDev", "to:TwitterAPI"]);
    /// assert_eq!(filter.to_query(), "API (to:TwitterDev OR to:TwitterAPI)");
    /// ```
    pub fn to_query(&self) -> String {
        if self.handles.is_empty() {
            return self.keyword.clone();
        }
        format!("{} ({})", self.keyword, self.handles_clause())
    }
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORD, DEFAULT_HANDLES.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_watches_the_three_accounts() {
        assert_eq!(
            SearchFilter::default().to_query(),
            "API (to:TwitterDev OR to:TwitterAPI OR to:prgaut)"
        );
    }

    #[test]
    fn parts_are_kept_as_given() {
        let f = SearchFilter::new("rust", ["to:a", "to:b"]);
        assert_eq!(f.keyword(), "rust");
        assert_eq!(f.handles(), ["to:a", "to:b"]);
    }

    #[test]
    fn single_handle_has_no_operator() {
        let f = SearchFilter::new("API", ["to:TwitterDev"]);
        assert_eq!(f.handles_clause(), "to:TwitterDev");
        assert_eq!(f.to_query(), "API (to:TwitterDev)");
    }

    #[test]
    fn no_handles_is_keyword_only() {
        let f = SearchFilter::new("rust", Vec::<String>::new());
        assert_eq!(f.to_query(), "rust");
    }
}
