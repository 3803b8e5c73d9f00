//! Query-string builder for TMDB requests
//!
//! Parameters keep insertion order and are percent-encoded when the request
//! URL is assembled, so callers pass raw values (`8|337`, `batman begins`).

use std::fmt::Display;

/// Ordered list of query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter
    pub fn with(mut self, key: &str, value: impl Display) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn page(self, page: u32) -> Self {
        self.with("page", page)
    }

    pub fn sort_by(self, order: &str) -> Self {
        self.with("sort_by", order)
    }

    /// Prepend parameters (used for the credential, which goes first)
    pub fn prepend(mut self, key: &str, value: impl Display) -> Self {
        self.pairs.insert(0, (key.to_string(), value.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Percent-encoded `k=v&k=v` string
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}
