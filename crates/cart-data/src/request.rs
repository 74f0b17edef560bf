//! HTTP request builder.

use std::collections::HashMap;

/// A fully described outbound GET request, handed to a
/// [`Transport`](crate::Transport) to send.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    pub(crate) url: String,
    pub(crate) headers: HashMap<String, String>,
}

impl RequestBuilder {
    /// Create a new GET request builder.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the Accept header.
    pub fn accept(self, content_type: impl Into<String>) -> Self {
        self.header("Accept", content_type)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_header() {
        let req = RequestBuilder::get("/stock/1").accept("application/json");
        assert_eq!(req.url(), "/stock/1");
        assert_eq!(
            req.headers().get("Accept").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_header_replaces_previous_value() {
        let req = RequestBuilder::get("/")
            .accept("text/plain")
            .accept("application/json");
        assert_eq!(req.headers().len(), 1);
        assert_eq!(
            req.headers().get("Accept").map(String::as_str),
            Some("application/json")
        );
    }
}
