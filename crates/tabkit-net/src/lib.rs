//! Resource fetching for content adapters.
//!
//! Adapters that source panels remotely go through the [`Fetcher`] trait so
//! the engine stays testable without a network. Two implementations ship:
//!
//! - [`HttpFetcher`] -- a minimal blocking HTTP/1.1 GET client.
//! - [`MemoryFetcher`] -- canned responses keyed by URL.

pub mod http;

use std::collections::HashMap;

use tabkit_types::error::{Result, TabsError};
use url::Url;

pub use http::HttpFetcher;

/// A fetched resource.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    /// Final URL after redirects.
    pub url: String,
    pub status: u16,
    /// `Content-Type` header value, if any.
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8 (lossy).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Something that can GET a URL.
pub trait Fetcher {
    fn fetch(&self, url: &Url) -> Result<FetchResponse>;

    /// GET a URL and return its body as text, treating any non-2xx status
    /// as an [`TabsError::AdapterFetch`] error.
    fn fetch_text(&self, url: &Url) -> Result<String> {
        let resp = self.fetch(url)?;
        if !resp.is_success() {
            return Err(TabsError::AdapterFetch(format!(
                "{url} returned HTTP {}",
                resp.status
            )));
        }
        Ok(resp.text())
    }
}

/// A fetcher serving canned responses, for tests and offline demos.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    routes: HashMap<String, (u16, String)>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200 for `url`.
    pub fn insert(&mut self, url: &str, body: &str) {
        self.routes.insert(url.to_string(), (200, body.to_string()));
    }

    /// Serve `body` with an explicit status for `url`.
    pub fn insert_status(&mut self, url: &str, status: u16, body: &str) {
        self.routes.insert(url.to_string(), (status, body.to_string()));
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, url: &Url) -> Result<FetchResponse> {
        let (status, body) = self
            .routes
            .get(url.as_str())
            .ok_or_else(|| TabsError::AdapterFetch(format!("no route for {url}")))?;
        Ok(FetchResponse {
            url: url.to_string(),
            status: *status,
            content_type: None,
            body: body.clone().into_bytes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_fetcher_serves_routes() {
        let mut f = MemoryFetcher::new();
        f.insert("https://site.test/a", "hello");
        let url = Url::parse("https://site.test/a").unwrap();
        assert_eq!(f.fetch_text(&url).unwrap(), "hello");
    }

    #[test]
    fn memory_fetcher_missing_route_errors() {
        let f = MemoryFetcher::new();
        let url = Url::parse("https://site.test/missing").unwrap();
        assert!(matches!(f.fetch(&url), Err(TabsError::AdapterFetch(_))));
    }

    #[test]
    fn fetch_text_rejects_non_success() {
        let mut f = MemoryFetcher::new();
        f.insert_status("https://site.test/gone", 404, "not found");
        let url = Url::parse("https://site.test/gone").unwrap();
        let err = f.fetch_text(&url).unwrap_err();
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[test]
    fn success_range() {
        let mut resp = FetchResponse {
            url: String::new(),
            status: 204,
            content_type: None,
            body: Vec::new(),
        };
        assert!(resp.is_success());
        resp.status = 301;
        assert!(!resp.is_success());
    }
}
