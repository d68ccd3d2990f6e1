//! HTTP client for fetching listing and detail pages

use futures_util::StreamExt;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024; // 10 MB

/// A fetched page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpInfo {
    /// The final URL after following redirects
    pub url: String,

    /// Content-Length header value as sent on the wire, if any
    pub content_length: Option<u64>,

    /// Number of body bytes received, including any dropped past the size cap
    pub received_bytes: u64,

    /// Response body as string, at most `max_body_size` bytes of it
    pub body: String,
}

impl HttpInfo {
    /// Size of the page in bytes.
    ///
    /// Uses the `Content-Length` header and falls back to the number of
    /// bytes received when the header is missing.
    pub fn size_bytes(&self) -> u64 {
        self.content_length.unwrap_or(self.received_bytes)
    }
}

/// Configuration for HTTP requests.
///
/// Redirects, timeouts and headers are left at the transport's defaults.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Allow insecure HTTPS connections (self-signed certs).
    ///
    /// **Security Warning:** Enabling this allows man-in-the-middle attacks.
    pub allow_insecure: bool,

    /// Maximum response body size kept in memory, in bytes.
    ///
    /// Longer bodies are truncated. Default: 10 MB.
    pub max_body_size: usize,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            allow_insecure: false,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl HttpOptions {
    /// Create a new HttpOptions with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to allow insecure HTTPS connections.
    pub fn allow_insecure(mut self, allow: bool) -> Self {
        self.allow_insecure = allow;
        self
    }

    /// Set the maximum response body size in bytes.
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }
}

/// Fetches pages one at a time with a shared client.
///
/// The client is built without response decompression, so `Content-Length`
/// always reflects the bytes on the wire.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_body_size: usize,
}

impl Fetcher {
    /// Create a fetcher from the given options.
    pub fn new(options: HttpOptions) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(options.allow_insecure)
            .build()?;

        Ok(Self {
            client,
            max_body_size: options.max_body_size,
        })
    }

    /// GET `url` and return the page.
    ///
    /// A 4xx or 5xx response is reported as [`Error::Status`]; no retry is
    /// attempted.
    pub async fn fetch(&self, url: &str) -> Result<HttpInfo> {
        tracing::debug!(url, "fetching page");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(Error::Status {
                url: response.url().to_string(),
                status: status.as_u16(),
            });
        }

        read_page(response, self.max_body_size).await
    }
}

/// Stream the body, keeping at most `max_body_size` bytes but counting all.
async fn read_page(response: Response, max_body_size: usize) -> Result<HttpInfo> {
    let url = response.url().to_string();

    let content_length = response
        .headers()
        .get(reqwest::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok());

    let capacity = (content_length.unwrap_or(0) as usize)
        .min(max_body_size)
        .min(1024 * 1024);
    let mut kept = Vec::with_capacity(capacity);
    let mut received_bytes = 0u64;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        received_bytes += chunk.len() as u64;

        let room = max_body_size.saturating_sub(kept.len());
        kept.extend_from_slice(&chunk[..chunk.len().min(room)]);
    }

    if received_bytes > kept.len() as u64 {
        tracing::debug!(url = %url, received_bytes, kept = kept.len(), "response body truncated");
    }

    Ok(HttpInfo {
        url,
        content_length,
        received_bytes,
        body: String::from_utf8_lossy(&kept).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(content_length: Option<u64>, received_bytes: u64, body: &str) -> HttpInfo {
        HttpInfo {
            url: "http://shop.test/".to_string(),
            content_length,
            received_bytes,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_default_options() {
        let options = HttpOptions::default();
        assert!(!options.allow_insecure);
        assert_eq!(options.max_body_size, DEFAULT_MAX_BODY_SIZE);
    }

    #[test]
    fn test_builder_pattern() {
        let options = HttpOptions::new().allow_insecure(true).max_body_size(1024);

        assert!(options.allow_insecure);
        assert_eq!(options.max_body_size, 1024);
    }

    #[test]
    fn test_fetcher_takes_body_limit() {
        let fetcher = Fetcher::new(HttpOptions::new().max_body_size(64)).unwrap();
        assert_eq!(fetcher.max_body_size, 64);
    }

    #[test]
    fn test_size_prefers_content_length() {
        assert_eq!(page(Some(2048), 5, "short").size_bytes(), 2048);
    }

    #[test]
    fn test_size_without_header_counts_truncated_bytes() {
        // 5000 bytes arrived, only 5 were kept
        assert_eq!(page(None, 5000, "short").size_bytes(), 5000);
    }
}
