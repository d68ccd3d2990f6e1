//! Error types for product-lister

use thiserror::Error;

/// Errors that can occur when fetching or parsing product pages.
#[derive(Debug, Error)]
pub enum Error {
    /// URL parse error (from url crate)
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// HTTP request failed at the transport level
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a 4xx or 5xx status
    #[cfg(feature = "http")]
    #[error("HTTP status {status} for {url}")]
    Status {
        /// The requested URL
        url: String,
        /// The status code received
        status: u16,
    },

    /// The listing page had no content to parse
    #[error("bad request: empty page content")]
    EmptyPage,

    /// The listing page has no product list container
    #[error("no html element with class 'productLister'")]
    MissingProductList,

    /// A required element was not found on a detail page
    #[error("no element matching '{0}'")]
    MissingElement(&'static str),

    /// A listing record has no unit price, so the total cannot be computed
    #[error("product {index} ({title:?}) has no unit price")]
    MissingPrice {
        /// Position of the record in the listing
        index: usize,
        /// Title of the record, if any
        title: Option<String>,
    },
}

impl Error {
    /// Whether this error came from the network layer (bad status or
    /// transport failure) rather than from parsing.
    #[cfg(feature = "http")]
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Status { .. })
    }
}

/// Result type alias for product-lister operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_and_input_errors_differ() {
        assert_ne!(
            Error::EmptyPage.to_string(),
            Error::MissingProductList.to_string()
        );
        assert!(Error::MissingProductList.to_string().contains("productLister"));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_status_is_transport() {
        let err = Error::Status {
            url: "http://shop.test/p".to_string(),
            status: 404,
        };
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "HTTP status 404 for http://shop.test/p");
        assert!(!Error::MissingElement("htmlcontent .productText").is_transport());
    }
}
