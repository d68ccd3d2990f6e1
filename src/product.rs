//! Detail page enrichment
//!
//! Each listing record links to a product page. Fetching it gives the page
//! size and the product description.

use serde::{Deserialize, Serialize};

/// A listed product merged with data from its detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    /// Title from the listing page
    pub title: Option<String>,

    /// Unit price from the listing page
    pub unit_price: Option<f64>,

    /// Detail page size, e.g. `"2.0kb"`
    pub size: String,

    /// First product text block of the detail page
    pub description: String,
}

/// Render a byte count as kilobytes rounded to one decimal, e.g. `"2.0kb"`.
///
/// Halfway values round to even.
pub fn format_page_size(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    format!("{:.1}kb", (kb * 10.0).round_ties_even() / 10.0)
}

#[cfg(feature = "http")]
pub use self::fetch::enrich;

#[cfg(feature = "http")]
mod fetch {
    use url::Url;

    use super::{ProductDetail, format_page_size};
    use crate::error::Result;
    use crate::html::parse_description;
    use crate::http::{Fetcher, HttpInfo};
    use crate::listing::ListingRecord;

    /// Fetch the detail page of every listing record, in order.
    ///
    /// Relative links are resolved against `base`. Records without a link,
    /// with a link that does not resolve, or whose page fails to download are
    /// logged and left out of the result. A downloaded page without a
    /// description is an error for the whole call.
    pub async fn enrich(
        fetcher: &Fetcher,
        base: Option<&Url>,
        listings: &[ListingRecord],
    ) -> Result<Vec<ProductDetail>> {
        let mut products = Vec::with_capacity(listings.len());

        for (index, listing) in listings.iter().enumerate() {
            let Some(uri) = listing.uri.as_deref() else {
                tracing::warn!(index, title = ?listing.title, "product has no link, skipping");
                continue;
            };

            let url = match resolve(base, uri) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(index, uri, error = %e, "bad product link, skipping");
                    continue;
                }
            };

            let page = match fetcher.fetch(url.as_str()).await {
                Ok(page) => page,
                Err(e) if e.is_transport() => {
                    tracing::warn!(index, %url, error = %e, "failed to fetch product page, skipping");
                    continue;
                }
                Err(e) => return Err(e),
            };

            products.push(detail_from_page(listing, &page)?);
        }

        Ok(products)
    }

    fn resolve(base: Option<&Url>, uri: &str) -> std::result::Result<Url, url::ParseError> {
        match base {
            Some(base) => base.join(uri),
            None => Url::parse(uri),
        }
    }

    fn detail_from_page(listing: &ListingRecord, page: &HttpInfo) -> Result<ProductDetail> {
        Ok(ProductDetail {
            title: listing.title.clone(),
            unit_price: listing.unit_price,
            size: format_page_size(page.size_bytes()),
            description: parse_description(&page.body)?,
        })
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size() {
        assert_eq!(format_page_size(2048), "2.0kb");
        assert_eq!(format_page_size(1536), "1.5kb");
        assert_eq!(format_page_size(0), "0.0kb");
        assert_eq!(format_page_size(100_000), "97.7kb");
    }

    #[test]
    fn test_page_size_halfway_rounds_to_even() {
        // 1280 bytes is exactly 1.25kb
        assert_eq!(format_page_size(1280), "1.2kb");
        // 1792 bytes is exactly 1.75kb
        assert_eq!(format_page_size(1792), "1.8kb");
    }

    #[test]
    fn test_serialized_field_names() {
        let detail = ProductDetail {
            title: Some("Kiwi".to_string()),
            unit_price: Some(1.8),
            size: "2.0kb".to_string(),
            description: "Green".to_string(),
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["title"], "Kiwi");
        assert_eq!(json["unit_price"], 1.8);
        assert_eq!(json["size"], "2.0kb");
        assert_eq!(json["description"], "Green");
    }
}
