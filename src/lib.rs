//! # product-lister
//!
//! Scrape a retailer's product listing page: product titles, links and unit
//! prices from the listing, then size and description from each product's
//! own page, plus the total of all unit prices.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use product_lister::ProductSummary;
//!
//! #[tokio::main]
//! async fn main() -> product_lister::Result<()> {
//!     let summary = ProductSummary::fetch("https://shop.example/fruit.html").await?;
//!
//!     for product in &summary.product_list {
//!         println!("{:?} {:?} {}", product.title, product.unit_price, product.size);
//!     }
//!     println!("Total: {}", summary.total_product_sum);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Parsing Local HTML
//!
//! ```rust
//! use product_lister::{parse_listing, total_product_sum};
//!
//! let html = r#"<ul class="productLister">
//!     <li><div class="pricePerUnit">&pound;1.50/unit</div></li>
//!     <li><div class="pricePerUnit">&pound;2.25/unit</div></li>
//! </ul>"#;
//! let records = parse_listing(html).unwrap();
//! assert_eq!(total_product_sum(&records).unwrap(), "3.75");
//! ```
//!
//! ## Without HTTP (parsing only)
//!
//! ```toml
//! [dependencies]
//! product-lister = { version = "0.1", default-features = false }
//! ```

mod error;
mod html;
mod listing;
mod price;
mod product;

#[cfg(feature = "http")]
mod http;

pub use error::{Error, Result};
pub use html::{element_text, first_attr, first_text, parse_description};
pub use listing::{ListingRecord, parse_listing};
pub use price::parse_unit_price;
pub use product::{ProductDetail, format_page_size};

#[cfg(feature = "http")]
pub use http::{Fetcher, HttpInfo, HttpOptions};
#[cfg(feature = "http")]
pub use product::enrich;

use serde::{Deserialize, Serialize};

/// Products found on a listing page together with their price total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Products whose detail page could be fetched, in listing order
    pub product_list: Vec<ProductDetail>,

    /// Sum of the unit prices of *all* listed products, two decimals
    ///
    /// Products dropped from `product_list` because their detail page failed
    /// still count towards this total.
    pub total_product_sum: String,
}

#[cfg(feature = "http")]
impl ProductSummary {
    /// Scrape a listing page with default options.
    pub async fn fetch(url: &str) -> Result<Self> {
        Self::fetch_with_options(url, HttpOptions::default()).await
    }

    /// Scrape a listing page with custom HTTP options.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use product_lister::{HttpOptions, ProductSummary};
    ///
    /// #[tokio::main]
    /// async fn main() -> product_lister::Result<()> {
    ///     let options = HttpOptions::new().max_body_size(2 * 1024 * 1024);
    ///     let summary = ProductSummary::fetch_with_options("https://shop.example/", options).await?;
    ///     println!("{} products", summary.product_list.len());
    ///     Ok(())
    /// }
    /// ```
    pub async fn fetch_with_options(url: &str, options: HttpOptions) -> Result<Self> {
        let fetcher = Fetcher::new(options)?;
        Self::fetch_with(&fetcher, url).await
    }

    /// Scrape a listing page using an existing fetcher.
    ///
    /// Fails if the listing page cannot be fetched or parsed, if any listed
    /// product lacks a unit price, or if a fetched product page has no
    /// description. Product pages that fail to download are skipped.
    pub async fn fetch_with(fetcher: &Fetcher, url: &str) -> Result<Self> {
        url::Url::parse(url)?;
        let page = fetcher.fetch(url).await.inspect_err(|e| {
            tracing::error!(url, error = %e, "failed to fetch listing page");
        })?;

        let listings = parse_listing(&page.body)?;
        let total_product_sum = total_product_sum(&listings)?;

        let base = url::Url::parse(&page.url).ok();
        let product_list = enrich(fetcher, base.as_ref(), &listings).await?;

        tracing::info!(
            url,
            listed = listings.len(),
            fetched = product_list.len(),
            total = %total_product_sum,
            "scraped listing page"
        );

        Ok(Self {
            product_list,
            total_product_sum,
        })
    }
}

/// Sum the unit prices of all records, formatted with two decimals.
///
/// Every record must carry a price; the first one without fails the sum
/// with [`Error::MissingPrice`].
pub fn total_product_sum(listings: &[ListingRecord]) -> Result<String> {
    // Folding from 0.0 keeps an empty listing at "0.00" rather than "-0.00"
    let total = listings
        .iter()
        .enumerate()
        .try_fold(0.0_f64, |total, (index, record)| {
            let price = record.unit_price.ok_or_else(|| Error::MissingPrice {
                index,
                title: record.title.clone(),
            })?;
            Ok::<_, Error>(total + price)
        })?;

    Ok(format!("{:.2}", total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(price: Option<f64>) -> ListingRecord {
        ListingRecord {
            title: Some("item".to_string()),
            uri: Some("/item".to_string()),
            unit_price: price,
        }
    }

    #[test]
    fn test_total_two_decimals() {
        let listings = [priced(Some(2.0)), priced(Some(2.0))];
        assert_eq!(total_product_sum(&listings).unwrap(), "4.00");
    }

    #[test]
    fn test_total_of_nothing() {
        assert_eq!(total_product_sum(&[]).unwrap(), "0.00");
    }

    #[test]
    fn test_total_adds_fractions() {
        let listings = [priced(Some(1.85)), priced(Some(3.25)), priced(Some(0.7))];
        assert_eq!(total_product_sum(&listings).unwrap(), "5.80");
    }

    #[test]
    fn test_total_missing_price() {
        let listings = [priced(Some(1.0)), priced(None)];

        let err = total_product_sum(&listings).unwrap_err();
        assert!(matches!(err, Error::MissingPrice { index: 1, .. }));
    }

    #[test]
    fn test_summary_json_shape() {
        let summary = ProductSummary {
            product_list: vec![ProductDetail {
                title: Some("Pears".to_string()),
                unit_price: Some(2.0),
                size: "2.0kb".to_string(),
                description: "Conference pears".to_string(),
            }],
            total_product_sum: "2.00".to_string(),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["total_product_sum"], "2.00");
        assert_eq!(json["product_list"][0]["size"], "2.0kb");
        assert_eq!(json["product_list"].as_array().unwrap().len(), 1);
    }
}
