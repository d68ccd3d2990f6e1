//! Product listing extraction
//!
//! A listing page carries a single `<ul class="productLister">` whose `<li>`
//! items each describe one product.

use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::html::{
    first_attr, first_text, list_item_selector, price_per_unit_selector, product_lister_selector,
    title_link_selector,
};
use crate::price::parse_unit_price;

/// One product as it appears on the listing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Link text of the product heading
    pub title: Option<String>,

    /// `href` of the product heading, exactly as written in the markup
    pub uri: Option<String>,

    /// Price per unit parsed from the `.pricePerUnit` block
    pub unit_price: Option<f64>,
}

impl ListingRecord {
    /// Build a record from one `<li>` of the product list.
    ///
    /// Every field is looked up on its own; a missing element leaves that
    /// field `None`.
    pub fn from_list_item(item: ElementRef<'_>) -> Self {
        Self {
            title: first_text(item, title_link_selector()),
            uri: first_attr(item, title_link_selector(), "href"),
            unit_price: first_text(item, price_per_unit_selector())
                .as_deref()
                .and_then(parse_unit_price),
        }
    }
}

/// Extract all listing records from a listing page, in document order.
///
/// # Errors
///
/// * [`Error::EmptyPage`] if `page` is empty
/// * [`Error::MissingProductList`] if there is no `ul.productLister`
///
/// An empty product list is not an error and yields an empty vector.
///
/// # Example
/// ```
/// use product_lister::parse_listing;
///
/// let html = r#"<ul class="productLister"><li>
///     <div class="productInfo"><h3><a href="/apple">Apple</a></h3></div>
///     <div class="pricePerUnit">&pound;0.45/unit</div>
/// </li></ul>"#;
///
/// let records = parse_listing(html).unwrap();
/// assert_eq!(records[0].title.as_deref(), Some("Apple"));
/// assert_eq!(records[0].unit_price, Some(0.45));
/// ```
pub fn parse_listing(page: &str) -> Result<Vec<ListingRecord>> {
    if page.is_empty() {
        return Err(Error::EmptyPage);
    }

    let document = Html::parse_document(page);
    let product_list = document
        .select(product_lister_selector())
        .next()
        .ok_or(Error::MissingProductList)?;

    let records: Vec<_> = product_list
        .select(list_item_selector())
        .map(ListingRecord::from_list_item)
        .collect();

    tracing::debug!(count = records.len(), "extracted listing records");
    Ok(records)
}
