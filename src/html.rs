//! Field lookups on parsed HTML
//!
//! Selectors for the retailer's markup live here together with the small
//! helpers that pull text and attributes out of the first matching element.

use std::sync::OnceLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::{Error, Result};

const DESCRIPTION_SELECTOR: &str = "htmlcontent .productText";

pub(crate) fn product_lister_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("ul.productLister").unwrap())
}

pub(crate) fn list_item_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("li").unwrap())
}

pub(crate) fn title_link_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse(".productInfo h3 a").unwrap())
}

pub(crate) fn price_per_unit_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse(".pricePerUnit").unwrap())
}

fn description_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse(DESCRIPTION_SELECTOR).unwrap())
}

/// All text below `element`, trimmed at both ends.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first element under `scope` matching `selector`.
pub fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(element_text)
}

/// Attribute `attr` of the first element under `scope` matching `selector`.
///
/// Returns `None` both when nothing matches and when the first match lacks
/// the attribute.
pub fn first_attr(scope: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    scope
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|s| s.to_string())
}

/// Extract the product description from a detail page.
///
/// Takes the first `.productText` element inside `<htmlcontent>` and returns
/// its trimmed text. Unlike the listing lookups this one is strict: a page
/// without a description is an error.
///
/// # Example
/// ```
/// use product_lister::parse_description;
///
/// let html = "<htmlcontent><div class='productText'><p> Apples </p></div></htmlcontent>";
/// assert_eq!(parse_description(html).unwrap(), "Apples");
/// ```
pub fn parse_description(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    document
        .select(description_selector())
        .next()
        .map(element_text)
        .ok_or(Error::MissingElement(DESCRIPTION_SELECTOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_takes_first_match() {
        let html = r#"
            <div>
                <htmlcontent>
                    <div></div>
                    <div class='productText'><p>a product description</p>
	<p></p></div>
                    <div class='productText'><p>Sainsbury Apple</p>
	<p></p></div>
                </htmlcontent>
            </div>
        "#;

        assert_eq!(parse_description(html).unwrap(), "a product description");
    }

    #[test]
    fn test_description_missing_is_error() {
        let html = r#"<div class="productText"><p>outside htmlcontent</p></div>"#;

        let err = parse_description(html).unwrap_err();
        assert!(matches!(err, Error::MissingElement(DESCRIPTION_SELECTOR)));
    }

    #[test]
    fn test_tolerant_lookups() {
        let html = Html::parse_fragment(
            r#"<div class="productInfo"><h3><a href="/p/1">
                Apple
            </a></h3></div>"#,
        );
        let root = html.root_element();

        assert_eq!(
            first_text(root, title_link_selector()),
            Some("Apple".to_string())
        );
        assert_eq!(
            first_attr(root, title_link_selector(), "href"),
            Some("/p/1".to_string())
        );
        assert_eq!(first_attr(root, title_link_selector(), "title"), None);
        assert_eq!(first_text(root, price_per_unit_selector()), None);
    }
}
