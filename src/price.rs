//! Unit price parsing
//!
//! Listing pages show prices as loosely formatted text such as
//! `£1.85/unit`. Only the first number in the fragment is taken.

use std::sync::OnceLock;

use regex::Regex;

fn price_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").unwrap())
}

/// Parse the first decimal number found in a price fragment.
///
/// Returns `None` when the fragment contains no digits at all, which is
/// distinct from a price of zero.
///
/// # Example
/// ```
/// use product_lister::parse_unit_price;
///
/// assert_eq!(parse_unit_price("&pound3.50;/unit"), Some(3.5));
/// assert_eq!(parse_unit_price("&pound4.abc;/unit"), Some(4.0));
/// assert_eq!(parse_unit_price("&pound;/unit"), None);
/// ```
pub fn parse_unit_price(text: &str) -> Option<f64> {
    price_regex()
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
