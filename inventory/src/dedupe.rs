//! Near-duplicate collapsing for scraped listings. The composite key
//! deliberately includes the displayed price string: the same listing
//! scraped at two different prices is two observations, both relevant, so
//! it must NOT collapse to one record.

use std::collections::HashSet;

use url::Url;

use common::product::ScrapedProduct;
use common::utils::collapse_whitespace;

/// Normalized title for dedup purposes: trademark symbols out, whitespace
/// collapsed, lowercased.
pub fn title_key(title: &str) -> String {
    let stripped: String = title
        .chars()
        .filter(|ch| !matches!(ch, '™' | '®'))
        .collect();

    collapse_whitespace(&stripped).to_lowercase()
}

/// Canonical URL: lowercase host without the "www." prefix, percent-decoded
/// path without a trailing slash, query string and fragment discarded so
/// tracking parameters never cause false non-duplicates.
pub fn canonical_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let Ok(parsed) = Url::parse(trimmed) else {
        return trimmed.to_string();
    };

    let host = parsed.host_str().unwrap_or_default().to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    let path = parsed.path();
    let decoded = match urlencoding::decode(path) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => path.to_string(),
    };
    let decoded = decoded.trim_end_matches('/');

    format!("{host}{decoded}")
}

/// Collapse duplicates, keeping the first occurrence of each key; the order
/// of kept items follows the input order.
pub fn dedupe(products: Vec<ScrapedProduct>) -> Vec<ScrapedProduct> {
    let mut seen: HashSet<(String, String, String)> = HashSet::new();
    let mut kept = Vec::with_capacity(products.len());

    for product in products {
        let key = (
            title_key(&product.title),
            canonical_url(&product.url),
            product.price.clone(),
        );
        if seen.insert(key) {
            kept.push(product);
        }
    }

    kept
}
