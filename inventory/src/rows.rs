use std::str::FromStr;

use tracing::debug;
use url::Url;

use common::product::{ProductSource, ScrapedProduct};
use common::row::SourceRow;

const TITLE_ALIASES: &[&str] = &["title", "product", "name", "item_title"];
const PRICE_ALIASES: &[&str] = &["price", "current_price", "amount", "lowest_price"];
const IMAGE_ALIASES: &[&str] = &["image_url", "image", "img", "thumbnail"];
const URL_ALIASES: &[&str] = &["url", "link", "permalink", "product_url"];
const SOURCE_ALIASES: &[&str] = &["source", "site", "platform", "store", "website"];

/// Resolve one scraped row into a product, or None when title or url is
/// missing.
pub(crate) fn extract_product(
    row: &SourceRow,
    default_source: ProductSource,
) -> Option<ScrapedProduct> {
    let title = row.field_trimmed(TITLE_ALIASES)?.to_string();
    let url = row.field_trimmed(URL_ALIASES)?.to_string();

    let image_url = row
        .field_trimmed(IMAGE_ALIASES)
        .map(|image| image.to_string());
    let price = row.field(PRICE_ALIASES).unwrap_or_default().trim().to_string();
    let price_float = price_text_to_float(&price);

    let source = match row.field_trimmed(SOURCE_ALIASES) {
        Some(tag) => parse_source_tag(tag),
        None => infer_source(&url, default_source),
    };

    Some(ScrapedProduct {
        title,
        image_url,
        price,
        price_float,
        url,
        source,
    })
}

/// Listing prices arrive EU-formatted ("1.234,56"): thousands dots drop,
/// the comma is the decimal separator.
pub(crate) fn price_text_to_float(text: &str) -> Option<f64> {
    let normalized = text.replace('.', "").replace(',', ".");
    let digits: String = normalized
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect();

    if digits.is_empty() {
        return None;
    }

    digits.parse::<f64>().ok()
}

fn parse_source_tag(tag: &str) -> ProductSource {
    let lower = tag.to_lowercase();
    if lower.starts_with("best") {
        ProductSource::BestPrice
    } else if lower.starts_with("skr") {
        ProductSource::Skroutz
    } else {
        ProductSource::from_str(&lower).unwrap_or(ProductSource::Other)
    }
}

/// When the row carries no source column, the URL host usually gives it
/// away.
pub(crate) fn infer_source(url: &str, fallback: ProductSource) -> ProductSource {
    let host = match Url::parse(url) {
        Ok(parsed) => parsed.host_str().unwrap_or_default().to_lowercase(),
        Err(err) => {
            debug!("Cannot parse product URL {url}: {err}");
            String::new()
        }
    };

    if host.contains("skroutz") {
        ProductSource::Skroutz
    } else if host.contains("bestprice") {
        ProductSource::BestPrice
    } else {
        fallback
    }
}
