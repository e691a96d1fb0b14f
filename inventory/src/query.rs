use std::cmp::Ordering;

use strum_macros::EnumString;

use common::product::ScrapedProduct;

#[derive(Debug, Default, EnumString, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum SortOrder {
    /// The order products were scraped in, which the upstream crawlers emit
    /// best-selling first.
    #[default]
    Bestsellers,
    PriceAsc,
    PriceDesc,
    Alpha,
}

/// Filter products down to those whose title contains every query token,
/// then sort a copy according to `order`. Products without a parseable
/// price always sort after priced ones.
pub(crate) fn filter_sort(
    products: &[ScrapedProduct],
    query: &str,
    order: SortOrder,
) -> Vec<ScrapedProduct> {
    let tokens = query_tokens(query);

    let mut matched: Vec<ScrapedProduct> = products
        .iter()
        .filter(|product| title_matches(&product.title, &tokens))
        .cloned()
        .collect();

    match order {
        SortOrder::Bestsellers => {}
        SortOrder::PriceAsc => matched.sort_by(|a, b| compare_prices(a, b, false)),
        SortOrder::PriceDesc => matched.sort_by(|a, b| compare_prices(a, b, true)),
        SortOrder::Alpha => {
            matched.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        }
    }

    matched
}

pub(crate) fn query_tokens(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

pub(crate) fn title_matches(title: &str, tokens: &[String]) -> bool {
    let title = title.to_lowercase();
    tokens.iter().all(|token| title.contains(token.as_str()))
}

// Unpriced products sort last in BOTH directions, so only the priced
// comparison flips with `descending`.
fn compare_prices(a: &ScrapedProduct, b: &ScrapedProduct, descending: bool) -> Ordering {
    match (a.price_float, b.price_float) {
        (Some(left), Some(right)) => {
            if descending {
                right.total_cmp(&left)
            } else {
                left.total_cmp(&right)
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
