use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// One scraped marketplace listing. These form a parallel inventory with no
/// relationship to the card catalog; they are only normalized and deduped.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScrapedProduct {
    pub title: String,
    pub image_url: Option<String>,
    /// Price exactly as displayed by the source listing.
    pub price: String,
    pub price_float: Option<f64>,
    pub url: String,
    pub source: ProductSource,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProductSource {
    BestPrice,
    Skroutz,
    #[default]
    Other,
}
