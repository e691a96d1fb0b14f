use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::row::SourceRow;

/// One priced entry as resolved from a spreadsheet row or a remote source.
/// Records are looked up by canonical key, not owned by any catalog card,
/// so price data can be refreshed independently of the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PriceRecord {
    pub market: Option<f64>,
    pub psa9: Option<f64>,
    pub psa10: Option<f64>,
    pub currency: Currency,
    pub source: PriceSource,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PriceSource {
    Spreadsheet,
    Api,
}

/// Parse a price cell into a float. Currency symbols and thousands
/// separators are stripped; anything that still fails to parse is None,
/// never an error, so a bad cell only costs that one field.
pub fn parse_price(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_lowercase();
    if lower == "nan" || lower == "none" {
        return None;
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ',' | '€' | '$' | '£'))
        .collect();

    cleaned.trim().parse::<f64>().ok()
}

/// Sniff the currency from the first few rows of a price file. The files
/// never carry a dedicated currency column, just symbols or words inside
/// whatever cells mention money.
pub fn detect_currency(rows: &[SourceRow]) -> Currency {
    let mut joined = String::new();
    for row in rows.iter().take(5) {
        for (header, value) in row.fields() {
            joined.push_str(header);
            joined.push(':');
            joined.push_str(value);
            joined.push(' ');
        }
    }
    let joined = joined.to_lowercase();

    if joined.contains('€') || joined.contains(" eur") || joined.contains("euro") {
        Currency::Eur
    } else if joined.contains('$') || joined.contains(" usd") || joined.contains("dollar") {
        Currency::Usd
    } else if joined.contains('£') || joined.contains(" gbp") || joined.contains("pound") {
        Currency::Gbp
    } else {
        Currency::Eur
    }
}
