use tracing::debug;

use common::price::parse_price;
use common::row::SourceRow;
use matcher::normalize::decode_escapes;

// Acceptable column-name synonyms per logical field, first match wins.
const NAME_ALIASES: &[&str] = &["name", "card name", "card", "title", "card_title"];
const SET_ALIASES: &[&str] = &["set", "set name", "game"];
const NUMBER_ALIASES: &[&str] = &["number", "no", "#"];
const MARKET_ALIASES: &[&str] = &["raw price", "raw", "price", "unguided_price"];
const PSA9_ALIASES: &[&str] = &["psa 9 price", "psa9 price", "psa9", "psa9_price"];
const PSA10_ALIASES: &[&str] = &["psa 10 price", "psa10 price", "psa10", "psa10_price"];

#[derive(Debug)]
pub(crate) struct PriceRow {
    pub name: String,
    pub set: String,
    pub number: String,
    pub market: Option<f64>,
    pub psa9: Option<f64>,
    pub psa10: Option<f64>,
}

/// Resolve one source row into its logical price fields, or None when the
/// row is unusable (missing name, set, or number after recovery).
pub(crate) fn extract_price_row(row: &SourceRow) -> Option<PriceRow> {
    let mut name = decode_escapes(row.field(NAME_ALIASES).unwrap_or_default().trim());
    let mut set = decode_escapes(row.field(SET_ALIASES).unwrap_or_default().trim());
    let mut number = row
        .field(NUMBER_ALIASES)
        .unwrap_or_default()
        .trim()
        .to_string();

    if let Some(prefix) = set.get(..8)
        && prefix.eq_ignore_ascii_case("pokemon ")
    {
        set = set[8..].trim().to_string();
    }

    // Sources sometimes write "Charizard #4" instead of filling the number
    // column; recover the suffix after the last '#'.
    if number.is_empty() && name.contains('#') {
        if let Some((head, tail)) = name.rsplit_once('#') {
            let head = head.trim().to_string();
            number = tail.trim().to_string();
            name = head;
        }
    }

    let market = row.field(MARKET_ALIASES).and_then(parse_price);
    let psa9 = row.field(PSA9_ALIASES).and_then(parse_price);
    let psa10 = row.field(PSA10_ALIASES).and_then(parse_price);

    if name.is_empty() || set.is_empty() || number.is_empty() {
        debug!("Skipping price row with missing name/set/number: {row:?}");
        return None;
    }

    Some(PriceRow {
        name,
        set,
        number,
        market,
        psa9,
        psa10,
    })
}
