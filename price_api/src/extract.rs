use serde_json::Value;

use common::price::Currency;

/// A remote quote for one card. Everything is optional: the remote side
/// often has links but no tracked price, or the other way around.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SupplementaryPrice {
    pub market: Option<f64>,
    pub currency: Currency,
    pub updated_at: Option<String>,
    pub cardmarket_url: Option<String>,
    pub tcgplayer_url: Option<String>,
}

/// Pull a supplementary quote out of a `GET /cards/{id}` response body.
/// Returns None when the body has no `data` object at all.
pub(crate) fn extract_supplementary(body: &Value) -> Option<SupplementaryPrice> {
    let data = body.get("data")?;

    let tcgplayer = data.get("tcgplayer");
    let cardmarket = data.get("cardmarket");

    let tcg_prices = tcgplayer.and_then(|t| t.get("prices"));
    let cmk_prices = cardmarket.and_then(|c| c.get("prices"));

    Some(SupplementaryPrice {
        market: extract_market(tcg_prices, cmk_prices),
        currency: Currency::Usd,
        updated_at: string_field(cardmarket, "updatedAt"),
        cardmarket_url: string_field(cardmarket, "url"),
        tcgplayer_url: string_field(tcgplayer, "url"),
    })
}

/// Market price precedence: tcgplayer variants holofoil, then
/// reverseHolofoil, then normal, reading market, then directLow, then mid
/// within each variant; when tcgplayer has nothing, cardmarket
/// averageSellPrice then trendPrice.
pub(crate) fn extract_market(tcg_prices: Option<&Value>, cmk_prices: Option<&Value>) -> Option<f64> {
    if let Some(tcg) = tcg_prices {
        for variant in ["holofoil", "reverseHolofoil", "normal"] {
            let Some(prices) = tcg.get(variant) else {
                continue;
            };
            for field in ["market", "directLow", "mid"] {
                if let Some(value) = number_field(prices, field) {
                    return Some(value);
                }
            }
        }
    }

    let cmk = cmk_prices?;
    for field in ["averageSellPrice", "trendPrice"] {
        if let Some(value) = number_field(cmk, field) {
            return Some(value);
        }
    }

    None
}

fn number_field(obj: &Value, field: &str) -> Option<f64> {
    obj.get(field).and_then(Value::as_f64)
}

fn string_field(obj: Option<&Value>, field: &str) -> Option<String> {
    obj.and_then(|o| o.get(field))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn holofoil_market_wins_over_everything() {
        let tcg = json!({
            "normal": {"market": 1.0},
            "reverseHolofoil": {"market": 2.0},
            "holofoil": {"market": 3.0, "directLow": 2.5}
        });
        let cmk = json!({"averageSellPrice": 9.0});
        assert_eq!(extract_market(Some(&tcg), Some(&cmk)), Some(3.0));
    }

    #[test]
    fn direct_low_fills_in_for_a_missing_market() {
        let tcg = json!({
            "holofoil": {"market": null, "directLow": 4.2, "mid": 5.0}
        });
        assert_eq!(extract_market(Some(&tcg), None), Some(4.2));
    }

    #[test]
    fn falls_through_to_the_next_variant_not_just_the_next_field() {
        let tcg = json!({
            "holofoil": {},
            "normal": {"mid": 0.25}
        });
        assert_eq!(extract_market(Some(&tcg), None), Some(0.25));
    }

    #[test]
    fn cardmarket_is_the_last_resort() {
        let cmk = json!({"averageSellPrice": null, "trendPrice": 7.5});
        assert_eq!(extract_market(None, Some(&cmk)), Some(7.5));
        assert_eq!(extract_market(Some(&json!({})), Some(&cmk)), Some(7.5));
    }

    #[test]
    fn full_body_extraction() {
        let body = json!({
            "data": {
                "tcgplayer": {
                    "url": "https://prices.example/tcg/base1-4",
                    "prices": {"holofoil": {"market": 420.0}}
                },
                "cardmarket": {
                    "url": "https://prices.example/cmk/base1-4",
                    "updatedAt": "2024/11/02",
                    "prices": {"trendPrice": 390.0}
                }
            }
        });

        let quote = extract_supplementary(&body).unwrap();
        assert_eq!(quote.market, Some(420.0));
        assert_eq!(quote.currency, Currency::Usd);
        assert_eq!(quote.updated_at.as_deref(), Some("2024/11/02"));
        assert_eq!(
            quote.tcgplayer_url.as_deref(),
            Some("https://prices.example/tcg/base1-4")
        );
    }

    #[test]
    fn body_without_data_yields_nothing() {
        assert_eq!(extract_supplementary(&json!({"error": "not found"})), None);
        assert!(extract_supplementary(&json!({"data": {}})).is_some());
    }
}
