//! Catalog search and related-card filtering.

use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;

use matcher::{digits_only, normalize_text};

use crate::card::CatalogCard;
use crate::loader::Catalog;

const TEXT_MATCH_WEIGHT: i64 = 50;
const NAME_TOKEN_WEIGHT: i64 = 30;
const SET_TOKEN_WEIGHT: i64 = 20;
const NUMBER_MATCH_BONUS: i64 = 50;
const UNMATCHED_NAME_PENALTY: i64 = 5;

impl Catalog {
    /// Score and rank cards against a free-text query, best first.
    /// Deterministic for a given catalog state and query.
    pub fn search(&self, query: &str, limit: usize) -> Vec<Arc<CatalogCard>> {
        let query_digits = digits_only(query);
        let query_text = {
            let blanked: String = query
                .chars()
                .map(|ch| if ch.is_ascii_digit() { ' ' } else { ch })
                .collect();
            normalize_text(&blanked)
        };
        let query_tokens: HashSet<&str> = query_text.split_whitespace().collect();

        if query_tokens.is_empty() && query_digits.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(i64, u8, &Arc<CatalogCard>)> = Vec::new();
        for card in &self.cards {
            let name_tokens: HashSet<&str> = card.keys.name_key.split_whitespace().collect();
            let set_tokens: HashSet<&str> = card.keys.set_key.split_whitespace().collect();

            // Partial text matches against name and set tokens combined:
            // "char" matches "charizard".
            let mut text_match_count = 0i64;
            for query_token in &query_tokens {
                let hit = name_tokens
                    .iter()
                    .chain(set_tokens.iter())
                    .any(|card_token| card_token.contains(query_token));
                if hit {
                    text_match_count += 1;
                }
            }

            // A query with text tokens that touch nothing on the card is a
            // hard miss, regardless of digit content.
            if !query_tokens.is_empty() && text_match_count == 0 {
                continue;
            }

            let name_overlap = query_tokens.intersection(&name_tokens).count() as i64;
            let set_overlap = query_tokens.intersection(&set_tokens).count() as i64;
            let unmatched_name = name_tokens.difference(&query_tokens).count() as i64;

            let mut score = TEXT_MATCH_WEIGHT * text_match_count
                + NAME_TOKEN_WEIGHT * name_overlap
                + SET_TOKEN_WEIGHT * set_overlap
                - UNMATCHED_NAME_PENALTY * unmatched_name;

            if !query_digits.is_empty() && query_digits == card.keys.number_digits {
                score += NUMBER_MATCH_BONUS;
            }

            if score > 0 {
                scored.push((score, rarity_tier(card.rarity.as_deref()), card));
            }
        }

        scored.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, _, card)| Arc::clone(card))
            .collect()
    }

    /// Same set, same rarity, excluding the given card; a random sample
    /// when more than `count` qualify. Not a ranked operation.
    pub fn related_cards(
        &self,
        set_id: &str,
        rarity: &str,
        exclude_id: &str,
        count: usize,
    ) -> Vec<Arc<CatalogCard>> {
        if set_id.is_empty() || rarity.is_empty() || exclude_id.is_empty() {
            return Vec::new();
        }

        let related: Vec<&Arc<CatalogCard>> = self
            .cards
            .iter()
            .filter(|card| {
                card.set.id == set_id
                    && card.rarity.as_deref() == Some(rarity)
                    && card.id != exclude_id
            })
            .collect();

        if related.len() > count {
            related
                .choose_multiple(&mut rand::thread_rng(), count)
                .map(|card| Arc::clone(card))
                .collect()
        } else {
            related.into_iter().map(Arc::clone).collect()
        }
    }
}

// Tie-break only: orders equal-score results by rarity tier, never filters.
// Checks run rare -> holo -> ultra so the strongest applicable word wins.
fn rarity_tier(rarity: Option<&str>) -> u8 {
    let rarity = rarity.unwrap_or_default().to_lowercase();

    let mut tier = 0;
    if rarity.contains("rare") {
        tier = 1;
    }
    if rarity.contains("holo") {
        tier = 2;
    }
    if rarity.contains("ultra") {
        tier = 3;
    }
    tier
}
