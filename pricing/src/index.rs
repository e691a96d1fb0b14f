//! Multi-key price index. Each source row is indexed under every key a
//! lookup might plausibly arrive with: variant-stripped and raw name keys,
//! exact and digits-only number keys, and a gold-star-stripped shadow name.
//! Colliding rows are resolved by a quality score so the richest,
//! least-variant-tagged row wins each key.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use common::price::{Currency, PriceRecord, PriceSource, detect_currency};
use common::row::SourceRow;
use matcher::{
    CanonicalKey, SET_MATCH_THRESHOLD, digits_only, is_variant_tagged, name_key, name_key_raw,
    normalize_number, normalize_set, set_similarity, strip_gold_star,
};

use crate::rows::extract_price_row;

// Weaker keys are indexed slightly below the row's own score so an exact
// key from another row always beats them on collision.
const DIGITS_KEY_PENALTY: f64 = 0.10;
const GOLD_STAR_PENALTY: f64 = 0.05;
const NON_VARIANT_BONUS: f64 = 2.0;

struct ScoredRecord {
    record: Arc<PriceRecord>,
    score: f64,
}

/// Outcome of a reasoned lookup. The miss reasons matter to callers
/// deciding between "price unavailable" and "this card could not be matched
/// to pricing data, possibly due to set-name drift".
#[derive(Debug, Clone, PartialEq)]
pub enum PriceMatch {
    Found(PriceRecord),
    /// The (name, number) pair exists in the source data, but under a set
    /// key too different to accept.
    UnmatchedSet,
    /// The pair is absent from the source data entirely.
    Absent,
}

#[derive(Default)]
pub struct PriceIndex {
    by_key: HashMap<CanonicalKey, ScoredRecord>,
    known_pairs: HashSet<(String, String)>,
    by_name_number: HashMap<(String, String), Vec<(String, Arc<PriceRecord>)>>,
    rows_indexed: usize,
    rows_skipped: usize,
}

impl PriceIndex {
    pub fn from_rows(rows: &[SourceRow]) -> Self {
        let currency = detect_currency(rows);

        let mut index = Self::default();
        for row in rows {
            match extract_price_row(row) {
                Some(price_row) => {
                    index.insert_row(price_row, currency);
                    index.rows_indexed += 1;
                }
                None => index.rows_skipped += 1,
            }
        }

        index
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn rows_indexed(&self) -> usize {
        self.rows_indexed
    }

    pub fn rows_skipped(&self) -> usize {
        self.rows_skipped
    }

    fn insert_row(&mut self, row: crate::rows::PriceRow, currency: Currency) {
        let record = Arc::new(PriceRecord {
            market: row.market,
            psa9: row.psa9,
            psa10: row.psa10,
            currency,
            source: PriceSource::Spreadsheet,
        });

        // Richness rewards populated fields, PSA10 highest since it is the
        // rarest data; non-variant rows get a bonus because they represent
        // the default printing most lookups want.
        let richness = row.market.is_some() as u32
            + row.psa9.is_some() as u32 * 2
            + row.psa10.is_some() as u32 * 3;
        let variant_bonus = if is_variant_tagged(&row.name) {
            0.0
        } else {
            NON_VARIANT_BONUS
        };
        let score = richness as f64 + variant_bonus;

        let set_key = normalize_set(&row.set);
        let number_key = normalize_number(&row.number);
        let number_digits = digits_only(&number_key);

        let mut name_keys = vec![name_key(&row.name)];
        let raw_key = name_key_raw(&row.name);
        if !name_keys.contains(&raw_key) {
            name_keys.push(raw_key);
        }

        for name in &name_keys {
            self.known_pairs
                .insert((name.clone(), number_key.clone()));
            self.insert_scored(CanonicalKey::new(name, &set_key, &number_key), &record, score);
            self.by_name_number
                .entry((name.clone(), number_key.clone()))
                .or_default()
                .push((set_key.clone(), Arc::clone(&record)));

            if !number_digits.is_empty() && number_digits != number_key {
                self.insert_scored(
                    CanonicalKey::new(name, &set_key, &number_digits),
                    &record,
                    score - DIGITS_KEY_PENALTY,
                );
            }

            let without_gold = strip_gold_star(name);
            if without_gold != *name {
                self.known_pairs
                    .insert((without_gold.clone(), number_key.clone()));
                self.insert_scored(
                    CanonicalKey::new(&without_gold, &set_key, &number_key),
                    &record,
                    score - GOLD_STAR_PENALTY,
                );

                if !number_digits.is_empty() && number_digits != number_key {
                    self.insert_scored(
                        CanonicalKey::new(&without_gold, &set_key, &number_digits),
                        &record,
                        score - GOLD_STAR_PENALTY - DIGITS_KEY_PENALTY,
                    );
                }
            }
        }
    }

    // Strictly-greater replacement: ties keep the first-seen row.
    fn insert_scored(&mut self, key: CanonicalKey, record: &Arc<PriceRecord>, score: f64) {
        match self.by_key.get_mut(&key) {
            Some(existing) if score > existing.score => {
                existing.record = Arc::clone(record);
                existing.score = score;
            }
            Some(_) => {}
            None => {
                self.by_key.insert(
                    key,
                    ScoredRecord {
                        record: Arc::clone(record),
                        score,
                    },
                );
            }
        }
    }

    /// Exact lookup over the {clean, raw} × {number, digits} key grid with
    /// the given set, then a fuzzy set fallback limited to candidates
    /// sharing a (name, number) pair. Below-threshold fuzzy scores are a
    /// miss, never a low-confidence guess.
    pub fn lookup(&self, name: &str, set_name: &str, number: &str) -> Option<PriceRecord> {
        self.find(name, set_name, number)
            .map(|record| record.as_ref().clone())
    }

    pub fn lookup_with_reason(&self, name: &str, set_name: &str, number: &str) -> PriceMatch {
        if let Some(record) = self.lookup(name, set_name, number) {
            return PriceMatch::Found(record);
        }

        let names = candidate_name_keys(name);
        let numbers = candidate_number_keys(number);
        let known = names.iter().any(|nm| {
            numbers
                .iter()
                .any(|nn| self.known_pairs.contains(&(nm.clone(), nn.clone())))
        });

        if known {
            PriceMatch::UnmatchedSet
        } else {
            PriceMatch::Absent
        }
    }

    fn find(&self, name: &str, set_name: &str, number: &str) -> Option<&Arc<PriceRecord>> {
        let set_key = normalize_set(set_name);
        let names = candidate_name_keys(name);
        let numbers = candidate_number_keys(number);

        for nm in &names {
            for nn in &numbers {
                if let Some(entry) = self.by_key.get(&CanonicalKey::new(nm, &set_key, nn)) {
                    return Some(&entry.record);
                }
            }
        }

        let mut best: Option<&Arc<PriceRecord>> = None;
        let mut best_score = 0.0;
        for nm in &names {
            for nn in &numbers {
                let Some(candidates) = self.by_name_number.get(&(nm.clone(), nn.clone())) else {
                    continue;
                };
                for (candidate_set, record) in candidates {
                    let score = set_similarity(&set_key, candidate_set);
                    if score > best_score {
                        best_score = score;
                        best = Some(record);
                    }
                }
            }
        }

        if best_score >= SET_MATCH_THRESHOLD {
            best
        } else {
            None
        }
    }
}

fn candidate_name_keys(name: &str) -> Vec<String> {
    let mut keys = vec![name_key(name)];
    let raw = name_key_raw(name);
    if !keys.contains(&raw) {
        keys.push(raw);
    }
    keys
}

fn candidate_number_keys(number: &str) -> Vec<String> {
    let number_key = normalize_number(number);
    let digits = digits_only(&number_key);

    let mut keys = Vec::new();
    for key in [number_key, digits] {
        if !key.is_empty() && !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}
