//! Catalog loading. Sets load first, then one card file per set (the file
//! stem is the set id). Undecodable files and cards pointing at unknown
//! sets are skipped with a log line, never fatal: a missing catalog just
//! means every search comes back empty.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::card::{CardSet, CatalogCard, RawCard};

pub struct Catalog {
    pub(crate) cards: Vec<Arc<CatalogCard>>,
    pub(crate) by_id: HashMap<String, Arc<CatalogCard>>,
    pub(crate) sets: HashMap<String, Arc<CardSet>>,
}

impl Catalog {
    /// Load sets and cards from their JSON directories. Loaded once at
    /// process start; the catalog is immutable afterwards.
    pub fn load(sets_dir: &Path, cards_dir: &Path) -> Self {
        let sets = load_sets(sets_dir);

        let mut cards: Vec<Arc<CatalogCard>> = Vec::new();
        let mut by_id = HashMap::new();

        for path in json_files(cards_dir) {
            let Some(set_id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let Some(set) = sets.get(set_id) else {
                debug!("Skipping card file {} with unknown set id", path.display());
                continue;
            };

            let raw_cards: Vec<RawCard> = match read_json(&path) {
                Some(raw_cards) => raw_cards,
                None => continue,
            };

            for raw in raw_cards {
                let card = Arc::new(CatalogCard::from_raw(raw, Arc::clone(set)));
                by_id.insert(card.id.clone(), Arc::clone(&card));
                cards.push(card);
            }
        }

        if cards.is_empty() {
            warn!(
                "No card data loaded from {}; searches will be empty",
                cards_dir.display()
            );
        } else {
            info!("Loaded {} cards across {} sets", cards.len(), sets.len());
        }

        Self { cards, by_id, sets }
    }

    pub fn cards(&self) -> &[Arc<CatalogCard>] {
        &self.cards
    }

    pub fn card_by_id(&self, id: &str) -> Option<Arc<CatalogCard>> {
        self.by_id.get(id).cloned()
    }

    pub fn set_by_id(&self, id: &str) -> Option<Arc<CardSet>> {
        self.sets.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

fn load_sets(sets_dir: &Path) -> HashMap<String, Arc<CardSet>> {
    let mut sets = HashMap::new();

    for path in json_files(sets_dir) {
        let Some(parsed) = read_json::<Vec<CardSet>>(&path) else {
            continue;
        };
        for set in parsed {
            sets.insert(set.id.clone(), Arc::new(set));
        }
    }

    sets
}

// Sorted so load order (and therefore search tie order) does not depend on
// directory iteration order.
fn json_files(dir: &Path) -> Vec<std::path::PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Cannot list {}: {}", dir.display(), err);
            return Vec::new();
        }
    };

    let mut paths: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    paths.sort();
    paths
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            warn!("Cannot open {}: {}", path.display(), err);
            return None;
        }
    };

    match serde_json::from_reader(BufReader::new(file)) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!("Could not decode JSON from {}: {}", path.display(), err);
            None
        }
    }
}
